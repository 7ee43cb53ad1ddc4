//! Nodes that pull from upstream and reshape what they get.

mod redistributor;

pub use redistributor::Redistributor;
