//! Nodes that drive a tree from the outside.

#[cfg(feature = "cpal_sink")]
mod cpal_sink;

#[cfg(feature = "cpal_sink")]
pub use cpal_sink::CpalOutput;
