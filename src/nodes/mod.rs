//! Built-in audio nodes.
//!
//! Nodes are organized into three categories:
//!
//! ## Sources ([`source`])
//!
//! Generate audio with no upstream:
//! - [`Sine`] - Endless mono sine oscillator
//! - [`SamplePlayer`] - Play pre-decoded samples with full transport
//! - [`StreamSource`] - Play samples pushed from another thread through a ring buffer
//!
//! ## Effects ([`effect`])
//!
//! Pull from an upstream node and reshape it:
//! - [`Redistributor`] - Convert any attached node to a fixed channel count
//!
//! ## Sinks ([`sink`])
//!
//! Drive a node tree from the outside:
//! - [`CpalOutput`] - Play a root redistributor on the default device (requires `cpal_sink` feature)

pub mod source;
pub mod effect;
pub mod sink;

// Re-export common types at the top level for convenience
pub use source::{SamplePlayer, Sine, StreamFeed, StreamSource};
pub use effect::Redistributor;

#[cfg(feature = "cpal_sink")]
pub use sink::CpalOutput;
