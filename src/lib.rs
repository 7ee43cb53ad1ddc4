//! Pull-model audio nodes for channel redistribution.
//!
//! A [`Redistributor`](nodes::Redistributor) sits between a source with any
//! channel layout and a consumer that wants a fixed one, converting frames as
//! they are pulled through it. Named layouts (mono, stereo, tri, quad, 5.1,
//! 7.1) convert through fixed kernels; anything else mixes through an explicit
//! [`RedistributionMatrix`].
//!
//! ```
//! use std::sync::Arc;
//! use verteiler::{AudioConfig, AudioNode};
//! use verteiler::nodes::{Redistributor, Sine};
//!
//! let config = AudioConfig::default();
//! let surround = Redistributor::new(6, &config)?;
//! surround.attach(Arc::new(Sine::new(440.0, config.sample_rate)))?;
//!
//! let mut block = vec![0.0; 256 * 6];
//! assert_eq!(surround.read(&mut block, 256), 256);
//! # Ok::<(), verteiler::Error>(())
//! ```
//!
//! Everything the audio thread touches is preallocated when the graph is
//! wired up. Control operations (attach, detach, reconfigure) return
//! [`Error`] on misuse; the audio thread never fails and renders silence
//! instead.

extern crate alloc;

mod config;
mod error;
mod node;

pub mod convert;
pub mod graph;
pub mod layout;
pub mod nodes;

pub use config::{AudioConfig, DEFAULT_READ_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};
pub use convert::{Conversion, Kernel, RedistributionMatrix};
pub use error::{Error, Result};
pub use graph::GraphSource;
pub use layout::{Channel, ChannelLayout};
pub use node::AudioNode;
