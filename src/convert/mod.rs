//! Channel conversion: fixed kernels, the selector that chains them, and
//! general matrix mixing.
//!
//! Everything here works in place on interleaved `f32` buffers and never
//! allocates after construction, so it is safe to call from the audio thread.

pub mod kernels;
mod matrix;
mod select;

pub use kernels::Kernel;
pub use matrix::RedistributionMatrix;
pub use select::{supported_pairs, Conversion};
