//! Error type for graph wiring mistakes.
//!
//! Everything in here is a configuration error raised on the control thread.
//! The audio thread never produces one: a missing input renders silence and an
//! exhausted input shows up as a short read.

/// Errors returned by control-thread operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The upstream node runs at a different sample rate than the redistributor.
    #[error("sample rate mismatch: node runs at {node} Hz, expected {expected} Hz")]
    RateMismatch { expected: u32, node: u32 },

    /// No named conversion exists between these channel counts.
    ///
    /// Supply an explicit matrix instead.
    #[error("no default conversion from {src} to {dst} channels")]
    UnsupportedLayout { src: usize, dst: usize },

    /// The coefficient slice does not hold `outputs * inputs` values.
    #[error("matrix needs {expected} coefficients, got {actual}")]
    MatrixSize { expected: usize, actual: usize },

    /// Channel count of zero (or otherwise unusable).
    #[error("invalid channel count: {0}")]
    InvalidChannels(usize),

    /// The output device could not be opened or started.
    #[error("audio device error: {0}")]
    Device(String),

    /// The output device wants a sample format we don't render.
    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),
}

/// Shorthand used across the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
