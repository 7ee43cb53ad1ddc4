//! Render configuration shared by nodes.

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default number of frames the device asks for per callback.
pub const DEFAULT_READ_BLOCK_SIZE: usize = 512;

/// Sample rate and block size a node is configured for.
///
/// The read block size is only used to size scratch memory up front, so that
/// nothing needs to be allocated on the audio thread. Requests larger than a
/// block still work; they are just served in several chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioConfig {
    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Frames per device read
    pub read_block_size: usize,
}

impl AudioConfig {
    pub fn new(sample_rate: u32, read_block_size: usize) -> Self {
        Self {
            sample_rate,
            read_block_size: read_block_size.max(1),
        }
    }

    /// Set the sample rate (builder pattern).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the read block size (builder pattern). Zero is bumped to one.
    pub fn with_read_block_size(mut self, frames: usize) -> Self {
        self.read_block_size = frames.max(1);
        self
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_READ_BLOCK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_block_size() {
        let config = AudioConfig::default()
            .with_sample_rate(44_100)
            .with_read_block_size(0);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.read_block_size, 1);
    }
}
