//! Core node trait.

use alloc::boxed::Box;
use alloc::sync::Arc;

use delegate::delegate;

/// The core trait for pull-model audio nodes.
///
/// A node produces interleaved `f32` frames on demand. Downstream nodes (or
/// the device callback) call [`read`](AudioNode::read) and the node pulls from
/// whatever it is attached to. Nodes can be:
/// - **Sources**: Generate audio - oscillators, sample players, streams
/// - **Effects**: Pull from an upstream node and reshape it - e.g. the
///   [`Redistributor`](crate::nodes::Redistributor)
///
/// All methods take `&self`. A node is shared between the control thread and
/// the audio thread behind an [`Arc`], so implementations keep their mutable
/// state behind atomics or a lock that only the audio thread contends on.
///
/// # Transport
///
/// Seeking and bookkeeping methods have defaults that report "unsupported":
/// `false` for the boolean calls and `None` for the numeric ones. A node that
/// only generates (like [`Sine`](crate::nodes::Sine)) never overrides them.
///
/// ```
/// use verteiler::AudioNode;
///
/// struct Silence;
///
/// impl AudioNode for Silence {
///     fn read(&self, buffer: &mut [f32], frames: usize) -> usize {
///         let len = (frames * self.channels()).min(buffer.len());
///         buffer[..len].fill(0.0);
///         frames
///     }
///
///     fn channels(&self) -> usize { 1 }
///
///     fn rate(&self) -> u32 { 48_000 }
/// }
///
/// let mut buf = [1.0; 16];
/// assert_eq!(Silence.read(&mut buf, 16), 16);
/// assert_eq!(Silence.position(), None);
/// ```
pub trait AudioNode: Send + Sync {
    /// Read up to `frames` frames of interleaved audio into `buffer`.
    ///
    /// Returns the number of frames written. Anything less than `frames`
    /// means the node ran dry; `0` means it is exhausted.
    fn read(&self, buffer: &mut [f32], frames: usize) -> usize;

    /// Number of interleaved channels per frame.
    fn channels(&self) -> usize;

    /// Sample rate in Hz.
    fn rate(&self) -> u32;

    /// Whether the node has nothing left to play.
    fn completed(&self) -> bool {
        false
    }

    /// Remember the current position so [`reset`](AudioNode::reset) can return to it.
    fn mark(&self) -> bool {
        false
    }

    /// Forget the mark; [`reset`](AudioNode::reset) goes back to the start.
    fn unmark(&self) -> bool {
        false
    }

    /// Jump back to the mark (or the start).
    fn reset(&self) -> bool {
        false
    }

    /// Skip `frames` frames without rendering them. Returns the frames skipped.
    fn advance(&self, _frames: u64) -> Option<u64> {
        None
    }

    /// Current position in frames.
    fn position(&self) -> Option<u64> {
        None
    }

    /// Seek to `frame`. Returns the position actually reached.
    fn set_position(&self, _frame: u64) -> Option<u64> {
        None
    }

    /// Seconds played so far.
    fn elapsed(&self) -> Option<f64> {
        None
    }

    /// Seek so that `seconds` have elapsed. Returns the new elapsed time.
    fn set_elapsed(&self, _seconds: f64) -> Option<f64> {
        None
    }

    /// Seconds left to play.
    fn remaining(&self) -> Option<f64> {
        None
    }

    /// Seek so that `seconds` remain. Returns the new remaining time.
    fn set_remaining(&self, _seconds: f64) -> Option<f64> {
        None
    }
}

macro_rules! forward_audio_node {
    ($($wrapper:ident),*) => {$(
        impl<N: AudioNode + ?Sized> AudioNode for $wrapper<N> {
            delegate! {
                to self.as_ref() {
                    fn read(&self, buffer: &mut [f32], frames: usize) -> usize;
                    fn channels(&self) -> usize;
                    fn rate(&self) -> u32;
                    fn completed(&self) -> bool;
                    fn mark(&self) -> bool;
                    fn unmark(&self) -> bool;
                    fn reset(&self) -> bool;
                    fn advance(&self, frames: u64) -> Option<u64>;
                    fn position(&self) -> Option<u64>;
                    fn set_position(&self, frame: u64) -> Option<u64>;
                    fn elapsed(&self) -> Option<f64>;
                    fn set_elapsed(&self, seconds: f64) -> Option<f64>;
                    fn remaining(&self) -> Option<f64>;
                    fn set_remaining(&self, seconds: f64) -> Option<f64>;
                }
            }
        }
    )*};
}

forward_audio_node!(Arc, Box);

/// Zero the first `frames` frames of `buffer` and report them as rendered.
#[inline]
pub(crate) fn silence(buffer: &mut [f32], frames: usize, channels: usize) -> usize {
    let len = (frames * channels).min(buffer.len());
    buffer[..len].fill(0.0);
    frames
}
