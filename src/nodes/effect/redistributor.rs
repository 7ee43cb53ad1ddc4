//! Channel redistribution node.
//!
//! A [`Redistributor`] presents a fixed number of output channels and pulls
//! from whatever node is attached upstream, converting every frame on the
//! way through. The conversion is either one of the named layout kernels or
//! an explicit mixing matrix.
//!
//! Two threads touch a redistributor:
//! - the **audio thread** calls [`read`](AudioNode::read) and the transport
//!   methods,
//! - the **control thread** attaches, detaches, and reconfigures.
//!
//! The upstream node is swapped atomically through [`ArcSwapOption`], so a
//! read takes one snapshot of it and works on that snapshot alone; a
//! concurrent [`detach`](Redistributor::detach) can't free it mid-read. The
//! conduit count, conversion, and scratch buffer only make sense together, so
//! they sit behind a single mutex that the control thread holds just long
//! enough to swap pre-built values in.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use core::fmt;
use core::mem;
use core::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::AudioConfig;
use crate::convert::{Conversion, RedistributionMatrix};
use crate::error::{Error, Result};
use crate::node::{silence, AudioNode};

/// How input frames become output frames.
#[derive(Debug)]
enum Route {
    Convert(Conversion),
    Matrix(RedistributionMatrix),
}

impl Route {
    #[inline]
    fn apply(&mut self, buffer: &mut [f32], frames: usize) {
        match self {
            Route::Convert(conversion) => conversion.apply_in_place(buffer, frames),
            Route::Matrix(matrix) => matrix.apply_in_place(buffer, frames),
        }
    }
}

/// State that the audio thread must see as one consistent unit.
struct Routing {
    /// Expected upstream channel count
    conduits: usize,
    route: Route,
    /// Room for a block of upstream frames when they are wider than ours.
    /// Empty whenever `conduits <= channels`.
    scratch: Box<[f32]>,
}

// `ArcSwapOption` needs a sized pointee
struct Upstream(Arc<dyn AudioNode>);

/// Converts whatever is attached upstream into a fixed channel count.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use verteiler::{AudioConfig, AudioNode};
/// use verteiler::nodes::{Redistributor, SamplePlayer};
///
/// let config = AudioConfig::default();
/// let stereo = Redistributor::new(2, &config).unwrap();
///
/// // one frame of 5.1: FL, FR, FC, LFE, BL, BR
/// let clip = SamplePlayer::new(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0], 6, config.sample_rate);
/// stereo.attach(Arc::new(clip)).unwrap();
///
/// let mut out = [0.0; 2];
/// assert_eq!(stereo.read(&mut out, 1), 1);
/// assert_eq!(out, [1.0, 0.5 / 2.5]);
/// ```
pub struct Redistributor {
    channels: usize,
    rate: u32,
    read_block_size: usize,
    input: ArcSwapOption<Upstream>,
    routing: Mutex<Routing>,
    paused: AtomicBool,
}

impl Redistributor {
    /// Create a redistributor with `channels` output channels.
    ///
    /// It starts out detached, expecting upstream nodes with the same channel
    /// count as its output.
    pub fn new(channels: usize, config: &AudioConfig) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidChannels(channels));
        }

        Ok(Self {
            channels,
            rate: config.sample_rate,
            read_block_size: config.read_block_size.max(1),
            input: ArcSwapOption::empty(),
            routing: Mutex::new(Routing {
                conduits: channels,
                route: Route::Convert(Conversion::Identity),
                scratch: Box::default(),
            }),
            paused: AtomicBool::new(false),
        })
    }

    /// Attach `node` as the input, using the named conversion for its channel count.
    ///
    /// Fails without touching the current input if the node's sample rate
    /// differs from ours or if its channel count has no named conversion.
    pub fn attach(&self, node: Arc<dyn AudioNode>) -> Result<()> {
        self.check_rate(node.as_ref())?;
        let conduits = node.channels();
        self.install(conduits, None, Some(node))?;
        debug!(conduits, channels = self.channels, "attached input");
        Ok(())
    }

    /// Attach `node` as the input, mixing it through an explicit matrix.
    ///
    /// `coefficients` is row-major with `channels()` rows of
    /// `node.channels()` columns, and is copied.
    pub fn attach_with_matrix(&self, node: Arc<dyn AudioNode>, coefficients: &[f32]) -> Result<()> {
        self.check_rate(node.as_ref())?;
        let conduits = node.channels();
        self.install(conduits, Some(coefficients), Some(node))?;
        debug!(conduits, channels = self.channels, "attached input with matrix");
        Ok(())
    }

    /// Detach the input and hand it back. Reads render silence afterwards.
    pub fn detach(&self) -> Option<Arc<dyn AudioNode>> {
        let previous = self.input.swap(None).map(|upstream| Arc::clone(&upstream.0));
        if previous.is_some() {
            debug!("detached input");
        }
        previous
    }

    /// The attached input, if any.
    pub fn input(&self) -> Option<Arc<dyn AudioNode>> {
        self.input.load_full().map(|upstream| Arc::clone(&upstream.0))
    }

    /// Whether an input is attached.
    pub fn is_attached(&self) -> bool {
        self.input.load().is_some()
    }

    /// Expected upstream channel count.
    pub fn conduits(&self) -> usize {
        self.routing.lock().conduits
    }

    /// Change the expected upstream channel count.
    ///
    /// Does nothing if the count is unchanged. Otherwise drops any matrix and
    /// switches to the named conversion for the new count. Re-attach (or
    /// detach first) so the input actually delivers that many channels; until
    /// then reads render silence.
    pub fn set_conduits(&self, conduits: usize) -> Result<()> {
        if self.conduits() == conduits {
            return Ok(());
        }
        self.install(conduits, None, None)?;
        debug!(conduits, "conduits changed");
        Ok(())
    }

    /// Change the expected upstream channel count and mix through `coefficients`.
    pub fn set_conduits_with_matrix(&self, conduits: usize, coefficients: &[f32]) -> Result<()> {
        self.install(conduits, Some(coefficients), None)?;
        debug!(conduits, "conduits changed with matrix");
        Ok(())
    }

    /// Replace the mixing matrix for the current conduit count.
    pub fn set_matrix(&self, coefficients: &[f32]) -> Result<()> {
        self.set_conduits_with_matrix(self.conduits(), coefficients)
    }

    /// A copy of the active matrix, or `None` when a named conversion is in use.
    pub fn matrix(&self) -> Option<RedistributionMatrix> {
        match &self.routing.lock().route {
            Route::Matrix(matrix) => Some(matrix.clone()),
            Route::Convert(_) => None,
        }
    }

    /// Render silence without detaching the input.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Undo [`pause`](Self::pause).
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn check_rate(&self, node: &dyn AudioNode) -> Result<()> {
        if node.rate() != self.rate {
            warn!(expected = self.rate, node = node.rate(), "rejected input at wrong sample rate");
            return Err(Error::RateMismatch {
                expected: self.rate,
                node: node.rate(),
            });
        }
        Ok(())
    }

    /// Build a new routing off the lock, swap it in, and free the old one
    /// after the lock is released. Nothing changes if building fails.
    fn install(
        &self,
        conduits: usize,
        coefficients: Option<&[f32]>,
        node: Option<Arc<dyn AudioNode>>,
    ) -> Result<()> {
        if conduits == 0 {
            return Err(Error::InvalidChannels(conduits));
        }

        let route = match coefficients {
            Some(coefficients) => {
                Route::Matrix(RedistributionMatrix::new(self.channels, conduits, coefficients)?)
            }
            None => Route::Convert(Conversion::select(conduits, self.channels)?),
        };
        let scratch = if conduits > self.channels {
            vec![0.0; self.read_block_size * conduits + conduits].into_boxed_slice()
        } else {
            Box::default()
        };
        let upstream = node.map(|node| Arc::new(Upstream(node)));

        let stale = {
            let mut routing = self.routing.lock();
            routing.conduits = conduits;
            let route = mem::replace(&mut routing.route, route);
            let scratch = mem::replace(&mut routing.scratch, scratch);
            let input = upstream.map(|upstream| self.input.swap(Some(upstream)));
            (route, scratch, input)
        };
        drop(stale);

        Ok(())
    }

    fn with_input<T>(&self, f: impl FnOnce(&dyn AudioNode) -> T) -> Option<T> {
        let input = self.input.load();
        input.as_deref().map(|upstream| f(upstream.0.as_ref()))
    }
}

impl AudioNode for Redistributor {
    fn read(&self, buffer: &mut [f32], frames: usize) -> usize {
        let channels = self.channels;
        let frames = frames.min(buffer.len() / channels);

        // One snapshot per call; never reload mid-read.
        let input = self.input.load();
        let Some(upstream) = input.as_deref() else {
            #[cfg(feature = "warn_on_empty")]
            warn!("redistributor read with nothing attached");
            return silence(buffer, frames, channels);
        };
        if self.paused.load(Ordering::Relaxed) {
            return silence(buffer, frames, channels);
        }
        let node = upstream.0.as_ref();

        let mut routing = self.routing.lock();
        let Routing {
            conduits,
            route,
            scratch,
        } = &mut *routing;
        let conduits = *conduits;

        // The input was swapped or reconfigured under us. Converting now
        // would walk the buffer with the wrong stride.
        if node.channels() != conduits {
            return silence(buffer, frames, channels);
        }

        let mut done = 0;
        if conduits <= channels {
            // Frames only grow, so convert straight in the caller's buffer.
            while done < frames {
                let offset = done * channels;
                let wanted = frames - done;
                let got = node
                    .read(&mut buffer[offset..offset + wanted * conduits], wanted)
                    .min(wanted);
                if got == 0 {
                    break;
                }
                route.apply(&mut buffer[offset..offset + got * channels], got);
                done += got;
            }
        } else {
            // Wider upstream frames: stage them in scratch, shrink, copy out.
            let block = scratch.len() / conduits;
            if block == 0 {
                return silence(buffer, frames, channels);
            }
            while done < frames {
                let wanted = (frames - done).min(block);
                let got = node.read(&mut scratch[..wanted * conduits], wanted).min(wanted);
                if got == 0 {
                    break;
                }
                route.apply(&mut scratch[..got * conduits], got);
                buffer[done * channels..(done + got) * channels]
                    .copy_from_slice(&scratch[..got * channels]);
                done += got;
            }
        }

        done
    }

    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn rate(&self) -> u32 {
        self.rate
    }

    fn completed(&self) -> bool {
        self.with_input(|node| node.completed()).unwrap_or(false)
    }

    fn mark(&self) -> bool {
        self.with_input(|node| node.mark()).unwrap_or(false)
    }

    fn unmark(&self) -> bool {
        self.with_input(|node| node.unmark()).unwrap_or(false)
    }

    fn reset(&self) -> bool {
        self.with_input(|node| node.reset()).unwrap_or(false)
    }

    fn advance(&self, frames: u64) -> Option<u64> {
        self.with_input(|node| node.advance(frames)).flatten()
    }

    fn position(&self) -> Option<u64> {
        self.with_input(|node| node.position()).flatten()
    }

    fn set_position(&self, frame: u64) -> Option<u64> {
        self.with_input(|node| node.set_position(frame)).flatten()
    }

    fn elapsed(&self) -> Option<f64> {
        self.with_input(|node| node.elapsed()).flatten()
    }

    fn set_elapsed(&self, seconds: f64) -> Option<f64> {
        self.with_input(|node| node.set_elapsed(seconds)).flatten()
    }

    fn remaining(&self) -> Option<f64> {
        self.with_input(|node| node.remaining()).flatten()
    }

    fn set_remaining(&self, seconds: f64) -> Option<f64> {
        self.with_input(|node| node.set_remaining(seconds)).flatten()
    }
}

impl fmt::Debug for Redistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routing = self.routing.lock();
        f.debug_struct("Redistributor")
            .field("channels", &self.channels)
            .field("rate", &self.rate)
            .field("conduits", &routing.conduits)
            .field("route", &routing.route)
            .field("attached", &self.is_attached())
            .field("paused", &self.is_paused())
            .finish()
    }
}
