//! Audio sample player

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::node::AudioNode;

#[derive(Debug, Default)]
struct Cursor {
    /// Next frame to play
    position: u64,
    mark: Option<u64>,
}

/// Plays pre-decoded interleaved samples.
///
/// Supports the full transport: marking, seeking by frame or by seconds, and
/// looping. Without looping the last read comes up short and every read after
/// it returns `0`.
///
/// For streaming large files, use a [`StreamSource`](super::StreamSource)
/// fed by a decoder thread instead.
#[derive(Debug)]
pub struct SamplePlayer {
    samples: Box<[f32]>,
    channels: usize,
    sample_rate: u32,
    frames: u64,
    cursor: Mutex<Cursor>,
    looping: AtomicBool,
}

impl SamplePlayer {
    /// Create a player from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn new(samples: Vec<f32>, channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let mut samples = samples;
        samples.truncate(samples.len() / channels * channels);
        let frames = (samples.len() / channels) as u64;

        Self {
            samples: samples.into_boxed_slice(),
            channels,
            sample_rate,
            frames,
            cursor: Mutex::new(Cursor::default()),
            looping: AtomicBool::new(false),
        }
    }

    /// Set looping mode (builder pattern).
    pub fn with_looping(self, looping: bool) -> Self {
        self.set_looping(looping);
        self
    }

    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Relaxed)
    }

    /// Length of the clip in frames.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Length of the clip in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.to_secs(self.frames)
    }

    #[inline]
    fn to_secs(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate as f64
    }

    #[inline]
    fn to_frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64) as u64
    }

    fn seek(&self, frame: u64) -> u64 {
        let mut cursor = self.cursor.lock();
        cursor.position = frame.min(self.frames);
        cursor.position
    }
}

impl AudioNode for SamplePlayer {
    fn read(&self, buffer: &mut [f32], frames: usize) -> usize {
        let ch = self.channels;
        let frames = frames.min(buffer.len() / ch);
        let total = self.frames as usize;
        let looping = self.is_looping();

        let mut cursor = self.cursor.lock();
        let mut done = 0;
        while done < frames {
            if cursor.position >= self.frames {
                if looping && total > 0 {
                    cursor.position = 0;
                } else {
                    break;
                }
            }

            let start = cursor.position as usize;
            let n = (frames - done).min(total - start);
            buffer[done * ch..(done + n) * ch]
                .copy_from_slice(&self.samples[start * ch..(start + n) * ch]);
            cursor.position += n as u64;
            done += n;
        }

        done
    }

    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn rate(&self) -> u32 {
        self.sample_rate
    }

    fn completed(&self) -> bool {
        !self.is_looping() && self.cursor.lock().position >= self.frames
    }

    fn mark(&self) -> bool {
        let mut cursor = self.cursor.lock();
        cursor.mark = Some(cursor.position);
        true
    }

    fn unmark(&self) -> bool {
        self.cursor.lock().mark = None;
        true
    }

    fn reset(&self) -> bool {
        let mut cursor = self.cursor.lock();
        cursor.position = cursor.mark.unwrap_or(0);
        true
    }

    fn advance(&self, frames: u64) -> Option<u64> {
        let mut cursor = self.cursor.lock();
        let before = cursor.position;
        cursor.position = before.saturating_add(frames).min(self.frames);
        Some(cursor.position - before)
    }

    fn position(&self) -> Option<u64> {
        Some(self.cursor.lock().position)
    }

    fn set_position(&self, frame: u64) -> Option<u64> {
        Some(self.seek(frame))
    }

    fn elapsed(&self) -> Option<f64> {
        Some(self.to_secs(self.cursor.lock().position))
    }

    fn set_elapsed(&self, seconds: f64) -> Option<f64> {
        let position = self.seek(self.to_frames(seconds));
        Some(self.to_secs(position))
    }

    fn remaining(&self) -> Option<f64> {
        let position = self.cursor.lock().position;
        Some(self.to_secs(self.frames - position))
    }

    fn set_remaining(&self, seconds: f64) -> Option<f64> {
        let target = self.frames.saturating_sub(self.to_frames(seconds));
        let position = self.seek(target);
        Some(self.to_secs(self.frames - position))
    }
}
