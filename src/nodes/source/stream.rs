//! Ring-buffer fed source for audio produced on another thread.

use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::node::AudioNode;

/// Plays interleaved samples pushed through a [`StreamFeed`].
///
/// The producer side usually lives on a decoder or network thread. If it falls
/// behind, the missing frames are rendered as silence and counted as read, so
/// a hiccup doesn't end playback. Once the feed is dropped and the ring is
/// drained, reads come up short and the source reports itself completed.
pub struct StreamSource {
    consumer: Mutex<Consumer<f32>>,
    channels: usize,
    sample_rate: u32,
}

/// Producer half of a [`StreamSource`].
pub struct StreamFeed {
    producer: Producer<f32>,
    channels: usize,
}

impl StreamSource {
    /// Create a source with room for `capacity` frames in flight.
    pub fn new(channels: usize, sample_rate: u32, capacity: usize) -> (Self, StreamFeed) {
        let channels = channels.max(1);
        let (producer, consumer) = RingBuffer::new(capacity.max(1) * channels);

        let source = Self {
            consumer: Mutex::new(consumer),
            channels,
            sample_rate,
        };
        let feed = StreamFeed { producer, channels };
        (source, feed)
    }

    /// Whole frames waiting in the ring.
    pub fn buffered(&self) -> usize {
        self.consumer.lock().slots() / self.channels
    }
}

impl StreamFeed {
    /// Push as many whole frames of `samples` as fit. Returns the frames pushed.
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let ch = self.channels;
        let frames = (samples.len() / ch).min(self.producer.slots() / ch);
        if frames == 0 {
            return 0;
        }

        let Ok(mut chunk) = self.producer.write_chunk(frames * ch) else {
            return 0;
        };
        let (first, second) = chunk.as_mut_slices();
        let split = first.len();
        first.copy_from_slice(&samples[..split]);
        second.copy_from_slice(&samples[split..split + second.len()]);
        chunk.commit_all();

        frames
    }

    /// Free space in whole frames.
    pub fn available(&self) -> usize {
        self.producer.slots() / self.channels
    }
}

impl AudioNode for StreamSource {
    fn read(&self, buffer: &mut [f32], frames: usize) -> usize {
        let ch = self.channels;
        let frames = frames.min(buffer.len() / ch);

        let mut consumer = self.consumer.lock();
        // Check before looking at the slots so a final push can't slip between.
        let abandoned = consumer.is_abandoned();
        let ready = (consumer.slots() / ch).min(frames);

        if ready > 0 {
            if let Ok(chunk) = consumer.read_chunk(ready * ch) {
                let (first, second) = chunk.as_slices();
                buffer[..first.len()].copy_from_slice(first);
                buffer[first.len()..ready * ch].copy_from_slice(second);
                chunk.commit_all();
            }
        }

        if abandoned {
            return ready;
        }

        // underrun
        buffer[ready * ch..frames * ch].fill(0.0);
        frames
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
        let consumer = self.consumer.lock();
        consumer.is_abandoned() && consumer.slots() < self.channels
    }
}
