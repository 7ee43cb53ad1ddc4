//! Sine wave oscillator

use parking_lot::Mutex;

use crate::node::AudioNode;

/// A sine wave oscillator (mono source).
///
/// Never runs out and has no transport.
#[derive(Debug)]
pub struct Sine {
    frequency: f32,
    amplitude: f32,
    sample_rate: u32,
    phase: Mutex<f32>,
}

impl Sine {
    /// `frequency` is clamped to `0..=sample_rate / 2`.
    pub fn new(frequency: f32, sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 / 2.0;
        Self {
            frequency: frequency.clamp(0.0, nyquist),
            amplitude: 0.25, // -12dB, safe default
            sample_rate,
            phase: Mutex::new(0.0),
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl AudioNode for Sine {
    fn read(&self, buffer: &mut [f32], frames: usize) -> usize {
        let frames = frames.min(buffer.len());
        let phase_inc = self.frequency / self.sample_rate as f32;
        let amplitude = self.amplitude;

        let mut phase = self.phase.lock();
        for sample in &mut buffer[..frames] {
            *sample = (*phase * core::f32::consts::TAU).sin() * amplitude;

            *phase += phase_inc;
            // Branchless phase wrap (phase is always positive)
            *phase -= (*phase >= 1.0) as u32 as f32;
        }

        frames
    }

    #[inline]
    fn channels(&self) -> usize {
        1
    }

    #[inline]
    fn rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_rate_cycle() {
        let sine = Sine::new(12_000.0, 48_000).with_amplitude(1.0);
        let mut buf = [0.0; 4];
        assert_eq!(sine.read(&mut buf, 4), 4);

        let expected = [0.0, 1.0, 0.0, -1.0];
        for (got, want) in buf.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{got} != {want}");
        }
    }

    #[test]
    fn never_completes() {
        let sine = Sine::new(440.0, 48_000);
        let mut buf = [0.0; 64];
        for _ in 0..100 {
            assert_eq!(sine.read(&mut buf, 64), 64);
        }
        assert!(!sine.completed());
        assert_eq!(sine.position(), None);
    }

    #[test]
    fn frequency_stops_at_nyquist() {
        let sine = Sine::new(100_000.0, 48_000).with_amplitude(1.0);
        assert_eq!(sine.frequency(), 24_000.0);

        let mut buf = [0.0; 1024];
        for _ in 0..64 {
            sine.read(&mut buf, 1024);
            assert!(buf.iter().all(|s| s.abs() <= 1.0));
        }
        let phase = *sine.phase.lock();
        assert!((0.0..1.0).contains(&phase), "phase drifted to {phase}");
    }
}
