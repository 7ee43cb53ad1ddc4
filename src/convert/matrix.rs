//! Arbitrary linear channel mixes.
//!
//! When the named layouts don't fit, a caller hands over an `M x N` matrix
//! (row-major, `M` outputs by `N` inputs) and every frame is mixed as
//! `out[i] = sum(matrix[i * N + j] * in[j])`.

use alloc::boxed::Box;
use alloc::vec;

use super::select::Conversion;
use crate::error::{Error, Result};

/// An owned mixing matrix with its own one-frame scratch row.
///
/// Each output frame is computed into the scratch row and only then copied
/// over the buffer, so the same buffer can be both source and destination.
#[derive(Clone, Debug, PartialEq)]
pub struct RedistributionMatrix {
    outputs: usize,
    inputs: usize,
    /// `outputs * inputs` coefficients followed by `outputs` scratch floats
    data: Box<[f32]>,
}

impl RedistributionMatrix {
    /// Copy `coefficients` (row-major, `outputs` rows of `inputs`) into a new matrix.
    pub fn new(outputs: usize, inputs: usize, coefficients: &[f32]) -> Result<Self> {
        if outputs == 0 {
            return Err(Error::InvalidChannels(outputs));
        }
        if inputs == 0 {
            return Err(Error::InvalidChannels(inputs));
        }

        let expected = outputs * inputs;
        if coefficients.len() != expected {
            return Err(Error::MatrixSize {
                expected,
                actual: coefficients.len(),
            });
        }

        let mut data = vec![0.0; expected + outputs].into_boxed_slice();
        data[..expected].copy_from_slice(coefficients);

        Ok(Self {
            outputs,
            inputs,
            data,
        })
    }

    /// Square pass-through matrix.
    pub fn identity(channels: usize) -> Result<Self> {
        let mut coefficients = vec![0.0; channels * channels];
        for ch in 0..channels {
            coefficients[ch * channels + ch] = 1.0;
        }
        Self::new(channels, channels, &coefficients)
    }

    /// The matrix equivalent of the named conversion from `src` to `dst` channels.
    ///
    /// Built by pushing a unit impulse on each input channel through the
    /// [`Conversion`] and reading off the column it produces.
    pub fn for_layouts(src: usize, dst: usize) -> Result<Self> {
        let conversion = Conversion::select(src, dst)?;
        let mut coefficients = vec![0.0; src * dst];
        let mut frame = vec![0.0; src.max(dst)];

        for input in 0..src {
            frame.fill(0.0);
            frame[input] = 1.0;
            conversion.apply_in_place(&mut frame, 1);

            for (output, &gain) in frame[..dst].iter().enumerate() {
                coefficients[output * src + input] = gain;
            }
        }

        Self::new(dst, src, &coefficients)
    }

    /// Rows (`M`).
    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Columns (`N`).
    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// The coefficients, row-major.
    #[inline]
    pub fn coefficients(&self) -> &[f32] {
        &self.data[..self.outputs * self.inputs]
    }

    /// Mix `frames` frames in place, growing the channel count (`N < M`).
    ///
    /// Walks from the last frame to the first.
    pub fn scale_up(&mut self, buffer: &mut [f32], frames: usize) {
        debug_assert!(buffer.len() >= frames * self.outputs.max(self.inputs));
        for frame in (0..frames).rev() {
            self.mix_frame(buffer, frame);
        }
    }

    /// Mix `frames` frames in place, shrinking the channel count (`N >= M`).
    ///
    /// Walks from the first frame to the last.
    pub fn scale_down(&mut self, buffer: &mut [f32], frames: usize) {
        debug_assert!(buffer.len() >= frames * self.outputs.max(self.inputs));
        for frame in 0..frames {
            self.mix_frame(buffer, frame);
        }
    }

    /// Mix in place, picking the direction that is safe for this shape.
    #[inline]
    pub fn apply_in_place(&mut self, buffer: &mut [f32], frames: usize) {
        if self.inputs < self.outputs {
            self.scale_up(buffer, frames);
        } else {
            self.scale_down(buffer, frames);
        }
    }

    fn mix_frame(&mut self, buffer: &mut [f32], frame: usize) {
        let (m, n) = (self.outputs, self.inputs);
        let (coefficients, row) = self.data.split_at_mut(m * n);

        let src = &buffer[frame * n..(frame + 1) * n];
        for (out, weights) in row.iter_mut().zip(coefficients.chunks_exact(n)) {
            *out = weights.iter().zip(src).map(|(w, s)| w * s).sum();
        }

        buffer[frame * m..(frame + 1) * m].copy_from_slice(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::kernels::{MONO_TO_STEREO, STEREO_TO_MONO};

    #[test]
    fn rejects_wrong_size() {
        assert_eq!(
            RedistributionMatrix::new(2, 3, &[1.0; 5]).unwrap_err(),
            Error::MatrixSize {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(
            RedistributionMatrix::new(0, 3, &[]).unwrap_err(),
            Error::InvalidChannels(0)
        );
    }

    #[test]
    fn stereo_to_mono_matches_kernel() {
        let mut matrix = RedistributionMatrix::new(1, 2, &[0.5, 0.5]).expect("matrix");
        let input = [0.3, -0.7, 1.0, 0.25, -1.0, -1.0];

        let mut expected = [0.0; 3];
        STEREO_TO_MONO.run(&input, &mut expected, 3);

        let mut buffer = input;
        matrix.scale_down(&mut buffer, 3);
        assert_eq!(&buffer[..3], &expected);
    }

    #[test]
    fn mono_to_stereo_matches_kernel() {
        let mut matrix = RedistributionMatrix::new(2, 1, &[1.0, 1.0]).expect("matrix");
        let input = [0.3, -0.7, 1.0];

        let mut expected = [0.0; 6];
        MONO_TO_STEREO.run(&input, &mut expected, 3);

        let mut buffer = [0.0; 6];
        buffer[..3].copy_from_slice(&input);
        matrix.scale_up(&mut buffer, 3);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn identity_is_a_no_op() {
        let mut matrix = RedistributionMatrix::identity(5).expect("identity");
        let mut buffer: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let original = buffer.clone();
        matrix.apply_in_place(&mut buffer, 4);
        assert_eq!(buffer, original);
    }

    #[test]
    fn swaps_channels() {
        let mut matrix = RedistributionMatrix::new(2, 2, &[0.0, 1.0, 1.0, 0.0]).expect("swap");
        let mut buffer = [1.0, 2.0, 3.0, 4.0];
        matrix.apply_in_place(&mut buffer, 2);
        assert_eq!(buffer, [2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn arbitrary_counts_in_place() {
        // 3 inputs into 5 outputs and back again
        let up: Vec<f32> = (0..15).map(|i| (i % 4) as f32 * 0.25).collect();
        let mut grow = RedistributionMatrix::new(5, 3, &up).expect("3->5");

        let frames = 7;
        let input: Vec<f32> = (0..frames * 3).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut expected = vec![0.0; frames * 5];
        for f in 0..frames {
            for o in 0..5 {
                expected[f * 5 + o] = (0..3).map(|j| up[o * 3 + j] * input[f * 3 + j]).sum();
            }
        }

        let mut buffer = vec![0.0; frames * 5];
        buffer[..input.len()].copy_from_slice(&input);
        grow.apply_in_place(&mut buffer, frames);
        assert_eq!(buffer, expected);

        let down: Vec<f32> = (0..15).map(|i| 1.0 / (i + 1) as f32).collect();
        let mut shrink = RedistributionMatrix::new(3, 5, &down).expect("5->3");
        shrink.apply_in_place(&mut buffer, frames);
        for f in 0..frames {
            for o in 0..3 {
                let want: f32 = (0..5).map(|j| down[o * 5 + j] * expected[f * 5 + j]).sum();
                assert_eq!(buffer[f * 3 + o], want);
            }
        }
    }

    #[test]
    fn layout_matrix_tracks_kernels() {
        let matrix = RedistributionMatrix::for_layouts(6, 2).expect("5.1->stereo");
        assert_eq!(matrix.outputs(), 2);
        assert_eq!(matrix.inputs(), 6);

        let c = matrix.coefficients();
        assert!((c[0] - 1.0 / 2.5).abs() < 1e-6);
        assert!((c[2] - 0.5 / 2.5).abs() < 1e-6);
        assert_eq!(c[3], 0.0);
        assert!((c[4] - 1.0 / 2.5).abs() < 1e-6);
        assert_eq!(c[5], 0.0);
    }
}
