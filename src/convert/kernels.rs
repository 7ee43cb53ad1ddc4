//! Fixed conversions between the named channel layouts.
//!
//! Each [`Kernel`] converts one layout to another, one frame at a time.
//! The mixing weights are tuned by ear rather than taken from a broadcast
//! standard, so the numbers below are load-bearing: center channels spread
//! 55% into the fronts of a tri layout and 50% everywhere else, and each mix
//! is divided back down by the total weight that went into it.
//!
//! # In place
//!
//! [`Kernel::run_in_place`] converts a buffer over itself. A downmix writes
//! frame `i` no further than where frame `i` was read from, so it walks
//! forward. An upmix writes frame `i` past the start of frame `i + 1`, so it
//! walks backward from the last frame. Either way the source frame is copied
//! aside before the destination frame is written.

use core::fmt;

use crate::layout::ChannelLayout;

/// Converts one source frame into one destination frame.
pub type FrameFn = fn(&[f32], &mut [f32]);

/// Weight of the center channel when it is folded into a tri-layout front.
pub const TRI_CENTER_SPREAD: f32 = 0.55;
/// Weight of a center or side channel folded into its neighbours.
pub const CENTER_SPREAD: f32 = 0.5;
/// Normalization for a channel that absorbed one half-weight neighbour.
pub const SPREAD_NORM: f32 = 1.5;
/// Normalization for a 5.1 front that absorbed half a center and a back.
pub const SURROUND_NORM: f32 = 2.5;

/// A single-step conversion between two named layouts.
pub struct Kernel {
    name: &'static str,
    src: usize,
    dst: usize,
    frame: FrameFn,
}

impl Kernel {
    const fn new(name: &'static str, src: usize, dst: usize, frame: FrameFn) -> Self {
        Self {
            name,
            src,
            dst,
            frame,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Source channel count.
    #[inline]
    pub fn src(&self) -> usize {
        self.src
    }

    /// Destination channel count.
    #[inline]
    pub fn dst(&self) -> usize {
        self.dst
    }

    /// `true` if the kernel shrinks frames (and so runs forward in place).
    #[inline]
    pub fn is_downmix(&self) -> bool {
        self.dst < self.src
    }

    /// Convert `frames` frames from `input` into a separate `output`.
    ///
    /// `input` holds `frames * src` samples and `output` room for
    /// `frames * dst`.
    pub fn run(&self, input: &[f32], output: &mut [f32], frames: usize) {
        debug_assert!(input.len() >= frames * self.src);
        debug_assert!(output.len() >= frames * self.dst);

        for (src, dst) in input
            .chunks_exact(self.src)
            .zip(output.chunks_exact_mut(self.dst))
            .take(frames)
        {
            (self.frame)(src, dst);
        }
    }

    /// Convert `frames` frames over the same buffer.
    ///
    /// `buffer` must hold `frames * max(src, dst)` samples; the converted
    /// frames end up packed at the front.
    pub fn run_in_place(&self, buffer: &mut [f32], frames: usize) {
        let (src, dst) = (self.src, self.dst);
        debug_assert!(buffer.len() >= frames * src.max(dst));

        let mut frame = [0.0f32; ChannelLayout::MAX_CHANNELS];
        let mut step = |i: usize| {
            frame[..src].copy_from_slice(&buffer[i * src..(i + 1) * src]);
            (self.frame)(&frame[..src], &mut buffer[i * dst..(i + 1) * dst]);
        };

        if self.is_downmix() {
            (0..frames).for_each(&mut step);
        } else {
            (0..frames).rev().for_each(&mut step);
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("name", &self.name)
            .field("src", &self.src)
            .field("dst", &self.dst)
            .finish()
    }
}

// mono <-> stereo

fn mono_to_stereo(i: &[f32], o: &mut [f32]) {
    o[0] = i[0];
    o[1] = i[0];
}

fn stereo_to_mono(i: &[f32], o: &mut [f32]) {
    o[0] = (i[0] + i[1]) * 0.5;
}

// stereo <-> tri

fn stereo_to_tri(i: &[f32], o: &mut [f32]) {
    o[0] = i[0];
    o[1] = i[1];
    o[2] = (i[0] + i[1]) * 0.5;
}

fn tri_to_stereo(i: &[f32], o: &mut [f32]) {
    let center = TRI_CENTER_SPREAD * i[2];
    o[0] = (i[0] + center) / SPREAD_NORM;
    o[1] = (i[1] + center) / SPREAD_NORM;
}

// stereo <-> quad

fn stereo_to_quad(i: &[f32], o: &mut [f32]) {
    o[0] = i[0];
    o[1] = i[1];
    o[2] = i[0];
    o[3] = i[1];
}

fn quad_to_stereo(i: &[f32], o: &mut [f32]) {
    o[0] = (i[0] + i[2]) * 0.5;
    o[1] = (i[1] + i[3]) * 0.5;
}

// tri <-> quad, same arithmetic as going through stereo

fn tri_to_quad(i: &[f32], o: &mut [f32]) {
    let center = TRI_CENTER_SPREAD * i[2];
    let left = (i[0] + center) / SPREAD_NORM;
    let right = (i[1] + center) / SPREAD_NORM;
    o[0] = left;
    o[1] = right;
    o[2] = left;
    o[3] = right;
}

fn quad_to_tri(i: &[f32], o: &mut [f32]) {
    let left = (i[0] + i[2]) * 0.5;
    let right = (i[1] + i[3]) * 0.5;
    o[0] = left;
    o[1] = right;
    o[2] = (left + right) * 0.5;
}

// 5.1 <-> stereo

fn stereo_to_surround51(i: &[f32], o: &mut [f32]) {
    o[0] = i[0];
    o[1] = i[1];
    o[2] = (i[0] + i[1]) * 0.5;
    // LFE is left to whoever authored it
    o[3] = 0.0;
    o[4] = i[0];
    o[5] = i[1];
}

fn surround51_to_stereo(i: &[f32], o: &mut [f32]) {
    let center = CENTER_SPREAD * i[2];
    o[0] = (i[0] + center + i[4]) / SURROUND_NORM;
    o[1] = (i[1] + center + i[5]) / SURROUND_NORM;
}

// 5.1 <-> tri

fn tri_to_surround51(i: &[f32], o: &mut [f32]) {
    o[0] = i[0];
    o[1] = i[1];
    o[2] = i[2];
    o[3] = 0.0;
    o[4] = i[0] / SPREAD_NORM;
    o[5] = i[1] / SPREAD_NORM;
}

fn surround51_to_tri(i: &[f32], o: &mut [f32]) {
    let center = i[2];
    o[0] = (i[0] + i[4]) * 0.5;
    o[1] = (i[1] + i[5]) * 0.5;
    o[2] = center;
}

// 5.1 <-> quad

fn quad_to_surround51(i: &[f32], o: &mut [f32]) {
    let (bl, br) = (i[2], i[3]);
    o[0] = i[0];
    o[1] = i[1];
    o[2] = (i[0] + i[1]) * 0.5;
    o[3] = 0.0;
    o[4] = bl;
    o[5] = br;
}

fn surround51_to_quad(i: &[f32], o: &mut [f32]) {
    let center = CENTER_SPREAD * i[2];
    o[0] = (i[0] + center) / SPREAD_NORM;
    o[1] = (i[1] + center) / SPREAD_NORM;
    o[2] = i[4] / SPREAD_NORM;
    o[3] = i[5] / SPREAD_NORM;
}

// 7.1 <-> 5.1

fn surround51_to_surround71(i: &[f32], o: &mut [f32]) {
    o[..6].copy_from_slice(&i[..6]);
    o[6] = (i[0] + i[4]) * 0.5;
    o[7] = (i[1] + i[5]) * 0.5;
}

fn surround71_to_surround51(i: &[f32], o: &mut [f32]) {
    let side_left = CENTER_SPREAD * i[6];
    let side_right = CENTER_SPREAD * i[7];
    o[0] = (i[0] + side_left) / SPREAD_NORM;
    o[1] = (i[1] + side_right) / SPREAD_NORM;
    o[2] = i[2] / SPREAD_NORM;
    o[3] = i[3] / SPREAD_NORM;
    o[4] = (i[4] + side_left) / SPREAD_NORM;
    o[5] = (i[5] + side_right) / SPREAD_NORM;
}

pub static MONO_TO_STEREO: Kernel = Kernel::new("mono->stereo", 1, 2, mono_to_stereo);
pub static STEREO_TO_MONO: Kernel = Kernel::new("stereo->mono", 2, 1, stereo_to_mono);
pub static STEREO_TO_TRI: Kernel = Kernel::new("stereo->tri", 2, 3, stereo_to_tri);
pub static TRI_TO_STEREO: Kernel = Kernel::new("tri->stereo", 3, 2, tri_to_stereo);
pub static STEREO_TO_QUAD: Kernel = Kernel::new("stereo->quad", 2, 4, stereo_to_quad);
pub static QUAD_TO_STEREO: Kernel = Kernel::new("quad->stereo", 4, 2, quad_to_stereo);
pub static TRI_TO_QUAD: Kernel = Kernel::new("tri->quad", 3, 4, tri_to_quad);
pub static QUAD_TO_TRI: Kernel = Kernel::new("quad->tri", 4, 3, quad_to_tri);
pub static STEREO_TO_SURROUND51: Kernel =
    Kernel::new("stereo->5.1", 2, 6, stereo_to_surround51);
pub static SURROUND51_TO_STEREO: Kernel =
    Kernel::new("5.1->stereo", 6, 2, surround51_to_stereo);
pub static TRI_TO_SURROUND51: Kernel = Kernel::new("tri->5.1", 3, 6, tri_to_surround51);
pub static SURROUND51_TO_TRI: Kernel = Kernel::new("5.1->tri", 6, 3, surround51_to_tri);
pub static QUAD_TO_SURROUND51: Kernel = Kernel::new("quad->5.1", 4, 6, quad_to_surround51);
pub static SURROUND51_TO_QUAD: Kernel = Kernel::new("5.1->quad", 6, 4, surround51_to_quad);
pub static SURROUND51_TO_SURROUND71: Kernel =
    Kernel::new("5.1->7.1", 6, 8, surround51_to_surround71);
pub static SURROUND71_TO_SURROUND51: Kernel =
    Kernel::new("7.1->5.1", 8, 6, surround71_to_surround51);

/// Every single-step kernel.
pub static KERNELS: [&Kernel; 16] = [
    &MONO_TO_STEREO,
    &STEREO_TO_MONO,
    &STEREO_TO_TRI,
    &TRI_TO_STEREO,
    &STEREO_TO_QUAD,
    &QUAD_TO_STEREO,
    &TRI_TO_QUAD,
    &QUAD_TO_TRI,
    &STEREO_TO_SURROUND51,
    &SURROUND51_TO_STEREO,
    &TRI_TO_SURROUND51,
    &SURROUND51_TO_TRI,
    &QUAD_TO_SURROUND51,
    &SURROUND51_TO_QUAD,
    &SURROUND51_TO_SURROUND71,
    &SURROUND71_TO_SURROUND51,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i * 37 % 101) as f32 / 50.0) - 1.0).collect()
    }

    fn convert(kernel: &Kernel, input: &[f32]) -> Vec<f32> {
        let frames = input.len() / kernel.src();
        let mut out = vec![0.0; frames * kernel.dst()];
        kernel.run(input, &mut out, frames);
        out
    }

    #[test]
    fn stereo_mono_round_trip() {
        let mono = convert(&STEREO_TO_MONO, &[1.0, 1.0]);
        assert_eq!(mono, [1.0]);
        assert_eq!(convert(&MONO_TO_STEREO, &mono), [1.0, 1.0]);
    }

    #[test]
    fn tri_center_spread() {
        let out = convert(&TRI_TO_STEREO, &[0.0, 0.0, 1.0]);
        assert_eq!(out, [0.55 / 1.5, 0.55 / 1.5]);

        let out = convert(&STEREO_TO_TRI, &[1.0, 0.0]);
        assert_eq!(out, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn surround51_to_stereo_weights() {
        // FL, FR, FC, LFE, BL, BR
        let out = convert(&SURROUND51_TO_STEREO, &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(out, [2.5 / 2.5, 0.5 / 2.5]);
    }

    #[test]
    fn lfe_is_never_synthesized() {
        for kernel in [&STEREO_TO_SURROUND51, &TRI_TO_SURROUND51, &QUAD_TO_SURROUND51] {
            let input = vec![1.0; kernel.src()];
            assert_eq!(convert(kernel, &input)[3], 0.0, "{}", kernel.name());
        }
    }

    #[test]
    fn surround71_folds_sides() {
        let input = [0.0, 0.0, 0.3, 0.6, 0.0, 0.0, 1.0, 0.0];
        let out = convert(&SURROUND71_TO_SURROUND51, &input);
        assert_eq!(out, [0.5 / 1.5, 0.0, 0.3 / 1.5, 0.6 / 1.5, 0.5 / 1.5, 0.0]);

        let out = convert(&SURROUND51_TO_SURROUND71, &[1.0, 0.0, 0.5, 0.25, 0.0, 1.0]);
        assert_eq!(out, [1.0, 0.0, 0.5, 0.25, 0.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn tri_quad_match_stereo_detour() {
        let tri = ramp(3 * 5);
        let direct = convert(&TRI_TO_QUAD, &tri);
        let detour = convert(&STEREO_TO_QUAD, &convert(&TRI_TO_STEREO, &tri));
        assert_eq!(direct, detour);

        let quad = ramp(4 * 5);
        let direct = convert(&QUAD_TO_TRI, &quad);
        let detour = convert(&STEREO_TO_TRI, &convert(&QUAD_TO_STEREO, &quad));
        assert_eq!(direct, detour);
    }

    #[test]
    fn in_place_matches_separate_buffers() {
        for kernel in KERNELS {
            for frames in [1, 7, 1024] {
                let input = ramp(frames * kernel.src());
                let expected = convert(kernel, &input);

                let mut buffer = vec![0.0; frames * kernel.src().max(kernel.dst())];
                buffer[..input.len()].copy_from_slice(&input);
                kernel.run_in_place(&mut buffer, frames);

                assert_eq!(
                    &buffer[..frames * kernel.dst()],
                    &expected[..],
                    "{} over {} frames",
                    kernel.name(),
                    frames
                );
            }
        }
    }

    #[test]
    fn kernels_only_connect_named_layouts() {
        for kernel in KERNELS {
            assert!(ChannelLayout::from_count(kernel.src()).is_some());
            assert!(ChannelLayout::from_count(kernel.dst()).is_some());
            assert_ne!(kernel.src(), kernel.dst());
        }
    }
}
