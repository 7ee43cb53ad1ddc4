//! Picks the conversion between two channel counts.
//!
//! Pairs without a direct kernel are chained through intermediate layouts.
//! A chain only ever moves toward the target (1 -> 2 -> 3, 8 -> 6 -> 2 -> 1),
//! so every intermediate frame fits in a buffer sized for the larger end.

use core::slice;

use itertools::iproduct;

use super::kernels::*;
use crate::error::{Error, Result};
use crate::layout::ChannelLayout;

struct Route {
    src: usize,
    dst: usize,
    path: &'static [&'static Kernel],
}

macro_rules! route {
    ($src:literal -> $dst:literal via [$($kernel:ident),+]) => {
        Route {
            src: $src,
            dst: $dst,
            path: &[$(&$kernel),+],
        }
    };
}

static ROUTES: [Route; 30] = [
    // from mono
    route!(1 -> 2 via [MONO_TO_STEREO]),
    route!(1 -> 3 via [MONO_TO_STEREO, STEREO_TO_TRI]),
    route!(1 -> 4 via [MONO_TO_STEREO, STEREO_TO_QUAD]),
    route!(1 -> 6 via [MONO_TO_STEREO, STEREO_TO_SURROUND51]),
    route!(1 -> 8 via [MONO_TO_STEREO, STEREO_TO_SURROUND51, SURROUND51_TO_SURROUND71]),
    // from stereo
    route!(2 -> 1 via [STEREO_TO_MONO]),
    route!(2 -> 3 via [STEREO_TO_TRI]),
    route!(2 -> 4 via [STEREO_TO_QUAD]),
    route!(2 -> 6 via [STEREO_TO_SURROUND51]),
    route!(2 -> 8 via [STEREO_TO_SURROUND51, SURROUND51_TO_SURROUND71]),
    // from tri
    route!(3 -> 1 via [TRI_TO_STEREO, STEREO_TO_MONO]),
    route!(3 -> 2 via [TRI_TO_STEREO]),
    route!(3 -> 4 via [TRI_TO_QUAD]),
    route!(3 -> 6 via [TRI_TO_SURROUND51]),
    route!(3 -> 8 via [TRI_TO_SURROUND51, SURROUND51_TO_SURROUND71]),
    // from quad
    route!(4 -> 1 via [QUAD_TO_STEREO, STEREO_TO_MONO]),
    route!(4 -> 2 via [QUAD_TO_STEREO]),
    route!(4 -> 3 via [QUAD_TO_TRI]),
    route!(4 -> 6 via [QUAD_TO_SURROUND51]),
    route!(4 -> 8 via [QUAD_TO_SURROUND51, SURROUND51_TO_SURROUND71]),
    // from 5.1
    route!(6 -> 1 via [SURROUND51_TO_STEREO, STEREO_TO_MONO]),
    route!(6 -> 2 via [SURROUND51_TO_STEREO]),
    route!(6 -> 3 via [SURROUND51_TO_TRI]),
    route!(6 -> 4 via [SURROUND51_TO_QUAD]),
    route!(6 -> 8 via [SURROUND51_TO_SURROUND71]),
    // from 7.1
    route!(8 -> 1 via [SURROUND71_TO_SURROUND51, SURROUND51_TO_STEREO, STEREO_TO_MONO]),
    route!(8 -> 2 via [SURROUND71_TO_SURROUND51, SURROUND51_TO_STEREO]),
    route!(8 -> 3 via [SURROUND71_TO_SURROUND51, SURROUND51_TO_TRI]),
    route!(8 -> 4 via [SURROUND71_TO_SURROUND51, SURROUND51_TO_QUAD]),
    route!(8 -> 6 via [SURROUND71_TO_SURROUND51]),
];

/// A conversion between two channel counts, ready to run in place.
#[derive(Clone, Copy, Debug)]
pub enum Conversion {
    /// Counts are equal; the buffer is already in shape.
    Identity,
    /// One kernel does the whole job.
    Direct(&'static Kernel),
    /// Kernels run one after another over the same buffer.
    Composed(&'static [&'static Kernel]),
}

impl Conversion {
    /// Look up the conversion from `src` to `dst` channels.
    ///
    /// Equal counts are always [`Conversion::Identity`], named or not.
    /// Anything else needs both counts to be named layouts.
    pub fn select(src: usize, dst: usize) -> Result<Self> {
        if src == dst {
            return Ok(Self::Identity);
        }

        ROUTES
            .iter()
            .find(|r| r.src == src && r.dst == dst)
            .map(|r| match r.path {
                [kernel] => Self::Direct(*kernel),
                path => Self::Composed(path),
            })
            .ok_or(Error::UnsupportedLayout { src, dst })
    }

    /// The kernels this conversion runs, in order.
    pub fn steps(&self) -> &[&'static Kernel] {
        match self {
            Self::Identity => &[],
            Self::Direct(kernel) => slice::from_ref(kernel),
            Self::Composed(path) => path,
        }
    }

    /// Convert `frames` frames over `buffer`, which must hold
    /// `frames * max(src, dst)` samples.
    #[inline]
    pub fn apply_in_place(&self, buffer: &mut [f32], frames: usize) {
        for kernel in self.steps() {
            kernel.run_in_place(buffer, frames);
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

/// Every `(src, dst)` pair of named layouts, identity pairs included.
pub fn supported_pairs() -> impl Iterator<Item = (usize, usize)> {
    iproduct!(ChannelLayout::ALL, ChannelLayout::ALL)
        .map(|(src, dst)| (src.channel_count(), dst.channel_count()))
}
