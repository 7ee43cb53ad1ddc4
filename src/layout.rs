//! Named speaker layouts.

/// Individual speaker positions, in the order they appear inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    FrontLeft,
    FrontRight,
    FrontCenter,
    LowFrequency,
    BackLeft,
    BackRight,
    SideLeft,
    SideRight,
}

/// The layouts with a built-in conversion between any two of them.
///
/// Any other channel count needs an explicit
/// [`RedistributionMatrix`](crate::convert::RedistributionMatrix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// 1 channel
    Mono,
    /// 2 channels (FL, FR)
    #[default]
    Stereo,
    /// 3 channels (FL, FR, FC)
    Tri,
    /// 4 channels (FL, FR, BL, BR)
    Quad,
    /// 6 channels (FL, FR, FC, LFE, BL, BR)
    Surround5_1,
    /// 8 channels (FL, FR, FC, LFE, BL, BR, SL, SR)
    Surround7_1,
}

impl ChannelLayout {
    /// Every named layout, smallest first.
    pub const ALL: [ChannelLayout; 6] = [
        Self::Mono,
        Self::Stereo,
        Self::Tri,
        Self::Quad,
        Self::Surround5_1,
        Self::Surround7_1,
    ];

    /// Largest channel count of any named layout.
    pub const MAX_CHANNELS: usize = 8;

    pub const fn channel_count(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Tri => 3,
            Self::Quad => 4,
            Self::Surround5_1 => 6,
            Self::Surround7_1 => 8,
        }
    }

    /// The named layout with exactly `n` channels, if there is one.
    pub const fn from_count(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            3 => Some(Self::Tri),
            4 => Some(Self::Quad),
            6 => Some(Self::Surround5_1),
            8 => Some(Self::Surround7_1),
            _ => None,
        }
    }

    /// Speakers in frame order.
    pub fn channels(&self) -> &'static [Channel] {
        use Channel::*;
        match self {
            Self::Mono => &[FrontCenter],
            Self::Stereo => &[FrontLeft, FrontRight],
            Self::Tri => &[FrontLeft, FrontRight, FrontCenter],
            Self::Quad => &[FrontLeft, FrontRight, BackLeft, BackRight],
            Self::Surround5_1 => &[
                FrontLeft,
                FrontRight,
                FrontCenter,
                LowFrequency,
                BackLeft,
                BackRight,
            ],
            Self::Surround7_1 => &[
                FrontLeft,
                FrontRight,
                FrontCenter,
                LowFrequency,
                BackLeft,
                BackRight,
                SideLeft,
                SideRight,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_speaker_lists() {
        for layout in ChannelLayout::ALL {
            assert_eq!(layout.channels().len(), layout.channel_count());
            assert_eq!(ChannelLayout::from_count(layout.channel_count()), Some(layout));
        }
    }

    #[test]
    fn unnamed_counts() {
        assert_eq!(ChannelLayout::from_count(0), None);
        assert_eq!(ChannelLayout::from_count(5), None);
        assert_eq!(ChannelLayout::from_count(7), None);
        assert_eq!(ChannelLayout::from_count(16), None);
    }
}
