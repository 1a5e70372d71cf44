//! Sensor colour layout tags reported by the container.

use crate::frame_pipeline::common::buffer::ChannelOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourLayout {
    Mono,
    BayerRggb,
    BayerGrbg,
    BayerGbrg,
    BayerBggr,
    BayerCyym,
    BayerYcmy,
    BayerYmcy,
    BayerMyyc,
    Rgb,
    Bgr,
    /// An id this player does not know; frames are shown as mono.
    Unknown(i32),
}

impl ColourLayout {
    /// Maps the container's numeric colour id.
    pub fn from_id(id: i32) -> Self {
        match id {
            0 => ColourLayout::Mono,
            8 => ColourLayout::BayerRggb,
            9 => ColourLayout::BayerGrbg,
            10 => ColourLayout::BayerGbrg,
            11 => ColourLayout::BayerBggr,
            16 => ColourLayout::BayerCyym,
            17 => ColourLayout::BayerYcmy,
            18 => ColourLayout::BayerYmcy,
            19 => ColourLayout::BayerMyyc,
            100 => ColourLayout::Rgb,
            101 => ColourLayout::Bgr,
            other => ColourLayout::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColourLayout::Mono => "MONO",
            ColourLayout::BayerRggb => "RGGB",
            ColourLayout::BayerGrbg => "GRBG",
            ColourLayout::BayerGbrg => "GBRG",
            ColourLayout::BayerBggr => "BGGR",
            ColourLayout::BayerCyym => "CYYM",
            ColourLayout::BayerYcmy => "YCMY",
            ColourLayout::BayerYmcy => "YMCY",
            ColourLayout::BayerMyyc => "MYYC",
            ColourLayout::Rgb => "RGB",
            ColourLayout::Bgr => "BGR",
            ColourLayout::Unknown(_) => "????",
        }
    }

    /// Interleaved channels per pixel in a frame read from the container.
    pub fn frame_channels(&self) -> usize {
        match self {
            ColourLayout::Rgb | ColourLayout::Bgr => 3,
            _ => 1,
        }
    }

    pub fn channel_order(&self) -> ChannelOrder {
        match self {
            ColourLayout::Bgr => ChannelOrder::Bgr,
            _ => ChannelOrder::Rgb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trips_labels() {
        let expected = [
            (0, "MONO"),
            (8, "RGGB"),
            (9, "GRBG"),
            (10, "GBRG"),
            (11, "BGGR"),
            (16, "CYYM"),
            (19, "MYYC"),
            (100, "RGB"),
            (101, "BGR"),
            (42, "????"),
        ];
        for (id, label) in expected {
            assert_eq!(ColourLayout::from_id(id).label(), label);
        }
    }

    #[test]
    fn test_only_native_colour_layouts_are_three_channel() {
        assert_eq!(ColourLayout::Rgb.frame_channels(), 3);
        assert_eq!(ColourLayout::Bgr.frame_channels(), 3);
        assert_eq!(ColourLayout::BayerRggb.frame_channels(), 1);
        assert_eq!(ColourLayout::Mono.frame_channels(), 1);
        assert_eq!(ColourLayout::Bgr.channel_order(), ChannelOrder::Bgr);
    }
}
