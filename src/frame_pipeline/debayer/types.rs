//! Types for debayering operations

use crate::frame_pipeline::common::buffer::FrameBuffer;
use crate::frame_pipeline::common::colour::ColourLayout;

/// Phase of the 2×2 colour filter tile relative to the first buffer row.
///
/// Each pixel falls on one of four sites:
/// - 0: red sample, blue on the diagonals
/// - 1: green sample, blue above/below, red left/right
/// - 2: green sample, blue left/right, red above/below
/// - 3: blue sample, red on the diagonals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BayerCode {
    bayer_x: usize,
    bayer_y: usize,
}

impl BayerCode {
    /// Returns `None` for layouts the bilinear engine does not handle.
    pub fn for_layout(layout: ColourLayout, height: usize) -> Option<Self> {
        let code = match layout {
            ColourLayout::BayerRggb => 2,
            ColourLayout::BayerGrbg => 3,
            ColourLayout::BayerGbrg => 0,
            ColourLayout::BayerBggr => 1,
            _ => return None,
        };

        // Buffers are stored bottom-up, so odd heights shift the row phase.
        Some(Self {
            bayer_x: code % 2,
            bayer_y: ((code / 2) % 2) ^ (height % 2),
        })
    }

    pub fn site(&self, x: usize, y: usize) -> u32 {
        (((x + self.bayer_x) % 2) + 2 * ((y + self.bayer_y) % 2)) as u32
    }
}

/// Result of a demosaic request.
#[derive(Debug)]
pub enum DemosaicOutcome {
    /// Three-channel samples in blue, green, red order.
    Debayered(FrameBuffer),
    /// The layout or geometry is not demosaiced; the input is handed back.
    NotApplicable(FrameBuffer),
}

impl DemosaicOutcome {
    pub fn is_debayered(&self) -> bool {
        matches!(self, DemosaicOutcome::Debayered(_))
    }

    pub fn into_frame(self) -> FrameBuffer {
        match self {
            DemosaicOutcome::Debayered(frame) | DemosaicOutcome::NotApplicable(frame) => frame,
        }
    }
}
