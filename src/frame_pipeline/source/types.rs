//! Frame source metadata types

use crate::frame_pipeline::common::colour::ColourLayout;

/// Metadata of the currently open container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Width of a frame in pixels
    pub width: usize,
    /// Height of a frame in pixels
    pub height: usize,
    /// Storage width of one sample (1 or 2)
    pub bytes_per_sample: u32,
    /// Sensor colour layout
    pub colour: ColourLayout,
    /// Declared frame rate numerator, 0 when absent
    pub fps_rate: i32,
    /// Declared frame rate denominator
    pub fps_scale: i32,
}
