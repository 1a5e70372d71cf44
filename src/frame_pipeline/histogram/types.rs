//! Histogram types and configuration

use std::time::Duration;

use crate::frame_pipeline::display::types::DisplayImage;

/// Buckets per channel, one per 8-bit intensity.
pub const BUCKETS: usize = 256;

/// Graph height of a mono histogram.
pub const MONO_BAND_HEIGHT: usize = 150;

/// Height of each of the three stacked bands of a colour histogram.
pub const COLOUR_BAND_HEIGHT: usize = 100;

/// Rows left free between a bar's tallest extent and its band edge.
pub const BAND_MARGIN: usize = 13;

/// Per-channel bucket tables, either raw counts or normalised bar heights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramTables {
    Mono {
        grey: [u32; BUCKETS],
    },
    Colour {
        red: [u32; BUCKETS],
        green: [u32; BUCKETS],
        blue: [u32; BUCKETS],
    },
}

impl HistogramTables {
    pub fn is_colour(&self) -> bool {
        matches!(self, HistogramTables::Colour { .. })
    }

    /// Tables in graph band order, top band first.
    pub fn bands(&self) -> Vec<&[u32; BUCKETS]> {
        match self {
            HistogramTables::Mono { grey } => vec![grey],
            HistogramTables::Colour { red, green, blue } => vec![red, green, blue],
        }
    }

    pub fn band_height(&self) -> usize {
        if self.is_colour() {
            COLOUR_BAND_HEIGHT
        } else {
            MONO_BAND_HEIGHT
        }
    }

    /// Largest bucket across every channel.
    pub fn max_count(&self) -> u32 {
        self.bands()
            .into_iter()
            .flat_map(|table| table.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Configuration for the histogram worker
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Pause after each rendered histogram before the next request is accepted
    pub quiescent: Duration,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            quiescent: Duration::from_millis(50),
        }
    }
}

impl HistogramConfig {
    pub fn with_quiescent(mut self, quiescent: Duration) -> Self {
        self.quiescent = quiescent;
        self
    }
}

/// A finished histogram computation.
#[derive(Debug, Clone)]
pub struct HistogramImage {
    /// Raw bucket counts
    pub counts: HistogramTables,
    /// Rendered graph
    pub image: DisplayImage,
    /// Number of histograms the worker has produced, this one included
    pub run: u64,
}
