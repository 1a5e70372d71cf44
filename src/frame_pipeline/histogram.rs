//! Histogram module
//!
//! Counts per-channel intensity distributions on a background worker and
//! renders them as a log-scaled bar graph, so playback never waits on it.

mod engine;
mod render;
mod tables;
pub mod types;

pub use engine::HistogramEngine;
pub use render::render;
pub use tables::normalise_count;
pub use types::{HistogramConfig, HistogramImage, HistogramTables, BUCKETS};
