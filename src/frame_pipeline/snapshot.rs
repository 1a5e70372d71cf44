//! Snapshot module
//!
//! Saves the displayed frame or the histogram graph as an 8-bit RGB TIFF.

mod tiff_writer;
pub mod types;
mod writer;

pub use tiff_writer::TiffSnapshotWriter;
pub use types::{SnapshotConfig, SnapshotConfigBuilder, TiffCompression};
pub use writer::SnapshotWriter;
