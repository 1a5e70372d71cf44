use std::path::Path;

use crate::frame_pipeline::common::buffer::Samples;
use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::source::types::SourceInfo;

/// A container of sequential frames.
///
/// The player serialises every call behind one lock, so implementations need
/// no internal synchronisation.
pub trait FrameSource: Send {
    /// Opens `path` and returns its frame count.
    ///
    /// A failed open must leave any previously opened file readable; the
    /// player keeps playing it when the new file is rejected. Containers with
    /// no frames or unusable geometry should be refused here. If one is
    /// accepted anyway the player closes the source and drops to NoFile.
    fn open(&mut self, path: &Path) -> Result<u32>;

    fn close(&mut self);

    /// Reads the frame at the 1-based `index`.
    ///
    /// Mono and mosaiced frames hold one sample per pixel, RGB/BGR frames
    /// three.
    fn read_frame(&mut self, index: u32) -> Result<Samples>;

    /// Timestamp of the most recently read frame, `None` when the container
    /// carries none.
    fn timestamp(&self) -> Option<u64>;

    fn info(&self) -> SourceInfo;
}
