use std::io::Write;

use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::display::types::DisplayImage;
use crate::frame_pipeline::snapshot::types::SnapshotConfig;

pub trait SnapshotWriter {
    fn write_image(&self, image: &DisplayImage, output: &mut dyn Write, config: &SnapshotConfig) -> Result<()>;
}
