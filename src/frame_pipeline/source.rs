//! Frame source module
//!
//! The boundary to the container reader. Parsing the container byte stream is
//! the implementor's job; the pipeline only sees decoded samples and metadata.

mod reader;
pub mod types;

pub use reader::FrameSource;
pub use types::SourceInfo;
