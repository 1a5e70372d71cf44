//! Common utilities module
//!
//! Shared error type, frame buffers and colour layout tags used across the
//! frame pipeline.

pub mod error;
pub mod buffer;
pub mod colour;

pub use error::{PlayerError, Result};
pub use buffer::{ChannelOrder, FrameBuffer, Sample, Samples};
pub use colour::ColourLayout;
