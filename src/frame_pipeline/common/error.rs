use thiserror::Error;

use crate::frame_pipeline::playback::PlaybackState;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Invalid source file {path}: {reason}")]
    InvalidSource { path: String, reason: String },

    #[error("Failed to read frame {index}: {reason}")]
    FrameRead { index: u32, reason: String },

    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Frame buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unsupported bytes per sample: {0}")]
    UnsupportedSampleWidth(u32),

    #[error("Failed to allocate {0} bytes for frame buffer")]
    Allocation(usize),

    #[error("No file is open")]
    NoFileOpen,

    #[error("Frame rate override must be between 1 and 200 fps, got {0}")]
    InvalidFrameRate(u32),

    #[error("Histogram computation already in progress")]
    HistogramBusy,

    #[error("Histogram worker has shut down")]
    HistogramWorkerGone,

    #[error("Frame source lock poisoned")]
    SourceLockPoisoned,

    #[error("Snapshot unavailable while {0:?}")]
    SnapshotUnavailable(PlaybackState),

    #[error("No frame has been displayed yet")]
    NoFrameDisplayed,

    #[error("No histogram has been rendered yet")]
    NoHistogram,

    #[error("Failed to encode snapshot: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
