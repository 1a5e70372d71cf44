//! Frame pipeline module
//!
//! Decodes frames handed over by a container reader, reconstructs colour from
//! Bayer mosaics, converts them for display and feeds a background histogram
//! worker. The playback orchestrator sequences these stages once per frame.

pub mod common;
pub mod source;
pub mod debayer;
pub mod display;
pub mod histogram;
pub mod playback;
pub mod snapshot;

pub use common::{
    ChannelOrder,
    ColourLayout,
    FrameBuffer,
    PlayerError,
    Result,
    Sample,
    Samples,
};

pub use source::{
    FrameSource,
    SourceInfo,
};

pub use debayer::{
    demosaic,
    BayerCode,
    DemosaicOutcome,
};

pub use display::{
    convert_for_display,
    DisplayImage,
};

pub use histogram::{
    HistogramConfig,
    HistogramEngine,
    HistogramImage,
    HistogramTables,
};

pub use playback::{
    FrameRate,
    FrameRateInfo,
    PlaybackConfig,
    PlaybackConfigBuilder,
    PlaybackState,
    Player,
    TickOutcome,
};

pub use snapshot::{
    SnapshotConfig,
    SnapshotConfigBuilder,
    SnapshotWriter,
    TiffCompression,
    TiffSnapshotWriter,
};
