//! Playback module
//!
//! The state machine that owns the frame index and sequences the read,
//! demosaic, convert, publish and histogram steps once per timer tick.

mod player;
mod timestamp;
mod timing;
pub mod types;


pub use player::Player;
pub use timestamp::timestamp_to_datetime;
pub use timing::{frame_rate_info, FrameRateInfo, FrameTimings, Stage};
pub use types::{FrameRate, PlaybackConfig, PlaybackConfigBuilder, PlaybackState, TickOutcome};
