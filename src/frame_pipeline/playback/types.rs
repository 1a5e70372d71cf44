//! Playback state and configuration types

use crate::frame_pipeline::common::error::{PlayerError, Result};

/// Lowest selectable fixed frame rate.
pub const MIN_FIXED_FPS: u32 = 1;

/// Highest selectable fixed frame rate.
pub const MAX_FIXED_FPS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NoFile,
    Stopped,
    Playing,
    Paused,
    Finished,
}

/// Source of the display frame interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    /// Derived from the container's declared rate
    FromSource,
    /// Fixed user-selected frames per second
    Fixed(u32),
}

/// Playback settings consulted on every orchestrator call
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Whether Bayer frames are demosaiced (true) or shown as raw mono (false)
    pub debayer: bool,
    /// Whether playback wraps to the first frame after the last
    pub repeat: bool,
    /// Display frame rate selection
    pub frame_rate: FrameRate,
    /// Whether displayed frames are forwarded to the histogram worker
    pub histogram: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            debayer: true,
            repeat: false,
            frame_rate: FrameRate::FromSource,
            histogram: true,
        }
    }
}

impl PlaybackConfig {
    pub fn builder() -> PlaybackConfigBuilder {
        PlaybackConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        match self.frame_rate {
            FrameRate::Fixed(fps) if !(MIN_FIXED_FPS..=MAX_FIXED_FPS).contains(&fps) => {
                Err(PlayerError::InvalidFrameRate(fps))
            }
            _ => Ok(()),
        }
    }
}

/// Builder for PlaybackConfig
#[derive(Default)]
pub struct PlaybackConfigBuilder {
    debayer: Option<bool>,
    repeat: Option<bool>,
    frame_rate: Option<FrameRate>,
    histogram: Option<bool>,
}

impl PlaybackConfigBuilder {
    pub fn debayer(mut self, enable: bool) -> Self {
        self.debayer = Some(enable);
        self
    }

    pub fn repeat(mut self, enable: bool) -> Self {
        self.repeat = Some(enable);
        self
    }

    pub fn frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    pub fn histogram(mut self, enable: bool) -> Self {
        self.histogram = Some(enable);
        self
    }

    pub fn build(self) -> PlaybackConfig {
        let default = PlaybackConfig::default();
        PlaybackConfig {
            debayer: self.debayer.unwrap_or(default.debayer),
            repeat: self.repeat.unwrap_or(default.repeat),
            frame_rate: self.frame_rate.unwrap_or(default.frame_rate),
            histogram: self.histogram.unwrap_or(default.histogram),
        }
    }
}

/// What a timer tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame at this index was displayed
    Displayed(u32),
    /// Repeat wrapped playback back to the first frame
    Wrapped,
    /// The last frame was already shown; playback finished
    Finished,
    /// Not playing; the timer was stopped
    Idle,
}
