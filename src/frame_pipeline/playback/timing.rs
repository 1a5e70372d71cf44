use std::time::{Duration, Instant};

use tracing::debug;

use crate::frame_pipeline::playback::types::FrameRate;
use crate::frame_pipeline::source::types::SourceInfo;

/// Frame interval used when the container declares no rate (~50 fps).
const DEFAULT_FRAME_TIME_MS: u64 = 20;

/// Display timing derived from the container and the rate selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRateInfo {
    /// Delay between displayed frames, whole milliseconds
    pub interval: Duration,
    /// Frames per second shown to the user, rounded to 2 decimals
    pub fps: f64,
}

/// Computes the timer interval for `info` under `frame_rate`.
pub fn frame_rate_info(info: &SourceInfo, frame_rate: FrameRate) -> FrameRateInfo {
    match frame_rate {
        FrameRate::FromSource if info.fps_rate > 0 => {
            let scale = info.fps_scale.max(1) as f64;
            let frame_time = ((1000.0 * scale) / info.fps_rate as f64 + 0.5).floor();
            let fps = info.fps_rate as f64 / scale;
            FrameRateInfo {
                interval: Duration::from_millis(frame_time as u64),
                fps: (fps * 100.0 + 0.5).floor() / 100.0,
            }
        }
        FrameRate::FromSource => FrameRateInfo {
            interval: Duration::from_millis(DEFAULT_FRAME_TIME_MS),
            fps: 1000.0 / DEFAULT_FRAME_TIME_MS as f64,
        },
        FrameRate::Fixed(fps) => {
            let frame_time = (1000.0 / fps.max(1) as f64 + 0.5).floor();
            FrameRateInfo {
                interval: Duration::from_millis(frame_time as u64),
                fps: fps as f64,
            }
        }
    }
}

/// Pipeline stages timed for each displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadFrame,
    Demosaic,
    Convert,
}

/// Stage durations of one displayed frame; skipped stages stay `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameTimings {
    index: u32,
    read_frame: Option<Duration>,
    demosaic: Option<Duration>,
    convert: Option<Duration>,
}

impl FrameTimings {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Runs `step` and records its duration against `stage`.
    pub fn measure<T>(&mut self, stage: Stage, step: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = step();
        self.record(stage, start.elapsed());
        value
    }

    pub fn record(&mut self, stage: Stage, duration: Duration) {
        *self.slot(stage) = Some(duration);
    }

    pub fn get(&self, stage: Stage) -> Option<Duration> {
        match stage {
            Stage::ReadFrame => self.read_frame,
            Stage::Demosaic => self.demosaic,
            Stage::Convert => self.convert,
        }
    }

    /// The frame these timings belong to.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn total_duration(&self) -> Duration {
        [self.read_frame, self.demosaic, self.convert]
            .into_iter()
            .flatten()
            .sum()
    }

    pub fn log_summary(&self) {
        let ms = |d: Option<Duration>| d.map(|d| d.as_secs_f64() * 1000.0).unwrap_or(0.0);
        debug!(
            "frame {}: read {:.3}ms, demosaic {:.3}ms, convert {:.3}ms, total {:.3}ms",
            self.index,
            ms(self.read_frame),
            ms(self.demosaic),
            ms(self.convert),
            ms(Some(self.total_duration()))
        );
    }

    fn slot(&mut self, stage: Stage) -> &mut Option<Duration> {
        match stage {
            Stage::ReadFrame => &mut self.read_frame,
            Stage::Demosaic => &mut self.demosaic,
            Stage::Convert => &mut self.convert,
        }
    }
}
