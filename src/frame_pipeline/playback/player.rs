use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, info, info_span, instrument, warn};

use crate::frame_pipeline::{
    common::buffer::{FrameBuffer, Samples},
    common::error::{PlayerError, Result},
    debayer::demosaic,
    display::{convert_for_display, DisplayImage},
    histogram::{HistogramConfig, HistogramEngine, HistogramImage},
    playback::timestamp::timestamp_to_datetime,
    playback::timing::{frame_rate_info, FrameRateInfo, FrameTimings, Stage},
    playback::types::{PlaybackConfig, PlaybackState, TickOutcome},
    snapshot::{SnapshotConfig, SnapshotWriter},
    source::{FrameSource, SourceInfo},
};

/// Playback orchestrator.
///
/// Driven by a periodic timer owned by the shell: while
/// [`Player::is_timer_active`] is true the shell calls [`Player::tick`] every
/// [`Player::frame_interval`]. Each displayed frame is read under the source
/// lock, demosaiced when enabled, converted, published and then copied to the
/// histogram worker if it is idle.
pub struct Player<S: FrameSource> {
    source: Arc<Mutex<S>>,
    histogram: HistogramEngine,
    state: PlaybackState,
    frame_index: u32,
    total_frames: u32,
    info: Option<SourceInfo>,
    timer_active: bool,
    frame_rate: Option<FrameRateInfo>,
    display: Option<DisplayImage>,
    timestamp: Option<NaiveDateTime>,
    last_timings: FrameTimings,
    latest_histogram: Option<HistogramImage>,
}

impl<S: FrameSource> Player<S> {
    pub fn new(source: S) -> Result<Self> {
        Self::with_histogram_config(source, HistogramConfig::default())
    }

    pub fn with_histogram_config(source: S, histogram: HistogramConfig) -> Result<Self> {
        Ok(Self {
            source: Arc::new(Mutex::new(source)),
            histogram: HistogramEngine::new(histogram)?,
            state: PlaybackState::NoFile,
            frame_index: 1,
            total_frames: 0,
            info: None,
            timer_active: false,
            frame_rate: None,
            display: None,
            timestamp: None,
            last_timings: FrameTimings::default(),
            latest_histogram: None,
        })
    }

    /// Opens `path` and shows its first frame, leaving the player Stopped.
    ///
    /// A file the source refuses leaves the current playback untouched. A
    /// file the source accepts but that cannot be shown (no frames, empty
    /// geometry, unsupported sample width) has already replaced the previous
    /// one, so the source is closed and the player returns to NoFile.
    #[instrument(skip(self, path, config), fields(path = %path.as_ref().display()))]
    pub fn open(&mut self, path: impl AsRef<Path>, config: &PlaybackConfig) -> Result<()> {
        config.validate()?;
        let path = path.as_ref();

        let opened = {
            let mut source = self.lock_source()?;
            let total_frames = source.open(path).map_err(|e| match e {
                PlayerError::InvalidSource { .. } => e,
                other => invalid_source(path, other),
            })?;
            let info = source.info();
            match check_opened(path, total_frames, &info) {
                Ok(()) => Ok((total_frames, info)),
                Err(e) => {
                    source.close();
                    Err(e)
                }
            }
        };

        let (total_frames, info) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                warn!("Closed unusable file: {}", e);
                self.reset();
                return Err(e);
            }
        };

        info!(
            "Opened {} frames, {}x{} {} at {} bytes per sample",
            total_frames,
            info.width,
            info.height,
            info.colour.label(),
            info.bytes_per_sample
        );

        self.state = PlaybackState::Stopped;
        self.timer_active = false;
        self.frame_index = 1;
        self.total_frames = total_frames;
        self.info = Some(info);
        self.frame_rate = Some(frame_rate_info(&info, config.frame_rate));
        self.display = None;
        self.timestamp = None;
        self.latest_histogram = None;

        self.show_or_halt(config)
    }

    /// Closes the current file and returns to NoFile.
    pub fn close(&mut self) -> Result<()> {
        self.lock_source()?.close();
        self.reset();
        Ok(())
    }

    /// Starts or resumes playback. Finished playback restarts from frame 1.
    pub fn play(&mut self, config: &PlaybackConfig) -> Result<PlaybackState> {
        config.validate()?;
        self.require_file()?;

        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Finished => {
                self.start_timer(config);
                self.frame_index = 1;
                self.show_or_halt(config)?;
            }
            _ => self.start_timer(config),
        }

        Ok(self.state)
    }

    pub fn pause(&mut self) -> Result<PlaybackState> {
        self.require_file()?;
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.timer_active = false;
        }
        Ok(self.state)
    }

    /// The play/pause button.
    pub fn toggle_play(&mut self, config: &PlaybackConfig) -> Result<PlaybackState> {
        if self.state == PlaybackState::Playing {
            self.pause()
        } else {
            self.play(config)
        }
    }

    /// Stops playback and rewinds to frame 1.
    pub fn stop(&mut self, config: &PlaybackConfig) -> Result<()> {
        if self.state == PlaybackState::NoFile {
            return Ok(());
        }

        self.state = PlaybackState::Stopped;
        self.timer_active = false;
        self.frame_index = 1;
        self.show_or_halt(config)
    }

    /// One timer period: advance to and display the next frame.
    #[instrument(skip(self, config), fields(index = self.frame_index))]
    pub fn tick(&mut self, config: &PlaybackConfig) -> Result<TickOutcome> {
        if self.state != PlaybackState::Playing {
            self.timer_active = false;
            return Ok(TickOutcome::Idle);
        }

        if let Some(info) = self.info {
            self.frame_rate = Some(frame_rate_info(&info, config.frame_rate));
        }

        if self.frame_index < self.total_frames {
            self.frame_index += 1;
            self.show_or_halt(config)?;
            Ok(TickOutcome::Displayed(self.frame_index))
        } else if config.repeat {
            self.frame_index = 1;
            self.show_or_halt(config)?;
            Ok(TickOutcome::Wrapped)
        } else {
            info!("Reached last frame {}", self.frame_index);
            self.state = PlaybackState::Finished;
            self.timer_active = false;
            Ok(TickOutcome::Finished)
        }
    }

    /// Moves to the 1-based `index`, clamped to the file, and displays it.
    pub fn seek(&mut self, index: u32, config: &PlaybackConfig) -> Result<u32> {
        self.require_file()?;
        self.frame_index = index.clamp(1, self.total_frames);
        self.show_or_halt(config)?;
        Ok(self.frame_index)
    }

    /// Shows the next frame. Ignored while playing.
    pub fn step_forward(&mut self, config: &PlaybackConfig) -> Result<u32> {
        self.require_file()?;
        if self.state == PlaybackState::Playing || self.frame_index >= self.total_frames {
            return Ok(self.frame_index);
        }
        self.seek(self.frame_index + 1, config)
    }

    /// Shows the previous frame. Ignored while playing.
    pub fn step_back(&mut self, config: &PlaybackConfig) -> Result<u32> {
        self.require_file()?;
        if self.state == PlaybackState::Playing || self.frame_index <= 1 {
            return Ok(self.frame_index);
        }
        self.seek(self.frame_index - 1, config)
    }

    /// Re-renders the current frame, e.g. after the debayer setting changed.
    pub fn refresh(&mut self, config: &PlaybackConfig) -> Result<()> {
        self.require_file()?;
        self.show_or_halt(config)
    }

    /// Newest histogram finished since the last poll, if any.
    pub fn poll_histogram(&mut self) -> Option<HistogramImage> {
        let newest = self.histogram.results().try_iter().last();
        if let Some(image) = &newest {
            self.latest_histogram = Some(image.clone());
        }
        newest
    }

    /// Blocks up to `timeout` for the next histogram.
    pub fn wait_histogram(&mut self, timeout: Duration) -> Option<HistogramImage> {
        let image = self.histogram.recv_timeout(timeout)?;
        self.latest_histogram = Some(image.clone());
        Some(image)
    }

    /// Encodes the displayed frame. Not available while playing.
    pub fn save_frame<W: SnapshotWriter>(
        &self,
        writer: &W,
        output: &mut dyn Write,
        config: &SnapshotConfig,
    ) -> Result<()> {
        self.require_snapshot_state()?;
        let image = self.display.as_ref().ok_or(PlayerError::NoFrameDisplayed)?;
        writer.write_image(image, output, config)
    }

    /// Encodes the latest histogram graph. Not available while playing.
    pub fn save_histogram<W: SnapshotWriter>(
        &self,
        writer: &W,
        output: &mut dyn Write,
        config: &SnapshotConfig,
    ) -> Result<()> {
        self.require_snapshot_state()?;
        let histogram = self.latest_histogram.as_ref().ok_or(PlayerError::NoHistogram)?;
        writer.write_image(&histogram.image, output, config)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn info(&self) -> Option<&SourceInfo> {
        self.info.as_ref()
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer_active
    }

    pub fn frame_rate(&self) -> Option<FrameRateInfo> {
        self.frame_rate
    }

    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_rate.map(|rate| rate.interval)
    }

    /// The most recently published display image.
    pub fn display(&self) -> Option<&DisplayImage> {
        self.display.as_ref()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    pub fn colour_label(&self) -> Option<&'static str> {
        self.info.map(|info| info.colour.label())
    }

    pub fn last_timings(&self) -> &FrameTimings {
        &self.last_timings
    }

    pub fn latest_histogram(&self) -> Option<&HistogramImage> {
        self.latest_histogram.as_ref()
    }

    /// Finished histograms not yet collected by a poll or wait.
    pub fn pending_histograms(&self) -> usize {
        self.histogram.results().len()
    }

    pub fn source(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.source)
    }

    fn reset(&mut self) {
        self.state = PlaybackState::NoFile;
        self.timer_active = false;
        self.frame_index = 1;
        self.total_frames = 0;
        self.info = None;
        self.frame_rate = None;
        self.display = None;
        self.timestamp = None;
        self.latest_histogram = None;
    }

    fn require_file(&self) -> Result<()> {
        if self.state == PlaybackState::NoFile {
            return Err(PlayerError::NoFileOpen);
        }
        Ok(())
    }

    fn require_snapshot_state(&self) -> Result<()> {
        match self.state {
            PlaybackState::NoFile | PlaybackState::Playing => {
                Err(PlayerError::SnapshotUnavailable(self.state))
            }
            _ => Ok(()),
        }
    }

    fn start_timer(&mut self, config: &PlaybackConfig) {
        self.state = PlaybackState::Playing;
        self.timer_active = true;
        if let Some(info) = self.info {
            self.frame_rate = Some(frame_rate_info(&info, config.frame_rate));
        }
    }

    fn lock_source(&self) -> Result<MutexGuard<'_, S>> {
        self.source.lock().map_err(|_| PlayerError::SourceLockPoisoned)
    }

    /// Displays the current frame; on failure halts playback at this index.
    fn show_or_halt(&mut self, config: &PlaybackConfig) -> Result<()> {
        if let Err(e) = self.show_current(config) {
            warn!("Playback halted at frame {}: {}", self.frame_index, e);
            self.timer_active = false;
            if self.state == PlaybackState::Playing {
                self.state = PlaybackState::Paused;
            }
            return Err(e);
        }
        Ok(())
    }

    fn show_current(&mut self, config: &PlaybackConfig) -> Result<()> {
        let info = self.info.ok_or(PlayerError::NoFileOpen)?;
        let index = self.frame_index;
        let mut timings = FrameTimings::new(index);

        let (samples, timestamp) = timings.measure(Stage::ReadFrame, || self.read_frame(index))?;

        let frame = FrameBuffer::new(
            info.width,
            info.height,
            info.colour.frame_channels(),
            info.colour.channel_order(),
            samples,
        )
        .map_err(|e| PlayerError::FrameRead {
            index,
            reason: e.to_string(),
        })?;

        let frame = if config.debayer {
            timings.measure(Stage::Demosaic, || demosaic(frame, info.colour))?.into_frame()
        } else {
            frame
        };

        let histogram_copy = if !config.histogram {
            None
        } else if self.histogram.is_idle() {
            Some(frame.try_clone()?)
        } else {
            debug!("Histogram busy, skipping frame {}", index);
            None
        };

        let image = timings.measure(Stage::Convert, || convert_for_display(frame))?;
        self.display = Some(image);
        self.timestamp = timestamp.and_then(timestamp_to_datetime);

        if let Some(copy) = histogram_copy {
            match self.histogram.submit(copy) {
                Ok(()) => {}
                Err(PlayerError::HistogramBusy) => debug!("Histogram busy, skipping frame {}", index),
                Err(e) => warn!("Histogram request failed: {}", e),
            }
        }

        timings.log_summary();
        self.last_timings = timings;
        Ok(())
    }

    /// Holds the source lock only for the duration of the read.
    fn read_frame(&self, index: u32) -> Result<(Samples, Option<u64>)> {
        let _span = info_span!("read_frame", index).entered();
        let mut source = self.lock_source()?;
        let samples = source.read_frame(index).map_err(|e| match e {
            PlayerError::FrameRead { .. } => e,
            other => PlayerError::FrameRead {
                index,
                reason: other.to_string(),
            },
        })?;
        Ok((samples, source.timestamp()))
    }
}

fn check_opened(path: &Path, total_frames: u32, info: &SourceInfo) -> Result<()> {
    if total_frames == 0 {
        return Err(invalid_source(path, "container holds no frames"));
    }
    if info.width == 0 || info.height == 0 {
        return Err(PlayerError::InvalidDimensions(info.width, info.height));
    }
    if !(info.bytes_per_sample == 1 || info.bytes_per_sample == 2) {
        return Err(PlayerError::UnsupportedSampleWidth(info.bytes_per_sample));
    }
    Ok(())
}

fn invalid_source(path: &Path, reason: impl ToString) -> PlayerError {
    PlayerError::InvalidSource {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
