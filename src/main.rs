use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ser_player_rs::frame_pipeline::{
    ColourLayout, FrameRate, FrameSource, PlaybackConfig, Player, PlayerError, Result, Samples,
    SnapshotConfig, SourceInfo, TickOutcome, TiffCompression, TiffSnapshotWriter,
};
use ser_player_rs::logger;

use tracing::{error, info};

/// A generated 16-bit RGGB capture whose gradient drifts with the frame index.
struct SyntheticSource {
    info: SourceInfo,
    frames: u32,
    last_read: Option<u32>,
}

impl SyntheticSource {
    fn new(width: usize, height: usize, frames: u32) -> Self {
        Self {
            info: SourceInfo {
                width,
                height,
                bytes_per_sample: 2,
                colour: ColourLayout::BayerRggb,
                fps_rate: 30,
                fps_scale: 1,
            },
            frames,
            last_read: None,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self, _path: &Path) -> Result<u32> {
        Ok(self.frames)
    }

    fn close(&mut self) {
        self.last_read = None;
    }

    fn read_frame(&mut self, index: u32) -> Result<Samples> {
        if index == 0 || index > self.frames {
            return Err(PlayerError::FrameRead {
                index,
                reason: "index outside capture".to_string(),
            });
        }

        let SourceInfo { width, height, .. } = self.info;
        let shift = index as usize * 4;
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let level = ((x + shift) * 65535 / (width + shift)) as u32;
                let site_gain = if (x + y) % 2 == 0 { 3 } else { 2 };
                samples.push((level * site_gain / 3).min(65535) as u16);
            }
        }

        self.last_read = Some(index);
        Ok(Samples::Sixteen(samples))
    }

    fn timestamp(&self) -> Option<u64> {
        // 2015-01-01 plus one frame period per index
        self.last_read
            .map(|index| 635_556_672_000_000_000 + index as u64 * 333_333)
    }

    fn info(&self) -> SourceInfo {
        self.info
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting ser_player...");

    let config = PlaybackConfig::builder()
        .debayer(true)
        .repeat(false)
        .frame_rate(FrameRate::FromSource)
        .build();
    let mut player = Player::new(SyntheticSource::new(640, 480, 60))?;

    player.open("synthetic.ser", &config)?;
    info!(
        "Opened {} frames, {} at {:.2} fps",
        player.total_frames(),
        player.colour_label().unwrap_or("????"),
        player.frame_rate().map(|rate| rate.fps).unwrap_or_default()
    );

    player.toggle_play(&config)?;
    while player.is_timer_active() {
        let interval = player.frame_interval().unwrap_or(Duration::from_millis(20));
        std::thread::sleep(interval);

        match player.tick(&config) {
            Ok(TickOutcome::Finished) => info!("Playback finished"),
            Ok(_) => {}
            Err(e) => error!("Playback halted: {}", e),
        }

        if let Some(histogram) = player.poll_histogram() {
            info!("Histogram {} ready for frame {}", histogram.run, player.frame_index());
        }
    }

    if let Some(timestamp) = player.timestamp() {
        info!("Last frame {} captured at {}", player.frame_index(), timestamp);
    }
    if player.latest_histogram().is_none() {
        player.wait_histogram(Duration::from_secs(1));
    }

    let snapshot = SnapshotConfig::builder()
        .compression(TiffCompression::DeflateBalanced)
        .predictor(Some(2))
        .build();
    save(&player, "frame.tiff", |p, out| p.save_frame(&TiffSnapshotWriter, out, &snapshot))?;
    save(&player, "histogram.tiff", |p, out| {
        p.save_histogram(&TiffSnapshotWriter, out, &snapshot)
    })?;

    player.close()?;
    Ok(())
}

fn save<F>(player: &Player<SyntheticSource>, path: &str, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&Player<SyntheticSource>, &mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut output = BufWriter::new(file);
    write(player, &mut output).with_context(|| format!("writing {path}"))?;
    output.flush()?;
    info!("Saved {}", path);
    Ok(())
}
