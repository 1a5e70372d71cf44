use crate::frame_pipeline::common::buffer::{ChannelOrder, FrameBuffer, Sample, Samples};
use crate::frame_pipeline::histogram::types::{HistogramTables, BAND_MARGIN, BUCKETS};

impl HistogramTables {
    /// Bins every pixel of `frame` by its display byte.
    pub fn count(frame: &FrameBuffer) -> Self {
        match frame.samples() {
            Samples::Eight(samples) => count_samples(samples, frame.channels(), frame.order()),
            Samples::Sixteen(samples) => count_samples(samples, frame.channels(), frame.order()),
        }
    }

    /// Log-scales counts into bar heights for this table's band height.
    pub fn normalised(&self) -> Self {
        let max = self.max_count();
        let scale = self.band_height() - BAND_MARGIN;
        let scaled = |table: &[u32; BUCKETS]| table.map(|count| normalise_count(count, max, scale));

        match self {
            HistogramTables::Mono { grey } => HistogramTables::Mono { grey: scaled(grey) },
            HistogramTables::Colour { red, green, blue } => HistogramTables::Colour {
                red: scaled(red),
                green: scaled(green),
                blue: scaled(blue),
            },
        }
    }
}

/// `floor((ln(count) + 1) / (ln(max) + 1) * scale)`, with empty buckets at 0.
pub fn normalise_count(count: u32, max: u32, scale: usize) -> u32 {
    if count == 0 || max == 0 {
        return 0;
    }
    let log_max = (max as f64).ln() + 1.0;
    (((count as f64).ln() + 1.0) / log_max * scale as f64) as u32
}

fn count_samples<T: Sample>(samples: &[T], channels: usize, order: ChannelOrder) -> HistogramTables {
    if channels == 1 {
        let mut grey = [0u32; BUCKETS];
        for sample in samples {
            grey[sample.display_byte() as usize] += 1;
        }
        return HistogramTables::Mono { grey };
    }

    let mut first = [0u32; BUCKETS];
    let mut second = [0u32; BUCKETS];
    let mut third = [0u32; BUCKETS];
    for pixel in samples.chunks_exact(3) {
        first[pixel[0].display_byte() as usize] += 1;
        second[pixel[1].display_byte() as usize] += 1;
        third[pixel[2].display_byte() as usize] += 1;
    }

    match order {
        ChannelOrder::Rgb => HistogramTables::Colour {
            red: first,
            green: second,
            blue: third,
        },
        ChannelOrder::Bgr => HistogramTables::Colour {
            red: third,
            green: second,
            blue: first,
        },
    }
}
