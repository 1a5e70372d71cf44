//! Bilinear demosaicing of single-channel Bayer frames.
//!
//! Every output pixel keeps the sample recorded at its own site and fills the
//! two missing colours with the mean of the nearest same-colour neighbours.
//! Border pixels drop the neighbours that fall outside the frame and divide by
//! the number actually summed; interior pixels always have the full
//! neighbourhood and use a fixed divisor.

use tracing::{debug, info_span};

use crate::frame_pipeline::common::buffer::{
    sample_count, try_alloc, ChannelOrder, FrameBuffer, Sample, Samples,
};
use crate::frame_pipeline::common::colour::ColourLayout;
use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::debayer::types::{BayerCode, DemosaicOutcome};

const CORNERS: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const CROSS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];
const VERTICAL: [(isize, isize); 2] = [(0, -1), (0, 1)];
const HORIZONTAL: [(isize, isize); 2] = [(-1, 0), (1, 0)];
const CENTRE_AND_CORNERS: [(isize, isize); 5] = [(0, 0), (-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Demosaics `frame` according to `layout`.
///
/// The input is consumed. Layouts other than RGGB/GRBG/GBRG/BGGR, frames that
/// already carry three channels and frames narrower or shorter than two pixels
/// come back untouched as [`DemosaicOutcome::NotApplicable`]. Debayered output
/// keeps the input sample width and is interleaved blue, green, red.
pub fn demosaic(frame: FrameBuffer, layout: ColourLayout) -> Result<DemosaicOutcome> {
    let (width, height) = (frame.width(), frame.height());

    let Some(code) = BayerCode::for_layout(layout, height) else {
        debug!("Layout {} is not demosaiced", layout.label());
        return Ok(DemosaicOutcome::NotApplicable(frame));
    };

    if frame.channels() != 1 || width < 2 || height < 2 {
        debug!(
            "Skipping demosaic for {}x{} frame with {} channels",
            width,
            height,
            frame.channels()
        );
        return Ok(DemosaicOutcome::NotApplicable(frame));
    }

    let _span = info_span!("demosaic", width, height, layout = layout.label()).entered();

    let samples = match frame.into_samples() {
        Samples::Eight(raw) => Samples::Eight(Mosaic::new(&raw, width, height, code).reconstruct()?),
        Samples::Sixteen(raw) => {
            Samples::Sixteen(Mosaic::new(&raw, width, height, code).reconstruct()?)
        }
    };

    FrameBuffer::new(width, height, 3, ChannelOrder::Bgr, samples).map(DemosaicOutcome::Debayered)
}

struct Mosaic<'a, T> {
    raw: &'a [T],
    width: usize,
    height: usize,
    code: BayerCode,
}

impl<'a, T: Sample> Mosaic<'a, T> {
    fn new(raw: &'a [T], width: usize, height: usize, code: BayerCode) -> Self {
        Self {
            raw,
            width,
            height,
            code,
        }
    }

    fn reconstruct(&self) -> Result<Vec<T>> {
        let mut bgr = try_alloc::<T>(sample_count(self.width, self.height, 3)?)?;
        let last_x = self.width - 1;
        let last_y = self.height - 1;

        // Bottom and top rows
        for y in [0, last_y] {
            for x in 0..self.width {
                self.write(&mut bgr, x, y, self.edge_pixel(x, y));
            }
        }

        // Left and right columns
        for x in [0, last_x] {
            for y in 1..last_y {
                self.write(&mut bgr, x, y, self.edge_pixel(x, y));
            }
        }

        for y in 1..last_y {
            for x in 1..last_x {
                self.write(&mut bgr, x, y, self.interior_pixel(x, y));
            }
        }

        Ok(bgr)
    }

    fn sample(&self, x: usize, y: usize) -> u32 {
        self.raw[y * self.width + x].to_u32()
    }

    /// Mean of the in-bounds samples at `offsets` around `(x, y)`.
    fn mean(&self, x: usize, y: usize, offsets: &[(isize, isize)]) -> u32 {
        let mut total = 0;
        let mut count = 0;
        for &(dx, dy) in offsets {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx < self.width && ny < self.height {
                total += self.sample(nx, ny);
                count += 1;
            }
        }
        // Frames are at least 2x2, so every pattern keeps one neighbour.
        total / count.max(1)
    }

    fn edge_pixel(&self, x: usize, y: usize) -> [u32; 3] {
        match self.code.site(x, y) {
            0 => [
                self.mean(x, y, &CORNERS),
                self.mean(x, y, &CROSS),
                self.sample(x, y),
            ],
            1 => [
                self.mean(x, y, &VERTICAL),
                self.mean(x, y, &CENTRE_AND_CORNERS),
                self.mean(x, y, &HORIZONTAL),
            ],
            2 => [
                self.mean(x, y, &HORIZONTAL),
                self.mean(x, y, &CENTRE_AND_CORNERS),
                self.mean(x, y, &VERTICAL),
            ],
            _ => [
                self.sample(x, y),
                self.mean(x, y, &CROSS),
                self.mean(x, y, &CORNERS),
            ],
        }
    }

    fn interior_pixel(&self, x: usize, y: usize) -> [u32; 3] {
        let w = self.width;
        let i = y * w + x;
        let at = |j: usize| self.raw[j].to_u32();

        let corners = || (at(i - w - 1) + at(i - w + 1) + at(i + w - 1) + at(i + w + 1)) / 4;
        let cross = || (at(i - 1) + at(i + 1) + at(i + w) + at(i - w)) / 4;
        let vertical = || (at(i - w) + at(i + w)) / 2;
        let horizontal = || (at(i - 1) + at(i + 1)) / 2;

        match self.code.site(x, y) {
            0 => [corners(), cross(), at(i)],
            1 => [vertical(), at(i), horizontal()],
            2 => [horizontal(), at(i), vertical()],
            _ => [at(i), cross(), corners()],
        }
    }

    fn write(&self, bgr: &mut [T], x: usize, y: usize, pixel: [u32; 3]) {
        let offset = (y * self.width + x) * 3;
        for (dst, value) in bgr[offset..offset + 3].iter_mut().zip(pixel) {
            *dst = T::from_u32(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAYER_LAYOUTS: [ColourLayout; 4] = [
        ColourLayout::BayerRggb,
        ColourLayout::BayerGrbg,
        ColourLayout::BayerGbrg,
        ColourLayout::BayerBggr,
    ];

    fn mono_frame(width: usize, height: usize, samples: Samples) -> FrameBuffer {
        FrameBuffer::new(width, height, 1, ChannelOrder::Rgb, samples).unwrap()
    }

    fn debayered(outcome: DemosaicOutcome) -> FrameBuffer {
        match outcome {
            DemosaicOutcome::Debayered(frame) => frame,
            DemosaicOutcome::NotApplicable(_) => panic!("expected a debayered frame"),
        }
    }

    #[test]
    fn test_uniform_field_eight_bit() {
        for layout in BAYER_LAYOUTS {
            for (width, height) in [(2, 2), (3, 3), (4, 5), (7, 6), (16, 9)] {
                let frame = mono_frame(width, height, Samples::Eight(vec![173; width * height]));
                let output = debayered(demosaic(frame, layout).unwrap());

                assert_eq!(output.channels(), 3);
                assert_eq!(output.order(), ChannelOrder::Bgr);
                assert_eq!(
                    output.samples(),
                    &Samples::Eight(vec![173; width * height * 3]),
                    "{:?} {}x{}",
                    layout,
                    width,
                    height
                );
            }
        }
    }

    #[test]
    fn test_uniform_field_sixteen_bit() {
        for layout in BAYER_LAYOUTS {
            for (width, height) in [(2, 3), (5, 5), (8, 7)] {
                let frame = mono_frame(width, height, Samples::Sixteen(vec![u16::MAX; width * height]));
                let output = debayered(demosaic(frame, layout).unwrap());

                assert_eq!(output.bytes_per_sample(), 2);
                assert_eq!(
                    output.samples(),
                    &Samples::Sixteen(vec![u16::MAX; width * height * 3])
                );
            }
        }
    }

    #[test]
    fn test_three_by_three_rggb_reference_values() {
        let raw = vec![10u8, 20, 30, 40, 50, 60, 70, 80, 90];
        let frame = mono_frame(3, 3, Samples::Eight(raw));
        let output = debayered(demosaic(frame, ColourLayout::BayerRggb).unwrap());

        let Samples::Eight(bgr) = output.samples() else {
            panic!("expected 8-bit output");
        };
        let pixel = |x: usize, y: usize| &bgr[(y * 3 + x) * 3..(y * 3 + x) * 3 + 3];

        // Corner on a red site: blue from the single in-bounds diagonal
        assert_eq!(pixel(0, 0), &[50, 30, 10]);
        // Bottom edge green site: three-sample green, single blue neighbour
        assert_eq!(pixel(1, 0), &[50, 40, 20]);
        // Left edge green site: 140 / 3 truncates to 46
        assert_eq!(pixel(0, 1), &[50, 46, 40]);
        // Interior blue site with fixed divisors
        assert_eq!(pixel(1, 1), &[50, 50, 50]);
        assert_eq!(pixel(2, 2), &[50, 70, 90]);
    }

    #[test]
    fn test_height_parity_shifts_row_phase() {
        let odd = BayerCode::for_layout(ColourLayout::BayerRggb, 3).unwrap();
        let even = BayerCode::for_layout(ColourLayout::BayerRggb, 4).unwrap();
        assert_eq!(odd.site(0, 0), 0);
        assert_eq!(even.site(0, 0), 2);

        let grbg = BayerCode::for_layout(ColourLayout::BayerGrbg, 4).unwrap();
        assert_eq!(grbg.site(0, 0), 3);
        assert_eq!(grbg.site(1, 0), 2);
    }

    #[test]
    fn test_output_stays_within_input_range() {
        for layout in BAYER_LAYOUTS {
            for width in 2..=7 {
                for height in 2..=7 {
                    let raw: Vec<u16> = (0..width * height)
                        .map(|i| (1000 + (i * 7919) % 50000) as u16)
                        .collect();
                    let min = *raw.iter().min().unwrap();
                    let max = *raw.iter().max().unwrap();
                    let frame = mono_frame(width, height, Samples::Sixteen(raw));
                    let output = debayered(demosaic(frame, layout).unwrap());

                    let Samples::Sixteen(bgr) = output.samples() else {
                        panic!("expected 16-bit output");
                    };
                    assert!(bgr.iter().all(|&v| v >= min && v <= max));
                }
            }
        }
    }

    #[test]
    fn test_native_rgb_is_not_applicable() {
        let frame = FrameBuffer::new(2, 2, 3, ChannelOrder::Rgb, Samples::Eight((0..12).collect())).unwrap();
        let expected = frame.clone();

        let outcome = demosaic(frame, ColourLayout::Rgb).unwrap();
        assert!(!outcome.is_debayered());
        assert_eq!(outcome.into_frame(), expected);
    }

    #[test]
    fn test_non_bayer_layouts_are_not_applicable() {
        for layout in [ColourLayout::Mono, ColourLayout::BayerCyym, ColourLayout::Unknown(7)] {
            let frame = mono_frame(4, 4, Samples::Eight(vec![9; 16]));
            assert!(!demosaic(frame, layout).unwrap().is_debayered());
        }
    }

    #[test]
    fn test_single_row_frame_is_not_applicable() {
        let frame = mono_frame(5, 1, Samples::Eight(vec![1; 5]));
        assert!(!demosaic(frame, ColourLayout::BayerRggb).unwrap().is_debayered());
    }
}
