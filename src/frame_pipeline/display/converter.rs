use tracing::{debug, info_span};

use crate::frame_pipeline::common::buffer::{try_alloc, ChannelOrder, FrameBuffer, Sample, Samples};
use crate::frame_pipeline::common::error::{PlayerError, Result};
use crate::frame_pipeline::display::types::DisplayImage;

/// Zero bytes appended to each `width`-pixel RGB row to reach a multiple of 4.
pub fn row_padding(width: usize) -> usize {
    let pad = (width * 3) % 4;
    if pad != 0 { 4 - pad } else { 0 }
}

/// Converts `frame` into a display image and releases the input.
///
/// 16-bit samples keep only their high byte. Source row 0 becomes the last
/// output row. BGR input is swapped to RGB; single-channel input is repeated
/// into all three channels.
pub fn convert_for_display(frame: FrameBuffer) -> Result<DisplayImage> {
    let width = frame.width();
    let height = frame.height();
    let channels = frame.channels();
    let swap = frame.order() == ChannelOrder::Bgr;

    let _span = info_span!("convert", width, height).entered();

    let stride = width
        .checked_mul(3)
        .map(|row| row + row_padding(width))
        .ok_or(PlayerError::InvalidDimensions(width, height))?;
    let size = stride
        .checked_mul(height)
        .ok_or(PlayerError::InvalidDimensions(width, height))?;
    let mut data = try_alloc::<u8>(size)?;

    let layout = RowLayout {
        width,
        height,
        channels,
        stride,
        swap,
    };
    match frame.into_samples() {
        Samples::Eight(samples) => layout.fill(&samples, &mut data),
        Samples::Sixteen(samples) => layout.fill(&samples, &mut data),
    }

    debug!(
        "Converted {}x{} frame for display, stride {} bytes",
        width, height, stride
    );

    Ok(DisplayImage {
        width,
        height,
        stride,
        data,
    })
}

struct RowLayout {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    swap: bool,
}

impl RowLayout {
    fn fill<T: Sample>(&self, samples: &[T], output: &mut [u8]) {
        let src_row_len = self.width * self.channels;

        for (out_row, y) in output.chunks_exact_mut(self.stride).zip((0..self.height).rev()) {
            let src_row = &samples[y * src_row_len..(y + 1) * src_row_len];
            let pixels = out_row[..self.width * 3].chunks_exact_mut(3);

            for (rgb, pixel) in pixels.zip(src_row.chunks_exact(self.channels)) {
                let bytes = if self.channels == 1 {
                    let v = pixel[0].display_byte();
                    [v, v, v]
                } else if self.swap {
                    [pixel[2].display_byte(), pixel[1].display_byte(), pixel[0].display_byte()]
                } else {
                    [pixel[0].display_byte(), pixel[1].display_byte(), pixel[2].display_byte()]
                };
                rgb.copy_from_slice(&bytes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colour_frame(width: usize, height: usize, order: ChannelOrder, samples: Samples) -> FrameBuffer {
        FrameBuffer::new(width, height, 3, order, samples).unwrap()
    }

    #[test]
    fn test_rows_are_padded_to_four_bytes() {
        for width in 1..=9 {
            let frame = colour_frame(width, 2, ChannelOrder::Rgb, Samples::Eight(vec![7; width * 6]));
            let image = convert_for_display(frame).unwrap();

            assert_eq!(image.stride % 4, 0, "width {}", width);
            assert_eq!(image.stride, width * 3 + row_padding(width));
            assert_eq!(image.data.len(), image.stride * 2);
        }
    }

    #[test]
    fn test_padding_bytes_are_zero() {
        let frame = colour_frame(3, 2, ChannelOrder::Rgb, Samples::Eight(vec![255; 18]));
        let image = convert_for_display(frame).unwrap();

        assert_eq!(image.stride, 12);
        for y in 0..2 {
            assert_eq!(&image.data[y * 12 + 9..y * 12 + 12], &[0, 0, 0]);
        }
    }

    #[test]
    fn test_rgb_is_flipped_vertically() {
        // Two rows of two pixels
        let samples: Vec<u8> = (1..=12).collect();
        let frame = colour_frame(2, 2, ChannelOrder::Rgb, Samples::Eight(samples));
        let image = convert_for_display(frame).unwrap();

        assert_eq!(image.row(0), &[7, 8, 9, 10, 11, 12]);
        assert_eq!(image.row(1), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_bgr_is_swapped_and_flipped() {
        let samples: Vec<u8> = (1..=12).collect();
        let frame = colour_frame(2, 2, ChannelOrder::Bgr, Samples::Eight(samples));
        let image = convert_for_display(frame).unwrap();

        assert_eq!(image.row(0), &[9, 8, 7, 12, 11, 10]);
        assert_eq!(image.row(1), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_sixteen_bit_keeps_high_byte() {
        let samples = vec![0x1234, 0xabff, 0x00ff, 0xff00, 0x8080, 0x0100];
        let frame = colour_frame(2, 1, ChannelOrder::Rgb, Samples::Sixteen(samples));
        let image = convert_for_display(frame).unwrap();

        assert_eq!(image.row(0), &[0x12, 0xab, 0x00, 0xff, 0x80, 0x01]);
    }

    #[test]
    fn test_single_channel_is_replicated() {
        let frame = FrameBuffer::new(2, 1, 1, ChannelOrder::Rgb, Samples::Eight(vec![5, 200])).unwrap();
        let image = convert_for_display(frame).unwrap();

        assert_eq!(image.row(0), &[5, 5, 5, 200, 200, 200]);
        assert_eq!(image.packed_rgb(), vec![5, 5, 5, 200, 200, 200]);
    }
}
