use crate::frame_pipeline::display::types::DisplayImage;
use crate::frame_pipeline::histogram::types::{HistogramTables, BUCKETS};

/// Graph background.
const BACKGROUND: [u8; 3] = [240, 240, 240];

/// Colour of the saturation column (bucket 255).
const CLIPPING: [u8; 3] = [255, 0, 0];

/// Rows between a band's bottom edge and its bar baseline.
const BASELINE_OFFSET: usize = 12;

/// Draws `counts` as stacked log-scaled bar graphs, one band per channel.
///
/// Each bucket is a one pixel wide vertical bar rising from the band baseline.
/// Bars are grey, darkest at bucket 0, except bucket 255 which always uses
/// the clipping colour.
pub fn render(counts: &HistogramTables) -> DisplayImage {
    let heights = counts.normalised();
    let band_height = heights.band_height();
    let bands = heights.bands();

    let width = BUCKETS;
    let height = band_height * bands.len();
    let stride = width * 3;
    let mut data: Vec<u8> = BACKGROUND.iter().copied().cycle().take(stride * height).collect();

    for (band, table) in bands.into_iter().enumerate() {
        let baseline = (band + 1) * band_height - BASELINE_OFFSET;

        for (bucket, &bar) in table.iter().enumerate() {
            let colour = if bucket == BUCKETS - 1 {
                CLIPPING
            } else {
                let shade = (2 * bucket / 3) as u8;
                [shade, shade, shade]
            };

            let top = baseline.saturating_sub(bar as usize);
            for y in top..=baseline {
                let offset = y * stride + bucket * 3;
                data[offset..offset + 3].copy_from_slice(&colour);
            }
        }
    }

    DisplayImage {
        width,
        height,
        stride,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_pipeline::histogram::types::{COLOUR_BAND_HEIGHT, MONO_BAND_HEIGHT};

    fn pixel(image: &DisplayImage, x: usize, y: usize) -> [u8; 3] {
        let offset = y * image.stride + x * 3;
        [image.data[offset], image.data[offset + 1], image.data[offset + 2]]
    }

    #[test]
    fn test_mono_graph_geometry() {
        let mut grey = [0u32; BUCKETS];
        grey[100] = 40;
        let image = render(&HistogramTables::Mono { grey });

        assert_eq!(image.width, 256);
        assert_eq!(image.height, MONO_BAND_HEIGHT);
        assert_eq!(image.stride % 4, 0);
        assert_eq!(image.data.len(), image.stride * image.height);
    }

    #[test]
    fn test_colour_graph_has_three_bands() {
        let tables = HistogramTables::Colour {
            red: [1; BUCKETS],
            green: [1; BUCKETS],
            blue: [1; BUCKETS],
        };
        let image = render(&tables);

        assert_eq!(image.height, 3 * COLOUR_BAND_HEIGHT);
    }

    #[test]
    fn test_peak_bar_reaches_band_limit() {
        let mut grey = [0u32; BUCKETS];
        grey[30] = 1000;
        let image = render(&HistogramTables::Mono { grey });

        let baseline = MONO_BAND_HEIGHT - 12;
        let top = baseline - (MONO_BAND_HEIGHT - 13);
        assert_eq!(pixel(&image, 30, top), [20, 20, 20]);
        assert_eq!(pixel(&image, 30, top - 1), BACKGROUND);
        assert_eq!(pixel(&image, 31, top), BACKGROUND);
    }

    #[test]
    fn test_saturation_column_is_always_clipping_colour() {
        let mut grey = [0u32; BUCKETS];
        grey[255] = 10;
        grey[0] = 10;
        let image = render(&HistogramTables::Mono { grey });

        let baseline = MONO_BAND_HEIGHT - 12;
        assert_eq!(pixel(&image, 255, baseline), CLIPPING);
        assert_eq!(pixel(&image, 255, baseline - 137), CLIPPING);
        assert_eq!(pixel(&image, 0, baseline), [0, 0, 0]);
    }

    #[test]
    fn test_red_band_is_drawn_on_top() {
        let mut red = [0u32; BUCKETS];
        red[200] = 50;
        let tables = HistogramTables::Colour {
            red,
            green: [0; BUCKETS],
            blue: [0; BUCKETS],
        };
        let image = render(&tables);

        let shade = (2 * 200 / 3) as u8;
        assert_eq!(pixel(&image, 200, COLOUR_BAND_HEIGHT - 12 - 87), [shade; 3]);
        assert_eq!(pixel(&image, 200, 2 * COLOUR_BAND_HEIGHT - 13), BACKGROUND);
    }
}
