use std::io::{Cursor, Write};

use tiff::encoder::colortype::RGB8;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::frame_pipeline::common::error::{PlayerError, Result};
use crate::frame_pipeline::display::types::DisplayImage;
use crate::frame_pipeline::snapshot::types::{SnapshotConfig, TiffCompression};
use crate::frame_pipeline::snapshot::writer::SnapshotWriter;

/// Writes display images as baseline RGB8 TIFF, top row first.
pub struct TiffSnapshotWriter;

impl SnapshotWriter for TiffSnapshotWriter {
    fn write_image(&self, image: &DisplayImage, output: &mut dyn Write, config: &SnapshotConfig) -> Result<()> {
        debug!("Encoding snapshot: {}x{}", image.width, image.height);

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| PlayerError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor) = config.predictor {
            let predictor = match predictor {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<RGB8>(image.width as u32, image.height as u32, &image.packed_rgb())
            .map_err(|e| PlayerError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> DisplayImage {
        // 3x2 with one padding byte per row
        let mut data = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                data.extend_from_slice(&[x * 40, y * 100, 7]);
            }
            data.extend_from_slice(&[0, 0, 0]);
        }
        DisplayImage {
            width: 3,
            height: 2,
            stride: 12,
            data,
        }
    }

    #[test]
    fn test_writes_tiff_header() {
        let mut output = Vec::new();
        TiffSnapshotWriter
            .write_image(&image(), &mut output, &SnapshotConfig::default())
            .unwrap();

        assert!(output.starts_with(b"II*\0") || output.starts_with(b"MM\0*"));
    }

    #[test]
    fn test_every_compression_encodes() {
        for compression in [
            TiffCompression::None,
            TiffCompression::Lzw,
            TiffCompression::DeflateFast,
            TiffCompression::DeflateBalanced,
            TiffCompression::DeflateBest,
        ] {
            let config = SnapshotConfig::builder()
                .compression(compression)
                .predictor(Some(2))
                .build();
            let mut output = Vec::new();
            TiffSnapshotWriter.write_image(&image(), &mut output, &config).unwrap();
            assert!(!output.is_empty());
        }
    }

    #[test]
    fn test_uncompressed_output_holds_packed_pixels() {
        let config = SnapshotConfig::builder().compression(TiffCompression::None).build();
        let mut output = Vec::new();
        TiffSnapshotWriter.write_image(&image(), &mut output, &config).unwrap();

        let packed = image().packed_rgb();
        assert_eq!(packed.len(), 18);
        assert!(output.windows(packed.len()).any(|w| w == packed.as_slice()));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = SnapshotConfig::builder().predictor(Some(2)).build();
        assert_eq!(config.compression, TiffCompression::DeflateBalanced);
        assert_eq!(config.predictor, Some(2));
    }
}
