//! Snapshot encoding configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

/// Configuration for saving a display image
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor tag value, 2 for horizontal differencing
    pub predictor: Option<u16>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::DeflateBalanced,
            predictor: None,
        }
    }
}

impl SnapshotConfig {
    pub fn builder() -> SnapshotConfigBuilder {
        SnapshotConfigBuilder::default()
    }
}

/// Builder for SnapshotConfig
#[derive(Default)]
pub struct SnapshotConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
}

impl SnapshotConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn build(self) -> SnapshotConfig {
        let default = SnapshotConfig::default();
        SnapshotConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
        }
    }
}
