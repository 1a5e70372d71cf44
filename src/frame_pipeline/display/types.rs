//! Display image types

/// Packed 8-bit RGB image with rows padded to a 4-byte boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Bytes per row including padding
    pub stride: usize,
    /// RGB pixel data [R, G, B, R, G, B, ..., pad]
    pub data: Vec<u8>,
}

impl DisplayImage {
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..y * self.stride + self.width * 3]
    }

    /// RGB rows without padding, in display order.
    pub fn packed_rgb(&self) -> Vec<u8> {
        (0..self.height).flat_map(|y| self.row(y).iter().copied()).collect()
    }
}
