//! Owned sample buffers shared by every pipeline stage.
//!
//! A [`FrameBuffer`] moves from stage to stage by value: each stage consumes
//! its input and hands back a freshly allocated output, so no two stages ever
//! see the same allocation. The histogram worker is the one exception and
//! works on an explicit [`FrameBuffer::try_clone`].

use crate::frame_pipeline::common::error::{PlayerError, Result};

/// Integer sample type stored in a frame buffer (8 or 16 bit).
pub trait Sample: Copy + Default + Send + Sync + 'static {
    /// Storage width of one sample in bytes.
    const BYTES: usize;

    fn to_u32(self) -> u32;

    /// Narrows a value known to fit the sample range.
    fn from_u32(value: u32) -> Self;

    /// The 8-bit value used for display and histogram bucketing.
    fn display_byte(self) -> u8;
}

impl Sample for u8 {
    const BYTES: usize = 1;

    fn to_u32(self) -> u32 {
        self as u32
    }

    fn from_u32(value: u32) -> Self {
        value as u8
    }

    fn display_byte(self) -> u8 {
        self
    }
}

impl Sample for u16 {
    const BYTES: usize = 2;

    fn to_u32(self) -> u32 {
        self as u32
    }

    fn from_u32(value: u32) -> Self {
        value as u16
    }

    fn display_byte(self) -> u8 {
        (self >> 8) as u8
    }
}

/// Allocates a zeroed buffer of `len` samples, failing with a diagnostic
/// instead of aborting when the allocator refuses.
pub(crate) fn try_alloc<T: Sample>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PlayerError::Allocation(len.saturating_mul(T::BYTES)))?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

fn try_copy<T: Sample>(samples: &[T]) -> Result<Vec<T>> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(samples.len())
        .map_err(|_| PlayerError::Allocation(samples.len().saturating_mul(T::BYTES)))?;
    copy.extend_from_slice(samples);
    Ok(copy)
}

/// Sample storage tagged with its width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    Eight(Vec<u8>),
    Sixteen(Vec<u16>),
}

impl Samples {
    /// Decodes a little-endian byte stream as delivered by a container reader.
    pub fn from_le_bytes(bytes: &[u8], bytes_per_sample: u32) -> Result<Self> {
        match bytes_per_sample {
            1 => Ok(Samples::Eight(try_copy(bytes)?)),
            2 => {
                if bytes.len() % 2 != 0 {
                    return Err(PlayerError::BufferSize {
                        expected: bytes.len() + 1,
                        actual: bytes.len(),
                    });
                }
                let mut values = try_alloc::<u16>(bytes.len() / 2)?;
                for (value, pair) in values.iter_mut().zip(bytes.chunks_exact(2)) {
                    *value = u16::from_le_bytes([pair[0], pair[1]]);
                }
                Ok(Samples::Sixteen(values))
            }
            other => Err(PlayerError::UnsupportedSampleWidth(other)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::Eight(values) => values.len(),
            Samples::Sixteen(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bytes_per_sample(&self) -> u32 {
        match self {
            Samples::Eight(_) => 1,
            Samples::Sixteen(_) => 2,
        }
    }

    pub fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            Samples::Eight(values) => Samples::Eight(try_copy(values)?),
            Samples::Sixteen(values) => Samples::Sixteen(try_copy(values)?),
        })
    }
}

/// Order of the three interleaved channels of a colour buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// A `width × height × channels` block of samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    channels: usize,
    order: ChannelOrder,
    samples: Samples,
}

impl FrameBuffer {
    /// Wraps `samples`, checking that the length matches the geometry.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        order: ChannelOrder,
        samples: Samples,
    ) -> Result<Self> {
        if width == 0 || height == 0 || !(channels == 1 || channels == 3) {
            return Err(PlayerError::InvalidDimensions(width, height));
        }

        let expected = sample_count(width, height, channels)?;
        if samples.len() != expected {
            return Err(PlayerError::BufferSize {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            order,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn is_colour(&self) -> bool {
        self.channels == 3
    }

    pub fn bytes_per_sample(&self) -> u32 {
        self.samples.bytes_per_sample()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    /// Private copy for consumers that must not share the original.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            order: self.order,
            samples: self.samples.try_clone()?,
        })
    }
}

/// `width × height × channels`, rejecting geometries that overflow `usize`.
pub(crate) fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or(PlayerError::InvalidDimensions(width, height))
}
