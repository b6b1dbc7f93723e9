//! Multi-channel signal buffers and their format tags.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{AssembleError, Result};

/// Tags the representation a buffer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiFormat {
    /// A-format: raw per-capsule signals, one channel per physical capsule.
    A,
    /// B-format: ambisonic channels, `(order + 1)²` for order N.
    B,
}

impl fmt::Display for AmbiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmbiFormat::A => write!(f, "A"),
            AmbiFormat::B => write!(f, "B"),
        }
    }
}

impl FromStr for AmbiFormat {
    type Err = AssembleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" | "a" => Ok(AmbiFormat::A),
            "B" | "b" => Ok(AmbiFormat::B),
            _ => Err(AssembleError::InvalidFormat(s.to_string())),
        }
    }
}

/// An ordered stack of equal-length channels at one sample rate, tagged
/// with the format it represents.
///
/// Channel order is significant end-to-end: for an A-format buffer it is
/// the capsule order of the geometry the clips were recorded with, and for
/// a B-format buffer it is ACN channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChannelBuffer {
    data: Array2<f32>,
    sample_rate: u32,
    format: AmbiFormat,
}

impl MultiChannelBuffer {
    /// Wraps a `channels × samples` array with its rate and format tag.
    pub fn new(data: Array2<f32>, sample_rate: u32, format: AmbiFormat) -> Self {
        Self {
            data,
            sample_rate,
            format,
        }
    }

    /// Number of channels (rows).
    pub fn channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per channel (columns).
    pub fn samples(&self) -> usize {
        self.data.ncols()
    }

    /// The sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The format tag.
    pub fn format(&self) -> AmbiFormat {
        self.format
    }

    /// A view of the whole `channels × samples` array.
    pub fn data(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// A view of one channel.
    pub fn channel(&self, index: usize) -> ArrayView1<'_, f32> {
        self.data.row(index)
    }

    /// Consumes the buffer, returning the underlying array.
    pub fn into_data(self) -> Array2<f32> {
        self.data
    }
}
