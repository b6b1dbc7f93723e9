//! Error types for the spatial encoding/rendering crate.

use thiserror::Error;

/// Errors that can occur during ambisonic encoding or binaural rendering.
#[derive(Error, Debug)]
pub enum SpatialError {
    /// The requested ambisonic order needs more channels than there are
    /// capsule signals.
    #[error(
        "order {order} needs {needed} channels but only {capsules} capsule signals are available"
    )]
    UnderDeterminedOrder {
        /// The requested ambisonic order.
        order: u32,
        /// `(order + 1)^2` channels the encoding would produce.
        needed: usize,
        /// Capsule signals actually available.
        capsules: usize,
    },

    /// Binaural rendering only supports first-order input.
    #[error("unsupported ambisonic order {0}: binaural rendering is first-order only")]
    UnsupportedOrder(u32),

    /// The number of channels does not match the expected count.
    #[error("channel count mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// The expected number of channels.
        expected: usize,
        /// The actual number of channels.
        got: usize,
    },

    /// Direction and signal counts disagree.
    #[error("{directions} capsule directions given for {channels} signal channels")]
    DirectionCountMismatch {
        /// Number of capsule directions supplied.
        directions: usize,
        /// Number of signal channels supplied.
        channels: usize,
    },

    /// The SVD-based pseudo-inverse could not be computed.
    #[error("pseudo-inverse failed: {0}")]
    PseudoInverse(String),

    /// An HRIR set must contain at least one measured direction.
    #[error("HRIR set has no measured directions")]
    EmptyHrirSet,

    /// The HRIR table bytes do not follow the expected layout.
    #[error("invalid HRIR table: {0}")]
    InvalidHrirFormat(String),

    /// Impulse responses must be non-empty and of uniform length.
    #[error("invalid HRIR length {got}: expected {expected}")]
    InvalidHrirLength {
        /// Length declared by the table header or the first pair.
        expected: usize,
        /// Length actually found.
        got: usize,
    },

    /// Resampling an impulse response failed.
    #[error("resampling failed: {0}")]
    Resample(String),

    /// I/O error while reading an HRIR table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for spatial operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
