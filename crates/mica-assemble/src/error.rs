//! Error types for the assembly crate.

use thiserror::Error;

use crate::buffer::AmbiFormat;

/// Errors that can occur while loading, aligning, or converting signal
/// buffers.
#[derive(Error, Debug)]
pub enum AssembleError {
    /// A format tag string was neither `A` nor `B`.
    #[error("invalid audio format tag '{0}': expected 'A' or 'B'")]
    InvalidFormat(String),

    /// The requested conversion direction is not supported.
    #[error("{from} to {to} conversion is not supported")]
    UnsupportedConversion {
        /// Source format of the rejected conversion.
        from: AmbiFormat,
        /// Target format of the rejected conversion.
        to: AmbiFormat,
    },

    /// A-format to B-format conversion needs capsule coordinates.
    #[error("capsule coordinates are required to convert between A and B format")]
    MissingCoordinates,

    /// A buffer carried the wrong format tag for the requested operation.
    #[error("buffer is tagged {got} but {expected} was expected")]
    FormatMismatch {
        /// The format the operation needs.
        expected: AmbiFormat,
        /// The format the buffer carries.
        got: AmbiFormat,
    },

    /// At least one clip identifier is required.
    #[error("no clip identifiers were given")]
    EmptyClipList,

    /// Clips being stacked must all have the same sample count.
    #[error("clip '{id}' has {got} samples but the first clip has {expected}")]
    ClipLengthMismatch {
        /// Identifier of the offending clip.
        id: String,
        /// Sample count of the first clip.
        expected: usize,
        /// Sample count of the offending clip.
        got: usize,
    },

    /// The clip source failed to produce a clip.
    #[error("failed to load clip '{id}': {reason}")]
    ClipLoad {
        /// Identifier of the clip that failed to load.
        id: String,
        /// What went wrong, as reported by the source.
        reason: String,
    },

    /// Resampling a buffer failed.
    #[error("resampling failed: {0}")]
    Resample(String),

    /// Geometry error from the coordinates crate.
    #[error(transparent)]
    Coords(#[from] mica_coords::CoordsError),

    /// Encoding or rendering error from the spatial crate.
    #[error(transparent)]
    Spatial(#[from] mica_spatial::SpatialError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssembleError>;
