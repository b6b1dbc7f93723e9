//! Error types for the capsule-geometry crate.

use thiserror::Error;

/// Errors that can occur while building or transforming capsule geometries.
#[derive(Error, Debug)]
pub enum CoordsError {
    /// A polar geometry was asked to convert angles without knowing its units.
    #[error("angle units are unspecified: polar coordinates need 'degrees' or 'radians'")]
    MissingAngleUnits,

    /// Angle units were supplied together with cartesian coordinates.
    #[error("cartesian coordinates do not take angle units")]
    UnitsWithCartesian,

    /// An operation that needs polar coordinates was given cartesian ones.
    #[error("operation requires polar coordinates")]
    NotPolar,

    /// An operation that needs cartesian coordinates was given polar ones.
    #[error("operation requires cartesian coordinates")]
    NotCartesian,

    /// Colatitude is outside the valid range for the declared units.
    #[error("capsule '{capsule}': colatitude {value} out of range {range}")]
    InvalidColatitude {
        /// Capsule whose coordinate failed validation.
        capsule: String,
        /// The offending value.
        value: f64,
        /// Human-readable valid range for the declared units.
        range: &'static str,
    },

    /// Azimuth is outside the valid range for the declared units.
    #[error("capsule '{capsule}': azimuth {value} out of range {range}")]
    InvalidAzimuth {
        /// Capsule whose coordinate failed validation.
        capsule: String,
        /// The offending value.
        value: f64,
        /// Human-readable valid range for the declared units.
        range: &'static str,
    },

    /// Radius must be non-negative.
    #[error("capsule '{capsule}': radius {value} must be >= 0")]
    InvalidRadius {
        /// Capsule whose coordinate failed validation.
        capsule: String,
        /// The offending value.
        value: f64,
    },

    /// Two capsules share the same name within one array.
    #[error("duplicate capsule name '{0}'")]
    DuplicateCapsule(String),

    /// A geometry must contain at least one capsule.
    #[error("geometry has no capsules")]
    EmptyGeometry,

    /// A capsule sits at the coordinate origin and has no defined direction.
    #[error("capsule '{0}' is at the origin: direction is undefined")]
    DegenerateDirection(String),

    /// The requested array name is not in the built-in registry.
    #[error("unknown microphone array '{0}'")]
    UnknownArray(String),

    /// A string did not parse into a coordinate form or angle unit.
    #[error("invalid {what} '{value}': expected one of {expected}")]
    InvalidArgument {
        /// What was being parsed ("coordinate form", "angle units").
        what: &'static str,
        /// The rejected input.
        value: String,
        /// The accepted spellings.
        expected: &'static str,
    },
}

/// Convenience Result type for geometry operations.
pub type Result<T> = std::result::Result<T, CoordsError>;
