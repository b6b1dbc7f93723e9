//! # mica-spatial — Ambisonic encoding and binaural rendering
//!
//! Turns standardized capsule directions and raw capsule signals into
//! calibrated spatial-audio representations:
//!
//! - **[`sh`]**: real spherical-harmonic basis matrices (ACN order, N3D
//!   normalization), Moore–Penrose pseudo-inverse encoding matrices, and
//!   the least-squares A-format → B-format encoder.
//! - **[`binaural`]**: first-order B-format to 2-channel binaural audio
//!   over eight virtual loudspeakers and measured HRIRs.
//! - **[`hrir`]**: immutable HRIR tables keyed by direction index, with a
//!   little-endian binary loader and one-shot resampling.
//! - **[`error`]**: typed errors for all spatial operations.
//!
//! ## Quick start
//!
//! ```
//! use mica_spatial::sh;
//! use ndarray::Array2;
//!
//! // Four capsules of a tetrahedral array, (colatitude, azimuth) radians.
//! let directions: Vec<(f64, f64)> = [
//!     (55.0f64, 45.0f64),
//!     (125.0, -45.0),
//!     (125.0, 135.0),
//!     (55.0, -135.0),
//! ]
//! .iter()
//! .map(|&(c, a)| (c.to_radians(), a.to_radians()))
//! .collect();
//!
//! let signals = Array2::<f32>::zeros((4, 256));
//! let bformat = sh::encode(1, signals.view(), &directions).unwrap();
//! assert_eq!(bformat.nrows(), 4); // (1 + 1)^2 ambisonic channels
//! ```

pub mod binaural;
pub mod error;
pub mod hrir;
pub mod sh;

pub use binaural::{render, VIRTUAL_SPEAKERS};
pub use error::{Result, SpatialError};
pub use hrir::{HrirPair, HrirSet};
pub use sh::{channel_count, encode, encoding_matrix, sh_basis};
