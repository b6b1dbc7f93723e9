//! # mica-coords — Microphone-array capsule geometry
//!
//! Normalizes the physical geometry of multi-capsule microphone arrays so
//! that downstream spatial encoders can treat every rig the same way:
//!
//! - **[`geometry`]**: the [`CapsuleGeometry`] model — an ordered capsule
//!   map with explicit polar/cartesian form and angle-unit state, plus the
//!   pure transforms (degree conversion, polar↔cartesian, centroid
//!   centering, standardization).
//! - **[`arrays`]**: built-in registry of common commercial arrays
//!   (Ambeo VR, Eigenmike em32, OCT-3D, PCMA-3D, 2L-Cube, Decca Cuboid,
//!   Hamasaki Cube) with their ordered capsule-name tables.
//! - **[`error`]**: typed errors for all geometry operations.
//!
//! ## Quick start
//!
//! ```
//! use mica_coords::{get_array, CoordinateForm};
//!
//! // Standardized directions for a tetrahedral Ambeo VR mic:
//! let ambeo = get_array("Ambeo").unwrap();
//! let polar = ambeo.standard_coords(CoordinateForm::Polar).unwrap();
//! let directions = polar.directions().unwrap();
//! assert_eq!(directions.len(), 4);
//! ```

pub mod arrays;
pub mod error;
pub mod geometry;

pub use arrays::{get_array, list_arrays, MicArray, ARRAY_NAMES};
pub use error::{CoordsError, Result};
pub use geometry::{AngleUnits, CapsuleGeometry, CoordinateForm};
