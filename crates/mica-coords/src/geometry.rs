//! Capsule geometry for a single microphone array.
//!
//! A [`CapsuleGeometry`] is an ordered mapping from capsule names to
//! 3-component coordinates, either polar (`[colatitude, azimuth, radius]`)
//! or cartesian (`[x, y, z]` in meters). Insertion order is significant:
//! it fixes the row order of every matrix built from the geometry, so that
//! signal channel order always matches direction order downstream.
//!
//! The coordinate system follows the usual acoustics convention:
//! - **Colatitude**: polar angle from the zenith (0 = straight up, π = down).
//! - **Azimuth**: angle in the xy-plane from +x, positive towards +y.
//! - **Radius**: distance from the array center in meters.
//!
//! All transforms are pure: they return a new geometry and never mutate the
//! receiver, so a caller can hold the raw and the standardized layout side
//! by side.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoordsError, Result};

/// Whether a geometry's coordinates are polar or cartesian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateForm {
    /// `[colatitude, azimuth, radius]` triples.
    Polar,
    /// `[x, y, z]` triples in meters.
    Cartesian,
}

impl fmt::Display for CoordinateForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateForm::Polar => write!(f, "polar"),
            CoordinateForm::Cartesian => write!(f, "cartesian"),
        }
    }
}

impl FromStr for CoordinateForm {
    type Err = CoordsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "polar" => Ok(CoordinateForm::Polar),
            "cartesian" => Ok(CoordinateForm::Cartesian),
            _ => Err(CoordsError::InvalidArgument {
                what: "coordinate form",
                value: s.to_string(),
                expected: "'polar', 'cartesian'",
            }),
        }
    }
}

/// Angle units of a polar geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnits {
    /// Degrees: colatitude in `[0, 180]`, azimuth in `[-180, 180]`.
    Degrees,
    /// Radians: colatitude in `[0, π]`, azimuth in `[-π, π]`.
    Radians,
}

impl fmt::Display for AngleUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleUnits::Degrees => write!(f, "degrees"),
            AngleUnits::Radians => write!(f, "radians"),
        }
    }
}

impl FromStr for AngleUnits {
    type Err = CoordsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "degrees" | "deg" => Ok(AngleUnits::Degrees),
            "radians" | "rad" => Ok(AngleUnits::Radians),
            _ => Err(CoordsError::InvalidArgument {
                what: "angle units",
                value: s.to_string(),
                expected: "'degrees', 'radians'",
            }),
        }
    }
}

/// An ordered set of named capsule coordinates with explicit form/units state.
///
/// # Example
///
/// ```
/// use mica_coords::{AngleUnits, CapsuleGeometry, CoordinateForm};
///
/// let geom = CapsuleGeometry::polar(
///     [("a".to_string(), [150.0, 45.0, 9.0])],
///     AngleUnits::Degrees,
/// )
/// .unwrap();
///
/// let cart = geom.standardize(CoordinateForm::Cartesian).unwrap();
/// assert_eq!(cart.form(), CoordinateForm::Cartesian);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleGeometry {
    capsules: IndexMap<String, [f64; 3]>,
    form: CoordinateForm,
    angle_units: Option<AngleUnits>,
}

impl CapsuleGeometry {
    /// Builds a polar geometry, validating every capsule coordinate.
    ///
    /// # Errors
    ///
    /// Returns a range error when a colatitude, azimuth, or radius is outside
    /// the valid range for `units`, [`CoordsError::DuplicateCapsule`] when two
    /// capsules share a name, and [`CoordsError::EmptyGeometry`] when no
    /// capsules are given.
    pub fn polar<I, S>(capsules: I, units: AngleUnits) -> Result<Self>
    where
        I: IntoIterator<Item = (S, [f64; 3])>,
        S: Into<String>,
    {
        let capsules = collect_unique(capsules)?;
        let (colat_max, az_max, colat_range, az_range) = match units {
            AngleUnits::Degrees => (180.0, 180.0, "[0, 180]", "[-180, 180]"),
            AngleUnits::Radians => (PI, PI, "[0, pi]", "[-pi, pi]"),
        };
        for (name, c) in &capsules {
            if !(0.0..=colat_max).contains(&c[0]) {
                return Err(CoordsError::InvalidColatitude {
                    capsule: name.clone(),
                    value: c[0],
                    range: colat_range,
                });
            }
            if !(-az_max..=az_max).contains(&c[1]) {
                return Err(CoordsError::InvalidAzimuth {
                    capsule: name.clone(),
                    value: c[1],
                    range: az_range,
                });
            }
            if c[2] < 0.0 {
                return Err(CoordsError::InvalidRadius {
                    capsule: name.clone(),
                    value: c[2],
                });
            }
        }
        Ok(Self {
            capsules,
            form: CoordinateForm::Polar,
            angle_units: Some(units),
        })
    }

    /// Builds a cartesian geometry (meters).
    ///
    /// # Errors
    ///
    /// Returns [`CoordsError::DuplicateCapsule`] or
    /// [`CoordsError::EmptyGeometry`] on malformed input.
    pub fn cartesian<I, S>(capsules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, [f64; 3])>,
        S: Into<String>,
    {
        Ok(Self {
            capsules: collect_unique(capsules)?,
            form: CoordinateForm::Cartesian,
            angle_units: None,
        })
    }

    /// The coordinate form of this geometry.
    pub fn form(&self) -> CoordinateForm {
        self.form
    }

    /// The angle units, if this geometry is polar.
    pub fn angle_units(&self) -> Option<AngleUnits> {
        self.angle_units
    }

    /// Number of capsules.
    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    /// Whether the geometry holds no capsules (never true for a constructed one).
    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    /// Capsule names in insertion order.
    pub fn capsule_names(&self) -> impl Iterator<Item = &str> {
        self.capsules.keys().map(String::as_str)
    }

    /// The coordinate triple for one capsule.
    pub fn coords(&self, capsule: &str) -> Option<[f64; 3]> {
        self.capsules.get(capsule).copied()
    }

    /// Iterates over `(name, coordinate)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, [f64; 3])> {
        self.capsules.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// `(colatitude, azimuth)` pairs in radians, in capsule order.
    ///
    /// Only defined for a polar geometry in radians (i.e. the output of
    /// `standardize(CoordinateForm::Polar)` or a radians-unit construction).
    ///
    /// # Errors
    ///
    /// Returns [`CoordsError::NotPolar`] for cartesian geometries and
    /// [`CoordsError::MissingAngleUnits`] when units are unknown.
    pub fn directions(&self) -> Result<Vec<(f64, f64)>> {
        if self.form != CoordinateForm::Polar {
            return Err(CoordsError::NotPolar);
        }
        match self.angle_units {
            None => Err(CoordsError::MissingAngleUnits),
            Some(AngleUnits::Degrees) => self.to_radians()?.directions(),
            Some(AngleUnits::Radians) => {
                Ok(self.capsules.values().map(|c| (c[0], c[1])).collect())
            }
        }
    }

    /// Converts colatitude and azimuth from degrees to radians; radii are
    /// left intact. A geometry already in radians is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoordsError::NotPolar`] for cartesian geometries and
    /// [`CoordsError::MissingAngleUnits`] when the units are unknown.
    pub fn to_radians(&self) -> Result<Self> {
        if self.form != CoordinateForm::Polar {
            return Err(CoordsError::NotPolar);
        }
        match self.angle_units {
            None => Err(CoordsError::MissingAngleUnits),
            Some(AngleUnits::Radians) => Ok(self.clone()),
            Some(AngleUnits::Degrees) => Ok(Self {
                capsules: self
                    .capsules
                    .iter()
                    .map(|(m, c)| {
                        (
                            m.clone(),
                            [c[0].to_radians(), c[1].to_radians(), c[2]],
                        )
                    })
                    .collect(),
                form: CoordinateForm::Polar,
                angle_units: Some(AngleUnits::Radians),
            }),
        }
    }

    /// Converts polar coordinates to cartesian meters:
    /// `x = r·sin(colat)·cos(az)`, `y = r·sin(colat)·sin(az)`,
    /// `z = r·cos(colat)`. Degrees are converted to radians first. A
    /// cartesian geometry is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoordsError::MissingAngleUnits`] for a polar geometry whose
    /// units were never declared.
    pub fn to_cartesian(&self) -> Result<Self> {
        if self.form == CoordinateForm::Cartesian {
            return Ok(self.clone());
        }
        let rad = self.to_radians()?;
        Ok(Self {
            capsules: rad
                .capsules
                .iter()
                .map(|(m, c)| {
                    (
                        m.clone(),
                        [
                            c[2] * c[0].sin() * c[1].cos(),
                            c[2] * c[0].sin() * c[1].sin(),
                            c[2] * c[0].cos(),
                        ],
                    )
                })
                .collect(),
            form: CoordinateForm::Cartesian,
            angle_units: None,
        })
    }

    /// Subtracts the component-wise centroid from every capsule so that the
    /// array's physical center sits at the coordinate origin. Polar input is
    /// converted to cartesian first; the result is always cartesian.
    pub fn center(&self) -> Result<Self> {
        let cart = self.to_cartesian()?;
        let n = cart.capsules.len() as f64;
        let mut mean = [0.0f64; 3];
        for c in cart.capsules.values() {
            for (m, v) in mean.iter_mut().zip(c.iter()) {
                *m += v / n;
            }
        }
        Ok(Self {
            capsules: cart
                .capsules
                .iter()
                .map(|(m, c)| {
                    (m.clone(), [c[0] - mean[0], c[1] - mean[1], c[2] - mean[2]])
                })
                .collect(),
            form: CoordinateForm::Cartesian,
            angle_units: None,
        })
    }

    /// Converts cartesian coordinates to polar radians:
    /// `radius = √(x²+y²+z²)`, `colatitude = acos(z/radius)`,
    /// `azimuth = atan2(y, x)`.
    ///
    /// The azimuth is a full four-quadrant angle, well defined for every
    /// sign combination of x and y including x = 0.
    ///
    /// # Errors
    ///
    /// Returns [`CoordsError::NotCartesian`] for polar input and
    /// [`CoordsError::DegenerateDirection`] for a capsule at the origin,
    /// whose direction is undefined.
    pub fn to_polar(&self) -> Result<Self> {
        if self.form != CoordinateForm::Cartesian {
            return Err(CoordsError::NotCartesian);
        }
        let mut capsules = IndexMap::with_capacity(self.capsules.len());
        for (m, c) in &self.capsules {
            let radius = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
            if radius == 0.0 {
                return Err(CoordsError::DegenerateDirection(m.clone()));
            }
            let colatitude = (c[2] / radius).clamp(-1.0, 1.0).acos();
            let azimuth = c[1].atan2(c[0]);
            capsules.insert(m.clone(), [colatitude, azimuth, radius]);
        }
        Ok(Self {
            capsules,
            form: CoordinateForm::Polar,
            angle_units: Some(AngleUnits::Radians),
        })
    }

    /// Standardizes the geometry: centered cartesian meters, or centered
    /// polar radians, depending on `target`.
    ///
    /// Standardizing an already-standardized geometry changes coordinates by
    /// at most floating error.
    ///
    /// # Errors
    ///
    /// Propagates conversion errors ([`CoordsError::MissingAngleUnits`],
    /// [`CoordsError::DegenerateDirection`]).
    pub fn standardize(&self, target: CoordinateForm) -> Result<Self> {
        match target {
            CoordinateForm::Cartesian => self.center(),
            CoordinateForm::Polar => self.center()?.to_polar(),
        }
    }
}

/// Collects capsules preserving insertion order, rejecting duplicates and
/// empty input.
fn collect_unique<I, S>(capsules: I) -> Result<IndexMap<String, [f64; 3]>>
where
    I: IntoIterator<Item = (S, [f64; 3])>,
    S: Into<String>,
{
    let mut map = IndexMap::new();
    for (name, coords) in capsules {
        let name = name.into();
        if map.insert(name.clone(), coords).is_some() {
            return Err(CoordsError::DuplicateCapsule(name));
        }
    }
    if map.is_empty() {
        return Err(CoordsError::EmptyGeometry);
    }
    Ok(map)
}
