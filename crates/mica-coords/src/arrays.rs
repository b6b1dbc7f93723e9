//! Built-in geometries for commercially common microphone arrays.
//!
//! Each entry pairs an ordered capsule-name table with the capsule
//! coordinates of the physical rig: compact spherical arrays (Sennheiser
//! Ambeo VR, mh acoustics Eigenmike em32) in polar degrees, and the larger
//! studio rigs (OCT-3D, PCMA-3D, 2L-Cube, Decca Cuboid, Hamasaki Cube) in
//! cartesian meters. The registry is immutable configuration built on
//! demand; callers standardize via [`MicArray::standard_coords`].

use crate::error::{CoordsError, Result};
use crate::geometry::{AngleUnits, CapsuleGeometry, CoordinateForm};

/// Names of the supported microphone array topologies, in registry order.
pub const ARRAY_NAMES: [&str; 7] = [
    "Ambeo",
    "Eigenmike",
    "OCT3D",
    "PCMA3D",
    "2LCube",
    "DeccaCuboid",
    "Hamasaki",
];

/// Sennheiser Ambeo VR: tetrahedral, polar degrees, 15 mm radius.
const AMBEO_RAW: [(&str, [f64; 3]); 4] = [
    ("Ch1:FLU", [55.0, 45.0, 0.015]),
    ("Ch2:FRD", [125.0, -45.0, 0.015]),
    ("Ch3:BLD", [125.0, 135.0, 0.015]),
    ("Ch4:BRU", [55.0, -135.0, 0.015]),
];

/// mh acoustics Eigenmike em32: 32 capsules on a 42 mm rigid sphere,
/// polar degrees (azimuths wrapped into [-180, 180]).
const EIGENMIKE_RAW: [(&str, [f64; 3]); 32] = [
    ("1", [69.0, 0.0, 0.042]),
    ("2", [90.0, 32.0, 0.042]),
    ("3", [111.0, 0.0, 0.042]),
    ("4", [90.0, -32.0, 0.042]),
    ("5", [32.0, 0.0, 0.042]),
    ("6", [55.0, 45.0, 0.042]),
    ("7", [90.0, 69.0, 0.042]),
    ("8", [125.0, 45.0, 0.042]),
    ("9", [148.0, 0.0, 0.042]),
    ("10", [125.0, -45.0, 0.042]),
    ("11", [90.0, -69.0, 0.042]),
    ("12", [55.0, -45.0, 0.042]),
    ("13", [21.0, 91.0, 0.042]),
    ("14", [58.0, 90.0, 0.042]),
    ("15", [121.0, 90.0, 0.042]),
    ("16", [159.0, 89.0, 0.042]),
    ("17", [69.0, 180.0, 0.042]),
    ("18", [90.0, -148.0, 0.042]),
    ("19", [111.0, 180.0, 0.042]),
    ("20", [90.0, 148.0, 0.042]),
    ("21", [32.0, 180.0, 0.042]),
    ("22", [55.0, -135.0, 0.042]),
    ("23", [90.0, -111.0, 0.042]),
    ("24", [125.0, -135.0, 0.042]),
    ("25", [148.0, 180.0, 0.042]),
    ("26", [125.0, 135.0, 0.042]),
    ("27", [90.0, 111.0, 0.042]),
    ("28", [55.0, 135.0, 0.042]),
    ("29", [21.0, -91.0, 0.042]),
    ("30", [58.0, -90.0, 0.042]),
    ("31", [122.0, -90.0, 0.042]),
    ("32", [159.0, -89.0, 0.042]),
];

/// OCT-3D: OCT front triplet, rear pair, and a height layer 1 m above.
/// Cartesian meters, +x front, +y left, +z up.
const OCT3D_RAW: [(&str, [f64; 3]); 9] = [
    ("FL", [0.0, 0.35, 0.0]),
    ("FR", [0.0, -0.35, 0.0]),
    ("FC", [0.08, 0.0, 0.0]),
    ("RL", [-0.40, 0.35, 0.0]),
    ("RR", [-0.40, -0.35, 0.0]),
    ("FLh", [0.0, 0.35, 1.0]),
    ("FRh", [0.0, -0.35, 1.0]),
    ("RLh", [-0.40, 0.35, 1.0]),
    ("RRh", [-0.40, -0.35, 1.0]),
];

/// PCMA-3D: main square with vertically coincident height capsules.
const PCMA3D_RAW: [(&str, [f64; 3]); 9] = [
    ("FL", [0.25, 0.25, 0.0]),
    ("FR", [0.25, -0.25, 0.0]),
    ("FC", [0.33, 0.0, 0.0]),
    ("RL", [-0.25, 0.25, 0.0]),
    ("RR", [-0.25, -0.25, 0.0]),
    ("FLh", [0.25, 0.25, 0.015]),
    ("FRh", [0.25, -0.25, 0.015]),
    ("RLh", [-0.25, 0.25, 0.015]),
    ("RRh", [-0.25, -0.25, 0.015]),
];

/// 2L-Cube: omni cube, 1 m edge, with a front-center spot.
const CUBE2L_RAW: [(&str, [f64; 3]); 9] = [
    ("FL", [0.5, 0.5, 0.0]),
    ("FR", [0.5, -0.5, 0.0]),
    ("FC", [0.5, 0.0, 0.0]),
    ("RL", [-0.5, 0.5, 0.0]),
    ("RR", [-0.5, -0.5, 0.0]),
    ("FLh", [0.5, 0.5, 1.0]),
    ("FRh", [0.5, -0.5, 1.0]),
    ("RLh", [-0.5, 0.5, 1.0]),
    ("RRh", [-0.5, -0.5, 1.0]),
];

/// Decca Cuboid: widened Decca-tree footprint plus a height layer.
const DECCACUBOID_RAW: [(&str, [f64; 3]); 9] = [
    ("FL", [0.5, 1.0, 0.0]),
    ("FR", [0.5, -1.0, 0.0]),
    ("FC", [1.0, 0.0, 0.0]),
    ("RL", [-0.5, 1.0, 0.0]),
    ("RR", [-0.5, -1.0, 0.0]),
    ("FLh", [0.5, 1.0, 1.0]),
    ("FRh", [0.5, -1.0, 1.0]),
    ("RLh", [-0.5, 1.0, 1.0]),
    ("RRh", [-0.5, -1.0, 1.0]),
];

/// Hamasaki Cube: 2 m ambience square with two height layers.
const HAMASAKI_RAW: [(&str, [f64; 3]); 12] = [
    ("FL", [1.0, 1.0, 0.0]),
    ("FR", [1.0, -1.0, 0.0]),
    ("RL", [-1.0, 1.0, 0.0]),
    ("RR", [-1.0, -1.0, 0.0]),
    ("FLh_0", [1.0, 1.0, 1.0]),
    ("FRh_0", [1.0, -1.0, 1.0]),
    ("RLh_0", [-1.0, 1.0, 1.0]),
    ("RRh_0", [-1.0, -1.0, 1.0]),
    ("FLh_1", [1.0, 1.0, 2.0]),
    ("FRh_1", [1.0, -1.0, 2.0]),
    ("RLh_1", [-1.0, 1.0, 2.0]),
    ("RRh_1", [-1.0, -1.0, 2.0]),
];

/// One named microphone array: its raw capsule geometry plus accessors for
/// the standardized forms.
#[derive(Debug, Clone, PartialEq)]
pub struct MicArray {
    name: &'static str,
    geometry: CapsuleGeometry,
}

impl MicArray {
    /// The registry name of this array.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The raw, as-published capsule geometry.
    pub fn geometry(&self) -> &CapsuleGeometry {
        &self.geometry
    }

    /// Capsule names in channel order.
    pub fn capsule_names(&self) -> Vec<&str> {
        self.geometry.capsule_names().collect()
    }

    /// The standardized (centered) geometry in the requested form.
    ///
    /// # Errors
    ///
    /// Propagates [`CoordsError`] from the standardization pipeline.
    pub fn standard_coords(&self, form: CoordinateForm) -> Result<CapsuleGeometry> {
        self.geometry.standardize(form)
    }
}

/// Lists the supported microphone array topologies.
pub fn list_arrays() -> &'static [&'static str] {
    &ARRAY_NAMES
}

/// Looks up a built-in microphone array by name.
///
/// # Errors
///
/// Returns [`CoordsError::UnknownArray`] for names not in [`ARRAY_NAMES`].
pub fn get_array(name: &str) -> Result<MicArray> {
    let (name, geometry) = match name {
        "Ambeo" => (
            "Ambeo",
            CapsuleGeometry::polar(owned(&AMBEO_RAW), AngleUnits::Degrees)?,
        ),
        "Eigenmike" => (
            "Eigenmike",
            CapsuleGeometry::polar(owned(&EIGENMIKE_RAW), AngleUnits::Degrees)?,
        ),
        "OCT3D" => ("OCT3D", CapsuleGeometry::cartesian(owned(&OCT3D_RAW))?),
        "PCMA3D" => ("PCMA3D", CapsuleGeometry::cartesian(owned(&PCMA3D_RAW))?),
        "2LCube" => ("2LCube", CapsuleGeometry::cartesian(owned(&CUBE2L_RAW))?),
        "DeccaCuboid" => (
            "DeccaCuboid",
            CapsuleGeometry::cartesian(owned(&DECCACUBOID_RAW))?,
        ),
        "Hamasaki" => ("Hamasaki", CapsuleGeometry::cartesian(owned(&HAMASAKI_RAW))?),
        _ => return Err(CoordsError::UnknownArray(name.to_string())),
    };
    Ok(MicArray { name, geometry })
}

fn owned(raw: &[(&str, [f64; 3])]) -> Vec<(String, [f64; 3])> {
    raw.iter().map(|(n, c)| (n.to_string(), *c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_all_arrays() {
        let names = list_arrays();
        assert_eq!(names.len(), 7);
        for name in names {
            let array = get_array(name).unwrap();
            assert_eq!(array.name(), *name);
            assert!(!array.geometry().is_empty());
        }
    }

    #[test]
    fn test_unknown_array() {
        assert!(matches!(
            get_array("SoundField"),
            Err(CoordsError::UnknownArray(name)) if name == "SoundField"
        ));
    }

    #[test]
    fn test_capsule_counts() {
        assert_eq!(get_array("Ambeo").unwrap().geometry().len(), 4);
        assert_eq!(get_array("Eigenmike").unwrap().geometry().len(), 32);
        assert_eq!(get_array("OCT3D").unwrap().geometry().len(), 9);
        assert_eq!(get_array("Hamasaki").unwrap().geometry().len(), 12);
    }

    #[test]
    fn test_capsule_order_matches_channel_tables() {
        let ambeo = get_array("Ambeo").unwrap();
        assert_eq!(
            ambeo.capsule_names(),
            ["Ch1:FLU", "Ch2:FRD", "Ch3:BLD", "Ch4:BRU"]
        );
        let eigen = get_array("Eigenmike").unwrap();
        assert_eq!(eigen.capsule_names()[0], "1");
        assert_eq!(eigen.capsule_names()[31], "32");
    }

    #[test]
    fn test_standard_coords_are_centered() {
        for name in list_arrays() {
            let cart = get_array(name)
                .unwrap()
                .standard_coords(CoordinateForm::Cartesian)
                .unwrap();
            let mut mean = [0.0f64; 3];
            for (_, c) in cart.iter() {
                for i in 0..3 {
                    mean[i] += c[i] / cart.len() as f64;
                }
            }
            for m in mean {
                assert!(m.abs() < 1e-6, "{}: centroid component {}", name, m);
            }
        }
    }

    #[test]
    fn test_ambeo_standard_polar_radius() {
        // Tetrahedral symmetry: centering is a no-op, radii stay at 15 mm.
        let polar = get_array("Ambeo")
            .unwrap()
            .standard_coords(CoordinateForm::Polar)
            .unwrap();
        for (_, c) in polar.iter() {
            assert!((c[2] - 0.015).abs() < 1e-9);
        }
    }
}
