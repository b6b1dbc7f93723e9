//! Head-related impulse response (HRIR) tables.
//!
//! An [`HrirSet`] is a fixed grid of measured directions: every
//! (azimuth, elevation) entry carries one impulse response per ear. Sets are
//! loaded once per process from an opaque little-endian binary table and
//! shared read-only across all binaural renders.
//!
//! Table layout: `b"HRIR"` magic, `u32` sample rate, `u32` impulse length,
//! `u32` azimuth count, `u32` elevation count, the azimuth and elevation
//! grids as `f32` degrees, then azimuth-major left/right `f32` impulse
//! pairs.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use rubato::Resampler;

use crate::error::{Result, SpatialError};

/// Magic tag at the start of an HRIR table.
const MAGIC: [u8; 4] = *b"HRIR";

/// A left/right impulse-response pair for one measured direction.
#[derive(Debug, Clone, PartialEq)]
pub struct HrirPair {
    /// Impulse response for the left ear.
    pub left: Vec<f32>,
    /// Impulse response for the right ear.
    pub right: Vec<f32>,
}

/// An immutable grid of measured HRIR pairs keyed by direction index.
#[derive(Debug, Clone, PartialEq)]
pub struct HrirSet {
    sample_rate: u32,
    azimuths: Vec<f64>,
    elevations: Vec<f64>,
    /// Azimuth-major: `pairs[az_idx * elevations.len() + el_idx]`.
    pairs: Vec<HrirPair>,
}

impl HrirSet {
    /// Builds a set from its parts, validating grid and impulse lengths.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyHrirSet`] for empty grids,
    /// [`SpatialError::InvalidHrirFormat`] when the pair count does not
    /// match the grid, and [`SpatialError::InvalidHrirLength`] when impulse
    /// responses are empty or of uneven length.
    pub fn from_parts(
        sample_rate: u32,
        azimuths: Vec<f64>,
        elevations: Vec<f64>,
        pairs: Vec<HrirPair>,
    ) -> Result<Self> {
        if azimuths.is_empty() || elevations.is_empty() || pairs.is_empty() {
            return Err(SpatialError::EmptyHrirSet);
        }
        if pairs.len() != azimuths.len() * elevations.len() {
            return Err(SpatialError::InvalidHrirFormat(format!(
                "{} pairs for a {}x{} grid",
                pairs.len(),
                azimuths.len(),
                elevations.len()
            )));
        }
        let ir_len = pairs[0].left.len();
        if ir_len == 0 {
            return Err(SpatialError::InvalidHrirLength {
                expected: 1,
                got: 0,
            });
        }
        for pair in &pairs {
            for ir in [&pair.left, &pair.right] {
                if ir.len() != ir_len {
                    return Err(SpatialError::InvalidHrirLength {
                        expected: ir_len,
                        got: ir.len(),
                    });
                }
            }
        }
        Ok(Self {
            sample_rate,
            azimuths,
            elevations,
            pairs,
        })
    }

    /// Reads a binary HRIR table.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidHrirFormat`] on a bad magic tag or
    /// inconsistent header, and I/O errors from the reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(SpatialError::InvalidHrirFormat(
                "bad magic tag (expected 'HRIR')".to_string(),
            ));
        }
        let sample_rate = reader.read_u32::<LittleEndian>()?;
        let ir_len = reader.read_u32::<LittleEndian>()? as usize;
        let n_az = reader.read_u32::<LittleEndian>()? as usize;
        let n_el = reader.read_u32::<LittleEndian>()? as usize;
        if ir_len == 0 || n_az == 0 || n_el == 0 {
            return Err(SpatialError::InvalidHrirFormat(format!(
                "empty table dimensions ({} samples, {}x{} grid)",
                ir_len, n_az, n_el
            )));
        }

        let mut azimuths = Vec::with_capacity(n_az);
        for _ in 0..n_az {
            azimuths.push(f64::from(reader.read_f32::<LittleEndian>()?));
        }
        let mut elevations = Vec::with_capacity(n_el);
        for _ in 0..n_el {
            elevations.push(f64::from(reader.read_f32::<LittleEndian>()?));
        }

        let mut pairs = Vec::with_capacity(n_az * n_el);
        for _ in 0..n_az * n_el {
            pairs.push(HrirPair {
                left: read_ir(&mut reader, ir_len)?,
                right: read_ir(&mut reader, ir_len)?,
            });
        }
        Self::from_parts(sample_rate, azimuths, elevations, pairs)
    }

    /// Reads a binary HRIR table from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::info!("loading HRIR table: {}", path.as_ref().display());
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Native sample rate of the measured impulse responses.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of each impulse response in samples.
    pub fn ir_len(&self) -> usize {
        self.pairs[0].left.len()
    }

    /// Number of measured directions in the grid.
    pub fn num_directions(&self) -> usize {
        self.pairs.len()
    }

    /// The measured pair nearest to the requested direction (degrees).
    ///
    /// Lookup is table-indexed per axis: the closest grid azimuth (with
    /// wrap-around at 360°) and the closest grid elevation, no
    /// interpolation.
    pub fn nearest(&self, azimuth_deg: f64, elevation_deg: f64) -> &HrirPair {
        let az_idx = nearest_index(&self.azimuths, azimuth_deg, true);
        let el_idx = nearest_index(&self.elevations, elevation_deg, false);
        &self.pairs[az_idx * self.elevations.len() + el_idx]
    }

    /// Returns a copy of the set with every impulse response resampled to
    /// `target_rate`. A matching rate returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Resample`] when the resampler rejects the
    /// rate ratio.
    pub fn resampled_to(&self, target_rate: u32) -> Result<Self> {
        if target_rate == self.sample_rate {
            return Ok(self.clone());
        }
        let ratio = f64::from(target_rate) / f64::from(self.sample_rate);
        tracing::debug!(
            from = self.sample_rate,
            to = target_rate,
            "resampling HRIR set"
        );
        let mut pairs = Vec::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            pairs.push(HrirPair {
                left: resample_ir(&pair.left, ratio)?,
                right: resample_ir(&pair.right, ratio)?,
            });
        }
        Self::from_parts(
            target_rate,
            self.azimuths.clone(),
            self.elevations.clone(),
            pairs,
        )
    }
}

fn read_ir<R: Read>(reader: &mut R, len: usize) -> Result<Vec<f32>> {
    let mut ir = Vec::with_capacity(len);
    for _ in 0..len {
        ir.push(reader.read_f32::<LittleEndian>()?);
    }
    Ok(ir)
}

/// Index of the grid value closest to `target`; azimuths wrap at 360°.
fn nearest_index(grid: &[f64], target: f64, wrap: bool) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &value) in grid.iter().enumerate() {
        let dist = if wrap {
            let d = (value - target).rem_euclid(360.0);
            d.min(360.0 - d)
        } else {
            (value - target).abs()
        };
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Resamples one impulse response by the given rate ratio.
fn resample_ir(ir: &[f32], ratio: f64) -> Result<Vec<f32>> {
    let params = rubato::InterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 160,
        interpolation: rubato::InterpolationType::Cubic,
        window: rubato::WindowFunction::BlackmanHarris2,
    };
    let mut resampler = rubato::SincFixedIn::<f32>::new(ratio, params, ir.len(), 1);
    let mut out = resampler
        .process(&[ir.to_vec()])
        .map_err(|e| SpatialError::Resample(e.to_string()))?;
    Ok(out.remove(0))
}
