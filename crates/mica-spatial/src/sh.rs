//! Real spherical-harmonic encoding of capsule signals to ambisonic
//! B-format.
//!
//! The encoder is a least-squares projection: a basis matrix with one row
//! per capsule direction and `(N+1)²` columns is pseudo-inverted and applied
//! to the stacked capsule signals. The projection is exact only when the
//! capsule count equals the channel count; otherwise it is a best fit.
//!
//! Channels use ACN ordering (index `n² + n + m`) with orthonormal (N3D)
//! normalization and no Condon–Shortley phase, so for first order the
//! channel rows come out as W, Y, Z, X.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};

use crate::error::{Result, SpatialError};

/// Singular values below this threshold are treated as zero when computing
/// the Moore–Penrose pseudo-inverse.
const PINV_EPSILON: f64 = 1e-10;

/// Number of ambisonic channels for a given order: `(order + 1)²`.
pub fn channel_count(order: u32) -> usize {
    let n = order as usize + 1;
    n * n
}

/// Evaluates the real spherical-harmonic basis for a set of capsule
/// directions.
///
/// `directions` holds `(colatitude, azimuth)` pairs in radians, one per
/// capsule. The result has one row per capsule and `(order + 1)²` columns
/// in ACN order.
pub fn sh_basis(order: u32, directions: &[(f64, f64)]) -> DMatrix<f64> {
    let cols = channel_count(order);
    let mut basis = DMatrix::zeros(directions.len(), cols);
    for (row, &(colatitude, azimuth)) in directions.iter().enumerate() {
        let p = assoc_legendre(order, colatitude.cos());
        for n in 0..=order as usize {
            for m in -(n as i64)..=(n as i64) {
                let acn = (n * (n + 1)) as i64 + m;
                let mm = m.unsigned_abs() as usize;
                let norm = sh_norm(n, mm);
                let value = if m == 0 {
                    norm * p[n][0]
                } else if m > 0 {
                    std::f64::consts::SQRT_2 * norm * p[n][mm] * (mm as f64 * azimuth).cos()
                } else {
                    std::f64::consts::SQRT_2 * norm * p[n][mm] * (mm as f64 * azimuth).sin()
                };
                basis[(row, acn as usize)] = value;
            }
        }
    }
    basis
}

/// Orthonormal normalization factor `sqrt((2n+1)/(4π) · (n−m)!/(n+m)!)`.
fn sh_norm(n: usize, m: usize) -> f64 {
    // (n−m)!/(n+m)! as a running product to stay in f64 range.
    let mut ratio = 1.0f64;
    for k in (n - m + 1)..=(n + m) {
        ratio /= k as f64;
    }
    ((2 * n + 1) as f64 / (4.0 * std::f64::consts::PI) * ratio).sqrt()
}

/// Associated Legendre values `P_n^m(x)` for all `n ≤ order`, `m ≤ n`,
/// without the Condon–Shortley phase. Returned as `p[n][m]`.
fn assoc_legendre(order: u32, x: f64) -> Vec<Vec<f64>> {
    let nmax = order as usize;
    let s = (1.0 - x * x).max(0.0).sqrt();
    let mut p: Vec<Vec<f64>> = (0..=nmax).map(|n| vec![0.0; n + 1]).collect();
    p[0][0] = 1.0;
    for m in 1..=nmax {
        p[m][m] = p[m - 1][m - 1] * (2 * m - 1) as f64 * s;
    }
    for m in 0..nmax {
        p[m + 1][m] = (2 * m + 1) as f64 * x * p[m][m];
    }
    for m in 0..=nmax {
        for n in (m + 2)..=nmax {
            p[n][m] = ((2 * n - 1) as f64 * x * p[n - 1][m]
                - (n + m - 1) as f64 * p[n - 2][m])
                / (n - m) as f64;
        }
    }
    p
}

/// Computes the Moore–Penrose pseudo-inverse of a basis matrix, yielding
/// the `(N+1)² × capsules` encoding matrix.
///
/// This is deliberately unchecked with respect to capsule counts: the
/// least-squares construction is defined for wide and tall bases alike.
///
/// # Errors
///
/// Returns [`SpatialError::PseudoInverse`] if the SVD fails to converge.
pub fn encoding_matrix(basis: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    basis
        .clone()
        .pseudo_inverse(PINV_EPSILON)
        .map_err(|msg| SpatialError::PseudoInverse(msg.to_string()))
}

/// Encodes raw capsule signals (channels × samples) into ambisonic
/// B-format of the given order.
///
/// Row `q` of `signals` must be the signal of the capsule whose direction
/// is `directions[q]`; callers are responsible for deriving both from the
/// same ordered geometry.
///
/// # Errors
///
/// Returns [`SpatialError::DirectionCountMismatch`] when direction and
/// channel counts disagree and [`SpatialError::UnderDeterminedOrder`] when
/// `(order + 1)²` exceeds the capsule count.
pub fn encode(
    order: u32,
    signals: ArrayView2<'_, f32>,
    directions: &[(f64, f64)],
) -> Result<Array2<f32>> {
    let capsules = signals.nrows();
    if directions.len() != capsules {
        return Err(SpatialError::DirectionCountMismatch {
            directions: directions.len(),
            channels: capsules,
        });
    }
    let needed = channel_count(order);
    if needed > capsules {
        return Err(SpatialError::UnderDeterminedOrder {
            order,
            needed,
            capsules,
        });
    }

    let basis = sh_basis(order, directions);
    let matrix = encoding_matrix(&basis)?;

    let samples = signals.ncols();
    let mut out = Array2::<f32>::zeros((needed, samples));
    for k in 0..needed {
        for t in 0..samples {
            let mut acc = 0.0f64;
            for q in 0..capsules {
                acc += matrix[(k, q)] * f64::from(signals[[q, t]]);
            }
            out[[k, t]] = acc as f32;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use std::f64::consts::PI;

    /// Tetrahedral capsule directions (colatitude, azimuth) in radians.
    fn tetra() -> Vec<(f64, f64)> {
        [(55.0, 45.0), (125.0, -45.0), (125.0, 135.0), (55.0, -135.0)]
            .iter()
            .map(|&(c, a): &(f64, f64)| (c.to_radians(), a.to_radians()))
            .collect()
    }

    #[test]
    fn test_channel_count() {
        assert_eq!(channel_count(0), 1);
        assert_eq!(channel_count(1), 4);
        assert_eq!(channel_count(2), 9);
        assert_eq!(channel_count(3), 16);
    }

    #[test]
    fn test_basis_shape() {
        let basis = sh_basis(1, &tetra());
        assert_eq!(basis.nrows(), 4);
        assert_eq!(basis.ncols(), 4);
        let basis = sh_basis(3, &tetra());
        assert_eq!(basis.ncols(), 16);
    }

    #[test]
    fn test_basis_omni_channel() {
        // ACN 0 is direction independent: 1/(2·sqrt(pi)).
        let w = 1.0 / (2.0 * PI.sqrt());
        let basis = sh_basis(2, &tetra());
        for row in 0..basis.nrows() {
            assert_relative_eq!(basis[(row, 0)], w, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_basis_first_order_axes() {
        let k = (3.0 / (4.0 * PI)).sqrt();
        // Front (+x): colatitude pi/2, azimuth 0 → only ACN 3 (X) fires.
        let basis = sh_basis(1, &[(PI / 2.0, 0.0)]);
        assert_relative_eq!(basis[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(basis[(0, 2)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(basis[(0, 3)], k, epsilon = 1e-12);
        // Left (+y): azimuth pi/2 → only ACN 1 (Y).
        let basis = sh_basis(1, &[(PI / 2.0, PI / 2.0)]);
        assert_relative_eq!(basis[(0, 1)], k, epsilon = 1e-12);
        assert_relative_eq!(basis[(0, 3)], 0.0, epsilon = 1e-12);
        // Zenith: colatitude 0 → only ACN 2 (Z).
        let basis = sh_basis(1, &[(0.0, 1.2)]);
        assert_relative_eq!(basis[(0, 2)], k, epsilon = 1e-12);
        assert_relative_eq!(basis[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(basis[(0, 3)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_second_order_zenith() {
        // ACN 6 (n=2, m=0) at the zenith: sqrt(5/(4·pi)) · P2(1) = sqrt(5/(4·pi)).
        let basis = sh_basis(2, &[(0.0, 0.0)]);
        assert_relative_eq!(basis[(0, 6)], (5.0 / (4.0 * PI)).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_basis_azimuth_periodicity() {
        // -pi/4 and 7·pi/4 describe the same direction, so the basis rows match.
        let a = sh_basis(5, &[(PI / 3.0, PI / 4.0), (2.0 * PI / 3.0, -PI / 4.0)]);
        let b = sh_basis(5, &[(PI / 3.0, PI / 4.0), (2.0 * PI / 3.0, 7.0 * PI / 4.0)]);
        for r in 0..a.nrows() {
            for c in 0..a.ncols() {
                assert_relative_eq!(a[(r, c)], b[(r, c)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_encoding_matrix_inverts_square_basis() {
        // The tetrahedral first-order basis is square and invertible, so the
        // pseudo-inverse is a true inverse: Y · B ≈ I.
        let basis = sh_basis(1, &tetra());
        let y = encoding_matrix(&basis).unwrap();
        let product = &y * &basis;
        for r in 0..4 {
            for c in 0..4 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(r, c)], expected, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_encoding_matrix_least_squares_shape() {
        // Two capsules, order 5: wide basis, valid least-squares encoder.
        let dirs = [(PI / 3.0, PI / 4.0), (2.0 * PI / 3.0, -PI / 4.0)];
        let basis = sh_basis(5, &dirs);
        assert_eq!((basis.nrows(), basis.ncols()), (2, 36));
        let y = encoding_matrix(&basis).unwrap();
        assert_eq!((y.nrows(), y.ncols()), (36, 2));
    }

    #[test]
    fn test_encode_matches_matrix_construction() {
        // The checked encoder must agree with building the encoding matrix
        // by hand and multiplying.
        let dirs = tetra();
        let signals = array![
            [1.0f32, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0],
            [10.0, 11.0, 12.0]
        ];
        let encoded = encode(1, signals.view(), &dirs).unwrap();

        let y = encoding_matrix(&sh_basis(1, &dirs)).unwrap();
        for k in 0..4 {
            for t in 0..3 {
                let mut acc = 0.0f64;
                for q in 0..4 {
                    acc += y[(k, q)] * f64::from(signals[[q, t]]);
                }
                assert_relative_eq!(f64::from(encoded[[k, t]]), acc, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_encode_order_zero_single_capsule() {
        // One capsule, order 0: basis is [1/(2·sqrt(pi))], so encoding
        // multiplies the signal by 2·sqrt(pi).
        let signals = array![[1.0f32, 2.0, 3.0]];
        let encoded = encode(0, signals.view(), &[(PI / 2.0, 0.0)]).unwrap();
        let gain = 2.0 * PI.sqrt();
        for (t, &expected) in [1.0f64, 2.0, 3.0].iter().enumerate() {
            assert_relative_eq!(f64::from(encoded[[0, t]]), gain * expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_encode_under_determined_order() {
        let signals = Array2::<f32>::zeros((4, 8));
        let result = encode(2, signals.view(), &tetra());
        assert!(matches!(
            result,
            Err(SpatialError::UnderDeterminedOrder {
                order: 2,
                needed: 9,
                capsules: 4
            })
        ));
    }

    #[test]
    fn test_encode_direction_count_mismatch() {
        let signals = Array2::<f32>::zeros((3, 8));
        let result = encode(1, signals.view(), &tetra());
        assert!(matches!(
            result,
            Err(SpatialError::DirectionCountMismatch {
                directions: 4,
                channels: 3
            })
        ));
    }

    #[test]
    fn test_encode_output_shape() {
        let signals = Array2::<f32>::zeros((4, 128));
        let encoded = encode(1, signals.view(), &tetra()).unwrap();
        assert_eq!(encoded.nrows(), 4);
        assert_eq!(encoded.ncols(), 128);
    }
}
