//! Binaural rendering of first-order ambisonics over measured HRIRs.
//!
//! The renderer feeds a fixed set of eight virtual loudspeakers — a
//! surround quad at ear level plus the same four azimuths raised to 45°
//! elevation — and convolves every speaker feed with the nearest measured
//! HRIR pair. Left and right contributions are summed independently and
//! scaled down by 4 to compensate for eight summed feeds carrying a
//! factor-of-two headroom.
//!
//! Input is ACN-ordered first-order B-format as produced by
//! [`crate::sh::encode`]: rows W, Y, Z, X. Orders other than 1 are
//! rejected.

use ndarray::ArrayView2;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{Result, SpatialError};
use crate::hrir::HrirSet;

/// Virtual loudspeaker directions as `(azimuth, elevation)` in degrees:
/// a surround quad at ear level and a height quad at 45°.
pub const VIRTUAL_SPEAKERS: [(f64, f64); 8] = [
    (45.0, 0.0),
    (-45.0, 0.0),
    (135.0, 0.0),
    (-135.0, 0.0),
    (45.0, 45.0),
    (-45.0, 45.0),
    (135.0, 45.0),
    (-135.0, 45.0),
];

/// Loudness normalization for eight summed speaker feeds.
const OUTPUT_SCALE: f64 = 1.0 / 4.0;

/// Renders first-order B-format to a 2-channel binaural pair.
///
/// `bformat` must have exactly 4 rows (ACN order: W, Y, Z, X);
/// `sample_rate` is the rate of the B-format signal and of the produced
/// output. HRIRs at a different native rate are resampled once up front.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedOrder`] for any `order != 1` and
/// [`SpatialError::ChannelMismatch`] when the input does not have 4
/// channels.
pub fn render(
    order: u32,
    bformat: ArrayView2<'_, f32>,
    hrirs: &HrirSet,
    sample_rate: u32,
) -> Result<(Vec<f32>, Vec<f32>)> {
    if order != 1 {
        return Err(SpatialError::UnsupportedOrder(order));
    }
    if bformat.nrows() != 4 {
        return Err(SpatialError::ChannelMismatch {
            expected: 4,
            got: bformat.nrows(),
        });
    }
    let samples = bformat.ncols();
    if samples == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let resampled;
    let hrirs = if hrirs.sample_rate() == sample_rate {
        hrirs
    } else {
        resampled = hrirs.resampled_to(sample_rate)?;
        &resampled
    };

    tracing::debug!(
        speakers = VIRTUAL_SPEAKERS.len(),
        samples,
        "rendering first-order binaural"
    );

    let w = bformat.row(0);
    let y = bformat.row(1);
    let z = bformat.row(2);
    let x = bformat.row(3);

    let mut left_sum = vec![0.0f64; samples];
    let mut right_sum = vec![0.0f64; samples];

    for &(az_deg, el_deg) in &VIRTUAL_SPEAKERS {
        let az = az_deg.to_radians();
        let el = el_deg.to_radians();
        let gx = az.cos() * el.cos();
        let gy = az.sin() * el.cos();
        let gz = el.sin();

        let feed: Vec<f64> = (0..samples)
            .map(|t| {
                f64::from(w[t])
                    + std::f64::consts::FRAC_1_SQRT_2
                        * (f64::from(x[t]) * gx + f64::from(y[t]) * gy + f64::from(z[t]) * gz)
            })
            .collect();

        let pair = hrirs.nearest(az_deg, el_deg);
        let left = convolve_same(&feed, &pair.left);
        let right = convolve_same(&feed, &pair.right);
        for t in 0..samples {
            left_sum[t] += left[t];
            right_sum[t] += right[t];
        }
    }

    Ok((
        left_sum.iter().map(|v| (v * OUTPUT_SCALE) as f32).collect(),
        right_sum.iter().map(|v| (v * OUTPUT_SCALE) as f32).collect(),
    ))
}

/// FFT convolution trimmed to the signal length, centered on the kernel:
/// output sample `i` is full-convolution sample `i + (len(kernel)-1)/2`.
pub(crate) fn convolve_same(signal: &[f64], kernel: &[f32]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return vec![0.0; n];
    }
    let full_len = n + m - 1;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(full_len);
    let ifft = planner.plan_fft_inverse(full_len);

    let mut a: Vec<Complex<f64>> = signal
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(full_len)
        .collect();
    let mut b: Vec<Complex<f64>> = kernel
        .iter()
        .map(|&v| Complex::new(f64::from(v), 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(full_len)
        .collect();

    fft.process(&mut a);
    fft.process(&mut b);
    for (ai, bi) in a.iter_mut().zip(b.iter()) {
        *ai *= *bi;
    }
    ifft.process(&mut a);

    let scale = 1.0 / full_len as f64;
    let offset = (m - 1) / 2;
    (0..n).map(|i| a[i + offset].re * scale).collect()
}
