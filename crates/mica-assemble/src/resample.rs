//! Whole-buffer sample-rate conversion.

use ndarray::Array2;
use rubato::Resampler;

use crate::buffer::MultiChannelBuffer;
use crate::error::{AssembleError, Result};

/// Aligns a buffer to `target_rate`.
///
/// With no target, or a target equal to the buffer's rate, the buffer is
/// returned unchanged — no resampling distortion is introduced. Otherwise
/// every channel is run through a windowed-sinc resampler in one chunk.
///
/// # Errors
///
/// Returns [`AssembleError::Resample`] when the resampler rejects the
/// rate ratio.
pub fn resample(buffer: &MultiChannelBuffer, target_rate: Option<u32>) -> Result<MultiChannelBuffer> {
    let Some(target) = target_rate else {
        return Ok(buffer.clone());
    };
    if target == buffer.sample_rate() || buffer.samples() == 0 {
        return Ok(MultiChannelBuffer::new(
            buffer.data().to_owned(),
            target,
            buffer.format(),
        ));
    }

    let ratio = f64::from(target) / f64::from(buffer.sample_rate());
    tracing::debug!(
        from = buffer.sample_rate(),
        to = target,
        channels = buffer.channels(),
        "resampling buffer"
    );

    let waves: Vec<Vec<f32>> = (0..buffer.channels())
        .map(|c| buffer.channel(c).to_vec())
        .collect();

    let params = rubato::InterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 160,
        interpolation: rubato::InterpolationType::Cubic,
        window: rubato::WindowFunction::BlackmanHarris2,
    };
    let mut resampler = rubato::SincFixedIn::<f32>::new(
        ratio,
        params,
        buffer.samples(),
        buffer.channels(),
    );
    let resampled = resampler
        .process(&waves)
        .map_err(|e| AssembleError::Resample(e.to_string()))?;

    let out_len = resampled[0].len();
    let mut data = Array2::<f32>::zeros((resampled.len(), out_len));
    for (c, wave) in resampled.iter().enumerate() {
        for (t, &v) in wave.iter().enumerate() {
            data[[c, t]] = v;
        }
    }
    Ok(MultiChannelBuffer::new(data, target, buffer.format()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AmbiFormat;
    use ndarray::Array2;

    fn sine_buffer(rate: u32, samples: usize) -> MultiChannelBuffer {
        let data = Array2::from_shape_fn((2, samples), |(c, t)| {
            let f = 220.0 * (c as f32 + 1.0);
            (2.0 * std::f32::consts::PI * f * t as f32 / rate as f32).sin()
        });
        MultiChannelBuffer::new(data, rate, AmbiFormat::A)
    }

    #[test]
    fn test_no_target_returns_unchanged() {
        let buffer = sine_buffer(48_000, 1024);
        let out = resample(&buffer, None).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_matching_rate_is_identity() {
        let buffer = sine_buffer(48_000, 1024);
        let out = resample(&buffer, Some(48_000)).unwrap();
        assert_eq!(out.data(), buffer.data());
        assert_eq!(out.sample_rate(), 48_000);
    }

    #[test]
    fn test_downsampling_halves_length() {
        let buffer = sine_buffer(48_000, 4800);
        let out = resample(&buffer, Some(24_000)).unwrap();
        assert_eq!(out.sample_rate(), 24_000);
        assert_eq!(out.channels(), 2);
        let expected = 2400.0;
        let got = out.samples() as f64;
        assert!(
            (got - expected).abs() / expected < 0.1,
            "expected ~{} samples, got {}",
            expected,
            got
        );
    }

    #[test]
    fn test_format_and_channels_preserved() {
        let buffer = sine_buffer(44_100, 4410);
        let out = resample(&buffer, Some(22_050)).unwrap();
        assert_eq!(out.format(), AmbiFormat::A);
        assert_eq!(out.channels(), buffer.channels());
    }
}
