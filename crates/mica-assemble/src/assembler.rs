//! Clip assembly and format-conversion orchestration.
//!
//! The assembler fetches per-capsule clips from a [`ClipSource`], stacks
//! them into one [`MultiChannelBuffer`] in identifier order, aligns the
//! result to a target rate, and validates format-conversion requests before
//! delegating the actual math to the spatial crate. Keeping direction order
//! and channel order derived from one geometry is what makes the encoder's
//! row pairing correct by construction.

use mica_coords::{CapsuleGeometry, CoordinateForm};
use mica_spatial::hrir::HrirSet;
use mica_spatial::{binaural, sh, SpatialError};
use ndarray::Array2;

use crate::buffer::{AmbiFormat, MultiChannelBuffer};
use crate::clip::ClipSource;
use crate::error::{AssembleError, Result};
use crate::resample::resample;

/// Fetches and stacks clips from a clip source.
///
/// # Example
///
/// ```no_run
/// use mica_assemble::{AmbiFormat, AudioAssembler, WavClipSource};
/// use mica_coords::get_array;
///
/// let assembler = AudioAssembler::new(WavClipSource::new("recordings/"));
/// let geometry = get_array("Ambeo").unwrap().geometry().clone();
/// let bformat = assembler
///     .convert_clips(
///         &["ch1", "ch2", "ch3", "ch4"],
///         AmbiFormat::A,
///         AmbiFormat::B,
///         Some(&geometry),
///         None,
///         Some(48_000),
///     )
///     .unwrap();
/// assert_eq!(bformat.format(), AmbiFormat::B);
/// ```
#[derive(Debug, Clone)]
pub struct AudioAssembler<S: ClipSource> {
    source: S,
}

impl<S: ClipSource> AudioAssembler<S> {
    /// Creates an assembler over the given clip source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying clip source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads the named clips and stacks them into one buffer, one row per
    /// clip channel, in identifier order.
    ///
    /// Mono clips contribute a single row; multi-channel clips contribute
    /// one row per channel. The buffer's rate is the first clip's native
    /// rate; clips at other rates are kept as-is and flagged with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::EmptyClipList`] for an empty identifier
    /// list, [`AssembleError::ClipLengthMismatch`] when clips disagree on
    /// sample count, and clip-source errors verbatim.
    pub fn load<I: AsRef<str>>(&self, ids: &[I], format: AmbiFormat) -> Result<MultiChannelBuffer> {
        if ids.is_empty() {
            return Err(AssembleError::EmptyClipList);
        }

        let mut rows: Vec<Vec<f32>> = Vec::with_capacity(ids.len());
        let mut native_rate: Option<u32> = None;
        let mut expected_len: Option<usize> = None;

        for id in ids {
            let id = id.as_ref();
            let clip = self.source.load_clip(id)?;
            if clip.channels.is_empty() {
                return Err(AssembleError::ClipLoad {
                    id: id.to_string(),
                    reason: "clip has no channels".to_string(),
                });
            }
            match native_rate {
                None => native_rate = Some(clip.sample_rate),
                Some(rate) if rate != clip.sample_rate => {
                    tracing::warn!(
                        clip = id,
                        first_rate = rate,
                        clip_rate = clip.sample_rate,
                        "clips disagree on native sample rate; keeping the first clip's rate"
                    );
                }
                Some(_) => {}
            }
            for channel in clip.channels {
                match expected_len {
                    None => expected_len = Some(channel.len()),
                    Some(len) if len != channel.len() => {
                        return Err(AssembleError::ClipLengthMismatch {
                            id: id.to_string(),
                            expected: len,
                            got: channel.len(),
                        });
                    }
                    Some(_) => {}
                }
                rows.push(channel);
            }
        }

        let samples = expected_len.unwrap_or(0);
        let mut data = Array2::<f32>::zeros((rows.len(), samples));
        for (r, row) in rows.iter().enumerate() {
            for (t, &v) in row.iter().enumerate() {
                data[[r, t]] = v;
            }
        }
        Ok(MultiChannelBuffer::new(
            data,
            native_rate.expect("at least one clip was loaded"),
            format,
        ))
    }

    /// Loads, aligns, and converts in one call: the full A/B pipeline for a
    /// set of clip identifiers.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`AudioAssembler::load`],
    /// [`resample`](crate::resample::resample), and [`convert`].
    pub fn convert_clips<I: AsRef<str>>(
        &self,
        ids: &[I],
        fmt_in: AmbiFormat,
        fmt_out: AmbiFormat,
        geometry: Option<&CapsuleGeometry>,
        order: Option<u32>,
        target_rate: Option<u32>,
    ) -> Result<MultiChannelBuffer> {
        let buffer = self.load(ids, fmt_in)?;
        let buffer = resample(&buffer, target_rate)?;
        convert(&buffer, fmt_out, geometry, order)
    }
}

/// The ambisonic order used when none is requested: `⌊√capsules⌋ − 1`,
/// the largest order that is always fully determined by the capsule count.
pub fn default_order(capsules: usize) -> u32 {
    ((capsules as f64).sqrt().floor() as u32).saturating_sub(1)
}

/// Converts a buffer between A and B format.
///
/// The buffer's own tag is the source format. Supported requests:
///
/// - same format: the buffer is returned unchanged (an `order` given here
///   is ignored with a warning);
/// - A → B: requires `geometry`; the geometry is standardized to polar
///   radians, `order` defaults to [`default_order`], and the capsule
///   signals are encoded through the spherical-harmonic pseudo-inverse.
///
/// # Errors
///
/// Returns [`AssembleError::UnsupportedConversion`] for B → A,
/// [`AssembleError::MissingCoordinates`] for A → B without a geometry, and
/// [`SpatialError::UnderDeterminedOrder`] when `(order + 1)²` exceeds the
/// channel count.
pub fn convert(
    buffer: &MultiChannelBuffer,
    fmt_out: AmbiFormat,
    geometry: Option<&CapsuleGeometry>,
    order: Option<u32>,
) -> Result<MultiChannelBuffer> {
    let fmt_in = buffer.format();
    if fmt_in == AmbiFormat::B && fmt_out == AmbiFormat::A {
        return Err(AssembleError::UnsupportedConversion {
            from: fmt_in,
            to: fmt_out,
        });
    }
    if fmt_in == fmt_out {
        if order.is_some() {
            tracing::warn!("order parameter was specified but not used");
        }
        return Ok(buffer.clone());
    }

    // A → B.
    let geometry = geometry.ok_or(AssembleError::MissingCoordinates)?;
    let polar = geometry.standardize(CoordinateForm::Polar)?;
    let directions = polar.directions()?;

    let capsules = buffer.channels();
    let order = order.unwrap_or_else(|| default_order(capsules));
    let needed = sh::channel_count(order);
    if needed > capsules {
        return Err(SpatialError::UnderDeterminedOrder {
            order,
            needed,
            capsules,
        }
        .into());
    }

    let encoded = sh::encode(order, buffer.data(), &directions)?;
    Ok(MultiChannelBuffer::new(
        encoded,
        buffer.sample_rate(),
        AmbiFormat::B,
    ))
}

/// Renders a first-order B-format buffer to a binaural stereo pair.
///
/// The buffer is aligned to `target_rate` first when one is given; the
/// HRIR set is resampled to the output rate by the renderer.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedOrder`] for any `order != 1` and
/// [`AssembleError::FormatMismatch`] when the buffer is not B-format.
pub fn render_binaural(
    buffer: &MultiChannelBuffer,
    hrirs: &HrirSet,
    target_rate: Option<u32>,
    order: u32,
) -> Result<(Vec<f32>, Vec<f32>)> {
    if order != 1 {
        return Err(SpatialError::UnsupportedOrder(order).into());
    }
    if buffer.format() != AmbiFormat::B {
        return Err(AssembleError::FormatMismatch {
            expected: AmbiFormat::B,
            got: buffer.format(),
        });
    }
    let buffer = resample(buffer, target_rate)?;
    let rendered = binaural::render(order, buffer.data(), hrirs, buffer.sample_rate())?;
    Ok(rendered)
}
