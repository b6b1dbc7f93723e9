//! Cross-crate integration tests: geometry standardization → clip assembly
//! → spherical-harmonic encoding → binaural rendering.

use mica_assemble::{
    convert, render_binaural, AmbiFormat, AudioAssembler, Clip, ClipSource, Result,
};
use mica_coords::{get_array, CoordinateForm};
use mica_spatial::{HrirPair, HrirSet};

/// Clip source that synthesizes one deterministic sine per capsule.
struct SineSource {
    sample_rate: u32,
    samples: usize,
}

impl ClipSource for SineSource {
    fn load_clip(&self, id: &str) -> Result<Clip> {
        // Derive a per-clip frequency from the identifier suffix.
        let index: u32 = id
            .rsplit('_')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        let freq = 110.0 * index as f32;
        let channel: Vec<f32> = (0..self.samples)
            .map(|t| {
                (2.0 * std::f32::consts::PI * freq * t as f32 / self.sample_rate as f32).sin()
            })
            .collect();
        Ok(Clip {
            channels: vec![channel],
            sample_rate: self.sample_rate,
        })
    }
}

fn delta_hrirs(sample_rate: u32) -> HrirSet {
    HrirSet::from_parts(
        sample_rate,
        vec![-90.0, 0.0, 90.0, 180.0],
        vec![0.0, 45.0],
        (0..8)
            .map(|_| HrirPair {
                left: vec![1.0],
                right: vec![1.0],
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_ambeo_a_to_b_to_binaural() {
    let assembler = AudioAssembler::new(SineSource {
        sample_rate: 48_000,
        samples: 2_048,
    });
    let geometry = get_array("Ambeo").unwrap().geometry().clone();

    let bformat = assembler
        .convert_clips(
            &["cap_1", "cap_2", "cap_3", "cap_4"],
            AmbiFormat::A,
            AmbiFormat::B,
            Some(&geometry),
            None,
            Some(48_000),
        )
        .unwrap();
    assert_eq!(bformat.format(), AmbiFormat::B);
    assert_eq!(bformat.channels(), 4);
    assert_eq!(bformat.samples(), 2_048);
    assert_eq!(bformat.sample_rate(), 48_000);

    // The W channel of a non-silent recording is non-silent.
    let w_energy: f64 = bformat
        .channel(0)
        .iter()
        .map(|s| f64::from(*s).powi(2))
        .sum();
    assert!(w_energy > 0.0, "W channel should carry signal");

    let (left, right) = render_binaural(&bformat, &delta_hrirs(48_000), None, 1).unwrap();
    assert_eq!(left.len(), 2_048);
    assert_eq!(right.len(), 2_048);
    let energy = |v: &[f32]| -> f64 { v.iter().map(|s| f64::from(*s).powi(2)).sum() };
    assert!(energy(&left) > 0.0 && energy(&right) > 0.0);
}

#[test]
fn test_same_format_at_native_rate_is_bit_identical() {
    let assembler = AudioAssembler::new(SineSource {
        sample_rate: 48_000,
        samples: 512,
    });
    let loaded = assembler
        .load(&["cap_1", "cap_2", "cap_3", "cap_4"], AmbiFormat::A)
        .unwrap();
    let out = assembler
        .convert_clips(
            &["cap_1", "cap_2", "cap_3", "cap_4"],
            AmbiFormat::A,
            AmbiFormat::A,
            None,
            None,
            Some(48_000),
        )
        .unwrap();
    assert_eq!(out, loaded, "no-op conversion at native rate must be exact");
}

#[test]
fn test_eigenmike_default_order() {
    let assembler = AudioAssembler::new(SineSource {
        sample_rate: 48_000,
        samples: 256,
    });
    let eigen = get_array("Eigenmike").unwrap();
    let ids: Vec<String> = (1..=32).map(|i| format!("cap_{i}")).collect();
    let geometry = eigen.geometry().clone();

    // 32 capsules → default order 4 → 25 ambisonic channels.
    let bformat = assembler
        .convert_clips(&ids, AmbiFormat::A, AmbiFormat::B, Some(&geometry), None, None)
        .unwrap();
    assert_eq!(bformat.channels(), 25);
}

#[test]
fn test_standardized_directions_feed_the_encoder() {
    // The assembler standardizes internally; doing it by hand and calling
    // the encoder directly must agree.
    let assembler = AudioAssembler::new(SineSource {
        sample_rate: 48_000,
        samples: 128,
    });
    let geometry = get_array("Ambeo").unwrap().geometry().clone();
    let buffer = assembler
        .load(&["cap_1", "cap_2", "cap_3", "cap_4"], AmbiFormat::A)
        .unwrap();

    let via_convert = convert(&buffer, AmbiFormat::B, Some(&geometry), Some(1)).unwrap();

    let directions = geometry
        .standardize(CoordinateForm::Polar)
        .unwrap()
        .directions()
        .unwrap();
    let direct = mica_spatial::encode(1, buffer.data(), &directions).unwrap();

    assert_eq!(via_convert.data(), direct.view());
}
