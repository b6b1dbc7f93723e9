//! MICA CLI — spatial-audio conversion for microphone-array recordings.
//!
//! Provides commands for inspecting the built-in array registry, dumping
//! standardized capsule coordinates, encoding raw A-format WAV sets to
//! B-format ambisonics, and rendering first-order B-format to binaural
//! stereo.
//!
//! # Usage
//!
//! ```bash
//! mica arrays
//! mica coords Eigenmike --form polar --json
//! mica convert ch1.wav ch2.wav ch3.wav ch4.wav --array Ambeo -o bformat.wav
//! mica binaural bformat.wav --hrir kemar.hrir -o stereo.wav
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use mica_assemble::{render_binaural, AmbiFormat, AudioAssembler, MultiChannelBuffer, WavClipSource};
use mica_coords::{get_array, list_arrays, CapsuleGeometry, CoordinateForm};
use mica_spatial::HrirSet;

// ───────────────────────────── CLI definition ─────────────────────────────

/// Top-level CLI entry point for the `mica` binary.
#[derive(Parser)]
#[command(
    name = "mica",
    about = "Microphone-array spatial audio: A-format, ambisonics, binaural",
    version,
    long_about = "Normalizes multi-capsule microphone-array geometry and converts raw\n\
                  per-capsule recordings into calibrated spatial-audio representations:\n\
                  A-format, spherical-harmonic B-format, and binaural stereo."
)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available sub-commands.
#[derive(Subcommand)]
enum Commands {
    /// List the built-in microphone array topologies.
    Arrays {
        /// Output the registry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the standardized capsule coordinates of a built-in array.
    Coords {
        /// Array name (see `mica arrays`).
        array: String,

        /// Coordinate form: polar (radians) or cartesian (meters).
        #[arg(long, default_value = "polar")]
        form: String,

        /// Output the geometry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Convert per-capsule WAV clips between A and B format.
    Convert {
        /// Input WAV file paths, one per capsule, in capsule order.
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output WAV file path.
        #[arg(short, long)]
        output: PathBuf,

        /// Built-in array whose geometry the clips were recorded with.
        #[arg(long)]
        array: Option<String>,

        /// Path to a JSON capsule geometry, overriding --array.
        #[arg(long)]
        coords: Option<PathBuf>,

        /// Ambisonic order (defaults to the largest fully determined one).
        #[arg(long)]
        order: Option<u32>,

        /// Format of the input clips (A or B).
        #[arg(long, default_value = "A")]
        fmt_in: String,

        /// Format to convert to (A or B).
        #[arg(long, default_value = "B")]
        fmt_out: String,

        /// Resample the clips to this rate before converting.
        #[arg(long)]
        target_rate: Option<u32>,
    },

    /// Render a first-order B-format WAV to binaural stereo.
    Binaural {
        /// Input B-format WAV (4 channels, ACN order).
        input: PathBuf,

        /// Path to the binary HRIR table.
        #[arg(long)]
        hrir: PathBuf,

        /// Output stereo WAV file path.
        #[arg(short, long)]
        output: PathBuf,

        /// Resample the input to this rate before rendering.
        #[arg(long)]
        target_rate: Option<u32>,

        /// Ambisonic order of the input (only 1 is supported).
        #[arg(long, default_value_t = 1)]
        order: u32,
    },
}

// ────────────────────────────── main ──────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Arrays { json } => cmd_arrays(json),
        Commands::Coords { array, form, json } => cmd_coords(&array, &form, json),
        Commands::Convert {
            input,
            output,
            array,
            coords,
            order,
            fmt_in,
            fmt_out,
            target_rate,
        } => cmd_convert(
            &input,
            &output,
            array.as_deref(),
            coords.as_deref(),
            order,
            &fmt_in,
            &fmt_out,
            target_rate,
        ),
        Commands::Binaural {
            input,
            hrir,
            output,
            target_rate,
            order,
        } => cmd_binaural(&input, &hrir, &output, target_rate, order),
    }
}

// ───────────────────────────── commands ─────────────────────────────

/// `mica arrays` — list the built-in registry.
fn cmd_arrays(json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = list_arrays()
            .iter()
            .map(|name| {
                let array = get_array(name).expect("registry names resolve");
                serde_json::json!({
                    "name": name,
                    "capsules": array.geometry().len(),
                    "form": array.geometry().form().to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for name in list_arrays() {
            let array = get_array(name).expect("registry names resolve");
            println!(
                "{:<12} {:>3} capsules ({})",
                name,
                array.geometry().len(),
                array.geometry().form()
            );
        }
    }
    Ok(())
}

/// `mica coords` — standardized coordinates of one array.
fn cmd_coords(array: &str, form: &str, json: bool) -> Result<()> {
    let form: CoordinateForm = form.parse()?;
    let standardized = get_array(array)?.standard_coords(form)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&standardized)?);
        return Ok(());
    }
    let header = match form {
        CoordinateForm::Polar => ("colatitude", "azimuth", "radius"),
        CoordinateForm::Cartesian => ("x", "y", "z"),
    };
    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "capsule", header.0, header.1, header.2
    );
    for (name, c) in standardized.iter() {
        println!("{:<10} {:>12.6} {:>12.6} {:>12.6}", name, c[0], c[1], c[2]);
    }
    Ok(())
}

/// `mica convert` — A/B format conversion of per-capsule clips.
#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    input: &[PathBuf],
    output: &Path,
    array: Option<&str>,
    coords: Option<&Path>,
    order: Option<u32>,
    fmt_in: &str,
    fmt_out: &str,
    target_rate: Option<u32>,
) -> Result<()> {
    let fmt_in: AmbiFormat = fmt_in.parse()?;
    let fmt_out: AmbiFormat = fmt_out.parse()?;
    let geometry = load_geometry(array, coords)?;

    let ids: Vec<String> = input
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let assembler = AudioAssembler::new(WavClipSource::new("."));
    let buffer = assembler.convert_clips(
        &ids,
        fmt_in,
        fmt_out,
        geometry.as_ref(),
        order,
        target_rate,
    )?;

    write_wav(output, &buffer)?;
    println!(
        "Wrote {} ({} channels, {} samples, {} Hz, {}-format)",
        output.display(),
        buffer.channels(),
        buffer.samples(),
        buffer.sample_rate(),
        buffer.format()
    );
    Ok(())
}

/// `mica binaural` — first-order B-format to binaural stereo.
fn cmd_binaural(
    input: &Path,
    hrir: &Path,
    output: &Path,
    target_rate: Option<u32>,
    order: u32,
) -> Result<()> {
    let assembler = AudioAssembler::new(WavClipSource::new("."));
    let id = input.to_string_lossy().into_owned();
    let buffer = assembler.load(&[id], AmbiFormat::B)?;

    let hrirs = HrirSet::from_file(hrir)
        .with_context(|| format!("reading HRIR table {}", hrir.display()))?;

    let rate = target_rate.unwrap_or_else(|| buffer.sample_rate());
    let (left, right) = render_binaural(&buffer, &hrirs, target_rate, order)?;

    write_stereo_wav(output, &left, &right, rate)?;
    println!(
        "Wrote {} (2 channels, {} samples, {} Hz)",
        output.display(),
        left.len(),
        rate
    );
    Ok(())
}

// ───────────────────────────── helpers ─────────────────────────────

/// Resolves the capsule geometry from a JSON file or the built-in registry.
fn load_geometry(array: Option<&str>, coords: Option<&Path>) -> Result<Option<CapsuleGeometry>> {
    if let Some(path) = coords {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening geometry file {}", path.display()))?;
        let geometry: CapsuleGeometry = serde_json::from_reader(file)
            .with_context(|| format!("parsing geometry file {}", path.display()))?;
        return Ok(Some(geometry));
    }
    match array {
        Some(name) => Ok(Some(get_array(name)?.geometry().clone())),
        None => Ok(None),
    }
}

/// Writes a multi-channel buffer as a 32-bit float WAV.
fn write_wav(path: &Path, buffer: &MultiChannelBuffer) -> Result<()> {
    if buffer.channels() == 0 {
        bail!("refusing to write a WAV with no channels");
    }
    let spec = hound::WavSpec {
        channels: buffer.channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for t in 0..buffer.samples() {
        for c in 0..buffer.channels() {
            writer.write_sample(buffer.data()[[c, t]])?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Writes a left/right pair as a 32-bit float stereo WAV.
fn write_stereo_wav(path: &Path, left: &[f32], right: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for (l, r) in left.iter().zip(right.iter()) {
        writer.write_sample(*l)?;
        writer.write_sample(*r)?;
    }
    writer.finalize()?;
    Ok(())
}
