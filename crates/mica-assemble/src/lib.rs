//! # mica-assemble — Clip assembly and format conversion
//!
//! Bridges raw per-capsule recordings and the spatial encoders:
//!
//! - **[`clip`]**: the [`ClipSource`] collaborator trait plus the provided
//!   [`WavClipSource`] baseline implementation.
//! - **[`buffer`]**: [`MultiChannelBuffer`] — equal-length channels at one
//!   sample rate, tagged A (raw capsule) or B (ambisonic).
//! - **[`resample`]**: whole-buffer alignment to a target sample rate.
//! - **[`assembler`]**: [`AudioAssembler`] — load/stack clips in order,
//!   validate conversion requests, delegate the math, and gate binaural
//!   rendering to first order.
//! - **[`error`]**: typed errors for every failure mode; warnings
//!   (ignored order, mixed native rates) go through `tracing`.

pub mod assembler;
pub mod buffer;
pub mod clip;
pub mod error;
pub mod resample;

pub use assembler::{convert, default_order, render_binaural, AudioAssembler};
pub use buffer::{AmbiFormat, MultiChannelBuffer};
pub use clip::{Clip, ClipSource, WavClipSource};
pub use error::{AssembleError, Result};
pub use resample::resample;
