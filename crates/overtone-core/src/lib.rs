//! Overtone Core - DSP primitives for the harmonic generator
//!
//! This crate provides the building blocks of the overtone signal path,
//! designed for real-time processing with zero allocation in the audio path.
//!
//! # Signal Path
//!
//! ```text
//! input ─┬─► [Oversampler up] ─► HarmonicShaper ─► DcBlocker ─► [Oversampler down] ─┬─► mix ─► output
//!        └──────────────────────────── dry ─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! ## Multirate
//!
//! - [`Oversampler`] - Stereo 4× converter, two cascaded half-band stages
//! - [`HalfBandStage`] - Polyphase allpass 2× stage with elliptic design
//! - [`UpsampledBlock`] - Guard tying `process_up` to `process_down`
//!
//! ## Nonlinearity
//!
//! - [`HarmonicShaper`] - Envelope-gated 2nd/3rd harmonic waveshaper
//! - [`shape`] - The memoryless transfer curve
//!
//! ## Filters
//!
//! - [`DcBlocker`] - ~10 Hz high-pass with base-rate and oversampled coefficients
//! - [`BiquadState`] / [`BiquadCoefficients`] - Direct Form I section
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Range, default, skew and stable ids of each parameter
//!
//! ## Utilities
//!
//! - [`flush_denormal`], [`wet_dry_mix`], [`hard_clip`], [`linear_to_db`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for the oversampler's
//! scratch buffers). Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! overtone-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: Buffers are sized in `prepare`, never while processing
//! - **Stereo by construction**: Per-channel state arrays are sized by [`MAX_CHANNELS`]
//! - **No dependencies on std**: Pure `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod dc_blocker;
pub mod halfband;
pub mod harmonic;
pub mod math;
pub mod oversample;
pub mod param_info;

/// Number of channels every per-channel state array holds.
pub const MAX_CHANNELS: usize = 2;

// Re-export main types at crate root
pub use biquad::{
    BiquadCoefficients, BiquadState, first_order_highpass_coefficients, highpass_coefficients,
};
pub use dc_blocker::{DcBlocker, DcSlope};
pub use halfband::HalfBandStage;
pub use harmonic::{
    ChannelEnvelope, ENVELOPE_ATTACK, HarmonicGains, HarmonicShaper, SECOND_GAIN_SCALE,
    SHAPE_INPUT_LIMIT, SILENCE_THRESHOLD, THIRD_GAIN_SCALE, shape,
};
pub use math::{flush_denormal, hard_clip, linear_to_db, wet_dry_mix};
pub use oversample::{CapacityError, OVERSAMPLE_FACTOR, Oversampler, ProcessingRate, UpsampledBlock};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};
