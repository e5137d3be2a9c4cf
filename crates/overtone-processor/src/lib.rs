//! Overtone Processor - the stereo harmonic generator pipeline
//!
//! Wraps the `overtone-core` primitives into a host-facing processor:
//!
//! - [`HarmonicProcessor`] - Unprepared / Prepared / Processing state machine
//!   with a fixed-capacity, allocation-free `process_block`
//! - [`HarmonicParams`] - Lock-free parameter store, read once per block via
//!   [`ParamSource::snapshot`]
//! - [`ParamSnapshot`] - One block's parameter values; also the 13-byte
//!   binary state record ([`ParamSnapshot::to_bytes`] / [`ParamSnapshot::from_bytes`])
//! - [`BusLayout`] - Stereo-only layout negotiation
//! - [`DoublePrecisionAdapter`] - `f64` host buffers over the `f32` pipeline
//!
//! # Threading
//!
//! One real-time thread calls `process_block`. Any number of control threads
//! write parameters through a shared `Arc<HarmonicParams>`. `prepare`,
//! `release` and `reset` take `&mut self`, so the borrow checker serializes
//! them against processing.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use overtone_processor::{BusLayout, HarmonicParams, HarmonicProcessor};
//!
//! let params = Arc::new(HarmonicParams::new());
//! let mut processor = HarmonicProcessor::new(Arc::clone(&params));
//!
//! processor.negotiate_layout(BusLayout::STEREO)?;
//! processor.prepare(44100.0, 512)?;
//!
//! params.set_third_harmonic(0.3);
//! params.set_wet_dry_mix(0.5);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! processor.process_block(&mut [&mut left, &mut right])?;
//! # Ok::<(), overtone_processor::ProcessorError>(())
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod layout;
pub mod mixer;
pub mod params;
pub mod pipeline;
pub mod state;

pub use adapter::DoublePrecisionAdapter;
pub use config::ProcessorConfig;
pub use error::{ErrorCategory, ProcessorError, StateError};
pub use layout::{BusLayout, CHANNELS};
pub use mixer::DrySnapshot;
pub use params::{HarmonicParams, ParamSnapshot, ParamSource};
pub use pipeline::{HarmonicProcessor, ProcessorState};
pub use state::STATE_LEN;

pub use overtone_core::DcSlope;
