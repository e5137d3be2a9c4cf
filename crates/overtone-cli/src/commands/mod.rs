//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod generate;
pub mod presets;
pub mod process;
pub mod state;
