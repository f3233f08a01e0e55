//! Core utilities and foundational types for the Kiln engine.
//!
//! - [`errors`]: the engine-wide error type and `Result` alias
//! - [`time`]: frame timing used to drive per-tick updates

pub mod errors;
pub mod time;

pub use errors::{KilnError, Result};
pub use time::Timer;
