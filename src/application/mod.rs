//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the engine's operations over stored episodes and readings.

mod prenatal;

pub use prenatal::{GestationalStatus, PrenatalService};
