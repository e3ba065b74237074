//! Adapters layer: Concrete implementations of ports.
//!
//! Real persistence (FHIR resource storage, network calls) is the
//! responsibility of the surrounding application; the adapters here back the
//! ports for local use and tests:
//! - `memory`: in-memory `EpisodeStore`
//! - `log`: `RiskNotifier` that emits structured log events

pub mod log;
pub mod memory;

// Re-export storage error for lib.rs
pub use memory::StorageError;
