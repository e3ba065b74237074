//! # Gravida
//!
//! Obstetric clinical-calculation and risk/alerting engine.
//!
//! This crate provides:
//! - Gestational-age and due-date arithmetic (Naegele's rule, ultrasound redating)
//! - BMI and IOM weight-gain assessment
//! - Multi-factor pregnancy risk scoring
//! - A threshold-based clinical alerting engine over visit readings
//! - Delta-based trend summaries across a visit history
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types and the pure calculation/rules engines
//! - `ports`: Trait definitions for external collaborators (record store, notifier)
//! - `adapters`: Concrete implementations (in-memory store, log notifier)
//! - `application`: Use cases orchestrating domain and ports
//!
//! All domain computation is pure and synchronous over immutable snapshots;
//! persistence and presentation live behind the ports.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{Alert, GestationalAge, RiskAssessment, RiskLevel, Severity};

/// Result type for Gravida operations.
pub type Result<T> = std::result::Result<T, GravidaError>;

/// Main error type for Gravida.
#[derive(Debug, thiserror::Error)]
pub enum GravidaError {
    #[error("Invalid clinical input: {0}")]
    Validation(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
