//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. All types are
//! serializable and dates are plain calendar dates (`chrono::NaiveDate`);
//! gestational-age math is calendar-date arithmetic, never instant arithmetic.

mod alerts;
mod anthropometrics;
mod episode;
pub mod gestation;
mod reading;
mod risk;
mod trends;

pub use alerts::{
    evaluate_reading, rapid_weight_gain_flowsheet, Alert, Severity, ALERT_HEMOGLOBIN_G_DL,
    RAPID_GAIN_KG_PER_WEEK, RAPID_GAIN_LBS_PER_WEEK,
};
pub use anthropometrics::{
    assess_weight_gain, bmi, recommended_weight_gain_range, Bmi, BmiCategory, WeightGainAssessment,
    WeightGainRange, WeightGainStatus,
};
pub use episode::{Amnionicity, Chorionicity, EddRevision, PregnancyEpisode};
pub use gestation::{FundalHeightRange, GestationalAge, Trimester};
pub use reading::{
    EdemaGrade, FetalMovement, GlucoseTestType, Presentation, UrineGrade, VisitReading,
    DISPLAY_HEMOGLOBIN_G_DL,
};
pub use risk::{assess_high_risk_factors, RiskAssessment, RiskLevel};
pub use trends::{compute_trends, TrendDirection, TrendSummary, TREND_WINDOW};
