//! Visit readings: one clinical encounter's measurements.
//!
//! All measurement fields are optional — rules that depend on absent fields
//! simply do not fire. Readings for one episode are totally ordered by visit
//! date; the store rejects duplicate dates on insert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hemoglobin below this is flagged in flowsheet displays. The alert engine
/// uses a separate, lower cutoff (`ALERT_HEMOGLOBIN_G_DL`); the two are
/// deliberately not unified.
pub const DISPLAY_HEMOGLOBIN_G_DL: f64 = 11.0;

/// Urine dipstick grade, ordered Negative < Trace < +1 < +2 < +3 < +4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UrineGrade {
    Negative,
    Trace,
    PlusOne,
    PlusTwo,
    PlusThree,
    PlusFour,
}

impl UrineGrade {
    /// Anything above Negative counts as a positive finding.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        *self > Self::Negative
    }
}

impl std::fmt::Display for UrineGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative"),
            Self::Trace => write!(f, "Trace"),
            Self::PlusOne => write!(f, "+1"),
            Self::PlusTwo => write!(f, "+2"),
            Self::PlusThree => write!(f, "+3"),
            Self::PlusFour => write!(f, "+4"),
        }
    }
}

/// Peripheral edema grade, ordered Absent < Trace < +1 < +2 < +3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdemaGrade {
    Absent,
    Trace,
    PlusOne,
    PlusTwo,
    PlusThree,
}

impl std::fmt::Display for EdemaGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Trace => write!(f, "Trace"),
            Self::PlusOne => write!(f, "+1"),
            Self::PlusTwo => write!(f, "+2"),
            Self::PlusThree => write!(f, "+3"),
        }
    }
}

/// Reported fetal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetalMovement {
    Present,
    Reduced,
    Absent,
}

impl std::fmt::Display for FetalMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "Present"),
            Self::Reduced => write!(f, "Reduced"),
            Self::Absent => write!(f, "Absent"),
        }
    }
}

/// Fetal presentation on exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presentation {
    Vertex,
    Breech,
    Transverse,
    Oblique,
}

/// Which glucose screening protocol a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlucoseTestType {
    Fasting,
    Random,
    OneHourOgtt,
    TwoHourOgtt,
}

/// One clinical encounter's measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitReading {
    pub visit_date: NaiveDate,

    // Maternal vitals
    pub weight_kg: Option<f64>,
    pub bp_systolic: Option<u16>,
    pub bp_diastolic: Option<u16>,
    pub pulse: Option<u16>,
    pub temperature_c: Option<f64>,

    // Urine dipstick
    pub urine_protein: Option<UrineGrade>,
    pub urine_glucose: Option<UrineGrade>,
    pub urine_ketones: Option<UrineGrade>,

    // Exam findings
    pub fundal_height_cm: Option<f64>,
    pub edema: Option<EdemaGrade>,

    // Fetal findings
    pub fetal_heart_rate_bpm: Option<u16>,
    pub fetal_movement: Option<FetalMovement>,
    pub presentation: Option<Presentation>,

    // Labs, when drawn
    pub hemoglobin_g_dl: Option<f64>,
    pub glucose_mg_dl: Option<f64>,
    pub glucose_test_type: Option<GlucoseTestType>,
}

impl VisitReading {
    /// Empty reading for a visit date; measurement fields filled per encounter.
    #[must_use]
    pub fn new(visit_date: NaiveDate) -> Self {
        Self {
            visit_date,
            weight_kg: None,
            bp_systolic: None,
            bp_diastolic: None,
            pulse: None,
            temperature_c: None,
            urine_protein: None,
            urine_glucose: None,
            urine_ketones: None,
            fundal_height_cm: None,
            edema: None,
            fetal_heart_rate_bpm: None,
            fetal_movement: None,
            presentation: None,
            hemoglobin_g_dl: None,
            glucose_mg_dl: None,
            glucose_test_type: None,
        }
    }

    /// Flowsheet display flag for low hemoglobin (`< 11.0 g/dL`).
    ///
    /// Distinct from the alert-worthy anemia cutoff used by the alert engine.
    #[must_use]
    pub fn hemoglobin_low_for_display(&self) -> bool {
        self.hemoglobin_g_dl
            .map(|hb| hb < DISPLAY_HEMOGLOBIN_G_DL)
            .unwrap_or(false)
    }
}
