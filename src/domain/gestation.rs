//! Gestational dating: due-date and gestational-age arithmetic.
//!
//! All functions operate on plain calendar dates. The anchor for dating is
//! the last menstrual period (LMP); Naegele's rule places the estimated due
//! date 280 days after it.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{GravidaError, Result};

/// Days from LMP to the estimated due date (Naegele's rule).
pub const LMP_TO_EDD_DAYS: i64 = 280;

/// Days from conception to the estimated due date.
pub const CONCEPTION_TO_EDD_DAYS: i64 = 266;

/// Upper sanity bound on a computed gestational age. Anything beyond this is
/// treated as a data-entry error, not a viable pregnancy date.
pub const MAX_GESTATION_DAYS: i64 = 300;

/// Term length in weeks, used for the progress percentage.
pub const TERM_WEEKS: f64 = 40.0;

/// Gestational age expressed as completed weeks plus residual days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestationalAge {
    pub weeks: u32,
    pub days: u32,
    pub total_days: i64,
}

impl GestationalAge {
    /// Gestational age as fractional weeks (e.g. 18w 3d ≈ 18.43).
    #[must_use]
    pub fn as_weeks(&self) -> f64 {
        self.total_days as f64 / 7.0
    }
}

impl std::fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}w {}d", self.weeks, self.days)
    }
}

/// Trimester of pregnancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Human-readable label for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "1st Trimester",
            Self::Second => "2nd Trimester",
            Self::Third => "3rd Trimester",
        }
    }

    /// Trimester number (1-3).
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

/// Estimated due date from the last menstrual period: `lmp + 280 days`.
#[must_use]
pub fn due_date_from_lmp(lmp: NaiveDate) -> NaiveDate {
    lmp + Duration::days(LMP_TO_EDD_DAYS)
}

/// Estimated due date from a known conception date: `conception + 266 days`.
#[must_use]
pub fn due_date_from_conception(conception: NaiveDate) -> NaiveDate {
    conception + Duration::days(CONCEPTION_TO_EDD_DAYS)
}

/// Revised due date from a dating scan.
///
/// The scan reports a gestational age (possibly fractional weeks); the due
/// date is the scan date plus the remaining gestation, rounded to whole days.
#[must_use]
pub fn due_date_from_ultrasound(scan_date: NaiveDate, ga_weeks_at_scan: f64) -> NaiveDate {
    let remaining = (LMP_TO_EDD_DAYS as f64 - ga_weeks_at_scan * 7.0).round() as i64;
    scan_date + Duration::days(remaining)
}

/// Gestational age at `as_of`, anchored on `lmp`.
///
/// # Errors
/// Rejects `as_of` earlier than the LMP, and gestational ages beyond the
/// 300-day sanity bound — callers must surface these as validation failures
/// rather than compute nonsense dates.
pub fn gestational_age(lmp: NaiveDate, as_of: NaiveDate) -> Result<GestationalAge> {
    let total_days = (as_of - lmp).num_days();

    if total_days < 0 {
        return Err(GravidaError::Validation(format!(
            "Date {as_of} precedes LMP {lmp}"
        )));
    }
    if total_days > MAX_GESTATION_DAYS {
        return Err(GravidaError::Validation(format!(
            "Gestational age of {total_days} days exceeds {MAX_GESTATION_DAYS}; check LMP date {lmp}"
        )));
    }

    Ok(GestationalAge {
        weeks: (total_days / 7) as u32,
        days: (total_days % 7) as u32,
        total_days,
    })
}

/// Trimester for a completed gestational week count.
///
/// Weeks 0-13 are the first trimester, 14-27 the second, 28 onward the third.
#[must_use]
pub fn trimester(gestational_weeks: u32) -> Trimester {
    if gestational_weeks < 14 {
        Trimester::First
    } else if gestational_weeks < 28 {
        Trimester::Second
    } else {
        Trimester::Third
    }
}

/// Calendar days from `as_of` until the due date. Negative when past due;
/// callers display "past due" rather than a negative count.
#[must_use]
pub fn days_to_delivery(edd: NaiveDate, as_of: NaiveDate) -> i64 {
    (edd - as_of).num_days()
}

/// Pregnancy progress as a percentage of a 40-week term, capped at 100.
#[must_use]
pub fn pregnancy_progress_percent(gestational_weeks: f64) -> u8 {
    let pct = (gestational_weeks / TERM_WEEKS * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Expected fundal height band for display, cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundalHeightRange {
    pub expected: f64,
    pub min: f64,
    pub max: f64,
}

/// Expected fundal height band for a gestational week count.
///
/// After 20 weeks fundal height in cm tracks gestational weeks; the display
/// band is ±2 cm around that. This band is informational only; the alert
/// engine uses a wider ±3 cm tolerance (see `alerts`).
#[must_use]
pub fn expected_fundal_height(gestational_weeks: u32) -> FundalHeightRange {
    let expected = gestational_weeks as f64;
    FundalHeightRange {
        expected,
        min: expected - 2.0,
        max: expected + 2.0,
    }
}
