//! Pregnancy episode: one tracked pregnancy for a patient.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::gestation;

/// Chorionicity for twin gestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chorionicity {
    Monochorionic,
    Dichorionic,
}

/// Amnionicity for twin gestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amnionicity {
    Monoamniotic,
    Diamniotic,
}

/// Audit record for an ultrasound-driven EDD revision.
///
/// The superseded EDD and the scan that prompted the change are retained so
/// the dating history can be reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EddRevision {
    pub revised_on: NaiveDate,
    pub scan_date: NaiveDate,
    pub ga_weeks_at_scan: f64,
    pub previous_edd: NaiveDate,
}

/// One tracked pregnancy for a patient.
///
/// Created when a prenatal episode starts (first LMP entry); risk-affecting
/// fields are mutated as care progresses. Closing the episode at delivery is
/// a collaborator concern, not handled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PregnancyEpisode {
    /// Episode identifier (assigned by the record store).
    pub id: String,

    /// Last menstrual period; anchors all gestational-age math.
    pub lmp_date: NaiveDate,

    /// Estimated due date. `lmp_date + 280` unless revised by ultrasound.
    pub estimated_due_date: NaiveDate,

    /// Audit trail of the latest EDD revision, if any.
    pub edd_revision: Option<EddRevision>,

    /// Total pregnancy count, including this one.
    #[serde(default = "default_gravida")]
    pub gravida: u32,

    /// Count of births at or beyond 20 weeks.
    #[serde(default)]
    pub para: u32,

    pub pre_pregnancy_weight_kg: f64,
    pub height_cm: f64,
    pub maternal_age_years: u32,

    /// At least 1; 2 for twins.
    #[serde(default = "default_fetuses")]
    pub number_of_fetuses: u32,

    /// Only meaningful for twin gestations.
    pub chorionicity: Option<Chorionicity>,
    /// Only meaningful for twin gestations.
    pub amnionicity: Option<Amnionicity>,

    /// Free-text chronic condition names (e.g. "Chronic hypertension").
    #[serde(default)]
    pub chronic_conditions: Vec<String>,

    #[serde(default)]
    pub previous_cesarean: bool,
    #[serde(default)]
    pub previous_preterm: bool,
    #[serde(default)]
    pub previous_loss: bool,
}

fn default_gravida() -> u32 {
    1
}

fn default_fetuses() -> u32 {
    1
}

impl PregnancyEpisode {
    /// Create a new episode anchored on an LMP date.
    ///
    /// The EDD is derived by Naegele's rule; history flags default to false.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        lmp_date: NaiveDate,
        maternal_age_years: u32,
        pre_pregnancy_weight_kg: f64,
        height_cm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            lmp_date,
            estimated_due_date: gestation::due_date_from_lmp(lmp_date),
            edd_revision: None,
            gravida: 1,
            para: 0,
            pre_pregnancy_weight_kg,
            height_cm,
            maternal_age_years,
            number_of_fetuses: 1,
            chorionicity: None,
            amnionicity: None,
            chronic_conditions: Vec::new(),
            previous_cesarean: false,
            previous_preterm: false,
            previous_loss: false,
        }
    }

    /// Revise the EDD from a dating scan, retaining the superseded date.
    pub fn revise_edd_from_ultrasound(
        &mut self,
        scan_date: NaiveDate,
        ga_weeks_at_scan: f64,
        revised_on: NaiveDate,
    ) {
        let previous_edd = self.estimated_due_date;
        self.estimated_due_date = gestation::due_date_from_ultrasound(scan_date, ga_weeks_at_scan);
        self.edd_revision = Some(EddRevision {
            revised_on,
            scan_date,
            ga_weeks_at_scan,
            previous_edd,
        });
    }

    /// Validate the episode record.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.number_of_fetuses < 1 {
            errors.push(format!(
                "Number of fetuses {} must be at least 1",
                self.number_of_fetuses
            ));
        }
        if self.number_of_fetuses != 2
            && (self.chorionicity.is_some() || self.amnionicity.is_some())
        {
            errors.push("Chorionicity/amnionicity only apply to twin gestations".to_string());
        }
        if self.pre_pregnancy_weight_kg <= 0.0 {
            errors.push(format!(
                "Pre-pregnancy weight {} kg must be positive",
                self.pre_pregnancy_weight_kg
            ));
        }
        if self.height_cm <= 0.0 {
            errors.push(format!("Height {} cm must be positive", self.height_cm));
        }
        if !(10..=60).contains(&self.maternal_age_years) {
            errors.push(format!(
                "Maternal age {} out of range [10, 60]",
                self.maternal_age_years
            ));
        }
        if self.gravida < 1 {
            errors.push("Gravida must be at least 1 for an active pregnancy".to_string());
        }
        if self.estimated_due_date <= self.lmp_date {
            errors.push(format!(
                "EDD {} does not follow LMP {}",
                self.estimated_due_date, self.lmp_date
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Pre-pregnancy BMI, when the stored measurements allow it.
    #[must_use]
    pub fn pre_pregnancy_bmi(&self) -> Option<f64> {
        super::anthropometrics::bmi(self.pre_pregnancy_weight_kg, self.height_cm)
            .ok()
            .map(|b| b.value)
    }
}
