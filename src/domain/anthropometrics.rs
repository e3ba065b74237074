//! Anthropometric calculators: BMI and gestational weight gain.
//!
//! Weight-gain recommendations follow the IOM (Institute of Medicine) bands
//! by pre-pregnancy BMI category, in kilograms.

use serde::{Deserialize, Serialize};

use crate::{GravidaError, Result};

/// BMI category bands, half-open `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Category for a BMI value.
    #[must_use]
    pub fn from_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Underweight => write!(f, "Underweight"),
            Self::Normal => write!(f, "Normal"),
            Self::Overweight => write!(f, "Overweight"),
            Self::Obese => write!(f, "Obese"),
        }
    }
}

/// Computed body mass index with its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    /// BMI value, rounded to one decimal.
    pub value: f64,
    pub category: BmiCategory,
}

/// Recommended total gestational weight gain, kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Where a patient's gain sits relative to the recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightGainStatus {
    Below,
    OnTrack,
    Above,
}

/// Weight-gain assessment for a visit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainAssessment {
    pub gain_kg: f64,
    pub recommended: WeightGainRange,
    pub status: WeightGainStatus,
}

/// Compute BMI from weight in kg and height in cm.
///
/// # Errors
/// Rejects non-positive weight or height.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<Bmi> {
    if weight_kg <= 0.0 {
        return Err(GravidaError::Validation(format!(
            "Weight {weight_kg} kg must be positive"
        )));
    }
    if height_cm <= 0.0 {
        return Err(GravidaError::Validation(format!(
            "Height {height_cm} cm must be positive"
        )));
    }

    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    let value = (raw * 10.0).round() / 10.0;

    Ok(Bmi {
        value,
        category: BmiCategory::from_value(value),
    })
}

/// IOM recommended total weight gain for a pre-pregnancy BMI.
#[must_use]
pub fn recommended_weight_gain_range(pre_pregnancy_bmi: f64) -> WeightGainRange {
    match BmiCategory::from_value(pre_pregnancy_bmi) {
        BmiCategory::Underweight => WeightGainRange { min_kg: 12.5, max_kg: 18.0 },
        BmiCategory::Normal => WeightGainRange { min_kg: 11.5, max_kg: 16.0 },
        BmiCategory::Overweight => WeightGainRange { min_kg: 7.0, max_kg: 11.5 },
        BmiCategory::Obese => WeightGainRange { min_kg: 5.0, max_kg: 9.0 },
    }
}

/// Assess total weight gain against the IOM range for the pre-pregnancy BMI.
#[must_use]
pub fn assess_weight_gain(
    pre_pregnancy_weight_kg: f64,
    current_weight_kg: f64,
    pre_pregnancy_bmi: f64,
) -> WeightGainAssessment {
    let gain_kg = current_weight_kg - pre_pregnancy_weight_kg;
    let recommended = recommended_weight_gain_range(pre_pregnancy_bmi);
    let status = if gain_kg < recommended.min_kg {
        WeightGainStatus::Below
    } else if gain_kg > recommended.max_kg {
        WeightGainStatus::Above
    } else {
        WeightGainStatus::OnTrack
    };

    WeightGainAssessment { gain_kg, recommended, status }
}
