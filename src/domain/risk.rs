//! Pregnancy risk factor assessment.
//!
//! A pure aggregation: each triggered factor contributes one entry, and the
//! risk level comes from the factor count alone. No weighting and no factor
//! interaction.

use serde::{Deserialize, Serialize};

use super::episode::PregnancyEpisode;

/// Qualitative pregnancy risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// No identified risk factors
    Low,
    /// One or two risk factors, closer follow-up recommended
    Moderate,
    /// Three or more risk factors, high-risk care pathway
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Routine prenatal schedule",
            Self::Moderate => "Moderate risk - Closer monitoring recommended",
            Self::High => "High risk - Refer to maternal-fetal medicine",
        }
    }

    fn from_factor_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1 | 2 => Self::Moderate,
            _ => Self::High,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Outcome of the risk factor assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Triggered factors in evaluation order.
    pub risk_factors: Vec<String>,
    pub risk_level: RiskLevel,
    pub is_high_risk: bool,
}

/// Evaluate the episode's demographic and history flags.
///
/// Factors are checked in a fixed order so the list reads consistently in
/// displays; the order does not affect the count-based level.
#[must_use]
pub fn assess_high_risk_factors(episode: &PregnancyEpisode) -> RiskAssessment {
    let mut risk_factors = Vec::new();

    if episode.maternal_age_years >= 35 {
        risk_factors.push("Advanced maternal age (≥35)".to_string());
    }
    if episode.maternal_age_years < 18 {
        risk_factors.push("Young maternal age (<18)".to_string());
    }

    if let Some(bmi) = episode.pre_pregnancy_bmi() {
        if bmi < 18.5 {
            risk_factors.push(format!("Underweight (BMI {bmi:.1})"));
        }
        if bmi >= 30.0 {
            risk_factors.push(format!("Obesity (BMI {bmi:.1})"));
        }
    }

    if episode.previous_cesarean {
        risk_factors.push("Previous cesarean delivery".to_string());
    }
    if episode.previous_preterm {
        risk_factors.push("Previous preterm birth".to_string());
    }
    if episode.number_of_fetuses > 1 {
        risk_factors.push("Multiple gestation".to_string());
    }
    if !episode.chronic_conditions.is_empty() {
        risk_factors.push(format!(
            "Chronic conditions: {}",
            episode.chronic_conditions.join(", ")
        ));
    }
    if episode.previous_loss {
        risk_factors.push("Previous pregnancy loss".to_string());
    }

    let risk_level = RiskLevel::from_factor_count(risk_factors.len());
    let is_high_risk = !risk_factors.is_empty();

    RiskAssessment {
        risk_factors,
        risk_level,
        is_high_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn episode(age: u32, weight_kg: f64) -> PregnancyEpisode {
        let lmp = NaiveDate::from_ymd_opt(2024, 11, 8).unwrap();
        PregnancyEpisode::new("ep-1", lmp, age, weight_kg, 165.0)
    }

    #[test]
    fn test_no_factors_is_low_risk() {
        let assessment = assess_high_risk_factors(&episode(29, 60.0));
        assert!(assessment.risk_factors.is_empty());
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(!assessment.is_high_risk);
    }

    #[test]
    fn test_one_factor_is_moderate() {
        let assessment = assess_high_risk_factors(&episode(36, 60.0));
        assert_eq!(assessment.risk_factors.len(), 1);
        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert!(assessment.is_high_risk);
    }

    #[test]
    fn test_three_factors_is_high() {
        let mut ep = episode(36, 60.0);
        ep.previous_cesarean = true;
        ep.number_of_fetuses = 2;

        let assessment = assess_high_risk_factors(&ep);
        assert_eq!(assessment.risk_factors.len(), 3);
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_factor_evaluation_order() {
        let mut ep = episode(36, 95.0); // age + obesity (BMI 34.9)
        ep.previous_loss = true;
        ep.chronic_conditions = vec!["Chronic hypertension".to_string()];

        let assessment = assess_high_risk_factors(&ep);
        assert_eq!(assessment.risk_factors.len(), 4);
        assert!(assessment.risk_factors[0].contains("Advanced maternal age"));
        assert!(assessment.risk_factors[1].contains("Obesity"));
        assert!(assessment.risk_factors[2].contains("Chronic hypertension"));
        assert!(assessment.risk_factors[3].contains("loss"));
    }

    #[test]
    fn test_chronic_conditions_are_one_composite_factor() {
        let mut ep = episode(29, 60.0);
        ep.chronic_conditions =
            vec!["Asthma".to_string(), "Hypothyroidism".to_string()];

        let assessment = assess_high_risk_factors(&ep);
        assert_eq!(assessment.risk_factors.len(), 1);
        assert!(assessment.risk_factors[0].contains("Asthma, Hypothyroidism"));
        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
    }
}
