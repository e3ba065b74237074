//! Clinical alerting engine: threshold rules over a single visit reading.
//!
//! Each rule is a pure classifier over the reading (two rules also look at
//! the immediately preceding reading). A reading may produce zero, one, or
//! several alerts; alerts of the same category are never merged — callers
//! tally counts by severity for banner display.
//!
//! A wrong severity classification here is a patient-safety defect. Every
//! threshold is a named constant and is never overridden at runtime.

use serde::{Deserialize, Serialize};

use super::episode::PregnancyEpisode;
use super::gestation;
use super::reading::{EdemaGrade, FetalMovement, GlucoseTestType, VisitReading};
use crate::Result;

/// Severe hypertension: systolic at/above this is an obstetric emergency.
pub const BP_SEVERE_SYSTOLIC: u16 = 160;
pub const BP_SEVERE_DIASTOLIC: u16 = 110;
/// Hypertension in pregnancy.
pub const BP_HIGH_SYSTOLIC: u16 = 140;
pub const BP_HIGH_DIASTOLIC: u16 = 90;
/// Elevated blood pressure, watch closely.
pub const BP_ELEVATED_SYSTOLIC: u16 = 130;
pub const BP_ELEVATED_DIASTOLIC: u16 = 85;

/// Normal fetal heart rate band; the boundaries themselves are normal.
pub const FHR_LOW_BPM: u16 = 110;
pub const FHR_HIGH_BPM: u16 = 160;

/// Fundal-height-vs-gestational-age alert tolerance, cm. Wider than the
/// ±2 cm expected-range display band; keep the asymmetry.
pub const FUNDAL_HEIGHT_ALERT_TOLERANCE_CM: f64 = 3.0;

/// Gestational diabetes screening cutoffs, mg/dL.
pub const GLUCOSE_FASTING_MGDL: f64 = 95.0;
pub const GLUCOSE_ONE_HOUR_OGTT_MGDL: f64 = 140.0;

/// Alert-worthy anemia cutoff. The flowsheet display flag uses a separate
/// 11.0 g/dL cutoff (`reading::DISPLAY_HEMOGLOBIN_G_DL`); the two are
/// deliberately not unified.
pub const ALERT_HEMOGLOBIN_G_DL: f64 = 10.0;

/// Rapid weight gain, vitals-grade rule (kg/week, past 13 weeks).
pub const RAPID_GAIN_KG_PER_WEEK: f64 = 1.0;
/// Rapid weight gain, flowsheet-grade variant (lbs/week).
pub const RAPID_GAIN_LBS_PER_WEEK: f64 = 2.0;

/// First-trimester weeks are excluded from the weight-gain-rate rule.
pub const RAPID_GAIN_MIN_GA_WEEKS: f64 = 13.0;

/// Alert severity for banner display and triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// One clinical alert attached to a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    /// Clinical domain, e.g. "Blood Pressure".
    pub category: String,
    pub message: String,
    pub recommendation: Option<String>,
}

impl Alert {
    fn new(
        severity: Severity,
        category: &str,
        message: String,
        recommendation: &str,
    ) -> Self {
        Self {
            severity,
            category: category.to_string(),
            message,
            recommendation: Some(recommendation.to_string()),
        }
    }
}

/// Run every applicable rule against a reading.
///
/// `previous` is the immediately preceding reading for the same episode, used
/// by the weight-gain-rate rule; `None` skips it. Rules run in a fixed order
/// (BP, preeclampsia combination, FHR, fundal height, glucose, hemoglobin,
/// fetal movement, weight-gain rate, edema) and the output preserves it.
///
/// Idempotent; inputs are never mutated.
///
/// # Errors
/// Fails when the visit date has an invalid relationship to the episode LMP
/// (gestational-age validation).
pub fn evaluate_reading(
    episode: &PregnancyEpisode,
    reading: &VisitReading,
    previous: Option<&VisitReading>,
) -> Result<Vec<Alert>> {
    let ga = gestation::gestational_age(episode.lmp_date, reading.visit_date)?;

    let mut alerts = Vec::new();

    check_blood_pressure(reading, &mut alerts);
    check_preeclampsia_combination(reading, &mut alerts);
    check_fetal_heart_rate(reading, &mut alerts);
    check_fundal_height(reading, ga.weeks, &mut alerts);
    check_glucose(reading, &mut alerts);
    check_hemoglobin(reading, &mut alerts);
    check_fetal_movement(reading, &mut alerts);
    if let Some(prev) = previous {
        check_weight_gain_rate(episode, reading, prev, &mut alerts)?;
    }
    check_edema(reading, &mut alerts);

    Ok(alerts)
}

fn check_blood_pressure(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let (Some(sys), Some(dia)) = (reading.bp_systolic, reading.bp_diastolic) else {
        return;
    };

    if sys >= BP_SEVERE_SYSTOLIC || dia >= BP_SEVERE_DIASTOLIC {
        alerts.push(Alert::new(
            Severity::Critical,
            "Blood Pressure",
            format!("Severe hypertension: {sys}/{dia} mmHg"),
            "Immediate evaluation required. Check for preeclampsia.",
        ));
    } else if sys >= BP_HIGH_SYSTOLIC || dia >= BP_HIGH_DIASTOLIC {
        alerts.push(Alert::new(
            Severity::Critical,
            "Blood Pressure",
            format!("Hypertension: {sys}/{dia} mmHg"),
            "Recheck BP, order urine protein, LFT/RFT if sustained.",
        ));
    } else if sys >= BP_ELEVATED_SYSTOLIC || dia >= BP_ELEVATED_DIASTOLIC {
        alerts.push(Alert::new(
            Severity::Warning,
            "Blood Pressure",
            format!("Elevated BP: {sys}/{dia} mmHg"),
            "Monitor closely, recheck in 15 minutes.",
        ));
    }
}

// Fires in addition to the plain BP rule; both alerts may appear for one
// reading.
fn check_preeclampsia_combination(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let (Some(protein), Some(sys)) = (reading.urine_protein, reading.bp_systolic) else {
        return;
    };

    if protein.is_positive() && sys >= BP_HIGH_SYSTOLIC {
        alerts.push(Alert::new(
            Severity::Critical,
            "Preeclampsia Risk",
            format!("Proteinuria ({protein}) + Hypertension detected"),
            "Evaluate for preeclampsia: order 24-hr urine, LFT, RFT, platelets.",
        ));
    }
}

fn check_fetal_heart_rate(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let Some(fhr) = reading.fetal_heart_rate_bpm else {
        return;
    };

    if fhr < FHR_LOW_BPM {
        alerts.push(Alert::new(
            Severity::Critical,
            "Fetal Heart Rate",
            format!("Fetal bradycardia: {fhr} bpm"),
            "Immediate evaluation - consider NST or ultrasound.",
        ));
    } else if fhr > FHR_HIGH_BPM {
        alerts.push(Alert::new(
            Severity::Critical,
            "Fetal Heart Rate",
            format!("Fetal tachycardia: {fhr} bpm"),
            "Rule out maternal fever, fetal distress, or infection.",
        ));
    }
}

fn check_fundal_height(reading: &VisitReading, ga_weeks: u32, alerts: &mut Vec<Alert>) {
    let Some(fh) = reading.fundal_height_cm else {
        return;
    };

    let expected = ga_weeks as f64;
    if (fh - expected).abs() > FUNDAL_HEIGHT_ALERT_TOLERANCE_CM {
        let message = if fh < expected {
            format!("Fundal height {fh} cm < GA {ga_weeks} weeks (possible IUGR)")
        } else {
            format!("Fundal height {fh} cm > GA {ga_weeks} weeks (possible polyhydramnios/twins)")
        };
        alerts.push(Alert::new(
            Severity::Warning,
            "Fundal Height",
            message,
            "Consider growth ultrasound.",
        ));
    }
}

// Random and 2-hour results have no screening cutoff in this rule; they pass
// through without an alert.
fn check_glucose(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let (Some(glucose), Some(test_type)) = (reading.glucose_mg_dl, reading.glucose_test_type)
    else {
        return;
    };

    match test_type {
        GlucoseTestType::Fasting if glucose >= GLUCOSE_FASTING_MGDL => {
            alerts.push(Alert::new(
                Severity::Warning,
                "Glucose",
                format!("Elevated fasting glucose: {glucose} mg/dL"),
                "Evaluate for gestational diabetes - order 3-hour OGTT.",
            ));
        }
        GlucoseTestType::OneHourOgtt if glucose >= GLUCOSE_ONE_HOUR_OGTT_MGDL => {
            alerts.push(Alert::new(
                Severity::Warning,
                "Glucose",
                format!("1-hour OGTT elevated: {glucose} mg/dL"),
                "Screen positive for GDM - order 3-hour OGTT.",
            ));
        }
        _ => {}
    }
}

fn check_hemoglobin(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let Some(hb) = reading.hemoglobin_g_dl else {
        return;
    };

    if hb < ALERT_HEMOGLOBIN_G_DL {
        alerts.push(Alert::new(
            Severity::Warning,
            "Hemoglobin",
            format!("Anemia: Hb {hb} g/dL"),
            "Start iron supplementation, recheck in 4 weeks.",
        ));
    }
}

fn check_fetal_movement(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let Some(movement) = reading.fetal_movement else {
        return;
    };

    if matches!(movement, FetalMovement::Reduced | FetalMovement::Absent) {
        alerts.push(Alert::new(
            Severity::Critical,
            "Fetal Movement",
            format!("{movement} fetal movement"),
            "Urgent: Order NST or biophysical profile.",
        ));
    }
}

fn check_weight_gain_rate(
    episode: &PregnancyEpisode,
    reading: &VisitReading,
    previous: &VisitReading,
    alerts: &mut Vec<Alert>,
) -> Result<()> {
    let (Some(weight), Some(prev_weight)) = (reading.weight_kg, previous.weight_kg) else {
        return Ok(());
    };

    let ga = gestation::gestational_age(episode.lmp_date, reading.visit_date)?;
    let prev_ga = gestation::gestational_age(episode.lmp_date, previous.visit_date)?;

    let weeks_diff = ga.as_weeks() - prev_ga.as_weeks();
    if weeks_diff <= 0.0 {
        return Ok(());
    }

    let change = weight - prev_weight;
    let rate_per_week = change / weeks_diff;

    if ga.as_weeks() > RAPID_GAIN_MIN_GA_WEEKS && rate_per_week > RAPID_GAIN_KG_PER_WEEK {
        alerts.push(Alert::new(
            Severity::Warning,
            "Weight Gain",
            format!("Rapid weight gain: {change:.1} kg in {weeks_diff:.1} weeks"),
            "Evaluate for fluid retention, preeclampsia.",
        ));
    }

    Ok(())
}

fn check_edema(reading: &VisitReading, alerts: &mut Vec<Alert>) {
    let Some(edema) = reading.edema else {
        return;
    };

    match edema {
        EdemaGrade::Absent => {}
        EdemaGrade::Trace | EdemaGrade::PlusOne => {
            alerts.push(Alert::new(
                Severity::Info,
                "Edema",
                format!("Mild edema ({edema})"),
                "Counsel on leg elevation; reassess at next visit.",
            ));
        }
        EdemaGrade::PlusTwo | EdemaGrade::PlusThree => {
            alerts.push(Alert::new(
                Severity::Warning,
                "Edema",
                format!("Moderate edema ({edema})"),
                "Check BP and urine protein; evaluate for preeclampsia.",
            ));
        }
    }
}

/// Flowsheet-grade rapid-gain check over weights recorded in pounds.
///
/// This call site's threshold is 2 lbs/week, distinct from the 1 kg/week
/// vitals rule above; the two are preserved separately until a domain expert
/// settles which is authoritative.
#[must_use]
pub fn rapid_weight_gain_flowsheet(
    previous_weight_lbs: f64,
    current_weight_lbs: f64,
    weeks_between: f64,
) -> Option<Alert> {
    if weeks_between <= 0.0 {
        return None;
    }

    let change = current_weight_lbs - previous_weight_lbs;
    let rate_per_week = change / weeks_between;
    if rate_per_week > RAPID_GAIN_LBS_PER_WEEK {
        Some(Alert::new(
            Severity::Warning,
            "Weight Gain",
            format!("Rapid weight gain: {change:.1} lbs in {weeks_between:.1} weeks"),
            "Evaluate for fluid retention, preeclampsia.",
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::UrineGrade;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn episode() -> PregnancyEpisode {
        PregnancyEpisode::new("ep-1", d(2024, 11, 8), 29, 60.0, 165.0)
    }

    fn reading(date: NaiveDate) -> VisitReading {
        VisitReading::new(date)
    }

    // ~27 weeks after the test episode's LMP.
    fn visit_date() -> NaiveDate {
        d(2025, 5, 16)
    }

    fn categories(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.category.as_str()).collect()
    }

    #[test]
    fn test_normal_reading_produces_no_alerts() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(118);
        r.bp_diastolic = Some(72);
        r.fetal_heart_rate_bpm = Some(142);
        r.fundal_height_cm = Some(27.0);
        r.urine_protein = Some(UrineGrade::Negative);
        r.edema = Some(EdemaGrade::Absent);
        r.fetal_movement = Some(FetalMovement::Present);
        r.hemoglobin_g_dl = Some(12.1);
        r.glucose_mg_dl = Some(92.0);
        r.glucose_test_type = Some(GlucoseTestType::Fasting);

        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts.is_empty(), "unexpected alerts: {alerts:?}");
    }

    #[test]
    fn test_elevated_bp_is_warning_without_preeclampsia_combo() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(135);
        r.bp_diastolic = Some(86);
        r.urine_protein = Some(UrineGrade::Negative);

        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(categories(&alerts), vec!["Blood Pressure"]);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!(alerts[0].message.contains("Elevated BP: 135/86"));
    }

    #[test]
    fn test_hypertension_with_proteinuria_fires_both_alerts() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(145);
        r.bp_diastolic = Some(70);
        r.urine_protein = Some(UrineGrade::PlusOne);

        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(categories(&alerts), vec!["Blood Pressure", "Preeclampsia Risk"]);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[1].severity, Severity::Critical);
        assert!(alerts[1].message.contains("+1"));
    }

    #[test]
    fn test_severe_hypertension_tier() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(162);
        r.bp_diastolic = Some(88);

        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("Severe hypertension"));
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_fhr_boundaries_are_normal() {
        for fhr in [110u16, 160] {
            let mut r = reading(visit_date());
            r.fetal_heart_rate_bpm = Some(fhr);
            let alerts = evaluate_reading(&episode(), &r, None).unwrap();
            assert!(alerts.is_empty(), "FHR {fhr} should be normal");
        }
    }

    #[test]
    fn test_fetal_bradycardia_and_tachycardia() {
        let mut r = reading(visit_date());
        r.fetal_heart_rate_bpm = Some(108);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("bradycardia: 108"));
        assert_eq!(alerts[0].severity, Severity::Critical);

        let mut r = reading(visit_date());
        r.fetal_heart_rate_bpm = Some(165);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts[0].message.contains("tachycardia: 165"));
    }

    #[test]
    fn test_fundal_height_uses_wider_alert_tolerance() {
        // GA at visit is 27 weeks. 24 cm is 3 below: outside the ±2 display
        // band but within the ±3 alert tolerance.
        let mut r = reading(visit_date());
        r.fundal_height_cm = Some(24.0);
        assert!(evaluate_reading(&episode(), &r, None).unwrap().is_empty());

        r.fundal_height_cm = Some(23.0);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("possible IUGR"));

        r.fundal_height_cm = Some(31.0);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts[0].message.contains("polyhydramnios"));
    }

    #[test]
    fn test_glucose_screening_thresholds() {
        let mut r = reading(visit_date());
        r.glucose_mg_dl = Some(96.0);
        r.glucose_test_type = Some(GlucoseTestType::Fasting);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts[0].message.contains("Elevated fasting glucose"));

        let mut r = reading(visit_date());
        r.glucose_mg_dl = Some(145.0);
        r.glucose_test_type = Some(GlucoseTestType::OneHourOgtt);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts[0].message.contains("1-hour OGTT elevated"));

        // Random results have no cutoff in this rule.
        let mut r = reading(visit_date());
        r.glucose_mg_dl = Some(180.0);
        r.glucose_test_type = Some(GlucoseTestType::Random);
        assert!(evaluate_reading(&episode(), &r, None).unwrap().is_empty());
    }

    #[test]
    fn test_anemia_alert_uses_lower_cutoff_than_display() {
        let mut r = reading(visit_date());
        r.hemoglobin_g_dl = Some(10.5);
        // Display-flagged (< 11.0) but not alert-worthy (>= 10.0).
        assert!(r.hemoglobin_low_for_display());
        assert!(evaluate_reading(&episode(), &r, None).unwrap().is_empty());

        r.hemoglobin_g_dl = Some(9.8);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert!(alerts[0].message.contains("Anemia: Hb 9.8"));
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_reduced_fetal_movement_is_critical() {
        for movement in [FetalMovement::Reduced, FetalMovement::Absent] {
            let mut r = reading(visit_date());
            r.fetal_movement = Some(movement);
            let alerts = evaluate_reading(&episode(), &r, None).unwrap();
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].severity, Severity::Critical);
            assert!(alerts[0]
                .recommendation
                .as_deref()
                .unwrap()
                .contains("NST"));
        }
    }

    #[test]
    fn test_rapid_weight_gain_requires_predecessor() {
        let mut r = reading(visit_date());
        r.weight_kg = Some(80.0);
        // No previous reading: rule skipped, not an error.
        assert!(evaluate_reading(&episode(), &r, None).unwrap().is_empty());

        // 3 kg in 2 weeks = 1.5 kg/week at ~27 weeks.
        let mut prev = reading(d(2025, 5, 2));
        prev.weight_kg = Some(77.0);
        let alerts = evaluate_reading(&episode(), &r, Some(&prev)).unwrap();
        assert_eq!(categories(&alerts), vec!["Weight Gain"]);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_rapid_weight_gain_skipped_in_first_trimester() {
        // ~10 weeks after LMP.
        let mut r = reading(d(2025, 1, 17));
        r.weight_kg = Some(66.0);
        let mut prev = reading(d(2025, 1, 3));
        prev.weight_kg = Some(62.0);

        assert!(evaluate_reading(&episode(), &r, Some(&prev)).unwrap().is_empty());
    }

    #[test]
    fn test_edema_grading() {
        let mut r = reading(visit_date());
        r.edema = Some(EdemaGrade::PlusOne);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(alerts[0].severity, Severity::Info);
        assert!(alerts[0].message.contains("Mild edema (+1)"));

        r.edema = Some(EdemaGrade::PlusThree);
        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!(alerts[0].message.contains("Moderate edema (+3)"));
    }

    #[test]
    fn test_evaluation_order_with_multiple_findings() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(150);
        r.bp_diastolic = Some(95);
        r.urine_protein = Some(UrineGrade::PlusTwo);
        r.fetal_heart_rate_bpm = Some(170);
        r.hemoglobin_g_dl = Some(9.0);
        r.edema = Some(EdemaGrade::PlusTwo);

        let alerts = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(
            categories(&alerts),
            vec![
                "Blood Pressure",
                "Preeclampsia Risk",
                "Fetal Heart Rate",
                "Hemoglobin",
                "Edema"
            ]
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut r = reading(visit_date());
        r.bp_systolic = Some(150);
        r.bp_diastolic = Some(95);

        let first = evaluate_reading(&episode(), &r, None).unwrap();
        let second = evaluate_reading(&episode(), &r, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_visit_date_before_lmp_is_rejected() {
        let r = reading(d(2024, 10, 1));
        assert!(evaluate_reading(&episode(), &r, None).is_err());
    }

    #[test]
    fn test_flowsheet_rapid_gain_threshold_is_in_lbs() {
        // 3 lbs in 2 weeks = 1.5 lbs/week: under the flowsheet threshold.
        assert!(rapid_weight_gain_flowsheet(160.0, 163.0, 2.0).is_none());
        // 5 lbs in 2 weeks = 2.5 lbs/week.
        let alert = rapid_weight_gain_flowsheet(160.0, 165.0, 2.0).unwrap();
        assert!(alert.message.contains("5.0 lbs"));
        assert_eq!(alert.severity, Severity::Warning);
    }
}
