//! Prenatal service: Orchestrates the clinical engines over stored episodes.
//!
//! This service coordinates:
//! - Gestational status computation for a date
//! - Risk assessment, with change notification to the lifecycle collaborator
//! - Reading intake (validation before insert) and alert evaluation
//! - Trend summaries over the visit history

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::StorageError;
use crate::domain::{
    self, Alert, GestationalAge, PregnancyEpisode, RiskAssessment, RiskLevel, TrendSummary,
    Trimester, VisitReading, TREND_WINDOW,
};
use crate::ports::{EpisodeStore, RiskNotifier};
use crate::{GravidaError, Result};

/// Computed gestational status for one episode at a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestationalStatus {
    pub gestational_age: GestationalAge,
    pub trimester: Trimester,
    /// Negative when past the due date.
    pub days_to_delivery: i64,
    pub progress_percent: u8,
}

/// Service exposing the engine's operations over a record store.
pub struct PrenatalService<S, N>
where
    S: EpisodeStore,
    N: RiskNotifier,
{
    store: Arc<S>,
    notifier: N,
    // Last computed level per episode, for transition detection.
    last_risk_levels: Mutex<HashMap<String, RiskLevel>>,
}

impl<S, N> PrenatalService<S, N>
where
    S: EpisodeStore,
    N: RiskNotifier,
    S::Error: Into<StorageError>,
{
    /// Create a new prenatal service.
    pub fn new(store: Arc<S>, notifier: N) -> Self {
        Self {
            store,
            notifier,
            last_risk_levels: Mutex::new(HashMap::new()),
        }
    }

    /// Gestational age, trimester, countdown, and progress for a date.
    ///
    /// # Errors
    /// Fails when the episode is missing or `as_of` has an invalid
    /// relationship to the LMP.
    pub fn gestational_status(&self, episode_id: &str, as_of: NaiveDate) -> Result<GestationalStatus> {
        let episode = self.episode(episode_id)?;
        let gestational_age = domain::gestation::gestational_age(episode.lmp_date, as_of)?;

        Ok(GestationalStatus {
            trimester: domain::gestation::trimester(gestational_age.weeks),
            days_to_delivery: domain::gestation::days_to_delivery(
                episode.estimated_due_date,
                as_of,
            ),
            progress_percent: domain::gestation::pregnancy_progress_percent(
                gestational_age.as_weeks(),
            ),
            gestational_age,
        })
    }

    /// Assess the episode's risk factors.
    ///
    /// Notifies the lifecycle collaborator when the computed level differs
    /// from the previous assessment of the same episode.
    ///
    /// # Errors
    /// Fails when the episode is missing or the store fails.
    pub fn assess_risk(&self, episode_id: &str) -> Result<RiskAssessment> {
        let episode = self.episode(episode_id)?;
        let assessment = domain::assess_high_risk_factors(&episode);

        let previous = {
            let mut levels = self
                .last_risk_levels
                .lock()
                .map_err(|_| GravidaError::Storage(StorageError::LockPoisoned))?;
            levels.insert(episode_id.to_string(), assessment.risk_level)
        };

        if previous != Some(assessment.risk_level) {
            self.notifier
                .risk_level_changed(episode_id, previous, assessment.risk_level);
        }

        tracing::info!(
            episode_id,
            level = %assessment.risk_level,
            factors = assessment.risk_factors.len(),
            "Assessed pregnancy risk"
        );

        Ok(assessment)
    }

    /// Validate and store a new reading, then evaluate its alerts.
    ///
    /// The visit date is validated against the LMP before the insert; a
    /// rejected date relationship is a hard error and nothing is saved.
    ///
    /// # Errors
    /// Fails on an invalid visit date, a duplicate visit date, or a store
    /// failure.
    pub fn record_reading(&self, episode_id: &str, reading: VisitReading) -> Result<Vec<Alert>> {
        let episode = self.episode(episode_id)?;

        // Hard validation boundary: never save a reading whose date does not
        // fit the episode's dating window.
        domain::gestation::gestational_age(episode.lmp_date, reading.visit_date)?;

        self.store
            .insert_reading(episode_id, &reading)
            .map_err(|e| GravidaError::Storage(e.into()))?;

        self.evaluate_visit(episode_id, reading.visit_date)
    }

    /// Evaluate the alerts for the reading taken on `visit_date`.
    ///
    /// The immediately preceding reading (when one exists) feeds the
    /// weight-gain-rate rule.
    ///
    /// # Errors
    /// Fails when the episode or reading is missing or the store fails.
    pub fn evaluate_visit(&self, episode_id: &str, visit_date: NaiveDate) -> Result<Vec<Alert>> {
        let episode = self.episode(episode_id)?;
        let readings = self.readings(episode_id)?;

        let index = readings
            .iter()
            .position(|r| r.visit_date == visit_date)
            .ok_or_else(|| {
                GravidaError::Storage(StorageError::NotFound(format!(
                    "reading on {visit_date} for episode {episode_id}"
                )))
            })?;
        let previous = index.checked_sub(1).map(|i| &readings[i]);

        let alerts = domain::evaluate_reading(&episode, &readings[index], previous)?;

        let critical = alerts
            .iter()
            .filter(|a| a.severity == domain::Severity::Critical)
            .count();
        tracing::info!(
            episode_id,
            %visit_date,
            alerts = alerts.len(),
            critical,
            "Evaluated visit reading"
        );

        Ok(alerts)
    }

    /// Trend summary over the most recent `window` readings (typically 3).
    ///
    /// # Errors
    /// Fails when the store fails.
    pub fn trends(&self, episode_id: &str, window: Option<usize>) -> Result<TrendSummary> {
        let readings = self.readings(episode_id)?;
        Ok(domain::compute_trends(
            &readings,
            window.unwrap_or(TREND_WINDOW),
        ))
    }

    fn episode(&self, episode_id: &str) -> Result<PregnancyEpisode> {
        self.store
            .load_episode(episode_id)
            .map_err(|e| GravidaError::Storage(e.into()))?
            .ok_or_else(|| {
                GravidaError::Storage(StorageError::NotFound(format!("episode {episode_id}")))
            })
    }

    fn readings(&self, episode_id: &str) -> Result<Vec<VisitReading>> {
        self.store
            .load_readings(episode_id)
            .map_err(|e| GravidaError::Storage(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::UrineGrade;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn episode() -> PregnancyEpisode {
        PregnancyEpisode::new("ep-1", d(2024, 11, 8), 29, 60.0, 165.0)
    }

    /// Notifier capturing transitions for assertions.
    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(Option<RiskLevel>, RiskLevel)>>,
    }

    impl RiskNotifier for RecordingNotifier {
        fn risk_level_changed(
            &self,
            _episode_id: &str,
            previous: Option<RiskLevel>,
            current: RiskLevel,
        ) {
            self.events.lock().unwrap().push((previous, current));
        }
    }

    fn service(ep: PregnancyEpisode) -> PrenatalService<MemoryStore, RecordingNotifier> {
        let store = Arc::new(MemoryStore::with_snapshot(ep, Vec::new()).unwrap());
        PrenatalService::new(store, RecordingNotifier::default())
    }

    #[test]
    fn test_gestational_status() {
        let svc = service(episode());
        let status = svc.gestational_status("ep-1", d(2025, 6, 8)).unwrap();

        assert_eq!(status.gestational_age.to_string(), "30w 2d");
        assert_eq!(status.trimester, Trimester::Third);
        assert_eq!(status.days_to_delivery, 68);
        assert_eq!(status.progress_percent, 76);
    }

    #[test]
    fn test_assess_risk_notifies_only_on_transition() {
        let svc = service(episode());

        // Initial assessment: low, one event (None -> Low).
        assert_eq!(svc.assess_risk("ep-1").unwrap().risk_level, RiskLevel::Low);
        // Unchanged re-assessment: no second event.
        svc.assess_risk("ep-1").unwrap();
        assert_eq!(svc.notifier.events.lock().unwrap().len(), 1);

        // Risk-affecting mutation: new event with the old level attached.
        let mut ep = episode();
        ep.previous_cesarean = true;
        svc.store.save_episode(&ep).unwrap();
        assert_eq!(svc.assess_risk("ep-1").unwrap().risk_level, RiskLevel::Moderate);

        let events = svc.notifier.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], (Some(RiskLevel::Low), RiskLevel::Moderate));
    }

    #[test]
    fn test_record_reading_evaluates_alerts() {
        let svc = service(episode());
        let mut reading = VisitReading::new(d(2025, 5, 16));
        reading.bp_systolic = Some(145);
        reading.bp_diastolic = Some(70);
        reading.urine_protein = Some(UrineGrade::PlusOne);

        let alerts = svc.record_reading("ep-1", reading).unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].category, "Blood Pressure");
        assert_eq!(alerts[1].category, "Preeclampsia Risk");
    }

    #[test]
    fn test_record_reading_rejects_date_before_lmp() {
        let svc = service(episode());
        let reading = VisitReading::new(d(2024, 10, 1));

        assert!(matches!(
            svc.record_reading("ep-1", reading),
            Err(GravidaError::Validation(_))
        ));
        // Nothing was saved.
        assert!(svc.store.load_readings("ep-1").unwrap().is_empty());
    }

    #[test]
    fn test_weight_gain_rule_sees_predecessor() {
        let svc = service(episode());

        let mut first = VisitReading::new(d(2025, 5, 2));
        first.weight_kg = Some(70.0);
        assert!(svc.record_reading("ep-1", first).unwrap().is_empty());

        let mut second = VisitReading::new(d(2025, 5, 16));
        second.weight_kg = Some(73.5);
        let alerts = svc.record_reading("ep-1", second).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, "Weight Gain");
    }

    #[test]
    fn test_trends_over_recorded_history() {
        let svc = service(episode());
        for (day, weight) in [(2u32, 70.0), (9, 71.0), (16, 72.5), (23, 74.0)] {
            let mut r = VisitReading::new(d(2025, 5, day));
            r.weight_kg = Some(weight);
            svc.record_reading("ep-1", r).unwrap();
        }

        let trends = svc.trends("ep-1", None).unwrap();
        assert_eq!(trends.weight_delta, Some(3.0));
    }

    #[test]
    fn test_missing_episode_is_a_storage_error() {
        let svc = service(episode());
        assert!(matches!(
            svc.gestational_status("missing", d(2025, 6, 8)),
            Err(GravidaError::Storage(StorageError::NotFound(_)))
        ));
    }
}
