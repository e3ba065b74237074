//! Trend summaries: delta-based indicators over the most recent readings.
//!
//! Trends are display-layer indicators only; clinical severity stays with
//! the alert engine. Deltas are `last - first` over the non-null values in
//! the window, in whatever unit the readings carry.

use serde::{Deserialize, Serialize};

use super::reading::VisitReading;

/// Canonical trend window: the most recent three readings.
pub const TREND_WINDOW: usize = 3;

/// Blood-pressure drift within this band counts as stable, mmHg.
pub const BP_STABLE_BAND_MMHG: f64 = 5.0;
/// Fetal-heart-rate drift within this band counts as stable, bpm.
pub const FHR_STABLE_BAND_BPM: f64 = 20.0;

/// Coarse trend classification for display iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Stable,
    Notable,
}

/// Per-metric deltas over the window. Metrics with fewer than two non-null
/// data points are omitted rather than zero-filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub weight_delta: Option<f64>,
    pub bp_systolic_delta: Option<f64>,
    pub fetal_heart_rate_delta: Option<f64>,
    pub fundal_height_delta: Option<f64>,
}

impl TrendSummary {
    /// Stability of the blood-pressure drift, when enough data exists.
    #[must_use]
    pub fn bp_direction(&self) -> Option<TrendDirection> {
        self.bp_systolic_delta.map(|delta| {
            if delta.abs() <= BP_STABLE_BAND_MMHG {
                TrendDirection::Stable
            } else {
                TrendDirection::Notable
            }
        })
    }

    /// Stability of the fetal-heart-rate drift, when enough data exists.
    #[must_use]
    pub fn fhr_direction(&self) -> Option<TrendDirection> {
        self.fetal_heart_rate_delta.map(|delta| {
            if delta.abs() <= FHR_STABLE_BAND_BPM {
                TrendDirection::Stable
            } else {
                TrendDirection::Notable
            }
        })
    }
}

/// Compute trends over the most recent `window` readings.
///
/// `readings` must be in chronological order (oldest first), as supplied by
/// the record store. Fewer than two readings yields an empty summary rather
/// than an error.
#[must_use]
pub fn compute_trends(readings: &[VisitReading], window: usize) -> TrendSummary {
    if readings.len() < 2 || window < 2 {
        return TrendSummary::default();
    }

    let start = readings.len().saturating_sub(window);
    let recent = &readings[start..];

    TrendSummary {
        weight_delta: delta(recent, |r| r.weight_kg),
        bp_systolic_delta: delta(recent, |r| r.bp_systolic.map(f64::from)),
        fetal_heart_rate_delta: delta(recent, |r| r.fetal_heart_rate_bpm.map(f64::from)),
        fundal_height_delta: delta(recent, |r| r.fundal_height_cm),
    }
}

fn delta(readings: &[VisitReading], metric: impl Fn(&VisitReading) -> Option<f64>) -> Option<f64> {
    let values: Vec<f64> = readings.iter().filter_map(metric).collect();
    if values.len() < 2 {
        return None;
    }
    Some(values[values.len() - 1] - values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(day: u32, weight: Option<f64>, sys: Option<u16>, fhr: Option<u16>) -> VisitReading {
        let mut r = VisitReading::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap());
        r.weight_kg = weight;
        r.bp_systolic = sys;
        r.fetal_heart_rate_bpm = fhr;
        r
    }

    #[test]
    fn test_weight_trend_over_last_three_of_four() {
        // Weights recorded in lbs; deltas are unit-agnostic.
        let readings = vec![
            reading(1, Some(158.0), None, None),
            reading(8, Some(162.0), None, None),
            reading(15, Some(165.0), None, None),
            reading(22, Some(168.0), None, None),
        ];

        let trends = compute_trends(&readings, TREND_WINDOW);
        assert_eq!(trends.weight_delta, Some(6.0));
    }

    #[test]
    fn test_fewer_than_two_readings_is_no_trend() {
        assert_eq!(compute_trends(&[], TREND_WINDOW), TrendSummary::default());
        let one = vec![reading(1, Some(70.0), Some(120), None)];
        assert_eq!(compute_trends(&one, TREND_WINDOW), TrendSummary::default());
    }

    #[test]
    fn test_sparse_metrics_are_omitted_not_zero_filled() {
        let readings = vec![
            reading(1, Some(70.0), Some(118), None),
            reading(8, Some(71.0), None, Some(150)),
            reading(15, Some(72.0), Some(124), None),
        ];

        let trends = compute_trends(&readings, TREND_WINDOW);
        assert_eq!(trends.weight_delta, Some(2.0));
        assert_eq!(trends.bp_systolic_delta, Some(6.0));
        // Only one FHR value in the window.
        assert_eq!(trends.fetal_heart_rate_delta, None);
        assert_eq!(trends.fundal_height_delta, None);
    }

    #[test]
    fn test_stability_bands() {
        let readings = vec![
            reading(1, None, Some(118), Some(140)),
            reading(8, None, Some(122), Some(150)),
        ];
        let trends = compute_trends(&readings, 2);
        assert_eq!(trends.bp_direction(), Some(TrendDirection::Stable));
        assert_eq!(trends.fhr_direction(), Some(TrendDirection::Stable));

        let readings = vec![
            reading(1, None, Some(110), Some(130)),
            reading(8, None, Some(126), Some(155)),
        ];
        let trends = compute_trends(&readings, 2);
        assert_eq!(trends.bp_direction(), Some(TrendDirection::Notable));
        assert_eq!(trends.fhr_direction(), Some(TrendDirection::Notable));
    }

    #[test]
    fn test_window_larger_than_history_uses_all_readings() {
        let readings = vec![
            reading(1, Some(70.0), None, None),
            reading(8, Some(72.5), None, None),
        ];
        let trends = compute_trends(&readings, 5);
        assert_eq!(trends.weight_delta, Some(2.5));
    }
}
