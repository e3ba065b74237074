//! Risk notifier port: episode-lifecycle collaborator.
//!
//! The surrounding application (care-team worklists, banner displays) is
//! informed whenever a recomputed assessment moves an episode to a different
//! risk level.

use crate::domain::RiskLevel;

/// Trait for observing risk-level transitions.
pub trait RiskNotifier: Send + Sync {
    /// Called when an episode's computed risk level changes.
    ///
    /// `previous` is `None` for the first assessment of the episode.
    fn risk_level_changed(
        &self,
        episode_id: &str,
        previous: Option<RiskLevel>,
        current: RiskLevel,
    );
}
