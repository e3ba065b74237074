//! Log adapter: Implementation of `RiskNotifier` over `tracing`.

use crate::domain::RiskLevel;
use crate::ports::RiskNotifier;

/// Notifier that records risk-level transitions as structured log events.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RiskNotifier for LogNotifier {
    fn risk_level_changed(
        &self,
        episode_id: &str,
        previous: Option<RiskLevel>,
        current: RiskLevel,
    ) {
        match previous {
            Some(previous) => tracing::warn!(
                episode_id,
                %previous,
                %current,
                "Pregnancy risk level changed"
            ),
            None => tracing::info!(episode_id, %current, "Initial pregnancy risk level"),
        }
    }
}
