//! Execution parameters — gateway call control.
//!
//! [`ExecutionParams`] groups the static parameters that control how the
//! orchestrator talks to the gateway. These are application-layer concerns,
//! not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway call control parameters.
///
/// Used by [`RunPanelUseCase`](crate::use_cases::run_panel::RunPanelUseCase)
/// and [`SummarizePanelUseCase`](crate::use_cases::summarize_panel::SummarizePanelUseCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Upper bound for a single generation call.
    pub call_timeout: Duration,
    /// Extra attempts after a failed or timed-out call.
    pub max_retries: u32,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(120),
            max_retries: 1,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Total attempts per call, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_retry_once() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_retries, 1);
        assert_eq!(params.max_attempts(), 2);
        assert_eq!(params.call_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_builders() {
        let params = ExecutionParams::default()
            .with_call_timeout(Duration::from_millis(50))
            .with_max_retries(0);
        assert_eq!(params.call_timeout, Duration::from_millis(50));
        assert_eq!(params.max_attempts(), 1);
    }
}
