//! Termination detection.
//!
//! A [`TerminationDetector`] looks at the content of each recorded message
//! and decides whether the session should end. The orchestrator only sees
//! the trait, so detectors can be swapped without touching turn-taking.

use crate::conversation::config::DEFAULT_TERMINATION_MARKER;

/// Pure predicate over message content
pub trait TerminationDetector: Send + Sync {
    /// Returns true when `content` should end the session
    fn detect(&self, content: &str) -> bool;
}

/// Ends the session when a message contains a fixed marker token.
///
/// Matching is an exact, case-sensitive substring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDetector {
    marker: String,
}

impl MarkerDetector {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATION_MARKER)
    }
}

impl TerminationDetector for MarkerDetector {
    fn detect(&self, content: &str) -> bool {
        !self.marker.is_empty() && content.contains(&self.marker)
    }
}

/// Never ends the session; useful when only quotas and round limits apply
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTerminate;

impl TerminationDetector for NeverTerminate {
    fn detect(&self, _content: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let detector = MarkerDetector::default();
        assert_eq!(detector.marker(), "TERMINATE");
        assert!(detector.detect("Thanks everyone. TERMINATE"));
        assert!(detector.detect("...TERMINATE"));
        assert!(!detector.detect("We will terminate the line next year"));
        assert!(!detector.detect(""));
    }

    #[test]
    fn test_custom_marker() {
        let detector = MarkerDetector::new("<END>");
        assert!(detector.detect("done <END>"));
        assert!(!detector.detect("TERMINATE"));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert!(!MarkerDetector::new("").detect("anything"));
    }

    #[test]
    fn test_never_terminate() {
        assert!(!NeverTerminate.detect("TERMINATE"));
    }
}
