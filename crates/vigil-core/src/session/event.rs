//! Monitoring event types.
//!
//! Events are immutable facts reported by the detection client and appended
//! to a session's log. The `kind` field is a free-form category string; the
//! values the stock detection client produces are `"violation"` and
//! `"system"`, but the log accepts any category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, excluded from reports.
    Info,
    /// Noteworthy but not conclusive.
    Warning,
    /// Strong evidence of a problem.
    Error,
}

/// A single timestamped occurrence reported during a session.
///
/// The `id` is client-supplied and serves as the deduplication key within
/// one session. Events are never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    /// Client-supplied identifier, unique within a session.
    pub id: String,
    /// When the event occurred, as reported by the client.
    pub timestamp: DateTime<Utc>,
    /// Free-form event category (e.g. "violation", "system").
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description; the classification source.
    pub description: String,
    /// Event severity.
    pub severity: Severity,
}

impl MonitorEvent {
    /// The event category the violation classifier reacts to.
    pub const KIND_VIOLATION: &'static str = "violation";
    /// The event category used for client status notices.
    pub const KIND_SYSTEM: &'static str = "system";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let event = MonitorEvent {
            id: "e1".to_string(),
            timestamp: Utc::now(),
            kind: MonitorEvent::KIND_VIOLATION.to_string(),
            description: "Candidate looking away for >5 seconds".to_string(),
            severity: Severity::Warning,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "violation");
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn test_severity_round_trip() {
        let json = "\"error\"";
        let severity: Severity = serde_json::from_str(json).unwrap();
        assert_eq!(severity, Severity::Error);
    }
}
