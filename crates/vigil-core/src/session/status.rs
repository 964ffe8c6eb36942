//! Session lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a proctoring session.
///
/// The only transition this core enacts is `Active` -> `Completed` via
/// `Session::end`. `Terminated` is reachable through the explicit
/// `Session::terminate` operation (e.g. an examiner cutting a session
/// short); both terminal states are handled identically by the report
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Terminated,
}

impl SessionStatus {
    /// Whether this state ends the session for scoring purposes.
    ///
    /// Once terminal, end time and duration are fixed and further lifecycle
    /// calls are no-ops.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Terminated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Terminated.is_terminal());
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
