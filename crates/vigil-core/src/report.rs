//! Report generation.
//!
//! A `Report` is a read-only projection of a session: it is derived on
//! demand, never persisted, and never mutates the session. Report
//! generation works for any session status - a `terminated` session is
//! reported just like a `completed` one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{MonitorEvent, Session, Severity, ViolationCounts};

/// Hiring recommendation derived from the integrity score.
///
/// Bands are inclusive on their lower bound: >= 80 passes, >= 60 needs
/// review, anything below fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "REVIEW")]
    Review,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Recommendation {
    /// Maps an integrity score to its recommendation band.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Self::Pass
        } else if score >= 60 {
            Self::Review
        } else {
            Self::Fail
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInfo {
    pub name: String,
    pub email: String,
    pub interview_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Duration in whole seconds, when the session has ended.
    pub duration: Option<i64>,
    /// `"{minutes}m {seconds}s"`, or `"N/A"` while the session is running.
    pub duration_formatted: String,
}

/// Violation counters plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    pub looking_away: u32,
    pub no_face_detected: u32,
    pub multiple_faces: u32,
    pub suspicious_objects: u32,
    pub total: u32,
}

impl From<&ViolationCounts> for ViolationSummary {
    fn from(counts: &ViolationCounts) -> Self {
        Self {
            looking_away: counts.looking_away,
            no_face_detected: counts.no_face_detected,
            multiple_faces: counts.multiple_faces,
            suspicious_objects: counts.suspicious_objects,
            total: counts.total(),
        }
    }
}

/// Presentation-ready summary of one proctoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub candidate_info: CandidateInfo,
    pub session_details: SessionDetails,
    pub violations: ViolationSummary,
    /// The event log filtered to warnings and errors, in append order.
    pub events: Vec<MonitorEvent>,
    pub integrity_score: u32,
    pub recommendation: Recommendation,
    pub video_recorded: bool,
}

impl Report {
    /// Builds a report from the session's current state.
    ///
    /// Pure transform: callable any number of times, always consistent with
    /// the stored session.
    pub fn from_session(session: &Session) -> Self {
        Self {
            candidate_info: CandidateInfo {
                name: session.candidate_name.clone(),
                email: session.candidate_email.clone(),
                interview_title: session.interview_title.clone(),
            },
            session_details: SessionDetails {
                start_time: session.start_time,
                end_time: session.end_time,
                duration: session.duration_secs,
                duration_formatted: session
                    .duration_secs
                    .map_or_else(|| "N/A".to_string(), format_duration),
            },
            violations: (&session.violations).into(),
            events: session
                .events
                .iter()
                .filter(|e| e.severity != Severity::Info)
                .cloned()
                .collect(),
            integrity_score: session.integrity_score,
            recommendation: Recommendation::from_score(session.integrity_score),
            video_recorded: session.video_recorded,
        }
    }
}

/// Formats a duration in seconds as `"{minutes}m {seconds}s"`.
///
/// No hour component and no rounding; 125 seconds is "2m 5s".
fn format_duration(secs: i64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}
