//! Session domain model.
//!
//! This module contains the core `Session` aggregate that represents one
//! monitored interview in the domain layer. The aggregate owns the ordered
//! event log and the violation counters, and is the only place events are
//! classified and the integrity score recomputed.
//!
//! This is the "pure" model that the business logic layer operates on. It is
//! independent of any specific storage format; callers are responsible for
//! serializing mutations (see the service layer's per-session locks).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::event::MonitorEvent;
use super::id;
use super::score;
use super::status::SessionStatus;
use super::violation::{self, ViolationCounts};
use crate::error::{Result, VigilError};

/// Marker phrase for client model-load notices that the bulk ingestion path
/// drops to prevent spam.
const MODEL_LOAD_SPAM_MARKER: &str = "AI models loaded";

/// One monitored interview instance from start to end.
///
/// A session contains:
/// - Candidate identity (name, email) and the interview title
/// - Start/end timestamps and the derived duration in whole seconds
/// - The ordered event log (arrival order, not timestamp order)
/// - Violation counters, incremented only by classification
/// - The integrity score, always `max(0, 100 - weighted violations)`
/// - Lifecycle status and the video-recorded flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier (24-character hex), immutable.
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub interview_title: String,
    /// When monitoring started.
    pub start_time: DateTime<Utc>,
    /// When monitoring ended; set once, by `end` or `terminate`.
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds between start and end, floored. Defined iff `end_time` is.
    #[serde(rename = "duration")]
    pub duration_secs: Option<i64>,
    /// Ordered event log; insertion order is arrival order.
    #[serde(default)]
    pub events: Vec<MonitorEvent>,
    #[serde(default)]
    pub violations: ViolationCounts,
    #[serde(default = "default_score")]
    pub integrity_score: u32,
    pub status: SessionStatus,
    #[serde(default)]
    pub video_recorded: bool,
    /// Document timestamps; `created_at` drives newest-first listing.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_score() -> u32 {
    score::MAX_SCORE
}

impl Session {
    /// Creates a new active session.
    ///
    /// All three candidate fields are required and must be non-empty after
    /// trimming.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error naming the first missing field.
    pub fn create(
        candidate_name: &str,
        candidate_email: &str,
        interview_title: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let candidate_name = require_field(candidate_name, "candidateName")?;
        let candidate_email = require_field(candidate_email, "candidateEmail")?;
        let interview_title = require_field(interview_title, "interviewTitle")?;

        Ok(Self {
            id: id::generate(now),
            candidate_name,
            candidate_email,
            interview_title,
            start_time: now,
            end_time: None,
            duration_secs: None,
            events: Vec::new(),
            violations: ViolationCounts::default(),
            integrity_score: score::MAX_SCORE,
            status: SessionStatus::Active,
            video_recorded: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends one event to the log and updates derived state.
    ///
    /// The event is stored unconditionally; if the classifier matches it to
    /// a violation category the corresponding counter is incremented. The
    /// integrity score is recomputed from the full counter set either way.
    ///
    /// This path enforces no id uniqueness - deduplication belongs to the
    /// bulk path, which filters against the stored id set.
    pub fn append_event(&mut self, event: MonitorEvent, now: DateTime<Utc>) {
        if let Some(kind) = violation::classify(&event.kind, &event.description) {
            self.violations.increment(kind);
        }
        self.events.push(event);
        self.recompute_score();
        self.updated_at = now;
    }

    /// Appends a batch of events, deduplicating against the current log.
    ///
    /// Filtered out, against a single snapshot of the existing id set:
    /// - events without an id
    /// - events whose id is already stored, or repeated earlier in the batch
    /// - client model-load notices (`kind == "system"` with the
    ///   "AI models loaded" marker in the description)
    ///
    /// Survivors are appended in the given order with classification; the
    /// score is recomputed once at the end rather than per event. Returns
    /// the number of events actually applied - zero is a valid outcome when
    /// everything was filtered.
    pub fn append_events_bulk(&mut self, events: Vec<MonitorEvent>, now: DateTime<Utc>) -> usize {
        let mut seen: HashSet<String> = self.events.iter().map(|e| e.id.clone()).collect();
        let mut applied = 0;

        for event in events {
            if event.id.is_empty() || seen.contains(&event.id) {
                continue;
            }
            if event.kind == MonitorEvent::KIND_SYSTEM
                && event.description.contains(MODEL_LOAD_SPAM_MARKER)
            {
                continue;
            }

            seen.insert(event.id.clone());
            if let Some(kind) = violation::classify(&event.kind, &event.description) {
                self.violations.increment(kind);
            }
            self.events.push(event);
            applied += 1;
        }

        if applied > 0 {
            self.recompute_score();
            self.updated_at = now;
        }
        applied
    }

    /// Completes the session.
    ///
    /// Sets the end time, the floored duration in whole seconds, the status,
    /// and the video-recorded flag, then recomputes the score. Idempotent:
    /// calling it on an already-terminal session changes nothing, so timing
    /// fields are fixed once set.
    pub fn end(&mut self, video_recorded: bool, now: DateTime<Utc>) {
        self.finish(SessionStatus::Completed, video_recorded, now);
    }

    /// Terminates the session (examiner-initiated early stop).
    ///
    /// Same timing semantics as `end`, with status `terminated`. Also a
    /// no-op on already-terminal sessions.
    pub fn terminate(&mut self, now: DateTime<Utc>) {
        let video_recorded = self.video_recorded;
        self.finish(SessionStatus::Terminated, video_recorded, now);
    }

    fn finish(&mut self, status: SessionStatus, video_recorded: bool, now: DateTime<Utc>) {
        if self.status.is_terminal() {
            return;
        }

        self.end_time = Some(now);
        self.duration_secs = Some((now - self.start_time).num_seconds());
        self.status = status;
        self.video_recorded = video_recorded;
        self.recompute_score();
        self.updated_at = now;
    }

    /// Whether an event with the given id is already stored.
    pub fn contains_event(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e.id == event_id)
    }

    fn recompute_score(&mut self) {
        self.integrity_score = score::integrity_score(&self.violations);
    }
}

fn require_field(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(VigilError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}
