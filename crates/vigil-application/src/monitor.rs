//! Session-scoped detection monitor.
//!
//! `SessionMonitor` owns the accumulation state between raw detector output
//! and the events the ingestion API accepts: sustained-condition timers for
//! face presence and gaze, episode tracking for multiple faces and
//! suspicious objects, and the outgoing event queue.
//!
//! The monitor runs no timers of its own. Every observation carries the
//! caller's clock, and flushing is an explicit trigger (`drain`), so the
//! whole pipeline is testable without a UI or a runtime. Retry policy for
//! failed flushes stays with the caller; `requeue` just puts a batch back.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vigil_core::session::{MonitorEvent, Severity};

/// How long the face must be absent before a violation is queued.
const NO_FACE_GRACE_SECS: i64 = 10;
/// How long the gaze must stay off-center before a violation is queued.
const LOOKING_AWAY_GRACE_SECS: i64 = 5;
/// Gaze offset ratio (face-center distance over frame size) treated as
/// looking away.
const GAZE_OFFSET_THRESHOLD: f64 = 0.3;

/// Object labels that count as suspicious.
///
/// Detector vocabularies vary, so matching is case-insensitive substring
/// containment in either direction: a label of "Cell Phone" hits
/// "cell phone", and a bare "phone" hits "smartphone".
pub const SUSPICIOUS_ITEMS: &[&str] = &[
    "cell phone", "phone", "mobile", "smartphone",
    "book", "notebook", "paper", "document",
    "laptop", "computer", "tablet", "ipad",
    "remote", "keyboard", "mouse", "headphones",
    "calculator", "watch", "smartwatch",
];

fn is_suspicious(label: &str) -> bool {
    let label = label.to_lowercase();
    SUSPICIOUS_ITEMS
        .iter()
        .any(|item| label.contains(item) || item.contains(label.as_str()))
}

/// Accumulates detector observations for one session and queues the
/// resulting events for bulk ingestion.
#[derive(Debug, Default)]
pub struct SessionMonitor {
    no_face_since: Option<DateTime<Utc>>,
    no_face_reported: bool,
    looking_away_since: Option<DateTime<Utc>>,
    looking_away_reported: bool,
    multiple_faces_active: bool,
    objects_active: bool,
    queue: Vec<MonitorEvent>,
}

impl SessionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one face-detector frame: how many faces are visible and, when
    /// exactly one is, how far its center sits from the frame center
    /// (as a ratio of the frame size).
    ///
    /// - No face sustained past the grace period queues one error-severity
    ///   violation per absence episode.
    /// - More than one face queues one warning per contiguous episode.
    /// - An off-center gaze sustained past its grace period queues one
    ///   warning per episode.
    pub fn observe_faces(&mut self, face_count: usize, gaze_offset: Option<f64>, now: DateTime<Utc>) {
        if face_count == 0 {
            let since = *self.no_face_since.get_or_insert(now);
            if !self.no_face_reported
                && (now - since).num_seconds() >= NO_FACE_GRACE_SECS
            {
                self.queue_event(
                    MonitorEvent::KIND_VIOLATION,
                    "No face detected for >10 seconds",
                    Severity::Error,
                    now,
                );
                self.no_face_reported = true;
            }
        } else {
            self.no_face_since = None;
            self.no_face_reported = false;
        }

        if face_count > 1 {
            if !self.multiple_faces_active {
                self.queue_event(
                    MonitorEvent::KIND_VIOLATION,
                    &format!("Multiple faces detected ({face_count})"),
                    Severity::Warning,
                    now,
                );
                self.multiple_faces_active = true;
            }
        } else {
            self.multiple_faces_active = false;
        }

        let looking_away = face_count >= 1
            && gaze_offset.is_some_and(|offset| offset > GAZE_OFFSET_THRESHOLD);
        if looking_away {
            let since = *self.looking_away_since.get_or_insert(now);
            if !self.looking_away_reported
                && (now - since).num_seconds() >= LOOKING_AWAY_GRACE_SECS
            {
                self.queue_event(
                    MonitorEvent::KIND_VIOLATION,
                    "Candidate looking away for >5 seconds",
                    Severity::Warning,
                    now,
                );
                self.looking_away_reported = true;
            }
        } else {
            self.looking_away_since = None;
            self.looking_away_reported = false;
        }
    }

    /// Feeds one object-detector frame. Labels are matched against the
    /// suspicious-item list; one error-severity violation is queued per
    /// contiguous episode of suspicious objects in view.
    pub fn observe_objects(&mut self, labels: &[&str], now: DateTime<Utc>) {
        let suspicious: Vec<&str> = labels
            .iter()
            .copied()
            .filter(|label| is_suspicious(label))
            .collect();

        if suspicious.is_empty() {
            self.objects_active = false;
            return;
        }

        if !self.objects_active {
            self.queue_event(
                MonitorEvent::KIND_VIOLATION,
                &format!("Suspicious objects detected: {}", suspicious.join(", ")),
                Severity::Error,
                now,
            );
            self.objects_active = true;
        }
    }

    /// Queues a client status notice (camera started, models loaded, ...).
    ///
    /// Model-load notices are still dropped server-side by the bulk
    /// ingestion anti-spam filter.
    pub fn record_system(&mut self, description: &str, severity: Severity, now: DateTime<Utc>) {
        self.queue_event(MonitorEvent::KIND_SYSTEM, description, severity, now);
    }

    /// Number of queued, not yet drained events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Explicit flush trigger: takes the queued batch, leaving the queue
    /// empty. The batch is ready for `append_events_bulk`.
    pub fn drain(&mut self) -> Vec<MonitorEvent> {
        std::mem::take(&mut self.queue)
    }

    /// Puts a failed batch back at the front of the queue, preserving
    /// arrival order ahead of anything queued since the drain.
    pub fn requeue(&mut self, mut batch: Vec<MonitorEvent>) {
        batch.append(&mut self.queue);
        self.queue = batch;
    }

    fn queue_event(&mut self, kind: &str, description: &str, severity: Severity, now: DateTime<Utc>) {
        let entropy = Uuid::new_v4().simple().to_string();
        self.queue.push(MonitorEvent {
            id: format!("{}-{}", now.timestamp_millis(), &entropy[..9]),
            timestamp: now,
            kind: kind.to_string(),
            description: description.to_string(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2024-03-01T09:00:00Z".parse().unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    #[test]
    fn test_no_face_requires_sustained_absence() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_faces(0, None, at(0));
        monitor.observe_faces(0, None, at(5));
        assert_eq!(monitor.pending(), 0);

        monitor.observe_faces(0, None, at(10));
        assert_eq!(monitor.pending(), 1);

        let events = monitor.drain();
        assert_eq!(events[0].description, "No face detected for >10 seconds");
        assert_eq!(events[0].severity, Severity::Error);
    }

    #[test]
    fn test_no_face_reports_once_per_episode() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_faces(0, None, at(0));
        monitor.observe_faces(0, None, at(10));
        monitor.observe_faces(0, None, at(20));
        assert_eq!(monitor.pending(), 1);

        // Face returns, then disappears again: a new episode
        monitor.observe_faces(1, Some(0.0), at(21));
        monitor.observe_faces(0, None, at(22));
        monitor.observe_faces(0, None, at(32));
        assert_eq!(monitor.pending(), 2);
    }

    #[test]
    fn test_face_return_resets_timer() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_faces(0, None, at(0));
        monitor.observe_faces(1, Some(0.0), at(8));
        monitor.observe_faces(0, None, at(9));
        monitor.observe_faces(0, None, at(15));
        assert_eq!(monitor.pending(), 0);
    }

    #[test]
    fn test_looking_away_threshold_and_grace() {
        let mut monitor = SessionMonitor::new();
        // Off-center but within tolerance
        monitor.observe_faces(1, Some(0.2), at(0));
        monitor.observe_faces(1, Some(0.5), at(1));
        monitor.observe_faces(1, Some(0.5), at(3));
        assert_eq!(monitor.pending(), 0);

        monitor.observe_faces(1, Some(0.5), at(6));
        let events = monitor.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Candidate looking away for >5 seconds");
        assert_eq!(events[0].severity, Severity::Warning);
    }

    #[test]
    fn test_multiple_faces_once_per_episode() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_faces(2, None, at(0));
        monitor.observe_faces(2, None, at(1));
        monitor.observe_faces(3, None, at(2));
        assert_eq!(monitor.pending(), 1);
        assert!(monitor.drain()[0].description.contains("Multiple faces detected (2)"));

        monitor.observe_faces(1, Some(0.0), at(3));
        monitor.observe_faces(2, None, at(4));
        assert_eq!(monitor.pending(), 1);
    }

    #[test]
    fn test_suspicious_objects_filtered_and_joined() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["person", "cell phone", "book"], at(0));

        let events = monitor.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].description,
            "Suspicious objects detected: cell phone, book"
        );
        assert_eq!(events[0].severity, Severity::Error);
    }

    #[test]
    fn test_object_matching_is_case_insensitive_substring() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["mouse"], at(0));
        assert_eq!(monitor.pending(), 1);

        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["Cell Phone"], at(0));
        let events = monitor.drain();
        assert_eq!(events.len(), 1);
        // The description carries the detector's label verbatim
        assert_eq!(events[0].description, "Suspicious objects detected: Cell Phone");

        // Substring containment works in both directions
        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["wireless headphones"], at(0));
        assert_eq!(monitor.pending(), 1);

        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["calc"], at(0));
        assert_eq!(monitor.pending(), 1);

        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["person", "chair"], at(0));
        assert_eq!(monitor.pending(), 0);
    }

    #[test]
    fn test_objects_once_per_episode() {
        let mut monitor = SessionMonitor::new();
        monitor.observe_objects(&["cell phone"], at(0));
        monitor.observe_objects(&["cell phone"], at(1));
        assert_eq!(monitor.pending(), 1);

        monitor.observe_objects(&["person"], at(2));
        monitor.observe_objects(&["cell phone"], at(3));
        assert_eq!(monitor.pending(), 2);
    }

    #[test]
    fn test_drain_and_requeue_preserve_order() {
        let mut monitor = SessionMonitor::new();
        monitor.record_system("Camera started", Severity::Info, at(0));
        monitor.observe_objects(&["laptop"], at(1));

        let batch = monitor.drain();
        assert_eq!(batch.len(), 2);
        assert_eq!(monitor.pending(), 0);

        monitor.record_system("Recording started", Severity::Info, at(2));
        monitor.requeue(batch);

        let replayed = monitor.drain();
        assert_eq!(replayed.len(), 3);
        assert_eq!(replayed[0].description, "Camera started");
        assert_eq!(replayed[2].description, "Recording started");
    }

    #[test]
    fn test_queued_event_ids_are_unique() {
        let mut monitor = SessionMonitor::new();
        monitor.record_system("a", Severity::Info, at(0));
        monitor.record_system("b", Severity::Info, at(0));

        let events = monitor.drain();
        assert_ne!(events[0].id, events[1].id);
    }
}
