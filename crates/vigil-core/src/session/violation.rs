//! Violation taxonomy and classifier.
//!
//! The classifier maps a raw event (category + description) to at most one
//! violation category. It is a closed, ordered rule table: each rule pairs a
//! marker phrase with a category, and the first matching rule wins. The
//! phrase set and precedence are part of the stored-data contract with the
//! detection client, so both must be preserved when rules are edited.

use serde::{Deserialize, Serialize};

use super::event::MonitorEvent;

/// The fixed set of violation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    LookingAway,
    NoFaceDetected,
    MultipleFaces,
    SuspiciousObjects,
}

/// Ordered classification rules: marker phrase -> category.
///
/// Matching is case-sensitive substring containment, checked top to bottom.
/// A description could in principle contain more than one phrase; precedence
/// resolves that deterministically.
const CLASSIFICATION_RULES: &[(&str, ViolationKind)] = &[
    ("looking away", ViolationKind::LookingAway),
    ("No face detected", ViolationKind::NoFaceDetected),
    ("Multiple faces", ViolationKind::MultipleFaces),
    ("Suspicious objects", ViolationKind::SuspiciousObjects),
];

/// Classifies an event into a violation category, if any.
///
/// Only events with category `"violation"` are classified; everything else
/// returns `None`. An unmatched description also returns `None` - never an
/// error.
pub fn classify(kind: &str, description: &str) -> Option<ViolationKind> {
    if kind != MonitorEvent::KIND_VIOLATION {
        return None;
    }

    CLASSIFICATION_RULES
        .iter()
        .find(|(phrase, _)| description.contains(phrase))
        .map(|(_, violation)| *violation)
}

/// Per-session violation counters.
///
/// Counters are incremented only by the classification step during event
/// append, never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViolationCounts {
    pub looking_away: u32,
    pub no_face_detected: u32,
    pub multiple_faces: u32,
    pub suspicious_objects: u32,
}

impl ViolationCounts {
    /// Increments the counter for the given category.
    pub fn increment(&mut self, kind: ViolationKind) {
        match kind {
            ViolationKind::LookingAway => self.looking_away += 1,
            ViolationKind::NoFaceDetected => self.no_face_detected += 1,
            ViolationKind::MultipleFaces => self.multiple_faces += 1,
            ViolationKind::SuspiciousObjects => self.suspicious_objects += 1,
        }
    }

    /// Total incidents across all categories.
    pub fn total(&self) -> u32 {
        self.looking_away + self.no_face_detected + self.multiple_faces + self.suspicious_objects
    }
}
