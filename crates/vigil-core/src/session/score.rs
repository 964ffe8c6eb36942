//! Integrity scoring.
//!
//! A pure reduction from violation counters to a bounded 0-100 score. The
//! score is always recomputed from the full counter set - never adjusted
//! incrementally - so a missed update can never make the stored score drift
//! from the counters.

use super::violation::ViolationCounts;

/// Points deducted per looking-away incident.
pub const WEIGHT_LOOKING_AWAY: u32 = 5;
/// Points deducted per no-face incident.
pub const WEIGHT_NO_FACE_DETECTED: u32 = 10;
/// Points deducted per multiple-faces incident.
pub const WEIGHT_MULTIPLE_FACES: u32 = 15;
/// Points deducted per suspicious-object incident.
pub const WEIGHT_SUSPICIOUS_OBJECTS: u32 = 20;

/// The score every session starts from.
pub const MAX_SCORE: u32 = 100;

/// Computes the integrity score for a set of violation counters.
///
/// `score = max(0, 100 - (5a + 10b + 15c + 20d))` where a..d are the four
/// counters. Saturates at 0.
pub fn integrity_score(counts: &ViolationCounts) -> u32 {
    let deduction = counts.looking_away * WEIGHT_LOOKING_AWAY
        + counts.no_face_detected * WEIGHT_NO_FACE_DETECTED
        + counts.multiple_faces * WEIGHT_MULTIPLE_FACES
        + counts.suspicious_objects * WEIGHT_SUSPICIOUS_OBJECTS;

    MAX_SCORE.saturating_sub(deduction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(a: u32, b: u32, c: u32, d: u32) -> ViolationCounts {
        ViolationCounts {
            looking_away: a,
            no_face_detected: b,
            multiple_faces: c,
            suspicious_objects: d,
        }
    }

    #[test]
    fn test_clean_session_scores_full() {
        assert_eq!(integrity_score(&counts(0, 0, 0, 0)), 100);
    }

    #[test]
    fn test_score_saturates_at_zero() {
        assert_eq!(integrity_score(&counts(20, 0, 0, 0)), 0);
        assert_eq!(integrity_score(&counts(0, 0, 0, 6)), 0);
    }

    #[test]
    fn test_mixed_counters() {
        // 100 - 15 - 10 - 15 - 20 = 40
        assert_eq!(integrity_score(&counts(3, 1, 1, 1)), 40);
    }

    #[test]
    fn test_single_weights() {
        assert_eq!(integrity_score(&counts(1, 0, 0, 0)), 95);
        assert_eq!(integrity_score(&counts(0, 1, 0, 0)), 90);
        assert_eq!(integrity_score(&counts(0, 0, 1, 0)), 85);
        assert_eq!(integrity_score(&counts(0, 0, 0, 1)), 80);
    }
}
