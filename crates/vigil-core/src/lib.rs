//! Vigil core domain.
//!
//! The session/event/scoring subsystem for proctored interviews: the
//! `Session` aggregate with its ordered event log and violation counters,
//! the ordered-rule violation classifier, the monotonic integrity-score
//! reduction, the report projection, and the persistence trait the
//! infrastructure layer implements.

pub mod error;
pub mod report;
pub mod session;

// Re-export common error type
pub use error::{Result, VigilError};
