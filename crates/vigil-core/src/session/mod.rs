//! Session domain module.
//!
//! This module contains all session-related domain models, the violation
//! classifier and integrity scorer, and the repository interface.
//!
//! # Module Structure
//!
//! - `model`: Core session aggregate (`Session`)
//! - `event`: Monitoring event types (`MonitorEvent`, `Severity`)
//! - `violation`: Violation taxonomy and the ordered-rule classifier
//! - `score`: Integrity score reduction
//! - `status`: Lifecycle states (`SessionStatus`)
//! - `id`: Session identifier generation and shape validation
//! - `repository`: Repository trait for session persistence

mod event;
pub mod id;
mod model;
mod repository;
mod score;
mod status;
mod violation;

// Re-export public API
pub use event::{MonitorEvent, Severity};
pub use model::Session;
pub use repository::SessionRepository;
pub use score::{
    MAX_SCORE, WEIGHT_LOOKING_AWAY, WEIGHT_MULTIPLE_FACES, WEIGHT_NO_FACE_DETECTED,
    WEIGHT_SUSPICIOUS_OBJECTS, integrity_score,
};
pub use status::SessionStatus;
pub use violation::{ViolationCounts, ViolationKind, classify};
