//! Vigil application layer.
//!
//! The ingestion boundary over the vigil core: `SessionService` exposes the
//! operations the detection client consumes and serializes writers per
//! session, `SessionMonitor` turns raw detector observations into queued
//! events, and `ApiResponse` is the envelope any transport adapter marshals.

pub mod monitor;
pub mod response;
pub mod session_service;

pub use monitor::SessionMonitor;
pub use response::{ApiResponse, http_status};
pub use session_service::{
    BulkAppendOutcome, CreateSessionRequest, ListSessionsQuery, NewEvent, SessionPage,
    SessionService,
};
