//! Session service - the ingestion boundary.
//!
//! `SessionService` coordinates the session aggregate and its repository:
//! it validates identifiers before lookup, serializes writers per session,
//! and exposes the operations the detection client consumes (create, append,
//! bulk append, end, terminate, report, list, get).
//!
//! # Concurrency
//!
//! Each session is the unit of concurrency. Score recomputation reads the
//! full counter set and writes it back, so concurrent appends without
//! serialization would lose increments. Every mutating operation therefore
//! holds that session's lock for the whole load-mutate-persist span. Reads
//! (`get_session`, `get_report`, `list_sessions`) take no write lock; they
//! only need one consistent load. Sessions are independent - there is no
//! cross-session coordination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use vigil_core::error::{Result, VigilError};
use vigil_core::report::Report;
use vigil_core::session::{
    MonitorEvent, Session, SessionRepository, SessionStatus, Severity, id,
};
use vigil_infrastructure::config::DEFAULT_PAGE_LIMIT;

/// Input for `create_session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub candidate_name: String,
    pub candidate_email: String,
    pub interview_title: String,
}

/// An incoming event as submitted by the detection client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: Severity,
}

impl From<NewEvent> for MonitorEvent {
    fn from(event: NewEvent) -> Self {
        Self {
            id: event.id,
            timestamp: event.timestamp,
            kind: event.kind,
            description: event.description,
            severity: event.severity,
        }
    }
}

/// Result of a bulk append: how many events survived filtering, and the
/// session state afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAppendOutcome {
    pub applied: usize,
    pub session: Session,
}

/// Query parameters for `list_sessions`. Page numbering is 1-based.
#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<SessionStatus>,
}

/// One page of sessions, newest-created first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub sessions: Vec<Session>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
}

/// Coordinates session persistence and per-session write serialization.
pub struct SessionService {
    /// Repository for session data persistence
    repository: Arc<dyn SessionRepository>,
    /// Per-session write locks, created lazily on first mutation
    locks: Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>,
    /// Default `limit` for session listings
    default_page_limit: usize,
}

impl SessionService {
    /// Creates a service over the given repository with the default page
    /// limit.
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self::with_page_limit(repository, DEFAULT_PAGE_LIMIT)
    }

    /// Creates a service with a configured default page limit.
    pub fn with_page_limit(repository: Arc<dyn SessionRepository>, default_page_limit: usize) -> Self {
        Self {
            repository,
            locks: Arc::new(RwLock::new(HashMap::new())),
            default_page_limit: default_page_limit.max(1),
        }
    }

    /// Creates a new proctoring session and persists it.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when any candidate field is empty.
    pub async fn create_session(&self, request: CreateSessionRequest) -> Result<Session> {
        let session = Session::create(
            &request.candidate_name,
            &request.candidate_email,
            &request.interview_title,
            Utc::now(),
        )?;
        self.repository.save(&session).await?;
        Ok(session)
    }

    /// Appends a single event to a session.
    ///
    /// The event is stored regardless of classification; uniqueness of event
    /// ids is only enforced on the bulk path.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed session id (checked before lookup),
    /// `NotFound` when no session has the id.
    pub async fn append_event(&self, session_id: &str, event: NewEvent) -> Result<Session> {
        id::validate(session_id)?;
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        session.append_event(event.into(), Utc::now());
        self.repository.save(&session).await?;
        Ok(session)
    }

    /// Appends a batch of events, deduplicating against the stored log and
    /// dropping client model-load spam.
    ///
    /// A non-empty batch where everything was filtered is a success with
    /// `applied == 0`, distinct from the empty-input error.
    ///
    /// # Errors
    ///
    /// `Validation` when the batch is empty or the session id is malformed;
    /// `NotFound` when no session has the id.
    pub async fn append_events_bulk(
        &self,
        session_id: &str,
        events: Vec<NewEvent>,
    ) -> Result<BulkAppendOutcome> {
        if events.is_empty() {
            return Err(VigilError::validation(
                "Events array is required and must not be empty",
            ));
        }
        id::validate(session_id)?;

        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        let incoming = events.len();
        let applied =
            session.append_events_bulk(events.into_iter().map(Into::into).collect(), Utc::now());

        if applied > 0 {
            self.repository.save(&session).await?;
        }
        if applied < incoming {
            tracing::debug!(
                session_id,
                incoming,
                applied,
                "Filtered duplicate or spam events from bulk append"
            );
        }

        Ok(BulkAppendOutcome { applied, session })
    }

    /// Completes a session, fixing its end time and duration.
    ///
    /// Idempotent: ending an already-terminal session returns it unchanged.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed id, `NotFound` for a missing session,
    /// `Internal` (logged) when persisting the completed session fails.
    pub async fn end_session(&self, session_id: &str, video_recorded: bool) -> Result<Session> {
        id::validate(session_id)?;
        let outcome = {
            let lock = self.session_lock(session_id).await;
            let _guard = lock.lock().await;

            match self.load(session_id).await {
                Ok(mut session) => {
                    if session.status.is_terminal() {
                        Ok(session)
                    } else {
                        session.end(video_recorded, Utc::now());
                        match self.repository.save(&session).await {
                            Ok(()) => Ok(session),
                            Err(e) => {
                                tracing::error!(session_id, "Error ending session: {e}");
                                Err(VigilError::internal(format!("Failed to end session: {e}")))
                            }
                        }
                    }
                }
                Err(e) => Err(e),
            }
        };

        // Terminal sessions take no further writes; their lock entry can go.
        self.prune_session_lock(session_id).await;
        outcome
    }

    /// Terminates a session early (examiner-initiated).
    ///
    /// Same timing semantics and idempotence as `end_session`, with status
    /// `terminated`.
    pub async fn terminate_session(&self, session_id: &str) -> Result<Session> {
        id::validate(session_id)?;
        let outcome = {
            let lock = self.session_lock(session_id).await;
            let _guard = lock.lock().await;

            match self.load(session_id).await {
                Ok(mut session) => {
                    if session.status.is_terminal() {
                        Ok(session)
                    } else {
                        session.terminate(Utc::now());
                        match self.repository.save(&session).await {
                            Ok(()) => Ok(session),
                            Err(e) => {
                                tracing::error!(session_id, "Error terminating session: {e}");
                                Err(VigilError::internal(format!(
                                    "Failed to terminate session: {e}"
                                )))
                            }
                        }
                    }
                }
                Err(e) => Err(e),
            }
        };

        self.prune_session_lock(session_id).await;
        outcome
    }

    /// Generates the integrity report for a session.
    pub async fn get_report(&self, session_id: &str) -> Result<Report> {
        id::validate(session_id)?;
        let session = self.load(session_id).await?;
        Ok(Report::from_session(&session))
    }

    /// Lists sessions, newest-created first, with 1-based pagination and an
    /// optional status filter.
    pub async fn list_sessions(&self, query: ListSessionsQuery) -> Result<SessionPage> {
        let mut sessions = self.repository.list_all().await?;
        if let Some(status) = query.status {
            sessions.retain(|s| s.status == status);
        }

        let total = sessions.len();
        let limit = query.limit.unwrap_or(self.default_page_limit).max(1);
        let page = query.page.unwrap_or(1).max(1);
        let total_pages = total.div_ceil(limit);

        let sessions: Vec<Session> = sessions
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(SessionPage {
            sessions,
            total_pages,
            current_page: page,
            total,
        })
    }

    /// Fetches a session by id.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        id::validate(session_id)?;
        self.load(session_id).await
    }

    async fn load(&self, session_id: &str) -> Result<Session> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| VigilError::not_found("session", session_id))
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.write().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops a session's lock entry so the registry does not grow by one
    /// entry per session over the life of the service.
    ///
    /// The entry is only removed while the map holds the sole reference; a
    /// writer still waiting on its clone keeps the entry alive and a fresh
    /// one is created for it on the next mutation.
    async fn prune_session_lock(&self, session_id: &str) {
        let mut locks = self.locks.write().await;
        if locks
            .get(session_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_infrastructure::MemorySessionRepository;

    fn service() -> SessionService {
        SessionService::new(Arc::new(MemorySessionRepository::new()))
    }

    fn create_request() -> CreateSessionRequest {
        CreateSessionRequest {
            candidate_name: "Ada Lovelace".to_string(),
            candidate_email: "ada@example.com".to_string(),
            interview_title: "Backend Engineer".to_string(),
        }
    }

    fn event(id: &str) -> NewEvent {
        NewEvent {
            id: id.to_string(),
            timestamp: Utc::now(),
            kind: "violation".to_string(),
            description: "Candidate looking away for >5 seconds".to_string(),
            severity: Severity::Warning,
        }
    }

    #[tokio::test]
    async fn test_lock_registry_pruned_when_session_ends() {
        let service = service();
        let session = service.create_session(create_request()).await.unwrap();

        service.append_event(&session.id, event("e1")).await.unwrap();
        assert_eq!(service.locks.read().await.len(), 1);

        service.end_session(&session.id, false).await.unwrap();
        assert!(service.locks.read().await.is_empty());

        // The idempotent second end leaves nothing behind either
        service.end_session(&session.id, false).await.unwrap();
        assert!(service.locks.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_lock_registry_pruned_when_session_terminates() {
        let service = service();
        let session = service.create_session(create_request()).await.unwrap();

        service.terminate_session(&session.id).await.unwrap();
        assert!(service.locks.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_lock_registry_pruned_for_missing_sessions() {
        let service = service();

        let err = service
            .end_session("0123456789abcdef01234567", false)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(service.locks.read().await.is_empty());
    }
}
