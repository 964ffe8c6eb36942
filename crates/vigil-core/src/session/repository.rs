//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the core logic from the specific storage mechanism (e.g. TOML
/// files, database, remote API).
///
/// # Implementation Notes
///
/// Implementations are not required to serialize concurrent writers; the
/// service layer holds a per-session lock across its load-mutate-persist
/// span. Implementations must keep `list_all` ordering stable
/// (newest-created first).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session to storage, overwriting any previous state.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session from storage. Deleting a missing session is not an
    /// error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions, most recently created first.
    async fn list_all(&self) -> Result<Vec<Session>>;
}
