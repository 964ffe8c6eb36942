//! Directory-backed SessionRepository implementation.
//!
//! Each session persists as one TOML document under `<base>/sessions/`,
//! named by its id. All I/O is async via `tokio::fs`.
//!
//! Write serialization is the service layer's job (per-session locks held
//! across load-mutate-persist); this repository only guarantees that a save
//! replaces the whole document.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use vigil_core::session::{Session, SessionRepository};

/// TOML file-per-session repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── sessions/
///     ├── 65e1b2c3d4e5f60718293a4b.toml
///     └── 65e1b2c3d4e5f60718293a4c.toml
/// ```
pub struct DirSessionRepository {
    sessions_dir: PathBuf,
}

impl DirSessionRepository {
    /// Creates a repository rooted at `base_dir`, creating the sessions
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory structure cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = base_dir.as_ref().join("sessions");
        fs::create_dir_all(&sessions_dir)
            .await
            .context("Failed to create sessions directory")?;
        Ok(Self { sessions_dir })
    }

    /// Returns the directory session files are stored in.
    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{session_id}.toml"))
    }
}

#[async_trait]
impl SessionRepository for DirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let path = self.session_path(session_id);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read session file"),
        };

        let session: Session = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let contents =
            toml::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(self.session_path(&session.id), contents)
            .await
            .context("Failed to write session file")?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        match fs::remove_file(self.session_path(session_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to delete session file"),
        }
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let mut entries = fs::read_dir(&self.sessions_dir)
            .await
            .context("Failed to read sessions directory")?;

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let contents = match fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("Skipping unreadable session file {}: {}", path.display(), e);
                    continue;
                }
            };

            match toml::from_str::<Session>(&contents) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    // Continue loading other sessions
                    tracing::warn!("Skipping malformed session file {}: {}", path.display(), e);
                }
            }
        }

        // Sort by created_at descending (most recent first)
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(sessions)
    }
}
