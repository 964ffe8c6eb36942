//! Vigil infrastructure.
//!
//! Persistence adapters and ambient services for the vigil core: the
//! directory-backed session repository, an in-memory repository for tests
//! and embedded use, platform path resolution, and service configuration.

pub mod config;
pub mod dir_session_repository;
pub mod memory_session_repository;
pub mod paths;

pub use config::VigilConfig;
pub use dir_session_repository::DirSessionRepository;
pub use memory_session_repository::MemorySessionRepository;
pub use paths::VigilPaths;
