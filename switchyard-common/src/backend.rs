use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Contents of one directory level, as reported by [`StorageBackend::listdir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Names of subdirectories directly under the listed path.
    pub directories: Vec<String>,
    /// Names of files directly under the listed path.
    pub files: Vec<String>,
}

/// Trait implemented by every storage backend reachable through a
/// dispatcher.
///
/// Each backend handles the raw I/O for one storage medium (local
/// directory, object store, CDN). The dispatcher is responsible for
/// choosing which backend serves a given call; the backend is responsible
/// only for the capability itself. The capability set is closed: a
/// dispatcher forwards exactly these operations and nothing else, and the
/// dispatcher implements this trait itself so it can stand in anywhere a
/// single backend is expected.
///
/// Errors are returned as `anyhow::Result` so each backend can surface
/// whatever failure type its medium produces; the dispatcher propagates
/// them to the caller untouched.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `content` under `name`, returning the name the backend
    /// actually stored it under.
    async fn save(&self, name: &str, content: bytes::Bytes) -> anyhow::Result<String>;

    /// Read the full contents of `name`.
    async fn open(&self, name: &str) -> anyhow::Result<bytes::Bytes>;

    /// Delete `name`. Deleting a file that does not exist is not an error.
    async fn delete(&self, name: &str) -> anyhow::Result<()>;

    /// Whether `name` exists on this backend.
    async fn exists(&self, name: &str) -> anyhow::Result<bool>;

    /// A URL at which `name` can be accessed, if the medium has one.
    async fn url(&self, name: &str) -> anyhow::Result<String>;

    /// Size of `name` in bytes.
    async fn size(&self, name: &str) -> anyhow::Result<u64>;

    /// Local filesystem path of `name`, for media that have one. Backends
    /// without a local path (object stores, CDNs) return an error.
    async fn path(&self, name: &str) -> anyhow::Result<PathBuf>;

    /// List the directories and files directly under `path`.
    async fn listdir(&self, path: &str) -> anyhow::Result<Listing>;

    /// Last access time of `name`.
    async fn accessed_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>>;

    /// Creation time of `name`.
    async fn created_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>>;

    /// Last modification time of `name`.
    async fn modified_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>>;
}
