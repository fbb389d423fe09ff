//! Backends and resolvers shared by the test modules.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};

use switchyard_common::{
    AliasSet, Listing, Resolution, ResolutionError, ResolutionRequest, StorageBackend,
    StorageResolver,
};

use crate::registry::BackendFactories;

/// One forwarded call, as seen by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub name: String,
    pub content: Option<Bytes>,
}

/// Spy backend: records every call it receives and answers with values
/// derived from its label, so tests can assert both that arguments arrive
/// unmodified and that results come back from the expected backend.
pub struct RecordingBackend {
    label: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBackend {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, name: &str, content: Option<Bytes>) {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            name: name.to_string(),
            content,
        });
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }
}

#[async_trait]
impl StorageBackend for RecordingBackend {
    async fn save(&self, name: &str, content: Bytes) -> anyhow::Result<String> {
        self.record("save", name, Some(content));
        Ok(format!("{}:{}", self.label, name))
    }

    async fn open(&self, name: &str) -> anyhow::Result<Bytes> {
        self.record("open", name, None);
        Ok(Bytes::from(format!("contents-from-{}", self.label)))
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        self.record("delete", name, None);
        Ok(())
    }

    async fn exists(&self, name: &str) -> anyhow::Result<bool> {
        self.record("exists", name, None);
        Ok(true)
    }

    async fn url(&self, name: &str) -> anyhow::Result<String> {
        self.record("url", name, None);
        Ok(format!("https://{}/{}", self.label, name))
    }

    async fn size(&self, name: &str) -> anyhow::Result<u64> {
        self.record("size", name, None);
        Ok(self.label.len() as u64)
    }

    async fn path(&self, name: &str) -> anyhow::Result<PathBuf> {
        self.record("path", name, None);
        Ok(PathBuf::from(format!("/{}/{}", self.label, name)))
    }

    async fn listdir(&self, path: &str) -> anyhow::Result<Listing> {
        self.record("listdir", path, None);
        Ok(Listing {
            directories: vec![self.label.clone()],
            files: vec![],
        })
    }

    async fn accessed_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        self.record("accessed_time", name, None);
        Ok(self.timestamp())
    }

    async fn created_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        self.record("created_time", name, None);
        Ok(self.timestamp())
    }

    async fn modified_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        self.record("modified_time", name, None);
        Ok(self.timestamp())
    }
}

/// Factory set constructing [`RecordingBackend`]s, for configuration tests.
pub fn recording_factories() -> BackendFactories {
    let mut factories = BackendFactories::new();
    factories.register("recording", |options| {
        let label = options
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or("recording");
        Ok(Arc::new(RecordingBackend::new(label)) as Arc<dyn StorageBackend>)
    });
    factories
}

/// Minimal directory-backed backend for end-to-end tests. Flat namespace,
/// no nesting beyond what the saved names carry.
pub struct DirBackend {
    base: PathBuf,
}

impl DirBackend {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn full_path(&self, name: &str) -> PathBuf {
        let name = name.trim_start_matches('/').replace("..", "");
        self.base.join(name)
    }
}

#[async_trait]
impl StorageBackend for DirBackend {
    async fn save(&self, name: &str, content: Bytes) -> anyhow::Result<String> {
        let dest = self.full_path(name);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, &content).await?;
        Ok(name.to_string())
    }

    async fn open(&self, name: &str) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(tokio::fs::read(self.full_path(name)).await?))
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        let path = self.full_path(name);
        if path.exists() {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> anyhow::Result<bool> {
        Ok(self.full_path(name).exists())
    }

    async fn url(&self, name: &str) -> anyhow::Result<String> {
        Ok(format!("file://{}", self.full_path(name).display()))
    }

    async fn size(&self, name: &str) -> anyhow::Result<u64> {
        Ok(tokio::fs::metadata(self.full_path(name)).await?.len())
    }

    async fn path(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self.full_path(name))
    }

    async fn listdir(&self, path: &str) -> anyhow::Result<Listing> {
        let mut listing = Listing::default();
        let mut entries = tokio::fs::read_dir(self.full_path(path)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await?.is_dir() {
                listing.directories.push(name);
            } else {
                listing.files.push(name);
            }
        }
        listing.directories.sort();
        listing.files.sort();
        Ok(listing)
    }

    async fn accessed_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let meta = tokio::fs::metadata(self.full_path(name)).await?;
        Ok(DateTime::<Utc>::from(meta.accessed()?))
    }

    async fn created_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let meta = tokio::fs::metadata(self.full_path(name)).await?;
        Ok(DateTime::<Utc>::from(meta.created()?))
    }

    async fn modified_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let meta = tokio::fs::metadata(self.full_path(name)).await?;
        Ok(DateTime::<Utc>::from(meta.modified()?))
    }
}

/// Resolver answering with a fixed outcome regardless of the request.
pub struct StaticResolver(pub Resolution);

impl StorageResolver for StaticResolver {
    fn name(&self) -> &str {
        "static"
    }

    fn resolve(
        &self,
        _known_aliases: &AliasSet,
        _request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        Ok(self.0.clone())
    }
}

/// Resolver that always raises a resolution failure.
pub struct FailingResolver;

impl StorageResolver for FailingResolver {
    fn name(&self) -> &str {
        "failing"
    }

    fn resolve(
        &self,
        _known_aliases: &AliasSet,
        _request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        Err(ResolutionError::new("deliberately undecided"))
    }
}

/// Routes files with a matching suffix to a fixed alias, everything else to
/// fallback. Deterministic: the answer depends only on the file identity.
pub struct SuffixResolver {
    pub suffix: &'static str,
    pub alias: &'static str,
}

impl StorageResolver for SuffixResolver {
    fn name(&self) -> &str {
        "suffix"
    }

    fn resolve(
        &self,
        _known_aliases: &AliasSet,
        request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        match request.file_identity {
            Some(name) if name.ends_with(self.suffix) => {
                Ok(Resolution::Route(self.alias.to_string()))
            }
            _ => Ok(Resolution::Fallback),
        }
    }
}

/// Deliberately nondeterministic resolver: alternates between two aliases
/// on successive calls. Exists to exercise route observation.
pub struct AlternatingResolver {
    aliases: [&'static str; 2],
    calls: Mutex<usize>,
}

impl AlternatingResolver {
    pub fn new(first: &'static str, second: &'static str) -> Self {
        Self {
            aliases: [first, second],
            calls: Mutex::new(0),
        }
    }
}

impl StorageResolver for AlternatingResolver {
    fn name(&self) -> &str {
        "alternating"
    }

    fn resolve(
        &self,
        _known_aliases: &AliasSet,
        _request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError> {
        let mut calls = self.calls.lock().unwrap();
        let alias = self.aliases[*calls % 2];
        *calls += 1;
        Ok(Resolution::Route(alias.to_string()))
    }
}
