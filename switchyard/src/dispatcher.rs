//! The dispatcher: one logical backend surface over many concrete backends.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use switchyard_common::{
    DispatchError, Listing, Operation, Resolution, ResolutionRequest, StorageBackend,
    StorageResolver, FALLBACK_ALIAS,
};

use crate::observe::RouteObserver;
use crate::registry::BackendRegistry;

/// Routes every storage operation to one of the registered backends.
///
/// On each call the dispatcher builds a [`ResolutionRequest`], invokes its
/// resolver exactly once, maps the outcome to a backend, and forwards the
/// call's arguments unmodified. Resolution failures and "no decision"
/// outcomes degrade to the `fallback` backend; an alias the registry does
/// not know surfaces as [`DispatchError::UnknownAlias`] without touching
/// any backend. Results and backend failures come back verbatim.
///
/// Holds no mutable per-call state: the registry and resolver are read-only
/// after construction, so a dispatcher can be shared and invoked
/// concurrently under whatever concurrency contract its backends offer.
pub struct StorageDispatcher {
    registry: BackendRegistry,
    resolver: Box<dyn StorageResolver>,
    observer: Option<RouteObserver>,
}

impl StorageDispatcher {
    /// Fails fast with [`DispatchError::MissingFallback`] when the registry
    /// has no `fallback` backend; a dispatcher without one has nowhere to
    /// send undecided calls and must not accept any.
    pub fn new(
        registry: BackendRegistry,
        resolver: Box<dyn StorageResolver>,
    ) -> Result<Self, DispatchError> {
        if !registry.has_fallback() {
            return Err(DispatchError::MissingFallback);
        }
        Ok(Self {
            registry,
            resolver,
            observer: None,
        })
    }

    /// Enable route-consistency observation: the dispatcher records the
    /// first alias resolved for each file identity and warns when a later
    /// resolution diverges. Observation never alters routing.
    pub fn with_route_observation(mut self) -> Self {
        self.observer = Some(RouteObserver::default());
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn route_observer(&self) -> Option<&RouteObserver> {
        self.observer.as_ref()
    }

    /// Resolve which backend would serve a call, without performing any
    /// I/O. This is the whole routing algorithm; the capability methods
    /// are thin forwarders over it.
    pub fn resolve_backend(
        &self,
        operation: Operation,
        file_identity: Option<&str>,
        params: serde_json::Value,
    ) -> Result<(String, Arc<dyn StorageBackend>), DispatchError> {
        let request = ResolutionRequest::new(operation, file_identity, params);
        let alias = match self.resolver.resolve(self.registry.aliases(), &request) {
            Ok(Resolution::Route(alias)) => alias,
            Ok(Resolution::Fallback) => {
                debug!(
                    operation = %operation,
                    file = file_identity.unwrap_or("-"),
                    "No routing decision, using fallback"
                );
                FALLBACK_ALIAS.to_string()
            }
            Err(e) => {
                warn!(
                    operation = %operation,
                    file = file_identity.unwrap_or("-"),
                    resolver = self.resolver.name(),
                    error = %e,
                    "Resolution failed, using fallback"
                );
                FALLBACK_ALIAS.to_string()
            }
        };
        let backend = self
            .registry
            .get(&alias)
            .ok_or_else(|| DispatchError::UnknownAlias {
                alias: alias.clone(),
                known: self.registry.aliases().iter().map(str::to_owned).collect(),
            })?;
        if let (Some(observer), Some(file)) = (&self.observer, file_identity) {
            observer.record(file, &alias);
        }
        debug!(
            operation = %operation,
            file = file_identity.unwrap_or("-"),
            alias = %alias,
            "Dispatching storage operation"
        );
        Ok((alias, backend))
    }
}

impl fmt::Debug for StorageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageDispatcher")
            .field("resolver", &self.resolver.name())
            .field("backends", self.registry.aliases())
            .field("route_observation", &self.observer.is_some())
            .finish()
    }
}

#[async_trait]
impl StorageBackend for StorageDispatcher {
    async fn save(&self, name: &str, content: Bytes) -> anyhow::Result<String> {
        let (_, backend) = self.resolve_backend(
            Operation::Save,
            Some(name),
            json!({ "name": name, "content_len": content.len() }),
        )?;
        backend.save(name, content).await
    }

    async fn open(&self, name: &str) -> anyhow::Result<Bytes> {
        let (_, backend) =
            self.resolve_backend(Operation::Open, Some(name), json!({ "name": name }))?;
        backend.open(name).await
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        let (_, backend) =
            self.resolve_backend(Operation::Delete, Some(name), json!({ "name": name }))?;
        backend.delete(name).await
    }

    async fn exists(&self, name: &str) -> anyhow::Result<bool> {
        let (_, backend) =
            self.resolve_backend(Operation::Exists, Some(name), json!({ "name": name }))?;
        backend.exists(name).await
    }

    async fn url(&self, name: &str) -> anyhow::Result<String> {
        let (_, backend) =
            self.resolve_backend(Operation::Url, Some(name), json!({ "name": name }))?;
        backend.url(name).await
    }

    async fn size(&self, name: &str) -> anyhow::Result<u64> {
        let (_, backend) =
            self.resolve_backend(Operation::Size, Some(name), json!({ "name": name }))?;
        backend.size(name).await
    }

    async fn path(&self, name: &str) -> anyhow::Result<PathBuf> {
        let (_, backend) =
            self.resolve_backend(Operation::Path, Some(name), json!({ "name": name }))?;
        backend.path(name).await
    }

    async fn listdir(&self, path: &str) -> anyhow::Result<Listing> {
        let (_, backend) =
            self.resolve_backend(Operation::Listdir, Some(path), json!({ "path": path }))?;
        backend.listdir(path).await
    }

    async fn accessed_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let (_, backend) =
            self.resolve_backend(Operation::AccessedTime, Some(name), json!({ "name": name }))?;
        backend.accessed_time(name).await
    }

    async fn created_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let (_, backend) =
            self.resolve_backend(Operation::CreatedTime, Some(name), json!({ "name": name }))?;
        backend.created_time(name).await
    }

    async fn modified_time(&self, name: &str) -> anyhow::Result<DateTime<Utc>> {
        let (_, backend) =
            self.resolve_backend(Operation::ModifiedTime, Some(name), json!({ "name": name }))?;
        backend.modified_time(name).await
    }
}
