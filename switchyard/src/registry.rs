//! Backend registry and named backend constructors.
//!
//! The registry is built once, before the dispatcher accepts any call, and
//! is immutable afterwards. Backends are either inserted directly through
//! the builder or constructed from configuration through a
//! [`BackendFactories`] set mapping a backend kind to a constructor over an
//! options blob.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;

use switchyard_common::{AliasSet, DispatchError, StorageBackend, FALLBACK_ALIAS, RESERVED_ALIASES};

use crate::config::DispatcherConfig;

/// Ordered, immutable mapping from alias to a constructed backend.
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn StorageBackend>>,
    aliases: AliasSet,
}

impl BackendRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            backends: BTreeMap::new(),
        }
    }

    /// Construct every configured backend through the matching factory.
    ///
    /// Fails with the offending alias and kind when a factory is missing,
    /// and with the factory's own error (in context) when construction
    /// fails. Aliases come out in sorted alias order.
    pub fn from_config(
        config: &DispatcherConfig,
        factories: &BackendFactories,
    ) -> anyhow::Result<Self> {
        let mut builder = Self::builder();
        for (alias, entry) in &config.backends {
            let factory =
                factories
                    .get(&entry.backend)
                    .ok_or_else(|| DispatchError::UnknownBackendKind {
                        alias: alias.clone(),
                        kind: entry.backend.clone(),
                    })?;
            let backend = factory(&entry.options).with_context(|| {
                format!(
                    "Failed to construct backend kind {:?} for alias {:?}",
                    entry.backend, alias
                )
            })?;
            builder = builder.insert(alias.clone(), backend)?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, alias: &str) -> Option<Arc<dyn StorageBackend>> {
        self.backends.get(alias).cloned()
    }

    /// The aliases this registry knows, in order.
    pub fn aliases(&self) -> &AliasSet {
        &self.aliases
    }

    pub fn has_fallback(&self) -> bool {
        self.backends.contains_key(FALLBACK_ALIAS)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Builder enforcing the registry invariants: aliases are unique, and the
/// reserved aliases never name an entry. It does not itself require a
/// `fallback` entry; [`StorageDispatcher::new`](crate::StorageDispatcher::new)
/// enforces that, so partial registries stay constructible in tests.
pub struct RegistryBuilder {
    backends: BTreeMap<String, Arc<dyn StorageBackend>>,
}

impl RegistryBuilder {
    pub fn insert(
        mut self,
        alias: impl Into<String>,
        backend: Arc<dyn StorageBackend>,
    ) -> Result<Self, DispatchError> {
        let alias = alias.into();
        if RESERVED_ALIASES.contains(&alias.as_str()) {
            return Err(DispatchError::ReservedAlias(alias));
        }
        if self.backends.contains_key(&alias) {
            return Err(DispatchError::DuplicateAlias(alias));
        }
        self.backends.insert(alias, backend);
        Ok(self)
    }

    pub fn build(self) -> BackendRegistry {
        let aliases = AliasSet::new(self.backends.keys().cloned().collect());
        BackendRegistry {
            backends: self.backends,
            aliases,
        }
    }
}

type BackendFactory =
    Box<dyn Fn(&serde_json::Value) -> anyhow::Result<Arc<dyn StorageBackend>> + Send + Sync>;

/// Named backend constructors, matched against the `backend` field of a
/// configuration entry. Each factory receives the entry's `options` blob
/// and returns a constructed backend.
#[derive(Default)]
pub struct BackendFactories {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendFactories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value) -> anyhow::Result<Arc<dyn StorageBackend>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    pub fn get(&self, kind: &str) -> Option<&BackendFactory> {
        self.factories.get(kind)
    }
}
