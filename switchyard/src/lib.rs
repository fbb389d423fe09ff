//! Runtime dispatch layer routing file-storage operations across a fixed
//! set of named backends.
//!
//! A [`StorageDispatcher`] presents the full storage capability set as a
//! single logical backend. On every call it asks its
//! [`StorageResolver`] which registered backend should serve the call,
//! falls back to the backend registered under `"fallback"` when the
//! resolver yields no decision, and forwards the call's arguments to the
//! chosen backend unmodified. The dispatcher implements
//! [`StorageBackend`] itself, so it drops in anywhere a single backend is
//! expected.
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchyard::{BackendRegistry, ExtensionResolver, StorageDispatcher};
//!
//! # fn backends() -> (Arc<dyn switchyard::StorageBackend>, Arc<dyn switchyard::StorageBackend>) { unimplemented!() }
//! # fn main() -> anyhow::Result<()> {
//! let (bulk, media) = backends();
//! let registry = BackendRegistry::builder()
//!     .insert("fallback", bulk)?
//!     .insert("jpg|png|gif", media)?
//!     .build();
//! let dispatcher = StorageDispatcher::new(registry, Box::new(ExtensionResolver::new()))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod observe;
pub mod registry;
pub mod resolvers;

#[cfg(test)]
mod testutil;

pub use config::{BackendEntry, DispatcherConfig};
pub use dispatcher::StorageDispatcher;
pub use observe::RouteObserver;
pub use registry::{BackendFactories, BackendRegistry, RegistryBuilder};
pub use resolvers::ExtensionResolver;

pub use switchyard_common::{
    AliasSet, DispatchError, Listing, Operation, Resolution, ResolutionError, ResolutionRequest,
    StorageBackend, StorageResolver, FALLBACK_ALIAS, RESERVED_ALIASES,
};
