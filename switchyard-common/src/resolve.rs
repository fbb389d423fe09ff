//! The resolution protocol: the value types a dispatcher hands to its
//! resolver, and the decision the resolver hands back.

use std::fmt;

use crate::error::ResolutionError;

/// Alias of the backend used whenever resolution yields no decision or
/// fails. A registry must always hold a backend under this alias.
pub const FALLBACK_ALIAS: &str = "fallback";

/// Aliases understood by the embedding application, never by the dispatch
/// layer. They cannot name a registry entry and routing to them is an
/// unknown-alias error: `default` is conventionally the dispatcher's own
/// mount point, so routing to it would recurse.
pub const RESERVED_ALIASES: [&str; 2] = ["default", "staticfiles"];

/// The storage capability being invoked, named for resolvers.
///
/// The set is closed: it mirrors [`StorageBackend`](crate::StorageBackend)
/// one to one, so an unsupported operation is a compile error rather than a
/// dispatch-time surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Save,
    Open,
    Delete,
    Exists,
    Url,
    Size,
    Path,
    Listdir,
    AccessedTime,
    CreatedTime,
    ModifiedTime,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Save => "save",
            Operation::Open => "open",
            Operation::Delete => "delete",
            Operation::Exists => "exists",
            Operation::Url => "url",
            Operation::Size => "size",
            Operation::Path => "path",
            Operation::Listdir => "listdir",
            Operation::AccessedTime => "accessed_time",
            Operation::CreatedTime => "created_time",
            Operation::ModifiedTime => "modified_time",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only, ordered view of the aliases a registry knows. Handed to
/// resolvers so they can validate or enumerate their choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSet(Vec<String>);

impl AliasSet {
    pub fn new(aliases: Vec<String>) -> Self {
        Self(aliases)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.0.iter().any(|a| a == alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-call input to a [`StorageResolver`]. Built fresh by the dispatcher
/// for every storage operation and discarded after resolution.
#[derive(Debug, Clone)]
pub struct ResolutionRequest<'a> {
    /// The capability being invoked.
    pub operation: Operation,
    /// The file (or directory, for listings) the operation acts on, when
    /// the operation has a single subject.
    pub file_identity: Option<&'a str>,
    /// Scalar call parameters as a JSON object, opaque to the dispatcher.
    /// File content is never included.
    pub params: serde_json::Value,
}

impl<'a> ResolutionRequest<'a> {
    pub fn new(
        operation: Operation,
        file_identity: Option<&'a str>,
        params: serde_json::Value,
    ) -> Self {
        Self {
            operation,
            file_identity,
            params,
        }
    }
}

/// Outcome of one resolution decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Route the call to the backend registered under this alias.
    Route(String),
    /// No decision; the dispatcher uses the fallback backend. A first-class
    /// outcome, not an error.
    Fallback,
}

/// Pluggable decision component mapping a storage call to a backend alias.
///
/// # Determinism
///
/// For a fixed file identity, repeated resolution must yield the same alias
/// over the whole lifetime of the file. The dispatcher invokes the resolver
/// fresh on every call and caches nothing, so a resolver that answers
/// differently over time routes reads, deletions, and URL generation away
/// from the backend that actually holds the file. This cannot be enforced
/// mechanically; the dispatcher offers opt-in divergence observation (see
/// `RouteObserver` in the dispatch crate).
///
/// Resolution runs synchronously on the caller's task and is never retried,
/// so implementations should avoid side effects.
pub trait StorageResolver: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str {
        "resolver"
    }

    /// Decide which backend should serve `request`.
    ///
    /// `Ok(Resolution::Fallback)` is the expected "no decision" outcome.
    /// `Err(ResolutionError)` also degrades to the fallback backend, but is
    /// logged as a failure. Returning an alias absent from `known_aliases`
    /// surfaces to the caller as
    /// [`DispatchError::UnknownAlias`](crate::DispatchError::UnknownAlias).
    fn resolve(
        &self,
        known_aliases: &AliasSet,
        request: &ResolutionRequest<'_>,
    ) -> Result<Resolution, ResolutionError>;
}
