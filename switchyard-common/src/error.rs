/// Raised by a [`StorageResolver`](crate::StorageResolver) to signal that it
/// could not reach a decision.
///
/// This is the only resolver failure the dispatcher recovers from: it is
/// logged and the call degrades to the fallback backend, so it never
/// reaches the caller of a storage operation. Anything else a resolver
/// does wrong (a panic, a bad alias) is not masked.
#[derive(Debug, thiserror::Error)]
#[error("resolution failed: {0}")]
pub struct ResolutionError(String);

impl ResolutionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Failures produced by the dispatch layer itself, as opposed to failures
/// of whichever backend served a call.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A resolver routed to an alias the registry does not know. Surfaced
    /// to the caller rather than degraded to fallback: it means the
    /// resolver and the registry configuration disagree, which silent
    /// fallback would mask.
    #[error("unknown storage alias {alias:?} (known aliases: {})", .known.join(", "))]
    UnknownAlias { alias: String, known: Vec<String> },

    /// The registry has no backend under the `fallback` alias. Raised at
    /// dispatcher construction, before any call is accepted.
    #[error("storage registry has no \"fallback\" backend")]
    MissingFallback,

    /// Two backends were registered under the same alias.
    #[error("duplicate storage alias {0:?}")]
    DuplicateAlias(String),

    /// An alias reserved for the embedding application was used to name a
    /// registry entry.
    #[error("storage alias {0:?} is reserved and cannot name a backend")]
    ReservedAlias(String),

    /// Configuration referenced a backend kind no factory is registered
    /// for.
    #[error("backend kind {kind:?} for alias {alias:?} is not registered")]
    UnknownBackendKind { alias: String, kind: String },
}
