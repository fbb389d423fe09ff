//! Contract crate for the switchyard storage dispatch layer.
//!
//! Defines the capability trait every storage backend implements
//! ([`StorageBackend`]), the resolver contract ([`StorageResolver`]), and
//! the value types exchanged during a resolution decision. The routing
//! itself lives in the `switchyard` crate; this crate is what backend and
//! resolver implementations depend on.

pub mod backend;
pub mod error;
pub mod resolve;

pub use backend::{Listing, StorageBackend};
pub use error::{DispatchError, ResolutionError};
pub use resolve::{
    AliasSet, Operation, Resolution, ResolutionRequest, StorageResolver, FALLBACK_ALIAS,
    RESERVED_ALIASES,
};
