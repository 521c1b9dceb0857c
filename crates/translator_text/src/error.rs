//! Error types for translation lookups and their collaborators.
//!
//! Absent translations are not errors; they surface as `Ok(None)`. The
//! variants here cover collaborators that could not answer at all, so a
//! failed group load is never mistaken for an empty group.

use thiserror::Error;

/// Errors reported by a translation store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached.
    #[error("translation store unavailable: {reason}")]
    Unavailable {
        /// Description of the connection failure.
        reason: String,
    },

    /// A query was issued but failed.
    #[error("translation store query `{query}` failed: {reason}")]
    Query {
        /// Short description of the query, e.g. `group blog`.
        query: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Errors reported by an external cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend rejected or failed an operation.
    #[error("cache {operation} failed for `{key}`: {reason}")]
    Backend {
        /// Operation that failed (`has`, `get`, `put`, or `forget`).
        operation: &'static str,
        /// Cache key involved.
        key: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Errors surfaced by [`TextResolver`](crate::TextResolver) operations.
#[derive(Debug, Error)]
pub enum TextError {
    /// The translation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The external cache failed while reading or invalidating a group.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
