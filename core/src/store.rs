//! The external store seam.
//!
//! Query generation and persistence live outside the pipeline. The pipeline
//! reads single records by key while authorizing nested `connect`/`update`
//! nodes, and hands the fully resolved request to `persist` exactly once.

use crate::{Key, MutationRequest, Record, StoreResult};

/// Store adapter consumed by the mutation pipeline.
///
/// Implementations must be safe for concurrent use; the pipeline only holds a
/// shared reference.
pub trait Store: Send + Sync {
    /// Fetch one record of `entity` by a unique key.
    fn fetch_by_key(&self, entity: &str, key: &Key) -> StoreResult<Option<Record>>;

    /// Apply a fully resolved request, including every nested operation in
    /// its payload, under the store's own transactional semantics.
    ///
    /// Returns the persisted root record (the deleted record for `Delete`).
    fn persist(&self, entity: &str, request: &MutationRequest) -> StoreResult<Record>;
}

impl<S: Store + ?Sized> Store for &S {
    fn fetch_by_key(&self, entity: &str, key: &Key) -> StoreResult<Option<Record>> {
        (**self).fetch_by_key(entity, key)
    }

    fn persist(&self, entity: &str, request: &MutationRequest) -> StoreResult<Record> {
        (**self).persist(entity, request)
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn fetch_by_key(&self, entity: &str, key: &Key) -> StoreResult<Option<Record>> {
        (**self).fetch_by_key(entity, key)
    }

    fn persist(&self, entity: &str, request: &MutationRequest) -> StoreResult<Record> {
        (**self).persist(entity, request)
    }
}
