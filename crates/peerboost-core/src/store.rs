//! Document store port.
//!
//! Defined in peerboost-core so the engine can persist the document without
//! depending on any concrete storage. The JSON file implementation lives in
//! peerboost-infra.

use peerboost_types::document::Document;
use peerboost_types::error::StoreError;

/// Abstraction over durable document storage.
///
/// `load` is infallible by contract: an absent, unreadable, or corrupt
/// backing store yields a fresh empty document (implementations absorb the
/// condition and log it) rather than propagating an error into the engine.
/// `save` replaces the whole document atomically; a returned error means
/// nothing was committed and the previously stored document is still intact.
pub trait DocumentStore: Send + Sync {
    /// Load the persisted document, or an empty default if none is usable.
    fn load(&self) -> impl std::future::Future<Output = Document> + Send;

    /// Durably replace the stored document, all-or-nothing.
    fn save(
        &self,
        doc: &Document,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
