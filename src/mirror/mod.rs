//! Best-effort replication of local writes and deletes to a remote document
//! store.
//!
//! Mirror operations are dispatched from detached tasks after the local
//! operation is already durable. Their outcome is observed only through
//! logging: a failed mirror call never blocks, fails or undoes the local
//! write that triggered it, and is never retried. A local store that
//! succeeded while the mirror failed is an accepted, permanent inconsistency.

mod firestore;

pub use firestore::FirestoreMirror;

use async_trait::async_trait;

use crate::{error::MirrorError, transaction::Transaction};

/// The anonymous, per-device user handle used to namespace remote documents.
///
/// Passed explicitly to the mirror at construction; without one, mirror
/// operations silently no-op. That is a deliberate low-friction default, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Wrap a user handle. Returns `None` for an empty string.
    pub fn new(handle: impl Into<String>) -> Option<Self> {
        let handle = handle.into();
        if handle.is_empty() {
            None
        } else {
            Some(Self(handle))
        }
    }

    /// The raw handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replicates transaction inserts and deletes to a remote per-user document
/// collection.
#[async_trait]
pub trait TransactionMirror: Send + Sync {
    /// Add a document for `transaction` to the current identity's
    /// collection.
    ///
    /// Returns the remote document id assigned by the store, or `None` when
    /// the call was skipped because no identity is configured.
    ///
    /// # Errors
    /// Returns a [MirrorError] if the remote store could not be reached or
    /// rejected the document.
    async fn mirror_insert(&self, transaction: &Transaction)
    -> Result<Option<String>, MirrorError>;

    /// Delete the remote document for `transaction`.
    ///
    /// Callers only invoke this for transactions that carry a non-empty
    /// remote id; implementations may assume so.
    ///
    /// # Errors
    /// Returns a [MirrorError] if the remote store could not be reached or
    /// rejected the delete.
    async fn mirror_delete(&self, transaction: &Transaction) -> Result<(), MirrorError>;
}

/// A mirror that never talks to a remote store.
///
/// Used when remote mirroring is not configured at all; every operation is a
/// silent no-op, matching the behavior of a configured mirror without an
/// identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMirror;

#[async_trait]
impl TransactionMirror for DisabledMirror {
    async fn mirror_insert(
        &self,
        _transaction: &Transaction,
    ) -> Result<Option<String>, MirrorError> {
        Ok(None)
    }

    async fn mirror_delete(&self, _transaction: &Transaction) -> Result<(), MirrorError> {
        Ok(())
    }
}
