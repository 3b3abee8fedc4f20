//! The orchestration layer between the web handlers, the local store, the
//! remote mirror and the extraction service.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{ExtractionError, StorageError},
    extract::{ExpenseAnalysis, ExpenseAnalyzer},
    mirror::TransactionMirror,
    transaction::{LocalStore, Transaction},
};

/// Owns the single live "all transactions" sequence and coordinates the
/// local store, the remote mirror and the expense analyzer.
///
/// Local writes are awaited, so the live sequence reflects a write before
/// the call returns. Mirror operations run on detached tasks and are never
/// awaited: a slow or failing network has no effect on responsiveness or on
/// local durability, and their outcome is only logged.
#[derive(Clone)]
pub struct ExpenseService {
    store: LocalStore,
    mirror: Arc<dyn TransactionMirror>,
    analyzer: Arc<ExpenseAnalyzer>,
}

impl ExpenseService {
    /// Wire up the orchestration layer.
    pub fn new(
        store: LocalStore,
        mirror: Arc<dyn TransactionMirror>,
        analyzer: ExpenseAnalyzer,
    ) -> Self {
        Self {
            store,
            mirror,
            analyzer: Arc::new(analyzer),
        }
    }

    /// The current transactions, newest date first.
    pub fn all(&self) -> Vec<Transaction> {
        self.store.all()
    }

    /// Subscribe to the live transaction collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.store.subscribe()
    }

    /// Persist a transaction locally, then mirror it remotely on a detached
    /// task.
    ///
    /// When the mirror accepts the document, its assigned id is written back
    /// into the local row so a later delete can find the remote document.
    ///
    /// # Errors
    /// Returns a [StorageError] if the local insert fails. Mirror failures
    /// are logged on the detached task and never surface here.
    pub fn add_transaction(&self, transaction: Transaction) -> Result<Transaction, StorageError> {
        let stored = self.store.insert(&transaction)?;

        let mirror = Arc::clone(&self.mirror);
        let store = self.store.clone();
        let mirrored = stored.clone();
        tokio::spawn(async move {
            match mirror.mirror_insert(&mirrored).await {
                Ok(Some(remote_id)) => {
                    tracing::debug!("mirrored transaction {} as {remote_id}", mirrored.id);
                    if let Err(error) = store.set_remote_id(mirrored.id, &remote_id) {
                        tracing::error!(
                            "could not record remote id for transaction {}: {error}",
                            mirrored.id
                        );
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!("could not mirror transaction {}: {error}", mirrored.id);
                }
            }
        });

        Ok(stored)
    }

    /// Delete a transaction locally, then delete its remote document on a
    /// detached task.
    ///
    /// The remote delete is only attempted when the transaction carries a
    /// non-empty remote id. Deleting a transaction that is not in the store
    /// is a no-op.
    ///
    /// # Errors
    /// Returns a [StorageError] if the local delete fails. Mirror failures
    /// are logged on the detached task and never surface here.
    pub fn remove_transaction(&self, transaction: Transaction) -> Result<(), StorageError> {
        self.store.delete(&transaction)?;

        if transaction.remote_id.is_empty() {
            tracing::debug!("transaction {} has no remote document to delete", transaction.id);
            return Ok(());
        }

        let mirror = Arc::clone(&self.mirror);
        tokio::spawn(async move {
            match mirror.mirror_delete(&transaction).await {
                Ok(()) => tracing::debug!("deleted remote document {}", transaction.remote_id),
                Err(error) => {
                    tracing::warn!(
                        "could not delete remote document {}: {error}",
                        transaction.remote_id
                    );
                }
            }
        });

        Ok(())
    }

    /// Convert a free-text expense entry into a structured record.
    ///
    /// Delegates to the extraction service unchanged; the result is for the
    /// presentation layer to branch on. No store is touched.
    ///
    /// # Errors
    /// Returns an [ExtractionError] if the analysis fails.
    pub async fn analyze(&self, raw_text: &str) -> Result<ExpenseAnalysis, ExtractionError> {
        self.analyzer.analyze(raw_text).await
    }
}

#[cfg(test)]
mod service_tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::{
        category::Category,
        test_utils::{FailingMirror, RecordingMirror, get_test_service, wait_for},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn add_stores_locally_and_mirrors_remotely() {
        let (mirror, inserts) = RecordingMirror::new("doc-1");
        let service = get_test_service(mirror);

        let stored = service
            .add_transaction(Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();

        // The local write is visible before the mirror ever answers. The
        // remote id is left out of the comparison since the detached mirror
        // task may have landed already.
        let all = service.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, stored.id);
        assert_eq!(all[0].description, "Coffee");

        // The mirror eventually receives the insert and the assigned
        // document id lands back in the local row.
        let mut receiver = service.subscribe();
        wait_for(&mut receiver, |transactions| {
            transactions
                .iter()
                .any(|transaction| transaction.remote_id == "doc-1")
        })
        .await;
        assert_eq!(inserts.lock().unwrap().as_slice(), [stored.id]);
    }

    #[tokio::test]
    async fn mirror_failure_leaves_local_store_untouched() {
        let service = get_test_service(FailingMirror);

        let stored = service
            .add_transaction(Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();

        // Give the detached mirror task a chance to fail.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let all = service.all();
        assert_eq!(all, vec![stored]);
        assert_eq!(all[0].remote_id, "");
    }

    #[tokio::test]
    async fn remove_deletes_locally_and_remotely() {
        let (mirror, _inserts) = RecordingMirror::new("doc-1");
        let deletes = mirror.deletes();
        let service = get_test_service(mirror);

        service
            .add_transaction(Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();
        let mut receiver = service.subscribe();
        wait_for(&mut receiver, |transactions| {
            transactions.iter().any(|t| t.remote_id == "doc-1")
        })
        .await;
        let mirrored = service.all().remove(0);

        service.remove_transaction(mirrored).unwrap();

        assert!(service.all().is_empty());
        timeout(Duration::from_secs(1), async {
            loop {
                if deletes.lock().unwrap().contains(&"doc-1".to_owned()) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("mirror delete was never attempted");
    }

    #[tokio::test]
    async fn remove_without_remote_id_skips_the_mirror() {
        let (mirror, _inserts) = RecordingMirror::new("doc-1");
        let deletes = mirror.deletes();
        let service = get_test_service(mirror);

        // The freshly inserted copy has an empty remote id, whether or not
        // the mirror insert has landed yet.
        let local_only = service
            .add_transaction(Transaction::new("Cash tip", 2.0, Category::Other))
            .unwrap();

        service.remove_transaction(local_only).unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(
            deletes.lock().unwrap().is_empty(),
            "mirror delete should not run for a transaction without a remote id"
        );
    }

    #[tokio::test]
    async fn removing_missing_transaction_is_not_an_error() {
        let (mirror, _inserts) = RecordingMirror::new("doc-1");
        let service = get_test_service(mirror);

        let never_stored = Transaction {
            id: 999,
            ..Transaction::new("Ghost", 1.0, Category::Other)
        };

        service
            .remove_transaction(never_stored)
            .expect("removing a missing transaction should be a no-op");
    }
}
