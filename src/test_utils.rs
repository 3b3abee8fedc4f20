//! Shared helpers for tests: stub mirrors and a condition waiter for the
//! live transaction sequence.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use rusqlite::Connection;
use tokio::{sync::watch, time::timeout};

use crate::{
    error::MirrorError,
    extract::ExpenseAnalyzer,
    mirror::TransactionMirror,
    service::ExpenseService,
    transaction::{LocalStore, Transaction, TransactionId},
};

/// A mirror that records the calls it receives and always succeeds.
pub struct RecordingMirror {
    remote_id: String,
    inserts: Arc<Mutex<Vec<TransactionId>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl RecordingMirror {
    /// A mirror that assigns `remote_id` to every inserted document,
    /// paired with the list of local ids it has seen.
    pub fn new(remote_id: &str) -> (Self, Arc<Mutex<Vec<TransactionId>>>) {
        let inserts = Arc::new(Mutex::new(Vec::new()));

        let mirror = Self {
            remote_id: remote_id.to_owned(),
            inserts: Arc::clone(&inserts),
            deletes: Arc::new(Mutex::new(Vec::new())),
        };

        (mirror, inserts)
    }

    /// The remote ids this mirror has been asked to delete.
    pub fn deletes(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.deletes)
    }
}

#[async_trait]
impl TransactionMirror for RecordingMirror {
    async fn mirror_insert(
        &self,
        transaction: &Transaction,
    ) -> Result<Option<String>, MirrorError> {
        self.inserts.lock().unwrap().push(transaction.id);
        Ok(Some(self.remote_id.clone()))
    }

    async fn mirror_delete(&self, transaction: &Transaction) -> Result<(), MirrorError> {
        self.deletes.lock().unwrap().push(transaction.remote_id.clone());
        Ok(())
    }
}

/// A mirror whose every call fails, simulating an unreachable remote store.
pub struct FailingMirror;

#[async_trait]
impl TransactionMirror for FailingMirror {
    async fn mirror_insert(
        &self,
        _transaction: &Transaction,
    ) -> Result<Option<String>, MirrorError> {
        Err(MirrorError::Http("connection refused".to_owned()))
    }

    async fn mirror_delete(&self, _transaction: &Transaction) -> Result<(), MirrorError> {
        Err(MirrorError::Http("connection refused".to_owned()))
    }
}

/// An [ExpenseService] over an in-memory database and the given mirror.
///
/// The analyzer is wired with a dummy key; tests that exercise analysis go
/// through the parsing functions instead of the network.
pub fn get_test_service(mirror: impl TransactionMirror + 'static) -> ExpenseService {
    let conn = Connection::open_in_memory().unwrap();
    let store = LocalStore::new(conn).unwrap();

    ExpenseService::new(store, Arc::new(mirror), ExpenseAnalyzer::new("test-key"))
}

/// Wait until the observed collection satisfies `predicate`, or panic after
/// one second.
pub async fn wait_for(
    receiver: &mut watch::Receiver<Vec<Transaction>>,
    predicate: impl Fn(&[Transaction]) -> bool,
) {
    timeout(Duration::from_secs(1), async {
        loop {
            if predicate(&receiver.borrow_and_update()) {
                break;
            }
            receiver.changed().await.expect("store was dropped");
        }
    })
    .await
    .expect("the expected state was never observed")
}
