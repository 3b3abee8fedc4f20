//! Implements the SQLite backed local store with a live view of its
//! contents.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::watch;

use crate::{
    db::initialize,
    error::StorageError,
    transaction::{
        Transaction, TransactionId, all_transactions, clear_transactions, delete_transaction,
        insert_transaction, set_remote_id,
    },
};

/// Stores transactions in a SQLite database and publishes the full ordered
/// collection after every change.
///
/// The published sequence has replay-latest semantics: a receiver obtained
/// from [LocalStore::subscribe] immediately observes the current contents,
/// and every insert, delete or clear republishes the full collection (newest
/// date first). Publishing compares against the previous value, so the same
/// underlying state is never emitted twice.
#[derive(Debug, Clone)]
pub struct LocalStore {
    connection: Arc<Mutex<Connection>>,
    publisher: Arc<watch::Sender<Vec<Transaction>>>,
}

impl LocalStore {
    /// Create a store for `connection`, initializing the schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or read.
    pub fn new(connection: Connection) -> Result<Self, StorageError> {
        initialize(&connection)?;
        let contents = all_transactions(&connection)?;
        let (publisher, _) = watch::channel(contents);

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            publisher: Arc::new(publisher),
        })
    }

    /// The current contents, newest date first.
    pub fn all(&self) -> Vec<Transaction> {
        self.publisher.borrow().clone()
    }

    /// Subscribe to the live collection.
    ///
    /// The receiver starts out holding the current contents and is notified
    /// whenever the stored set changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.publisher.subscribe()
    }

    /// Insert a transaction and republish.
    ///
    /// Uses replace-on-conflict semantics keyed by the local id, so
    /// re-inserting an existing id overwrites that row. Returns the stored
    /// row with its assigned id.
    ///
    /// # Errors
    /// This function will return a:
    /// - [StorageError::InvalidAmount] if the amount is not a positive number,
    /// - or [StorageError::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    ///
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    pub fn insert(&self, transaction: &Transaction) -> Result<Transaction, StorageError> {
        let connection = self.connection.lock().unwrap();
        let stored = insert_transaction(transaction, &connection)?;
        self.publish(&connection)?;

        Ok(stored)
    }

    /// Delete a transaction and republish.
    ///
    /// Deleting a transaction that is not in the store is a no-op: nothing
    /// is emitted and no error is returned.
    ///
    /// # Errors
    /// This function will return a [StorageError::SqlError] if there is an
    /// SQL error.
    ///
    /// # Panics
    ///
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    pub fn delete(&self, transaction: &Transaction) -> Result<(), StorageError> {
        let connection = self.connection.lock().unwrap();
        let rows_affected = delete_transaction(transaction.id, &connection)?;

        if rows_affected == 0 {
            tracing::debug!("transaction {} was already gone", transaction.id);
            return Ok(());
        }

        self.publish(&connection)
    }

    /// Remove all transactions and republish.
    ///
    /// # Errors
    /// This function will return a [StorageError::SqlError] if there is an
    /// SQL error.
    ///
    /// # Panics
    ///
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    pub fn clear(&self) -> Result<(), StorageError> {
        let connection = self.connection.lock().unwrap();
        clear_transactions(&connection)?;
        self.publish(&connection)
    }

    /// Record the remote document id assigned by a successful mirror insert
    /// and republish.
    ///
    /// # Errors
    /// This function will return a:
    /// - [StorageError::NotFound] if the row was deleted in the meantime,
    /// - or [StorageError::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    ///
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    pub fn set_remote_id(
        &self,
        id: TransactionId,
        remote_id: &str,
    ) -> Result<(), StorageError> {
        let connection = self.connection.lock().unwrap();
        set_remote_id(id, remote_id, &connection)?;
        self.publish(&connection)
    }

    fn publish(&self, connection: &Connection) -> Result<(), StorageError> {
        let contents = all_transactions(connection)?;

        self.publisher.send_if_modified(|current| {
            if *current == contents {
                false
            } else {
                *current = contents;
                true
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod local_store_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{category::Category, transaction::Transaction};

    use super::LocalStore;

    fn get_test_store() -> LocalStore {
        let conn = Connection::open_in_memory().unwrap();
        LocalStore::new(conn).unwrap()
    }

    #[test]
    fn insert_publishes_full_collection() {
        let store = get_test_store();
        let mut receiver = store.subscribe();
        assert!(receiver.borrow_and_update().is_empty());

        let coffee = store
            .insert(&Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();

        assert!(receiver.has_changed().unwrap());
        let observed = receiver.borrow_and_update().clone();
        assert_eq!(observed, vec![coffee]);
    }

    #[test]
    fn late_subscriber_observes_current_contents() {
        let store = get_test_store();
        let coffee = store
            .insert(&Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();

        let receiver = store.subscribe();

        assert_eq!(*receiver.borrow(), vec![coffee]);
    }

    #[test]
    fn observed_sequence_is_ordered_newest_first() {
        let store = get_test_store();
        let old = store
            .insert(
                &Transaction::new("Socks", 9.99, Category::Shopping)
                    .dated(datetime!(2026-01-01 09:00 UTC)),
            )
            .unwrap();
        let new = store
            .insert(
                &Transaction::new("Cinema", 18.0, Category::Entertainment)
                    .dated(datetime!(2026-03-15 18:30 UTC)),
            )
            .unwrap();

        assert_eq!(store.all(), vec![new, old]);
    }

    #[test]
    fn round_trip_insert_then_delete() {
        let store = get_test_store();

        let stored = store
            .insert(&Transaction::new("Groceries", 82.4, Category::Food))
            .unwrap();
        assert!(store.all().contains(&stored));

        store.delete(&stored).unwrap();
        assert!(!store.all().contains(&stored));
    }

    #[test]
    fn deleting_missing_transaction_does_not_emit() {
        let store = get_test_store();
        let stored = store
            .insert(&Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();
        let mut receiver = store.subscribe();
        receiver.borrow_and_update();

        let mut missing = stored.clone();
        missing.id += 100;
        store.delete(&missing).expect("delete should be a no-op");

        assert!(
            !receiver.has_changed().unwrap(),
            "deleting a missing transaction should not republish"
        );
        assert_eq!(store.all(), vec![stored]);
    }

    #[test]
    fn clear_empties_observed_sequence() {
        let store = get_test_store();
        store
            .insert(&Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();
        store
            .insert(&Transaction::new("Bus fare", 3.5, Category::Transport))
            .unwrap();

        store.clear().unwrap();

        assert!(store.all().is_empty());
        assert!(store.subscribe().borrow().is_empty());
    }

    #[test]
    fn set_remote_id_republishes() {
        let store = get_test_store();
        let stored = store
            .insert(&Transaction::new("Coffee", 5.75, Category::Food))
            .unwrap();
        let mut receiver = store.subscribe();
        receiver.borrow_and_update();

        store.set_remote_id(stored.id, "doc-123").unwrap();

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow().first().unwrap().remote_id, "doc-123");
    }
}
