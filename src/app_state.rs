//! Implements the struct that holds the state shared by all route handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    error::StorageError, extract::ExpenseAnalyzer, mirror::TransactionMirror,
    service::ExpenseService, transaction::LocalStore,
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The orchestration layer the route handlers talk to.
    pub service: ExpenseService,
}

impl AppState {
    /// Create an [AppState] over a SQLite database connection.
    ///
    /// This function will initialize the database schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        mirror: Arc<dyn TransactionMirror>,
        analyzer: ExpenseAnalyzer,
    ) -> Result<Self, StorageError> {
        let store = LocalStore::new(db_connection)?;

        Ok(Self {
            service: ExpenseService::new(store, mirror, analyzer),
        })
    }
}

impl FromRef<AppState> for ExpenseService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}
