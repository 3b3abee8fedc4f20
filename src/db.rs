//! Database initialization for the local transaction store.

use rusqlite::Connection;

use crate::transaction::create_transaction_table;

/// Create the application's tables if they do not exist yet.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_transaction_table(connection)
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialization failed");
        initialize(&conn).expect("repeat initialization failed");
    }
}
