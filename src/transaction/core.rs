//! Defines the core data model and database queries for expense
//! transactions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{category::Category, error::StorageError};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for local transaction ids.
pub type TransactionId = i64;

/// The id value of a transaction that has not been persisted yet.
///
/// The local store assigns the real id on insert.
pub const UNASSIGNED_ID: TransactionId = 0;

/// A single recorded expense.
///
/// Amounts are positive magnitudes representing an outflow. The `remote_id`
/// stays empty until the remote mirror accepts the document and the assigned
/// document id is written back into the local row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The local id, assigned by the store on insert and immutable after.
    pub id: TransactionId,
    /// The remote document id, empty until a mirror insert succeeds.
    pub remote_id: String,
    /// A text description of what the expense was for.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category: Category,
    /// When the expense happened. Defaults to the creation time.
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction dated now, ready to be inserted into the local
    /// store.
    pub fn new(description: &str, amount: f64, category: Category) -> Self {
        Self {
            id: UNASSIGNED_ID,
            remote_id: String::new(),
            description: description.to_owned(),
            amount,
            category,
            date: OffsetDateTime::now_utc(),
        }
    }

    /// Set the date of the transaction.
    pub fn dated(mut self, date: OffsetDateTime) -> Self {
        self.date = date;
        self
    }
}

/// Check that `amount` is a finite, strictly positive number.
///
/// Every insert path must pass this check before touching the database, not
/// just the add-expense form.
///
/// # Errors
/// Returns a [StorageError::InvalidAmount] if the amount is zero, negative,
/// NaN or infinite.
pub fn validate_amount(amount: f64) -> Result<(), StorageError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(StorageError::InvalidAmount(amount))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a transaction into the database and return the stored row.
///
/// Inserting uses replace-on-conflict semantics keyed by the local id:
/// a transaction with [UNASSIGNED_ID] gets a fresh id assigned, while
/// re-inserting an existing id overwrites that row instead of erroring.
///
/// # Errors
/// This function will return a:
/// - [StorageError::InvalidAmount] if the amount is not a positive number,
/// - or [StorageError::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<Transaction, StorageError> {
    validate_amount(transaction.amount)?;

    let id = match transaction.id {
        UNASSIGNED_ID => None,
        id => Some(id),
    };

    let transaction = connection
        .prepare(
            "INSERT OR REPLACE INTO \"transaction\" (id, remote_id, description, amount, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, remote_id, description, amount, category, date",
        )?
        .query_row(
            (
                id,
                &transaction.remote_id,
                &transaction.description,
                transaction.amount,
                transaction.category,
                transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete a transaction from the database by its `id`.
///
/// Deleting an id that is not in the database is a no-op.
///
/// # Errors
/// This function will return a [StorageError::SqlError] if there is an SQL
/// error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<usize, StorageError> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Delete all transactions from the database.
///
/// # Errors
/// This function will return a [StorageError::SqlError] if there is an SQL
/// error.
pub fn clear_transactions(connection: &Connection) -> Result<(), StorageError> {
    connection.execute("DELETE FROM \"transaction\"", ())?;

    Ok(())
}

/// Retrieve all transactions, newest date first.
///
/// Ties on the date are broken by descending id so the ordering is
/// deterministic: of two expenses recorded at the same instant, the one
/// inserted last comes first.
///
/// # Errors
/// This function will return a [StorageError::SqlError] if there is an SQL
/// error.
pub fn all_transactions(connection: &Connection) -> Result<Vec<Transaction>, StorageError> {
    connection
        .prepare(
            "SELECT id, remote_id, description, amount, category, date FROM \"transaction\"
             ORDER BY date DESC, id DESC",
        )?
        .query_map((), map_transaction_row)?
        .map(|row| row.map_err(StorageError::SqlError))
        .collect()
}

/// Record the remote document id on a local row after a successful mirror
/// insert.
///
/// # Errors
/// This function will return a:
/// - [StorageError::NotFound] if `id` does not refer to a stored transaction,
/// - or [StorageError::SqlError] if there is some other SQL error.
pub fn set_remote_id(
    id: TransactionId,
    remote_id: &str,
    connection: &Connection,
) -> Result<(), StorageError> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET remote_id = :remote_id WHERE id = :id",
        rusqlite::named_params! {":remote_id": remote_id, ":id": id},
    )?;

    if rows_affected == 0 {
        return Err(StorageError::NotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                remote_id TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Index used by the date-descending dashboard query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let remote_id = row.get(1)?;
    let description = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        remote_id,
        description,
        amount,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        category::Category,
        db::initialize,
        error::StorageError,
        transaction::{
            Transaction, all_transactions, delete_transaction, insert_transaction, set_remote_id,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let conn = get_test_connection();

        let first = insert_transaction(&Transaction::new("Coffee", 5.75, Category::Food), &conn)
            .expect("Could not insert transaction");
        let second = insert_transaction(&Transaction::new("Bus fare", 3.5, Category::Transport), &conn)
            .expect("Could not insert transaction");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn insert_rejects_non_positive_amounts() {
        let conn = get_test_connection();

        for amount in [0.0, -12.3, f64::NAN, f64::INFINITY] {
            let result =
                insert_transaction(&Transaction::new("bad", amount, Category::Other), &conn);

            assert!(
                matches!(result, Err(StorageError::InvalidAmount(_))),
                "want InvalidAmount for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn insert_replaces_row_with_same_id() {
        let conn = get_test_connection();
        let stored = insert_transaction(&Transaction::new("Coffee", 5.75, Category::Food), &conn)
            .expect("Could not insert transaction");

        let mut replacement = stored.clone();
        replacement.description = "Flat white".to_owned();
        replacement.amount = 6.5;
        let replaced = insert_transaction(&replacement, &conn).unwrap();

        assert_eq!(replaced.id, stored.id);

        let all = all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 1, "want 1 transaction, got {}", all.len());
        assert_eq!(all[0].description, "Flat white");
        assert_eq!(all[0].amount, 6.5);
    }

    #[test]
    fn all_orders_by_date_descending_then_id() {
        let conn = get_test_connection();
        let oldest = datetime!(2026-01-01 09:00 UTC);
        let newest = datetime!(2026-03-15 18:30 UTC);

        let middle_a = insert_transaction(
            &Transaction::new("Groceries", 80.0, Category::Food).dated(datetime!(2026-02-01 12:00 UTC)),
            &conn,
        )
        .unwrap();
        let old = insert_transaction(
            &Transaction::new("Socks", 9.99, Category::Shopping).dated(oldest),
            &conn,
        )
        .unwrap();
        let middle_b = insert_transaction(
            &Transaction::new("Takeaway", 24.0, Category::Food).dated(datetime!(2026-02-01 12:00 UTC)),
            &conn,
        )
        .unwrap();
        let new = insert_transaction(
            &Transaction::new("Cinema", 18.0, Category::Entertainment).dated(newest),
            &conn,
        )
        .unwrap();

        let got = all_transactions(&conn).unwrap();

        // Equal dates fall back to descending id, so middle_b beats middle_a.
        let want = vec![new, middle_b, middle_a, old];
        assert_eq!(got, want, "got transactions {got:?}, want {want:?}");
    }

    #[test]
    fn delete_missing_transaction_is_noop() {
        let conn = get_test_connection();
        insert_transaction(&Transaction::new("Coffee", 5.75, Category::Food), &conn).unwrap();

        let rows_affected = delete_transaction(999, &conn).expect("delete should not error");

        assert_eq!(rows_affected, 0);
        assert_eq!(all_transactions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn set_remote_id_updates_row() {
        let conn = get_test_connection();
        let stored =
            insert_transaction(&Transaction::new("Coffee", 5.75, Category::Food), &conn).unwrap();
        assert_eq!(stored.remote_id, "");

        set_remote_id(stored.id, "a1b2c3", &conn).expect("Could not set remote id");

        let all = all_transactions(&conn).unwrap();
        assert_eq!(all[0].remote_id, "a1b2c3");
    }

    #[test]
    fn set_remote_id_fails_on_missing_row() {
        let conn = get_test_connection();

        let result = set_remote_id(42, "a1b2c3", &conn);

        assert_eq!(result, Err(StorageError::NotFound));
    }
}
