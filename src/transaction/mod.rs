//! Everything to do with expense transactions: the data model, the local
//! store with its live view, and the pages and endpoints for recording and
//! deleting expenses.

mod analyze_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod new_expense_page;
mod store;

pub use analyze_endpoint::analyze_endpoint;
pub use core::{
    Transaction, TransactionId, UNASSIGNED_ID, all_transactions, clear_transactions,
    create_transaction_table, delete_transaction, insert_transaction, map_transaction_row,
    set_remote_id, validate_amount,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use new_expense_page::get_new_expense_page;
pub use store::LocalStore;
