//! Defines the endpoint for deleting an expense.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{service::ExpenseService, transaction::TransactionId};

/// A route handler for deleting a transaction.
///
/// Responds with an empty fragment so htmx removes the table row. Deleting a
/// transaction that is already gone is treated as success: the row the user
/// wanted gone is gone.
pub async fn delete_transaction_endpoint(
    State(service): State<ExpenseService>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let transaction = service
        .all()
        .into_iter()
        .find(|transaction| transaction.id == transaction_id);

    let Some(transaction) = transaction else {
        tracing::debug!("transaction {transaction_id} was already deleted");
        return Html("").into_response();
    };

    match service.remove_transaction(transaction) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Html("").into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
