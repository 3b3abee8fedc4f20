//! Defines the endpoint for recording a new expense.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    category::Category,
    endpoints,
    service::ExpenseService,
    transaction::{Transaction, validate_amount},
    view_templates::{error_alert, render},
};

/// The form data for recording an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// Text detailing the expense.
    pub description: String,
    /// The amount of money spent, in dollars.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category: Category,
}

/// A route handler for recording a new expense; redirects to the dashboard
/// on success.
///
/// Validation happens here, before a [Transaction] is ever constructed: the
/// description must be non-empty and the amount a positive number. The
/// remote mirror runs after the response is sent and cannot fail the
/// request.
pub async fn create_transaction_endpoint(
    State(service): State<ExpenseService>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let description = form.description.trim();
    if description.is_empty() {
        return render(
            StatusCode::BAD_REQUEST,
            error_alert("Missing description", "Enter a description for the expense."),
        );
    }

    if let Err(error) = validate_amount(form.amount) {
        return error.into_response();
    }

    match service.add_transaction(Transaction::new(description, form.amount, form.category)) {
        Ok(_) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
