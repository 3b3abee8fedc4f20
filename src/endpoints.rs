//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g. '/api/transactions/{id}', use
//! [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page: totals, category breakdown and the transaction list.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for recording a new expense, manually or with the AI helper.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";

/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a single transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route that turns free text into a pre-filled expense form.
pub const ANALYZE_API: &str = "/api/analyze";

/// Replace the `{parameter}` in `endpoint_path` with `id`.
///
/// Assumes the path contains at most one parameter; with none, the path is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{id}{}",
        &endpoint_path[..start],
        &endpoint_path[end..]
    )
}
