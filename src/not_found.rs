//! The 404 page.

use axum::{http::StatusCode, response::Response};

use crate::view_templates::{error_view, render};

/// A route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    render(
        StatusCode::NOT_FOUND,
        error_view(
            "Page Not Found",
            "404",
            "That page does not exist.",
            "Check the address, or head back to the dashboard.",
        ),
    )
}
