//! Defines the error types for the three failure domains: local storage,
//! remote mirroring and AI extraction.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::view_templates::{error_alert, render};

/// The errors that may occur while reading or writing the local transaction
/// store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StorageError {
    /// The amount was not a finite, strictly positive number.
    ///
    /// Amounts record the magnitude of an outflow, so zero, negative, NaN and
    /// infinite values are rejected before they reach the database.
    #[error("{0} is not a valid expense amount")]
    InvalidAmount(f64),

    /// The requested transaction could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the transaction could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                StorageError::SqlError(error)
            }
        }
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        match self {
            StorageError::InvalidAmount(amount) => render(
                StatusCode::BAD_REQUEST,
                error_alert(
                    "Invalid amount",
                    &format!("{amount} is not a valid expense amount. Enter an amount greater than zero."),
                ),
            ),
            StorageError::NotFound => render(
                StatusCode::NOT_FOUND,
                error_alert("Not found", "The transaction could not be found."),
            ),
            // SQL errors are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_alert(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        }
    }
}

/// The errors that may occur while mirroring a local write or delete to the
/// remote document store.
///
/// Mirror errors are always non-fatal: they are logged by the detached task
/// that performed the call and never undo the local operation that triggered
/// it.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The HTTP request could not be sent or the response body could not be
    /// read.
    #[error("mirror request failed: {0}")]
    Http(String),

    /// The remote store answered with a non-success status.
    #[error("mirror request rejected: {0}")]
    Api(String),

    /// The remote store's response did not contain the expected document
    /// name.
    #[error("mirror response missing document name: {0}")]
    MissingDocumentName(String),
}

/// The errors that may occur while converting free text into a structured
/// expense.
///
/// These are surfaced to the user as a prompt to fill in the expense form
/// manually and are never fatal.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExtractionError {
    /// The model returned no text at all.
    #[error("the model returned an empty response")]
    EmptyResponse,

    /// No `{`/`}` pair was found in the response text.
    #[error("could not find a JSON object in the model response")]
    MissingJson,

    /// The substring between the outermost braces was not a valid expense
    /// object.
    #[error("could not decode the model response: {0}")]
    InvalidJson(String),

    /// The HTTP request could not be sent or the response body could not be
    /// read.
    #[error("request to the model failed: {0}")]
    Http(String),

    /// The generation endpoint answered with a non-success status.
    #[error("the model rejected the request: {0}")]
    Api(String),
}
