//! Outlay is a small web app for recording personal expenses.
//!
//! Expenses live in a local SQLite table exposed as a live,
//! replay-latest collection. Every local write is mirrored, best-effort and
//! fire-and-forget, into a per-user collection in a remote document store.
//! An AI helper turns free-text entries ("Dinner for $50") into pre-filled
//! expense forms via a single round trip to a hosted text-generation model.
//!
//! This library serves plain HTML pages over a REST-ish API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod extract;
mod mirror;
mod not_found;
mod routing;
mod service;
#[cfg(test)]
mod test_utils;
mod transaction;
mod view_templates;

pub use app_state::AppState;
pub use category::{CATEGORIES, Category};
pub use db::initialize as initialize_db;
pub use error::{ExtractionError, MirrorError, StorageError};
pub use extract::{ExpenseAnalysis, ExpenseAnalyzer};
pub use mirror::{DisabledMirror, FirestoreMirror, Identity, TransactionMirror};
pub use routing::build_router;
pub use service::ExpenseService;
pub use transaction::{LocalStore, Transaction, TransactionId};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`. Note that detached mirror tasks
/// that are still in flight at shutdown are not waited for; their writes may
/// or may not reach the remote store, which the mirroring contract already
/// allows.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
