use std::{env, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use outlay::{
    AppState, DisabledMirror, ExpenseAnalyzer, FirestoreMirror, Identity, TransactionMirror,
    build_router, graceful_shutdown,
};

/// The web server for outlay.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The anonymous user handle that namespaces documents in the remote
    /// mirror. Without it, remote mirroring is disabled.
    #[arg(long)]
    identity: Option<String>,

    /// The text-generation model used by the AI helper.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        tracing::warn!(
            "GEMINI_API_KEY is not set, the AI helper will fail and fall back to manual entry"
        );
        String::new()
    });

    let mut analyzer = ExpenseAnalyzer::new(&gemini_api_key);
    if let Some(model) = &args.model {
        analyzer = analyzer.with_model(model);
    }

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let state = AppState::new(conn, build_mirror(args.identity.as_deref()), analyzer)
        .expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("Server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

/// Wire up the remote mirror from the CLI identity and the `FIRESTORE_PROJECT`
/// and `FIRESTORE_API_KEY` environment variables.
///
/// Without a project there is nothing to talk to and mirroring is disabled
/// outright; without an identity the configured mirror no-ops on every call.
fn build_mirror(identity: Option<&str>) -> Arc<dyn TransactionMirror> {
    let project = match env::var("FIRESTORE_PROJECT") {
        Ok(project) => project,
        Err(_) => {
            tracing::info!("FIRESTORE_PROJECT is not set, remote mirroring is disabled");
            return Arc::new(DisabledMirror);
        }
    };

    let identity = identity.and_then(Identity::new);
    if identity.is_none() {
        tracing::info!("no identity configured, remote mirroring will no-op");
    }

    let mut mirror = FirestoreMirror::new(&project, identity);
    if let Ok(api_key) = env::var("FIRESTORE_API_KEY") {
        mirror = mirror.with_api_key(&api_key);
    }

    Arc::new(mirror)
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().with_filter(filter))
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let method = req.method();
        let uri = req.uri();

        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str());

        tracing::debug_span!("request", %method, %uri, matched_path)
    });

    router.layer(tracing_layer)
}
