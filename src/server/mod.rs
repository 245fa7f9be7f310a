use std::sync::Arc;

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::store::sqlite::SqliteLedger;

pub mod error;
pub mod handlers;
pub mod session;

pub use error::ApiError;
pub use session::SessionStore;

/// State shared across handlers. The ledger mutex serializes mutations, so a
/// purchase's read-validate-write can never interleave with another write to
/// the same balance.
pub struct AppContext {
    pub ledger: Mutex<SqliteLedger>,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn new(ledger: SqliteLedger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            sessions: SessionStore::new(),
        }
    }
}

/// Build the full request surface. Responses are uncacheable, matching the
/// polling clients' expectations.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/mine", post(handlers::mine))
        .route("/auto_mine", post(handlers::auto_mine))
        .route("/upgrade", post(handlers::upgrade))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
