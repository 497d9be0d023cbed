//! REST API over a live dashboard session.
//!
//! Read endpoints:
//! - `GET /view`: committed view with summaries and treemap
//! - `GET /regions`: selectable regions, national first
//! - `GET /years`: available years, newest first
//!
//! Write endpoints:
//! - `POST /selection`: change region and/or year (fetches)
//! - `POST /clean`: toggle a subset's clean classification (no fetch)
//! - `POST /display`: change unit and/or capacity scenario (no fetch)

mod handlers;
mod types;

pub use types::{
    CleanRequest, CleanResponse, DisplayRequest, ErrorResponse, SelectionRequest,
    SelectionResponse, ViewResponse,
};

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::mix::Dashboard;
use crate::source::{GenerationFetcher, ImportExportFetcher};

/// Application state shared across all request handlers.
///
/// The dashboard does its own locking, so the state itself is only ever
/// borrowed immutably.
pub struct AppState<S> {
    pub dashboard: Dashboard<S>,
    /// Label for the capacity data block (e.g. `"2021, 2023"`).
    pub capacity_years: String,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    Router::new()
        .route("/view", get(handlers::get_view::<S>))
        .route("/regions", get(handlers::get_regions::<S>))
        .route("/years", get(handlers::get_years::<S>))
        .route("/selection", post(handlers::post_selection::<S>))
        .route("/clean", post(handlers::post_clean::<S>))
        .route("/display", post(handlers::post_display::<S>))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve<S>(state: Arc<AppState<S>>, addr: SocketAddr) -> io::Result<()>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
