//! HTTP layer — axum routes over the shared [`EventStore`].
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /events` | one page of matching raw records ([`EventPage`]) |
//! | `GET /meta` | distinct types and districts ([`MetaListing`]) |
//! | `GET /healthz` | record count and working-set generation |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use evq_core::{EventPage, EventStore, MetaListing, QueryParams};
use serde::Serialize;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
}

pub fn router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/events", get(events))
        .route("/meta", get(meta))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Pairs are extracted raw so that a repeated key joins its values instead of
/// rejecting the request.
async fn events(
    State(st): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<EventPage> {
    let params: QueryParams = pairs.into_iter().collect();
    let page = st.store.query(&params);
    tracing::debug!(
        q = %params.q,
        total = page.total,
        returned = page.results.len(),
        "GET /events"
    );
    Json(page)
}

async fn meta(State(st): State<AppState>) -> Json<MetaListing> {
    Json(st.store.meta())
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub events: usize,
    pub generation: u64,
}

async fn healthz(State(st): State<AppState>) -> Json<Health> {
    let snapshot = st.store.snapshot();
    Json(Health {
        status: "ok",
        events: snapshot.len(),
        generation: snapshot.generation(),
    })
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(addr: &str, store: Arc<EventStore>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server running");
    axum::serve(listener, router(AppState { store }))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
