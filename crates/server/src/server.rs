use axum::{
    Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{events, groups, people, settlement};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Build the API router on top of `engine`.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/api/groups", post(groups::group_new).get(groups::list))
        .route("/api/groups/{id}", get(groups::get))
        .route("/api/groups/{id}/people", post(people::person_new))
        .route("/api/groups/{id}/people/{person_id}", put(people::rename))
        .route(
            "/api/groups/{id}/events",
            post(events::event_new).get(events::list),
        )
        .route(
            "/api/groups/{id}/events/{event_id}/participants",
            post(events::participants_add),
        )
        .route("/api/groups/{id}/settle-debug", post(settlement::settle_debug))
        .route("/api/groups/{id}/settle", post(settlement::settle))
        .route("/api/groups/{id}/settlement", get(settlement::get))
        .route("/api/groups/{id}/reopen", post(settlement::reopen))
        .with_state(state)
}

pub async fn run(engine: Engine, bind: &str, port: u16) {
    let listener = match tokio::net::TcpListener::bind((bind, port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {bind}:{port}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
