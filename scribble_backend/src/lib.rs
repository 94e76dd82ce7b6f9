//! Realtime stroke store: a REST table of strokes, a change feed of inserts
//! and per-channel ad-hoc broadcasts, all over one axum router.

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod handlers;
pub mod realtime;
pub mod store;

pub use config::Config;
pub use realtime::Realtime;
pub use store::{MemoryStore, RedisStore, StoreError, StrokeStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StrokeStore>,
    pub realtime: Arc<Realtime>,
}

impl AppState {
    pub fn new(store: Arc<dyn StrokeStore>, room_capacity: usize) -> Self {
        Self {
            store,
            realtime: Arc::new(Realtime::new(room_capacity)),
        }
    }
}

/// Builds the full router for `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/rest/v1/strokes",
            get(handlers::list_strokes).post(handlers::insert_stroke),
        )
        .route("/realtime/v1/{channel}", get(realtime::websocket_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
