use clap::Parser;
use deadpool_redis::Runtime;
use scribble_backend::{AppState, Config, MemoryStore, RedisStore, StrokeStore, app};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribble_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    // --- Store Setup ---
    let store: Arc<dyn StrokeStore> = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
            info!("Connected to Redis and created connection pool.");
            Arc::new(RedisStore::new(pool))
        }
        None => {
            warn!("REDIS_URL not set, strokes are kept in memory only.");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.room_capacity);

    // --- Server Launch ---
    let listener = TcpListener::bind(config.bind).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
