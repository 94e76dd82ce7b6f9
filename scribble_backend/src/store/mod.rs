//! Stroke persistence.

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use futures_util::future::BoxFuture;
use scribble_core::{Stroke, StrokeRow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("corrupt row: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only table of strokes. Rows are never updated or deleted.
pub trait StrokeStore: Send + Sync {
    /// Stores a validated stroke and returns the row with its assigned id.
    fn insert(&self, stroke: Stroke) -> BoxFuture<'_, StoreResult<StrokeRow>>;

    /// All rows, ordered by id.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StrokeRow>>>;
}
