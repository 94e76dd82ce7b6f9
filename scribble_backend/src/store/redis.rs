use chrono::Utc;
use futures_util::future::BoxFuture;
use redis::AsyncCommands;
use scribble_core::{Stroke, StrokeRow};
use tracing::debug;

use super::{StoreResult, StrokeStore};

const SEQ_KEY: &str = "strokes:seq";
const ROWS_KEY: &str = "strokes:rows";

/// Redis-backed table. Ids come from `INCR`, rows are JSON appended to a list
/// and kept without expiry.
#[derive(Clone)]
pub struct RedisStore {
    pool: deadpool_redis::Pool,
}

impl RedisStore {
    pub fn new(pool: deadpool_redis::Pool) -> Self {
        Self { pool }
    }
}

impl StrokeStore for RedisStore {
    fn insert(&self, stroke: Stroke) -> BoxFuture<'_, StoreResult<StrokeRow>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;

            let id: i64 = conn.incr(SEQ_KEY, 1).await?;
            let row = StrokeRow {
                id,
                created_at: Utc::now(),
                stroke,
            };
            let row_json = serde_json::to_string(&row)?;
            let _: i64 = conn.rpush(ROWS_KEY, row_json).await?;

            debug!("Stored stroke {} ({} points)", row.id, row.stroke.path.len());
            Ok(row)
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StrokeRow>>> {
        Box::pin(async move {
            let mut conn = self.pool.get().await?;

            let raw: Vec<String> = conn.lrange(ROWS_KEY, 0, -1).await?;
            let mut rows = raw
                .iter()
                .map(|json| serde_json::from_str::<StrokeRow>(json))
                .collect::<Result<Vec<_>, _>>()?;
            // Concurrent inserts can append out of id order.
            rows.sort_by_key(|row| row.id);
            Ok(rows)
        })
    }
}
