use std::sync::RwLock;

use chrono::Utc;
use futures_util::future::BoxFuture;
use scribble_core::{Stroke, StrokeRow};

use super::{StoreResult, StrokeStore};

/// In-process table for local runs and tests. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StrokeRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StrokeStore for MemoryStore {
    fn insert(&self, stroke: Stroke) -> BoxFuture<'_, StoreResult<StrokeRow>> {
        Box::pin(async move {
            let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
            let id = rows.last().map_or(1, |row| row.id + 1);
            let row = StrokeRow {
                id,
                created_at: Utc::now(),
                stroke,
            };
            rows.push(row.clone());
            Ok(row)
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StrokeRow>>> {
        Box::pin(async move {
            let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
            Ok(rows.clone())
        })
    }
}
