use scribble_core::{Stroke, StrokeRow};

use crate::config;

/// Stores a finished stroke. The insert notification that follows is what
/// other clients render.
pub async fn insert_stroke(stroke: &Stroke) -> Result<StrokeRow, reqwest::Error> {
    reqwest::Client::new()
        .post(config::strokes_url())
        .json(stroke)
        .send()
        .await?
        .error_for_status()?
        .json::<StrokeRow>()
        .await
}

/// Full stroke history, oldest first.
pub async fn fetch_history() -> Result<Vec<StrokeRow>, reqwest::Error> {
    reqwest::get(config::strokes_url())
        .await?
        .error_for_status()?
        .json::<Vec<StrokeRow>>()
        .await
}
