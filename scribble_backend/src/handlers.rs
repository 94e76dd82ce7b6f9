use crate::{AppState, store::StoreError};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scribble_core::{Stroke, StrokeError, StrokeRow};
use tracing::debug;

// Errors a REST handler can end with.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    InvalidStroke(StrokeError),
}

// Converts an AppError into the HTTP response the client sees.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::InvalidStroke(e) => {
                debug!("Rejected stroke: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
        };
        (status, error_message).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}
impl From<StrokeError> for AppError {
    fn from(err: StrokeError) -> Self {
        AppError::InvalidStroke(err)
    }
}

/// Handler to insert a stroke row. Every subscriber gets an insert
/// notification once the row is stored.
pub async fn insert_stroke(
    State(state): State<AppState>,
    Json(stroke): Json<Stroke>,
) -> Result<(StatusCode, Json<StrokeRow>), AppError> {
    stroke.validate()?;

    let row = state.store.insert(stroke).await?;
    let subscribers = state.realtime.publish_insert(&row);

    debug!("Inserted stroke {} for {} subscriber(s)", row.id, subscribers);

    Ok((StatusCode::CREATED, Json(row)))
}

/// Handler to list the full stroke history, oldest first.
pub async fn list_strokes(
    State(state): State<AppState>,
) -> Result<Json<Vec<StrokeRow>>, AppError> {
    let rows = state.store.list().await?;
    Ok(Json(rows))
}

pub async fn health() -> &'static str {
    "ok"
}
