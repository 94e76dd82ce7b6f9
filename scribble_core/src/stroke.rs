use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest line width the controls allow.
pub const MIN_LINE_WIDTH: u32 = 1;
/// Largest line width the controls allow.
pub const MAX_LINE_WIDTH: u32 = 20;
/// A stroke needs at least this many points to produce a visible segment.
pub const MIN_STROKE_POINTS: usize = 2;

// A single pixel coordinate relative to the drawing surface's top-left corner.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Top-left corner of the drawing surface in viewport (client) coordinates.
///
/// Mouse and touch events report client coordinates; subtracting the surface
/// origin yields the surface-relative point that gets buffered.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn to_local(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// Color and width applied to a stroke.
#[derive(Clone, PartialEq, Debug)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: impl Into<String>, width: u32) -> Self {
        Self {
            color: color.into(),
            width: f64::from(clamp_width(width)),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new("#000000", 2)
    }
}

/// Clamps a slider value into the supported line width range.
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
}

/// Reasons a stroke is refused by the store or by a subscriber.
#[derive(Debug, Error, PartialEq)]
pub enum StrokeError {
    #[error("stroke has {0} point(s), at least {min} are required", min = MIN_STROKE_POINTS)]
    TooFewPoints(usize),
    #[error("stroke contains a non-finite coordinate")]
    NonFiniteCoordinate,
    #[error("line width must be a positive number, got {0}")]
    InvalidWidth(f64),
    #[error("stroke color is empty")]
    EmptyColor,
}

/// One complete freehand line. The order of `path` is the draw order.
///
/// Field names follow the stored row layout (`path`, `color`, `linewidth`).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Stroke {
    pub path: Vec<Point>,
    pub color: String,
    pub linewidth: f64,
}

impl Stroke {
    pub fn new(path: Vec<Point>, style: &StrokeStyle) -> Self {
        Self {
            path,
            color: style.color.clone(),
            linewidth: style.width,
        }
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color.clone(),
            width: self.linewidth,
        }
    }

    pub fn validate(&self) -> Result<(), StrokeError> {
        if self.path.len() < MIN_STROKE_POINTS {
            return Err(StrokeError::TooFewPoints(self.path.len()));
        }
        if !self.path.iter().all(Point::is_finite) {
            return Err(StrokeError::NonFiniteCoordinate);
        }
        if !self.linewidth.is_finite() || self.linewidth <= 0.0 {
            return Err(StrokeError::InvalidWidth(self.linewidth));
        }
        if self.color.trim().is_empty() {
            return Err(StrokeError::EmptyColor);
        }
        Ok(())
    }
}

/// A stroke as stored by the backend, with its store-assigned id.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct StrokeRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stroke: Stroke,
}
