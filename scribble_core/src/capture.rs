//! Pointer capture for a single in-progress stroke.
//!
//! The buffer is private to the local session; nothing here touches the
//! network. A finished path only leaves the machine through [`StrokeCapture::finish`].

use crate::stroke::{MIN_STROKE_POINTS, Point, Stroke, StrokeStyle};

/// Idle until the pointer goes down, Capturing until it is released or
/// leaves the surface.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeCapture {
    #[default]
    Idle,
    Capturing {
        path: Vec<Point>,
        style: StrokeStyle,
    },
}

impl StrokeCapture {
    pub fn is_capturing(&self) -> bool {
        matches!(self, StrokeCapture::Capturing { .. })
    }

    /// Starts a fresh buffer at `start`. Any buffer already in progress is
    /// dropped without being finalized.
    pub fn begin(&mut self, start: Point, style: StrokeStyle) {
        *self = StrokeCapture::Capturing {
            path: vec![start],
            style,
        };
    }

    /// Appends `point` and returns the segment that should be drawn for it.
    /// Returns `None` while idle.
    pub fn extend(&mut self, point: Point) -> Option<(Point, Point, &StrokeStyle)> {
        match self {
            StrokeCapture::Idle => None,
            StrokeCapture::Capturing { path, style } => {
                let previous = *path.last()?;
                path.push(point);
                Some((previous, point, &*style))
            }
        }
    }

    /// Returns to Idle. Yields the finalized stroke when the buffer holds
    /// enough points to be visible.
    pub fn finish(&mut self) -> Option<Stroke> {
        match std::mem::take(self) {
            StrokeCapture::Capturing { path, style } if path.len() >= MIN_STROKE_POINTS => {
                Some(Stroke::new(path, &style))
            }
            _ => None,
        }
    }

    pub fn path(&self) -> &[Point] {
        match self {
            StrokeCapture::Idle => &[],
            StrokeCapture::Capturing { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_while_idle_is_ignored() {
        let mut capture = StrokeCapture::default();
        assert!(capture.extend(Point::new(1.0, 1.0)).is_none());
        assert!(!capture.is_capturing());
    }

    #[test]
    fn extend_reports_segment_from_previous_point() {
        let mut capture = StrokeCapture::default();
        capture.begin(Point::new(10.0, 10.0), StrokeStyle::default());

        let (from, to, _) = capture.extend(Point::new(20.0, 10.0)).expect("capturing");
        assert_eq!(from, Point::new(10.0, 10.0));
        assert_eq!(to, Point::new(20.0, 10.0));

        let (from, to, _) = capture.extend(Point::new(20.0, 20.0)).expect("capturing");
        assert_eq!(from, Point::new(20.0, 10.0));
        assert_eq!(to, Point::new(20.0, 20.0));
    }

    #[test]
    fn finish_clears_buffer_either_way() {
        let mut capture = StrokeCapture::default();
        capture.begin(Point::new(5.0, 5.0), StrokeStyle::default());
        assert!(capture.finish().is_none());
        assert_eq!(capture, StrokeCapture::Idle);

        capture.begin(Point::new(0.0, 0.0), StrokeStyle::default());
        capture.extend(Point::new(1.0, 0.0));
        assert!(capture.finish().is_some());
        assert!(capture.path().is_empty());
        assert!(capture.finish().is_none());
    }

    #[test]
    fn begin_restarts_an_open_buffer() {
        let mut capture = StrokeCapture::default();
        capture.begin(Point::new(0.0, 0.0), StrokeStyle::default());
        capture.extend(Point::new(1.0, 1.0));
        capture.begin(Point::new(9.0, 9.0), StrokeStyle::default());
        assert_eq!(capture.path(), &[Point::new(9.0, 9.0)]);
    }
}
