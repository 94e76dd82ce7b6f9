use std::fmt::Write as _;

use crate::stroke::{Point, Stroke, StrokeStyle};

/// Something strokes can be drawn onto.
///
/// Implementations are mutated only from the UI thread, so no `Send` bound.
pub trait Surface {
    /// Marks the start of a live stroke. Later segments must not join
    /// anything drawn before this call.
    fn begin_stroke(&mut self) {}

    /// Draws one straight segment.
    fn draw_segment(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Wipes everything drawn so far.
    fn clear(&mut self);

    /// Draws a whole stroke, segment by segment in path order.
    fn draw_stroke(&mut self, stroke: &Stroke) {
        let style = stroke.style();
        for pair in stroke.path.windows(2) {
            self.draw_segment(pair[0], pair[1], &style);
        }
    }
}

/// A styled polyline kept by [`Scene`].
#[derive(Clone, PartialEq, Debug)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub style: StrokeStyle,
}

impl Polyline {
    /// SVG path data (`M x y L x y ...`).
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                d.push(' ');
            }
            let _ = write!(d, "{} {} {}", cmd, p.x, p.y);
        }
        d
    }
}

/// Retained-mode surface: remembers every polyline until cleared.
///
/// Segments of the same live stroke that continue the last polyline with the
/// same style are merged into it, so a stroke drawn live ends up as one
/// polyline. `begin_stroke`, `draw_stroke` and `clear` close the last
/// polyline; nothing merges into it after that.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    polylines: Vec<Polyline>,
    open: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn is_blank(&self) -> bool {
        self.polylines.is_empty()
    }
}

impl Surface for Scene {
    fn begin_stroke(&mut self) {
        self.open = false;
    }

    fn draw_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        if self.open {
            if let Some(last) = self.polylines.last_mut() {
                if last.style == *style && last.points.last() == Some(&from) {
                    last.points.push(to);
                    return;
                }
            }
        }
        self.polylines.push(Polyline {
            points: vec![from, to],
            style: style.clone(),
        });
        self.open = true;
    }

    fn clear(&mut self) {
        self.polylines.clear();
        self.open = false;
    }

    fn draw_stroke(&mut self, stroke: &Stroke) {
        if stroke.path.len() < 2 {
            return;
        }
        self.polylines.push(Polyline {
            points: stroke.path.clone(),
            style: stroke.style(),
        });
        self.open = false;
    }
}
