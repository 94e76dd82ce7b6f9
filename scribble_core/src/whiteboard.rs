use crate::capture::StrokeCapture;
use crate::protocol::{Broadcast, ClientFrame, RealtimeEvent};
use crate::stroke::{Point, Stroke, StrokeStyle, clamp_width};
use crate::surface::Surface;

/// Local state of one whiteboard: the surface, the selected style and the
/// stroke being captured.
///
/// The controller never talks to the network itself. Pointer release hands
/// back the finalized stroke to submit, and `clear` hands back the frame to
/// broadcast; the caller owns the transport.
#[derive(Debug, Default)]
pub struct Whiteboard<S> {
    surface: S,
    style: StrokeStyle,
    capture: StrokeCapture,
}

impl<S: Surface> Whiteboard<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            style: StrokeStyle::default(),
            capture: StrokeCapture::Idle,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Applies to the next stroke; a stroke in progress keeps its color.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = color.into();
    }

    pub fn set_width(&mut self, width: u32) {
        self.style.width = f64::from(clamp_width(width));
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.capture.begin(at, self.style.clone());
        self.surface.begin_stroke();
    }

    pub fn pointer_move(&mut self, to: Point) {
        if let Some((from, to, style)) = self.capture.extend(to) {
            self.surface.draw_segment(from, to, style);
        }
    }

    /// Ends the stroke. Returns it when it should be submitted to the store.
    pub fn pointer_up(&mut self) -> Option<Stroke> {
        self.capture.finish()
    }

    /// Leaving the surface ends the stroke exactly like a release.
    pub fn pointer_leave(&mut self) -> Option<Stroke> {
        self.pointer_up()
    }

    /// Renders a notification. Inserts are drawn unconditionally, including
    /// echoes of strokes this board already drew while capturing.
    pub fn apply(&mut self, event: RealtimeEvent) {
        match event {
            RealtimeEvent::Insert(stroke) => self.surface.draw_stroke(&stroke),
            RealtimeEvent::Clear => self.surface.clear(),
        }
    }

    /// Draws stored history, oldest first.
    pub fn replay<I>(&mut self, strokes: I)
    where
        I: IntoIterator<Item = Stroke>,
    {
        for stroke in strokes {
            if stroke.validate().is_ok() {
                self.surface.draw_stroke(&stroke);
            }
        }
    }

    /// Blanks the local surface and returns the broadcast that tells every
    /// other client to do the same. Stored strokes are untouched.
    pub fn clear(&mut self) -> ClientFrame {
        self.surface.clear();
        ClientFrame::Broadcast(Broadcast::clear())
    }
}
