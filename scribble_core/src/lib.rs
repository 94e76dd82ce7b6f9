//! Shared pieces of the Scribble collaborative whiteboard.
//!
//! Everything here is runtime-free so that the same code drives the browser
//! front-end and is checked by the backend.

pub mod capture;
pub mod protocol;
pub mod stroke;
pub mod surface;
pub mod whiteboard;

pub use capture::StrokeCapture;
pub use protocol::{Broadcast, ClientFrame, DecodeError, RealtimeEvent, ServerFrame};
pub use stroke::{Point, Stroke, StrokeError, StrokeRow, StrokeStyle, SurfaceRect};
pub use surface::{Polyline, Scene, Surface};
pub use whiteboard::Whiteboard;
