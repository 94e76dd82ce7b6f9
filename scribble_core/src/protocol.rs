//! Realtime wire format.
//!
//! Server frames are JSON objects tagged by `type`:
//!
//! ```json
//! {"type":"insert","table":"strokes","record":{"id":1,"created_at":"...","path":[...],"color":"#000","linewidth":2}}
//! {"type":"broadcast","event":"clear","payload":{}}
//! ```
//!
//! Clients only ever send `broadcast` frames; inserts go through the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::stroke::{Stroke, StrokeError, StrokeRow};

/// Table the change feed reports inserts for.
pub const STROKES_TABLE: &str = "strokes";
/// Broadcast event name that asks every client to blank its surface.
pub const CLEAR_EVENT: &str = "clear";

/// An ad-hoc named event relayed between clients of one channel. Never stored.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Broadcast {
    pub event: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Broadcast {
    pub fn clear() -> Self {
        Self {
            event: CLEAR_EVENT.to_string(),
            payload: empty_payload(),
        }
    }
}

/// Frames a client sends over the channel socket.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Broadcast(Broadcast),
}

/// Frames the server pushes to subscribers.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Insert { table: String, record: StrokeRow },
    Broadcast(Broadcast),
}

impl ServerFrame {
    pub fn insert(record: StrokeRow) -> Self {
        ServerFrame::Insert {
            table: STROKES_TABLE.to_string(),
            record,
        }
    }
}

/// Why an incoming frame was not turned into a [`RealtimeEvent`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("insert for unknown table `{0}`")]
    UnknownTable(String),
    #[error("unknown broadcast event `{0}`")]
    UnknownEvent(String),
    #[error("invalid stroke: {0}")]
    InvalidStroke(#[from] StrokeError),
}

/// The only two things a whiteboard reacts to.
#[derive(Clone, PartialEq, Debug)]
pub enum RealtimeEvent {
    Insert(Stroke),
    Clear,
}

impl RealtimeEvent {
    /// Parses and validates a raw text frame.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let frame: ServerFrame = serde_json::from_str(text)?;
        Self::try_from(frame)
    }
}

impl TryFrom<ServerFrame> for RealtimeEvent {
    type Error = DecodeError;

    fn try_from(frame: ServerFrame) -> Result<Self, Self::Error> {
        match frame {
            ServerFrame::Insert { table, record } => {
                if table != STROKES_TABLE {
                    return Err(DecodeError::UnknownTable(table));
                }
                record.stroke.validate()?;
                Ok(RealtimeEvent::Insert(record.stroke))
            }
            ServerFrame::Broadcast(b) if b.event == CLEAR_EVENT => Ok(RealtimeEvent::Clear),
            ServerFrame::Broadcast(b) => Err(DecodeError::UnknownEvent(b.event)),
        }
    }
}
