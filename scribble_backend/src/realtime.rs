use crate::AppState;
use axum::{
    extract::{
        Path, State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use nanoid::nanoid;
use scribble_core::{ClientFrame, ServerFrame, StrokeRow};
use std::collections::HashMap;
use tokio::sync::{
    Mutex,
    broadcast::{self, error::RecvError},
};
use tracing::{debug, info, warn};

/// A broadcast relayed inside one channel, tagged with the connection that
/// sent it so the sender is skipped.
#[derive(Debug, Clone)]
struct RoomMessage {
    origin: String,
    text: Utf8Bytes,
}

/// Fan-out state: one room per named channel for ad-hoc broadcasts and a
/// single table-wide feed of insert notifications.
#[derive(Debug)]
pub struct Realtime {
    rooms: Mutex<HashMap<String, broadcast::Sender<RoomMessage>>>,
    inserts: broadcast::Sender<Utf8Bytes>,
    capacity: usize,
}

impl Realtime {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rooms: Mutex::new(HashMap::new()),
            inserts: broadcast::channel(capacity).0,
            capacity,
        }
    }

    /// Pushes an insert notification to every socket. Returns how many
    /// subscribers were reached.
    pub fn publish_insert(&self, row: &StrokeRow) -> usize {
        let text = match serde_json::to_string(&ServerFrame::insert(row.clone())) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not encode insert notification: {}", e);
                return 0;
            }
        };
        // An error only means nobody is listening.
        self.inserts.send(text.into()).unwrap_or(0)
    }

    /// Number of channels with at least one open socket.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    // Subscribes under the lock so `leave` cannot drop the room in between.
    async fn join(
        &self,
        channel: &str,
    ) -> (broadcast::Sender<RoomMessage>, broadcast::Receiver<RoomMessage>) {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        (room.clone(), room.subscribe())
    }

    async fn leave(&self, channel: &str) {
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(channel)
            .is_some_and(|room| room.receiver_count() == 0)
        {
            rooms.remove(channel);
            debug!("Dropped empty channel {}", channel);
        }
    }
}

/// The entry point for channel subscriptions.
///
/// Receivers are created before the upgrade completes, so a client that has
/// finished the handshake cannot miss a notification published afterwards.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> impl IntoResponse {
    let (room, room_rx) = state.realtime.join(&channel).await;
    let subscription = Subscription {
        conn_id: nanoid!(10),
        room,
        room_rx,
        insert_rx: state.realtime.inserts.subscribe(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, channel, subscription))
}

struct Subscription {
    conn_id: String,
    room: broadcast::Sender<RoomMessage>,
    room_rx: broadcast::Receiver<RoomMessage>,
    insert_rx: broadcast::Receiver<Utf8Bytes>,
}

/// Next frame to forward to `origin`. Its own broadcasts are skipped, and a
/// lagging receiver drops what it missed and carries on. `None` once a feed
/// is closed.
async fn next_outgoing(
    origin: &str,
    insert_rx: &mut broadcast::Receiver<Utf8Bytes>,
    room_rx: &mut broadcast::Receiver<RoomMessage>,
) -> Option<Utf8Bytes> {
    loop {
        tokio::select! {
            msg = insert_rx.recv() => match msg {
                Ok(text) => return Some(text),
                Err(RecvError::Lagged(n)) => {
                    warn!("Connection {} skipped {} insert notification(s)", origin, n);
                }
                Err(RecvError::Closed) => return None,
            },
            msg = room_rx.recv() => match msg {
                Ok(msg) if msg.origin == origin => {}
                Ok(msg) => return Some(msg.text),
                Err(RecvError::Lagged(n)) => {
                    warn!("Connection {} skipped {} broadcast(s)", origin, n);
                }
                Err(RecvError::Closed) => return None,
            },
        }
    }
}

/// The main logic for a single subscribed socket.
async fn handle_socket(socket: WebSocket, state: AppState, channel: String, sub: Subscription) {
    let Subscription {
        conn_id,
        room,
        mut room_rx,
        mut insert_rx,
    } = sub;
    info!("Connection {} subscribed to channel {}", conn_id, channel);

    let (mut sender, mut receiver) = socket.split();

    // Task to forward notifications and other clients' broadcasts.
    let origin = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = next_outgoing(&origin, &mut insert_rx, &mut room_rx).await {
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Task to relay this client's broadcasts to the rest of the channel.
    let origin = conn_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            match serde_json::from_str::<ClientFrame>(text.as_str()) {
                Ok(ClientFrame::Broadcast(broadcast)) => {
                    debug!("Connection {} broadcast `{}`", origin, broadcast.event);
                    let text = match serde_json::to_string(&ServerFrame::Broadcast(broadcast)) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Could not encode broadcast: {}", e);
                            continue;
                        }
                    };
                    // No other subscribers is fine.
                    let _ = room.send(RoomMessage {
                        origin: origin.clone(),
                        text: text.into(),
                    });
                }
                Err(e) => warn!("Ignoring malformed frame from {}: {}", origin, e),
            }
        }
    });

    // Wait for either task to finish. If one does, the other should be aborted.
    // The aborted task is awaited so its receiver is gone before the room check.
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            let _ = send_task.await;
        }
    };
    state.realtime.leave(&channel).await;

    info!("Connection {} left channel {}", conn_id, channel);
}
