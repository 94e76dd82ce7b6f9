use dioxus::prelude::spawn;
use futures::{
    channel::mpsc,
    future::{self, AbortHandle, Abortable},
    SinkExt, StreamExt,
};
use gloo_net::websocket::{futures::WebSocket, Message};
use scribble_core::{ClientFrame, RealtimeEvent};

/// An open channel subscription.
///
/// Holding the value keeps the socket alive; dropping it aborts both
/// directions and closes the socket. There is no reconnect.
pub struct Subscription {
    url: String,
    outgoing: mpsc::UnboundedSender<String>,
    abort: AbortHandle,
}

impl Subscription {
    /// Connects to `url` and calls `on_event` for every valid notification.
    /// Frames that fail validation are logged and dropped.
    pub fn open<F>(url: &str, mut on_event: F) -> Result<Self, String>
    where
        F: FnMut(RealtimeEvent) + 'static,
    {
        let socket = WebSocket::open(url).map_err(|e| e.to_string())?;
        let (mut write, mut read) = socket.split();
        let (outgoing, mut queued) = mpsc::unbounded::<String>();
        let (abort, registration) = AbortHandle::new_pair();

        // Incoming notifications
        let incoming = async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match RealtimeEvent::decode(&text) {
                        Ok(event) => on_event(event),
                        Err(e) => log::warn!("Dropping notification: {}", e),
                    },
                    Ok(Message::Bytes(_)) => log::warn!("Ignoring binary frame."),
                    Err(e) => {
                        log::error!("Realtime connection lost: {}", e);
                        break;
                    }
                }
            }
        };

        // Outgoing broadcasts
        let sending = async move {
            while let Some(text) = queued.next().await {
                if write.send(Message::Text(text)).await.is_err() {
                    log::error!("Realtime connection closed. Cannot send message.");
                    break;
                }
            }
        };

        spawn(async move {
            let pump = future::select(Box::pin(incoming), Box::pin(sending));
            let _ = Abortable::new(pump, registration).await;
        });

        log::debug!("Subscribed to {}", url);
        Ok(Self {
            url: url.to_string(),
            outgoing,
            abort,
        })
    }

    pub fn send(&self, frame: &ClientFrame) {
        let text = match serde_json::to_string(frame) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Could not encode frame: {}", e);
                return;
            }
        };
        if self.outgoing.unbounded_send(text).is_err() {
            log::error!("Subscription to {} is closed.", self.url);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort.abort();
        self.outgoing.close_channel();
        log::debug!("Unsubscribed from {}", self.url);
    }
}
