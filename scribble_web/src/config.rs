// Build-time endpoints. Override with SCRIBBLE_API_URL / SCRIBBLE_WS_URL.
const API_BASE_URL: &str = match option_env!("SCRIBBLE_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:3000",
};
const WS_BASE_URL: &str = match option_env!("SCRIBBLE_WS_URL") {
    Some(url) => url,
    None => "ws://127.0.0.1:3000",
};

/// Channel used when the URL does not name one.
pub const DEFAULT_CHANNEL: &str = "whiteboard";

pub const SURFACE_WIDTH: u32 = 800;
pub const SURFACE_HEIGHT: u32 = 600;
/// DOM id of the drawing surface, used to read its bounding box.
pub const SURFACE_ID: &str = "whiteboard-surface";

pub fn strokes_url() -> String {
    format!("{}/rest/v1/strokes", API_BASE_URL)
}

pub fn channel_url(channel: &str) -> String {
    format!("{}/realtime/v1/{}", WS_BASE_URL, channel)
}
