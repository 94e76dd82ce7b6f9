use futures_util::{SinkExt, StreamExt};
use scribble_backend::{AppState, MemoryStore, app};
use scribble_core::{
    ClientFrame, Point, RealtimeEvent, Scene, Stroke, StrokeRow, StrokeStyle, Whiteboard,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    net::{TcpListener, TcpStream},
    time::{Duration, timeout},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let state = AppState::new(Arc::new(MemoryStore::new()), 16);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("serve");
    });
    addr
}

async fn subscribe(addr: SocketAddr, channel: &str) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/realtime/v1/{channel}"))
        .await
        .expect("websocket connect");
    socket
}

async fn next_event(socket: &mut Socket) -> RealtimeEvent {
    loop {
        let msg = timeout(Duration::from_millis(500), socket.next())
            .await
            .expect("notification timed out")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = msg {
            return RealtimeEvent::decode(text.as_str()).expect("valid frame");
        }
    }
}

async fn assert_silent(socket: &mut Socket) {
    assert!(
        timeout(Duration::from_millis(100), socket.next()).await.is_err(),
        "expected no frame"
    );
}

async fn send_frame(socket: &mut Socket, frame: &ClientFrame) {
    let text = serde_json::to_string(frame).expect("encode");
    socket.send(Message::Text(text.into())).await.expect("send");
}

fn sample_stroke() -> Stroke {
    Stroke::new(
        vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
        ],
        &StrokeStyle::new("#ff8800", 6),
    )
}

async fn insert(addr: SocketAddr, stroke: &Stroke) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/rest/v1/strokes"))
        .json(stroke)
        .send()
        .await
        .expect("insert request")
}

async fn history(addr: SocketAddr) -> Vec<StrokeRow> {
    reqwest::get(format!("http://{addr}/rest/v1/strokes"))
        .await
        .expect("list request")
        .json()
        .await
        .expect("list body")
}

#[tokio::test]
async fn insert_notifies_every_subscriber_including_author() {
    let addr = spawn_server().await;
    let mut author = subscribe(addr, "whiteboard").await;
    let mut peer = subscribe(addr, "whiteboard").await;

    let stroke = sample_stroke();
    let resp = insert(addr, &stroke).await;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let row: StrokeRow = resp.json().await.expect("row");
    assert_eq!(row.id, 1);
    assert_eq!(row.stroke, stroke);

    assert_eq!(next_event(&mut peer).await, RealtimeEvent::Insert(stroke.clone()));
    assert_eq!(next_event(&mut author).await, RealtimeEvent::Insert(stroke));
}

#[tokio::test]
async fn peer_renders_the_stroke_another_client_drew() {
    let addr = spawn_server().await;
    let mut peer_socket = subscribe(addr, "whiteboard").await;

    let mut author = Whiteboard::new(Scene::new());
    author.set_color("#336699");
    author.set_width(4);
    author.pointer_down(Point::new(1.0, 1.0));
    author.pointer_move(Point::new(5.0, 1.0));
    author.pointer_move(Point::new(5.0, 8.0));
    let stroke = author.pointer_up().expect("stroke");
    insert(addr, &stroke).await;

    let mut peer = Whiteboard::new(Scene::new());
    peer.apply(next_event(&mut peer_socket).await);

    let lines = peer.surface().polylines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points, stroke.path);
    assert_eq!(lines[0].style, stroke.style());
}

#[tokio::test]
async fn invalid_stroke_is_neither_stored_nor_announced() {
    let addr = spawn_server().await;
    let mut socket = subscribe(addr, "whiteboard").await;

    let dot = Stroke::new(vec![Point::new(5.0, 5.0)], &StrokeStyle::default());
    let resp = insert(addr, &dot).await;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    assert_silent(&mut socket).await;
    assert!(history(addr).await.is_empty());
}

#[tokio::test]
async fn clear_reaches_others_but_keeps_history() {
    let addr = spawn_server().await;
    let mut a = subscribe(addr, "whiteboard").await;
    let mut b = subscribe(addr, "whiteboard").await;

    insert(addr, &sample_stroke()).await;
    next_event(&mut a).await;
    next_event(&mut b).await;

    let mut board = Whiteboard::new(Scene::new());
    let frame = board.clear();
    send_frame(&mut a, &frame).await;

    assert_eq!(next_event(&mut b).await, RealtimeEvent::Clear);
    assert_silent(&mut a).await;

    let rows = history(addr).await;
    assert_eq!(rows.len(), 1);

    // A client joining after the clear still replays the stored stroke.
    let mut late = Whiteboard::new(Scene::new());
    late.replay(rows.into_iter().map(|row| row.stroke));
    assert_eq!(late.surface().polylines().len(), 1);
}

#[tokio::test]
async fn broadcasts_stay_inside_their_channel() {
    let addr = spawn_server().await;
    let mut sender = subscribe(addr, "one").await;
    let mut same = subscribe(addr, "one").await;
    let mut other = subscribe(addr, "two").await;

    send_frame(&mut sender, &Whiteboard::new(Scene::new()).clear()).await;
    assert_eq!(next_event(&mut same).await, RealtimeEvent::Clear);
    assert_silent(&mut other).await;

    // Inserts are table-wide.
    insert(addr, &sample_stroke()).await;
    assert!(matches!(next_event(&mut other).await, RealtimeEvent::Insert(_)));
}

#[tokio::test]
async fn malformed_frames_do_not_drop_the_connection() {
    let addr = spawn_server().await;
    let mut a = subscribe(addr, "whiteboard").await;
    let mut b = subscribe(addr, "whiteboard").await;

    a.send(Message::Text("{not json".into())).await.expect("send");
    assert_silent(&mut b).await;

    send_frame(&mut a, &Whiteboard::new(Scene::new()).clear()).await;
    assert_eq!(next_event(&mut b).await, RealtimeEvent::Clear);
}

#[tokio::test]
async fn history_is_ordered_by_id() {
    let addr = spawn_server().await;
    for x in [1.0, 2.0, 3.0] {
        let stroke = Stroke::new(
            vec![Point::new(x, 0.0), Point::new(x, 10.0)],
            &StrokeStyle::default(),
        );
        insert(addr, &stroke).await;
    }

    let rows = history(addr).await;
    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[2].stroke.path[0], Point::new(3.0, 0.0));
}

#[tokio::test]
async fn health_reports_ok() {
    let addr = spawn_server().await;
    let res = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health request");
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.text().await.expect("body"), "ok");
}
