use std::rc::Rc;

use dioxus::prelude::*;
use scribble_core::{Point, Scene, Stroke, SurfaceRect};

use crate::{api, config, realtime::Subscription};

type Board = scribble_core::Whiteboard<Scene>;

// Where the surface currently sits in the viewport.
fn surface_rect() -> SurfaceRect {
    web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(config::SURFACE_ID))
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            SurfaceRect::new(rect.left(), rect.top())
        })
        .unwrap_or_default()
}

fn mouse_point(data: &MouseData) -> Point {
    let client = data.client_coordinates();
    surface_rect().to_local(client.x, client.y)
}

fn touch_point(data: &TouchData) -> Option<Point> {
    let touch = data.touches().into_iter().next()?;
    let client = touch.client_coordinates();
    Some(surface_rect().to_local(client.x, client.y))
}

// Fire-and-forget: a failed insert is logged and the local drawing stays.
fn submit(stroke: Stroke) {
    spawn(async move {
        if let Err(e) = api::insert_stroke(&stroke).await {
            log::error!("Failed to save stroke: {}", e);
        }
    });
}

/// The collaborative drawing surface for one channel.
///
/// Give it a `key` per channel: the subscription is opened once per mount.
#[component]
pub fn Whiteboard(channel: String) -> Element {
    let mut board = use_signal(|| Board::new(Scene::new()));

    // Replay what was stored before this client joined.
    use_future(move || async move {
        match api::fetch_history().await {
            Ok(rows) => board.write().replay(rows.into_iter().map(|row| row.stroke)),
            Err(e) => log::error!("Failed to load stroke history: {}", e),
        }
    });

    // Owned for the lifetime of the component; dropped (and closed) on unmount.
    let subscription = use_hook(|| {
        let url = config::channel_url(&channel);
        match Subscription::open(&url, move |event| board.write().apply(event)) {
            Ok(sub) => Some(Rc::new(sub)),
            Err(e) => {
                log::error!("Failed to subscribe to {}: {}", url, e);
                None
            }
        }
    });

    let style = board.read().style().clone();
    let lines: Vec<(String, String, f64)> = board
        .read()
        .surface()
        .polylines()
        .iter()
        .map(|line| (line.to_svg_path(), line.style.color.clone(), line.style.width))
        .collect();
    let color = style.color;
    let width_value = style.width.to_string();
    let (surface_width, surface_height) = (config::SURFACE_WIDTH, config::SURFACE_HEIGHT);

    rsx! {
        div {
            class: "bg-slate-800/40 backdrop-blur-sm border border-slate-700/50 rounded-xl p-6",
            div { class: "flex items-center gap-6 mb-4",
                h2 { class: "text-xl font-bold text-white mr-auto", "# {channel}" }

                label { class: "flex items-center gap-2 text-slate-300",
                    "Color"
                    input {
                        r#type: "color",
                        value: "{color}",
                        oninput: move |evt| board.write().set_color(evt.value()),
                    }
                }

                label { class: "flex items-center gap-2 text-slate-300",
                    "Width"
                    input {
                        r#type: "range",
                        min: "1",
                        max: "20",
                        value: "{width_value}",
                        oninput: move |evt| {
                            if let Ok(width) = evt.value().parse::<u32>() {
                                board.write().set_width(width);
                            }
                        },
                    }
                    span { class: "w-6 text-right", "{width_value}" }
                }

                button {
                    class: "bg-orange-500 hover:bg-orange-600 text-slate-900 font-semibold px-4 py-2 rounded-lg",
                    onclick: move |_| {
                        let frame = board.write().clear();
                        if let Some(sub) = &subscription {
                            sub.send(&frame);
                        }
                    },
                    "Clear"
                }
            }

            svg {
                id: config::SURFACE_ID,
                class: "border border-gray-300 rounded-md bg-gray-50 touch-none",
                width: "{surface_width}",
                height: "{surface_height}",

                onmousedown: move |evt| {
                    evt.prevent_default();
                    board.write().pointer_down(mouse_point(&evt));
                },
                onmousemove: move |evt| {
                    if board.peek().is_capturing() {
                        board.write().pointer_move(mouse_point(&evt));
                    }
                },
                onmouseup: move |_| {
                    if board.peek().is_capturing() {
                        if let Some(stroke) = board.write().pointer_up() {
                            submit(stroke);
                        }
                    }
                },
                onmouseleave: move |_| {
                    if board.peek().is_capturing() {
                        if let Some(stroke) = board.write().pointer_leave() {
                            submit(stroke);
                        }
                    }
                },

                ontouchstart: move |evt| {
                    evt.prevent_default();
                    if let Some(point) = touch_point(&evt) {
                        board.write().pointer_down(point);
                    }
                },
                ontouchmove: move |evt| {
                    evt.prevent_default();
                    if let Some(point) = touch_point(&evt) {
                        board.write().pointer_move(point);
                    }
                },
                ontouchend: move |_| {
                    if let Some(stroke) = board.write().pointer_up() {
                        submit(stroke);
                    }
                },
                ontouchcancel: move |_| {
                    if let Some(stroke) = board.write().pointer_leave() {
                        submit(stroke);
                    }
                },

                for (i, (d, line_color, line_width)) in lines.into_iter().enumerate() {
                    path {
                        key: "{i}",
                        d: d,
                        stroke: line_color,
                        stroke_width: line_width,
                        fill: "none",
                        stroke_linecap: "round",
                        stroke_linejoin: "round"
                    }
                }
            }
        }
    }
}
