// The prelude brings all the essential Dioxus items into scope.
use dioxus::prelude::*;
use dioxus_router::prelude::*;

mod api;
mod config;
mod realtime;
mod whiteboard;

use whiteboard::Whiteboard;

#[derive(Routable, Clone, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/c/:channel")]
    Channel { channel: String },
}

/// The main application component that sets up the router.
#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        main {
            class: "min-h-screen bg-gradient-to-br from-slate-900 via-slate-800 to-blue-900 p-8",
            Router::<Route> {}
        }
    }
}

#[component]
fn Home() -> Element {
    rsx! {
        Channel { channel: config::DEFAULT_CHANNEL.to_string() }
    }
}

#[component]
fn Channel(channel: String) -> Element {
    rsx! {
        div { class: "max-w-fit mx-auto",
            h1 {
                class: "text-4xl font-bold bg-gradient-to-r from-white via-blue-400 to-orange-400 bg-clip-text text-transparent mb-6",
                "Scribble"
            }
            // Keyed so switching channels remounts and resubscribes.
            Whiteboard { key: "{channel}", channel: channel.clone() }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    launch(App);
}
