//! FSF Player core.
//!
//! Client-side core for the game: turns the server's named-event stream into
//! a render-ready snapshot with a turn phase machine, and turns motion events
//! into timed animation descriptors between on-screen anchors.
//!
//! Multi-platform support is provided via compile-time `cfg` selection: the
//! socket adapter is tokio-tungstenite on native targets and `web_sys` on
//! wasm32. Everything above the adapter is single-threaded and
//! runtime-agnostic.

pub mod animation;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod session;
pub mod state;

pub use config::{ClientConfig, ConfigError};
pub use infrastructure::websocket::{GameSocket, JoinContext};
pub use session::GameSession;
pub use state::{ApplyOutcome, GameSnapshot, StateStore, ViewSignal};

/// Install panic and tracing hooks for the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_wasm_logging() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
