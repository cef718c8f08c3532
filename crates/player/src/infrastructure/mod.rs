//! Infrastructure adapters: event routing and the WebSocket transport

pub mod messaging;
pub mod websocket;

pub use messaging::{ConnectionState, EventRouter, Subscription};
