//! Event routing and connection state for the game socket.
//!
//! - `EventRouter`: named-event subscriptions with revocable handles
//! - `ConnectionState`: socket lifecycle, observable by views

pub mod connection;
pub mod event_router;

pub use connection::{ConnectionState, ConnectionStateObserver};
pub use event_router::{EventRouter, Subscription};
