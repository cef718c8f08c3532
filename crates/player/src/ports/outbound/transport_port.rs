//! Transport Port - Outbound port for the raw socket
//!
//! The game socket speaks named events; underneath it only needs something
//! that can push text frames and be closed. Desktop (tokio-tungstenite) and
//! WASM (web-sys) adapters implement this trait, tests use the mockall mock.

/// Low-level events produced by a transport adapter.
///
/// Adapters forward these over a channel; the game socket consumes them on the
/// thread that owns game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The underlying connection is open and can carry frames
    Opened,
    /// A text frame arrived
    Frame(String),
    /// The connection closed (by either side or on error)
    Closed { reason: Option<String> },
}

/// Receiving half of an adapter's event channel
pub type TransportEvents = futures_channel::mpsc::UnboundedReceiver<TransportEvent>;

/// Errors raised by a transport adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("connection is closed")]
    Closed,
    #[error("failed to open connection: {0}")]
    Connect(String),
    #[error("failed to send frame: {0}")]
    Send(String),
}

/// Port for pushing frames through one physical connection
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TransportPort {
    /// Queue a text frame for delivery
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Close the connection. Must be safe to call more than once.
    fn close(&self);
}
