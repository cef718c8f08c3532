//! WebSocket transport for the game server
//!
//! - `game_socket`: named-event binding shared by both platforms
//! - `desktop`: tokio-tungstenite adapter
//! - `wasm`: web-sys WebSocket adapter

mod game_socket;

#[cfg(not(target_arch = "wasm32"))]
mod desktop;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use game_socket::{GameSocket, JoinContext};

#[cfg(not(target_arch = "wasm32"))]
pub use desktop::{connect, DesktopTransport};

#[cfg(target_arch = "wasm32")]
pub use wasm::{connect, spawn_event_pump, WasmTransport};

use crate::ports::outbound::TransportError;

/// Check that an endpoint is a `ws://` or `wss://` URL
pub fn validate_endpoint(endpoint: &str) -> Result<url::Url, TransportError> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| TransportError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(TransportError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("ws://localhost:5001/ws").is_ok());
        assert!(validate_endpoint("wss://fsf.example.com/ws").is_ok());
        assert!(matches!(
            validate_endpoint("http://localhost:5001"),
            Err(TransportError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            validate_endpoint("not a url"),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }
}
