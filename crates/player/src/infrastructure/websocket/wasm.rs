//! WASM WebSocket adapter using web-sys

use futures_util::StreamExt;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::infrastructure::websocket::{validate_endpoint, GameSocket, JoinContext};
use crate::ports::outbound::{TransportError, TransportEvent, TransportEvents, TransportPort};

/// Storage for WebSocket event closures; they must outlive the socket's handlers
struct WasmClosures {
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
    _onerror: Closure<dyn FnMut(ErrorEvent)>,
}

/// Browser WebSocket plus the closures bound to it
pub struct WasmTransport {
    ws: WebSocket,
    _closures: WasmClosures,
}

impl TransportPort for WasmTransport {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.ws
            .send_with_str(&text)
            .map_err(|e| TransportError::Send(format!("{:?}", e)))
    }

    fn close(&self) {
        if let Err(e) = self.ws.close() {
            tracing::debug!("WebSocket close failed: {:?}", e);
        }
    }
}

impl Drop for WasmTransport {
    fn drop(&mut self) {
        // Detach handlers before the closures they point at are freed
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
        let _ = self.ws.close();
    }
}

/// Open a browser WebSocket to `endpoint` and bind a [`GameSocket`] to it.
///
/// Pump the returned events with [`spawn_event_pump`].
pub fn connect(
    endpoint: &str,
    join: Option<JoinContext>,
    on_open: impl FnMut() + 'static,
    on_close: impl FnMut() + 'static,
) -> Result<(GameSocket, TransportEvents), TransportError> {
    let url = validate_endpoint(endpoint)?;
    let ws = WebSocket::new(url.as_str())
        .map_err(|e| TransportError::Connect(format!("{:?}", e)))?;
    ws.set_binary_type(web_sys::BinaryType::Arraybuffer);

    let (event_tx, event_rx) = futures_channel::mpsc::unbounded();

    let tx = event_tx.clone();
    let onopen = Closure::<dyn FnMut()>::new(move || {
        let _ = tx.unbounded_send(TransportEvent::Opened);
    });

    let tx = event_tx.clone();
    let onmessage = Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
        match e.data().dyn_into::<js_sys::JsString>() {
            Ok(text) => {
                let _ = tx.unbounded_send(TransportEvent::Frame(text.into()));
            }
            Err(_) => tracing::warn!("Ignoring non-text WebSocket frame"),
        }
    });

    let tx = event_tx.clone();
    let onclose = Closure::<dyn FnMut(_)>::new(move |e: CloseEvent| {
        let reason = e.reason();
        let _ = tx.unbounded_send(TransportEvent::Closed {
            reason: (!reason.is_empty()).then_some(reason),
        });
    });

    let tx = event_tx;
    let onerror = Closure::<dyn FnMut(_)>::new(move |e: ErrorEvent| {
        tracing::error!("WebSocket error: {}", e.message());
        let _ = tx.unbounded_send(TransportEvent::Closed {
            reason: Some(e.message()),
        });
    });

    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let transport = WasmTransport {
        ws,
        _closures: WasmClosures {
            _onopen: onopen,
            _onmessage: onmessage,
            _onclose: onclose,
            _onerror: onerror,
        },
    };
    let socket = GameSocket::new(transport, join);
    socket.set_on_open(on_open);
    socket.set_on_close(on_close);
    Ok((socket, event_rx))
}

/// Forward transport events into `handle` on the browser event loop.
///
/// The pump stops after the first `Closed` event so that it does not keep the
/// socket alive once the connection is gone.
pub fn spawn_event_pump(
    mut events: TransportEvents,
    mut handle: impl FnMut(TransportEvent) + 'static,
) {
    wasm_bindgen_futures::spawn_local(async move {
        while let Some(event) = events.next().await {
            let closed = matches!(event, TransportEvent::Closed { .. });
            handle(event);
            if closed {
                break;
            }
        }
    });
}
