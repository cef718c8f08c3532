//! Game socket: the named-event binding over one physical connection.
//!
//! Platform adapters (`desktop`, `wasm`) own the raw connection and forward
//! [`TransportEvent`]s; the socket turns those into lifecycle callbacks and
//! named-event dispatch, and turns typed [`ClientMessage`]s into frames.
//!
//! Sending is fire-and-forget. A send while the connection is not open is
//! dropped with a warning, since UI actions can race connection teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fsf_shared::{
    ActionRequest, ChatRequest, ClientMessage, CombatRequest, Envelope, ItemChoiceRequest,
    JoinRequest, LeaveRequest, LobbyReadyRequest, PlayerActionChoice, PlayerChoiceRequest,
    PlayerCombatChoice, StartGameRequest,
};
use serde_json::Value;

use crate::infrastructure::messaging::{
    ConnectionState, ConnectionStateObserver, EventRouter, Subscription,
};
use crate::ports::outbound::{TransportEvent, TransportPort};

/// Who is joining which game; sent as `JOIN` as soon as the socket opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinContext {
    pub game_id: String,
    pub player_name: String,
}

impl JoinContext {
    pub fn new(game_id: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            player_name: player_name.into(),
        }
    }
}

type LifecycleCallback = Box<dyn FnMut()>;

struct SocketInner {
    transport: Box<dyn TransportPort>,
    state: Rc<Cell<ConnectionState>>,
    router: EventRouter,
    join: Option<JoinContext>,
    on_open: RefCell<Option<LifecycleCallback>>,
    on_close: RefCell<Option<LifecycleCallback>>,
}

/// Named-event connection to the game server.
///
/// Cheap to clone; clones share one connection. All methods take `&self` so
/// handlers and views can send while an inbound event is being dispatched.
#[derive(Clone)]
pub struct GameSocket {
    inner: Rc<SocketInner>,
}

impl GameSocket {
    /// Wrap an already-opening transport.
    ///
    /// The socket starts in `Connecting`; the adapter's `Opened` event moves it
    /// to `Connected`.
    pub fn new(transport: impl TransportPort + 'static, join: Option<JoinContext>) -> Self {
        Self {
            inner: Rc::new(SocketInner {
                transport: Box::new(transport),
                state: Rc::new(Cell::new(ConnectionState::Connecting)),
                router: EventRouter::new(),
                join,
                on_open: RefCell::new(None),
                on_close: RefCell::new(None),
            }),
        }
    }

    /// Set the callback run once the connection is open (after the join request)
    pub fn set_on_open(&self, callback: impl FnMut() + 'static) {
        *self.inner.on_open.borrow_mut() = Some(Box::new(callback));
    }

    /// Set the callback run when the connection closes
    pub fn set_on_close(&self, callback: impl FnMut() + 'static) {
        *self.inner.on_close.borrow_mut() = Some(Box::new(callback));
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }

    /// Observer for views that only need to show connection status
    pub fn state_observer(&self) -> ConnectionStateObserver {
        ConnectionStateObserver::new(Rc::clone(&self.inner.state))
    }

    pub fn join_context(&self) -> Option<&JoinContext> {
        self.inner.join.as_ref()
    }

    /// Number of live subscriptions for `event_type`
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.inner.router.subscriber_count(event_type)
    }

    /// Subscribe to a named inbound event
    pub fn subscribe(
        &self,
        event_type: impl Into<String>,
        handler: impl FnMut(&Value) + 'static,
    ) -> Subscription {
        self.inner.router.subscribe(event_type, handler)
    }

    /// Feed one event from the transport adapter.
    pub fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.handle_opened(),
            TransportEvent::Frame(text) => self.handle_frame(&text),
            TransportEvent::Closed { reason } => self.handle_closed(reason),
        }
    }

    fn handle_opened(&self) {
        match self.state() {
            ConnectionState::Closed => {
                tracing::debug!("Transport opened after socket was closed; ignoring");
                return;
            }
            ConnectionState::Connected => {
                tracing::debug!("Duplicate open from transport; ignoring");
                return;
            }
            _ => {}
        }
        self.inner.state.set(ConnectionState::Connected);
        tracing::info!("Connected to game server");

        match self.inner.join.clone() {
            Some(join) => self.join(&join.game_id, &join.player_name),
            None => tracing::error!("No join context available; connected without joining"),
        }

        run_lifecycle_callback(&self.inner.on_open);
    }

    fn handle_frame(&self, text: &str) {
        if self.state() == ConnectionState::Closed {
            return;
        }
        match Envelope::parse(text) {
            Ok(envelope) => {
                let handled = self
                    .inner
                    .router
                    .dispatch(&envelope.event_type, &envelope.data);
                if handled == 0 {
                    tracing::debug!(event_type = %envelope.event_type, "No subscribers for event");
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse server frame: {}", e);
            }
        }
    }

    fn handle_closed(&self, reason: Option<String>) {
        if self.inner.state.replace(ConnectionState::Closed) == ConnectionState::Closed {
            return;
        }
        match reason {
            Some(reason) => tracing::info!(%reason, "Disconnected from game server"),
            None => tracing::info!("Disconnected from game server"),
        }
        run_lifecycle_callback(&self.inner.on_close);
    }

    /// Close the connection.
    ///
    /// Sends `LEAVE` first when the socket is open and joined. Safe to call
    /// any number of times; only the first call has an effect.
    pub fn close(&self) {
        if self.state() == ConnectionState::Closed {
            return;
        }
        if let Some(join) = self.inner.join.clone() {
            if self.is_connected() {
                self.leave(&join.game_id);
            }
        }
        self.inner.transport.close();
        self.handle_closed(None);
    }

    /// Send a typed client message
    pub fn send(&self, message: &ClientMessage) {
        match serde_json::to_string(message) {
            Ok(text) => self.send_frame(message.event_type(), text),
            Err(e) => tracing::error!(
                event_type = message.event_type(),
                "Failed to serialize client message: {}",
                e
            ),
        }
    }

    /// Send an arbitrary named event
    pub fn emit(&self, event_type: &str, payload: Value) {
        match serde_json::to_string(&Envelope::new(event_type, payload)) {
            Ok(text) => self.send_frame(event_type, text),
            Err(e) => tracing::error!(event_type, "Failed to serialize event: {}", e),
        }
    }

    fn send_frame(&self, event_type: &str, text: String) {
        if !self.is_connected() {
            tracing::warn!(
                event_type,
                state = ?self.state(),
                "Cannot send: socket not connected"
            );
            return;
        }
        if let Err(e) = self.inner.transport.send_text(text) {
            tracing::warn!(event_type, "Failed to send: {}", e);
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    pub fn join(&self, game_id: &str, player_name: &str) {
        tracing::debug!(game_id, player_name, "Sending join request");
        self.send(&ClientMessage::Join(JoinRequest {
            game_id: game_id.to_string(),
            player_name: player_name.to_string(),
        }));
    }

    pub fn leave(&self, game_id: &str) {
        self.send(&ClientMessage::Leave(LeaveRequest {
            game: game_id.to_string(),
        }));
    }

    pub fn set_ready(&self, ready: bool) {
        tracing::debug!(ready, "Sending lobby ready");
        self.send(&ClientMessage::LobbyReady(LobbyReadyRequest { ready }));
    }

    pub fn start_game(&self) {
        self.send(&ClientMessage::StartGame(StartGameRequest {}));
    }

    pub fn chat(&self, text: &str) {
        self.send(&ClientMessage::Chat(ChatRequest {
            text: text.to_string(),
        }));
    }

    pub fn choose_action(&self, choice: PlayerActionChoice) {
        tracing::debug!(?choice, "Sending action");
        self.send(&ClientMessage::Action(ActionRequest { choice }));
    }

    /// Act against the monster at `target` (board index)
    pub fn combat(&self, combat: PlayerCombatChoice, target: i32) {
        tracing::debug!(?combat, target, "Sending combat choice");
        self.send(&ClientMessage::Combat(CombatRequest { combat, target }));
    }

    pub fn choose_item(&self, item: i32) {
        self.send(&ClientMessage::ItemChoice(ItemChoiceRequest { item }));
    }

    pub fn choose_player(&self, player: &str) {
        self.send(&ClientMessage::PlayerChoice(PlayerChoiceRequest {
            player: player.to_string(),
        }));
    }
}

/// Run the callback in `slot` without holding the borrow, so it may re-bind
/// the slot. A replacement set during the call wins over the original.
fn run_lifecycle_callback(slot: &RefCell<Option<LifecycleCallback>>) {
    let Some(mut callback) = slot.borrow_mut().take() else {
        return;
    };
    callback();
    let mut slot = slot.borrow_mut();
    if slot.is_none() {
        *slot = Some(callback);
    }
}
