//! Game session: one mounted game view.
//!
//! Owns the socket subscriptions that feed the [`StateStore`] and the
//! [`Choreographer`], buffers view signals, and tears everything down when the
//! view goes away. All access is single-threaded; do not hold a borrow from
//! [`GameSession::snapshot`] across [`GameSession::handle_transport_event`].

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use fsf_shared::{ServerEventKind, TurnPhase};

use crate::animation::{
    AnchorElement, AnchorKind, AnimationDescriptor, AnimationId, Choreographer, MotionConfig,
    RegistryChange,
};
use crate::infrastructure::messaging::Subscription;
use crate::infrastructure::websocket::GameSocket;
use crate::ports::outbound::TransportEvent;
use crate::state::{ApplyOutcome, GameSnapshot, PhaseGate, PlayerIntent, StateStore, ViewSignal};

/// Wiring between one socket, its state store and its choreographer
pub struct GameSession<E: AnchorElement + PartialEq + 'static> {
    socket: GameSocket,
    store: Rc<RefCell<StateStore>>,
    choreographer: Rc<RefCell<Choreographer<E>>>,
    signals: Rc<RefCell<VecDeque<ViewSignal>>>,
    subscriptions: RefCell<Vec<Subscription>>,
    mounted: Cell<bool>,
}

impl<E: AnchorElement + PartialEq + 'static> GameSession<E> {
    /// Subscribe a fresh store and choreographer to every known server event
    pub fn mount(socket: GameSocket, local_player: impl Into<String>, motion: MotionConfig) -> Self {
        Self::mount_with(socket, local_player.into(), motion, true)
    }

    /// Mount without animation: `ANIMATION` frames are left unsubscribed.
    ///
    /// For clients that never register anchors, where motion events would
    /// otherwise pile up in the pending queue.
    pub fn mount_headless(socket: GameSocket, local_player: impl Into<String>) -> Self {
        Self::mount_with(socket, local_player.into(), MotionConfig::default(), false)
    }

    fn mount_with(
        socket: GameSocket,
        local_player: String,
        motion: MotionConfig,
        animate: bool,
    ) -> Self {
        let store = Rc::new(RefCell::new(StateStore::new(local_player)));
        let choreographer = Rc::new(RefCell::new(Choreographer::new(motion)));
        let signals = Rc::new(RefCell::new(VecDeque::new()));

        let subscriptions: Vec<Subscription> = ServerEventKind::ALL
            .into_iter()
            .filter(|kind| animate || kind.is_state_event())
            .map(|kind| {
                if kind.is_state_event() {
                    let store = Rc::clone(&store);
                    let signals = Rc::clone(&signals);
                    socket.subscribe(kind.as_str(), move |payload| {
                        let Ok(mut store) = store.try_borrow_mut() else {
                            tracing::error!(event = %kind, "State store busy; dropping event");
                            return;
                        };
                        if let ApplyOutcome::Applied {
                            signal: Some(signal),
                        } = store.apply(kind, payload)
                        {
                            signals.borrow_mut().push_back(signal);
                        }
                    })
                } else {
                    let choreographer = Rc::clone(&choreographer);
                    socket.subscribe(kind.as_str(), move |payload| {
                        let Ok(mut choreographer) = choreographer.try_borrow_mut() else {
                            tracing::error!(event = %kind, "Choreographer busy; dropping event");
                            return;
                        };
                        choreographer.submit_payload(payload);
                    })
                }
            })
            .collect();

        Self {
            socket,
            store,
            choreographer,
            signals,
            subscriptions: RefCell::new(subscriptions),
            mounted: Cell::new(true),
        }
    }

    pub fn socket(&self) -> &GameSocket {
        &self.socket
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Feed one event from the transport adapter
    pub fn handle_transport_event(&self, event: TransportEvent) {
        self.socket.handle_transport_event(event);
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current snapshot; `None` until `INIT` has been received
    pub fn snapshot(&self) -> Option<Ref<'_, GameSnapshot>> {
        Ref::filter_map(self.store.borrow(), |store| store.current_snapshot()).ok()
    }

    pub fn phase(&self) -> Option<TurnPhase> {
        self.store.borrow().phase()
    }

    /// Changes whenever an event was applied
    pub fn version(&self) -> u64 {
        self.store.borrow().version()
    }

    pub fn local_player(&self) -> String {
        self.store.borrow().local_player().to_string()
    }

    /// Whether the current phase allows `intent`
    pub fn permits(&self, intent: PlayerIntent) -> bool {
        self.phase().permits(intent)
    }

    /// Drain navigation signals raised since the last call
    pub fn take_signals(&self) -> Vec<ViewSignal> {
        self.signals.borrow_mut().drain(..).collect()
    }

    // =========================================================================
    // Animation
    // =========================================================================

    pub fn register_anchor(
        &self,
        id: &str,
        element: Option<E>,
        kind: Option<AnchorKind>,
    ) -> RegistryChange {
        self.choreographer
            .borrow_mut()
            .register_anchor(id, element, kind)
    }

    pub fn complete_animation(&self, id: AnimationId) -> bool {
        self.choreographer.borrow_mut().complete(id)
    }

    pub fn active_animations(&self) -> Vec<AnimationDescriptor> {
        self.choreographer.borrow().active_descriptors().to_vec()
    }

    pub fn pending_animations(&self) -> usize {
        self.choreographer.borrow().pending_len()
    }

    /// Revoke subscriptions, close the socket and discard all state.
    ///
    /// Runs at most once; also runs on drop.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        for subscription in self.subscriptions.borrow_mut().drain(..) {
            subscription.revoke();
        }
        self.socket.close();
        self.choreographer.borrow_mut().clear();
        self.store.borrow_mut().clear();
        self.signals.borrow_mut().clear();
        tracing::info!("Game session unmounted");
    }
}

impl<E: AnchorElement + PartialEq + 'static> Drop for GameSession<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Rect, ROOT_ANCHOR};
    use crate::infrastructure::websocket::JoinContext;
    use crate::ports::outbound::MockTransportPort;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn frame(event_type: &str, data: Value) -> TransportEvent {
        TransportEvent::Frame(json!({ "type": event_type, "data": data }).to_string())
    }

    fn session(local: &str) -> (GameSession<Rect>, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sent_clone = Arc::clone(&sent);
        let mut transport = MockTransportPort::new();
        transport.expect_send_text().returning(move |text| {
            sent_clone.lock().unwrap().push(text);
            Ok(())
        });
        transport.expect_close().times(1).return_const(());

        let socket = GameSocket::new(transport, Some(JoinContext::new("room-1", local)));
        let session = GameSession::mount(socket, local, MotionConfig::default());
        session.handle_transport_event(TransportEvent::Opened);
        (session, sent)
    }

    #[test]
    fn test_lobby_to_board_flow() {
        let (session, sent) = session("A");
        assert!(sent.lock().unwrap()[0].contains("\"JOIN\""));
        assert!(session.snapshot().is_none());

        session.handle_transport_event(frame(
            "INIT",
            json!({ "game_name": "g", "game_owner": "A", "status": "LOBBY", "players": [{ "name": "A" }], "max_players": 4 }),
        ));
        session.handle_transport_event(frame("PLAYERS", json!([{ "name": "A" }, { "name": "B" }])));
        assert_eq!(session.snapshot().unwrap().players.len(), 2);
        assert!(session.take_signals().is_empty());

        session.handle_transport_event(frame("START_GAME", json!("A")));
        assert_eq!(session.take_signals(), vec![ViewSignal::ShowBoard]);
        assert_eq!(session.phase(), Some(TurnPhase::ChoosingAction));
        assert!(session.permits(PlayerIntent::Shop));

        session.handle_transport_event(frame("CHANGE_TURN", json!({ "active": "B" })));
        assert_eq!(session.phase(), Some(TurnPhase::TurnEnded));
        assert!(!session.permits(PlayerIntent::Shop));
    }

    #[test]
    fn test_animation_frames_reach_choreographer() {
        let (session, _sent) = session("A");
        session.register_anchor(ROOT_ANCHOR, Some(Rect::new(0.0, 0.0, 800.0, 600.0)), None);
        session.register_anchor("deck", Some(Rect::new(20.0, 20.0, 40.0, 60.0)), None);

        session.handle_transport_event(frame(
            "ANIMATION",
            json!({
                "content": { "type": "monster", "monster": { "stars": 1 }, "style": "appear" },
                "source": "deck",
                "destination": { "object": "monster", "id": 7 }
            }),
        ));
        assert!(session.active_animations().is_empty());
        assert_eq!(session.pending_animations(), 1);

        session.register_anchor("7", Some(Rect::new(400.0, 200.0, 80.0, 120.0)), Some(AnchorKind::Monster));
        let active = session.active_animations();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].replace_id, Some(7));

        assert!(session.complete_animation(active[0].id));
        assert!(session.active_animations().is_empty());
        // The store is not touched by motion events
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_unmount_discards_everything_once() {
        let (session, sent) = session("A");
        session.handle_transport_event(frame(
            "INIT",
            json!({ "status": "GAME", "players": [{ "name": "A" }], "max_players": 2, "active_player": "A" }),
        ));
        assert_eq!(session.take_signals(), vec![ViewSignal::ShowBoard]);
        session.register_anchor(ROOT_ANCHOR, Some(Rect::default()), None);

        session.unmount();
        session.unmount();

        assert!(!session.is_mounted());
        for kind in ServerEventKind::ALL {
            assert_eq!(session.socket().subscriber_count(kind.as_str()), 0, "{kind}");
        }
        assert!(session.snapshot().is_none());
        assert!(!session.socket().is_connected());
        assert!(sent.lock().unwrap().last().unwrap().contains("\"LEAVE\""));

        session.handle_transport_event(frame("PLAYERS", json!([{ "name": "A" }])));
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_mount_subscribes_every_event() {
        let (session, _sent) = session("A");
        for kind in ServerEventKind::ALL {
            assert_eq!(session.socket().subscriber_count(kind.as_str()), 1, "{kind}");
        }
    }

    #[test]
    fn test_headless_mount_skips_animation() {
        let mut transport = MockTransportPort::new();
        transport.expect_send_text().returning(|_| Ok(()));
        transport.expect_close().return_const(());
        let socket = GameSocket::new(transport, None);
        let session: GameSession<Rect> = GameSession::mount_headless(socket, "A");
        session.handle_transport_event(TransportEvent::Opened);

        assert_eq!(session.socket().subscriber_count(ServerEventKind::Animation.as_str()), 0);
        assert_eq!(session.socket().subscriber_count(ServerEventKind::Init.as_str()), 1);

        session.handle_transport_event(frame(
            "ANIMATION",
            json!({ "content": { "type": "item" }, "source": "deck" }),
        ));
        assert_eq!(session.pending_animations(), 0);

        session.handle_transport_event(frame(
            "INIT",
            json!({ "status": "LOBBY", "players": [{ "name": "A" }], "max_players": 2 }),
        ));
        assert!(session.snapshot().is_some());
    }

    #[test]
    fn test_drop_closes_socket() {
        let (session, sent) = session("A");
        drop(session);
        assert!(sent.lock().unwrap().last().unwrap().contains("\"LEAVE\""));
    }
}
