//! State Store: owner of the game snapshot.
//!
//! Inbound events are routed here by name. The store picks the reducer,
//! swaps in the result, and reports what happened. Nothing that arrives on the
//! wire can make it panic; bad or early events are logged and dropped.

use fsf_shared::{ServerEventKind, TurnPhase};
use serde_json::Value;

use crate::state::reducers::{reduce, EventError, ViewSignal};
use crate::state::snapshot::GameSnapshot;

/// Why an event left the snapshot untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event name this client does not know
    UnknownEventType,
    /// State event arrived before `INIT`
    NoSnapshot,
    /// Payload did not match the event's shape
    MalformedPayload,
    /// Known event that carries no snapshot state (`ANIMATION`)
    NotStateEvent,
    /// `ACTION_RESPONSE` with an action tag this client does not know
    UnknownAction,
}

impl From<&EventError> for IgnoreReason {
    fn from(error: &EventError) -> Self {
        match error {
            EventError::NoSnapshot(_) => IgnoreReason::NoSnapshot,
            EventError::MalformedPayload { .. } => IgnoreReason::MalformedPayload,
            EventError::NotStateEvent(_) => IgnoreReason::NotStateEvent,
            EventError::UnknownAction => IgnoreReason::UnknownAction,
        }
    }
}

/// Result of [`StateStore::apply_server_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { signal: Option<ViewSignal> },
    Ignored(IgnoreReason),
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }

    pub fn signal(&self) -> Option<ViewSignal> {
        match self {
            ApplyOutcome::Applied { signal } => *signal,
            ApplyOutcome::Ignored(_) => None,
        }
    }
}

/// Single owner of the client's [`GameSnapshot`]
#[derive(Debug)]
pub struct StateStore {
    local_player: String,
    snapshot: Option<GameSnapshot>,
    version: u64,
}

impl StateStore {
    /// Create an empty store for the named local player.
    ///
    /// The local player name drives all phase derivation.
    pub fn new(local_player: impl Into<String>) -> Self {
        Self {
            local_player: local_player.into(),
            snapshot: None,
            version: 0,
        }
    }

    pub fn local_player(&self) -> &str {
        &self.local_player
    }

    /// The current snapshot; `None` until `INIT` has been applied
    pub fn current_snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn phase(&self) -> Option<TurnPhase> {
        self.snapshot.as_ref().and_then(|s| s.phase)
    }

    /// Bumped once per applied event
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether it is the local player's turn
    pub fn is_local_turn(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| s.is_active(&self.local_player))
    }

    /// Reduce one named server event into the snapshot
    pub fn apply_server_event(&mut self, event_type: &str, payload: &Value) -> ApplyOutcome {
        let Some(kind) = ServerEventKind::from_name(event_type) else {
            tracing::warn!(event_type, "Ignoring unknown server event");
            return ApplyOutcome::Ignored(IgnoreReason::UnknownEventType);
        };
        self.apply(kind, payload)
    }

    /// Reduce one event whose kind is already known
    pub fn apply(&mut self, kind: ServerEventKind, payload: &Value) -> ApplyOutcome {
        match reduce(kind, self.snapshot.as_ref(), payload, &self.local_player) {
            Ok(reduction) => {
                let phase_before = self.phase();
                self.snapshot = Some(reduction.snapshot);
                self.version += 1;
                if self.phase() != phase_before {
                    tracing::debug!(event = %kind, phase = ?self.phase(), "Turn phase changed");
                }
                ApplyOutcome::Applied {
                    signal: reduction.signal,
                }
            }
            Err(EventError::NotStateEvent(_)) => ApplyOutcome::Ignored(IgnoreReason::NotStateEvent),
            Err(e) => {
                tracing::warn!(event = %kind, "Dropping server event: {}", e);
                ApplyOutcome::Ignored(IgnoreReason::from(&e))
            }
        }
    }

    /// Discard the snapshot (view unmounted)
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init_lobby(store: &mut StateStore) {
        let outcome = store.apply_server_event(
            "INIT",
            &json!({ "status": "LOBBY", "players": [{ "name": "A" }], "max_players": 4 }),
        );
        assert_eq!(outcome, ApplyOutcome::Applied { signal: None });
    }

    #[test]
    fn test_snapshot_absent_until_init() {
        let mut store = StateStore::new("A");
        let early = [
            ("PLAYERS", json!([{ "name": "A" }])),
            ("CHAT", json!({ "player_name": "A", "text": "hi" })),
            ("START_GAME", json!("A")),
            ("CHANGE_TURN", json!({ "active": "A" })),
            ("ACTION_RESPONSE", json!({ "action": "SHOP" })),
            ("ITEMS", json!({ "items": [] })),
            ("BOARD", json!({})),
        ];
        for (event_type, payload) in &early {
            assert_eq!(
                store.apply_server_event(event_type, payload),
                ApplyOutcome::Ignored(IgnoreReason::NoSnapshot)
            );
            assert!(store.current_snapshot().is_none());
        }
        assert_eq!(store.version(), 0);

        init_lobby(&mut store);
        assert!(store.current_snapshot().is_some());

        for (event_type, payload) in &early {
            store.apply_server_event(event_type, payload);
            assert!(store.current_snapshot().is_some());
        }
    }

    #[test]
    fn test_unknown_event_type_is_ignored() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        let version = store.version();
        assert_eq!(
            store.apply_server_event("FIREWORKS", &json!({})),
            ApplyOutcome::Ignored(IgnoreReason::UnknownEventType)
        );
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_players_is_idempotent() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        let roster = json!([
            { "name": "A", "ready": true, "coins": 3 },
            { "name": "B", "captured_stars": [1, 1, 3] }
        ]);

        store.apply_server_event("PLAYERS", &roster);
        let once = store.current_snapshot().unwrap().players.clone();
        store.apply_server_event("PLAYERS", &roster);
        let twice = store.current_snapshot().unwrap().players.clone();

        assert_eq!(once, twice);
        assert_eq!(twice[1].captured_stars, vec![1, 1, 3]);
    }

    #[test]
    fn test_change_turn_ordering() {
        for (local, expected) in [("C", TurnPhase::TurnEnded), ("B", TurnPhase::ChoosingAction)] {
            let mut store = StateStore::new(local);
            init_lobby(&mut store);
            store.apply_server_event("CHANGE_TURN", &json!({ "active": "A" }));
            store.apply_server_event("CHANGE_TURN", &json!({ "active": "B" }));
            assert_eq!(store.phase(), Some(expected));
        }
    }

    #[test]
    fn test_lobby_to_game_scenario() {
        let mut store = StateStore::new("A");
        assert!(store.current_snapshot().is_none());

        init_lobby(&mut store);
        assert_eq!(store.current_snapshot().unwrap().players.len(), 1);

        store.apply_server_event("PLAYERS", &json!([{ "name": "A" }, { "name": "B" }]));
        assert_eq!(store.current_snapshot().unwrap().players.len(), 2);

        let outcome = store.apply_server_event("START_GAME", &json!("A"));
        assert_eq!(outcome.signal(), Some(ViewSignal::ShowBoard));
        assert_eq!(store.phase(), Some(TurnPhase::ChoosingAction));
        assert!(store.is_local_turn());

        store.apply_server_event("CHANGE_TURN", &json!({ "active": "B" }));
        assert_eq!(store.phase(), Some(TurnPhase::TurnEnded));
        assert!(!store.is_local_turn());
    }

    #[test]
    fn test_chat_appends_without_dedup() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        let msg = json!({ "player_name": "SERVER123", "text": "B joined" });
        store.apply_server_event("CHAT", &msg);
        store.apply_server_event("CHAT", &msg);
        let messages = &store.current_snapshot().unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_system());
    }

    #[test]
    fn test_items_normalizes_selection() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        store.apply_server_event(
            "ITEMS",
            &json!({
                "items": [
                    { "id": 1, "name": "Net", "target_type": "MONSTER" },
                    { "id": 2, "name": "Potion", "target_type": "PLAYER" }
                ],
                "selected_items": [true]
            }),
        );
        let hand = &store.current_snapshot().unwrap().hand;
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.selected(), &[true, false]);
    }

    #[test]
    fn test_malformed_payload_keeps_snapshot() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        let before = store.current_snapshot().cloned();
        assert_eq!(
            store.apply_server_event("PLAYERS", &json!({ "not": "a list" })),
            ApplyOutcome::Ignored(IgnoreReason::MalformedPayload)
        );
        assert_eq!(store.current_snapshot().cloned(), before);
    }

    #[test]
    fn test_animation_is_ignored_quietly() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        assert_eq!(
            store.apply_server_event("ANIMATION", &json!({})),
            ApplyOutcome::Ignored(IgnoreReason::NotStateEvent)
        );
    }

    #[test]
    fn test_reconnect_into_running_game() {
        let mut store = StateStore::new("A");
        let outcome = store.apply_server_event(
            "INIT",
            &json!({ "status": "GAME", "players": [{ "name": "A" }], "max_players": 2, "active_player": "A" }),
        );
        assert_eq!(outcome.signal(), Some(ViewSignal::ShowBoard));
        assert_eq!(store.phase(), Some(TurnPhase::ChoosingAction));
    }

    #[test]
    fn test_clear_discards_snapshot() {
        let mut store = StateStore::new("A");
        init_lobby(&mut store);
        store.clear();
        assert!(store.current_snapshot().is_none());
        assert_eq!(
            store.apply_server_event("PLAYERS", &json!([])),
            ApplyOutcome::Ignored(IgnoreReason::NoSnapshot)
        );
    }
}
