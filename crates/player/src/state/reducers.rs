//! Reducer table for server events.
//!
//! Each reducer maps (prior snapshot, payload, local player) to the next
//! snapshot. Reducers never mutate the prior snapshot and never panic; every
//! failure is reported as an [`EventError`] for the store to log.

use fsf_shared::{
    ActionResponse, ActionTag, BoardResponse, GameStatus, HandResponse, InitResponse, Message,
    PlayerInfo, ServerEventKind, StartGameEvent, TurnResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::state::snapshot::{Board, GameSnapshot, Hand};
use crate::state::turn_phase::{derive_turn_phase, phase_after_action};

/// Navigation requests for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSignal {
    /// Leave the lobby and show the board (game started or rejoined mid-game)
    ShowBoard,
}

/// Output of a successful reduction
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub snapshot: GameSnapshot,
    pub signal: Option<ViewSignal>,
}

impl Reduction {
    fn quiet(snapshot: GameSnapshot) -> Self {
        Self {
            snapshot,
            signal: None,
        }
    }

    fn with_signal(snapshot: GameSnapshot, signal: ViewSignal) -> Self {
        Self {
            snapshot,
            signal: Some(signal),
        }
    }
}

/// Why an event could not be reduced
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("{0} received before INIT")]
    NoSnapshot(ServerEventKind),
    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: ServerEventKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} carries no snapshot state")]
    NotStateEvent(ServerEventKind),
    #[error("unknown action tag in ACTION_RESPONSE")]
    UnknownAction,
}

fn decode<T: DeserializeOwned>(kind: ServerEventKind, payload: &Value) -> Result<T, EventError> {
    T::deserialize(payload).map_err(|source| EventError::MalformedPayload { kind, source })
}

fn require(
    kind: ServerEventKind,
    prior: Option<&GameSnapshot>,
) -> Result<GameSnapshot, EventError> {
    prior.cloned().ok_or(EventError::NoSnapshot(kind))
}

/// Apply one event. Dispatch is total over [`ServerEventKind`].
pub fn reduce(
    kind: ServerEventKind,
    prior: Option<&GameSnapshot>,
    payload: &Value,
    local_player: &str,
) -> Result<Reduction, EventError> {
    match kind {
        ServerEventKind::Init => reduce_init(decode(kind, payload)?, local_player),
        ServerEventKind::Players => {
            let players: Vec<PlayerInfo> = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            next.players = players;
            Ok(Reduction::quiet(next))
        }
        ServerEventKind::Chat => {
            let message: Message = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            next.messages.push(message);
            Ok(Reduction::quiet(next))
        }
        ServerEventKind::StartGame => {
            let event: StartGameEvent = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            next.status = GameStatus::Game;
            next.phase = Some(derive_turn_phase(event.active(), local_player));
            next.active_player = Some(event.active().to_string());
            Ok(Reduction::with_signal(next, ViewSignal::ShowBoard))
        }
        ServerEventKind::ChangeTurn => {
            let turn: TurnResponse = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            let derived = derive_turn_phase(&turn.active, local_player);
            if let Some(sent) = turn.phase.filter(|sent| *sent != derived) {
                tracing::debug!(%sent, %derived, "Server phase differs from local view; using local");
            }
            next.phase = Some(derived);
            next.active_player = Some(turn.active);
            Ok(Reduction::quiet(next))
        }
        ServerEventKind::ActionResponse => {
            reduce_action(decode(kind, payload)?, require(kind, prior)?)
        }
        ServerEventKind::Items => {
            let response: HandResponse = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            next.hand = Hand::from(response);
            Ok(Reduction::quiet(next))
        }
        ServerEventKind::Board => {
            let response: BoardResponse = decode(kind, payload)?;
            let mut next = require(kind, prior)?;
            next.board = Board::from(response);
            Ok(Reduction::quiet(next))
        }
        ServerEventKind::Animation => Err(EventError::NotStateEvent(kind)),
    }
}

fn reduce_init(init: InitResponse, local_player: &str) -> Result<Reduction, EventError> {
    let mut next = GameSnapshot::from_init(init);
    if !next.in_game() {
        return Ok(Reduction::quiet(next));
    }
    next.phase = next
        .active_player
        .as_deref()
        .map(|active| derive_turn_phase(active, local_player));
    Ok(Reduction::with_signal(next, ViewSignal::ShowBoard))
}

fn reduce_action(
    response: ActionResponse,
    mut next: GameSnapshot,
) -> Result<Reduction, EventError> {
    match response.action {
        ActionTag::Unknown => return Err(EventError::UnknownAction),
        ActionTag::Coins => {
            tracing::debug!(coins = response.coins, "Coin action confirmed");
        }
        ActionTag::Fsf | ActionTag::Combat => {
            if let Some(monsters) = response.monsters {
                next.board.monsters = monsters;
            }
        }
        ActionTag::Select => {
            next.board.selected_monster = response.selected_monster;
        }
        ActionTag::Spare => {
            next.board.selected_monster = None;
        }
        ActionTag::Shop
        | ActionTag::Fight
        | ActionTag::Flee
        | ActionTag::End
        | ActionTag::Cancel => {}
    }
    next.phase = phase_after_action(next.phase, response.action);
    Ok(Reduction::quiet(next))
}
