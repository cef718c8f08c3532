//! Turn phase state machine.
//!
//! Phase is inferred locally: whoever the server names as active player gets
//! `CHOOSING_ACTION`, everyone else sits in `TURN_ENDED`. Within a turn the
//! acting player's own `ACTION_RESPONSE`s drive the sub-phases.
//!
//! ```text
//! CHOOSING_ACTION --SHOP--> SHOPPING
//! CHOOSING_ACTION --FSF/COMBAT--> COMBAT_SELECT --SELECT--> COMBAT_ACTION --FIGHT--> COMBAT_FIGHT
//!                                                          COMBAT_ACTION --FLEE--> FLED
//! any --END--> TURN_ENDED          any --CANCEL--> CHOOSING_ACTION
//! ```
//!
//! Nothing here validates legality. [`TurnPhase::permits`] is offered to
//! callers that want to gate a request before sending it; the server remains
//! the final arbiter.

use fsf_shared::{ActionTag, PlayerActionChoice, PlayerCombatChoice, TurnPhase};

/// Phase for the local player when `active` holds the turn
pub fn derive_turn_phase(active: &str, local_player: &str) -> TurnPhase {
    if active == local_player {
        TurnPhase::ChoosingAction
    } else {
        TurnPhase::TurnEnded
    }
}

/// Phase after the server confirmed `action`.
///
/// Actions that resolve without moving the turn along (`COINS`, `SPARE`) and
/// unknown tags leave the phase as it was.
pub fn phase_after_action(current: Option<TurnPhase>, action: ActionTag) -> Option<TurnPhase> {
    match action {
        ActionTag::Shop => Some(TurnPhase::Shopping),
        ActionTag::Fsf | ActionTag::Combat => Some(TurnPhase::CombatSelect),
        ActionTag::Select => Some(TurnPhase::CombatAction),
        ActionTag::Fight => Some(TurnPhase::CombatFight),
        ActionTag::Flee => Some(TurnPhase::Fled),
        ActionTag::End => Some(TurnPhase::TurnEnded),
        ActionTag::Cancel => Some(TurnPhase::ChoosingAction),
        ActionTag::Coins | ActionTag::Spare | ActionTag::Unknown => current,
    }
}

/// Something the local player may try to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerIntent {
    TakeCoins,
    Shop,
    StartCombat,
    SelectMonster,
    Fight,
    Spare,
    Flee,
    ChooseItem,
    ChoosePlayer,
    EndTurn,
    Cancel,
}

impl From<PlayerActionChoice> for PlayerIntent {
    fn from(choice: PlayerActionChoice) -> Self {
        match choice {
            PlayerActionChoice::Coins => PlayerIntent::TakeCoins,
            PlayerActionChoice::Shop => PlayerIntent::Shop,
            PlayerActionChoice::Fsf | PlayerActionChoice::Combat => PlayerIntent::StartCombat,
            PlayerActionChoice::End => PlayerIntent::EndTurn,
            PlayerActionChoice::Cancel => PlayerIntent::Cancel,
        }
    }
}

impl From<PlayerCombatChoice> for PlayerIntent {
    fn from(choice: PlayerCombatChoice) -> Self {
        match choice {
            PlayerCombatChoice::Select => PlayerIntent::SelectMonster,
            PlayerCombatChoice::Fight => PlayerIntent::Fight,
            PlayerCombatChoice::Spare => PlayerIntent::Spare,
            PlayerCombatChoice::Flee => PlayerIntent::Flee,
        }
    }
}

/// Gate requests by phase
pub trait PhaseGate {
    fn permits(&self, intent: PlayerIntent) -> bool;
}

impl PhaseGate for TurnPhase {
    fn permits(&self, intent: PlayerIntent) -> bool {
        use PlayerIntent as I;
        match self {
            TurnPhase::ChoosingAction => matches!(
                intent,
                I::TakeCoins | I::Shop | I::StartCombat | I::ChooseItem | I::EndTurn
            ),
            TurnPhase::Shopping => matches!(intent, I::ChooseItem | I::Cancel | I::EndTurn),
            TurnPhase::CombatSelect => matches!(intent, I::SelectMonster | I::Cancel),
            TurnPhase::CombatAction => {
                matches!(intent, I::Fight | I::Spare | I::Flee | I::Cancel)
            }
            TurnPhase::CombatFight => matches!(intent, I::ChooseItem | I::EndTurn),
            TurnPhase::Fled => matches!(intent, I::EndTurn),
            TurnPhase::Pvp => matches!(intent, I::ChoosePlayer | I::ChooseItem | I::Cancel),
            TurnPhase::TurnEnded => false,
        }
    }
}

impl PhaseGate for Option<TurnPhase> {
    fn permits(&self, intent: PlayerIntent) -> bool {
        self.is_some_and(|phase| phase.permits(intent))
    }
}
