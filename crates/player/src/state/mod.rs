//! Game state: snapshot, reducers and the turn phase machine

pub mod reducers;
pub mod snapshot;
pub mod store;
pub mod turn_phase;

pub use reducers::{reduce, EventError, Reduction, ViewSignal};
pub use snapshot::{Board, GameSnapshot, Hand};
pub use store::{ApplyOutcome, IgnoreReason, StateStore};
pub use turn_phase::{derive_turn_phase, phase_after_action, PhaseGate, PlayerIntent};
