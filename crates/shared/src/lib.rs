//! FSF Shared - wire types for Server and Player communication
//!
//! This crate contains everything both sides of the socket agree on:
//! - Record types (players, items, monsters, chat messages)
//! - The named-event envelope and the known inbound event names
//! - Outbound client messages
//! - The `ANIMATION` event payload
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **WASM compatible** - Must compile for both native and wasm32 targets

pub mod animation;
pub mod messages;
pub mod types;

pub use animation::{AnimationContent, AnimationEvent, Location, MotionStyleTag, ObjectKind};
pub use messages::{
    ActionRequest, ActionResponse, BoardResponse, ChatRequest, ClientMessage, CombatRequest,
    Envelope, HandResponse, InitResponse, ItemChoiceRequest, JoinRequest, LeaveRequest,
    LobbyReadyRequest, PlayerChoiceRequest, ServerEventKind, StartGameEvent, StartGameRequest,
    TurnResponse,
};
pub use types::{
    ActionTag, GameStatus, ItemInfo, ItemTarget, Message, MonsterDetails, MonsterInfo,
    PlayerActionChoice, PlayerCombatChoice, PlayerInfo, TurnPhase, SYSTEM_SENDER,
};
