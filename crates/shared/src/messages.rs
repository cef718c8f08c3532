//! Named-event messages exchanged with the game server
//!
//! Every frame on the socket is a JSON envelope `{"type": NAME, "data": payload}`.
//! Client messages are a closed enum serialized straight into that envelope.
//! Server events are routed by name first and decoded per kind, so an event
//! name this client does not know can be skipped without failing the frame.
//!
//! ## Versioning Policy
//!
//! - New event names can be added by the server at any time (clients ignore them)
//! - Payload fields added by the server must be optional on the client side

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    ActionTag, GameStatus, ItemInfo, Message, MonsterInfo, PlayerActionChoice,
    PlayerCombatChoice, PlayerInfo, TurnPhase,
};

// =============================================================================
// Envelope
// =============================================================================

/// A single named frame as it travels over the socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// =============================================================================
// Server Events (Server → Player)
// =============================================================================

/// Names of all inbound events this client understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEventKind {
    Init,
    Players,
    Chat,
    StartGame,
    ChangeTurn,
    ActionResponse,
    Items,
    Board,
    Animation,
}

impl ServerEventKind {
    /// Every known inbound event, in protocol order
    pub const ALL: [ServerEventKind; 9] = [
        ServerEventKind::Init,
        ServerEventKind::Players,
        ServerEventKind::Chat,
        ServerEventKind::StartGame,
        ServerEventKind::ChangeTurn,
        ServerEventKind::ActionResponse,
        ServerEventKind::Items,
        ServerEventKind::Board,
        ServerEventKind::Animation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerEventKind::Init => "INIT",
            ServerEventKind::Players => "PLAYERS",
            ServerEventKind::Chat => "CHAT",
            ServerEventKind::StartGame => "START_GAME",
            ServerEventKind::ChangeTurn => "CHANGE_TURN",
            ServerEventKind::ActionResponse => "ACTION_RESPONSE",
            ServerEventKind::Items => "ITEMS",
            ServerEventKind::Board => "BOARD",
            ServerEventKind::Animation => "ANIMATION",
        }
    }

    /// Look up an event by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Whether the event carries snapshot state (as opposed to motion)
    pub fn is_state_event(&self) -> bool {
        !matches!(self, ServerEventKind::Animation)
    }
}

impl std::fmt::Display for ServerEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `INIT` payload: full room state sent in reply to `JOIN`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub game_owner: String,
    pub max_players: u32,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub status: GameStatus,
    #[serde(default)]
    pub active_player: Option<String>,
}

/// `START_GAME` payload.
///
/// The server sends the first player's name as a bare string; an object form
/// `{"active": name}` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartGameEvent {
    Name(String),
    Object { active: String },
}

impl StartGameEvent {
    pub fn active(&self) -> &str {
        match self {
            StartGameEvent::Name(name) => name,
            StartGameEvent::Object { active } => active,
        }
    }
}

/// `CHANGE_TURN` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub active: String,
    /// Phase as broadcast by the server; the client derives its own view
    #[serde(default)]
    pub phase: Option<TurnPhase>,
}

/// `ACTION_RESPONSE` payload: outcome of the local player's last request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub action: ActionTag,
    /// Coin delta caused by the action (already reflected in `PLAYERS`)
    #[serde(default)]
    pub coins: i32,
    /// Monsters revealed by the action, if any
    #[serde(default)]
    pub monsters: Option<Vec<MonsterInfo>>,
    #[serde(default)]
    pub selected_monster: Option<usize>,
}

/// `ITEMS` payload: the local player's hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResponse {
    #[serde(default)]
    pub items: Vec<ItemInfo>,
    #[serde(default)]
    pub selected_items: Option<Vec<bool>>,
}

/// `BOARD` payload: the shared board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardResponse {
    #[serde(default)]
    pub deck_size: u32,
    #[serde(default)]
    pub shop_size: u32,
    #[serde(default)]
    pub monsters: Vec<MonsterInfo>,
    #[serde(default)]
    pub selected_monster: Option<usize>,
    #[serde(default)]
    pub items: Vec<ItemInfo>,
}

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// Messages from the player to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Join a room as the named player
    Join(JoinRequest),
    /// Leave the room (sent on teardown)
    Leave(LeaveRequest),
    /// Toggle ready state in the lobby
    LobbyReady(LobbyReadyRequest),
    /// Owner starts the game
    StartGame(StartGameRequest),
    /// Send a chat message
    Chat(ChatRequest),
    /// Choose the turn action
    Action(ActionRequest),
    /// Act against a monster
    Combat(CombatRequest),
    /// Pick an item (hand index)
    ItemChoice(ItemChoiceRequest),
    /// Pick a player
    PlayerChoice(PlayerChoiceRequest),
}

impl ClientMessage {
    /// Wire name of the message
    pub fn event_type(&self) -> &'static str {
        match self {
            ClientMessage::Join(_) => "JOIN",
            ClientMessage::Leave(_) => "LEAVE",
            ClientMessage::LobbyReady(_) => "LOBBY_READY",
            ClientMessage::StartGame(_) => "START_GAME",
            ClientMessage::Chat(_) => "CHAT",
            ClientMessage::Action(_) => "ACTION",
            ClientMessage::Combat(_) => "COMBAT",
            ClientMessage::ItemChoice(_) => "ITEM_CHOICE",
            ClientMessage::PlayerChoice(_) => "PLAYER_CHOICE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub game_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub game: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyReadyRequest {
    pub ready: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub choice: PlayerActionChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRequest {
    pub combat: PlayerCombatChoice,
    /// Board index of the targeted monster
    pub target: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChoiceRequest {
    pub item: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChoiceRequest {
    pub player: String,
}
