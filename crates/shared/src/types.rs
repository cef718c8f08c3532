//! Shared record types and enums
//!
//! These mirror the server's models one-to-one. Field names are the wire
//! names; enums serialize in SCREAMING_SNAKE_CASE like the server's `Enum.name`.

use serde::{Deserialize, Serialize};

/// Sender name the server uses for system messages in the chat log.
pub const SYSTEM_SENDER: &str = "SERVER123";

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a game room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Lobby,
    Game,
    End,
}

/// Turn phase as seen by the local player.
///
/// Exactly one phase is active at a time once a turn has been established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    ChoosingAction,
    CombatSelect,
    CombatAction,
    CombatFight,
    Shopping,
    Fled,
    Pvp,
    TurnEnded,
}

impl TurnPhase {
    /// Wire name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::ChoosingAction => "CHOOSING_ACTION",
            TurnPhase::CombatSelect => "COMBAT_SELECT",
            TurnPhase::CombatAction => "COMBAT_ACTION",
            TurnPhase::CombatFight => "COMBAT_FIGHT",
            TurnPhase::Shopping => "SHOPPING",
            TurnPhase::Fled => "FLED",
            TurnPhase::Pvp => "PVP",
            TurnPhase::TurnEnded => "TURN_ENDED",
        }
    }

    /// Whether the phase is one of the combat sub-phases
    pub fn is_combat(&self) -> bool {
        matches!(
            self,
            TurnPhase::CombatSelect | TurnPhase::CombatAction | TurnPhase::CombatFight
        )
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an item can be used on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemTarget {
    Monster,
    Player,
    Item,
    None,
}

/// Top-level choice a player makes at the start of their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerActionChoice {
    Coins,
    Shop,
    Fsf,
    Combat,
    End,
    Cancel,
}

/// Choice made against a monster during combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerCombatChoice {
    Fight,
    Spare,
    Flee,
    Select,
}

/// Action tag echoed back by the server in `ACTION_RESPONSE`.
///
/// Covers both turn-level actions and combat choices. Tags this client does not
/// know deserialize to `Unknown` so newer servers don't break older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionTag {
    Coins,
    Shop,
    Fsf,
    Combat,
    Select,
    Fight,
    Spare,
    Flee,
    End,
    Cancel,
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Records
// =============================================================================

/// A player in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub coins: i32,
    #[serde(default)]
    pub health: i32,
    /// Number of items the player holds (hands of other players are hidden)
    #[serde(default)]
    pub num_items: u32,
    /// Star ranks of captured monsters, as sent by the server
    #[serde(default)]
    pub captured_stars: Vec<u8>,
}

impl PlayerInfo {
    /// A lobby-fresh player with default stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ready: false,
            coins: 0,
            health: 0,
            num_items: 0,
            captured_stars: Vec::new(),
        }
    }
}

/// An item card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Stable identity of the card across hand and board
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub target_type: ItemTarget,
}

/// Details of a monster that has been revealed to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterDetails {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    /// Spare roll threshold
    pub spare: i32,
    /// Coins needed to flee; `None` when fleeing is impossible
    pub flee_coins: Option<i32>,
    pub spare_coins: Option<i32>,
    pub fight_coins: i32,
}

/// A monster card.
///
/// `details` is `None` while the card shows its back face. On the wire the
/// detail fields are flat and optional; `name` decides whether they are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MonsterWire", into = "MonsterWire")]
pub struct MonsterInfo {
    pub stars: u8,
    pub details: Option<MonsterDetails>,
}

impl MonsterInfo {
    /// A face-down monster of the given rank
    pub fn hidden(stars: u8) -> Self {
        Self {
            stars,
            details: None,
        }
    }

    pub fn revealed(stars: u8, details: MonsterDetails) -> Self {
        Self {
            stars,
            details: Some(details),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.details.is_some()
    }

    /// Whether the viewer may flee from this monster at all
    pub fn can_flee(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|d| d.flee_coins)
            .is_some_and(|coins| coins >= 0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MonsterWire {
    stars: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spare: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flee_coins: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spare_coins: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fight_coins: Option<i32>,
}

impl From<MonsterWire> for MonsterInfo {
    fn from(wire: MonsterWire) -> Self {
        let details = wire.name.map(|name| {
            let max_health = wire.max_health.unwrap_or_default();
            MonsterDetails {
                name,
                health: wire.health.unwrap_or(max_health),
                max_health,
                spare: wire.spare.unwrap_or_default(),
                flee_coins: wire.flee_coins,
                spare_coins: wire.spare_coins,
                fight_coins: wire.fight_coins.unwrap_or_default(),
            }
        });
        Self {
            stars: wire.stars,
            details,
        }
    }
}

impl From<MonsterInfo> for MonsterWire {
    fn from(info: MonsterInfo) -> Self {
        match info.details {
            Some(d) => Self {
                stars: info.stars,
                name: Some(d.name),
                max_health: Some(d.max_health),
                health: Some(d.health),
                spare: Some(d.spare),
                flee_coins: d.flee_coins,
                spare_coins: d.spare_coins,
                fight_coins: Some(d.fight_coins),
            },
            None => Self {
                stars: info.stars,
                ..Self::default()
            },
        }
    }
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(alias = "player")]
    pub player_name: String,
    pub text: String,
}

impl Message {
    /// Whether the message was produced by the server rather than a player
    pub fn is_system(&self) -> bool {
        self.player_name == SYSTEM_SENDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hidden_monster_has_no_details() {
        let monster: MonsterInfo = serde_json::from_value(json!({ "stars": 2 })).unwrap();
        assert_eq!(monster.stars, 2);
        assert!(!monster.is_revealed());
        assert!(!monster.can_flee());
    }

    #[test]
    fn test_revealed_monster_groups_details() {
        let monster: MonsterInfo = serde_json::from_value(json!({
            "stars": 3,
            "name": "Gloomwing",
            "health": 4,
            "max_health": 6,
            "spare": 5,
            "flee_coins": 2,
            "fight_coins": 3
        }))
        .unwrap();

        let details = monster.details.as_ref().unwrap();
        assert_eq!(details.name, "Gloomwing");
        assert_eq!(details.health, 4);
        assert_eq!(details.max_health, 6);
        assert_eq!(details.spare_coins, None);
        assert!(monster.can_flee());
    }

    #[test]
    fn test_negative_flee_cost_means_no_escape() {
        let monster: MonsterInfo = serde_json::from_value(json!({
            "stars": 1,
            "name": "Wall",
            "max_health": 9,
            "flee_coins": -1
        }))
        .unwrap();
        assert!(monster.is_revealed());
        assert!(!monster.can_flee());
        // Missing health falls back to full health
        assert_eq!(monster.details.unwrap().health, 9);
    }

    #[test]
    fn test_new_player_deserializes_from_bare_name() {
        let player: PlayerInfo = serde_json::from_value(json!({ "name": "alice" })).unwrap();
        assert_eq!(player, PlayerInfo::new("alice"));
    }

    #[test]
    fn test_revealed_monster_serializes_flat() {
        let monster = MonsterInfo::revealed(
            2,
            MonsterDetails {
                name: "Bog".into(),
                health: 3,
                max_health: 5,
                spare: 4,
                flee_coins: Some(1),
                spare_coins: None,
                fight_coins: 2,
            },
        );
        let value = serde_json::to_value(&monster).unwrap();
        assert_eq!(value["name"], json!("Bog"));
        assert_eq!(value["flee_coins"], json!(1));
        assert!(value.get("spare_coins").is_none());
        assert_eq!(serde_json::from_value::<MonsterInfo>(value).unwrap(), monster);
    }

    #[test]
    fn test_hidden_monster_serializes_without_detail_fields() {
        let value = serde_json::to_value(MonsterInfo::hidden(1)).unwrap();
        assert_eq!(value, json!({ "stars": 1 }));
    }

    #[test]
    fn test_message_accepts_legacy_sender_field() {
        let msg: Message =
            serde_json::from_value(json!({ "player": SYSTEM_SENDER, "text": "hi" })).unwrap();
        assert!(msg.is_system());
    }

    #[test]
    fn test_unknown_action_tag_is_tolerated() {
        let tag: ActionTag = serde_json::from_value(json!("DANCE")).unwrap();
        assert_eq!(tag, ActionTag::Unknown);
        let tag: ActionTag = serde_json::from_value(json!("FSF")).unwrap();
        assert_eq!(tag, ActionTag::Fsf);
    }

    #[test]
    fn test_turn_phase_wire_names() {
        assert_eq!(
            serde_json::to_value(TurnPhase::ChoosingAction).unwrap(),
            json!("CHOOSING_ACTION")
        );
        assert_eq!(TurnPhase::TurnEnded.to_string(), "TURN_ENDED");
        assert!(TurnPhase::CombatFight.is_combat());
        assert!(!TurnPhase::Shopping.is_combat());
    }
}
