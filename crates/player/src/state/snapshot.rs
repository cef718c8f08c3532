//! Render-ready game snapshot.
//!
//! The snapshot is the single client-side copy of game state. It is only
//! produced by reducers; views get shared references.

use fsf_shared::{
    BoardResponse, GameStatus, HandResponse, InitResponse, ItemInfo, Message, MonsterInfo,
    PlayerInfo, TurnPhase,
};

/// Shared board: piles, revealed monsters and board items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub deck_size: u32,
    pub shop_size: u32,
    pub monsters: Vec<MonsterInfo>,
    pub items: Vec<ItemInfo>,
    /// Index into `monsters` of the monster currently in combat
    pub selected_monster: Option<usize>,
}

impl From<BoardResponse> for Board {
    fn from(response: BoardResponse) -> Self {
        Self {
            deck_size: response.deck_size,
            shop_size: response.shop_size,
            monsters: response.monsters,
            items: response.items,
            selected_monster: response.selected_monster,
        }
    }
}

impl Board {
    /// The monster currently in combat, if the index points at one
    pub fn selected(&self) -> Option<&MonsterInfo> {
        self.selected_monster.and_then(|i| self.monsters.get(i))
    }
}

/// The local player's hand with its parallel selection vector.
///
/// `selected` always has the same length as `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    items: Vec<ItemInfo>,
    selected: Vec<bool>,
}

impl Hand {
    /// Build a hand, padding or truncating `selected` to the hand length
    pub fn new(items: Vec<ItemInfo>, selected: Option<Vec<bool>>) -> Self {
        let mut selected = selected.unwrap_or_default();
        selected.resize(items.len(), false);
        Self { items, selected }
    }

    pub fn items(&self) -> &[ItemInfo] {
        &self.items
    }

    pub fn selected(&self) -> &[bool] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Items currently marked as selected, in hand order
    pub fn selected_items(&self) -> impl Iterator<Item = &ItemInfo> {
        self.items
            .iter()
            .zip(&self.selected)
            .filter_map(|(item, selected)| selected.then_some(item))
    }
}

impl From<HandResponse> for Hand {
    fn from(response: HandResponse) -> Self {
        Self::new(response.items, response.selected_items)
    }
}

/// Everything the view needs to render one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_name: String,
    pub game_owner: String,
    pub max_players: u32,
    pub status: GameStatus,
    /// Set once the `INIT` handshake has been received
    pub synced: bool,

    pub players: Vec<PlayerInfo>,
    pub active_player: Option<String>,
    /// `None` until a turn has been established
    pub phase: Option<TurnPhase>,

    pub board: Board,
    pub hand: Hand,
    /// Append-only chat log
    pub messages: Vec<Message>,
}

impl GameSnapshot {
    /// Fresh snapshot from the handshake payload. Phase is left to the caller.
    pub fn from_init(init: InitResponse) -> Self {
        Self {
            game_name: init.game_name,
            game_owner: init.game_owner,
            max_players: init.max_players,
            status: init.status,
            synced: true,
            players: init.players,
            active_player: init.active_player,
            phase: None,
            board: Board::default(),
            hand: Hand::default(),
            messages: init.messages,
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_player.as_deref() == Some(name)
    }

    pub fn is_owner(&self, name: &str) -> bool {
        self.game_owner == name
    }

    pub fn in_game(&self) -> bool {
        self.status == GameStatus::Game
    }

    /// Whether every seated player has marked ready
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsf_shared::{InitResponse, ItemTarget, PlayerInfo};

    fn item(id: u32) -> ItemInfo {
        ItemInfo {
            id,
            name: format!("item-{id}"),
            text: String::new(),
            target_type: ItemTarget::None,
        }
    }

    #[test]
    fn test_hand_pads_short_selection() {
        let hand = Hand::new(vec![item(1), item(2), item(3)], Some(vec![true]));
        assert_eq!(hand.selected(), &[true, false, false]);
        assert_eq!(hand.selected_items().map(|i| i.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_hand_truncates_long_selection() {
        let hand = Hand::new(vec![item(1)], Some(vec![false, true, true]));
        assert_eq!(hand.selected(), &[false]);
        assert!(!hand.is_selected(1));
    }

    #[test]
    fn test_hand_without_selection() {
        let hand = Hand::new(vec![item(4), item(5)], None);
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.selected(), &[false, false]);
    }

    #[test]
    fn test_board_selected_out_of_range() {
        let board = Board {
            monsters: vec![MonsterInfo::hidden(1)],
            selected_monster: Some(3),
            ..Board::default()
        };
        assert!(board.selected().is_none());
    }

    fn lobby(players: Vec<PlayerInfo>) -> GameSnapshot {
        GameSnapshot::from_init(InitResponse {
            game_name: "g".into(),
            game_owner: "alice".into(),
            max_players: 4,
            players,
            messages: Vec::new(),
            status: GameStatus::Lobby,
            active_player: None,
        })
    }

    #[test]
    fn test_roster_queries() {
        let mut bob = PlayerInfo::new("bob");
        bob.coins = 3;
        let snapshot = lobby(vec![PlayerInfo::new("alice"), bob]);

        assert!(snapshot.synced);
        assert!(snapshot.is_owner("alice"));
        assert!(!snapshot.is_owner("bob"));
        assert_eq!(snapshot.player("bob").map(|p| p.coins), Some(3));
        assert!(snapshot.player("carol").is_none());
        assert!(!snapshot.in_game());
    }

    #[test]
    fn test_all_ready() {
        assert!(!lobby(Vec::new()).all_ready());

        let mut alice = PlayerInfo::new("alice");
        alice.ready = true;
        let mut snapshot = lobby(vec![alice.clone(), PlayerInfo::new("bob")]);
        assert!(!snapshot.all_ready());

        snapshot.players[1].ready = true;
        assert!(snapshot.all_ready());
    }
}
