//! `ANIMATION` event payload
//!
//! Describes a semantic move ("this item went from the shop to the hand") in
//! terms of logical locations. Turning locations into screen coordinates is
//! the player's job.

use serde::{Deserialize, Serialize};

use crate::types::{ItemInfo, MonsterInfo};

/// A motion event pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub content: AnimationContent,
    pub source: Location,
    /// Where the content ends up; `None` animates in place at `source`
    #[serde(default)]
    pub destination: Option<Location>,
}

/// What is being moved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnimationContent {
    Item {
        item: ItemInfo,
        #[serde(default)]
        style: Option<MotionStyleTag>,
    },
    Monster {
        monster: MonsterInfo,
        #[serde(default)]
        style: Option<MotionStyleTag>,
    },
    Coin,
    Star,
}

impl AnimationContent {
    pub fn style(&self) -> Option<MotionStyleTag> {
        match self {
            AnimationContent::Item { style, .. } | AnimationContent::Monster { style, .. } => {
                *style
            }
            AnimationContent::Coin | AnimationContent::Star => None,
        }
    }
}

/// Style hint attached to item and monster moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionStyleTag {
    /// Item used as an attack; slower travel
    Attack,
    /// Monster being revealed; lofted arc with a scale pulse
    Appear,
    #[serde(other)]
    Plain,
}

/// A logical on-screen location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    /// A fixed named anchor such as `"board"`, `"deck"` or `"shop"`
    Named(String),
    /// A card slot identified by the card's id
    Object { object: ObjectKind, id: u32 },
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Location::Named(name.into())
    }

    pub fn hand(id: u32) -> Self {
        Location::Object {
            object: ObjectKind::Hand,
            id,
        }
    }

    pub fn monster(id: u32) -> Self {
        Location::Object {
            object: ObjectKind::Monster,
            id,
        }
    }
}

/// Space a card slot lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Hand,
    Monster,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_item_move_to_hand() {
        let event: AnimationEvent = serde_json::from_value(json!({
            "content": {
                "type": "item",
                "item": { "id": 7, "name": "Net", "text": "", "target_type": "MONSTER" },
                "style": "attack"
            },
            "source": "shop",
            "destination": { "object": "hand", "id": 7 }
        }))
        .unwrap();

        assert_eq!(event.source, Location::named("shop"));
        assert_eq!(event.destination, Some(Location::hand(7)));
        assert_eq!(event.content.style(), Some(MotionStyleTag::Attack));
    }

    #[test]
    fn test_parse_coin_in_place() {
        let event: AnimationEvent = serde_json::from_value(json!({
            "content": { "type": "coin" },
            "source": "board"
        }))
        .unwrap();
        assert_eq!(event.content, AnimationContent::Coin);
        assert_eq!(event.destination, None);
    }

    #[test]
    fn test_unknown_style_is_plain() {
        let style: MotionStyleTag = serde_json::from_value(json!("wobble")).unwrap();
        assert_eq!(style, MotionStyleTag::Plain);
    }
}
