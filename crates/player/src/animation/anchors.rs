//! Anchor Registry: logical slot id -> live on-screen element.
//!
//! The view registers an element whenever an animatable slot mounts and
//! unregisters it (by registering `None`) when it unmounts. Positions are
//! reported relative to the root anchor so that animations are laid out in the
//! board's coordinate space.

use std::collections::HashMap;

use fsf_shared::{Location, ObjectKind};

/// Anchor every position is measured against
pub const ROOT_ANCHOR: &str = "board";

/// Axis-aligned box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// This box expressed relative to `origin`'s top-left corner
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect {
            x: self.x - origin.x,
            y: self.y - origin.y,
            ..*self
        }
    }
}

/// Something with an on-screen bounding box
pub trait AnchorElement {
    fn bounding_rect(&self) -> Rect;
}

impl AnchorElement for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}

#[cfg(target_arch = "wasm32")]
impl AnchorElement for web_sys::Element {
    fn bounding_rect(&self) -> Rect {
        let rect = self.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }
}

/// Namespace for numeric slot ids so hand and board cards can share numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Item,
    Monster,
}

impl AnchorKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            AnchorKind::Item => "item",
            AnchorKind::Monster => "monster",
        }
    }

    /// Registry key for `id` in this namespace, e.g. `monster7`
    pub fn key(&self, id: impl std::fmt::Display) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

impl From<ObjectKind> for AnchorKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Hand => AnchorKind::Item,
            ObjectKind::Monster => AnchorKind::Monster,
        }
    }
}

/// What a `register` call did to the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    Added,
    /// A different element now backs the id
    Replaced,
    /// Same element registered again
    Unchanged,
    Removed,
    /// Removal of an id that was not registered
    Absent,
}

impl RegistryChange {
    /// Whether a new element became resolvable
    pub fn is_new_mapping(&self) -> bool {
        matches!(self, RegistryChange::Added | RegistryChange::Replaced)
    }
}

/// A location resolved to board coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAnchor {
    pub x: f64,
    pub y: f64,
    /// Card id the animation stands in for, when the location is a card slot
    pub replace_id: Option<u32>,
}

/// Live mapping from anchor key to element
#[derive(Debug)]
pub struct AnchorRegistry<E> {
    anchors: HashMap<String, E>,
}

impl<E> Default for AnchorRegistry<E> {
    fn default() -> Self {
        Self {
            anchors: HashMap::new(),
        }
    }
}

impl<E: AnchorElement + PartialEq> AnchorRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (`Some`) or unregister (`None`) the element behind an id.
    ///
    /// With a `kind`, `id` is namespaced (`"7"` + `Monster` -> `monster7`).
    pub fn register(
        &mut self,
        id: &str,
        element: Option<E>,
        kind: Option<AnchorKind>,
    ) -> RegistryChange {
        let key = match kind {
            Some(kind) => kind.key(id),
            None => id.to_string(),
        };
        match element {
            Some(element) => match self.anchors.get(&key) {
                Some(existing) if *existing == element => RegistryChange::Unchanged,
                Some(_) => {
                    self.anchors.insert(key, element);
                    RegistryChange::Replaced
                }
                None => {
                    self.anchors.insert(key, element);
                    RegistryChange::Added
                }
            },
            None => match self.anchors.remove(&key) {
                Some(_) => RegistryChange::Removed,
                None => RegistryChange::Absent,
            },
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.anchors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Bounding box of `key` relative to the root anchor.
    ///
    /// `None` while either the anchor or the root is not mounted.
    pub fn resolve(&self, key: &str) -> Option<Rect> {
        let root = self.anchors.get(ROOT_ANCHOR)?.bounding_rect();
        let target = self.anchors.get(key)?.bounding_rect();
        Some(target.relative_to(&root))
    }

    /// Resolve a wire location to the top-left corner of its slot
    pub fn resolve_location(&self, location: &Location) -> Option<ResolvedAnchor> {
        let (key, replace_id) = match location {
            Location::Named(name) => (name.clone(), None),
            Location::Object { object, id } => (AnchorKind::from(*object).key(id), Some(*id)),
        };
        let rect = self.resolve(&key)?;
        Some(ResolvedAnchor {
            x: rect.x,
            y: rect.y,
            replace_id,
        })
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}
