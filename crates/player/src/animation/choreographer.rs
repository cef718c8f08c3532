//! Animation Choreographer.
//!
//! Turns `ANIMATION` events into descriptors the view can play. An event
//! whose anchors are not mounted yet is parked in a pending queue and retried,
//! in submission order, every time the registry gains a new mapping.
//! Descriptors stay active until the view reports them complete.

use std::collections::VecDeque;

use fsf_shared::{AnimationContent, AnimationEvent, ItemInfo, MonsterInfo, MotionStyleTag};
use serde::Deserialize;
use serde_json::Value;

use crate::animation::anchors::{AnchorElement, AnchorKind, AnchorRegistry, RegistryChange};
use crate::animation::motion::{Frame, MotionConfig, MotionStyle, Transition};

/// Identity of one descriptor; never reused within a choreographer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub u64);

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to draw while animating
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationPayload {
    Item(ItemInfo),
    Monster(MonsterInfo),
    Coins,
    Stars,
}

/// A resolved, renderable animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDescriptor {
    pub id: AnimationId,
    pub initial: Frame,
    /// Frames after `initial`; the last one is the destination
    pub path: Vec<Frame>,
    pub transition: Transition,
    pub payload: AnimationPayload,
    /// Static card to hide while this animation plays
    pub replace_id: Option<u32>,
}

impl AnimationDescriptor {
    pub fn end(&self) -> Frame {
        self.path.last().copied().unwrap_or(self.initial)
    }
}

/// Pending/active animation queue bound to one anchor registry
#[derive(Debug)]
pub struct Choreographer<E> {
    registry: AnchorRegistry<E>,
    motion: MotionConfig,
    active: Vec<AnimationDescriptor>,
    pending: VecDeque<AnimationEvent>,
    next_id: u64,
}

impl<E: AnchorElement + PartialEq> Choreographer<E> {
    pub fn new(motion: MotionConfig) -> Self {
        Self {
            registry: AnchorRegistry::new(),
            motion,
            active: Vec::new(),
            pending: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn registry(&self) -> &AnchorRegistry<E> {
        &self.registry
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Submit a motion event.
    ///
    /// Returns the descriptor id if it could be resolved right away.
    pub fn submit(&mut self, event: AnimationEvent) -> Option<AnimationId> {
        match self.resolve(&event) {
            Some(descriptor) => {
                let id = descriptor.id;
                self.active.push(descriptor);
                Some(id)
            }
            None => {
                tracing::debug!("Animation anchors not mounted yet; deferring");
                self.pending.push_back(event);
                None
            }
        }
    }

    /// Submit a raw `ANIMATION` payload. Malformed payloads are logged and dropped.
    pub fn submit_payload(&mut self, payload: &Value) -> Option<AnimationId> {
        match AnimationEvent::deserialize(payload) {
            Ok(event) => self.submit(event),
            Err(e) => {
                tracing::warn!("Dropping malformed ANIMATION payload: {}", e);
                None
            }
        }
    }

    pub fn active_descriptors(&self) -> &[AnimationDescriptor] {
        &self.active
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Remove a finished descriptor. Returns `false` if it was not active.
    pub fn complete(&mut self, id: AnimationId) -> bool {
        let before = self.active.len();
        self.active.retain(|d| d.id != id);
        self.active.len() != before
    }

    /// Register or unregister an anchor; a new mapping retries pending events
    pub fn register_anchor(
        &mut self,
        id: &str,
        element: Option<E>,
        kind: Option<AnchorKind>,
    ) -> RegistryChange {
        let change = self.registry.register(id, element, kind);
        if change.is_new_mapping() && !self.pending.is_empty() {
            self.retry_pending();
        }
        change
    }

    /// Drop everything: active, pending and anchors
    pub fn clear(&mut self) {
        self.active.clear();
        self.pending.clear();
        self.registry.clear();
    }

    fn retry_pending(&mut self) {
        let mut still_pending = VecDeque::with_capacity(self.pending.len());
        while let Some(event) = self.pending.pop_front() {
            match self.resolve(&event) {
                Some(descriptor) => self.active.push(descriptor),
                None => still_pending.push_back(event),
            }
        }
        self.pending = still_pending;
    }

    fn resolve(&mut self, event: &AnimationEvent) -> Option<AnimationDescriptor> {
        let start = self.registry.resolve_location(&event.source)?;
        let end = match &event.destination {
            Some(destination) => self.registry.resolve_location(destination)?,
            None => start,
        };

        let (style, payload) = match &event.content {
            AnimationContent::Item { item, style } => {
                let motion = if *style == Some(MotionStyleTag::Attack) {
                    MotionStyle::Attack
                } else {
                    MotionStyle::Plain
                };
                (motion, AnimationPayload::Item(item.clone()))
            }
            AnimationContent::Monster { monster, style } => {
                let motion = if *style == Some(MotionStyleTag::Appear) {
                    MotionStyle::Appear
                } else {
                    MotionStyle::Plain
                };
                (motion, AnimationPayload::Monster(monster.clone()))
            }
            AnimationContent::Coin => (MotionStyle::Plain, AnimationPayload::Coins),
            AnimationContent::Star => (MotionStyle::Plain, AnimationPayload::Stars),
        };

        let plan = self.motion.plan(style, (start.x, start.y), (end.x, end.y));
        let id = AnimationId(self.next_id);
        self.next_id += 1;

        Some(AnimationDescriptor {
            id,
            initial: plan.initial,
            path: plan.path,
            transition: plan.transition,
            payload,
            replace_id: end.replace_id,
        })
    }
}

impl<E: AnchorElement + PartialEq> Default for Choreographer<E> {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
