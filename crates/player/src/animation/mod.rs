//! Animation choreography: anchors, motion styles and the pending queue

pub mod anchors;
pub mod choreographer;
pub mod motion;

pub use anchors::{
    AnchorElement, AnchorKind, AnchorRegistry, Rect, RegistryChange, ResolvedAnchor, ROOT_ANCHOR,
};
pub use choreographer::{AnimationDescriptor, AnimationId, AnimationPayload, Choreographer};
pub use motion::{lerp, Frame, MotionConfig, MotionPlan, MotionStyle, Transition};
