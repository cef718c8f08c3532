//! Port traits at the edge of the player core

pub mod outbound;
