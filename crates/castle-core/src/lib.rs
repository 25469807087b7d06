//! Core world model for Escape the Castle.
//!
//! Defines the closed sets of rooms, items, flags, and events, the item table
//! that enforces the single-slot inventory, the authoritative [`WorldState`],
//! and the static scene registry (scene cards and the room graph).

/// Error types used throughout the crate.
pub mod error;
/// Canonical room-scoped events.
pub mod event;
/// Progress flags and their causal ordering.
pub mod flag;
/// Items and the single-slot item table.
pub mod item;
/// Room identifiers and in-room footing.
pub mod room;
pub mod scene;
/// The authoritative world state of a playthrough.
pub mod world;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
pub use event::EventId;
pub use flag::FlagId;
pub use item::{ItemId, ItemLocation, ItemRecord, ItemTable};
pub use room::{Footing, RoomId};
pub use scene::{Exit, SceneCard};
pub use world::{MAX_HP, WorldState};
