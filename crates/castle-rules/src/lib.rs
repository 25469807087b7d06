//! Rule enforcement for Escape the Castle.
//!
//! The narrator proposes, these rules decide. A turn flows through four
//! stages: the player's words are normalized into candidate events, the
//! narrator's raw output is coerced into a [`TurnProposal`], the
//! [`RuleEngine`] reconciles both against the [`castle_core::WorldState`],
//! and the narration arbiter rewrites the prose to match the [`Outcome`].

/// Narration correction against the authoritative outcome.
pub mod arbiter;
/// The rule enforcement engine and its policy table.
pub mod engine;
/// Candidate events inferred from the player's words.
pub mod intent;
/// Coercion of narrator output into a typed proposal.
pub mod proposal;

pub use arbiter::{NOTHING_HAPPENED, arbitrate};
pub use engine::{Outcome, RuleEngine};
pub use intent::{Intents, justified, normalize};
pub use proposal::{TurnProposal, parse_generated_json};
