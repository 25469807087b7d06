use crate::flag::FlagId;
use crate::item::ItemId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when a change would break a world-state invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A room identifier did not match any room in the castle.
    #[error("unknown room: \"{0}\"")]
    UnknownRoom(String),

    /// An item identifier did not match any item in the castle.
    #[error("unknown item: \"{0}\"")]
    UnknownItem(String),

    /// A flag identifier did not match any known flag.
    #[error("unknown flag: \"{0}\"")]
    UnknownFlag(String),

    /// An event name did not match any known event.
    #[error("unknown event: \"{0}\"")]
    UnknownEvent(String),

    /// The single inventory slot is occupied by another item.
    #[error("hands full: holding {held}, cannot take {wanted}")]
    HandsFull {
        /// The item currently held.
        held: ItemId,
        /// The item the player tried to take.
        wanted: ItemId,
    },

    /// The item is not lying in the current room.
    #[error("{0} is not here")]
    ItemNotHere(ItemId),

    /// The item is already in the player's hands.
    #[error("already holding {0}")]
    AlreadyHolding(ItemId),

    /// The player does not hold the item.
    #[error("not holding {0}")]
    NotHolding(ItemId),

    /// The item cannot burn.
    #[error("{0} cannot be lit")]
    NotLightable(ItemId),

    /// A dependent flag was raised before its prerequisite.
    #[error("flag {flag} requires {requires}")]
    MissingPrerequisite {
        /// The flag that was requested.
        flag: FlagId,
        /// The prerequisite that is still unset.
        requires: FlagId,
    },
}
