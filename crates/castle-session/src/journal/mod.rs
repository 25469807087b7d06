//! Journal of a playthrough: turns, room entries, and how the game ended.

pub mod entry;
pub mod log;

pub use entry::JournalEntry;
pub use log::Journal;
