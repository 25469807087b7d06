use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::flag::FlagId;
use crate::item::ItemTable;
use crate::room::{Footing, RoomId};
use crate::scene;

/// Maximum (and starting) hit points.
pub const MAX_HP: i32 = 100;

/// The authoritative state of one playthrough.
///
/// Every mutator keeps the invariants intact: `hp` stays within
/// `0..=MAX_HP`, flags are only raised after their prerequisite, at most one
/// item is held, and intro markers are write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldState {
    room: RoomId,
    footing: Footing,
    hp: i32,
    items: ItemTable,
    flags: BTreeSet<FlagId>,
    intro_shown: BTreeSet<RoomId>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            room: RoomId::Cell,
            footing: Footing::Ground,
            hp: MAX_HP,
            items: ItemTable::new(),
            flags: BTreeSet::new(),
            intro_shown: BTreeSet::new(),
        }
    }
}

impl WorldState {
    /// A fresh playthrough: full health, in the cell, nothing found.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current room.
    pub fn room(&self) -> RoomId {
        self.room
    }

    /// Where the player stands inside the room.
    pub fn footing(&self) -> Footing {
        self.footing
    }

    /// Current hit points.
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Whether the player has died.
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// The item table.
    pub fn items(&self) -> &ItemTable {
        &self.items
    }

    /// Mutable access to the item table; its own methods guard the slot.
    pub fn items_mut(&mut self) -> &mut ItemTable {
        &mut self.items
    }

    /// Whether `flag` is set.
    pub fn has_flag(&self, flag: FlagId) -> bool {
        self.flags.contains(&flag)
    }

    /// All set flags, in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = FlagId> + '_ {
        self.flags.iter().copied()
    }

    /// Per-room view of every flag, for narrator prompts.
    pub fn flags_by_room(&self) -> BTreeMap<RoomId, BTreeMap<FlagId, bool>> {
        let mut out: BTreeMap<RoomId, BTreeMap<FlagId, bool>> = BTreeMap::new();
        for flag in FlagId::ALL {
            out.entry(flag.room())
                .or_default()
                .insert(flag, self.has_flag(flag));
        }
        out
    }

    /// Raise a flag. Returns `Ok(false)` if it was already set.
    pub fn raise_flag(&mut self, flag: FlagId) -> CoreResult<bool> {
        if let Some(requires) = flag.prerequisite() {
            if !self.has_flag(requires) {
                return Err(CoreError::MissingPrerequisite { flag, requires });
            }
        }
        Ok(self.flags.insert(flag))
    }

    /// Add `delta` to hp, clamped to `0..=MAX_HP`. Returns the change actually applied.
    pub fn apply_hp_delta(&mut self, delta: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(delta).clamp(0, MAX_HP);
        self.hp - before
    }

    /// Move to another room; footing resets to the ground.
    pub fn enter(&mut self, room: RoomId) {
        self.room = room;
        self.footing = Footing::Ground;
    }

    /// Change footing within the current room.
    pub fn set_footing(&mut self, footing: Footing) {
        self.footing = footing;
    }

    /// Whether the room's intro has already been shown.
    pub fn intro_shown(&self, room: RoomId) -> bool {
        self.intro_shown.contains(&room)
    }

    /// Mark the room's intro as shown. Returns `true` the first time only.
    pub fn mark_intro_shown(&mut self, room: RoomId) -> bool {
        self.intro_shown.insert(room)
    }

    /// Whether the current room is lit, by its own fixtures or by a carried light.
    pub fn light_present(&self) -> bool {
        scene::card(self.room).fixed_light || self.items.carried_light_in(self.room)
    }

    /// Single-slot inventory projection.
    pub fn inventory(&self) -> Vec<String> {
        self.items.inventory()
    }
}
