use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::room::RoomId;

/// A portable object somewhere in the castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    /// A wooden torch stick, found unlit in the coal cellar.
    Torch,
    /// A fist-sized lump of coal.
    Coal,
    /// A heavy iron candlestick in the great hall.
    Candlestick,
}

impl ItemId {
    /// Every item in the castle.
    pub const ALL: [ItemId; 3] = [ItemId::Torch, ItemId::Coal, ItemId::Candlestick];

    /// Stable identifier used in event names (`pickup_torch`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Torch => "torch",
            Self::Coal => "coal",
            Self::Candlestick => "candlestick",
        }
    }

    /// Display name used in narration and the inventory line.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Torch => "wooden torch",
            Self::Coal => "lump of coal",
            Self::Candlestick => "iron candlestick",
        }
    }

    /// Where the item lies when a playthrough starts.
    pub fn home_room(self) -> RoomId {
        match self {
            Self::Torch | Self::Coal => RoomId::CoalCellar,
            Self::Candlestick => RoomId::GreatHall,
        }
    }

    /// Nouns a player (or the narrator) may use for this item.
    pub fn nouns(self) -> &'static [&'static str] {
        match self {
            Self::Torch => &["torch", "stick", "wooden torch", "torch stick"],
            Self::Coal => &["coal", "lump", "lump of coal", "coal lump"],
            Self::Candlestick => &["candlestick", "candelabra", "iron candlestick"],
        }
    }

    /// Whether the item can be set alight.
    pub fn is_lightable(self) -> bool {
        matches!(self, Self::Torch)
    }

    /// Parse an item from its id or one of its nouns.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == s || item.nouns().contains(&s.as_str()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ItemId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownItem(s.to_string()))
    }
}

/// Where an item currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLocation {
    /// Lying in a room.
    Room(RoomId),
    /// In the player's single inventory slot.
    Held,
}

/// Mutable record for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Current location.
    pub location: ItemLocation,
    /// Whether the item is burning.
    pub lit: bool,
}

/// Table of every item record, enforcing the single-slot inventory.
///
/// At most one record has [`ItemLocation::Held`]; the only way to move an
/// item into the slot is [`ItemTable::take`], which refuses while the slot is
/// occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemTable {
    records: BTreeMap<ItemId, ItemRecord>,
}

impl Default for ItemTable {
    fn default() -> Self {
        let records = ItemId::ALL
            .into_iter()
            .map(|id| {
                let record = ItemRecord {
                    location: ItemLocation::Room(id.home_room()),
                    lit: false,
                };
                (id, record)
            })
            .collect();
        Self { records }
    }
}

impl ItemTable {
    /// Create a table with every item in its home room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an item's record.
    pub fn get(&self, id: ItemId) -> Option<&ItemRecord> {
        self.records.get(&id)
    }

    /// Iterate over all records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// The item in the inventory slot, if any.
    pub fn held(&self) -> Option<ItemId> {
        self.iter()
            .find(|(_, record)| record.location == ItemLocation::Held)
            .map(|(id, _)| id)
    }

    /// Whether the item is lying in `room`.
    pub fn is_in(&self, id: ItemId, room: RoomId) -> bool {
        self.get(id)
            .is_some_and(|record| record.location == ItemLocation::Room(room))
    }

    /// Whether the item is burning.
    pub fn is_lit(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(|record| record.lit)
    }

    /// Items lying in `room`.
    pub fn in_room(&self, room: RoomId) -> Vec<ItemId> {
        self.iter()
            .filter(|(_, record)| record.location == ItemLocation::Room(room))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether a burning item is held or lying in `room`.
    pub fn carried_light_in(&self, room: RoomId) -> bool {
        self.iter().any(|(_, record)| {
            record.lit
                && (record.location == ItemLocation::Held
                    || record.location == ItemLocation::Room(room))
        })
    }

    /// Move an item from `room` into the inventory slot.
    pub fn take(&mut self, id: ItemId, room: RoomId) -> CoreResult<()> {
        match self.held() {
            Some(held) if held == id => return Err(CoreError::AlreadyHolding(id)),
            Some(held) => return Err(CoreError::HandsFull { held, wanted: id }),
            None => {}
        }
        let record = self
            .records
            .get_mut(&id)
            .filter(|record| record.location == ItemLocation::Room(room))
            .ok_or(CoreError::ItemNotHere(id))?;
        record.location = ItemLocation::Held;
        Ok(())
    }

    /// Put the held item down in `room`.
    pub fn put_down(&mut self, id: ItemId, room: RoomId) -> CoreResult<()> {
        let record = self
            .records
            .get_mut(&id)
            .filter(|record| record.location == ItemLocation::Held)
            .ok_or(CoreError::NotHolding(id))?;
        record.location = ItemLocation::Room(room);
        Ok(())
    }

    /// Set or clear the burning state of a lightable item.
    pub fn set_lit(&mut self, id: ItemId, lit: bool) -> CoreResult<()> {
        if !id.is_lightable() {
            return Err(CoreError::NotLightable(id));
        }
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| CoreError::UnknownItem(id.as_str().to_string()))?;
        record.lit = lit;
        Ok(())
    }

    /// Single-slot projection of the inventory for display.
    pub fn inventory(&self) -> Vec<String> {
        self.held()
            .map(|id| {
                if self.is_lit(id) {
                    format!("lit {}", id.as_str())
                } else {
                    id.display_name().to_string()
                }
            })
            .into_iter()
            .collect()
    }
}
