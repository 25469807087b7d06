use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A node of the castle's room graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomId {
    /// The prison cell where the player wakes up.
    #[serde(rename = "cell_01")]
    Cell,
    /// The pitch-black coal cellar below the cell.
    #[serde(rename = "coal_01")]
    CoalCellar,
    /// The great hall above the cellar, watched by a guard.
    #[serde(rename = "hall_01")]
    GreatHall,
    /// The courtyard in front of the portcullis.
    #[serde(rename = "courtyard_01")]
    Courtyard,
}

impl RoomId {
    /// Every room, in the order a player reaches them.
    pub const ALL: [RoomId; 4] = [
        RoomId::Cell,
        RoomId::CoalCellar,
        RoomId::GreatHall,
        RoomId::Courtyard,
    ];

    /// The stable wire identifier (`cell_01`, `coal_01`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cell => "cell_01",
            Self::CoalCellar => "coal_01",
            Self::GreatHall => "hall_01",
            Self::Courtyard => "courtyard_01",
        }
    }

    /// Human-readable room title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Cell => "Prison Cell",
            Self::CoalCellar => "Coal Cellar",
            Self::GreatHall => "Great Hall",
            Self::Courtyard => "Castle Courtyard",
        }
    }

    /// Parse a room from its wire id or a loose name ("cell", "coal cellar").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "cell_01" | "cell" | "prison_cell" => Some(Self::Cell),
            "coal_01" | "coal" | "coal_cellar" | "cellar" => Some(Self::CoalCellar),
            "hall_01" | "hall" | "great_hall" => Some(Self::GreatHall),
            "courtyard_01" | "courtyard" | "castle_courtyard" => Some(Self::Courtyard),
            _ => None,
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownRoom(s.to_string()))
    }
}

/// Where the player stands inside the current room.
///
/// Only the courtyard has a raised sub-location; every room change puts the
/// player back on the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Footing {
    /// On the floor of the room.
    #[default]
    Ground,
    /// On the gatehouse wall-walk above the courtyard.
    WallWalk,
}

impl fmt::Display for Footing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::WallWalk => write!(f, "wall-walk"),
        }
    }
}
