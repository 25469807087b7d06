use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::event::EventId;
use crate::room::RoomId;

/// A one-way fact about the player's progress.
///
/// Flags are causally ordered: a flag with a [`prerequisite`](FlagId::prerequisite)
/// can only be raised once that prerequisite is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagId {
    /// The loose stone under the straw has been discovered.
    FoundLooseStone,
    /// The loose stone has been lifted, exposing a crawlable hole.
    StoneMoved,
    /// The player crawled through the hole.
    EnteredHole,
    /// The door at the top of the cellar stairs has been opened.
    HallDoorOpened,
    /// The hall guard has been knocked out.
    GuardDisabled,
    /// The courtyard portcullis has been winched up.
    PortcullisRaised,
}

impl FlagId {
    /// Every flag.
    pub const ALL: [FlagId; 6] = [
        FlagId::FoundLooseStone,
        FlagId::StoneMoved,
        FlagId::EnteredHole,
        FlagId::HallDoorOpened,
        FlagId::GuardDisabled,
        FlagId::PortcullisRaised,
    ];

    /// Wire name of the flag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FoundLooseStone => "found_loose_stone",
            Self::StoneMoved => "stone_moved",
            Self::EnteredHole => "entered_hole",
            Self::HallDoorOpened => "hall_door_opened",
            Self::GuardDisabled => "guard_disabled",
            Self::PortcullisRaised => "portcullis_raised",
        }
    }

    /// The room this flag belongs to.
    pub fn room(self) -> RoomId {
        match self {
            Self::FoundLooseStone | Self::StoneMoved | Self::EnteredHole => RoomId::Cell,
            Self::HallDoorOpened => RoomId::CoalCellar,
            Self::GuardDisabled => RoomId::GreatHall,
            Self::PortcullisRaised => RoomId::Courtyard,
        }
    }

    /// The flag that must already be set before this one may be raised.
    pub fn prerequisite(self) -> Option<FlagId> {
        match self {
            Self::StoneMoved => Some(Self::FoundLooseStone),
            Self::EnteredHole => Some(Self::StoneMoved),
            _ => None,
        }
    }

    /// The event whose effect raises this flag.
    pub fn source_event(self) -> EventId {
        match self {
            Self::FoundLooseStone => EventId::StrawRummaged,
            Self::StoneMoved => EventId::StoneLifted,
            Self::EnteredHole => EventId::EnterCoalCellar,
            Self::HallDoorOpened => EventId::OpenHallDoor,
            Self::GuardDisabled => EventId::FightGuard,
            Self::PortcullisRaised => EventId::PullGateLever,
        }
    }

    /// In-fiction denial shown when the flag is requested out of order.
    pub fn denial(self) -> &'static str {
        match self {
            Self::FoundLooseStone => "You find nothing of the kind.",
            Self::StoneMoved => {
                "You paw at the cobblestones, but none of them give. You have not found a loose one yet."
            }
            Self::EnteredHole => "There is no opening here to crawl through.",
            Self::HallDoorOpened => "You cannot reach any door from here.",
            Self::GuardDisabled => "There is no guard here to fight.",
            Self::PortcullisRaised => "You cannot reach the winch from here.",
        }
    }

    /// Parse a flag from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|flag| flag.as_str() == normalized)
    }
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownFlag(s.to_string()))
    }
}
