use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::flag::FlagId;
use crate::item::ItemId;
use crate::room::{Footing, RoomId};

/// A canonical, room-scoped outcome of a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventId {
    /// The straw bed was searched or moved.
    StrawRummaged,
    /// The loose stone was lifted.
    StoneLifted,
    /// The player crawls through the hole into the coal cellar.
    EnterCoalCellar,
    /// The cell guard came in and struck the player.
    GuardPunishes,
    /// The player stumbled in the dark.
    DarkStumble,
    /// The player ventures further into the cellar.
    MoveDeeper,
    /// The player crawls back up into the cell.
    ReturnToCell,
    /// The door at the top of the cellar stairs is opened.
    OpenHallDoor,
    /// The player climbs the stairs into the great hall.
    ClimbToHall,
    /// The player fights the hall guard.
    FightGuard,
    /// The player goes back down the stairs to the cellar.
    DescendToCellar,
    /// The player walks out into the courtyard.
    EnterCourtyard,
    /// The player climbs the stairs onto the gatehouse wall-walk.
    ClimbGatehouse,
    /// The player climbs down from the wall-walk.
    DescendGatehouse,
    /// The winch lever that raises the portcullis is pulled.
    PullGateLever,
    /// The player runs out through the gate.
    EscapeThroughGate,
    /// The player goes back inside to the great hall.
    ReturnToHall,
    /// The held torch is set alight.
    LightTorch,
    /// The torch is put out.
    ExtinguishTorch,
    /// An item is picked up.
    Pickup(ItemId),
    /// An item is put down.
    Drop(ItemId),
}

impl EventId {
    /// Events that are only valid in one room, grouped by room.
    pub const ROOM_EVENTS: [EventId; 17] = [
        EventId::StrawRummaged,
        EventId::StoneLifted,
        EventId::EnterCoalCellar,
        EventId::GuardPunishes,
        EventId::DarkStumble,
        EventId::MoveDeeper,
        EventId::ReturnToCell,
        EventId::OpenHallDoor,
        EventId::ClimbToHall,
        EventId::FightGuard,
        EventId::DescendToCellar,
        EventId::EnterCourtyard,
        EventId::ClimbGatehouse,
        EventId::DescendGatehouse,
        EventId::PullGateLever,
        EventId::EscapeThroughGate,
        EventId::ReturnToHall,
    ];

    /// The room the event belongs to, or `None` for events valid everywhere.
    pub fn room(self) -> Option<RoomId> {
        match self {
            Self::StrawRummaged | Self::StoneLifted | Self::EnterCoalCellar | Self::GuardPunishes => {
                Some(RoomId::Cell)
            }
            Self::DarkStumble
            | Self::MoveDeeper
            | Self::ReturnToCell
            | Self::OpenHallDoor
            | Self::ClimbToHall => Some(RoomId::CoalCellar),
            Self::FightGuard | Self::DescendToCellar | Self::EnterCourtyard => {
                Some(RoomId::GreatHall)
            }
            Self::ClimbGatehouse
            | Self::DescendGatehouse
            | Self::PullGateLever
            | Self::EscapeThroughGate
            | Self::ReturnToHall => Some(RoomId::Courtyard),
            Self::LightTorch | Self::ExtinguishTorch | Self::Pickup(_) | Self::Drop(_) => None,
        }
    }

    /// The flag this event raises, if any.
    pub fn flag(self) -> Option<FlagId> {
        match self {
            Self::StrawRummaged => Some(FlagId::FoundLooseStone),
            Self::StoneLifted => Some(FlagId::StoneMoved),
            Self::EnterCoalCellar => Some(FlagId::EnteredHole),
            Self::OpenHallDoor => Some(FlagId::HallDoorOpened),
            Self::FightGuard => Some(FlagId::GuardDisabled),
            Self::PullGateLever => Some(FlagId::PortcullisRaised),
            _ => None,
        }
    }

    /// The room this event leads to, for traversal events.
    pub fn exit_to(self) -> Option<RoomId> {
        match self {
            Self::EnterCoalCellar | Self::DescendToCellar => Some(RoomId::CoalCellar),
            Self::ReturnToCell => Some(RoomId::Cell),
            Self::ClimbToHall | Self::ReturnToHall => Some(RoomId::GreatHall),
            Self::EnterCourtyard => Some(RoomId::Courtyard),
            _ => None,
        }
    }

    /// The footing this event puts the player on, for in-room climbing.
    pub fn footing_to(self) -> Option<Footing> {
        match self {
            Self::ClimbGatehouse => Some(Footing::WallWalk),
            Self::DescendGatehouse => Some(Footing::Ground),
            _ => None,
        }
    }

    /// Whether the event expresses movement. At most one movement event
    /// survives a turn.
    pub fn is_movement(self) -> bool {
        self.exit_to().is_some()
            || self.footing_to().is_some()
            || matches!(self, Self::MoveDeeper | Self::EscapeThroughGate)
    }

    /// Events only the rules may produce; a proposal naming them is ignored.
    pub fn engine_only(self) -> bool {
        matches!(self, Self::GuardPunishes | Self::DarkStumble)
    }

    /// The event that stands in for a requested flag or legacy state name.
    pub fn from_flag_name(name: &str) -> Option<Self> {
        if let Some(flag) = FlagId::parse(name) {
            return Some(flag.source_event());
        }
        match normalize(name).as_str() {
            "has_torch_stick" | "has_torch" => Some(Self::Pickup(ItemId::Torch)),
            "torch_lit" => Some(Self::LightTorch),
            _ => None,
        }
    }

    /// Parse an event name, accepting the aliases a narrator tends to use.
    pub fn parse(s: &str) -> Option<Self> {
        let name = normalize(s);
        let event = match name.as_str() {
            "straw_rummaged" | "hay_moved" | "stone_revealed" | "search_straw" => {
                Self::StrawRummaged
            }
            "stone_lifted" | "stone_moved" | "lift_stone" => Self::StoneLifted,
            "enter_coal_cellar" | "enter_hole" | "entered_hole" => Self::EnterCoalCellar,
            "guard_punishes" => Self::GuardPunishes,
            "dark_stumble" => Self::DarkStumble,
            "move_deeper" | "explore" => Self::MoveDeeper,
            "return_to_cell" => Self::ReturnToCell,
            "open_hall_door" | "open_door" => Self::OpenHallDoor,
            "climb_to_hall" | "enter_hall" => Self::ClimbToHall,
            "fight_guard" | "attack_guard" => Self::FightGuard,
            "descend_to_cellar" => Self::DescendToCellar,
            "enter_courtyard" => Self::EnterCourtyard,
            "climb_gatehouse" => Self::ClimbGatehouse,
            "descend_gatehouse" => Self::DescendGatehouse,
            "pull_gate_lever" | "pull_lever" | "raise_portcullis" => Self::PullGateLever,
            "escape_through_gate" | "escape" => Self::EscapeThroughGate,
            "return_to_hall" => Self::ReturnToHall,
            "light_torch" => Self::LightTorch,
            "extinguish_torch" => Self::ExtinguishTorch,
            other => {
                if let Some(item) = other.strip_prefix("pickup_") {
                    Self::Pickup(ItemId::parse(item)?)
                } else if let Some(item) = other.strip_prefix("drop_") {
                    Self::Drop(ItemId::parse(item)?)
                } else {
                    return None;
                }
            }
        };
        Some(event)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '-'], "_")
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pickup(item) => return write!(f, "pickup_{}", item.as_str()),
            Self::Drop(item) => return write!(f, "drop_{}", item.as_str()),
            Self::StrawRummaged => "straw_rummaged",
            Self::StoneLifted => "stone_lifted",
            Self::EnterCoalCellar => "enter_coal_cellar",
            Self::GuardPunishes => "guard_punishes",
            Self::DarkStumble => "dark_stumble",
            Self::MoveDeeper => "move_deeper",
            Self::ReturnToCell => "return_to_cell",
            Self::OpenHallDoor => "open_hall_door",
            Self::ClimbToHall => "climb_to_hall",
            Self::FightGuard => "fight_guard",
            Self::DescendToCellar => "descend_to_cellar",
            Self::EnterCourtyard => "enter_courtyard",
            Self::ClimbGatehouse => "climb_gatehouse",
            Self::DescendGatehouse => "descend_gatehouse",
            Self::PullGateLever => "pull_gate_lever",
            Self::EscapeThroughGate => "escape_through_gate",
            Self::ReturnToHall => "return_to_hall",
            Self::LightTorch => "light_torch",
            Self::ExtinguishTorch => "extinguish_torch",
        };
        f.write_str(name)
    }
}

impl FromStr for EventId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownEvent(s.to_string()))
    }
}

impl From<EventId> for String {
    fn from(event: EventId) -> Self {
        event.to_string()
    }
}

impl TryFrom<String> for EventId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
