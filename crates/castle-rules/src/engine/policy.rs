//! Declarative room policies.
//!
//! Each rule pairs a room and a trigger predicate with a list of effects.
//! [`reduce`] evaluates the table in order against the turn in progress, so
//! later rules see the events earlier rules added or cancelled.

use castle_core::{EventId, FlagId, Footing, ItemId, RoomId, WorldState};

use super::Turn;

/// A change a policy makes to the turn.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Effect {
    /// Add an engine event with a fixed hp change.
    Inflict {
        event: EventId,
        hp: i32,
        cause: &'static str,
    },
    /// Remove events from the turn, optionally with a denial.
    Cancel {
        events: &'static [EventId],
        denial: Option<&'static str>,
    },
    /// Add a fight whose hp cost depends on what was held when the turn began.
    ArmedClash {
        event: EventId,
        cause: &'static str,
    },
}

/// One row of the policy table.
pub(crate) struct PolicyRule {
    pub name: &'static str,
    pub room: RoomId,
    pub trigger: fn(&Turn<'_>, &WorldState) -> bool,
    pub effects: &'static [Effect],
}

const CELLAR_EXPLORATION: &[EventId] = &[
    EventId::MoveDeeper,
    EventId::ClimbToHall,
    EventId::OpenHallDoor,
];

pub(crate) const POLICIES: &[PolicyRule] = &[
    PolicyRule {
        name: "cell_guard_punishes_noise",
        room: RoomId::Cell,
        trigger: |turn, _| turn.noise >= 2,
        effects: &[Effect::Inflict {
            event: EventId::GuardPunishes,
            hp: -20,
            cause: "The guard strikes you for making too much noise",
        }],
    },
    PolicyRule {
        name: "cellar_stumble_in_darkness",
        room: RoomId::CoalCellar,
        trigger: |turn, _| {
            !turn.start.light_present && CELLAR_EXPLORATION.iter().any(|e| turn.player_has(*e))
        },
        effects: &[
            Effect::Cancel {
                events: CELLAR_EXPLORATION,
                denial: Some("It is unwise to move around without light; you stay where you are."),
            },
            Effect::Inflict {
                event: EventId::DarkStumble,
                hp: -10,
                cause: "You stumble in the dark",
            },
        ],
    },
    PolicyRule {
        name: "cellar_blind_proposals",
        room: RoomId::CoalCellar,
        trigger: |turn, _| {
            !turn.start.light_present && CELLAR_EXPLORATION.iter().any(|e| turn.has(*e))
        },
        effects: &[Effect::Cancel {
            events: CELLAR_EXPLORATION,
            denial: None,
        }],
    },
    PolicyRule {
        name: "hall_guard_already_down",
        room: RoomId::GreatHall,
        trigger: |turn, state| state.has_flag(FlagId::GuardDisabled) && turn.has(EventId::FightGuard),
        effects: &[Effect::Cancel {
            events: &[EventId::FightGuard],
            denial: None,
        }],
    },
    PolicyRule {
        name: "hall_guard_unprovoked",
        room: RoomId::GreatHall,
        trigger: |turn, _| {
            turn.noise < 2 && turn.has(EventId::FightGuard) && !turn.player_has(EventId::FightGuard)
        },
        effects: &[Effect::Cancel {
            events: &[EventId::FightGuard],
            denial: None,
        }],
    },
    PolicyRule {
        name: "hall_guard_clash",
        room: RoomId::GreatHall,
        trigger: |turn, state| {
            !state.has_flag(FlagId::GuardDisabled)
                && (turn.noise >= 2 || turn.player_has(EventId::FightGuard))
        },
        effects: &[Effect::ArmedClash {
            event: EventId::FightGuard,
            cause: "The hall guard fights back before he goes down",
        }],
    },
    PolicyRule {
        name: "courtyard_lever_out_of_reach",
        room: RoomId::Courtyard,
        trigger: |turn, _| {
            turn.has(EventId::PullGateLever) && turn.start.footing != Footing::WallWalk
        },
        effects: &[Effect::Cancel {
            events: &[EventId::PullGateLever],
            denial: Some(
                "The winch lever is up on the gatehouse wall-walk, out of reach from the ground.",
            ),
        }],
    },
    PolicyRule {
        name: "courtyard_lever_already_raised",
        room: RoomId::Courtyard,
        trigger: |turn, state| {
            turn.has(EventId::PullGateLever) && state.has_flag(FlagId::PortcullisRaised)
        },
        effects: &[Effect::Cancel {
            events: &[EventId::PullGateLever],
            denial: None,
        }],
    },
];

/// Hp cost of fighting the hall guard with whatever was in hand.
pub(crate) fn clash_cost(held: Option<ItemId>, held_lit: bool) -> i32 {
    match held {
        None => -30,
        Some(ItemId::Candlestick) => -10,
        Some(ItemId::Torch) if held_lit => -10,
        Some(_) => -20,
    }
}

/// Apply every rule of `rules` whose room and trigger match.
pub(crate) fn reduce(rules: &[PolicyRule], turn: &mut Turn<'_>, state: &WorldState) {
    for rule in rules {
        if rule.room != turn.room || !(rule.trigger)(turn, state) {
            continue;
        }
        turn.note(format!("policy {} applied", rule.name));
        for effect in rule.effects {
            match *effect {
                Effect::Inflict { event, hp, cause } => {
                    turn.add_engine_event(event);
                    turn.hp_delta += hp;
                    turn.causes.push(cause.to_string());
                }
                Effect::Cancel { events, denial } => {
                    let removed = events.iter().filter(|e| turn.remove(**e)).count();
                    if removed > 0 {
                        if let Some(denial) = denial {
                            turn.deny(denial);
                        }
                    }
                }
                Effect::ArmedClash { event, cause } => {
                    turn.add_engine_event(event);
                    turn.hp_delta += clash_cost(turn.start.held, turn.start.held_lit);
                    turn.causes.push(cause.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clash_costs() {
        assert_eq!(clash_cost(None, false), -30);
        assert_eq!(clash_cost(Some(ItemId::Candlestick), false), -10);
        assert_eq!(clash_cost(Some(ItemId::Torch), true), -10);
        assert_eq!(clash_cost(Some(ItemId::Torch), false), -20);
        assert_eq!(clash_cost(Some(ItemId::Coal), false), -20);
    }

    #[test]
    fn every_rule_names_a_room_event() {
        for rule in POLICIES {
            for effect in rule.effects {
                let events: Vec<EventId> = match effect {
                    Effect::Inflict { event, .. } | Effect::ArmedClash { event, .. } => {
                        vec![*event]
                    }
                    Effect::Cancel { events, .. } => events.to_vec(),
                };
                for event in events {
                    assert_eq!(event.room(), Some(rule.room), "{}", rule.name);
                }
            }
        }
    }
}
