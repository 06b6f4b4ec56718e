//! Candidate actions and the command payloads they carry.
//!
//! A [`TacticalAction`] is a proposal, never an instruction the engine acts
//! on. Its [`Command`] serializes to the JSON shape the external command
//! executor consumes:
//!
//! ```text
//! movement: { "characters": [{ "name": "Ada", "location": "12,7" }] }
//! attack:   { "characters": [{ "name": "Ada", "target": "Vex" }] }
//! speech:   { "source": "Ada", "content": "...", "answers": [] }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tactics_core::Coordinate;

/// Category of a candidate action.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionType {
    Movement,
    Attack,
    Overwatch,
    Speech,
    Reload,
    Heal,
}

/// Destination of a movement order.
///
/// Serialized as an `"x,y"` cell literal or as a character name that the
/// movement resolver looks up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Location {
    Cell(Coordinate),
    Character(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Cell(position) => f.write_str(&position.to_cell_literal()),
            Location::Character(name) => f.write_str(name),
        }
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

impl From<String> for Location {
    fn from(raw: String) -> Self {
        match raw.parse::<Coordinate>() {
            Ok(position) => Location::Cell(position),
            Err(_) => Location::Character(raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub name: String,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOrder {
    pub name: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
}

/// Payload handed to the external command executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Movement {
        characters: Vec<MoveOrder>,
    },
    Attack {
        characters: Vec<AttackOrder>,
    },
    Speech {
        source: String,
        content: String,
        answers: Vec<String>,
    },
}

/// Target label used by overwatch when no specific threat is known.
pub const AREA_TARGET: &str = "area";

/// Attack label carried by overwatch commands.
pub const OVERWATCH_ATTACK: &str = "overwatch";

/// One scored candidate produced by the generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TacticalAction {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub priority: u32,
    pub command: Command,
    pub reasoning: String,
}

impl TacticalAction {
    pub const MAX_PRIORITY: u32 = 100;

    pub fn new(kind: ActionType, priority: u32, command: Command, reasoning: String) -> Self {
        Self {
            kind,
            priority: priority.min(Self::MAX_PRIORITY),
            command,
            reasoning,
        }
    }

    pub fn movement(
        name: &str,
        location: Location,
        priority: u32,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(
            ActionType::Movement,
            priority,
            Command::Movement {
                characters: vec![MoveOrder {
                    name: name.to_string(),
                    location,
                }],
            },
            reasoning.into(),
        )
    }

    pub fn attack(name: &str, target: &str, priority: u32, reasoning: impl Into<String>) -> Self {
        Self::new(
            ActionType::Attack,
            priority,
            Command::Attack {
                characters: vec![AttackOrder {
                    name: name.to_string(),
                    target: target.to_string(),
                    attack: None,
                }],
            },
            reasoning.into(),
        )
    }

    pub fn overwatch(
        name: &str,
        target: &str,
        priority: u32,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(
            ActionType::Overwatch,
            priority,
            Command::Attack {
                characters: vec![AttackOrder {
                    name: name.to_string(),
                    target: target.to_string(),
                    attack: Some(OVERWATCH_ATTACK.to_string()),
                }],
            },
            reasoning.into(),
        )
    }

    pub fn speech(
        source: &str,
        content: impl Into<String>,
        priority: u32,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(
            ActionType::Speech,
            priority,
            Command::Speech {
                source: source.to_string(),
                content: content.into(),
                answers: Vec::new(),
            },
            reasoning.into(),
        )
    }

    /// Command payload as a JSON value for the external executor.
    pub fn command_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.command)
    }
}

/// First candidate with the highest priority, for callers that just want the
/// engine's strongest suggestion.
pub fn highest_priority(actions: &[TacticalAction]) -> Option<&TacticalAction> {
    actions.iter().fold(None, |best, action| match best {
        Some(current) if current.priority >= action.priority => Some(current),
        _ => Some(action),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn movement_payload_uses_cell_literal() {
        let action = TacticalAction::movement(
            "Ada",
            Location::Cell(Coordinate::new(11.6, 7.2)),
            80,
            "flank",
        );
        assert_eq!(
            action.command_json().unwrap(),
            json!({ "characters": [{ "name": "Ada", "location": "12,7" }] })
        );
    }

    #[test]
    fn movement_payload_can_name_a_character() {
        let action =
            TacticalAction::movement("Ada", Location::Character("Vex".into()), 75, "close in");
        assert_eq!(
            action.command_json().unwrap(),
            json!({ "characters": [{ "name": "Ada", "location": "Vex" }] })
        );
    }

    #[test]
    fn attack_and_speech_payload_shapes() {
        let attack = TacticalAction::attack("Ada", "Vex", 90, "melee");
        assert_eq!(
            attack.command_json().unwrap(),
            json!({ "characters": [{ "name": "Ada", "target": "Vex" }] })
        );

        let overwatch = TacticalAction::overwatch("Ada", AREA_TARGET, 50, "watch");
        assert_eq!(
            overwatch.command_json().unwrap(),
            json!({ "characters": [{ "name": "Ada", "target": "area", "attack": "overwatch" }] })
        );

        let speech = TacticalAction::speech("Ada", "Cover me", 30, "coordinate");
        assert_eq!(
            speech.command_json().unwrap(),
            json!({ "source": "Ada", "content": "Cover me", "answers": [] })
        );
    }

    #[test]
    fn location_strings_parse_back() {
        assert_eq!(
            Location::from("3,4".to_string()),
            Location::Cell(Coordinate::new(3.0, 4.0))
        );
        assert_eq!(
            Location::from("Vex".to_string()),
            Location::Character("Vex".to_string())
        );
    }

    #[test]
    fn priority_is_capped() {
        let action = TacticalAction::attack("Ada", "Vex", 140, "overkill");
        assert_eq!(action.priority, 100);
    }

    #[test]
    fn highest_priority_prefers_earliest_on_ties() {
        let actions = vec![
            TacticalAction::attack("Ada", "Vex", 60, "a"),
            TacticalAction::attack("Ada", "Kol", 85, "b"),
            TacticalAction::attack("Ada", "Zed", 85, "c"),
        ];
        let best = highest_priority(&actions).unwrap();
        assert_eq!(best.reasoning, "b");
        assert!(highest_priority(&[]).is_none());
    }
}
