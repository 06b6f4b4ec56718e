//! RON scenario files for running decision cycles outside a live game.
//!
//! A scenario bundles a map, the characters on it, faction alliances and the
//! directive each character follows:
//!
//! ```text
//! (
//!     map: [
//!         "..........",
//!         "....#.....",
//!         "..........",
//!     ],
//!     characters: [
//!         (name: "Ada", position: (x: 1.0, y: 1.0), health: 100, max_health: 100,
//!          faction: "red", action_points: 60),
//!         (name: "Vex", position: (x: 8.0, y: 1.0), health: 80, max_health: 100,
//!          faction: "blue", loadout: (primary: Some((name: "bow", category: ranged)))),
//!     ],
//!     alliances: [("red", "green")],
//!     directives: {
//!         "Ada": (objective: attack, tactics: (stance: aggressive)),
//!     },
//! )
//! ```
//!
//! Map rows use `#` for walls, `.` for floor and `~` for water; the first row
//! is `y = 0`. Board bounds default to the fixed `[0,100] x [0,100]` board and
//! can be overridden with `config: (board_bounds: (...))`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tactics_core::{
    Battlefield, BoardBounds, BoundsError, Character, FactionTable, MapError, TacticalMap,
    TacticsConfig,
};

use crate::action::ActionType;
use crate::directive::TacticalDirective;
use crate::turn_log::TurnActionLog;

pub type Result<T> = std::result::Result<T, ScenarioError>;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario RON")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("character name '{0}' appears more than once")]
    DuplicateCharacter(String),

    #[error("character '{0}' is not part of the scenario")]
    UnknownCharacter(String),
}

/// Complete input for one or more decision cycles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub map: Vec<String>,
    pub characters: Vec<Character>,
    #[serde(default)]
    pub alliances: Vec<(String, String)>,
    #[serde(default)]
    pub directives: BTreeMap<String, TacticalDirective>,
    /// Actions already executed this turn, by character name.
    #[serde(default)]
    pub turn_log: BTreeMap<String, Vec<ActionType>>,
    #[serde(default)]
    pub config: TacticsConfig,
}

impl Scenario {
    pub fn from_ron(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario = Self::from_ron(&content)?;
        tracing::info!(
            path = %path.display(),
            characters = scenario.characters.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Builds the battlefield snapshot, validating map rows, bounds and
    /// character names.
    pub fn battlefield(&self) -> Result<Battlefield> {
        let map = TacticalMap::from_rows(self.map.as_slice())?;

        let requested = self.config.board_bounds;
        let bounds = BoardBounds::new(
            requested.min_x,
            requested.min_y,
            requested.max_x,
            requested.max_y,
        )?;

        let mut seen = BTreeSet::new();
        for character in &self.characters {
            if !seen.insert(character.name.as_str()) {
                return Err(ScenarioError::DuplicateCharacter(character.name.clone()));
            }
        }

        let factions = self
            .alliances
            .iter()
            .fold(FactionTable::new(), |table, (a, b)| {
                table.with_alliance(a.as_str(), b.as_str())
            });

        tracing::debug!(
            width = map.dimensions().width,
            height = map.dimensions().height,
            characters = self.characters.len(),
            "built battlefield"
        );

        Ok(Battlefield::new(map, self.characters.clone(), factions).with_bounds(bounds))
    }

    /// Directive for `name`; characters without one get the default directive.
    pub fn directive_for(&self, name: &str) -> TacticalDirective {
        self.directives.get(name).cloned().unwrap_or_default()
    }

    pub fn turn_log(&self) -> TurnActionLog {
        let mut log = TurnActionLog::new();
        for (name, actions) in &self.turn_log {
            for action in actions {
                log.record(name.as_str(), *action);
            }
        }
        log
    }

    /// Resolves a character by name, failing when it is not in the scenario.
    pub fn character(&self, name: &str) -> Result<&Character> {
        self.characters
            .iter()
            .find(|character| character.name == name)
            .ok_or_else(|| ScenarioError::UnknownCharacter(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Stance;

    const SMALL: &str = r#"(
        map: ["....", ".#..", "...."],
        characters: [
            (name: "Ada", position: (x: 0.0, y: 0.0), health: 100, max_health: 100, faction: "red"),
            (name: "Vex", position: (x: 3.0, y: 2.0), health: 50, max_health: 100, faction: "blue",
             loadout: (primary: Some((name: "bow", category: ranged)))),
        ],
        alliances: [("red", "green")],
        directives: {
            "Ada": (objective: attack, tactics: (stance: flanking)),
            "Vex": (tactics: (stance: ambush, retreat_threshold: 0.5)),
        },
        turn_log: { "Ada": [movement, attack] },
    )"#;

    #[test]
    fn parses_small_scenario() {
        let scenario = Scenario::from_ron(SMALL).unwrap();
        let field = scenario.battlefield().unwrap();

        assert_eq!(field.map.dimensions().width, 4);
        assert!(field.map.blocks_sight(1, 1));
        assert_eq!(field.bounds, BoardBounds::LEGACY);
        assert!(field.character("Vex").unwrap().has_ranged_weapon());
        assert!(field.factions.factions_allied("green", "red"));

        assert_eq!(scenario.directive_for("Ada").stance(), Stance::Flanking);
        let vex = scenario.directive_for("Vex");
        assert_eq!(vex.stance(), Stance::Unrecognized);
        assert_eq!(vex.tactics.retreat_threshold, 0.5);
        assert_eq!(scenario.directive_for("Nobody"), TacticalDirective::default());

        assert!(scenario.turn_log().has_attacked("Ada"));
        assert!(scenario.character("Nobody").is_err());
    }

    #[test]
    fn rejects_duplicate_names_and_bad_bounds() {
        let duplicate = r#"(
            map: ["..."],
            characters: [
                (name: "Ada", position: (x: 0.0, y: 0.0), health: 1, max_health: 1, faction: "red"),
                (name: "Ada", position: (x: 1.0, y: 0.0), health: 1, max_health: 1, faction: "red"),
            ],
        )"#;
        let scenario = Scenario::from_ron(duplicate).unwrap();
        assert!(matches!(
            scenario.battlefield(),
            Err(ScenarioError::DuplicateCharacter(name)) if name == "Ada"
        ));

        let inverted = r#"(
            map: ["..."],
            characters: [],
            config: (board_bounds: (min_x: 10.0, min_y: 0.0, max_x: 5.0, max_y: 10.0)),
        )"#;
        let scenario = Scenario::from_ron(inverted).unwrap();
        assert!(matches!(scenario.battlefield(), Err(ScenarioError::Bounds(_))));
    }

    #[test]
    fn reports_map_and_parse_errors() {
        let ragged = r#"(map: ["...", ".."], characters: [])"#;
        let scenario = Scenario::from_ron(ragged).unwrap();
        assert!(matches!(scenario.battlefield(), Err(ScenarioError::Map(_))));

        assert!(matches!(
            Scenario::from_ron("(map: "),
            Err(ScenarioError::Parse(_))
        ));
    }
}
