//! Tactical directives assigned to a character for one decision cycle.
//!
//! Directives come from an external assignment source (a commander, a script,
//! a language model) and are pure input here. Parsing is lenient on the one
//! field that selects behaviour: an unknown stance label becomes
//! [`Stance::Unrecognized`], which the generator treats like `defensive`.

use serde::{Deserialize, Serialize};
use tactics_core::Coordinate;

/// What the character is ultimately trying to achieve.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum Objective {
    Attack,
    #[default]
    Defend,
    Patrol,
    Pursue,
    Retreat,
    Support,
}

/// Behavioural stance; selects the action-generation branch.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum Stance {
    Aggressive,
    #[default]
    Defensive,
    Flanking,
    Suppressive,
    Retreating,
    /// Any label this engine does not know yet.
    #[serde(other)]
    Unrecognized,
}

impl Stance {
    /// Parses a stance label, mapping unknown labels to [`Stance::Unrecognized`].
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(label, "unrecognized stance label, treating as defensive");
            Stance::Unrecognized
        })
    }
}

/// Preferred engagement distance.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum EngagementRange {
    Close,
    #[default]
    Medium,
    Long,
}

/// How the character should fight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tactics {
    pub stance: Stance,
    #[serde(default)]
    pub engagement_range: EngagementRange,
    /// Fraction of max health at or below which the character falls back.
    #[serde(default = "Tactics::default_retreat_threshold")]
    pub retreat_threshold: f64,
    #[serde(default)]
    pub coordination: Option<String>,
}

impl Tactics {
    pub const DEFAULT_RETREAT_THRESHOLD: f64 = 0.3;

    fn default_retreat_threshold() -> f64 {
        Self::DEFAULT_RETREAT_THRESHOLD
    }
}

impl Default for Tactics {
    fn default() -> Self {
        Self {
            stance: Stance::Defensive,
            engagement_range: EngagementRange::Medium,
            retreat_threshold: Self::DEFAULT_RETREAT_THRESHOLD,
            coordination: Some("individual".to_string()),
        }
    }
}

/// Goal and stance configuration for one character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TacticalDirective {
    #[serde(default)]
    pub objective: Objective,
    #[serde(default)]
    pub priority_targets: Vec<String>,
    #[serde(default)]
    pub tactics: Tactics,
    #[serde(default)]
    pub position: Option<Coordinate>,
}

impl TacticalDirective {
    pub fn new(objective: Objective, stance: Stance) -> Self {
        Self {
            objective,
            tactics: Tactics {
                stance,
                ..Tactics::default()
            },
            ..Self::default()
        }
    }

    pub fn with_priority_target(mut self, name: impl Into<String>) -> Self {
        self.priority_targets.push(name.into());
        self
    }

    pub fn with_position(mut self, position: Coordinate) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_retreat_threshold(mut self, threshold: f64) -> Self {
        self.tactics.retreat_threshold = threshold;
        self
    }

    pub fn is_priority_target(&self, name: &str) -> bool {
        self.priority_targets.iter().any(|target| target == name)
    }

    pub fn stance(&self) -> Stance {
        self.tactics.stance
    }
}
