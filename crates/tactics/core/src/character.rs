//! Read-only character snapshots.
//!
//! The battlefield collaborator owns and mutates characters; the decision
//! engine only ever sees an immutable [`Character`] taken at the start of a
//! decision cycle.

use crate::coordinate::{CardinalDirection, Coordinate};

/// Broad weapon classes used by threat scoring.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponCategory {
    /// Swords, clubs, fists.
    #[default]
    Melee,
    /// Bows, firearms, thrown weapons.
    Ranged,
}

/// An equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub name: String,
    pub category: WeaponCategory,
}

impl Weapon {
    pub fn new(name: impl Into<String>, category: WeaponCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    pub fn is_ranged(&self) -> bool {
        self.category == WeaponCategory::Ranged
    }
}

/// Weapons currently held in the primary and secondary hands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    pub primary: Option<Weapon>,
    pub secondary: Option<Weapon>,
}

impl Loadout {
    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

/// Snapshot of a single combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub name: String,
    pub position: Coordinate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub facing: CardinalDirection,
    pub health: i32,
    pub max_health: i32,
    /// Faction or owning player; relations are resolved by a
    /// [`crate::FactionRelations`] implementation.
    pub faction: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loadout: Loadout,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_points: u32,
}

impl Character {
    /// Creates a character at full health with no weapons and no action points.
    pub fn new(
        name: impl Into<String>,
        faction: impl Into<String>,
        position: Coordinate,
        max_health: i32,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            facing: CardinalDirection::default(),
            health: max_health,
            max_health,
            faction: faction.into(),
            loadout: Loadout::default(),
            action_points: 0,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_facing(mut self, facing: CardinalDirection) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_primary(mut self, weapon: Weapon) -> Self {
        self.loadout.primary = Some(weapon);
        self
    }

    pub fn with_secondary(mut self, weapon: Weapon) -> Self {
        self.loadout.secondary = Some(weapon);
        self
    }

    pub fn with_action_points(mut self, action_points: u32) -> Self {
        self.action_points = action_points;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Current health as a fraction of maximum health (0.0 for a character
    /// without a positive maximum).
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            tracing::warn!(
                character = %self.name,
                max_health = self.max_health,
                "character has non-positive max health"
            );
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    /// True when either the primary or secondary weapon is ranged.
    pub fn has_ranged_weapon(&self) -> bool {
        self.loadout.weapons().any(Weapon::is_ranged)
    }

    pub fn distance_to(&self, other: &Character) -> f64 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bow() -> Weapon {
        Weapon::new("longbow", WeaponCategory::Ranged)
    }

    fn sword() -> Weapon {
        Weapon::new("sword", WeaponCategory::Melee)
    }

    #[test]
    fn ranged_weapon_in_either_hand() {
        let base = Character::new("Ada", "red", Coordinate::ORIGIN, 100);
        assert!(!base.has_ranged_weapon());
        assert!(!base.clone().with_primary(sword()).has_ranged_weapon());
        assert!(base.clone().with_primary(bow()).has_ranged_weapon());
        assert!(
            base.with_primary(sword())
                .with_secondary(bow())
                .has_ranged_weapon()
        );
    }

    #[test]
    fn health_ratio_handles_degenerate_maximum() {
        let wounded = Character::new("Ada", "red", Coordinate::ORIGIN, 80).with_health(20);
        assert_eq!(wounded.health_ratio(), 0.25);

        let broken = Character::new("Bob", "red", Coordinate::ORIGIN, 0);
        assert_eq!(broken.health_ratio(), 0.0);
    }

    #[test]
    fn dead_characters_are_not_alive() {
        let fallen = Character::new("Ada", "red", Coordinate::ORIGIN, 50).with_health(0);
        assert!(!fallen.is_alive());
        assert!(!fallen.with_health(-5).is_alive());
    }
}
