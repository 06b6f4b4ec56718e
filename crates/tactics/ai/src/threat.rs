//! Threat assessment (first stage of a decision cycle).
//!
//! Turns the characters an actor can currently see into a ranked list of
//! hostile threats.
//!
//! # Threat level
//!
//! ```text
//! 50                            base
//! + health_ratio × 20           healthier enemies are more dangerous
//! + 30 / 20 / 10 / 0            distance ≤ 2 / ≤ 5 / ≤ 10 / beyond
//! + 20                          enemy carries a ranged weapon
//! − 20                          no line of sight (bodies count as cover)
//! + 30                          named in the directive's priority targets
//! clamped to [0, 100]
//! ```
//!
//! Weapon effectiveness describes how well the *actor* can hit the threat and
//! is computed independently of the threat level.

use tactics_core::{Battlefield, Character, TacticsConfig, spatial};

use crate::directive::TacticalDirective;
use crate::position::is_in_cover;

const BASE_THREAT: f64 = 50.0;
const HEALTH_WEIGHT: f64 = 20.0;
const RANGED_BONUS: f64 = 20.0;
const NO_SIGHT_PENALTY: f64 = 20.0;
const PRIORITY_TARGET_BONUS: f64 = 30.0;

/// Danger posed by one hostile, living, visible character.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreatAssessment<'a> {
    pub character: &'a Character,
    /// Danger score in `[0, 100]`.
    pub threat_level: f64,
    pub distance: f64,
    pub has_line_of_sight: bool,
    pub is_in_cover: bool,
    /// How effectively the actor can engage this threat, in `[0, 100]`.
    pub weapon_effectiveness: f64,
}

/// Ranks every hostile, living character in `visible` by threat level.
///
/// Allies and characters with health ≤ 0 are skipped. The result is sorted by
/// non-increasing threat level; ties keep the order of `visible`.
pub fn assess_threats<'a>(
    character: &Character,
    visible: impl IntoIterator<Item = &'a Character>,
    battlefield: &Battlefield,
    directive: Option<&TacticalDirective>,
) -> Vec<ThreatAssessment<'a>> {
    let mut threats: Vec<ThreatAssessment<'a>> = visible
        .into_iter()
        .filter(|other| other.is_alive() && !battlefield.are_allied(character, other))
        .map(|other| assess(character, other, battlefield, directive))
        .collect();

    threats.sort_by(|a, b| b.threat_level.total_cmp(&a.threat_level));

    tracing::debug!(
        character = %character.name,
        threats = threats.len(),
        primary = threats.first().map(|t| t.character.name.as_str()),
        "assessed threats"
    );

    threats
}

fn assess<'a>(
    character: &Character,
    other: &'a Character,
    battlefield: &Battlefield,
    directive: Option<&TacticalDirective>,
) -> ThreatAssessment<'a> {
    let distance = character.distance_to(other);
    let has_line_of_sight = spatial::line_of_sight(
        character.position,
        other.position,
        &battlefield.map,
        &battlefield.characters,
        false,
    );

    let mut level = BASE_THREAT + other.health_ratio() * HEALTH_WEIGHT + distance_bonus(distance);
    if other.has_ranged_weapon() {
        level += RANGED_BONUS;
    }
    if !has_line_of_sight {
        level -= NO_SIGHT_PENALTY;
    }
    if directive.is_some_and(|d| d.is_priority_target(&other.name)) {
        level += PRIORITY_TARGET_BONUS;
    }

    ThreatAssessment {
        character: other,
        threat_level: level.clamp(0.0, 100.0),
        distance,
        has_line_of_sight,
        is_in_cover: is_in_cover(other.position, battlefield),
        weapon_effectiveness: weapon_effectiveness(character, distance),
    }
}

fn distance_bonus(distance: f64) -> f64 {
    if distance <= 2.0 {
        30.0
    } else if distance <= 5.0 {
        20.0
    } else if distance <= 10.0 {
        10.0
    } else {
        0.0
    }
}

/// How well `character` can engage something `distance` away.
///
/// Melee reach is always effective; beyond it only a ranged weapon helps.
pub fn weapon_effectiveness(character: &Character, distance: f64) -> f64 {
    if distance <= TacticsConfig::MELEE_RANGE {
        return 90.0;
    }
    if character.has_ranged_weapon() {
        if distance <= 5.0 {
            return 80.0;
        } else if distance <= 10.0 {
            return 60.0;
        } else if distance <= 15.0 {
            return 40.0;
        }
    }
    10.0
}

#[cfg(test)]
mod tests {
    use tactics_core::{Coordinate, FactionTable, TacticalMap, TerrainKind, Weapon, WeaponCategory};

    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn bow() -> Weapon {
        Weapon::new("bow", WeaponCategory::Ranged)
    }

    fn field(characters: Vec<Character>) -> Battlefield {
        Battlefield::new(TacticalMap::open(30, 30), characters, FactionTable::new())
    }

    #[test]
    fn scores_close_healthy_enemy() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let enemy = Character::new("Vex", "blue", c(3.0, 0.0), 100);
        let field = field(vec![hero.clone(), enemy.clone()]);

        let threats = assess_threats(&hero, [&enemy], &field, None);
        assert_eq!(threats.len(), 1);
        let threat = &threats[0];
        // 50 + 20 (full health) + 20 (≤5)
        assert_eq!(threat.threat_level, 90.0);
        assert_eq!(threat.distance, 3.0);
        assert!(threat.has_line_of_sight);
        assert!(!threat.is_in_cover);
        assert_eq!(threat.weapon_effectiveness, 10.0);
    }

    #[test]
    fn threat_level_is_clamped() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let enemy = Character::new("Vex", "blue", c(1.0, 0.0), 100).with_primary(bow());
        let field = field(vec![hero.clone(), enemy.clone()]);
        let directive = TacticalDirective::default().with_priority_target("Vex");

        let threats = assess_threats(&hero, [&enemy], &field, Some(&directive));
        assert_eq!(threats[0].threat_level, 100.0);
    }

    #[test]
    fn blocked_sight_lowers_threat() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let enemy = Character::new("Vex", "blue", c(8.0, 0.0), 100).with_health(50);
        let mut map = TacticalMap::open(30, 30);
        map.set_terrain(4, 0, TerrainKind::Wall);
        let field = Battlefield::new(map, vec![hero.clone(), enemy.clone()], FactionTable::new());

        let threats = assess_threats(&hero, [&enemy], &field, None);
        // 50 + 10 (half health) + 10 (≤10) − 20 (no sight)
        assert_eq!(threats[0].threat_level, 50.0);
        assert!(!threats[0].has_line_of_sight);
    }

    #[test]
    fn bodies_block_the_threat_sight_line() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let shield = Character::new("Bea", "red", c(2.0, 0.0), 100);
        let enemy = Character::new("Vex", "blue", c(4.0, 0.0), 100);
        let field = field(vec![hero.clone(), shield, enemy.clone()]);

        let threats = assess_threats(&hero, [&enemy], &field, None);
        assert!(!threats[0].has_line_of_sight);
    }

    #[test]
    fn skips_allies_and_the_dead() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let friend = Character::new("Bea", "red", c(1.0, 1.0), 100);
        let partner = Character::new("Gus", "green", c(2.0, 1.0), 100);
        let corpse = Character::new("Kol", "blue", c(2.0, 2.0), 100).with_health(0);
        let enemy = Character::new("Vex", "blue", c(5.0, 5.0), 100);
        let mut field = field(vec![]);
        field.factions.ally("red", "green");

        let visible = [&friend, &partner, &corpse, &enemy];
        let threats = assess_threats(&hero, visible, &field, None);
        let names: Vec<_> = threats.iter().map(|t| t.character.name.as_str()).collect();
        assert_eq!(names, vec!["Vex"]);
    }

    #[test]
    fn output_is_sorted_and_stable() {
        let hero = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let far = Character::new("Far", "blue", c(20.0, 0.0), 100);
        let twin_a = Character::new("TwinA", "blue", c(0.0, 4.0), 100);
        let near = Character::new("Near", "blue", c(1.0, 1.0), 100);
        let twin_b = Character::new("TwinB", "blue", c(4.0, 0.0), 100);
        let field = field(vec![]);

        let threats = assess_threats(&hero, [&far, &twin_a, &near, &twin_b], &field, None);
        let names: Vec<_> = threats.iter().map(|t| t.character.name.as_str()).collect();
        assert_eq!(names, vec!["Near", "TwinA", "TwinB", "Far"]);
        assert!(
            threats
                .windows(2)
                .all(|w| w[0].threat_level >= w[1].threat_level)
        );
        assert!(
            threats
                .iter()
                .all(|t| (0.0..=100.0).contains(&t.threat_level))
        );
    }

    #[test]
    fn weapon_effectiveness_bands() {
        let unarmed = Character::new("Ada", "red", c(0.0, 0.0), 100);
        let archer = unarmed.clone().with_primary(bow());

        assert_eq!(weapon_effectiveness(&unarmed, 1.0), 90.0);
        assert_eq!(weapon_effectiveness(&archer, 1.0), 90.0);
        assert_eq!(weapon_effectiveness(&unarmed, 20.0), 10.0);
        assert_eq!(weapon_effectiveness(&unarmed, 4.0), 10.0);
        assert_eq!(weapon_effectiveness(&archer, 4.0), 80.0);
        assert_eq!(weapon_effectiveness(&archer, 8.0), 60.0);
        assert_eq!(weapon_effectiveness(&archer, 12.0), 40.0);
        assert_eq!(weapon_effectiveness(&archer, 20.0), 10.0);
    }
}
