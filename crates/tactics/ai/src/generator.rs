//! Candidate action generation (final stage of a decision cycle).
//!
//! The generator branches on the directive's [`Stance`] and proposes a set of
//! scored [`TacticalAction`]s. It never picks one: the caller applies its own
//! selection policy (usually highest priority) and dispatches the winner.
//!
//! # Branches
//!
//! | stance        | proposals                                                  |
//! |---------------|------------------------------------------------------------|
//! | aggressive    | melee / ranged attack, seek a clear shot, close distance   |
//! | defensive     | seek cover when exposed, hold and shoot, overwatch         |
//! | flanking      | move to a flank, attack once there                         |
//! | suppressive   | move to overwatch position, overwatch                      |
//! | retreating    | fall back away from threats, fighting retreat              |
//! | unrecognized  | defensive, but only when threats exist                     |
//!
//! Two proposals are layered on top of any stance:
//!
//! - **Retreat override**: at or below the directive's retreat threshold the
//!   retreating branch is appended (unless it already ran).
//! - **Coordination**: with no threat within 10 units, a speech action
//!   addressed to a living ally within 3 units.

use rand::Rng;
use tactics_core::{Battlefield, Character, Coordinate, TacticsConfig, spatial};

use crate::action::{AREA_TARGET, Location, TacticalAction};
use crate::directive::{Stance, TacticalDirective};
use crate::position::{
    PositionEvaluation, find_best_cover_position, find_best_overwatch_position,
    find_flanking_position, find_retreat_position,
};
use crate::threat::ThreatAssessment;
use crate::turn_log::TurnActionLog;

/// Priority table for every proposal the generator can make.
pub mod priority {
    // Aggressive
    pub const MELEE_ATTACK: u32 = 90;
    pub const RANGED_ATTACK_BASE: u32 = 80;
    pub const RANGED_WEAPON_BONUS: u32 = 20;
    pub const LONG_RANGE_PENALTY: u32 = 10;
    pub const SEEK_CLEAR_SHOT: u32 = 85;
    pub const ADVANCE_FAR: u32 = 75;
    pub const ADVANCE_NEAR: u32 = 60;

    // Defensive
    pub const TAKE_COVER: u32 = 85;
    pub const HOLD_ATTACK_CLOSE: u32 = 80;
    pub const HOLD_ATTACK_FAR: u32 = 70;
    pub const APPROACH_UNSEEN: u32 = 75;
    pub const REPOSITION_FOR_SIGHT: u32 = 60;
    pub const DEFENSIVE_OVERWATCH: u32 = 50;

    // Flanking
    pub const FLANK_MOVE: u32 = 80;
    pub const FLANK_ATTACK: u32 = 85;

    // Suppressive
    pub const OVERWATCH_MOVE: u32 = 70;
    pub const SUPPRESSIVE_OVERWATCH: u32 = 80;

    // Retreating
    pub const RETREAT_MOVE: u32 = 95;
    pub const FIGHTING_RETREAT: u32 = 60;

    // Shared
    pub const PATROL: u32 = 40;
    pub const COORDINATION: u32 = 30;
}

/// Exposure above which a defensive character looks for cover.
const COVER_EXPOSURE_THRESHOLD: f64 = 60.0;
/// Beyond this distance a ranged attack loses priority.
const LONG_RANGE: f64 = 10.0;
/// A defensive attack at or inside this distance gets the higher priority.
const CLOSE_RANGE: f64 = 5.0;
/// Advancing is more urgent beyond this distance.
const ADVANCE_URGENT_DISTANCE: f64 = 5.0;
/// A fighting retreat only trades shots with threats this close.
const FIGHTING_RETREAT_RANGE: f64 = 5.0;

/// Proposes candidate actions for `character` under `directive`.
///
/// `threats` must be the ranked output of [`crate::assess_threats`]; the first
/// entry is the primary threat. `current_position` is the evaluation of the
/// character's own position. `rng` is only drawn from for patrol jitter.
///
/// The returned set is unordered and may be empty.
pub fn generate_actions<R: Rng + ?Sized>(
    character: &Character,
    threats: &[ThreatAssessment<'_>],
    current_position: &PositionEvaluation,
    directive: &TacticalDirective,
    battlefield: &Battlefield,
    turn_log: &TurnActionLog,
    rng: &mut R,
) -> Vec<TacticalAction> {
    let mut planner = Planner {
        character,
        threats,
        current_position,
        directive,
        battlefield,
        turn_log,
        actions: Vec::new(),
    };

    let stance = directive.stance();
    tracing::debug!(
        character = %character.name,
        %stance,
        threats = threats.len(),
        "generating tactical actions"
    );

    match stance {
        Stance::Aggressive => planner.aggressive(rng),
        Stance::Defensive => planner.defensive(),
        Stance::Flanking => planner.flanking(rng),
        Stance::Suppressive => planner.suppressive(),
        Stance::Retreating => planner.retreating(),
        Stance::Unrecognized => {
            if !threats.is_empty() {
                planner.defensive();
            }
        }
    }

    if stance != Stance::Retreating
        && character.health_ratio() <= directive.tactics.retreat_threshold
    {
        tracing::debug!(
            character = %character.name,
            health = character.health,
            threshold = directive.tactics.retreat_threshold,
            "health below retreat threshold, adding retreat override"
        );
        planner.retreating();
    }

    planner.coordinate();

    tracing::debug!(
        character = %character.name,
        candidates = planner.actions.len(),
        "generated tactical actions"
    );

    planner.actions
}

/// Working state for one generation pass.
struct Planner<'a, 't> {
    character: &'a Character,
    threats: &'a [ThreatAssessment<'t>],
    current_position: &'a PositionEvaluation,
    directive: &'a TacticalDirective,
    battlefield: &'a Battlefield,
    turn_log: &'a TurnActionLog,
    actions: Vec<TacticalAction>,
}

impl<'t> Planner<'_, 't> {
    fn primary(&self) -> Option<&ThreatAssessment<'t>> {
        self.threats.first()
    }

    fn nearest(&self) -> Option<&ThreatAssessment<'t>> {
        self.threats
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn name(&self) -> &str {
        &self.character.name
    }

    fn push_move(&mut self, location: Location, priority: u32, reasoning: String) {
        let action = TacticalAction::movement(self.name(), location, priority, reasoning);
        self.actions.push(action);
    }

    fn push_attack(&mut self, target: &str, priority: u32, reasoning: String) {
        let action = TacticalAction::attack(self.name(), target, priority, reasoning);
        self.actions.push(action);
    }

    fn push_overwatch(&mut self, target: &str, priority: u32, reasoning: String) {
        let action = TacticalAction::overwatch(self.name(), target, priority, reasoning);
        self.actions.push(action);
    }

    /// Nearest free cell that can see `target`, if any.
    fn clear_shot_position(&self, target: Coordinate) -> Option<Coordinate> {
        spatial::find_line_of_sight_positions(
            self.character.position,
            target,
            &self.battlefield.map,
            &self.battlefield.characters,
            TacticsConfig::LINE_OF_SIGHT_SEARCH_DISTANCE,
        )
        .into_iter()
        .next()
    }

    // ------------------------------------------------------------------------
    // Stance branches
    // ------------------------------------------------------------------------

    fn aggressive<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(threat) = self.primary() else {
            self.patrol(rng);
            return;
        };
        let target = threat.character.name.clone();
        let target_position = threat.character.position;
        let distance = threat.distance;
        let has_line_of_sight = threat.has_line_of_sight;

        if distance <= TacticsConfig::MELEE_RANGE {
            self.push_attack(
                &target,
                priority::MELEE_ATTACK,
                format!("{target} is within melee reach"),
            );
        } else if has_line_of_sight {
            let mut priority = priority::RANGED_ATTACK_BASE;
            if self.character.has_ranged_weapon() {
                priority += priority::RANGED_WEAPON_BONUS;
            }
            if distance > LONG_RANGE {
                priority -= priority::LONG_RANGE_PENALTY;
            }
            self.push_attack(
                &target,
                priority,
                format!("clear shot at {target} ({distance:.1} away)"),
            );
        } else if distance <= TacticsConfig::SEEK_SHOT_RANGE {
            if let Some(spot) = self.clear_shot_position(target_position) {
                self.push_move(
                    Location::Cell(spot),
                    priority::SEEK_CLEAR_SHOT,
                    format!("moving to {} for a clear shot at {target}", spot.to_cell_literal()),
                );
            }
        }

        let advance = if distance > ADVANCE_URGENT_DISTANCE {
            priority::ADVANCE_FAR
        } else {
            priority::ADVANCE_NEAR
        };
        self.push_move(
            Location::Character(target.clone()),
            advance,
            format!("pressing the attack on {target}"),
        );
    }

    fn defensive(&mut self) {
        if self.current_position.exposure_risk > COVER_EXPOSURE_THRESHOLD {
            if let Some(cover) =
                find_best_cover_position(self.character, self.threats, self.battlefield)
            {
                self.push_move(
                    Location::Cell(cover),
                    priority::TAKE_COVER,
                    format!(
                        "exposure {:.0} is too high, taking cover",
                        self.current_position.exposure_risk
                    ),
                );
            }
        }

        let primary = self.primary().map(|threat| {
            (
                threat.character.name.clone(),
                threat.character.position,
                threat.distance,
                threat.has_line_of_sight,
            )
        });

        if let Some((target, target_position, distance, has_line_of_sight)) = &primary {
            let distance = *distance;
            if *has_line_of_sight {
                let priority = if distance <= CLOSE_RANGE {
                    priority::HOLD_ATTACK_CLOSE
                } else {
                    priority::HOLD_ATTACK_FAR
                };
                self.push_attack(
                    target,
                    priority,
                    format!("holding position and engaging {target}"),
                );
            } else {
                self.push_move(
                    Location::Character(target.clone()),
                    priority::APPROACH_UNSEEN,
                    format!("{target} is out of sight, closing in carefully"),
                );
                if distance > LONG_RANGE {
                    if let Some(spot) = self.clear_shot_position(*target_position) {
                        self.push_move(
                            Location::Cell(spot),
                            priority::REPOSITION_FOR_SIGHT,
                            format!("repositioning to {} to watch {target}", spot.to_cell_literal()),
                        );
                    }
                }
            }
        }

        if !self.turn_log.has_attacked(self.name())
            && self.character.action_points >= TacticsConfig::OVERWATCH_ACTION_POINTS
        {
            let target = primary
                .as_ref()
                .map_or(AREA_TARGET, |(target, ..)| target.as_str())
                .to_string();
            self.push_overwatch(
                &target,
                priority::DEFENSIVE_OVERWATCH,
                format!("no attack yet this turn, watching {target}"),
            );
        }
    }

    fn flanking<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(threat) = self.primary() else {
            self.patrol(rng);
            return;
        };
        let target = threat.character.name.clone();
        let has_line_of_sight = threat.has_line_of_sight;

        let Some(flank) =
            find_flanking_position(self.character, threat.character.position, self.battlefield)
        else {
            tracing::debug!(character = %self.character.name, %target, "no flank position in bounds");
            return;
        };

        if self.character.position.distance(flank) > TacticsConfig::ARRIVAL_TOLERANCE {
            self.push_move(
                Location::Cell(flank),
                priority::FLANK_MOVE,
                format!("flanking {target} via {}", flank.to_cell_literal()),
            );
        } else if has_line_of_sight {
            self.push_attack(
                &target,
                priority::FLANK_ATTACK,
                format!("in flanking position, attacking {target}"),
            );
        }
    }

    fn suppressive(&mut self) {
        if let Some(spot) =
            find_best_overwatch_position(self.character, self.threats, self.battlefield)
        {
            if self.character.position.distance(spot) > TacticsConfig::ARRIVAL_TOLERANCE {
                self.push_move(
                    Location::Cell(spot),
                    priority::OVERWATCH_MOVE,
                    format!("moving to overwatch position {}", spot.to_cell_literal()),
                );
            }
        }

        let target = self
            .primary()
            .map_or(AREA_TARGET, |threat| threat.character.name.as_str())
            .to_string();
        self.push_overwatch(
            &target,
            priority::SUPPRESSIVE_OVERWATCH,
            format!("laying down suppressive fire on {target}"),
        );
    }

    fn retreating(&mut self) {
        if let Some(retreat) = find_retreat_position(self.character, self.threats, self.battlefield)
        {
            let health_pct = self.character.health_ratio() * 100.0;
            self.push_move(
                Location::Cell(retreat),
                priority::RETREAT_MOVE,
                format!(
                    "falling back to {} at {health_pct:.0}% health",
                    retreat.to_cell_literal()
                ),
            );
        }

        let nearest = self
            .nearest()
            .filter(|threat| threat.distance <= FIGHTING_RETREAT_RANGE)
            .map(|threat| threat.character.name.clone());
        if let Some(target) = nearest {
            self.push_attack(
                &target,
                priority::FIGHTING_RETREAT,
                format!("fighting retreat against {target}"),
            );
        }
    }

    // ------------------------------------------------------------------------
    // Shared proposals
    // ------------------------------------------------------------------------

    fn patrol<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (destination, reasoning) = match self.directive.position {
            Some(position) => (
                position,
                format!("no threats, patrolling toward {}", position.to_cell_literal()),
            ),
            None => {
                let jitter = TacticsConfig::PATROL_JITTER;
                let wander = self.character.position.offset(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                );
                (
                    self.battlefield.bounds.clamp(wander),
                    "no threats and no objective, wandering".to_string(),
                )
            }
        };
        self.push_move(Location::Cell(destination), priority::PATROL, reasoning);
    }

    fn coordinate(&mut self) {
        let threat_near = self
            .nearest()
            .is_some_and(|threat| threat.distance <= TacticsConfig::COORDINATION_THREAT_DISTANCE);
        if threat_near {
            return;
        }

        let Some(ally) = self
            .battlefield
            .allies_within(self.character, TacticsConfig::COORDINATION_RADIUS)
            .next()
        else {
            return;
        };

        let action = TacticalAction::speech(
            self.name(),
            format!("{}, stay close and watch my back.", ally.name),
            priority::COORDINATION,
            format!("coordinating with {} nearby", ally.name),
        );
        self.actions.push(action);
    }
}
