//! Position scoring and candidate-position searches.
//!
//! # Cover
//!
//! [`is_in_cover`] is deliberately a stub that always answers `false`: the
//! battlefield has no cover model yet, so every position scores the open-ground
//! cover value. Cover and overwatch searches therefore only succeed once a
//! real cover predicate is plugged in here.
//!
//! # Bounds
//!
//! Flank and retreat candidates are confined to [`Battlefield::bounds`], which
//! defaults to the fixed `[0,100] x [0,100]` board and can be narrowed to the
//! real map extent with [`Battlefield::with_map_bounds`].

use serde::Serialize;
use tactics_core::{Battlefield, Character, Coordinate, TacticsConfig};

use crate::threat::ThreatAssessment;

const COVERED_SCORE: f64 = 70.0;
const OPEN_SCORE: f64 = 30.0;
const EXPOSURE_PER_THREAT: f64 = 25.0;
const DEFAULT_TACTICAL_VALUE: f64 = 50.0;
const OBJECTIVE_DISTANCE_WEIGHT: f64 = 2.0;

/// Minimum cover score a cover candidate must exceed.
const COVER_ACCEPT_SCORE: f64 = 60.0;
/// Exposure a cover candidate must stay below.
const COVER_ACCEPT_EXPOSURE: f64 = 40.0;

/// Score of one board position for one character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PositionEvaluation {
    pub position: Coordinate,
    /// Protection offered by the position, in `[0, 100]`.
    pub cover_score: f64,
    /// Usefulness towards the objective, in `[0, 100]`.
    pub tactical_value: f64,
    pub distance_to_objective: f64,
    /// Risk of being shot at, in `[0, 100]`.
    pub exposure_risk: f64,
}

/// Cover predicate. Always false until the map carries cover data.
pub fn is_in_cover(_position: Coordinate, _battlefield: &Battlefield) -> bool {
    false
}

/// Scores `position` against the current threats and an optional objective.
///
/// Exposure counts the threats that currently have line of sight to the
/// actor (25 points each, capped at 100).
pub fn evaluate_position(
    position: Coordinate,
    threats: &[ThreatAssessment<'_>],
    battlefield: &Battlefield,
    objective: Option<Coordinate>,
) -> PositionEvaluation {
    let cover_score = if is_in_cover(position, battlefield) {
        COVERED_SCORE
    } else {
        OPEN_SCORE
    };

    let watching = threats.iter().filter(|t| t.has_line_of_sight).count();
    let exposure_risk = (EXPOSURE_PER_THREAT * watching as f64).min(100.0);

    let (tactical_value, distance_to_objective) = match objective {
        Some(objective) => {
            let distance = position.distance(objective);
            (
                (100.0 - OBJECTIVE_DISTANCE_WEIGHT * distance).max(0.0),
                distance,
            )
        }
        None => (DEFAULT_TACTICAL_VALUE, 0.0),
    };

    PositionEvaluation {
        position,
        cover_score,
        tactical_value,
        distance_to_objective,
        exposure_risk,
    }
}

/// First walkable cell around the character that offers cover with low exposure.
///
/// Scans a square of radius [`TacticsConfig::COVER_SEARCH_RADIUS`] centered on
/// the character (column by column, the center excluded).
pub fn find_best_cover_position(
    character: &Character,
    threats: &[ThreatAssessment<'_>],
    battlefield: &Battlefield,
) -> Option<Coordinate> {
    let radius = TacticsConfig::COVER_SEARCH_RADIUS;
    let (cx, cy) = character.position.cell();

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if !battlefield.map.is_walkable(x, y) {
                continue;
            }

            let candidate = Coordinate::from_cell(x, y);
            let evaluation = evaluate_position(candidate, threats, battlefield, None);
            if evaluation.cover_score > COVER_ACCEPT_SCORE
                && evaluation.exposure_risk < COVER_ACCEPT_EXPOSURE
            {
                tracing::debug!(character = %character.name, %candidate, "found cover");
                return Some(candidate);
            }
        }
    }

    None
}

/// Point beside `target`, perpendicular to the character's approach.
///
/// Tries the +90° side first, then −90°; returns the first one inside the
/// board bounds.
pub fn find_flanking_position(
    character: &Character,
    target: Coordinate,
    battlefield: &Battlefield,
) -> Option<Coordinate> {
    let bearing = character.position.bearing_to(target);

    [
        bearing + std::f64::consts::FRAC_PI_2,
        bearing - std::f64::consts::FRAC_PI_2,
    ]
    .into_iter()
    .map(|angle| target.project(angle, TacticsConfig::FLANK_DISTANCE))
    .find(|candidate| battlefield.bounds.contains(*candidate))
}

/// Where to set up overwatch: stay put when already covered, otherwise look
/// for nearby cover.
pub fn find_best_overwatch_position(
    character: &Character,
    threats: &[ThreatAssessment<'_>],
    battlefield: &Battlefield,
) -> Option<Coordinate> {
    if is_in_cover(character.position, battlefield) {
        return Some(character.position);
    }
    find_best_cover_position(character, threats, battlefield)
}

/// Point [`TacticsConfig::RETREAT_DISTANCE`] away from the threat centroid,
/// clamped to the board bounds. `None` when there is nothing to run from.
pub fn find_retreat_position(
    character: &Character,
    threats: &[ThreatAssessment<'_>],
    battlefield: &Battlefield,
) -> Option<Coordinate> {
    if threats.is_empty() {
        return None;
    }

    let count = threats.len() as f64;
    let (sum_x, sum_y) = threats.iter().fold((0.0, 0.0), |(x, y), t| {
        (x + t.character.position.x, y + t.character.position.y)
    });
    let centroid = Coordinate::new(sum_x / count, sum_y / count);

    let away = centroid.bearing_to(character.position);
    let retreat = character
        .position
        .project(away, TacticsConfig::RETREAT_DISTANCE);

    Some(battlefield.bounds.clamp(retreat))
}
