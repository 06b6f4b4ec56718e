use crate::coordinate::Coordinate;
use crate::map::TacticalMap;

/// Tactical tuning constants and runtime-tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    /// Rectangle that flank and retreat positions are confined to.
    pub board_bounds: BoardBounds,
}

impl TacticsConfig {
    // ===== distances (board units) =====
    /// Anything at or inside this distance is in melee reach.
    pub const MELEE_RANGE: f64 = 1.5;
    /// Half-width of the square scanned for cover around a character.
    pub const COVER_SEARCH_RADIUS: i32 = 5;
    /// Distance from the target at which flank candidates are placed.
    pub const FLANK_DISTANCE: f64 = 5.0;
    /// How far a retreat moves away from the threat centroid.
    pub const RETREAT_DISTANCE: f64 = 8.0;
    /// Default radius for line-of-sight position searches.
    pub const LINE_OF_SIGHT_SEARCH_DISTANCE: f64 = 8.0;
    /// Maximum range at which a clear-shot position is worth seeking.
    pub const SEEK_SHOT_RANGE: f64 = 15.0;
    /// Allies closer than this can be addressed for coordination.
    pub const COORDINATION_RADIUS: f64 = 3.0;
    /// Coordination is only attempted when no threat is closer than this.
    pub const COORDINATION_THREAT_DISTANCE: f64 = 10.0;
    /// Maximum per-axis offset of a random patrol step.
    pub const PATROL_JITTER: f64 = 5.0;
    /// A move shorter than this counts as already being in position.
    pub const ARRIVAL_TOLERANCE: f64 = 1.0;

    // ===== action economy =====
    /// Action points required before overwatch is offered.
    pub const OVERWATCH_ACTION_POINTS: u32 = 40;

    pub fn new() -> Self {
        Self {
            board_bounds: BoardBounds::LEGACY,
        }
    }

    pub fn with_board_bounds(board_bounds: BoardBounds) -> Self {
        Self { board_bounds }
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned for a bounds rectangle with an empty or inverted axis.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("invalid board bounds: min ({min_x}, {min_y}) must be below max ({max_x}, {max_y})")]
pub struct BoundsError {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Inclusive axis-aligned rectangle positions are clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoardBounds {
    /// Fixed `[0,100] x [0,100]` board used when no map bounds are supplied.
    pub const LEGACY: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 100.0,
        max_y: 100.0,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, BoundsError> {
        if min_x < max_x && min_y < max_y {
            Ok(Self {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        } else {
            Err(BoundsError {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        }
    }

    /// Bounds covering exactly the cells of `map`.
    pub fn from_map(map: &TacticalMap) -> Self {
        let dimensions = map.dimensions();
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: f64::from(dimensions.width.saturating_sub(1)),
            max_y: f64::from(dimensions.height.saturating_sub(1)),
        }
    }

    pub fn contains(&self, position: Coordinate) -> bool {
        (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_y..=self.max_y).contains(&position.y)
    }

    pub fn clamp(&self, position: Coordinate) -> Coordinate {
        Coordinate::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y.clamp(self.min_y, self.max_y),
        )
    }
}

impl Default for BoardBounds {
    fn default() -> Self {
        Self::LEGACY
    }
}
