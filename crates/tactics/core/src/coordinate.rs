//! Board coordinates and compass directions.
//!
//! Positions are real-valued because characters can sit between cells while an
//! animation is in flight. Anything that touches the grid (rasterization, tile
//! lookup, occupancy) goes through [`Coordinate::cell`], which snaps to the
//! nearest integer cell.

use std::fmt;
use std::str::FromStr;

/// A point on the battlefield, passed by value and never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a coordinate centered on an integer grid cell.
    pub const fn from_cell(x: i32, y: i32) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Coordinate) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from `self` towards `other` in radians (`atan2(dy, dx)`).
    pub fn bearing_to(self, other: Coordinate) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point reached by travelling `length` units along `bearing`.
    pub fn project(self, bearing: f64, length: f64) -> Coordinate {
        Coordinate::new(
            self.x + bearing.cos() * length,
            self.y + bearing.sin() * length,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Coordinate {
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// Nearest integer grid cell.
    pub fn cell(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    /// Returns true when both coordinates snap to the same grid cell.
    pub fn same_cell(self, other: Coordinate) -> bool {
        self.cell() == other.cell()
    }

    /// Renders the coordinate as the `"x,y"` cell literal understood by the
    /// external movement resolver.
    pub fn to_cell_literal(self) -> String {
        let (x, y) = self.cell();
        format!("{x},{y}")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Error returned when a `"x,y"` literal cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateParseError {
    #[error("coordinate '{0}' is missing the ',' separator")]
    MissingSeparator(String),

    #[error("coordinate component '{0}' is not a number")]
    InvalidComponent(String),
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(s.to_string()))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| CoordinateParseError::InvalidComponent(part.trim().to_string()))
        };

        Ok(Coordinate::new(parse(x)?, parse(y)?))
    }
}

// ============================================================================
// Cardinal Direction
// ============================================================================

/// One of the eight compass directions a character can face.
///
/// Coordinate system: Y-axis increases upward (north), X-axis increases rightward (east).
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
pub enum CardinalDirection {
    North,
    NorthEast,
    #[default]
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CardinalDirection {
    /// Directions in counter-clockwise order starting from east (bearing 0).
    pub const COUNTER_CLOCKWISE: [CardinalDirection; 8] = [
        CardinalDirection::East,
        CardinalDirection::NorthEast,
        CardinalDirection::North,
        CardinalDirection::NorthWest,
        CardinalDirection::West,
        CardinalDirection::SouthWest,
        CardinalDirection::South,
        CardinalDirection::SouthEast,
    ];

    /// Returns the unit offset (dx, dy) for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
            CardinalDirection::NorthEast => (1, 1),
            CardinalDirection::NorthWest => (-1, 1),
            CardinalDirection::SouthEast => (1, -1),
            CardinalDirection::SouthWest => (-1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }
}
