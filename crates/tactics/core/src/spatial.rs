//! Grid geometry shared by every decision layer.
//!
//! Sight lines are rasterized with Bresenham's algorithm over integer cells.
//! Real-valued endpoints are snapped to their nearest cell first, so a
//! character caught mid-animation is treated as standing in the cell it is
//! closest to.
//!
//! # Obstruction rules
//!
//! - The start cell is never inspected.
//! - A cell whose terrain blocks sight stops the line, including the end cell.
//! - Unless characters are ignored, a living character stops the line in any
//!   cell except the end cell.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

use crate::character::Character;
use crate::coordinate::{CardinalDirection, Coordinate};
use crate::map::TacticalMap;

/// Forward reach along a cardinal facing.
const FRONT_REACH_CARDINAL: i32 = 3;
/// Per-axis reach along a diagonal facing (2√2 ≈ 2.8 cells forward).
const FRONT_REACH_DIAGONAL: i32 = 2;

/// What, if anything, interrupts a sight line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Obstruction<'a> {
    Clear,
    Wall(Coordinate),
    Character(&'a Character),
}

impl Obstruction<'_> {
    pub fn is_clear(&self) -> bool {
        matches!(self, Obstruction::Clear)
    }
}

/// Cells visited by a Bresenham line, excluding the start and including the end.
#[derive(Clone, Debug)]
pub struct RasterLine {
    x: i32,
    y: i32,
    end_x: i32,
    end_y: i32,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
}

impl RasterLine {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        let (x0, y0) = from.cell();
        let (x1, y1) = to.cell();
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            end_x: x1,
            end_y: y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx - dy,
        }
    }
}

impl Iterator for RasterLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x == self.end_x && self.y == self.end_y {
            return None;
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some((self.x, self.y))
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    a.distance(b)
}

/// Returns true when nothing interrupts the raster from `from` to `to`.
pub fn line_of_sight(
    from: Coordinate,
    to: Coordinate,
    map: &TacticalMap,
    characters: &[Character],
    ignore_characters: bool,
) -> bool {
    first_obstruction(from, to, map, characters, ignore_characters).is_clear()
}

/// Returns the first wall or living character on the raster from `from` to `to`.
pub fn detect_blocking_entity<'a>(
    from: Coordinate,
    to: Coordinate,
    map: &TacticalMap,
    characters: &'a [Character],
) -> Obstruction<'a> {
    first_obstruction(from, to, map, characters, false)
}

fn first_obstruction<'a>(
    from: Coordinate,
    to: Coordinate,
    map: &TacticalMap,
    characters: &'a [Character],
    ignore_characters: bool,
) -> Obstruction<'a> {
    let target = to.cell();

    for (x, y) in RasterLine::new(from, to) {
        if map.blocks_sight(x, y) {
            tracing::trace!(x, y, "sight line blocked by terrain");
            return Obstruction::Wall(Coordinate::from_cell(x, y));
        }

        if ignore_characters || (x, y) == target {
            continue;
        }

        if let Some(blocker) = characters
            .iter()
            .find(|c| c.is_alive() && c.position.cell() == (x, y))
        {
            tracing::trace!(x, y, blocker = %blocker.name, "sight line blocked by character");
            return Obstruction::Character(blocker);
        }
    }

    Obstruction::Clear
}

/// Maps a bearing in radians to the compass direction whose 45° sector contains it.
///
/// Sectors are centered on their direction, so east covers `(-22.5°, 22.5°)`.
pub fn angle_to_direction(angle: f64) -> CardinalDirection {
    let normalized = angle.rem_euclid(TAU);
    let sector = ((normalized + FRAC_PI_8) / FRAC_PI_4).floor() as usize % 8;
    CardinalDirection::COUNTER_CLOCKWISE[sector]
}

/// Point a few cells ahead of the character along its facing.
pub fn position_in_front(character: &Character) -> Coordinate {
    let (dx, dy) = character.facing.offset();
    let reach = if character.facing.is_diagonal() {
        FRONT_REACH_DIAGONAL
    } else {
        FRONT_REACH_CARDINAL
    };
    character
        .position
        .offset(f64::from(dx * reach), f64::from(dy * reach))
}

/// Free, walkable cells within `max_distance` of `target` that can see it.
///
/// Characters are ignored for the sight check so a crowded line does not hide
/// an otherwise good firing spot. Results are ordered by distance from `from`,
/// nearest first.
pub fn find_line_of_sight_positions(
    from: Coordinate,
    target: Coordinate,
    map: &TacticalMap,
    characters: &[Character],
    max_distance: f64,
) -> Vec<Coordinate> {
    let radius = max_distance.ceil() as i32;
    let (tx, ty) = target.cell();
    let mut positions = Vec::new();

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let (x, y) = (tx + dx, ty + dy);
            let candidate = Coordinate::from_cell(x, y);

            if candidate.distance(target) > max_distance || !map.is_walkable(x, y) {
                continue;
            }

            let occupied = characters
                .iter()
                .any(|c| c.is_alive() && c.position.cell() == (x, y));
            if occupied {
                continue;
            }

            if line_of_sight(candidate, target, map, characters, true) {
                positions.push(candidate);
            }
        }
    }

    positions.sort_by(|a, b| a.distance(from).total_cmp(&b.distance(from)));
    tracing::trace!(%target, found = positions.len(), "line-of-sight positions");
    positions
}
