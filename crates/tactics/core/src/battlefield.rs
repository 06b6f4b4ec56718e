//! Battlefield snapshot handed to every decision cycle.

use crate::character::Character;
use crate::config::{BoardBounds, TacticsConfig};
use crate::coordinate::Coordinate;
use crate::faction::{FactionRelations, FactionTable};
use crate::map::TacticalMap;

/// Read-only view of the map, every character on it, and faction relations.
#[derive(Clone, Debug)]
pub struct Battlefield {
    pub map: TacticalMap,
    pub characters: Vec<Character>,
    pub factions: FactionTable,
    pub bounds: BoardBounds,
}

impl Battlefield {
    /// Creates a snapshot using the default board bounds.
    pub fn new(map: TacticalMap, characters: Vec<Character>, factions: FactionTable) -> Self {
        Self {
            map,
            characters,
            factions,
            bounds: TacticsConfig::default().board_bounds,
        }
    }

    pub fn with_bounds(mut self, bounds: BoardBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replaces the default bounds with the real map extent.
    pub fn with_map_bounds(mut self) -> Self {
        self.bounds = BoardBounds::from_map(&self.map);
        self
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn are_allied(&self, a: &Character, b: &Character) -> bool {
        self.factions.are_allied(a, b)
    }

    /// First living character standing in the cell that contains `position`.
    pub fn living_character_at(&self, position: Coordinate) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.is_alive() && c.position.same_cell(position))
    }

    /// Living allies of `character` within `radius`, excluding the character itself.
    pub fn allies_within<'a>(
        &'a self,
        character: &'a Character,
        radius: f64,
    ) -> impl Iterator<Item = &'a Character> + 'a {
        self.characters.iter().filter(move |other| {
            other.name != character.name
                && other.is_alive()
                && self.are_allied(character, other)
                && character.distance_to(other) <= radius
        })
    }
}
