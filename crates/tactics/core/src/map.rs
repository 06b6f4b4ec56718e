//! Static battlefield layout.
//!
//! The map is a dense grid of [`StaticTile`]s indexed by integer cell. Only
//! terrain lives here; characters are tracked separately on the
//! [`crate::Battlefield`].

/// Errors raised while building a [`TacticalMap`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile glyph '{glyph}' at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("expected {expected} tiles for a {width}x{height} map, found {found}")]
    TileCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }
}

/// Canonical terrain classes for map tiles.
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
pub enum TerrainKind {
    #[default]
    Floor,
    /// Blocks both movement and sight.
    Wall,
    /// Blocks movement, sight passes over it.
    Water,
}

impl TerrainKind {
    pub fn blocks_sight(self) -> bool {
        matches!(self, TerrainKind::Wall)
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    /// ASCII glyph used by scenario files and debug dumps.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Floor => '.',
            TerrainKind::Wall => '#',
            TerrainKind::Water => '~',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainKind::Floor),
            '#' => Some(TerrainKind::Wall),
            '~' => Some(TerrainKind::Water),
            _ => None,
        }
    }
}

/// Immutable descriptor for one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn blocks_sight(self) -> bool {
        self.terrain.blocks_sight()
    }

    pub fn is_walkable(self) -> bool {
        self.terrain.is_walkable()
    }
}

/// Dense tile grid. Row `y` of the backing vector holds cells `(0..width, y)`.
///
/// Only serializable; build maps through [`TacticalMap::from_rows`] or
/// [`TacticalMap::from_tiles`] so the tile count always matches the dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TacticalMap {
    dimensions: MapDimensions,
    tiles: Vec<StaticTile>,
}

impl TacticalMap {
    /// Creates an open map where every cell is floor.
    pub fn open(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        let tiles = vec![StaticTile::default(); width as usize * height as usize];
        Self { dimensions, tiles }
    }

    pub fn from_tiles(
        width: u32,
        height: u32,
        tiles: Vec<StaticTile>,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(MapError::TileCountMismatch {
                width,
                height,
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            dimensions: MapDimensions::new(width, height),
            tiles,
        })
    }

    /// Parses an ASCII layout (`.` floor, `#` wall, `~` water).
    ///
    /// The first row is `y = 0`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain =
                    TerrainKind::from_glyph(glyph).ok_or(MapError::UnknownGlyph { glyph, x, y })?;
                tiles.push(StaticTile::new(terrain));
            }
        }

        Self::from_tiles(width as u32, rows.len() as u32, tiles)
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.dimensions.contains(x, y)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<StaticTile> {
        if !self.contains(x, y) {
            return None;
        }
        let index = y as usize * self.dimensions.width as usize + x as usize;
        self.tiles.get(index).copied()
    }

    /// Replaces the terrain of one cell; out-of-bounds writes are ignored.
    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: TerrainKind) {
        if !self.contains(x, y) {
            return;
        }
        let index = y as usize * self.dimensions.width as usize + x as usize;
        self.tiles[index] = StaticTile::new(terrain);
    }

    /// Cells outside the map never block sight.
    pub fn blocks_sight(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(StaticTile::blocks_sight)
    }

    /// Cells outside the map are never walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(StaticTile::is_walkable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ascii_rows() {
        let map = TacticalMap::from_rows(&["..#", "~.."]).unwrap();
        assert_eq!(map.dimensions(), MapDimensions::new(3, 2));
        assert!(map.blocks_sight(2, 0));
        assert!(!map.is_walkable(2, 0));
        assert!(!map.blocks_sight(0, 1));
        assert!(!map.is_walkable(0, 1));
        assert!(map.is_walkable(1, 1));
    }

    #[test]
    fn out_of_bounds_is_transparent_but_unwalkable() {
        let map = TacticalMap::open(4, 4);
        assert!(!map.blocks_sight(-1, 2));
        assert!(!map.is_walkable(4, 0));
        assert_eq!(map.tile(0, 9), None);
    }

    #[test]
    fn rejects_ragged_rows_and_unknown_glyphs() {
        assert_eq!(
            TacticalMap::from_rows(&["...", ".."]),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            TacticalMap::from_rows(&[".x."]),
            Err(MapError::UnknownGlyph {
                glyph: 'x',
                x: 1,
                y: 0
            })
        );
        assert_eq!(TacticalMap::from_rows::<&str>(&[]), Err(MapError::Empty));
    }

    #[test]
    fn set_terrain_updates_single_cell() {
        let mut map = TacticalMap::open(3, 3);
        map.set_terrain(1, 1, TerrainKind::Wall);
        map.set_terrain(7, 7, TerrainKind::Wall);
        assert!(map.blocks_sight(1, 1));
        assert!(!map.blocks_sight(0, 1));
    }
}
