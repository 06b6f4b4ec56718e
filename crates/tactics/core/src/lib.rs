//! Battlefield data model and grid geometry for tactical decision making.
//!
//! `tactics-core` defines the read-only snapshot types a decision cycle
//! consumes (characters, map, faction relations) together with the pure
//! geometry primitives every scoring layer builds on. Nothing in this crate
//! mutates the battlefield or performs I/O.
pub mod battlefield;
pub mod character;
pub mod config;
pub mod coordinate;
pub mod faction;
pub mod map;
pub mod spatial;

pub use battlefield::Battlefield;
pub use character::{Character, Loadout, Weapon, WeaponCategory};
pub use config::{BoardBounds, BoundsError, TacticsConfig};
pub use coordinate::{CardinalDirection, Coordinate, CoordinateParseError};
pub use faction::{FactionRelations, FactionTable};
pub use map::{MapDimensions, MapError, StaticTile, TacticalMap, TerrainKind};
pub use spatial::{Obstruction, RasterLine};
