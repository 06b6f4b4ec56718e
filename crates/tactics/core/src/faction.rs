//! Faction relations.
//!
//! Who fights whom is decided outside the decision engine. The engine asks a
//! [`FactionRelations`] implementation and never inspects faction labels itself.

use std::collections::{BTreeMap, BTreeSet};

use crate::character::Character;

/// Predicate deciding whether two characters are on the same side.
pub trait FactionRelations {
    fn are_allied(&self, a: &Character, b: &Character) -> bool;
}

/// Table-driven relations: characters of the same faction are always allied,
/// and declared alliances are symmetric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FactionTable {
    alliances: BTreeMap<String, BTreeSet<String>>,
}

impl FactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `a` and `b` allied (in both directions).
    pub fn ally(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        self.alliances
            .entry(a.clone())
            .or_default()
            .insert(b.clone());
        self.alliances.entry(b).or_default().insert(a);
    }

    /// Builder form of [`FactionTable::ally`].
    pub fn with_alliance(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.ally(a, b);
        self
    }

    pub fn factions_allied(&self, a: &str, b: &str) -> bool {
        a == b
            || self.alliances.get(a).is_some_and(|allies| allies.contains(b))
            || self.alliances.get(b).is_some_and(|allies| allies.contains(a))
    }
}

impl FactionRelations for FactionTable {
    fn are_allied(&self, a: &Character, b: &Character) -> bool {
        self.factions_allied(&a.faction, &b.faction)
    }
}
