//! Per-turn record of executed actions.
//!
//! The log is owned by the caller: it records each action after dispatching
//! it and clears the log when a new game turn begins. The decision engine only
//! reads it (to know, for example, whether a character already attacked).

use std::collections::HashMap;

use crate::action::ActionType;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnActionLog {
    entries: HashMap<String, Vec<ActionType>>,
}

impl TurnActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, character: impl Into<String>, action: ActionType) {
        self.entries.entry(character.into()).or_default().push(action);
    }

    /// Actions executed by `character` this turn, oldest first.
    pub fn actions_for(&self, character: &str) -> &[ActionType] {
        self.entries.get(character).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_attacked(&self, character: &str) -> bool {
        self.actions_for(character).contains(&ActionType::Attack)
    }

    /// Clears every entry; call at the start of a game turn.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
