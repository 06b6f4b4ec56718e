//! Tactical decision making for turn-based characters.
//!
//! Each decision cycle takes a read-only [`tactics_core::Battlefield`] snapshot,
//! the acting character and its [`TacticalDirective`], and proposes a set of
//! scored [`TacticalAction`]s. The engine never executes anything: the caller
//! picks a candidate and hands its command payload to whatever moves pieces.
//!
//! Modules are organized by pipeline stage:
//! - [`threat`] ranks visible hostiles
//! - [`position`] scores positions and searches for cover, flank and retreat spots
//! - [`generator`] branches on stance and proposes candidate actions
//! - [`decision`] runs the three stages as one call
//! - [`directive`], [`action`] and [`turn_log`] hold the data flowing between them
//! - [`scenario`] loads RON scenario files for offline runs
pub mod action;
pub mod decision;
pub mod directive;
pub mod generator;
pub mod position;
pub mod scenario;
pub mod threat;
pub mod turn_log;

pub use action::{
    AREA_TARGET, ActionType, AttackOrder, Command, Location, MoveOrder, OVERWATCH_ATTACK,
    TacticalAction, highest_priority,
};
pub use decision::{DecisionReport, decide, others};
pub use directive::{EngagementRange, Objective, Stance, TacticalDirective, Tactics};
pub use generator::generate_actions;
pub use position::{
    PositionEvaluation, evaluate_position, find_best_cover_position, find_best_overwatch_position,
    find_flanking_position, find_retreat_position, is_in_cover,
};
pub use scenario::{Scenario, ScenarioError};
pub use threat::{ThreatAssessment, assess_threats, weapon_effectiveness};
pub use turn_log::TurnActionLog;
