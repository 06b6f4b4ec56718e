//! One full decision cycle for one character.
//!
//! Runs the three stages in order and keeps every intermediate result so the
//! caller can log or display why a proposal was made:
//!
//! 1. [`assess_threats`] ranks the visible hostiles.
//! 2. [`evaluate_position`] scores where the character stands now.
//! 3. [`generate_actions`] proposes candidate actions.

use rand::Rng;
use tactics_core::{Battlefield, Character};

use crate::action::{TacticalAction, highest_priority};
use crate::directive::TacticalDirective;
use crate::generator::generate_actions;
use crate::position::{PositionEvaluation, evaluate_position};
use crate::threat::{ThreatAssessment, assess_threats};
use crate::turn_log::TurnActionLog;

/// Everything one decision cycle produced.
#[derive(Clone, Debug)]
pub struct DecisionReport<'a> {
    pub threats: Vec<ThreatAssessment<'a>>,
    pub position: PositionEvaluation,
    pub actions: Vec<TacticalAction>,
}

impl DecisionReport<'_> {
    /// The highest-priority candidate, if any was proposed.
    pub fn best_action(&self) -> Option<&TacticalAction> {
        highest_priority(&self.actions)
    }
}

/// Runs a decision cycle for `character` against the characters it can see.
pub fn decide<'a, R: Rng + ?Sized>(
    character: &Character,
    visible: impl IntoIterator<Item = &'a Character>,
    battlefield: &Battlefield,
    directive: &TacticalDirective,
    turn_log: &TurnActionLog,
    rng: &mut R,
) -> DecisionReport<'a> {
    let span = tracing::debug_span!("decide", character = %character.name);
    let _guard = span.enter();

    let threats = assess_threats(character, visible, battlefield, Some(directive));
    let position = evaluate_position(character.position, &threats, battlefield, directive.position);
    let actions = generate_actions(
        character,
        &threats,
        &position,
        directive,
        battlefield,
        turn_log,
        rng,
    );

    DecisionReport {
        threats,
        position,
        actions,
    }
}

/// Every other character on the battlefield; the default visibility set when
/// no perception layer narrows it down.
pub fn others<'a>(
    character: &'a Character,
    battlefield: &'a Battlefield,
) -> impl Iterator<Item = &'a Character> + 'a {
    battlefield
        .characters
        .iter()
        .filter(move |other| other.name != character.name)
}
