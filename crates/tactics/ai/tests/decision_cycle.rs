use std::io::Write;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tactics_ai::{
    ActionType, Command, Objective, Scenario, Stance, TacticalAction, TacticalDirective,
    TurnActionLog, decide, find_retreat_position, others,
};
use tactics_core::{Battlefield, Character, Coordinate, FactionTable, TacticalMap};

fn at(x: f64, y: f64) -> Coordinate {
    Coordinate::new(x, y)
}

fn battlefield(characters: Vec<Character>) -> Battlefield {
    Battlefield::new(TacticalMap::open(100, 100), characters, FactionTable::new())
}

fn run(field: &Battlefield, name: &str, directive: &TacticalDirective) -> Vec<TacticalAction> {
    let character = field.character(name).expect("character on battlefield");
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    decide(
        character,
        others(character, field),
        field,
        directive,
        &TurnActionLog::new(),
        &mut rng,
    )
    .actions
}

fn contains(actions: &[TacticalAction], kind: ActionType, priority: u32) -> bool {
    actions
        .iter()
        .any(|action| action.kind == kind && action.priority == priority)
}

#[test]
fn aggressive_attacks_adjacent_threat() {
    let field = battlefield(vec![
        Character::new("Ada", "red", at(10.0, 10.0), 100),
        Character::new("Vex", "blue", at(11.0, 10.0), 100),
    ]);
    let directive = TacticalDirective::new(Objective::Attack, Stance::Aggressive);

    let actions = run(&field, "Ada", &directive);
    assert!(contains(&actions, ActionType::Attack, 90));
}

#[test]
fn defensive_attack_and_overwatch() {
    let field = battlefield(vec![
        Character::new("Ada", "red", at(0.0, 0.0), 100).with_action_points(40),
        Character::new("Vex", "blue", at(3.0, 0.0), 100),
    ]);
    let directive = TacticalDirective::new(Objective::Defend, Stance::Defensive);

    let character = field.character("Ada").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let report = decide(
        character,
        others(character, &field),
        &field,
        &directive,
        &TurnActionLog::new(),
        &mut rng,
    );

    assert_eq!(report.threats.len(), 1);
    assert_eq!(report.threats[0].distance, 3.0);
    assert!(report.threats[0].has_line_of_sight);
    assert!(contains(&report.actions, ActionType::Attack, 80));
    assert!(contains(&report.actions, ActionType::Overwatch, 50));
    assert_eq!(report.best_action().unwrap().kind, ActionType::Attack);
}

#[test]
fn quiet_allies_only_coordinate() {
    let field = battlefield(vec![
        Character::new("Ada", "red", at(20.0, 20.0), 100),
        Character::new("Bea", "red", at(22.0, 20.0), 100),
    ]);

    let actions = run(&field, "Ada", &TacticalDirective::default());
    assert_eq!(actions.len(), 1);
    let speech = &actions[0];
    assert_eq!(speech.kind, ActionType::Speech);
    assert_eq!(speech.priority, 30);
    match &speech.command {
        Command::Speech { source, answers, .. } => {
            assert_eq!(source, "Ada");
            assert!(answers.is_empty());
        }
        other => panic!("expected speech payload, got {other:?}"),
    }
}

#[test]
fn wounded_aggressor_considers_retreat() {
    let field = battlefield(vec![
        Character::new("Ada", "red", at(50.0, 50.0), 100).with_health(25),
        Character::new("Vex", "blue", at(53.0, 50.0), 100),
    ]);
    let directive = TacticalDirective::new(Objective::Attack, Stance::Aggressive);

    let actions = run(&field, "Ada", &directive);
    assert!(contains(&actions, ActionType::Movement, 95));
    assert!(contains(&actions, ActionType::Attack, 80));
}

#[test]
fn retreat_runs_away_from_eastern_threat() {
    let field = battlefield(vec![
        Character::new("Ada", "red", at(30.0, 30.0), 100),
        Character::new("Vex", "blue", at(36.0, 30.0), 100),
    ]);
    let ada = field.character("Ada").unwrap();
    let threats = tactics_ai::assess_threats(ada, others(ada, &field), &field, None);

    let retreat = find_retreat_position(ada, &threats, &field).unwrap();
    assert!(retreat.x < ada.position.x);
    assert!(find_retreat_position(ada, &[], &field).is_none());
}

#[test]
fn patrol_is_reproducible_with_seeded_rng() {
    let field = battlefield(vec![Character::new("Ada", "red", at(50.0, 50.0), 100)]);
    let directive = TacticalDirective::new(Objective::Patrol, Stance::Aggressive);

    let first = run(&field, "Ada", &directive);
    let second = run(&field, "Ada", &directive);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, ActionType::Movement);
    assert_eq!(first[0].priority, 40);
}

#[test]
fn scenario_file_drives_a_decision() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"(
            map: [
                "............",
                "............",
                "............",
            ],
            characters: [
                (name: "Ada", position: (x: 1.0, y: 1.0), health: 100, max_health: 100, faction: "red"),
                (name: "Vex", position: (x: 2.0, y: 1.0), health: 100, max_health: 100, faction: "blue"),
            ],
            directives: {{
                "Ada": (objective: attack, tactics: (stance: aggressive)),
            }},
        )"#
    )
    .unwrap();

    let scenario = Scenario::load_from_file(file.path()).unwrap();
    let field = scenario.battlefield().unwrap();
    let directive = scenario.directive_for("Ada");

    let actions = run(&field, "Ada", &directive);
    assert!(contains(&actions, ActionType::Attack, 90));
}

#[test]
fn missing_scenario_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.ron");

    let err = Scenario::load_from_file(&missing).unwrap_err();
    assert!(matches!(err, tactics_ai::ScenarioError::Io { .. }));
}

#[test]
fn bundled_skirmish_scenario_runs_for_everyone() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../cli/scenarios/skirmish.ron");
    let scenario = Scenario::load_from_file(&path).unwrap();
    let field = scenario.battlefield().unwrap();
    let turn_log = scenario.turn_log();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for character in &field.characters {
        let directive = scenario.directive_for(&character.name);
        let report = decide(
            character,
            others(character, &field),
            &field,
            &directive,
            &turn_log,
            &mut rng,
        );
        assert!(
            report.actions.iter().all(|a| a.priority <= TacticalAction::MAX_PRIORITY),
            "{} produced an out-of-range priority",
            character.name
        );
    }

    let bea = field.character("Bea").unwrap();
    let report = decide(
        bea,
        others(bea, &field),
        &field,
        &scenario.directive_for("Bea"),
        &turn_log,
        &mut rng,
    );
    assert!(contains(&report.actions, ActionType::Movement, 95));
}
