//! Developer harness for the tactical decision engine.
//!
//! Loads a RON scenario, runs one decision cycle per requested character and
//! prints what each stage produced. Run with:
//! `tactics crates/tactics/cli/scenarios/skirmish.ron --character Ada`
//!
//! Logs go to stderr (`RUST_LOG=tactics_ai=debug` shows the scoring trail), so
//! `--json` output on stdout stays machine-readable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tactics_ai::{
    DecisionReport, PositionEvaluation, Scenario, TacticalAction, ThreatAssessment, decide,
    others,
};

/// Run tactical decision cycles against a scenario file
#[derive(Parser)]
#[command(name = "tactics")]
#[command(about = "Propose tactical actions for characters in a scenario", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (RON)
    scenario: PathBuf,

    /// Character to decide for; repeatable. Defaults to every living character.
    #[arg(short, long = "character", value_name = "NAME")]
    characters: Vec<String>,

    /// Seed for patrol jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ThreatView<'a> {
    name: &'a str,
    threat_level: f64,
    distance: f64,
    has_line_of_sight: bool,
    is_in_cover: bool,
    weapon_effectiveness: f64,
}

impl<'a> From<&ThreatAssessment<'a>> for ThreatView<'a> {
    fn from(threat: &ThreatAssessment<'a>) -> Self {
        Self {
            name: &threat.character.name,
            threat_level: threat.threat_level,
            distance: threat.distance,
            has_line_of_sight: threat.has_line_of_sight,
            is_in_cover: threat.is_in_cover,
            weapon_effectiveness: threat.weapon_effectiveness,
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    character: &'a str,
    threats: Vec<ThreatView<'a>>,
    position: &'a PositionEvaluation,
    actions: &'a [TacticalAction],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let scenario = Scenario::load_from_file(&cli.scenario)
        .with_context(|| format!("loading {}", cli.scenario.display()))?;
    let battlefield = scenario.battlefield().context("building battlefield")?;
    let turn_log = scenario.turn_log();

    let names: Vec<String> = if cli.characters.is_empty() {
        battlefield
            .characters
            .iter()
            .filter(|character| character.is_alive())
            .map(|character| character.name.clone())
            .collect()
    } else {
        cli.characters.clone()
    };

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let mut reports = Vec::with_capacity(names.len());

    for name in &names {
        scenario.character(name)?;
        let character = battlefield
            .character(name)
            .with_context(|| format!("character '{name}' missing from battlefield"))?;
        let directive = scenario.directive_for(name);

        tracing::info!(character = %name, stance = %directive.stance(), "deciding");
        let report = decide(
            character,
            others(character, &battlefield),
            &battlefield,
            &directive,
            &turn_log,
            &mut rng,
        );
        reports.push((name.as_str(), report));
    }

    if cli.json {
        let views: Vec<ReportView<'_>> = reports
            .iter()
            .map(|(name, report)| ReportView {
                character: name,
                threats: report.threats.iter().map(ThreatView::from).collect(),
                position: &report.position,
                actions: &report.actions,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        for (name, report) in &reports {
            print_report(name, report)?;
        }
    }

    Ok(())
}

fn print_report(name: &str, report: &DecisionReport<'_>) -> Result<()> {
    println!("== {name} ==");

    if report.threats.is_empty() {
        println!("threats: none");
    } else {
        println!("threats:");
        for threat in &report.threats {
            println!(
                "  {:<12} level {:>5.1}  dist {:>5.1}  sight {:<5}  effectiveness {:>4.0}",
                threat.character.name,
                threat.threat_level,
                threat.distance,
                threat.has_line_of_sight,
                threat.weapon_effectiveness,
            );
        }
    }

    let position = &report.position;
    println!(
        "position: {} cover {:.0} exposure {:.0} value {:.0}",
        position.position.to_cell_literal(),
        position.cover_score,
        position.exposure_risk,
        position.tactical_value,
    );

    let mut actions: Vec<&TacticalAction> = report.actions.iter().collect();
    actions.sort_by(|a, b| b.priority.cmp(&a.priority));
    if actions.is_empty() {
        println!("actions: none");
    }
    for action in actions {
        println!(
            "  [{:>3}] {:<9} {}  ({})",
            action.priority,
            action.kind.as_ref(),
            action.command_json()?,
            action.reasoning,
        );
    }
    println!();

    Ok(())
}
