//! Run command - play a tournament from a setup file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_setup(), play(), report_results()
//! - Level 3: build_config()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use panem_core::{
    parse_setup, DuelOutcome, DuelPolicy, RoundReport, Setup, TieBreak, Tournament,
    TournamentConfig, TournamentResult,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Setup file (districts, then persons)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Side that wins equal duel scores
    #[arg(long, value_enum, default_value = "odd")]
    pub tie_break: TieBreakArg,

    /// Add a roll in [0, SIDES) to each duelist's effectiveness
    #[arg(long, value_name = "SIDES")]
    pub dice: Option<u32>,

    /// Stop after this many rounds
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Print every round as it is played
    #[arg(long)]
    pub rounds: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TieBreakArg {
    Odd,
    Even,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Odd => TieBreak::Odd,
            TieBreakArg::Even => TieBreak::Even,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run command
///
/// 1. Load the setup file
/// 2. Admit every district and play until decided
/// 3. Report results
pub fn run(args: RunArgs, seed: Option<u64>) -> Result<()> {
    let setup = load_setup(&args.input)?;
    let config = build_config(&args, seed);

    tracing::info!(
        "Starting tournament: {} districts, {} persons (seed={})",
        setup.catalog.len(),
        setup.placed,
        config.seed
    );

    let (result, reports) = play(setup, config, args.rounds)?;

    report_results(&result, &reports, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read and parse a setup file
pub fn load_setup(path: &Path) -> Result<Setup> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read setup file: {}", path.display()))?;

    let setup = parse_setup(&content)
        .with_context(|| format!("Failed to parse setup file: {}", path.display()))?;

    if !setup.dropped.is_empty() {
        tracing::warn!(
            "{} persons reference unknown districts and were skipped",
            setup.dropped.len()
        );
    }

    Ok(setup)
}

/// Play the whole tournament, keeping per-round reports when asked
fn play(
    setup: Setup,
    config: TournamentConfig,
    keep_rounds: bool,
) -> Result<(TournamentResult, Vec<RoundReport>)> {
    let mut rng = config.rng();
    let mut tournament = Tournament::from_setup(setup, config);
    tournament.admit_all();

    let mut reports = Vec::new();
    let result = tournament.run_with(&mut rng, |report| {
        if keep_rounds {
            reports.push(report.clone());
        }
    })?;

    Ok((result, reports))
}

/// Report results
fn report_results(result: &TournamentResult, reports: &[RoundReport], args: &RunArgs) -> Result<()> {
    if args.json {
        print_json_results(result, reports)
    } else {
        print_text_results(result, reports);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_config(args: &RunArgs, seed: Option<u64>) -> TournamentConfig {
    let mut config = TournamentConfig::default().with_tie_break(args.tie_break.into());
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(sides) = args.dice {
        config = config.with_duel_policy(DuelPolicy::Dice { sides });
    }
    if let Some(max) = args.max_rounds {
        config = config.with_max_rounds(max);
    }
    config
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(result: &TournamentResult, reports: &[RoundReport]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        result: &'a TournamentResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        rounds: Option<&'a [RoundReport]>,
    }

    let json = serde_json::to_string_pretty(&JsonOutput {
        result,
        rounds: (!reports.is_empty()).then_some(reports),
    })?;
    println!("{}", json);
    Ok(())
}

/// Print results as text
fn print_text_results(result: &TournamentResult, reports: &[RoundReport]) {
    if !reports.is_empty() {
        println!("=== Rounds ===");
        for report in reports {
            println!("  {}", describe_round(report));
        }
        println!();
    }

    println!("=== Tournament Results ===");
    println!("Rounds played: {}", result.rounds_played);
    println!("Stop reason:   {:?}", result.stop_reason);
    match result.champion {
        Some(id) => println!("Champion:      District {}", id),
        None => println!("Champion:      none"),
    }

    println!("\nSurvivors:");
    for standing in &result.survivors {
        println!(
            "  District {:>4}: {} odd, {} even, effectiveness {}",
            standing.district, standing.odd, standing.even, standing.total_effectiveness
        );
    }

    if !result.eliminations.is_empty() {
        println!("\nEliminations:");
        for elimination in &result.eliminations {
            println!(
                "  Round {:>5}: District {}",
                elimination.round, elimination.district
            );
        }
    }
}

fn describe_round(report: &RoundReport) -> String {
    match &report.outcome {
        DuelOutcome::NoDuel => format!("Round {}: no duel possible", report.round),
        DuelOutcome::Bye { person, district, .. } => {
            format!("Round {}: bye for {} of district {}", report.round, person, district)
        }
        DuelOutcome::Fought {
            winner,
            winner_district,
            loser,
            loser_district,
            eliminated,
        } => {
            let mut line = format!(
                "Round {}: {} (district {}) beat {} (district {})",
                report.round, winner, winner_district, loser, loser_district
            );
            if let Some(id) = eliminated {
                line.push_str(&format!(", district {} eliminated", id));
            }
            line
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
