//! Compare command - how win rates moved between two tournaments
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_tables()
//! - Level 3: map_table(), row_order()

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use trp_core::{compare, DeltaTable, WinRateTable};

use crate::render::{render, Table};
use crate::report::{format_delta, format_rate, load_table, Labels, ReportArgs, ReportOptions};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct CompareArgs {
    /// Results of the earlier tournament
    #[arg(value_name = "BEFORE")]
    pub before: PathBuf,

    /// Results of the later tournament
    #[arg(value_name = "AFTER")]
    pub after: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Both tables and their comparison
pub(crate) struct Comparison {
    pub before: WinRateTable,
    pub after: WinRateTable,
    pub deltas: DeltaTable,
}

impl Comparison {
    pub fn new(before: WinRateTable, after: WinRateTable) -> Self {
        let deltas = compare(&before, &after);
        Self {
            before,
            after,
            deltas,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run compare command
///
/// 1. Load both result sets
/// 2. Compare them
/// 3. Print one table per map (plus an overall table)
pub fn run(args: CompareArgs) -> Result<()> {
    let options = ReportOptions::from_args(&args.report)?;
    let before = load_table(&args.before, &options)?;
    let after = load_table(&args.after, &options)?;

    let comparison = Comparison::new(before, after);
    let labels = Labels::new(comparison.deltas.bots(), &options)?;

    let tables = build_tables(&comparison, &labels, &options);
    println!("{}", render(&tables, options.format)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub(crate) fn build_tables(comparison: &Comparison, labels: &Labels, options: &ReportOptions) -> Vec<Table> {
    let maps = comparison.deltas.maps();
    let mut tables: Vec<Table> = maps
        .iter()
        .map(|map| map_table(comparison, Some(map), labels, options))
        .collect();

    if maps.len() > 1 {
        tables.push(map_table(comparison, None, labels, options));
    }
    tables
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn map_table(comparison: &Comparison, map: Option<&str>, labels: &Labels, options: &ReportOptions) -> Table {
    let metric = options.metric;
    let bots = row_order(comparison, map, options);

    // Before and After only cover matchups played in both runs
    let mut headers = vec![
        "Bot".to_string(),
        "Before".to_string(),
        "After".to_string(),
        "Delta".to_string(),
    ];
    if options.detail {
        headers.extend(bots.iter().map(|b| labels.label(b)));
    }

    let mut out = Table::new(map.unwrap_or("All maps"), headers);
    for bot in &bots {
        let entry = match map {
            Some(m) => comparison.deltas.bot_entry(m, bot),
            None => comparison.deltas.overall_entry(bot),
        };
        let before = entry.and_then(|e| e.before).and_then(|r| r.rate(metric));
        let after = entry.and_then(|e| e.after).and_then(|r| r.rate(metric));
        let delta = entry.map(|e| e.delta(metric));

        let mut row = vec![
            labels.label(bot),
            format_rate(before),
            format_rate(after),
            format_delta(delta),
        ];
        if options.detail {
            row.extend(bots.iter().map(|opponent| {
                if opponent == bot {
                    return "-".to_string();
                }
                format_delta(match map {
                    Some(m) => comparison.deltas.delta(m, bot, opponent, metric),
                    None => comparison.deltas.pair_overall_delta(bot, opponent, metric),
                })
            }));
        }
        out.push_row(row);
    }
    out
}

/// Bots ranked by their later rate, then bots that only played before
fn row_order(comparison: &Comparison, map: Option<&str>, options: &ReportOptions) -> Vec<String> {
    let mut bots: Vec<String> = comparison
        .after
        .standings(map, options.metric)
        .into_iter()
        .map(|s| s.bot)
        .collect();

    for standing in comparison.before.standings(map, options.metric) {
        if !bots.contains(&standing.bot) {
            bots.push(standing.bot);
        }
    }
    bots
}
