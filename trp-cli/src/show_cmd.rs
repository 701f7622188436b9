//! Show command - win rates of a single tournament
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_tables()
//! - Level 3: map_table()

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use trp_core::{BotRecord, WinRateTable};

use crate::render::{render, Table};
use crate::report::{format_rate, load_table, Labels, ReportArgs, ReportOptions};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ShowArgs {
    /// tournament.csv, JSON records, map folder or results folder
    #[arg(value_name = "RESULTS")]
    pub results: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run show command
///
/// 1. Load and aggregate the results
/// 2. Build one table per map (plus an overall table)
/// 3. Print
pub fn run(args: ShowArgs) -> Result<()> {
    let options = ReportOptions::from_args(&args.report)?;
    let table = load_table(&args.results, &options)?;
    let labels = Labels::new(table.bots(), &options)?;

    let tables = build_tables(&table, &labels, &options);
    println!("{}", render(&tables, options.format)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub(crate) fn build_tables(table: &WinRateTable, labels: &Labels, options: &ReportOptions) -> Vec<Table> {
    let mut tables: Vec<Table> = table
        .maps()
        .iter()
        .map(|map| map_table(table, Some(map), labels, options))
        .collect();

    if table.maps().len() > 1 {
        tables.push(map_table(table, None, labels, options));
    }
    tables
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Ranking on one map, or over all maps when `map` is `None`
fn map_table(table: &WinRateTable, map: Option<&str>, labels: &Labels, options: &ReportOptions) -> Table {
    let standings = table.standings(map, options.metric);
    let opponents: Vec<&str> = standings.iter().map(|s| s.bot.as_str()).collect();

    let mut headers = vec!["Bot".to_string(), options.metric.label().to_string(), "Games".to_string()];
    if options.detail {
        headers.extend(opponents.iter().map(|o| labels.label(o)));
    }

    let mut out = Table::new(map.unwrap_or("All maps"), headers);
    for standing in &standings {
        let mut row = vec![
            labels.label(&standing.bot),
            format_rate(standing.rate),
            standing.record.games.to_string(),
        ];
        if options.detail {
            row.extend(opponents.iter().map(|&opponent| {
                if opponent == standing.bot {
                    return "-".to_string();
                }
                let record = match map {
                    Some(m) => table.record(m, &standing.bot, opponent),
                    None => pair_overall(table, &standing.bot, opponent),
                };
                format_rate(record.and_then(|r| r.rate(options.metric)))
            }));
        }
        out.push_row(row);
    }
    out
}

/// `bot` against `opponent` summed over every map
fn pair_overall(table: &WinRateTable, bot: &str, opponent: &str) -> Option<BotRecord> {
    table
        .maps()
        .iter()
        .filter_map(|m| table.record(m, bot, opponent))
        .fold(None, |acc: Option<BotRecord>, r| {
            let mut total = acc.unwrap_or_default();
            total += r;
            Some(total)
        })
}
