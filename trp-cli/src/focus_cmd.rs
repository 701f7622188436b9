//! Focus command - one bot against each of its opponents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: rate_table(), delta_table()
//! - Level 3: headers(), pair_record()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use trp_core::{compare, BotRecord, DeltaTable, Focus, WinRateTable};

use crate::render::{render, Table};
use crate::report::{format_delta, format_rate, load_table, Labels, ReportArgs, ReportOptions};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct FocusArgs {
    /// tournament.csv, JSON records, map folder or results folder
    #[arg(value_name = "RESULTS")]
    pub results: PathBuf,

    /// Bot to focus on (full or short name)
    #[arg(value_name = "BOT")]
    pub bot: String,

    /// Later results; show how the bot's rates moved instead
    #[arg(long, value_name = "AFTER")]
    pub against: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run focus command
///
/// 1. Load the results (and the later results with `--against`)
/// 2. Resolve the bot name and narrow the table down to it
/// 3. Print one row per opponent and one column per map
pub fn run(args: FocusArgs) -> Result<()> {
    let options = ReportOptions::from_args(&args.report)?;
    let before = load_table(&args.results, &options)?;

    let table = match &args.against {
        None => {
            let labels = Labels::new(before.bots(), &options)?;
            let bot = labels.resolve(&args.bot).to_string();
            let focused = before
                .focus(&bot)
                .with_context(|| format!("Cannot focus on {}", args.bot))?;
            rate_table(&focused, &bot, &labels, &options)
        }
        Some(path) => {
            let after = load_table(path, &options)?;
            let labels = Labels::new(before.bots().chain(after.bots()), &options)?;
            let bot = labels.resolve(&args.bot).to_string();
            let focused = compare(&before, &after)
                .focus(&bot)
                .with_context(|| format!("Cannot focus on {}", args.bot))?;
            delta_table(&focused, &bot, &labels, &options)
        }
    };

    println!("{}", render(&[table], options.format)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// `bot`'s rate against each opponent on each map
pub(crate) fn rate_table(table: &WinRateTable, bot: &str, labels: &Labels, options: &ReportOptions) -> Table {
    let metric = options.metric;
    let mut out = Table::new(
        format!("{} ({})", labels.label(bot), metric.label()),
        headers(table.maps()),
    );

    for opponent in table.opponents(bot) {
        let mut row = vec![labels.label(opponent)];
        row.extend(
            table
                .maps()
                .iter()
                .map(|m| format_rate(table.record(m, bot, opponent).and_then(|r| r.rate(metric)))),
        );
        row.push(format_rate(pair_record(table, bot, opponent).and_then(|r| r.rate(metric))));
        out.push_row(row);
    }

    let mut total = vec!["All opponents".to_string()];
    total.extend(
        table
            .maps()
            .iter()
            .map(|m| format_rate(table.bot_record(m, bot).and_then(|r| r.rate(metric)))),
    );
    total.push(format_rate(table.overall(bot).and_then(|r| r.rate(metric))));
    out.push_row(total);
    out
}

/// `bot`'s change against each opponent on each map
pub(crate) fn delta_table(deltas: &DeltaTable, bot: &str, labels: &Labels, options: &ReportOptions) -> Table {
    let metric = options.metric;
    let mut out = Table::new(
        format!("{} ({} change)", labels.label(bot), metric.label()),
        headers(deltas.maps()),
    );

    let opponents: Vec<&str> = deltas.bots().filter(|b| *b != bot).collect();
    for opponent in opponents {
        let mut row = vec![labels.label(opponent)];
        row.extend(
            deltas
                .maps()
                .iter()
                .map(|m| format_delta(deltas.delta(m, bot, opponent, metric))),
        );
        row.push(format_delta(deltas.pair_overall_delta(bot, opponent, metric)));
        out.push_row(row);
    }

    let mut total = vec!["All opponents".to_string()];
    total.extend(
        deltas
            .maps()
            .iter()
            .map(|m| format_delta(deltas.bot_delta(m, bot, metric))),
    );
    total.push(format_delta(deltas.overall_delta(bot, metric)));
    out.push_row(total);
    out
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn headers(maps: &[String]) -> Vec<String> {
    let mut headers = vec!["Opponent".to_string()];
    headers.extend(maps.iter().cloned());
    headers.push("Overall".to_string());
    headers
}

/// `bot`'s record against `opponent` summed over all maps
fn pair_record(table: &WinRateTable, bot: &str, opponent: &str) -> Option<BotRecord> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use trp_core::{aggregate, MatchRecord};

    fn rec(map: &str, a: &str, b: &str, winner: Option<&str>) -> MatchRecord {
        MatchRecord::new(map, a, b, winner).unwrap()
    }

    fn before() -> WinRateTable {
        aggregate(
            &[
                rec("m1", "A", "B", Some("A")),
                rec("m1", "A", "C", Some("C")),
                rec("m2", "A", "B", Some("B")),
                rec("m2", "B", "C", Some("B")),
            ],
            None,
        )
    }

    fn after() -> WinRateTable {
        aggregate(
            &[
                rec("m1", "A", "B", Some("A")),
                rec("m1", "A", "C", Some("A")),
                rec("m2", "A", "B", Some("A")),
                rec("m2", "B", "C", Some("C")),
            ],
            None,
        )
    }

    #[test]
    fn test_rate_table() {
        let options = ReportOptions::default();
        let table = before();
        let labels = Labels::new(table.bots(), &options).unwrap();
        let focused = table.focus("A").unwrap();
        let out = rate_table(&focused, "A", &labels, &options);

        assert_eq!(out.title, "A (Win Rate)");
        assert_eq!(out.headers, vec!["Opponent", "m1", "m2", "Overall"]);
        assert_eq!(out.rows[0], vec!["B", "100.0", "0.0", "50.0"]);
        assert_eq!(out.rows[1], vec!["C", "0.0", "n/a", "0.0"]);
        assert_eq!(out.rows[2], vec!["All opponents", "50.0", "0.0", "33.3"]);
    }

    #[test]
    fn test_delta_table() {
        let options = ReportOptions::default();
        let (before, after) = (before(), after());
        let labels = Labels::new(before.bots().chain(after.bots()), &options).unwrap();
        let focused = compare(&before, &after).focus("A").unwrap();
        let out = delta_table(&focused, "A", &labels, &options);

        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[0], vec!["B", "0.0", "+100.0", "+50.0"]);
        assert_eq!(out.rows[1], vec!["C", "+100.0", "n/a", "+100.0"]);
        assert_eq!(out.rows[2], vec!["All opponents", "+50.0", "+100.0", "+66.7"]);
    }

    #[test]
    fn test_new_opponent_leaves_totals_flat() {
        let options = ReportOptions::default();
        let before = aggregate(&[rec("m1", "A", "B", Some("A"))], None);
        let after = aggregate(
            &[rec("m1", "A", "B", Some("A")), rec("m1", "C", "A", Some("C"))],
            None,
        );
        let labels = Labels::new(after.bots(), &options).unwrap();
        let focused = compare(&before, &after).focus("A").unwrap();
        let out = delta_table(&focused, "A", &labels, &options);

        assert_eq!(out.rows[0], vec!["B", "0.0", "0.0"]);
        assert_eq!(out.rows[1], vec!["C", "n/a", "n/a"]);
        assert_eq!(out.rows[2], vec!["All opponents", "0.0", "0.0"]);
    }

    #[test]
    fn test_unknown_bot() {
        assert!(before().focus("Z").is_err());
    }
}
