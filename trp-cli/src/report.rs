//! Shared report options and helpers for the view commands
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: load_table(), ReportOptions::from_args()
//! - Level 3: Labels (full or short bot names)
//! - Level 4: cell formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use trp_core::{aggregate, shorten_with, Delta, MapList, RateMetric, ShortNames, ShortenConfig, WinRateTable};
use trp_tournament::{load_map_list, load_results};

use crate::render::OutputFormat;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Rate reported in the tables
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Wins over games played
    #[default]
    Win,
    /// Wins plus half the draws over games played (official MicroRTS score)
    Score,
}

impl From<MetricArg> for RateMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Win => RateMetric::WinRate,
            MetricArg::Score => RateMetric::ScoreRate,
        }
    }
}

/// Options shared by every view
#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// Map list file restricting and ordering the maps (one per line)
    #[arg(long, value_name = "FILE")]
    pub maps: Option<PathBuf>,

    /// Add one column per opponent
    #[arg(long)]
    pub detail: bool,

    /// Show full bot names instead of short ones
    #[arg(long)]
    pub full_names: bool,

    /// Rate to report
    #[arg(long, value_enum, default_value_t = MetricArg::Win)]
    pub metric: MetricArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Length at which long argument lists in short names are cut
    #[arg(long, default_value = "35")]
    pub max_name_length: usize,
}

/// Resolved report configuration
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub maps: Option<MapList>,
    pub detail: bool,
    pub full_names: bool,
    pub metric: RateMetric,
    pub format: OutputFormat,
    pub shorten: ShortenConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            maps: None,
            detail: false,
            full_names: false,
            metric: RateMetric::WinRate,
            format: OutputFormat::Plain,
            shorten: ShortenConfig::default(),
        }
    }
}

impl ReportOptions {
    /// Build options from arguments, loading the map list if one is given
    pub fn from_args(args: &ReportArgs) -> Result<Self> {
        let maps = match &args.maps {
            Some(path) => Some(
                load_map_list(path)
                    .with_context(|| format!("Failed to load map list: {}", path.display()))?,
            ),
            None => None,
        };

        Ok(Self {
            maps,
            detail: args.detail,
            full_names: args.full_names,
            metric: args.metric.into(),
            format: args.format,
            shorten: ShortenConfig::with_max_length(args.max_name_length),
        })
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load results at `path` and aggregate them
pub fn load_table(path: &Path, options: &ReportOptions) -> Result<WinRateTable> {
    let records = load_results(path)
        .with_context(|| format!("Failed to load results: {}", path.display()))?;
    let table = aggregate(&records, options.maps.as_ref());

    tracing::info!(
        "{}: {} bots, {} maps, {} games",
        path.display(),
        table.bots().count(),
        table.maps().len(),
        table.total_games()
    );
    Ok(table)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Bot labels for one report
pub struct Labels {
    names: ShortNames,
    full: bool,
}

impl Labels {
    /// Short names are computed over every bot of every table in the report
    pub fn new<'a>(bots: impl IntoIterator<Item = &'a str>, options: &ReportOptions) -> Result<Self> {
        let mut all: Vec<&str> = bots.into_iter().collect();
        all.sort_unstable();
        all.dedup();

        let names = shorten_with(&all, &options.shorten).context("Failed to shorten bot names")?;
        Ok(Self {
            names,
            full: options.full_names,
        })
    }

    pub fn label(&self, bot: &str) -> String {
        if self.full {
            bot.to_string()
        } else {
            self.names.display(bot).to_string()
        }
    }

    /// Full name for a user-supplied full or short name
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.resolve(name).unwrap_or(name)
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Rate as a percentage with one decimal, `n/a` without games
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.1}", r * 100.0),
        None => "n/a".to_string(),
    }
}

/// Signed percentage-point change, `n/a` for no data
pub fn format_delta(delta: Option<Delta>) -> String {
    match delta.and_then(|d| d.percentage_points()) {
        Some(p) if p.abs() < 0.05 => "0.0".to_string(),
        Some(p) => format!("{:+.1}", p),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.755)), "75.5");
        assert_eq!(format_rate(Some(1.0 / 3.0)), "33.3");
        assert_eq!(format_rate(None), "n/a");
    }

    #[test]
    fn test_format_delta() {
        let up = Delta::Change {
            before: 0.5,
            after: 0.75,
        };
        let down = Delta::Change {
            before: 0.75,
            after: 0.5,
        };
        let flat = Delta::Change {
            before: 0.5,
            after: 0.5,
        };
        assert_eq!(format_delta(Some(up)), "+25.0");
        assert_eq!(format_delta(Some(down)), "-25.0");
        assert_eq!(format_delta(Some(flat)), "0.0");
        assert_eq!(format_delta(Some(Delta::NoData)), "n/a");
        assert_eq!(format_delta(None), "n/a");
    }

    #[test]
    fn test_labels_short_and_full() {
        let bots = ["ai.abstraction.WorkerRush", "ai.abstraction.LightRush"];
        let labels = Labels::new(bots, &ReportOptions::default()).unwrap();
        assert_eq!(labels.label("ai.abstraction.WorkerRush"), "WorkerRush");
        assert_eq!(labels.resolve("LightRush"), "ai.abstraction.LightRush");
        assert_eq!(labels.resolve("Unknown"), "Unknown");

        let options = ReportOptions {
            full_names: true,
            ..Default::default()
        };
        let labels = Labels::new(bots, &options).unwrap();
        assert_eq!(labels.label("ai.abstraction.WorkerRush"), "ai.abstraction.WorkerRush");
    }

    #[test]
    fn test_labels_dedup_across_tables() {
        let labels = Labels::new(["ai.A", "ai.B", "ai.A"], &ReportOptions::default()).unwrap();
        assert_eq!(labels.label("ai.A"), "A");
    }
}
