//! TRP Core - Win-rate summaries for MicroRTS tournaments
//!
//! This crate turns match records into report tables:
//! - Match records and map lists
//! - Aggregation into win-rate tables keyed by map and bot pair
//! - Comparison of two tables as signed percentage-point deltas
//! - Focus on the entries involving one bot
//! - Collision-free short display names for bots
//!
//! Everything here is pure and synchronous. Reading files and rendering
//! tables live in `trp-tournament` and `trp-cli`.

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod focus;
pub mod maps;
pub mod names;
pub mod record;
pub mod table;

// Re-exports for convenient access
pub use aggregate::aggregate;
pub use compare::{compare, BotDelta, Delta, DeltaTable, PairDelta};
pub use error::{ReportError, Result};
pub use focus::Focus;
pub use maps::MapList;
pub use names::{shorten, shorten_with, ShortNames, ShortenConfig};
pub use record::{MatchRecord, Outcome, RawRecord};
pub use table::{BotPair, BotRecord, PairStats, RateMetric, Standing, WinRateTable};
