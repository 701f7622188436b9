//! TRP Tournament - Reading MicroRTS tournament results
//!
//! This crate produces the match records `trp-core` aggregates:
//! - Parsing `tournament.csv` files (header, AI and map lists, game rows,
//!   Wins:/Ties: matrices)
//! - Expanding a file into one match record per game
//! - Discovering run and map folders, parsing files in parallel
//! - Loading map lists and JSON match records

mod config;
mod error;
mod loader;
mod match_play;
mod tournament;

pub use config::TournamentConfig;
pub use error::{Result, TournamentError};
pub use loader::{
    discover_sources, load_json_records, load_map_list, load_results, parse_json_records,
    ResultSource,
};
pub use match_play::map_label;
pub use tournament::{GameRow, Matrix, TournamentFile};
