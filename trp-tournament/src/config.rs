//! Run settings recorded in a tournament file header

use serde::{Deserialize, Serialize};

/// Settings of one tournament run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Games per ordered pairing and map
    pub iterations: i32,
    /// Cycles before a game is declared a draw
    pub max_game_length: i32,
    /// Milliseconds per bot decision, negative when unbounded
    pub time_budget: i32,
}

impl TournamentConfig {
    /// Apply one `key<TAB>value` header line.
    ///
    /// Returns `Ok(false)` for keys this config does not track.
    pub(crate) fn apply(&mut self, key: &str, value: &str) -> Result<bool, String> {
        let slot = match key {
            "iterations" => &mut self.iterations,
            "maxGameLength" => &mut self.max_game_length,
            "timeBudget" => &mut self.time_budget,
            _ => return Ok(false),
        };
        *slot = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid value for {}: '{}'", key, value.trim()))?;
        Ok(true)
    }
}
