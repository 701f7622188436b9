//! Expansion of a tournament file into match records

use std::path::Path;

use trp_core::{MatchRecord, ReportError};

use crate::tournament::{Matrix, TournamentFile};

/// Per-pair game cap when the header does not give an iteration count
const MAX_GAMES_PER_PAIR: u64 = 1_000_000;

/// Report label for a map path: `maps/8x8/basesWorkers8x8A.xml` becomes
/// `basesWorkers8x8A`
pub fn map_label(map: &str) -> String {
    Path::new(map)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(map)
        .to_string()
}

impl TournamentFile {
    /// Map label used when games cannot be attributed to a listed map
    pub fn default_map(&self, fallback: &str) -> String {
        match self.maps.as_slice() {
            [only] => map_label(only),
            _ => fallback.to_string(),
        }
    }

    /// Turn the file into one record per game.
    ///
    /// Per-game rows are used when present. Otherwise the Wins:/Ties:
    /// matrices are expanded and every game is attributed to
    /// [`default_map`](Self::default_map). Self-play games are dropped.
    pub fn match_records(&self, fallback_map: &str) -> Result<Vec<MatchRecord>, ReportError> {
        if self.has_game_rows() {
            self.records_from_games()
        } else {
            let map = self.default_map(fallback_map);
            match (&self.wins, &self.ties) {
                (Some(wins), Some(ties)) => self.records_from_matrices(&map, wins, ties),
                _ => Ok(Vec::new()),
            }
        }
    }

    fn records_from_games(&self) -> Result<Vec<MatchRecord>, ReportError> {
        let labels: Vec<String> = self.maps.iter().map(|m| map_label(m)).collect();
        let mut records = Vec::with_capacity(self.games.len());
        let mut self_play = 0usize;

        for game in &self.games {
            if game.ai1 == game.ai2 {
                self_play += 1;
                continue;
            }
            let (Some(ai1), Some(ai2), Some(map)) = (
                self.ai_names.get(game.ai1),
                self.ai_names.get(game.ai2),
                labels.get(game.map),
            ) else {
                return Err(ReportError::malformed(
                    format!("game {} of iteration {}", records.len() + self_play, game.iteration),
                    "AI or map index outside the file's lists",
                ));
            };
            let winner = match game.winner {
                0 => Some(ai1.as_str()),
                1 => Some(ai2.as_str()),
                _ => None,
            };
            records.push(MatchRecord::new(map.as_str(), ai1.as_str(), ai2.as_str(), winner)?);
        }

        if self_play > 0 {
            tracing::debug!("Skipped {} self-play games", self_play);
        }
        Ok(records)
    }

    /// Most games a pair can have played according to the header
    fn games_per_pair_limit(&self) -> u64 {
        if self.config.iterations > 0 {
            // Each AI plays `iterations` games as player 0 and as player 1 on every map
            2 * self.config.iterations as u64 * self.maps.len().max(1) as u64
        } else {
            MAX_GAMES_PER_PAIR
        }
    }

    fn records_from_matrices(
        &self,
        map: &str,
        wins: &Matrix,
        ties: &Matrix,
    ) -> Result<Vec<MatchRecord>, ReportError> {
        let names = &self.ai_names;
        let n = names.len();
        let square = |m: &Matrix| m.len() == n && m.iter().all(|row| row.len() == n);
        if !square(wins) || !square(ties) {
            return Err(ReportError::malformed(
                map,
                format!("Wins:/Ties: matrices are not {} x {}", n, n),
            ));
        }

        let limit = self.games_per_pair_limit();
        let mut records = Vec::new();

        for i in 0..n {
            if wins[i][i] > 0 || ties[i][i] > 0 {
                tracing::debug!(
                    "Skipped {} self-play games of {}",
                    wins[i][i].saturating_add(ties[i][i]),
                    names[i]
                );
            }

            for j in (i + 1)..n {
                let describe = || format!("{}: {} vs {}", map, names[i], names[j]);
                if ties[i][j] != ties[j][i] {
                    return Err(ReportError::malformed(
                        describe(),
                        format!("asymmetric tie counts ({} vs {})", ties[i][j], ties[j][i]),
                    ));
                }
                let total = wins[i][j] as u64 + wins[j][i] as u64 + ties[i][j] as u64;
                if total > limit {
                    return Err(ReportError::malformed(
                        describe(),
                        format!("{} games exceed the {} the header allows", total, limit),
                    ));
                }

                let (a, b) = (names[i].as_str(), names[j].as_str());
                let won_by_a = MatchRecord::new(map, a, b, Some(a))?;
                let won_by_b = MatchRecord::new(map, a, b, Some(b))?;
                let drawn = MatchRecord::new(map, a, b, None)?;

                records.extend(std::iter::repeat(won_by_a).take(wins[i][j] as usize));
                records.extend(std::iter::repeat(won_by_b).take(wins[j][i] as usize));
                records.extend(std::iter::repeat(drawn).take(ties[i][j] as usize));
            }
        }

        Ok(records)
    }
}
