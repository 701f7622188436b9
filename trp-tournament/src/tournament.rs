//! Parser for MicroRTS `tournament.csv` files
//!
//! The file is tab separated and split into sections:
//!
//! ```text
//! RoundRobinTournament
//! AIs
//! ai.RandomBiasedAI
//! ai.abstraction.WorkerRush(AStarPathFinding)
//! maps
//! maps/8x8/basesWorkers8x8A.xml
//! iterations	10
//! maxGameLength	3000
//! timeBudget	100
//! iteration	map	ai1	ai2	time	winner	crashed	timedout
//! 0	0	0	1	1200	1	-1	-1
//! Wins:
//! 0	3
//! 7	0
//! Ties:
//! 0	0
//! 0	0
//! Average Game Length:
//! ...
//! ```
//!
//! The per-game rows are optional; older files only carry the matrices.

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Serialize;
use trp_core::ReportError;

use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};

/// Square count matrix indexed by AI position
pub type Matrix = Vec<Vec<u32>>;

/// One per-game row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameRow {
    pub iteration: u32,
    /// Index into the map list
    pub map: usize,
    /// Index of player 0
    pub ai1: usize,
    /// Index of player 1
    pub ai2: usize,
    /// -1 for a draw, otherwise the winning player (0 or 1)
    pub winner: i32,
}

/// Contents of one `tournament.csv`.
///
/// Only [`parse`](Self::parse) fills a file, so game rows and matrices always
/// index inside the AI and map lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TournamentFile {
    pub(crate) ai_names: Vec<String>,
    pub(crate) maps: Vec<String>,
    pub(crate) config: TournamentConfig,
    pub(crate) games: Vec<GameRow>,
    /// `wins[i][j]`: games AI `i` won against AI `j`
    pub(crate) wins: Option<Matrix>,
    /// `ties[i][j]`: draws between AI `i` and AI `j`
    pub(crate) ties: Option<Matrix>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Ais,
    Maps,
    Games,
    Wins,
    Ties,
    GameLength,
}

impl TournamentFile {
    /// Read and parse a file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TournamentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|e| e.in_file(path))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut file = TournamentFile::default();
        let mut section = Section::Preamble;
        let mut last_line = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = raw.trim();

            match line {
                "AIs" => {
                    section = Section::Ais;
                    continue;
                }
                "maps" => {
                    section = Section::Maps;
                    continue;
                }
                "Wins:" => {
                    section = file.start_matrix(Section::Wins, line_no)?;
                    continue;
                }
                "Ties:" => {
                    section = file.start_matrix(Section::Ties, line_no)?;
                    continue;
                }
                "Average Game Length:" => {
                    section = Section::GameLength;
                    continue;
                }
                _ => {}
            }

            if line.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line
                .split('\t')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();

            match section {
                Section::Wins | Section::Ties => file.push_matrix_row(section, &tokens, line_no)?,
                Section::Games => {
                    let row = file.parse_game_row(&tokens, line_no)?;
                    file.games.push(row);
                }
                Section::GameLength => {}
                Section::Preamble | Section::Ais | Section::Maps => {
                    if tokens.len() > 1 {
                        if tokens[0] == "iteration" && tokens[1] == "map" {
                            section = Section::Games;
                            continue;
                        }
                        file.config
                            .apply(tokens[0], tokens[1])
                            .map_err(|reason| TournamentError::parse(line_no, reason))?;
                        // A header line closes the AI or map list
                        section = Section::Preamble;
                    } else if section == Section::Ais {
                        file.ai_names.push(line.to_string());
                    } else if section == Section::Maps {
                        file.maps.push(line.to_string());
                    }
                }
            }
        }

        file.validate(last_line)?;
        Ok(file)
    }

    pub fn ai_names(&self) -> &[String] {
        &self.ai_names
    }

    pub fn maps(&self) -> &[String] {
        &self.maps
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn games(&self) -> &[GameRow] {
        &self.games
    }

    pub fn wins(&self) -> Option<&Matrix> {
        self.wins.as_ref()
    }

    pub fn ties(&self) -> Option<&Matrix> {
        self.ties.as_ref()
    }

    /// Whether the file lists individual games
    pub fn has_game_rows(&self) -> bool {
        !self.games.is_empty()
    }

    fn start_matrix(&mut self, section: Section, line_no: usize) -> Result<Section> {
        if self.ai_names.is_empty() {
            return Err(TournamentError::parse(line_no, "matrix before the AIs section"));
        }
        let slot = match section {
            Section::Wins => &mut self.wins,
            _ => &mut self.ties,
        };
        if slot.is_some() {
            return Err(TournamentError::parse(line_no, "matrix given twice"));
        }
        *slot = Some(Vec::with_capacity(self.ai_names.len()));
        Ok(section)
    }

    fn push_matrix_row(&mut self, section: Section, tokens: &[&str], line_no: usize) -> Result<()> {
        let n = self.ai_names.len();
        let matrix = match section {
            Section::Wins => self.wins.as_mut(),
            _ => self.ties.as_mut(),
        }
        .ok_or_else(|| TournamentError::parse(line_no, "row outside a matrix"))?;

        if matrix.len() == n {
            return Err(TournamentError::parse(
                line_no,
                format!("more than {} rows in matrix", n),
            ));
        }
        if tokens.len() != n {
            return Err(TournamentError::parse(
                line_no,
                format!("expected {} columns, found {}", n, tokens.len()),
            ));
        }

        let row = tokens
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| TournamentError::parse(line_no, format!("invalid count '{}'", t)))
            })
            .collect::<Result<Vec<u32>>>()?;
        matrix.push(row);
        Ok(())
    }

    fn parse_game_row(&self, tokens: &[&str], line_no: usize) -> Result<GameRow> {
        if tokens.len() < 6 {
            return Err(TournamentError::parse(
                line_no,
                format!("expected at least 6 fields in game row, found {}", tokens.len()),
            ));
        }

        fn field<T: std::str::FromStr>(tokens: &[&str], i: usize, name: &str, line_no: usize) -> Result<T> {
            tokens[i]
                .parse()
                .map_err(|_| TournamentError::parse(line_no, format!("invalid {} '{}'", name, tokens[i])))
        }

        let row = GameRow {
            iteration: field(tokens, 0, "iteration", line_no)?,
            map: field(tokens, 1, "map index", line_no)?,
            ai1: field(tokens, 2, "ai1 index", line_no)?,
            ai2: field(tokens, 3, "ai2 index", line_no)?,
            winner: field(tokens, 5, "winner", line_no)?,
        };

        if row.map >= self.maps.len() {
            return Err(TournamentError::parse(
                line_no,
                format!("map index {} out of range", row.map),
            ));
        }
        if row.ai1 >= self.ai_names.len() || row.ai2 >= self.ai_names.len() {
            return Err(TournamentError::parse(line_no, "AI index out of range"));
        }
        if !(-1..=1).contains(&row.winner) {
            return Err(TournamentError::parse(
                line_no,
                format!("winner must be -1, 0 or 1, found {}", row.winner),
            ));
        }

        Ok(row)
    }

    fn validate(&self, last_line: usize) -> Result<()> {
        if self.ai_names.is_empty() {
            return Err(TournamentError::parse(last_line, "missing AIs section"));
        }

        let mut seen = FxHashSet::default();
        for name in &self.ai_names {
            if !seen.insert(name.as_str()) {
                return Err(ReportError::DuplicateBotIdentity(name.clone()).into());
            }
        }

        let n = self.ai_names.len();
        for (label, matrix) in [("Wins:", &self.wins), ("Ties:", &self.ties)] {
            if let Some(m) = matrix {
                if m.len() != n {
                    return Err(TournamentError::parse(
                        last_line,
                        format!("{} expected {} rows, found {}", label, n, m.len()),
                    ));
                }
            }
        }

        if self.games.is_empty() && (self.wins.is_none() || self.ties.is_none()) {
            return Err(TournamentError::parse(
                last_line,
                "no game rows and no Wins:/Ties: matrices",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATRIX_ONLY: &str = "RoundRobinTournament
AIs
ai.RandomBiasedAI
ai.abstraction.WorkerRush
ai.abstraction.LightRush
maps
maps/8x8/basesWorkers8x8A.xml
iterations\t2
maxGameLength\t3000
timeBudget\t100
preAnalysis\tfalse
Wins:
0\t0\t1
4\t0\t1
3\t2\t0
Ties:
0\t0\t0
0\t0\t1
0\t1\t0
Average Game Length:
0\t1500\t1800
1500\t0\t2000
1800\t2000\t0
";

    #[test]
    fn test_parse_matrix_file() {
        let file = TournamentFile::parse(MATRIX_ONLY).unwrap();
        assert_eq!(file.ai_names.len(), 3);
        assert_eq!(file.maps, vec!["maps/8x8/basesWorkers8x8A.xml"]);
        assert_eq!(file.config.iterations, 2);
        assert_eq!(file.config.max_game_length, 3000);
        assert_eq!(file.config.time_budget, 100);
        assert_eq!(file.wins.as_ref().unwrap()[1], vec![4, 0, 1]);
        assert_eq!(file.ties.as_ref().unwrap()[2], vec![0, 1, 0]);
        assert!(!file.has_game_rows());
    }

    #[test]
    fn test_parse_game_rows() {
        let text = "AIs
A
B
maps
maps/m1.xml
maps/m2.xml
iterations\t1
iteration\tmap\tai1\tai2\ttime\twinner\tcrashed\ttimedout
0\t0\t0\t1\t100\t0\t-1\t-1
0\t1\t1\t0\t100\t-1\t-1\t-1
";
        let file = TournamentFile::parse(text).unwrap();
        assert_eq!(file.games.len(), 2);
        assert_eq!(
            file.games[1],
            GameRow {
                iteration: 0,
                map: 1,
                ai1: 1,
                ai2: 0,
                winner: -1
            }
        );
        assert!(file.wins.is_none());
    }

    #[test]
    fn test_bad_count_reports_line() {
        let text = MATRIX_ONLY.replace("4\t0\t1", "4\tx\t1");
        match TournamentFile::parse(&text).unwrap_err() {
            TournamentError::Parse { line, reason } => {
                assert_eq!(line, 14);
                assert!(reason.contains("'x'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_row_width() {
        let text = MATRIX_ONLY.replace("4\t0\t1", "4\t0");
        assert!(matches!(
            TournamentFile::parse(&text),
            Err(TournamentError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_rows() {
        let text = MATRIX_ONLY.replace("3\t2\t0\n", "");
        let err = TournamentFile::parse(&text).unwrap_err();
        assert!(err.to_string().contains("Wins: expected 3 rows"));
    }

    #[test]
    fn test_missing_ais() {
        let err = TournamentFile::parse("iterations\t1\n").unwrap_err();
        assert!(err.to_string().contains("missing AIs section"));
    }

    #[test]
    fn test_duplicate_ai_names() {
        let text = MATRIX_ONLY.replace("ai.abstraction.LightRush", "ai.RandomBiasedAI");
        assert!(matches!(
            TournamentFile::parse(&text),
            Err(TournamentError::Report(ReportError::DuplicateBotIdentity(_)))
        ));
    }

    #[test]
    fn test_game_row_out_of_range() {
        let text = "AIs
A
B
maps
m1
iteration\tmap\tai1\tai2\ttime\twinner
0\t0\t0\t2\t100\t0
";
        assert!(TournamentFile::parse(text).is_err());

        let text = text.replace("0\t0\t0\t2\t100\t0", "0\t0\t0\t1\t100\t3");
        assert!(TournamentFile::parse(&text).is_err());
    }

    #[test]
    fn test_no_results() {
        let text = "AIs\nA\nB\nmaps\nm1\n";
        assert!(TournamentFile::parse(text).is_err());
    }
}
