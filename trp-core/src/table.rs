//! Win-rate tables - aggregated results keyed by map and bot pair
//!
//! Buckets store counts symmetrically (wins keyed by each participant, shared
//! draws and games), so any bot of a pair can be read as "self" or "opponent".

use std::collections::{BTreeMap, BTreeSet};
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Which rate a view reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateMetric {
    /// wins / games
    #[default]
    WinRate,
    /// (wins + draws / 2) / games, the official MicroRTS score
    ScoreRate,
}

impl RateMetric {
    pub fn label(&self) -> &'static str {
        match self {
            RateMetric::WinRate => "Win Rate",
            RateMetric::ScoreRate => "Score",
        }
    }
}

/// Unordered pair of bots, stored in lexicographic order
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BotPair {
    first: String,
    second: String,
}

impl BotPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, bot: &str) -> bool {
        self.first == bot || self.second == bot
    }

    /// The other member of the pair
    pub fn other(&self, bot: &str) -> Option<&str> {
        if self.first == bot {
            Some(&self.second)
        } else if self.second == bot {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Wins, losses and draws from one bot's perspective
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games: u32,
}

impl BotRecord {
    /// Rate under `metric`, or `None` when no games were played
    pub fn rate(&self, metric: RateMetric) -> Option<f64> {
        match metric {
            RateMetric::WinRate => self.win_rate(),
            RateMetric::ScoreRate => self.score_rate(),
        }
    }

    pub fn win_rate(&self) -> Option<f64> {
        if self.games == 0 {
            None
        } else {
            Some(self.wins as f64 / self.games as f64)
        }
    }

    /// Ties count as half a win
    pub fn score_rate(&self) -> Option<f64> {
        if self.games == 0 {
            None
        } else {
            Some((self.wins as f64 + 0.5 * self.draws as f64) / self.games as f64)
        }
    }
}

impl AddAssign for BotRecord {
    fn add_assign(&mut self, other: Self) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.draws += other.draws;
        self.games += other.games;
    }
}

/// One (map, bot pair) bucket
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairStats {
    pair: BotPair,
    /// Wins credited to `pair.first` and `pair.second`
    wins: [u32; 2],
    draws: u32,
    games: u32,
}

impl PairStats {
    pub fn empty(pair: BotPair) -> Self {
        Self {
            pair,
            wins: [0, 0],
            draws: 0,
            games: 0,
        }
    }

    pub fn pair(&self) -> &BotPair {
        &self.pair
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    fn slot(&self, bot: &str) -> Option<usize> {
        if self.pair.first == bot {
            Some(0)
        } else if self.pair.second == bot {
            Some(1)
        } else {
            None
        }
    }

    pub fn wins_by(&self, bot: &str) -> Option<u32> {
        self.slot(bot).map(|i| self.wins[i])
    }

    pub fn losses_by(&self, bot: &str) -> Option<u32> {
        self.slot(bot).map(|i| self.wins[1 - i])
    }

    /// The bucket seen from `bot`, or `None` if `bot` is not in the pair
    pub fn record_for(&self, bot: &str) -> Option<BotRecord> {
        self.slot(bot).map(|i| BotRecord {
            wins: self.wins[i],
            losses: self.wins[1 - i],
            draws: self.draws,
            games: self.games,
        })
    }

    /// Count one game. `winner` must be a member of the pair or `None`.
    pub(crate) fn add_game(&mut self, winner: Option<&str>) {
        match winner.and_then(|w| self.slot(w)) {
            Some(i) => self.wins[i] += 1,
            None => self.draws += 1,
        }
        self.games += 1;
    }
}

/// A bot's place in a ranking
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    pub bot: String,
    pub record: BotRecord,
    /// `None` when the bot has no games
    pub rate: Option<f64>,
}

pub(crate) type Buckets = BTreeMap<String, BTreeMap<BotPair, PairStats>>;

/// Aggregated results, keyed by map then bot pair
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinRateTable {
    pub(crate) maps: Vec<String>,
    pub(crate) bots: BTreeSet<String>,
    pub(crate) buckets: Buckets,
}

impl WinRateTable {
    pub(crate) fn from_buckets(maps: Vec<String>, buckets: Buckets) -> Self {
        let bots = participants(&buckets);
        Self {
            maps,
            bots,
            buckets,
        }
    }

    /// Maps in report order
    pub fn maps(&self) -> &[String] {
        &self.maps
    }

    /// Every bot that takes part in at least one bucket, sorted
    pub fn bots(&self) -> impl Iterator<Item = &str> {
        self.bots.iter().map(String::as_str)
    }

    pub fn contains_bot(&self, bot: &str) -> bool {
        self.bots.contains(bot)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(BTreeMap::is_empty)
    }

    /// Buckets of one map
    pub fn pairs(&self, map: &str) -> impl Iterator<Item = &PairStats> {
        self.buckets.get(map).into_iter().flat_map(|b| b.values())
    }

    /// All buckets with their map, in map order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PairStats)> {
        self.maps
            .iter()
            .flat_map(move |m| self.pairs(m).map(move |p| (m.as_str(), p)))
    }

    pub fn pair(&self, map: &str, a: &str, b: &str) -> Option<&PairStats> {
        self.buckets.get(map)?.get(&BotPair::new(a, b))
    }

    /// `bot`'s record against `opponent` on `map`
    pub fn record(&self, map: &str, bot: &str, opponent: &str) -> Option<BotRecord> {
        self.pair(map, bot, opponent)?.record_for(bot)
    }

    /// `bot`'s record on `map` summed over all opponents
    pub fn bot_record(&self, map: &str, bot: &str) -> Option<BotRecord> {
        sum_records(self.pairs(map), bot)
    }

    /// `bot`'s record over every map and opponent
    pub fn overall(&self, bot: &str) -> Option<BotRecord> {
        sum_records(self.buckets.values().flat_map(|b| b.values()), bot)
    }

    /// Opponents `bot` has a bucket with, on any map
    pub fn opponents(&self, bot: &str) -> BTreeSet<&str> {
        self.buckets
            .values()
            .flat_map(|b| b.keys())
            .filter_map(|pair| pair.other(bot))
            .collect()
    }

    pub fn total_games(&self) -> u64 {
        self.buckets
            .values()
            .flat_map(|b| b.values())
            .map(|p| p.games as u64)
            .sum()
    }

    /// Bots ranked by rate on one map, or over all maps when `map` is `None`.
    ///
    /// Highest rate first, ties broken by name, bots without games last.
    pub fn standings(&self, map: Option<&str>, metric: RateMetric) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .bots
            .iter()
            .filter_map(|bot| {
                let record = match map {
                    Some(m) => self.bot_record(m, bot),
                    None => self.overall(bot),
                }?;
                Some(Standing {
                    bot: bot.clone(),
                    record,
                    rate: record.rate(metric),
                })
            })
            .collect();

        standings.sort_by(|a, b| match (a.rate, b.rate) {
            (Some(x), Some(y)) => y
                .partial_cmp(&x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.bot.cmp(&b.bot)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.bot.cmp(&b.bot),
        });

        standings
    }
}

fn sum_records<'a>(pairs: impl Iterator<Item = &'a PairStats>, bot: &str) -> Option<BotRecord> {
    pairs
        .filter_map(|p| p.record_for(bot))
        .fold(None, |acc: Option<BotRecord>, r| {
            let mut total = acc.unwrap_or_default();
            total += r;
            Some(total)
        })
}

pub(crate) fn participants<V>(buckets: &BTreeMap<String, BTreeMap<BotPair, V>>) -> BTreeSet<String> {
    buckets
        .values()
        .flat_map(|b| b.keys())
        .flat_map(|pair| [pair.first.clone(), pair.second.clone()])
        .collect()
}
