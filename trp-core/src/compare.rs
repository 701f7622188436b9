//! Comparison - how win rates moved between two tournaments
//!
//! An entry missing from one side means the pairing was never played there,
//! which is different from a pairing that was played and always lost. Such
//! entries report [`Delta::NoData`] instead of a swing.
//!
//! Per-bot aggregates follow the same rule: they only sum the pairings that
//! were played on both sides, so a new or dropped matchup never moves a bot's
//! delta.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::table::{participants, BotPair, BotRecord, PairStats, RateMetric, WinRateTable};

/// Change in one bot's rate
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Delta {
    NoData,
    Change { before: f64, after: f64 },
}

impl Delta {
    /// Delta between two optional records under `metric`.
    ///
    /// Either side missing or without games gives `NoData`.
    pub fn between(before: Option<BotRecord>, after: Option<BotRecord>, metric: RateMetric) -> Self {
        match (
            before.and_then(|r| r.rate(metric)),
            after.and_then(|r| r.rate(metric)),
        ) {
            (Some(before), Some(after)) => Delta::Change { before, after },
            _ => Delta::NoData,
        }
    }

    /// Signed change as a fraction in `[-1, 1]`
    pub fn value(&self) -> Option<f64> {
        match *self {
            Delta::NoData => None,
            Delta::Change { before, after } => Some(after - before),
        }
    }

    /// Signed change in percentage points, `[-100, 100]`
    pub fn percentage_points(&self) -> Option<f64> {
        self.value().map(|v| v * 100.0)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Delta::NoData)
    }
}

/// Both sides of one (map, pair) key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairDelta {
    pair: BotPair,
    before: Option<PairStats>,
    after: Option<PairStats>,
}

impl PairDelta {
    pub fn pair(&self) -> &BotPair {
        &self.pair
    }

    pub fn before(&self) -> Option<&PairStats> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&PairStats> {
        self.after.as_ref()
    }

    /// Delta from `bot`'s perspective; `None` if `bot` is not in the pair
    pub fn delta_for(&self, bot: &str, metric: RateMetric) -> Option<Delta> {
        if !self.pair.contains(bot) {
            return None;
        }
        Some(Delta::between(
            self.before.as_ref().and_then(|s| s.record_for(bot)),
            self.after.as_ref().and_then(|s| s.record_for(bot)),
            metric,
        ))
    }

    /// Whether the pairing has games on both sides
    pub fn is_shared(&self) -> bool {
        let played = |s: &Option<PairStats>| s.as_ref().is_some_and(|s| s.games() > 0);
        played(&self.before) && played(&self.after)
    }
}

/// One bot's aggregate before and after, over the pairings played in both.
///
/// Both sides are `None` when no pairing was shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BotDelta {
    pub before: Option<BotRecord>,
    pub after: Option<BotRecord>,
}

impl BotDelta {
    /// Sum `bot`'s records over the shared entries among `entries`
    pub fn over_shared<'a>(entries: impl IntoIterator<Item = &'a PairDelta>, bot: &str) -> Self {
        let mut out = BotDelta::default();
        for entry in entries {
            if !entry.is_shared() {
                continue;
            }
            let before = entry.before.as_ref().and_then(|s| s.record_for(bot));
            let after = entry.after.as_ref().and_then(|s| s.record_for(bot));
            if let (Some(b), Some(a)) = (before, after) {
                *out.before.get_or_insert_with(BotRecord::default) += b;
                *out.after.get_or_insert_with(BotRecord::default) += a;
            }
        }
        out
    }

    pub fn delta(&self, metric: RateMetric) -> Delta {
        Delta::between(self.before, self.after, metric)
    }
}

/// Comparison of two win-rate tables, keyed like a [`WinRateTable`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaTable {
    pub(crate) maps: Vec<String>,
    pub(crate) bots: BTreeSet<String>,
    pub(crate) pairs: BTreeMap<String, BTreeMap<BotPair, PairDelta>>,
    /// Per (map, bot) aggregates over all opponents
    pub(crate) singles: BTreeMap<String, BTreeMap<String, BotDelta>>,
    /// Per bot aggregates over all maps
    pub(crate) overall: BTreeMap<String, BotDelta>,
}

/// Compare `before` against `after`.
///
/// Keys are the union of both tables. Map order follows `after`, with maps
/// only found in `before` appended in their original order.
pub fn compare(before: &WinRateTable, after: &WinRateTable) -> DeltaTable {
    let mut maps = after.maps().to_vec();
    for map in before.maps() {
        if !maps.contains(map) {
            maps.push(map.clone());
        }
    }

    let mut pairs = BTreeMap::new();
    let mut singles = BTreeMap::new();
    for map in &maps {
        let entries = compare_pairs(before, after, map);
        singles.insert(map.clone(), compare_singles(&entries));
        pairs.insert(map.clone(), entries);
    }

    let bots = participants(&pairs);
    let overall = bots
        .iter()
        .map(|bot| {
            let entries = pairs.values().flat_map(|m| m.values());
            (bot.clone(), BotDelta::over_shared(entries, bot))
        })
        .collect();

    DeltaTable {
        maps,
        bots,
        pairs,
        singles,
        overall,
    }
}

fn compare_pairs(before: &WinRateTable, after: &WinRateTable, map: &str) -> BTreeMap<BotPair, PairDelta> {
    let mut out: BTreeMap<BotPair, PairDelta> = BTreeMap::new();

    for stats in before.pairs(map) {
        out.insert(
            stats.pair().clone(),
            PairDelta {
                pair: stats.pair().clone(),
                before: Some(stats.clone()),
                after: None,
            },
        );
    }
    for stats in after.pairs(map) {
        out.entry(stats.pair().clone())
            .or_insert_with(|| PairDelta {
                pair: stats.pair().clone(),
                before: None,
                after: None,
            })
            .after = Some(stats.clone());
    }

    out
}

/// One entry per bot taking part in any pairing of the map
fn compare_singles(entries: &BTreeMap<BotPair, PairDelta>) -> BTreeMap<String, BotDelta> {
    let bots: BTreeSet<&str> = entries
        .keys()
        .flat_map(|pair| [pair.first(), pair.second()])
        .collect();

    bots.into_iter()
        .map(|bot| (bot.to_string(), BotDelta::over_shared(entries.values(), bot)))
        .collect()
}

impl DeltaTable {
    pub fn maps(&self) -> &[String] {
        &self.maps
    }

    pub fn bots(&self) -> impl Iterator<Item = &str> {
        self.bots.iter().map(String::as_str)
    }

    pub fn contains_bot(&self, bot: &str) -> bool {
        self.bots.contains(bot)
    }

    pub fn pairs(&self, map: &str) -> impl Iterator<Item = &PairDelta> {
        self.pairs.get(map).into_iter().flat_map(|p| p.values())
    }

    pub fn entry(&self, map: &str, a: &str, b: &str) -> Option<&PairDelta> {
        self.pairs.get(map)?.get(&BotPair::new(a, b))
    }

    /// `bot`'s change against `opponent` on `map`
    pub fn delta(&self, map: &str, bot: &str, opponent: &str, metric: RateMetric) -> Option<Delta> {
        self.entry(map, bot, opponent)?.delta_for(bot, metric)
    }

    /// `bot`'s change on `map` over all opponents
    pub fn bot_delta(&self, map: &str, bot: &str, metric: RateMetric) -> Option<Delta> {
        self.singles.get(map)?.get(bot).map(|d| d.delta(metric))
    }

    /// `bot`'s change against `opponent` summed over every map
    pub fn pair_overall_delta(&self, bot: &str, opponent: &str, metric: RateMetric) -> Option<Delta> {
        let entries: Vec<&PairDelta> = self
            .maps
            .iter()
            .filter_map(|m| self.entry(m, bot, opponent))
            .collect();
        if entries.is_empty() {
            return None;
        }
        Some(BotDelta::over_shared(entries, bot).delta(metric))
    }

    /// `bot`'s change over every map
    pub fn overall_delta(&self, bot: &str, metric: RateMetric) -> Option<Delta> {
        self.overall.get(bot).map(|d| d.delta(metric))
    }

    pub fn bot_entry(&self, map: &str, bot: &str) -> Option<&BotDelta> {
        self.singles.get(map)?.get(bot)
    }

    pub fn overall_entry(&self, bot: &str) -> Option<&BotDelta> {
        self.overall.get(bot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::record::MatchRecord;
    use approx::assert_relative_eq;

    fn games(map: &str, a: &str, b: &str, a_wins: usize, b_wins: usize, draws: usize) -> Vec<MatchRecord> {
        let mut out = Vec::new();
        for _ in 0..a_wins {
            out.push(MatchRecord::new(map, a, b, Some(a)).unwrap());
        }
        for _ in 0..b_wins {
            out.push(MatchRecord::new(map, a, b, Some(b)).unwrap());
        }
        for _ in 0..draws {
            out.push(MatchRecord::new(map, a, b, None).unwrap());
        }
        out
    }

    #[test]
    fn test_half_to_three_quarters() {
        let before = aggregate(&games("m1", "A", "B", 2, 2, 0), None);
        let after = aggregate(&games("m1", "A", "B", 3, 1, 0), None);
        let deltas = compare(&before, &after);

        let a = deltas.delta("m1", "A", "B", RateMetric::WinRate).unwrap();
        let b = deltas.delta("m1", "B", "A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(a.value().unwrap(), 0.25);
        assert_relative_eq!(a.percentage_points().unwrap(), 25.0);
        assert_relative_eq!(b.value().unwrap(), -0.25);
    }

    #[test]
    fn test_pair_missing_before_is_no_data() {
        let mut after_records = games("m1", "A", "B", 1, 1, 0);
        after_records.extend(games("m2", "A", "C", 3, 0, 0));
        let before = aggregate(&games("m1", "A", "B", 1, 1, 0), None);
        let after = aggregate(&after_records, None);
        let deltas = compare(&before, &after);

        let new_pairing = deltas.delta("m2", "A", "C", RateMetric::WinRate).unwrap();
        assert_eq!(new_pairing, Delta::NoData);
        assert!(deltas.entry("m2", "A", "C").unwrap().before().is_none());
        assert_eq!(deltas.bot_delta("m2", "C", RateMetric::WinRate), Some(Delta::NoData));
    }

    #[test]
    fn test_pair_missing_after_is_no_data() {
        let before = aggregate(&games("m1", "A", "B", 1, 0, 0), None);
        let after = aggregate(&games("m1", "A", "C", 1, 0, 0), None);
        let deltas = compare(&before, &after);

        assert_eq!(deltas.delta("m1", "A", "B", RateMetric::WinRate), Some(Delta::NoData));
        assert!(deltas.contains_bot("B"));
    }

    #[test]
    fn test_zero_games_is_no_data() {
        let filter = crate::maps::MapList::new(["m1", "empty"]);
        let table = aggregate(&games("m1", "A", "B", 1, 2, 1), Some(&filter));
        let deltas = compare(&table, &table);
        assert_eq!(deltas.delta("empty", "A", "B", RateMetric::WinRate), Some(Delta::NoData));
    }

    #[test]
    fn test_compare_with_itself_is_flat() {
        let mut records = games("m1", "A", "B", 3, 1, 2);
        records.extend(games("m2", "B", "C", 0, 4, 1));
        records.extend(games("m2", "A", "C", 2, 2, 0));
        let filter = crate::maps::MapList::new(["m1", "m2", "m3"]);
        let table = aggregate(&records, Some(&filter));
        let deltas = compare(&table, &table);

        for map in deltas.maps() {
            for entry in deltas.pairs(map) {
                for bot in [entry.pair().first(), entry.pair().second()] {
                    for metric in [RateMetric::WinRate, RateMetric::ScoreRate] {
                        let d = entry.delta_for(bot, metric).unwrap();
                        assert!(d.is_no_data() || d.value() == Some(0.0), "{} {} {:?}", map, bot, d);
                    }
                }
            }
        }
        for bot in deltas.bots() {
            assert_eq!(deltas.overall_delta(bot, RateMetric::WinRate).unwrap().value(), Some(0.0));
        }
    }

    #[test]
    fn test_bot_and_overall_deltas() {
        let mut before_records = games("m1", "A", "B", 1, 1, 0);
        before_records.extend(games("m1", "A", "C", 0, 2, 0));
        let mut after_records = games("m1", "A", "B", 2, 0, 0);
        after_records.extend(games("m1", "A", "C", 1, 1, 0));

        let deltas = compare(&aggregate(&before_records, None), &aggregate(&after_records, None));

        // A: 1/4 -> 3/4
        let a = deltas.bot_delta("m1", "A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(a.value().unwrap(), 0.5);
        let overall = deltas.overall_delta("A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(overall.value().unwrap(), 0.5);
        assert!(deltas.bot_delta("m9", "A", RateMetric::WinRate).is_none());
    }

    #[test]
    fn test_new_matchup_does_not_move_bot_delta() {
        let before = aggregate(&games("m1", "A", "B", 1, 0, 0), None);
        let mut after_records = games("m1", "A", "B", 1, 0, 0);
        after_records.extend(games("m1", "C", "A", 1, 0, 0));
        let deltas = compare(&before, &aggregate(&after_records, None));

        assert_eq!(deltas.delta("m1", "A", "C", RateMetric::WinRate), Some(Delta::NoData));
        let a = deltas.bot_delta("m1", "A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(a.value().unwrap(), 0.0);
        let overall = deltas.overall_delta("A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(overall.value().unwrap(), 0.0);

        // C has no matchup on both sides
        assert_eq!(deltas.bot_delta("m1", "C", RateMetric::WinRate), Some(Delta::NoData));
        assert_eq!(deltas.overall_delta("C", RateMetric::WinRate), Some(Delta::NoData));
    }

    #[test]
    fn test_dropped_matchup_does_not_move_bot_delta() {
        let mut before_records = games("m1", "A", "B", 1, 1, 0);
        before_records.extend(games("m2", "A", "C", 0, 3, 0));
        let after = aggregate(&games("m1", "A", "B", 2, 0, 0), None);
        let deltas = compare(&aggregate(&before_records, None), &after);

        // Only A-B on m1 counts: 1/2 -> 2/2
        let overall = deltas.overall_delta("A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(overall.value().unwrap(), 0.5);
        assert_eq!(deltas.bot_delta("m2", "A", RateMetric::WinRate), Some(Delta::NoData));

        let pair = deltas.pair_overall_delta("B", "A", RateMetric::WinRate).unwrap();
        assert_relative_eq!(pair.value().unwrap(), -0.5);
        assert_eq!(deltas.pair_overall_delta("A", "C", RateMetric::WinRate), Some(Delta::NoData));
        assert!(deltas.pair_overall_delta("B", "C", RateMetric::WinRate).is_none());
    }

    #[test]
    fn test_score_rate_counts_draws() {
        let before = aggregate(&games("m1", "A", "B", 0, 0, 2), None);
        let after = aggregate(&games("m1", "A", "B", 2, 0, 0), None);
        let deltas = compare(&before, &after);

        let d = deltas.delta("m1", "A", "B", RateMetric::ScoreRate).unwrap();
        assert_relative_eq!(d.value().unwrap(), 0.5);
        let d = deltas.delta("m1", "B", "A", RateMetric::ScoreRate).unwrap();
        assert_relative_eq!(d.value().unwrap(), -0.5);
    }

    #[test]
    fn test_map_order_follows_after() {
        let mut before_records = games("m1", "A", "B", 1, 0, 0);
        before_records.extend(games("old", "A", "B", 1, 0, 0));
        let after_records = games("m1", "A", "B", 1, 0, 0);
        let before = aggregate(&before_records, None);
        let after = aggregate(&after_records, Some(&crate::maps::MapList::new(["new", "m1"])));

        let deltas = compare(&before, &after);
        assert_eq!(deltas.maps(), &["new", "m1", "old"]);
    }
}
