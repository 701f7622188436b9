//! Focus - restrict a table to the entries involving one bot

use std::collections::BTreeMap;

use crate::compare::{BotDelta, DeltaTable, PairDelta};
use crate::error::{ReportError, Result};
use crate::table::{participants, BotPair, PairStats, WinRateTable};

/// Tables that can be narrowed down to one bot.
///
/// Focusing keeps every map (possibly with no entries left), keeps only pair
/// entries that include the bot, and is idempotent.
pub trait Focus: Sized {
    /// Fails with [`ReportError::UnknownBot`] if `bot` takes part in no entry
    fn focus(&self, bot: &str) -> Result<Self>;
}

impl Focus for WinRateTable {
    fn focus(&self, bot: &str) -> Result<Self> {
        if !self.contains_bot(bot) {
            return Err(ReportError::UnknownBot(bot.to_string()));
        }

        let buckets: BTreeMap<String, BTreeMap<BotPair, PairStats>> = self
            .buckets
            .iter()
            .map(|(map, pairs)| {
                let kept = pairs
                    .iter()
                    .filter(|(pair, _)| pair.contains(bot))
                    .map(|(pair, stats)| (pair.clone(), stats.clone()))
                    .collect();
                (map.clone(), kept)
            })
            .collect();

        Ok(WinRateTable::from_buckets(self.maps.clone(), buckets))
    }
}

impl Focus for DeltaTable {
    fn focus(&self, bot: &str) -> Result<Self> {
        if !self.contains_bot(bot) {
            return Err(ReportError::UnknownBot(bot.to_string()));
        }

        let pairs: BTreeMap<String, BTreeMap<BotPair, PairDelta>> = self
            .pairs
            .iter()
            .map(|(map, entries)| {
                let kept = entries
                    .iter()
                    .filter(|(pair, _)| pair.contains(bot))
                    .map(|(pair, delta)| (pair.clone(), delta.clone()))
                    .collect();
                (map.clone(), kept)
            })
            .collect();

        let singles: BTreeMap<String, BTreeMap<String, BotDelta>> = self
            .singles
            .iter()
            .map(|(map, bots)| {
                let kept = bots
                    .iter()
                    .filter(|(name, _)| name.as_str() == bot)
                    .map(|(name, delta)| (name.clone(), *delta))
                    .collect();
                (map.clone(), kept)
            })
            .collect();

        let overall: BTreeMap<String, BotDelta> = self
            .overall
            .iter()
            .filter(|(name, _)| name.as_str() == bot)
            .map(|(name, delta)| (name.clone(), *delta))
            .collect();

        let bots = participants(&pairs);
        Ok(DeltaTable {
            maps: self.maps.clone(),
            bots,
            pairs,
            singles,
            overall,
        })
    }
}
