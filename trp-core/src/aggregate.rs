//! Aggregation - fold match records into a win-rate table

use std::collections::{BTreeMap, BTreeSet};

use crate::maps::MapList;
use crate::record::MatchRecord;
use crate::table::{BotPair, Buckets, PairStats, WinRateTable};

/// Fold `records` into a [`WinRateTable`] in a single pass.
///
/// With a map filter, records on other maps are skipped and the table's maps
/// follow the filter's order. A filtered map that no record mentions still
/// gets a zero-game bucket for every pair seen on any other map. Without a
/// filter, maps are sorted by name so the result does not depend on record
/// order.
pub fn aggregate<'a, I>(records: I, maps: Option<&MapList>) -> WinRateTable
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut buckets: Buckets = BTreeMap::new();

    for record in records {
        if let Some(filter) = maps {
            if !filter.contains(record.map()) {
                continue;
            }
        }

        let pair = BotPair::new(record.bot_a(), record.bot_b());
        buckets
            .entry(record.map().to_string())
            .or_default()
            .entry(pair.clone())
            .or_insert_with(|| PairStats::empty(pair))
            .add_game(record.winner());
    }

    let order = match maps {
        Some(filter) => {
            pad_missing_maps(&mut buckets, filter);
            filter.as_slice().to_vec()
        }
        None => buckets.keys().cloned().collect(),
    };

    WinRateTable::from_buckets(order, buckets)
}

/// Give every filtered map without records an all-zero bucket per known pair
fn pad_missing_maps(buckets: &mut Buckets, filter: &MapList) {
    let known: BTreeSet<BotPair> = buckets.values().flat_map(|b| b.keys().cloned()).collect();

    for map in filter.iter() {
        buckets.entry(map.to_string()).or_insert_with(|| {
            known
                .iter()
                .map(|pair| (pair.clone(), PairStats::empty(pair.clone())))
                .collect()
        });
    }
}
