// src/tally.rs
//
// Point bookkeeping: the date-keyed map persisted for the chaser, merging
// freshly scraped games into it, and the running totals derived from it.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::specs::gamelog::GameLine;

/// Points per game, keyed by game date. Iteration is date order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointMap {
    by_date: BTreeMap<NaiveDate, u32>,
}

impl PointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<u32> {
        self.by_date.get(&date).copied()
    }

    /// Record a game unless its date is already present. Never overwrites.
    pub fn insert_new(&mut self, date: NaiveDate, points: u32) -> bool {
        match self.by_date.entry(date) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(points);
                true
            }
        }
    }

    /// Chronological point list.
    pub fn point_list(&self) -> Vec<u32> {
        self.by_date.values().copied().collect()
    }

    pub fn total(&self) -> u32 {
        self.by_date.values().sum()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.by_date.iter().map(|(d, p)| (*d, *p))
    }
}

impl FromIterator<(NaiveDate, u32)> for PointMap {
    /// First value per date wins, same as `insert_new`.
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u32)>>(iter: I) -> Self {
        let mut map = PointMap::new();
        for (date, points) in iter {
            map.insert_new(date, points);
        }
        map
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub already_present: usize,
    /// Games without a date can't be keyed and are dropped
    pub undated: usize,
}

impl MergeOutcome {
    pub fn any_added(&self) -> bool {
        self.added > 0
    }
}

pub fn merge_games(map: &mut PointMap, games: &[GameLine]) -> MergeOutcome {
    let mut out = MergeOutcome::default();
    for game in games {
        match game.date {
            None => out.undated += 1,
            Some(date) if map.insert_new(date, game.points) => out.added += 1,
            Some(_) => out.already_present += 1,
        }
    }
    out
}

/// Running total: element i is the sum of games 0..=i.
pub fn cumulative_points(list: &[u32]) -> Vec<u32> {
    list.iter()
        .scan(0u32, |acc, &p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}
