// src/specs/mod.rs
//! # Page specs
//!
//! One module per remote page. Each knows *where the ground truth lives in
//! the HTML* (table class, header text, cell positions) and turns markup
//! into small typed rows. Nothing here fetches on its own schedule, caches,
//! or persists: callers hand in a `PageSource` or raw markup.
//!
//! - `gamelog`  – a player's per-season game log (`table.row_summable`),
//!   one `RowOutcome` per body row.
//! - `schedule` – a team's season schedule (`table.sortable`), future games
//!   only.
//!
//! Specs degrade instead of failing: a missing table yields an empty result
//! plus a logged diagnostic. Only a broken page contract (a required column
//! header gone) is an error.

use thiserror::Error;

use crate::core::html::SelectorError;
use crate::core::FetchError;

pub mod gamelog;
pub mod schedule;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("table has no `{0}` column; site layout may have changed")]
    MissingColumn(&'static str),
}

/// Which candidate table a page parse used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableChoice {
    Single,
    /// Two candidates (regular season + playoffs): the first is used.
    FirstOfTwo,
    /// More than two candidates: the first is used, result may be unreliable.
    FirstOfMany(usize),
    /// No candidate at all.
    Missing,
}

impl TableChoice {
    pub fn from_count(n: usize) -> Self {
        match n {
            0 => TableChoice::Missing,
            1 => TableChoice::Single,
            2 => TableChoice::FirstOfTwo,
            n => TableChoice::FirstOfMany(n),
        }
    }

    /// Log what the page looked like when it isn't the clean one-table case.
    pub fn report(self, what: &str) {
        match self {
            TableChoice::Single => {}
            TableChoice::FirstOfTwo => log::debug!("{what}: two tables, using the first"),
            TableChoice::FirstOfMany(n) => log::warn!(
                "{what}: {n} tables where one was expected, probably playoffs; using the first"
            ),
            TableChoice::Missing => log::warn!("{what}: no table found; continuing with no rows"),
        }
    }
}
