// src/specs/gamelog.rs
//! Player game log: `/players/<i>/<slug>/gamelog/<season>`.
//!
//! The log is the `table.row_summable` on the page. Its header is one `<th>`
//! per column starting with `Rk`; body rows carry `Rk` as a `<th>` and the
//! rest as `<td>`, so a synthetic rank is put back in front of the `<td>`
//! texts to make header indices line up with cells.
//!
//! Games the player sat out still get a row, with a single wide cell such as
//! "Inactive" or "Did Not Play". Those become `RowOutcome::Skipped`.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use chrono::NaiveDate;
use scraper::Html;

use super::{ExtractError, TableChoice};
use crate::config::consts::{DATE_HEADER, GAMELOG_TABLE_CLASS, PTS_HEADER};
use crate::core::html::{body_rows, header_index, tables_with_class, td_texts};
use crate::core::sanitize::parse_points;
use crate::core::PageSource;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    Inactive,
    DidNotPlay,
    DidNotDress,
    NotWithTeam,
    Suspended,
    /// Repeated header or spacer row inside the body
    Separator,
}

impl SkipReason {
    const MARKERS: [(&'static str, SkipReason); 5] = [
        ("Inactive", SkipReason::Inactive),
        ("Did Not Play", SkipReason::DidNotPlay),
        ("Did Not Dress", SkipReason::DidNotDress),
        ("Not With Team", SkipReason::NotWithTeam),
        ("Player Suspended", SkipReason::Suspended),
    ];

    /// Non-participation marker among a row's cells (exact cell match).
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        cells.iter().find_map(|cell| {
            Self::MARKERS
                .iter()
                .find(|(marker, _)| cell == marker)
                .map(|(_, reason)| *reason)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameLine {
    pub date: Option<NaiveDate>,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Game(GameLine),
    Skipped(SkipReason),
    Malformed(String),
}

/// Header map plus the raw body rows of the chosen table.
/// Row cells are `[rank, td...]`.
#[derive(Clone, Debug)]
pub struct StatsTable {
    pub choice: TableChoice,
    pub headers: HashMap<String, usize>,
    pub rows: Vec<Vec<String>>,
}

impl StatsTable {
    pub fn column(&self, name: &'static str) -> Result<usize, ExtractError> {
        self.headers
            .get(name)
            .copied()
            .ok_or(ExtractError::MissingColumn(name))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub games: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub malformed: Vec<String>,
}

impl ExtractReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn count(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Game(_) => self.games += 1,
            RowOutcome::Skipped(reason) => *self.skipped.entry(*reason).or_default() += 1,
            RowOutcome::Malformed(msg) => self.malformed.push(msg.clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamelogBundle {
    pub choice: TableChoice,
    pub games: Vec<GameLine>,
    pub report: ExtractReport,
}

pub fn fetch(
    src: &mut dyn PageSource,
    url: &str,
    dated: bool,
) -> Result<GamelogBundle, ExtractError> {
    let html_doc = src.page_source(url)?;
    let t = Instant::now();
    let out = parse_doc(&html_doc, dated)?;
    log::debug!("Gamelog: parsed {url} in {:?}", t.elapsed());
    out.choice.report(url);
    Ok(out)
}

/// Pick the game log table and return its headers and body rows.
pub fn extract_table(html_doc: &str) -> Result<StatsTable, ExtractError> {
    let doc = Html::parse_document(html_doc);
    let tables = tables_with_class(&doc, GAMELOG_TABLE_CLASS)?;
    let choice = TableChoice::from_count(tables.len());

    let Some(table) = tables.first().copied() else {
        return Ok(StatsTable { choice, headers: HashMap::new(), rows: Vec::new() });
    };

    let headers = header_index(table)?;
    let mut rows = Vec::new();
    for (idx, tr) in body_rows(table)?.into_iter().enumerate() {
        let mut cells = td_texts(tr)?;
        cells.insert(0, (idx + 1).to_string());
        rows.push(cells);
    }

    Ok(StatsTable { choice, headers, rows })
}

/// One body row -> game, named skip, or a description of what was wrong.
pub fn read_row(cells: &[String], pts_col: usize, date_col: Option<usize>) -> RowOutcome {
    // rank only: header repeat or spacer
    if cells.len() <= 1 {
        return RowOutcome::Skipped(SkipReason::Separator);
    }
    if let Some(reason) = SkipReason::from_cells(cells) {
        return RowOutcome::Skipped(reason);
    }

    let Some(raw_pts) = cells.get(pts_col) else {
        return RowOutcome::Malformed(format!("no PTS cell (col {pts_col}) in {cells:?}"));
    };
    let Some(points) = parse_points(raw_pts) else {
        return RowOutcome::Malformed(format!("PTS {raw_pts:?} is not a number in {cells:?}"));
    };

    let date = match date_col {
        None => None,
        Some(col) => {
            let raw = cells.get(col).map(String::as_str).unwrap_or("");
            match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    return RowOutcome::Malformed(format!("Date {raw:?} unreadable in {cells:?}"));
                }
            }
        }
    };

    RowOutcome::Game(GameLine { date, points })
}

/// Parse a game log page. `dated` asks for each game's date as well.
pub fn parse_doc(html_doc: &str, dated: bool) -> Result<GamelogBundle, ExtractError> {
    let table = extract_table(html_doc)?;
    let mut report = ExtractReport::default();

    if table.choice == TableChoice::Missing {
        return Ok(GamelogBundle { choice: table.choice, games: Vec::new(), report });
    }

    let pts_col = table.column(PTS_HEADER)?;
    let date_col = if dated { Some(table.column(DATE_HEADER)?) } else { None };

    let mut games = Vec::with_capacity(table.rows.len());
    for cells in &table.rows {
        let outcome = read_row(cells, pts_col, date_col);
        report.count(&outcome);
        match outcome {
            RowOutcome::Game(g) => games.push(g),
            RowOutcome::Skipped(_) => {}
            RowOutcome::Malformed(msg) => log::warn!("Gamelog: skipping row: {msg}"),
        }
    }

    Ok(GamelogBundle { choice: table.choice, games, report })
}
