// src/specs/schedule.rs
//! Team schedule: `/teams/<TEAM>/<season>_games.html`.
//!
//! Columns are read by position within the `<td>` cells (the game number is
//! a row `<th>`): Date, Start (ET), network, box score, location (`@` when
//! away), Opponent, ...

use chrono::NaiveDate;
use scraper::Html;

use super::{ExtractError, TableChoice};
use crate::config::consts::SCHEDULE_TABLE_CLASS;
use crate::core::html::{body_rows, has_class, tables_with_class, td_texts};
use crate::core::PageSource;

const COL_DATE: usize = 0;
const COL_TIME: usize = 1;
const COL_LOCATION: usize = 4;
const COL_OPPONENT: usize = 5;

pub const SITE_DATE_FORMAT: &str = "%a, %b %d, %Y";
pub const DISPLAY_DATE_FORMAT: &str = "%m-%d-%Y";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    fn from_cell(cell: &str) -> Self {
        if cell == "@" { Location::Away } else { Location::Home }
    }

    /// "at Denver" / "against Denver"
    pub fn preposition(self) -> &'static str {
        match self {
            Location::Away => "at",
            Location::Home => "against",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub time: String,
    pub location: Location,
    pub opponent: String,
}

impl ScheduleEntry {
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

#[derive(Clone, Debug)]
pub struct ScheduleBundle {
    pub choice: TableChoice,
    /// Games after `today`, in page (chronological) order
    pub upcoming: Vec<ScheduleEntry>,
    pub unreadable: usize,
}

pub fn fetch(
    src: &mut dyn PageSource,
    url: &str,
    today: NaiveDate,
) -> Result<ScheduleBundle, ExtractError> {
    let html_doc = src.page_source(url)?;
    let out = parse_doc(&html_doc, today)?;
    out.choice.report(url);
    Ok(out)
}

pub fn parse_doc(html_doc: &str, today: NaiveDate) -> Result<ScheduleBundle, ExtractError> {
    let doc = Html::parse_document(html_doc);
    let tables = tables_with_class(&doc, SCHEDULE_TABLE_CLASS)?;
    let choice = TableChoice::from_count(tables.len());

    let mut upcoming = Vec::new();
    let mut unreadable = 0usize;

    if let Some(table) = tables.first().copied() {
        for tr in body_rows(table)? {
            if has_class(tr, "thead") {
                continue;
            }
            let cells = td_texts(tr)?;
            if cells.len() <= COL_OPPONENT {
                continue; // month separator / header repeat
            }
            let date = match NaiveDate::parse_from_str(&cells[COL_DATE], SITE_DATE_FORMAT) {
                Ok(d) => d,
                Err(_) => {
                    log::warn!("Schedule: unreadable date {:?}", cells[COL_DATE]);
                    unreadable += 1;
                    continue;
                }
            };
            if date <= today {
                continue;
            }
            upcoming.push(ScheduleEntry {
                date,
                time: cells[COL_TIME].clone(),
                location: Location::from_cell(&cells[COL_LOCATION]),
                opponent: cells[COL_OPPONENT].clone(),
            });
        }
    }

    upcoming.sort_by_key(|e| e.date);
    Ok(ScheduleBundle { choice, upcoming, unreadable })
}
