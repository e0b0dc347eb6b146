// src/config/options.rs
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::consts::*;
use crate::projection::Window;

#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub store_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Site abbreviation of the chaser's current team (schedule page)
    pub team: String,
    pub chaser: PlayerSpec,
    pub rivals: Vec<PlayerSpec>,
    pub windows: Vec<Window>,
    pub post: PostOptions,
    pub chart: ChartOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(STORE_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            team: s!("LAL"),
            chaser: PlayerSpec::new("LeBron", "jamesle01", 2004, None, Keep::PointMap(s!("lbj.json"))),
            rivals: vec![
                PlayerSpec::new("Kareem", "abdulka01", 1970, Some(1989), Keep::List(s!("kareem.csv"))),
                PlayerSpec::new("Malone", "malonka01", 1986, Some(2004), Keep::List(s!("malone.csv"))),
            ],
            windows: DEFAULT_WINDOWS.to_vec(),
            post: PostOptions::default(),
            chart: ChartOptions::default(),
        }
    }
}

impl AppOptions {
    pub fn store_path(&self, file: &str) -> PathBuf {
        self.store_dir.join(file)
    }

    pub fn schedule_url(&self, season: i32) -> String {
        format!("{SITE_ROOT}/teams/{}/{season}_games.html", self.team)
    }
}

/// How a tracked player's points survive between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keep {
    /// Date-keyed JSON map, merged incrementally every run.
    PointMap(String),
    /// Flat CSV line, written once after a full scrape and never refreshed.
    List(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSpec {
    pub name: String,
    /// Site id, e.g. "jamesle01"
    pub slug: String,
    /// Season end years, as used in gamelog URLs
    pub first_season: i32,
    /// None = still active (runs through the current season)
    pub last_season: Option<i32>,
    pub keep: Keep,
}

impl PlayerSpec {
    pub fn new(name: &str, slug: &str, first_season: i32, last_season: Option<i32>, keep: Keep) -> Self {
        Self { name: s!(name), slug: s!(slug), first_season, last_season, keep }
    }

    pub fn gamelog_url(&self, season: i32) -> String {
        let initial = self.slug.chars().next().unwrap_or('_');
        format!("{SITE_ROOT}/players/{initial}/{}/gamelog/{season}", self.slug)
    }

    /// Inclusive season range to scrape, given today's date.
    pub fn seasons(&self, today: NaiveDate) -> std::ops::RangeInclusive<i32> {
        let last = self.last_season.unwrap_or_else(|| season_end_year(today));
        self.first_season..=last
    }
}

/// Seasons are named by the year they end in; a new one starts in autumn.
pub fn season_end_year(today: NaiveDate) -> i32 {
    if today.month() >= 8 { today.year() + 1 } else { today.year() }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostOptions {
    /// Build and log the status, never call the API
    pub dry_run: bool,
    /// Post even when no new games were merged this run
    pub force: bool,
    /// Offset used to turn the last post's timestamp into a calendar date
    pub utc_offset_hours: i32,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self { dry_run: false, force: false, utc_offset_hours: EASTERN_UTC_OFFSET_HOURS }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartOptions {
    /// 0 = Monday .. 6 = Sunday; anything else never fires
    pub weekday: u32,
    pub force: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { weekday: CHART_WEEKDAY, force: false }
    }
}

impl ChartOptions {
    pub fn gate_is_reachable(&self) -> bool {
        self.weekday <= 6
    }

    pub fn due(&self, today: NaiveDate) -> bool {
        self.force || today.weekday().num_days_from_monday() == self.weekday
    }
}

pub fn chart_file_name(out_dir: &Path, today: NaiveDate) -> PathBuf {
    out_dir.join(format!("{CHART_PREFIX}{}.png", today.format("%Y-%m-%d")))
}
