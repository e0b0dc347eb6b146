// src/players.rs
//
// Per-player point collection: saved state first, then whatever seasons
// still need scraping, then save again.
//
// - `Keep::List` players (finished careers) are scraped once, saved as a
//   flat list and read back on every later run.
// - `Keep::PointMap` players are re-scraped every run, the current season
//   only once the map has history, and merged by date.

use std::path::Path;

use chrono::NaiveDate;

use crate::config::options::{season_end_year, Keep, PlayerSpec};
use crate::core::PageSource;
use crate::progress::Progress;
use crate::specs::gamelog::{self, GameLine};
use crate::store::{self, LoadOutcome};
use crate::tally::{merge_games, MergeOutcome, PointMap};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerPoints {
    pub name: String,
    /// Chronological per-game points
    pub points: Vec<u32>,
    pub merge: MergeOutcome,
    /// Date of the newest recorded game (point-map players only)
    pub last_game: Option<NaiveDate>,
}

impl PlayerPoints {
    pub fn total(&self) -> u32 {
        self.points.iter().sum()
    }
}

/// Games from every season in `seasons`, plus how many pages failed.
pub fn scrape_seasons(
    src: &mut dyn PageSource,
    spec: &PlayerSpec,
    seasons: impl Iterator<Item = i32> + Clone,
    dated: bool,
    progress: &mut dyn Progress,
) -> (Vec<GameLine>, usize) {
    let mut games = Vec::new();
    let mut failed = 0usize;

    progress.begin(&spec.name, seasons.clone().count());
    for season in seasons {
        match gamelog::fetch(src, &spec.gamelog_url(season), dated) {
            Ok(bundle) => {
                progress.item_done(season, &bundle.report);
                games.extend(bundle.games);
            }
            Err(e) => {
                failed += 1;
                progress.item_failed(season, &e.to_string());
            }
        }
    }
    progress.finish();

    (games, failed)
}

pub fn collect(
    src: &mut dyn PageSource,
    spec: &PlayerSpec,
    store_dir: &Path,
    today: NaiveDate,
    progress: &mut dyn Progress,
) -> PlayerPoints {
    match &spec.keep {
        Keep::List(file) => collect_list(src, spec, &store_dir.join(file), today, progress),
        Keep::PointMap(file) => collect_map(src, spec, &store_dir.join(file), today, progress),
    }
}

fn collect_list(
    src: &mut dyn PageSource,
    spec: &PlayerSpec,
    path: &Path,
    today: NaiveDate,
    progress: &mut dyn Progress,
) -> PlayerPoints {
    let done = |points: Vec<u32>| PlayerPoints {
        name: spec.name.clone(),
        points,
        merge: MergeOutcome::default(),
        last_game: None,
    };

    match store::load_point_list(path) {
        LoadOutcome::Loaded { value, .. } => {
            log::info!("{}: read {} game(s) from {}", spec.name, value.len(), path.display());
            return done(value);
        }
        LoadOutcome::Missing => {}
        LoadOutcome::Corrupt(why) => {
            log::warn!("{}: {} unreadable ({why}); scraping again", spec.name, path.display());
        }
    }

    let (games, failed) = scrape_seasons(src, spec, spec.seasons(today), false, progress);
    let points: Vec<u32> = games.iter().map(|g| g.points).collect();

    // A partial career saved now would never be refreshed.
    if failed == 0 && !points.is_empty() {
        if let Err(e) = store::save_point_list(path, &points) {
            log::error!("{}: could not save list: {e}", spec.name);
        }
    } else {
        log::warn!("{}: {failed} season(s) failed, not saving {}", spec.name, path.display());
    }
    done(points)
}

fn collect_map(
    src: &mut dyn PageSource,
    spec: &PlayerSpec,
    path: &Path,
    today: NaiveDate,
    progress: &mut dyn Progress,
) -> PlayerPoints {
    let mut map: PointMap = store::load_point_map(path).into_value(path);

    let all = spec.seasons(today);
    let seasons = if map.is_empty() {
        all
    } else {
        let current = season_end_year(today).min(*all.end()).max(*all.start());
        current..=current
    };
    log::info!(
        "{}: {} saved game(s), scraping seasons {}-{}",
        spec.name,
        map.len(),
        seasons.start(),
        seasons.end()
    );

    let full_history = map.is_empty();
    let (games, failed) = scrape_seasons(src, spec, seasons, true, progress);
    let merge = merge_games(&mut map, &games);
    log::info!(
        "{}: {} new game(s), {} already recorded",
        spec.name,
        merge.added,
        merge.already_present
    );

    // Once saved, only the current season is refetched: a history with holes
    // would keep them for good.
    if full_history && failed > 0 {
        log::warn!(
            "{}: {failed} season(s) failed on a full scrape, not saving {}",
            spec.name,
            path.display()
        );
    } else if let Err(e) = store::save_point_map(path, &map) {
        log::error!("{}: could not save point map: {e}", spec.name);
    }

    PlayerPoints {
        name: spec.name.clone(),
        points: map.point_list(),
        merge,
        last_game: map.last_date(),
    }
}
