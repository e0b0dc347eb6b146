// src/store.rs
//
// Local state under the store dir:
// - the chaser's point map: JSON object {"YYYY-MM-DD": points}
// - rivals' finished careers: one CSV line of points per file
//
// Loads never fail the run. They come back as an outcome saying what was
// found so the caller can log it and start fresh.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::config::consts::STORE_SEP;
use crate::specs::gamelog::DATE_FORMAT;
use crate::tally::PointMap;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub enum LoadOutcome<T> {
    Missing,
    Loaded { value: T, skipped: Vec<String> },
    Corrupt(String),
}

impl<T: Default> LoadOutcome<T> {
    /// Log what happened and hand back the value, or a fresh default.
    pub fn into_value(self, path: &Path) -> T {
        match self {
            LoadOutcome::Missing => {
                log::info!("{}: not found, starting fresh", path.display());
                T::default()
            }
            LoadOutcome::Corrupt(why) => {
                log::warn!("{}: unreadable ({why}), starting fresh", path.display());
                T::default()
            }
            LoadOutcome::Loaded { value, skipped } => {
                log::info!("Read saved data from {}", path.display());
                if !skipped.is_empty() {
                    log::warn!("{}: ignored {} entr(ies): {skipped:?}", path.display(), skipped.len());
                }
                value
            }
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    fs::write(path, contents).map_err(io_err)
}

/* ---------------- Point map ---------------- */

/// Day 0 of the legacy integer keys.
fn legacy_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// ISO date, or a legacy day count since 1900-01-01.
pub fn key_to_date(key: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(key, DATE_FORMAT) {
        return Some(d);
    }
    let days: u64 = key.trim().parse().ok()?;
    legacy_epoch().checked_add_days(Days::new(days))
}

pub fn load_point_map(path: &Path) -> LoadOutcome<PointMap> {
    let text = match read_optional(path) {
        Ok(Some(t)) => t,
        Ok(None) => return LoadOutcome::Missing,
        Err(why) => return LoadOutcome::Corrupt(why),
    };
    parse_point_map(&text)
}

pub fn parse_point_map(text: &str) -> LoadOutcome<PointMap> {
    let raw: BTreeMap<String, u32> = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => return LoadOutcome::Corrupt(e.to_string()),
    };

    let mut skipped = Vec::new();
    let mut map = PointMap::new();
    for (key, points) in raw {
        match key_to_date(&key) {
            Some(date) => {
                map.insert_new(date, points);
            }
            None => skipped.push(key),
        }
    }
    LoadOutcome::Loaded { value: map, skipped }
}

pub fn point_map_json(map: &PointMap) -> Result<String, serde_json::Error> {
    let raw: BTreeMap<String, u32> = map
        .iter()
        .map(|(d, p)| (d.format(DATE_FORMAT).to_string(), p))
        .collect();
    serde_json::to_string_pretty(&raw)
}

/// Rewrite the whole file.
pub fn save_point_map(path: &Path, map: &PointMap) -> Result<(), StoreError> {
    let json = point_map_json(map)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    write_file(path, &json)
}

/* ---------------- Point lists ---------------- */

pub fn load_point_list(path: &Path) -> LoadOutcome<Vec<u32>> {
    let text = match read_optional(path) {
        Ok(Some(t)) => t,
        Ok(None) => return LoadOutcome::Missing,
        Err(why) => return LoadOutcome::Corrupt(why),
    };
    parse_point_list(&text)
}

/// First non-empty line, comma separated. Any bad field spoils the file:
/// a list with a hole in it would shift every later game.
pub fn parse_point_list(text: &str) -> LoadOutcome<Vec<u32>> {
    let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return LoadOutcome::Corrupt(s!("empty file"));
    };

    let mut out = Vec::new();
    for (i, field) in line.split(STORE_SEP).enumerate() {
        match field.trim().parse::<u32>() {
            Ok(p) => out.push(p),
            Err(_) => return LoadOutcome::Corrupt(format!("field {i} = {field:?}")),
        }
    }
    LoadOutcome::Loaded { value: out, skipped: Vec::new() }
}

pub fn save_point_list(path: &Path, list: &[u32]) -> Result<(), StoreError> {
    let sep = STORE_SEP.to_string();
    let line = list.iter().map(u32::to_string).collect::<Vec<_>>().join(&sep);
    write_file(path, &format!("{line}\n"))
}
