// src/status.rs
//
// The daily status text and the rules for whether it goes out.

use chrono::{Days, NaiveDate};

use crate::config::consts::STATUS_MAX_CHARS;
use crate::projection::{Projection, Slot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub total: u32,
}

impl Standing {
    pub fn new(name: &str, total: u32) -> Self {
        Self { name: s!(name), total }
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// "1. Kareem: 38387" lines, highest total first. The chaser's line carries
/// the gap to whoever is directly above.
pub fn standings_lines(chaser: &Standing, rivals: &[Standing]) -> Vec<String> {
    let mut all: Vec<(&Standing, bool)> = rivals.iter().map(|r| (r, false)).collect();
    all.push((chaser, true));
    // stable: on a tie the rival stays ahead
    all.sort_by(|a, b| b.0.total.cmp(&a.0.total));

    let mut lines = Vec::with_capacity(all.len());
    for (i, (standing, is_chaser)) in all.iter().enumerate() {
        let mut line = format!("{}. {}: {}", i + 1, standing.name, standing.total);
        if *is_chaser && i > 0 {
            let ahead = all[i - 1].0.total;
            line.push_str(&format!(" ({} points back)", ahead - standing.total));
        }
        lines.push(line);
    }
    lines
}

pub fn projection_lines(chaser: &str, target: &str, projection: &Projection) -> Vec<String> {
    let games = projection.best_guess;
    let mut lines = vec![format!("{chaser} needs about {games} more games to pass {target}.")];
    lines.push(match &projection.slot {
        Slot::Game(entry) => format!(
            "Best guess for passing {target} is {} {} on {} at {}",
            entry.location.preposition(),
            entry.opponent,
            entry.display_date(),
            entry.time,
        ),
        Slot::NextSeason => format!("Best guess for passing {target} is next season."),
    });
    lines
}

/// Standings, then the projection against `target` when there is one.
pub fn build_status(
    chaser: &Standing,
    rivals: &[Standing],
    target: Option<(&str, &Projection)>,
) -> String {
    let mut lines = standings_lines(chaser, rivals);
    if let Some((name, projection)) = target {
        lines.extend(projection_lines(&chaser.name, name, projection));
    }
    lines.join("\n")
}

/// Append the suffix only if the result stays under the ceiling.
pub fn with_suffix(text: String, suffix: &str) -> String {
    if char_len(&text) + char_len(suffix) < STATUS_MAX_CHARS {
        lines!(text, suffix.trim_start_matches('\n'))
    } else {
        text
    }
}

pub fn fits(text: &str) -> bool {
    char_len(text) <= STATUS_MAX_CHARS
}

/// Post only if the newest game is no older than the newest post.
/// No post on record counts as a post a year ago.
pub fn game_is_newer(last_game: NaiveDate, last_post: Option<NaiveDate>, today: NaiveDate) -> bool {
    let last_post = last_post
        .or_else(|| today.checked_sub_days(Days::new(365)))
        .unwrap_or(NaiveDate::MIN);
    last_game >= last_post
}
