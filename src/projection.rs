// src/projection.rs
//
// How many more games until the chaser passes a target total, from rolling
// scoring averages, and which upcoming game that lands on.

use std::fmt;

use crate::specs::schedule::ScheduleEntry;

/// Trailing window of games to average over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    Last(usize),
    All,
}

impl Window {
    /// Games actually covered for a list of `len` games.
    pub fn span(self, len: usize) -> usize {
        match self {
            Window::Last(n) => n.min(len),
            Window::All => len,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Last(n) => write!(f, "last {n}"),
            Window::All => write!(f, "career"),
        }
    }
}

/// Mean of the last `window` entries. `None` when there is nothing to average.
pub fn rolling_average(list: &[u32], window: Window) -> Option<f64> {
    let span = window.span(list.len());
    if span == 0 {
        return None;
    }
    let sum: u64 = list[list.len() - span..].iter().map(|&p| u64::from(p)).sum();
    Some(sum as f64 / span as f64)
}

/// ceil((target - current) / avg). `None` if the target is already passed
/// or the average can't close any gap.
pub fn games_needed(current: u32, target: u32, avg: f64) -> Option<u32> {
    if target <= current || avg.is_nan() || avg <= 0.0 {
        return None;
    }
    let games = (f64::from(target - current) / avg).ceil();
    if games.is_finite() && games <= f64::from(u32::MAX) {
        Some(games as u32)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub window: Window,
    pub average: f64,
    pub games: u32,
}

/// Where the best guess lands on the schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Game(ScheduleEntry),
    NextSeason,
}

/// The `games`-th upcoming game (1-based), or next season past the end.
pub fn slot_for(games: u32, schedule: &[ScheduleEntry]) -> Slot {
    let idx = (games as usize).saturating_sub(1);
    match schedule.get(idx) {
        Some(entry) => Slot::Game(entry.clone()),
        None => Slot::NextSeason,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub gap: u32,
    pub estimates: Vec<Estimate>,
    /// Truncated mean of the per-window estimates
    pub best_guess: u32,
    pub slot: Slot,
}

impl Projection {
    pub fn range(&self) -> (u32, u32) {
        let min = self.estimates.iter().map(|e| e.games).min().unwrap_or(self.best_guess);
        let max = self.estimates.iter().map(|e| e.games).max().unwrap_or(self.best_guess);
        (min, max)
    }
}

pub fn best_guess(estimates: &[Estimate]) -> Option<u32> {
    if estimates.is_empty() {
        return None;
    }
    let sum: u64 = estimates.iter().map(|e| u64::from(e.games)).sum();
    u32::try_from(sum / estimates.len() as u64).ok()
}

pub fn project(
    list: &[u32],
    current: u32,
    target: u32,
    windows: &[Window],
    schedule: &[ScheduleEntry],
) -> Option<Projection> {
    if target <= current {
        return None;
    }
    let estimates: Vec<Estimate> = windows
        .iter()
        .filter_map(|&window| {
            let average = rolling_average(list, window)?;
            let games = games_needed(current, target, average)?;
            Some(Estimate { window, average, games })
        })
        .collect();

    let best_guess = best_guess(&estimates)?;
    Some(Projection {
        gap: target - current,
        estimates,
        best_guess,
        slot: slot_for(best_guess, schedule),
    })
}

/// Index of the nearest total strictly above `current`.
pub fn next_target(current: u32, totals: &[u32]) -> Option<usize> {
    totals
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t > current)
        .min_by_key(|&(_, &t)| t)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::schedule::Location;
    use chrono::NaiveDate;

    fn schedule(n: usize) -> Vec<ScheduleEntry> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n)
            .map(|i| ScheduleEntry {
                date: start + chrono::Days::new(i as u64 * 2),
                time: s!("7:30p"),
                location: if i % 2 == 0 { Location::Home } else { Location::Away },
                opponent: format!("Team {i}"),
            })
            .collect()
    }

    #[test]
    fn thousand_points_at_fifty_is_twenty_games() {
        assert_eq!(games_needed(30_000, 31_000, 50.0), Some(20));
        assert_eq!(games_needed(30_000, 31_001, 50.0), Some(21));
    }

    #[test]
    fn passed_targets_get_no_projection() {
        assert_eq!(games_needed(31_000, 31_000, 50.0), None);
        assert_eq!(games_needed(32_000, 31_000, 50.0), None);
        assert!(project(&[30, 30], 32_000, 31_000, &[Window::All], &schedule(3)).is_none());
    }

    #[test]
    fn empty_list_does_not_divide_by_zero() {
        assert_eq!(rolling_average(&[], Window::All), None);
        assert_eq!(rolling_average(&[10], Window::Last(0)), None);
        assert!(project(&[], 0, 100, &[Window::Last(10), Window::All], &schedule(3)).is_none());
        assert_eq!(games_needed(0, 100, 0.0), None);
    }

    #[test]
    fn window_averages_the_tail() {
        let list = [10, 10, 30, 50];
        assert_eq!(rolling_average(&list, Window::Last(2)), Some(40.0));
        assert_eq!(rolling_average(&list, Window::All), Some(25.0));
        // a window longer than the career covers the career
        assert_eq!(rolling_average(&list, Window::Last(100)), Some(25.0));
    }

    #[test]
    fn best_guess_is_truncated_mean() {
        // gap 100: last 2 avg 40 -> 3 games, career avg 25 -> 4 games
        let p = project(&[10, 10, 30, 50], 900, 1000, &[Window::Last(2), Window::All], &schedule(10)).unwrap();
        assert_eq!(p.gap, 100);
        assert_eq!(p.estimates.iter().map(|e| e.games).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(p.best_guess, 3);
        assert_eq!(p.range(), (3, 4));
        match &p.slot {
            Slot::Game(entry) => assert_eq!(entry.opponent, "Team 2"),
            Slot::NextSeason => panic!("expected a game"),
        }
    }

    #[test]
    fn beyond_schedule_is_next_season() {
        let sched = schedule(5);
        assert_eq!(slot_for(5, &sched), Slot::Game(sched[4].clone()));
        assert_eq!(slot_for(6, &sched), Slot::NextSeason);
        assert_eq!(slot_for(1_000, &[]), Slot::NextSeason);
    }

    #[test]
    fn nearest_rival_above_is_the_target() {
        assert_eq!(next_target(36_000, &[38_387, 36_928]), Some(1));
        assert_eq!(next_target(37_000, &[38_387, 36_928]), Some(0));
        assert_eq!(next_target(39_000, &[38_387, 36_928]), None);
    }
}
