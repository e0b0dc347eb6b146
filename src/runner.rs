// src/runner.rs
//
// One full run, in order: schedule, players, projection, status, post,
// chart. Each step logs its own failure and the run carries on with
// whatever it has.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::chart;
use crate::config::consts::HASHTAGS;
use crate::config::options::{chart_file_name, season_end_year, AppOptions, PostOptions};
use crate::core::{Browser, FetchError, PageSource};
use crate::players::{self, PlayerPoints};
use crate::post::{PostError, Poster, Publisher};
use crate::progress::Progress;
use crate::projection::{self, Projection};
use crate::specs::schedule::{self, ScheduleEntry};
use crate::status::{self, Standing};

/// What happened to the status text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostDecision {
    Posted { id: String },
    DryRun,
    NoNewGames,
    TooLong { chars: usize },
    /// The newest game is older than the newest post
    AlreadyPosted,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub chaser: PlayerPoints,
    pub rivals: Vec<PlayerPoints>,
    pub upcoming: usize,
    pub target: Option<String>,
    pub projection: Option<Projection>,
    pub status: String,
    pub post: PostDecision,
    pub chart: Option<PathBuf>,
}

/// Launch the browser, run every step against it, close it.
pub fn run(opts: &AppOptions, today: NaiveDate, progress: &mut dyn Progress) -> Result<RunSummary, FetchError> {
    let mut browser = Browser::launch()?;
    let summary = run_with(&mut browser, opts, today, progress);
    log::info!("{} page(s) loaded", browser.pages_loaded());
    browser.close();
    Ok(summary)
}

pub fn run_with(
    src: &mut dyn PageSource,
    opts: &AppOptions,
    today: NaiveDate,
    progress: &mut dyn Progress,
) -> RunSummary {
    if !opts.chart.gate_is_reachable() && !opts.chart.force {
        log::warn!(
            "chart weekday {} matches no day of the week; the chart only runs with --chart",
            opts.chart.weekday
        );
    }

    let upcoming = load_schedule(src, opts, today);

    let mut rivals = Vec::with_capacity(opts.rivals.len());
    for spec in &opts.rivals {
        rivals.push(players::collect(src, spec, &opts.store_dir, today, progress));
    }
    let chaser = players::collect(src, &opts.chaser, &opts.store_dir, today, progress);

    let (target, projection) = project(opts, &chaser, &rivals, &upcoming);

    let text = compose(&chaser, &rivals, target.as_deref().zip(projection.as_ref()));
    log::info!("status:\n{text}");

    let post = decide_and_post(&opts.post, &text, &chaser, today);
    log::info!("post: {post:?}");

    let chart = if opts.chart.due(today) { draw_chart(opts, &chaser, &rivals, today) } else { None };

    RunSummary {
        upcoming: upcoming.len(),
        chaser,
        rivals,
        target,
        projection,
        status: text,
        post,
        chart,
    }
}

fn load_schedule(src: &mut dyn PageSource, opts: &AppOptions, today: NaiveDate) -> Vec<ScheduleEntry> {
    let url = opts.schedule_url(season_end_year(today));
    match schedule::fetch(src, &url, today) {
        Ok(bundle) => {
            if bundle.unreadable > 0 {
                log::warn!("schedule: {} row(s) unreadable", bundle.unreadable);
            }
            log::info!("schedule: {} upcoming game(s)", bundle.upcoming.len());
            bundle.upcoming
        }
        Err(e) => {
            log::error!("schedule: {e}; every projection will read as next season");
            Vec::new()
        }
    }
}

fn project(
    opts: &AppOptions,
    chaser: &PlayerPoints,
    rivals: &[PlayerPoints],
    upcoming: &[ScheduleEntry],
) -> (Option<String>, Option<Projection>) {
    let current = chaser.total();
    let totals: Vec<u32> = rivals.iter().map(PlayerPoints::total).collect();
    let Some(idx) = projection::next_target(current, &totals) else {
        log::info!("{} leads everyone tracked", chaser.name);
        return (None, None);
    };

    let target = &rivals[idx];
    let projection = projection::project(&chaser.points, current, totals[idx], &opts.windows, upcoming);
    match &projection {
        Some(p) => {
            for e in &p.estimates {
                log::debug!("{}: avg {:.2} -> {} game(s)", e.window, e.average, e.games);
            }
            let (lo, hi) = p.range();
            log::info!("{} to pass {}: best guess {} game(s), range {lo}-{hi}", p.gap, target.name, p.best_guess);
        }
        None => log::warn!("no scoring history for {}; standings only", chaser.name),
    }
    (Some(target.name.clone()), projection)
}

pub fn compose(chaser: &PlayerPoints, rivals: &[PlayerPoints], target: Option<(&str, &Projection)>) -> String {
    let standings: Vec<Standing> = rivals.iter().map(|r| Standing::new(&r.name, r.total())).collect();
    let text = status::build_status(&Standing::new(&chaser.name, chaser.total()), &standings, target);
    status::with_suffix(text, HASHTAGS)
}

/// Checks that need no network, in order: length, new games, dry run.
pub fn pre_post_check(post: &PostOptions, text: &str, any_added: bool) -> Option<PostDecision> {
    if !status::fits(text) {
        let chars = status::char_len(text);
        log::error!("status is {chars} chars; needs a manual post:\n{text}");
        return Some(PostDecision::TooLong { chars });
    }
    if !any_added && !post.force {
        return Some(PostDecision::NoNewGames);
    }
    if post.dry_run {
        return Some(PostDecision::DryRun);
    }
    None
}

/// Calendar date of a post time at a fixed UTC offset.
pub fn local_date(at: DateTime<Utc>, utc_offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => at.with_timezone(&offset).date_naive(),
        None => at.date_naive(),
    }
}

fn decide_and_post(post: &PostOptions, text: &str, chaser: &PlayerPoints, today: NaiveDate) -> PostDecision {
    if let Some(decision) = pre_post_check(post, text, chaser.merge.any_added()) {
        return decision;
    }
    let result = Poster::from_env().and_then(|poster| post_with(&poster, post, text, chaser.last_game, today));
    match result {
        Ok(decision) => decision,
        Err(e) => {
            log::error!("posting failed: {e}");
            PostDecision::Failed(e.to_string())
        }
    }
}

/// Last-post throttle. A run that never saw a dated game counts as today.
pub fn throttle_allows(
    force: bool,
    last_game: Option<NaiveDate>,
    last_post: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    force || status::game_is_newer(last_game.unwrap_or(today), last_post, today)
}

/// Network half of posting: credentials, throttle, publish.
pub fn post_with(
    poster: &dyn Publisher,
    post: &PostOptions,
    text: &str,
    last_game: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<PostDecision, PostError> {
    let account = poster.verify_credentials()?;
    log::debug!("posting as @{}", account.username);

    let last_post = poster
        .latest_post_time(&account.id)?
        .map(|at| local_date(at, post.utc_offset_hours));
    if !throttle_allows(post.force, last_game, last_post, today) {
        log::info!("newest game {last_game:?} is older than the last post ({last_post:?})");
        return Ok(PostDecision::AlreadyPosted);
    }

    let posted = poster.publish(text)?;
    log::info!("posted {}", posted.id);
    Ok(PostDecision::Posted { id: posted.id })
}

fn draw_chart(opts: &AppOptions, chaser: &PlayerPoints, rivals: &[PlayerPoints], today: NaiveDate) -> Option<PathBuf> {
    if let Err(e) = fs::create_dir_all(&opts.out_dir) {
        log::error!("chart: cannot create {}: {e}", opts.out_dir.display());
        return None;
    }
    let path = chart_file_name(&opts.out_dir, today);
    let series: Vec<(&str, &[u32])> = std::iter::once(chaser)
        .chain(rivals)
        .map(|p| (p.name.as_str(), p.points.as_slice()))
        .collect();

    match chart::render(&series, &path) {
        Ok(()) => {
            log::info!("chart written to {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::error!("chart: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::post::{Account, Post};

    /// Account whose newest post is `last_post`; records what gets published.
    struct FakeAccount {
        last_post: Option<DateTime<Utc>>,
        reject: bool,
        published: RefCell<Vec<String>>,
    }

    impl FakeAccount {
        fn last_posted(at: Option<&str>) -> Self {
            Self {
                last_post: at.map(|t| DateTime::parse_from_rfc3339(t).unwrap().with_timezone(&Utc)),
                reject: false,
                published: RefCell::new(Vec::new()),
            }
        }
    }

    impl Publisher for FakeAccount {
        fn verify_credentials(&self) -> Result<Account, PostError> {
            if self.reject {
                return Err(PostError::Unauthorized { status: 401, body: s!("bad token") });
            }
            Ok(Account { id: s!("42"), username: s!("lbj_tracker") })
        }

        fn latest_post_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, PostError> {
            assert_eq!(user_id, "42");
            Ok(self.last_post)
        }

        fn publish(&self, text: &str) -> Result<Post, PostError> {
            self.published.borrow_mut().push(s!(text));
            Ok(Post { id: s!("99"), created_at: None })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn gate_order_is_length_then_news_then_dry_run() {
        let mut post = PostOptions { dry_run: true, ..PostOptions::default() };
        assert_eq!(pre_post_check(&post, &text(281), true), Some(PostDecision::TooLong { chars: 281 }));
        assert_eq!(pre_post_check(&post, &text(100), false), Some(PostDecision::NoNewGames));
        assert_eq!(pre_post_check(&post, &text(100), true), Some(PostDecision::DryRun));

        post.force = true;
        assert_eq!(pre_post_check(&post, &text(100), false), Some(PostDecision::DryRun));

        post.dry_run = false;
        assert_eq!(pre_post_check(&post, &text(280), false), None);
    }

    #[test]
    fn late_evening_post_counts_as_the_previous_day_in_eastern() {
        let at = DateTime::parse_from_rfc3339("2022-11-03T02:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(local_date(at, -5), NaiveDate::from_ymd_opt(2022, 11, 2).unwrap());
        assert_eq!(local_date(at, 0), NaiveDate::from_ymd_opt(2022, 11, 3).unwrap());
    }

    #[test]
    fn throttle_uses_today_without_a_dated_game() {
        let today = date(2022, 11, 3);
        assert!(throttle_allows(false, None, Some(date(2022, 11, 3)), today));
        assert!(!throttle_allows(false, Some(date(2022, 11, 1)), Some(date(2022, 11, 2)), today));
        assert!(throttle_allows(true, Some(date(2022, 11, 1)), Some(date(2022, 11, 2)), today));
    }

    #[test]
    fn game_on_the_last_post_date_is_posted() {
        // 02:00 UTC on the 3rd is the evening of the 2nd in Eastern time
        let account = FakeAccount::last_posted(Some("2022-11-03T02:00:00Z"));
        let post = PostOptions::default();
        let out = post_with(&account, &post, "status", Some(date(2022, 11, 2)), date(2022, 11, 3)).unwrap();
        assert_eq!(out, PostDecision::Posted { id: s!("99") });
        assert_eq!(*account.published.borrow(), vec![s!("status")]);
    }

    #[test]
    fn older_game_is_not_posted_unless_forced() {
        let account = FakeAccount::last_posted(Some("2022-11-03T02:00:00Z"));
        let mut post = PostOptions::default();
        let out = post_with(&account, &post, "status", Some(date(2022, 11, 1)), date(2022, 11, 3)).unwrap();
        assert_eq!(out, PostDecision::AlreadyPosted);
        assert!(account.published.borrow().is_empty());

        post.force = true;
        let out = post_with(&account, &post, "status", Some(date(2022, 11, 1)), date(2022, 11, 3)).unwrap();
        assert_eq!(out, PostDecision::Posted { id: s!("99") });
    }

    #[test]
    fn empty_timeline_counts_as_a_year_ago() {
        let account = FakeAccount::last_posted(None);
        let post = PostOptions::default();
        let today = date(2022, 11, 3);
        assert_eq!(
            post_with(&account, &post, "status", Some(date(2022, 10, 22)), today).unwrap(),
            PostDecision::Posted { id: s!("99") }
        );
        assert_eq!(
            post_with(&account, &post, "status", Some(date(2021, 1, 1)), today).unwrap(),
            PostDecision::AlreadyPosted
        );
    }

    #[test]
    fn rejected_credentials_stop_before_publishing() {
        let account = FakeAccount { reject: true, ..FakeAccount::last_posted(None) };
        let err = post_with(&account, &PostOptions::default(), "status", None, date(2022, 11, 3)).unwrap_err();
        assert!(matches!(err, PostError::Unauthorized { status: 401, .. }));
        assert!(account.published.borrow().is_empty());
    }
}
