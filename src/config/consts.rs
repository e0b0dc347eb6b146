// src/config/consts.rs
use crate::projection::Window;

// Site
pub const SITE_ROOT: &str = "https://www.basketball-reference.com";
pub const USER_AGENT: &str = concat!("points_chase/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 3_000; // the site rate-limits hard; be polite

// Tables
pub const GAMELOG_TABLE_CLASS: &str = "row_summable";
pub const SCHEDULE_TABLE_CLASS: &str = "sortable";
pub const PTS_HEADER: &str = "PTS";
pub const DATE_HEADER: &str = "Date";

// Local state
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const STORE_SEP: char = ',';

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const CHART_PREFIX: &str = "graph_";

// Projection
pub const DEFAULT_WINDOWS: [Window; 4] = [
    Window::Last(10),
    Window::Last(25),
    Window::Last(100),
    Window::All,
];

// Status
pub const STATUS_MAX_CHARS: usize = 280;
pub const HASHTAGS: &str = "\n#NBA #LeBron #GOAT";

// Posting
pub const API_ROOT: &str = "https://api.twitter.com/2";
pub const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_KEY_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "ACCOUNT_ACCESS_TOKEN";
pub const ENV_ACCESS_SECRET: &str = "ACCOUNT_ACCESS_TOKEN_SECRET";
pub const TIMELINE_PAGE: u32 = 10;
pub const EASTERN_UTC_OFFSET_HOURS: i32 = -5;

// Chart
// Python-style weekday index (0 = Monday). 7 never matches: the weekly chart
// was switched off this way and stays off unless asked for.
pub const CHART_WEEKDAY: u32 = 7;
