// src/progress.rs
use crate::specs::gamelog::ExtractReport;

/// Progress reporting for the season-by-season fetch loops.
/// The CLI reports through the logger; tests can count calls.
pub trait Progress {
    /// Called at the start with the number of pages to fetch.
    fn begin(&mut self, _label: &str, _total: usize) {}

    /// One page (season) fetched and extracted, with its row counts.
    fn item_done(&mut self, _season: i32, _report: &ExtractReport) {}

    /// One page failed; the loop moves on.
    fn item_failed(&mut self, _season: i32, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Routes progress through `log`.
#[derive(Default)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: usize,
    failed: usize,
    skipped: usize,
    malformed: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, label: &str, total: usize) {
        *self = LogProgress { label: s!(label), total, ..LogProgress::default() };
        log::info!("{label}: fetching {total} season(s)");
    }

    fn item_done(&mut self, season: i32, report: &ExtractReport) {
        self.done += 1;
        self.skipped += report.skipped_total();
        self.malformed += report.malformed.len();
        log::debug!(
            "{}: season {season} -> {} game(s) [{}/{}]",
            self.label,
            report.games,
            self.done,
            self.total
        );
        if !report.skipped.is_empty() {
            log::info!("{}: season {season} skipped rows {:?}", self.label, report.skipped);
        }
        if !report.malformed.is_empty() {
            log::warn!("{}: season {season} had {} malformed row(s)", self.label, report.malformed.len());
        }
    }

    fn item_failed(&mut self, season: i32, reason: &str) {
        self.failed += 1;
        log::error!("{}: season {season} failed: {reason}", self.label);
    }

    fn finish(&mut self) {
        log::info!(
            "{}: {} ok, {} failed, {} row(s) skipped, {} malformed",
            self.label,
            self.done,
            self.failed,
            self.skipped,
            self.malformed
        );
    }
}
