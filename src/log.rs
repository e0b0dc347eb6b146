// src/log.rs
//
// Run logger behind the `log` facade.
// Every line is "[HH:MM:SS.mmm][LEVEL] msg" (elapsed since start), appended to
// <store>/debug.log at Debug level and echoed to stderr at the chosen level.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::consts::LOG_FILE;

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

struct RunLogger {
    console: LevelFilter,
    file: Option<Mutex<File>>,
}

impl RunLogger {
    fn ceiling(&self) -> LevelFilter {
        if self.file.is_some() {
            self.console.max(LevelFilter::Debug)
        } else {
            self.console
        }
    }
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.ceiling()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Dependencies (reqwest, rustls, html5ever) only reach the file at Warn+
        let ours = record.target().starts_with(env!("CARGO_CRATE_NAME"));
        if !ours && record.level() > log::Level::Warn {
            return;
        }

        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        let line = format!("[{elapsed}][{}] {}", record.level(), record.args());

        if record.level() <= self.console {
            eprintln!("{line}");
        }
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{line}");
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Install the run logger. A store dir that can't be created just means
/// console-only logging.
pub fn init(store_dir: &Path, console: LevelFilter) -> Result<(), SetLoggerError> {
    start();

    let file = fs::create_dir_all(store_dir)
        .ok()
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(store_dir.join(LOG_FILE))
                .ok()
        })
        .map(Mutex::new);

    let logger = RunLogger { console, file };
    let ceiling = logger.ceiling();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(ceiling);
    Ok(())
}
