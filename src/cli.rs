// src/cli.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::LevelFilter;

use crate::config::options::AppOptions;
use crate::progress::LogProgress;
use crate::runner::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "points_chase", version, about = "Career points race: scrape, project, post")]
pub struct Args {
    /// Where the point map, fallback lists and debug.log live
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Where charts are written
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Site abbreviation of the chaser's team, for the schedule
    #[arg(long)]
    pub team: Option<String>,

    /// Build the status and log it, never call the posting API
    #[arg(long)]
    pub dry_run: bool,

    /// Post even without new games (still subject to the length limit)
    #[arg(long)]
    pub force_post: bool,

    /// Draw the chart regardless of the weekday
    #[arg(long)]
    pub chart: bool,

    /// Weekday the chart is drawn on, 0 = Monday .. 6 = Sunday
    #[arg(long)]
    pub chart_weekday: Option<u32>,

    /// UTC offset in hours used to date the last post
    #[arg(long, allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,

    /// Run as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Debug output on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn level(&self) -> LevelFilter {
        match (self.verbose, self.quiet) {
            (true, _) => LevelFilter::Debug,
            (_, true) => LevelFilter::Warn,
            _ => LevelFilter::Info,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Defaults, with every flag that was given laid on top.
    pub fn options(&self) -> AppOptions {
        let mut opts = AppOptions::default();
        if let Some(dir) = &self.store_dir {
            opts.store_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            opts.out_dir = dir.clone();
        }
        if let Some(team) = &self.team {
            opts.team = team.to_ascii_uppercase();
        }
        opts.post.dry_run = self.dry_run;
        opts.post.force = self.force_post;
        if let Some(hours) = self.utc_offset {
            opts.post.utc_offset_hours = hours;
        }
        opts.chart.force = self.chart;
        if let Some(day) = self.chart_weekday {
            opts.chart.weekday = day;
        }
        opts
    }
}

pub fn run(args: &Args) -> color_eyre::Result<RunSummary> {
    let opts = args.options();
    if !(-12..=14).contains(&opts.post.utc_offset_hours) {
        color_eyre::eyre::bail!("--utc-offset {} is outside -12..=14", opts.post.utc_offset_hours);
    }
    let mut progress = LogProgress::default();
    Ok(runner::run(&opts, args.today(), &mut progress)?)
}
