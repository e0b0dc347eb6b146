// tests/common/mod.rs
//
// Fixture pages for a small three-player race, served from memory.
#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use points_chase::config::options::{AppOptions, Keep, PlayerSpec};
use points_chase::core::net::MemoryPages;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2022-10-25: two games into the 2023 season.
pub fn today() -> NaiveDate {
    date(2022, 10, 25)
}

/// Game log page. `None` points = "Did Not Play".
pub fn gamelog(games: &[(&str, Option<u32>)]) -> String {
    let rows: String = games
        .iter()
        .enumerate()
        .map(|(i, (day, pts))| match pts {
            Some(p) => format!(
                "<tr><th>{}</th><td>{}</td><td>{day}</td><td>37-293</td><td>LAL</td><td>@</td>\
                 <td>GSW</td><td>W</td><td>1</td><td>35:00</td><td>{p}</td></tr>",
                i + 1,
                i + 1
            ),
            None => format!(
                "<tr><th>{}</th><td></td><td>{day}</td><td>37-295</td><td>LAL</td><td></td>\
                 <td>LAC</td><td>L</td><td colspan=\"3\">Did Not Play</td></tr>",
                i + 1
            ),
        })
        .collect();
    format!(
        r#"<html><body><table class="row_summable sortable stats_table" id="pgl_basic">
        <thead><tr><th>Rk</th><th>G</th><th>Date</th><th>Age</th><th>Tm</th><th></th>
        <th>Opp</th><th></th><th>GS</th><th>MP</th><th>PTS</th></tr></thead>
        <tbody>{rows}</tbody></table></body></html>"#
    )
}

pub fn schedule(games: &[(&str, &str, &str, &str)]) -> String {
    let rows: String = games
        .iter()
        .map(|(day, time, at, opp)| {
            format!(
                "<tr><th>1</th><td>{day}</td><td>{time}</td><td></td><td><a>Box Score</a></td>\
                 <td>{at}</td><td><a>{opp}</a></td><td></td></tr>"
            )
        })
        .collect();
    format!(
        r#"<table class="sortable stats_table" id="games"><thead><tr><th>G</th><th>Date</th>
        <th>Start (ET)</th><th></th><th></th><th></th><th>Opponent</th><th></th></tr></thead>
        <tbody>{rows}</tbody></table>"#
    )
}

/// LeBron 2022-2023, two retired rivals with two seasons each.
pub fn options(store_dir: &Path, out_dir: &Path) -> AppOptions {
    let mut opts = AppOptions {
        store_dir: store_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        chaser: PlayerSpec::new("LeBron", "jamesle01", 2022, None, Keep::PointMap("lbj.json".into())),
        rivals: vec![
            PlayerSpec::new("Kareem", "abdulka01", 1988, Some(1989), Keep::List("kareem.csv".into())),
            PlayerSpec::new("Malone", "malonka01", 1988, Some(1989), Keep::List("malone.csv".into())),
        ],
        ..AppOptions::default()
    };
    opts.post.dry_run = true;
    opts
}

/// LeBron 120 over 4 games, Kareem 160, Malone 105.
pub fn pages(opts: &AppOptions) -> MemoryPages {
    let kareem = &opts.rivals[0];
    let malone = &opts.rivals[1];
    MemoryPages::new()
        .with_page(
            opts.schedule_url(2023),
            schedule(&[
                ("Thu, Oct 20, 2022", "10:30p", "", "Los Angeles Clippers"),
                ("Wed, Oct 26, 2022", "10:00p", "", "Denver Nuggets"),
                ("Fri, Oct 28, 2022", "10:00p", "@", "Minnesota Timberwolves"),
            ]),
        )
        .with_page(
            opts.chaser.gamelog_url(2022),
            gamelog(&[("2022-04-01", Some(30)), ("2022-04-03", Some(30))]),
        )
        .with_page(
            opts.chaser.gamelog_url(2023),
            gamelog(&[("2022-10-18", Some(31)), ("2022-10-20", None), ("2022-10-22", Some(29))]),
        )
        .with_page(kareem.gamelog_url(1988), gamelog(&[("1988-01-01", Some(40)), ("1988-01-03", Some(40))]))
        .with_page(kareem.gamelog_url(1989), gamelog(&[("1989-01-01", Some(40)), ("1989-01-03", Some(40))]))
        .with_page(malone.gamelog_url(1988), gamelog(&[("1988-01-01", Some(35)), ("1988-01-03", Some(35))]))
        .with_page(malone.gamelog_url(1989), gamelog(&[("1989-01-01", Some(35))]))
}
