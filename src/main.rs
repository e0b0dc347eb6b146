// src/main.rs
use clap::Parser;

use points_chase::cli::{self, Args};
use points_chase::config::options::AppOptions;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let store_dir = args.store_dir.clone().unwrap_or_else(|| AppOptions::default().store_dir);
    points_chase::log::init(&store_dir, args.level())?;

    let summary = cli::run(&args)?;
    println!("{}", summary.status);
    Ok(())
}
