// src/lib.rs

#[macro_use]
pub mod macros;

pub mod chart;
pub mod cli;
pub mod config;
pub mod core;
pub mod log;
pub mod players;
pub mod post;
pub mod progress;
pub mod projection;
pub mod runner;
pub mod specs;
pub mod status;
pub mod store;
pub mod tally;
