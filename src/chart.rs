// src/chart.rs
//
// Cumulative points per game for each tracked player, plus a dashed flat
// line at each player's final total. PNG only, no text: the legend is one
// colour swatch per player, in the order given.

use std::path::Path;

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::tally::cumulative_points;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const MARGIN: u32 = 60;
const DASH: u32 = 8;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([90, 90, 90]);
const PALETTE: [Rgb<u8>; 6] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
];

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot")]
    Empty,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub fn series_color(i: usize) -> Rgb<u8> {
    PALETTE[i % PALETTE.len()]
}

/// Pixel mapping for game index / points onto the plot area.
struct Frame {
    max_games: u32,
    max_points: u32,
}

impl Frame {
    fn x(&self, game: u32) -> i64 {
        let span = (WIDTH - 2 * MARGIN) as f64;
        (MARGIN as f64 + span * game as f64 / self.max_games.max(1) as f64).round() as i64
    }

    fn y(&self, points: u32) -> i64 {
        let span = (HEIGHT - 2 * MARGIN) as f64;
        ((HEIGHT - MARGIN) as f64 - span * points as f64 / self.max_points.max(1) as f64).round() as i64
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham, two pixels thick.
fn line(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>, dashed: bool) {
    let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
    let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    let mut step = 0u32;
    loop {
        if !dashed || (step / DASH) % 2 == 0 {
            put(img, x, y, color);
            put(img, x, y + 1, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1;
    }
}

/// Draw the chart for `(name, point list)` pairs and save it to `path`.
pub fn render(players: &[(&str, &[u32])], path: &Path) -> Result<(), ChartError> {
    let cumulative: Vec<Vec<u32>> = players.iter().map(|(_, list)| cumulative_points(list)).collect();

    let frame = Frame {
        max_games: cumulative.iter().map(|c| c.len() as u32).max().unwrap_or(0),
        max_points: cumulative.iter().filter_map(|c| c.last().copied()).max().unwrap_or(0),
    };
    if frame.max_games == 0 {
        return Err(ChartError::Empty);
    }

    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let origin = (frame.x(0), frame.y(0));
    line(&mut img, origin, (frame.x(frame.max_games), origin.1), AXIS, false);
    line(&mut img, origin, (origin.0, frame.y(frame.max_points)), AXIS, false);

    for (i, series) in cumulative.iter().enumerate() {
        let color = series_color(i);
        let Some(&last) = series.last() else { continue };

        let mut prev = origin;
        for (game, &total) in series.iter().enumerate() {
            let pt = (frame.x(game as u32 + 1), frame.y(total));
            line(&mut img, prev, pt, color, false);
            prev = pt;
        }

        // final total, across this player's career length
        let y = frame.y(last);
        line(&mut img, (frame.x(1), y), (frame.x(series.len() as u32), y), color, true);

        // legend swatch
        let top = (MARGIN / 2 + 1) as i64;
        let left = (MARGIN + 10 + i as u32 * 30) as i64;
        for dy in 0..12 {
            for dx in 0..20 {
                put(&mut img, left + dx, top + dy, color);
            }
        }
    }

    for (name, list) in players {
        log::debug!("Chart: {name} with {} game(s)", list.len());
    }
    img.save(path)?;
    Ok(())
}
