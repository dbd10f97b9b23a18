//! PNG chart of a finished run: three stacked panels over a shared tick
//! axis, luminosity on top, mean temperature in the middle, population
//! counts at the bottom.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use daisy_core::RunHistory;

const WIDTH: u32 = 960;
const PANEL_HEIGHT: u32 = 220;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([250, 250, 250]);
const FRAME: Rgb<u8> = Rgb([70, 70, 70]);
const LUMINOSITY: Rgb<u8> = Rgb([222, 140, 20]);
const TEMPERATURE: Rgb<u8> = Rgb([196, 44, 44]);
const POPULATION: Rgb<u8> = Rgb([36, 140, 60]);
const BLACK_DAISIES: Rgb<u8> = Rgb([30, 30, 30]);
const WHITE_DAISIES: Rgb<u8> = Rgb([150, 150, 160]);

struct Panel {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

impl Panel {
    fn stacked(slot: u32) -> Self {
        Self {
            x0: MARGIN,
            y0: MARGIN + slot * (PANEL_HEIGHT + MARGIN),
            width: WIDTH - 2 * MARGIN,
            height: PANEL_HEIGHT,
        }
    }
}

/// Chart the whole history into a PNG at `path`.
pub fn render_series(history: &RunHistory, path: &Path) -> Result<()> {
    let rows = history.rows();
    anyhow::ensure!(!rows.is_empty(), "nothing to chart: the history is empty");

    let height = 3 * PANEL_HEIGHT + 4 * MARGIN;
    let mut img = RgbImage::from_pixel(WIDTH, height, BACKGROUND);

    let luminosity: Vec<f64> = rows.iter().map(|row| row.luminosity).collect();
    let temperature: Vec<f64> = rows.iter().map(|row| row.temperature).collect();
    let population: Vec<f64> = rows.iter().map(|row| row.population as f64).collect();
    let black: Vec<f64> = rows.iter().map(|row| row.black as f64).collect();
    let white: Vec<f64> = rows.iter().map(|row| row.white as f64).collect();

    let top = Panel::stacked(0);
    let (lo, hi) = padded_range(&luminosity);
    draw_frame(&mut img, &top);
    draw_polyline(&mut img, &top, &luminosity, lo, hi, LUMINOSITY);

    let middle = Panel::stacked(1);
    let (lo, hi) = padded_range(&temperature);
    draw_frame(&mut img, &middle);
    draw_polyline(&mut img, &middle, &temperature, lo, hi, TEMPERATURE);

    // The three counts share one scale so they can be read against each
    // other.
    let bottom = Panel::stacked(2);
    let peak = population.iter().copied().fold(1.0, f64::max);
    draw_frame(&mut img, &bottom);
    for (series, color) in [
        (&population, POPULATION),
        (&black, BLACK_DAISIES),
        (&white, WHITE_DAISIES),
    ] {
        draw_polyline(&mut img, &bottom, series, 0.0, peak * 1.05, color);
    }

    img.save(path)
        .with_context(|| format!("cannot write chart to {}", path.display()))
}

/// Series bounds with a little headroom; a flat series still gets a
/// non-zero span to land in.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < 1e-12 {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

fn draw_frame(img: &mut RgbImage, panel: &Panel) {
    for dx in 0..panel.width {
        img.put_pixel(panel.x0 + dx, panel.y0, FRAME);
        img.put_pixel(panel.x0 + dx, panel.y0 + panel.height - 1, FRAME);
    }
    for dy in 0..panel.height {
        img.put_pixel(panel.x0, panel.y0 + dy, FRAME);
        img.put_pixel(panel.x0 + panel.width - 1, panel.y0 + dy, FRAME);
    }
}

fn draw_polyline(
    img: &mut RgbImage,
    panel: &Panel,
    values: &[f64],
    lo: f64,
    hi: f64,
    color: Rgb<u8>,
) {
    let place = |i: usize, value: f64| -> (f64, f64) {
        let span = (values.len().max(2) - 1) as f64;
        let x = panel.x0 as f64 + i as f64 / span * (panel.width - 1) as f64;
        let unit = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        let y = panel.y0 as f64 + (1.0 - unit) * (panel.height - 1) as f64;
        (x, y)
    };

    if values.len() == 1 {
        let (x, y) = place(0, values[0]);
        img.put_pixel(x.round() as u32, y.round() as u32, color);
        return;
    }
    for i in 1..values.len() {
        draw_segment(img, place(i - 1, values[i - 1]), place(i, values[i]), color);
    }
}

fn draw_segment(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil() as u32 + 1;
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let x = (from.0 + (to.0 - from.0) * t).round() as u32;
        let y = (from.1 + (to.1 - from.1) * t).round() as u32;
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, color);
        }
    }
}
