//! Scatter plot of a spiral [`Dataset`], rasterised with `image` and written
//! as PNG.
//!
//! The layout is fixed: title across the top, a framed plot area with a grid
//! at the axis ticks, tick values along the left and bottom edges, and the
//! axis labels outside them. Each class gets one colour from [`PALETTE`],
//! cycling when there are more classes than colours.

pub mod font;

use image::{Rgb, RgbImage};
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::data::spiral::Dataset;
use crate::error::Result;

/// Pixels per inch used to turn the plot size in inches into pixels.
pub const DPI: u32 = 96;

/// Soft colour palette, one entry per class.
pub const PALETTE: [Rgb<u8>; 7] = [
    Rgb([241, 90, 96]),
    Rgb([122, 195, 106]),
    Rgb([90, 155, 212]),
    Rgb([250, 167, 91]),
    Rgb([158, 103, 171]),
    Rgb([206, 112, 88]),
    Rgb([215, 127, 180]),
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([224, 224, 224]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

const MARGIN_TOP: u32 = 30;
const MARGIN_RIGHT: u32 = 12;
const MARGIN_BOTTOM: u32 = 36;
const MARGIN_LEFT: u32 = 52;
const TICK_LEN: i64 = 4;

/// Output settings for [`save_scatter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Radius of the ring drawn for each point, in pixels.
    pub marker_radius: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            path: "plots.png".to_owned(),
            width: 4 * DPI,
            height: 4 * DPI,
            title: "Spiral Data".to_owned(),
            x_label: "X".to_owned(),
            y_label: "Y".to_owned(),
            marker_radius: 3,
        }
    }
}

/// Colour used for `class`.
pub fn class_color(class: usize) -> Rgb<u8> {
    PALETTE[class % PALETTE.len()]
}

/// Renders the dataset into an in-memory image of `config.width × config.height`.
pub fn render_scatter(dataset: &Dataset, config: &PlotConfig) -> RgbImage {
    let mut img = RgbImage::from_pixel(config.width, config.height, BACKGROUND);

    let left = MARGIN_LEFT as i64;
    let top = MARGIN_TOP as i64;
    let right = config.width.saturating_sub(MARGIN_RIGHT).max(MARGIN_LEFT + 1) as i64;
    let bottom = config.height.saturating_sub(MARGIN_BOTTOM).max(MARGIN_TOP + 1) as i64;

    let x_axis = Axis::fit(dataset.points().iter().map(|p| p.x));
    let y_axis = Axis::fit(dataset.points().iter().map(|p| p.y));
    let to_px = |x: f64| left + (x_axis.unit(x) * (right - left) as f64).round() as i64;
    let to_py = |y: f64| bottom - (y_axis.unit(y) * (bottom - top) as f64).round() as i64;

    for tick in x_axis.ticks() {
        let px = to_px(tick);
        vline(&mut img, px, top, bottom, GRID);
        vline(&mut img, px, bottom, bottom + TICK_LEN, INK);
        let label = x_axis.label(tick);
        let w = font::text_width(&label, 1) as i64;
        font::draw_text(&mut img, px - w / 2, bottom + TICK_LEN + 3, &label, 1, INK);
    }
    for tick in y_axis.ticks() {
        let py = to_py(tick);
        hline(&mut img, left, right, py, GRID);
        hline(&mut img, left - TICK_LEN, left, py, INK);
        let label = y_axis.label(tick);
        let w = font::text_width(&label, 1) as i64;
        font::draw_text(&mut img, left - TICK_LEN - 3 - w, py - font::GLYPH_HEIGHT as i64 / 2, &label, 1, INK);
    }

    hline(&mut img, left, right, top, INK);
    hline(&mut img, left, right, bottom, INK);
    vline(&mut img, left, top, bottom, INK);
    vline(&mut img, right, top, bottom, INK);

    for class in 0..dataset.classes() {
        let color = class_color(class);
        for p in dataset.class_points(class) {
            ring(&mut img, to_px(p.x), to_py(p.y), config.marker_radius as i64, color);
        }
    }

    let title_w = font::text_width(&config.title, 2) as i64;
    font::draw_text(&mut img, (config.width as i64 - title_w) / 2, 8, &config.title, 2, INK);

    let x_label_w = font::text_width(&config.x_label, 1) as i64;
    font::draw_text(
        &mut img,
        left + (right - left - x_label_w) / 2,
        config.height as i64 - font::GLYPH_HEIGHT as i64 - 4,
        &config.x_label,
        1,
        INK,
    );
    font::draw_text(
        &mut img,
        4,
        top + (bottom - top - font::GLYPH_HEIGHT as i64) / 2,
        &config.y_label,
        1,
        INK,
    );

    img
}

/// Renders the dataset and writes it as PNG to `config.path`.
pub fn save_scatter(dataset: &Dataset, config: &PlotConfig) -> Result<()> {
    let img = render_scatter(dataset, config);
    img.save(&config.path)?;
    info!(path = %config.path, points = dataset.len(), "saved scatter plot");
    Ok(())
}

/// Linear axis range with "nice" tick spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    min: f64,
    max: f64,
    step: f64,
}

impl Axis {
    /// Fits an axis to the values. No values, or a single repeated value,
    /// falls back to a range of width one.
    fn fit(values: impl Iterator<Item = f64>) -> Axis {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (min, max) = if min > max {
            (0.0, 1.0)
        } else if max - min < f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        Axis { min, max, step: nice_step((max - min) / 4.0) }
    }

    /// Position of `v` along the axis, 0.0 at `min` and 1.0 at `max`.
    fn unit(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    fn ticks(&self) -> Vec<f64> {
        let first = (self.min / self.step).ceil() as i64;
        let last = (self.max / self.step).floor() as i64;
        (first..=last).map(|k| k as f64 * self.step).collect()
    }

    fn label(&self, tick: f64) -> String {
        let decimals = if self.step >= 1.0 { 0 } else { (-self.step.log10()).ceil() as usize };
        // Snap so that a tick at zero never prints as "-0".
        let tick = if tick.abs() < self.step * 1e-6 { 0.0 } else { tick };
        format!("{:.*}", decimals, tick)
    }
}

/// Smallest step of the form {1, 2, 5} × 10ⁿ that is at least `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn hline(img: &mut RgbImage, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put(img, x, y, color);
    }
}

fn vline(img: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..=y1 {
        put(img, x, y, color);
    }
}

fn ring(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    let r = radius as f64;
    for dy in -radius - 1..=radius + 1 {
        for dx in -radius - 1..=radius + 1 {
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if (d - r).abs() <= 0.75 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}
