//! Raster chart rendering, decoupled from the file formatters: both the
//! PDF and XLSX exporters consume the same opaque [`ChartImage`] buffers.

use plotters::prelude::*;
use std::io::Cursor;

use crate::core::{AppError, Result};
use crate::modules::export::services::format;
use crate::modules::reports::models::DailySales;

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 360;

/// Fixed palette so rendering is deterministic across runs
const PALETTE: [RGBColor; 8] = [
    RGBColor(38, 70, 166),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(158, 157, 36),
];

/// A rendered chart: raw RGB pixels (consumed by the PDF formatter) and
/// the same image PNG-encoded (consumed by the spreadsheet formatter).
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub png: Vec<u8>,
}

/// Stateless renderer; one method per chart family
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer;

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("Chart rendering failed: {}", e))
}

impl ChartRenderer {
    pub fn new() -> Self {
        ChartRenderer
    }

    /// Daily revenue line. The x axis shows short date labels ("Jan 05"),
    /// thinned to ~8 evenly spaced ticks when the series is long.
    pub fn line_chart(&self, title: &str, series: &[DailySales]) -> Result<ChartImage> {
        if series.is_empty() {
            return self.placeholder(title);
        }

        let n = series.len();
        let values: Vec<f64> = series
            .iter()
            .map(|d| format::to_f64(d.total_amount))
            .collect();
        let labels: Vec<String> = series
            .iter()
            .map(|d| d.date.format("%b %d").to_string())
            .collect();
        let max_y = values.iter().copied().fold(0.0f64, f64::max);
        let max_y = if max_y > 0.0 { max_y * 1.1 } else { 1.0 };
        let step = if n > 10 { n.div_ceil(8) } else { 1 };

        let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(12)
                .x_label_area_size(36)
                .y_label_area_size(70)
                .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..max_y)
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n.min(8))
                .x_label_formatter(&|x| {
                    let i = x.round() as usize;
                    if *x >= 0.0 && i < n && i % step == 0 {
                        labels[i].clone()
                    } else {
                        String::new()
                    }
                })
                .y_label_formatter(&|y| format::axis_currency(*y))
                .draw()
                .map_err(chart_err)?;

            chart
                .draw_series(LineSeries::new(
                    values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    ShapeStyle::from(&PALETTE[0]).stroke_width(2),
                ))
                .map_err(chart_err)?;
            chart
                .draw_series(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| Circle::new((i as f64, *v), 3, PALETTE[0].filled())),
                )
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        self.finish(buf)
    }

    /// Vertical bars, one per labeled value, currency y axis
    pub fn bar_chart(&self, title: &str, entries: &[(String, f64)]) -> Result<ChartImage> {
        if entries.is_empty() {
            return self.placeholder(title);
        }

        let n = entries.len();
        let max_y = entries.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
        let max_y = if max_y > 0.0 { max_y * 1.1 } else { 1.0 };
        let step = if n > 10 { n.div_ceil(8) } else { 1 };

        let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(12)
                .x_label_area_size(36)
                .y_label_area_size(70)
                .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..max_y)
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n.min(8))
                .x_label_formatter(&|x| {
                    let i = x.round() as usize;
                    if *x >= 0.0 && i < n && i % step == 0 {
                        entries[i].0.clone()
                    } else {
                        String::new()
                    }
                })
                .y_label_formatter(&|y| format::axis_currency(*y))
                .draw()
                .map_err(chart_err)?;

            chart
                .draw_series(entries.iter().enumerate().map(|(i, (_, v))| {
                    Rectangle::new(
                        [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *v)],
                        PALETTE[i % PALETTE.len()].filled(),
                    )
                }))
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        self.finish(buf)
    }

    /// Share-of-total pie; zero or negative slices are dropped first
    pub fn pie_chart(&self, title: &str, entries: &[(String, f64)]) -> Result<ChartImage> {
        let slices: Vec<(String, f64)> = entries
            .iter()
            .filter(|(_, v)| *v > 0.0)
            .cloned()
            .collect();
        if slices.is_empty() {
            return self.placeholder(title);
        }

        let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;
            let root = root
                .titled(title, ("sans-serif", 22))
                .map_err(chart_err)?;

            let center = (CHART_WIDTH as i32 / 2, CHART_HEIGHT as i32 / 2 + 8);
            let radius = f64::from(CHART_HEIGHT.min(CHART_WIDTH)) / 2.0 - 48.0;
            let sizes: Vec<f64> = slices.iter().map(|(_, v)| *v).collect();
            let colors: Vec<RGBColor> = (0..slices.len())
                .map(|i| PALETTE[i % PALETTE.len()])
                .collect();
            let labels: Vec<String> = slices.iter().map(|(label, _)| label.clone()).collect();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.label_style(("sans-serif", 14).into_font());
            root.draw(&pie).map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        self.finish(buf)
    }

    /// Empty-input fallback: a blank chart is still a valid chart
    fn placeholder(&self, title: &str) -> Result<ChartImage> {
        let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let heading = TextStyle::from(("sans-serif", 22).into_font()).color(&RGBColor(60, 60, 60));
            let note = TextStyle::from(("sans-serif", 18).into_font()).color(&RGBColor(140, 140, 140));
            root.draw(&Text::new(
                title.to_string(),
                (24, 24),
                heading,
            ))
            .map_err(chart_err)?;
            root.draw(&Text::new(
                "No data available".to_string(),
                (
                    CHART_WIDTH as i32 / 2 - 70,
                    CHART_HEIGHT as i32 / 2,
                ),
                note,
            ))
            .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        self.finish(buf)
    }

    fn finish(&self, rgb: Vec<u8>) -> Result<ChartImage> {
        let img = image::RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, rgb.clone())
            .ok_or_else(|| AppError::render("Chart buffer has unexpected size"))?;

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(chart_err)?;

        Ok(ChartImage {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            rgb,
            png,
        })
    }
}
