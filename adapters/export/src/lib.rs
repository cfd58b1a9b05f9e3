#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless export of culture frames and metric charts.
//!
//! Frames are rasterised with plotters' bitmap backend, which blends each
//! translucent polygon over the pixels painted before it. Charts use the SVG
//! backend so no system font library is required.

use anyhow::{anyhow, Context, Result};
use cardiac_culture_rendering::{CanvasPresentation, ChartPresentation, LineChartPresentation};
use plotters::prelude::*;
use serde::Serialize;
use std::{
    fmt,
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

/// Pixel size of exported charts.
pub const CHART_SIZE: (u32, u32) = (900, 600);

const MARKER_RADIUS: i32 = 4;

/// Name of the PNG holding frame `ordinal` of `day`.
#[must_use]
pub fn frame_file_name(day: u8, ordinal: usize) -> String {
    format!("day-{day}-frame-{ordinal}.png")
}

/// Creates `dir` and its parents when missing.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

/// Rasterises the canvas at its native size and writes it as PNG.
pub fn write_canvas_png(canvas: &CanvasPresentation, path: &Path) -> Result<()> {
    let size = (canvas.width.round() as u32, canvas.height.round() as u32);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&to_plotters_rgba(canvas.background))
        .map_err(plot_error)?;

    for ellipse in &canvas.ellipses {
        let outline: Vec<(i32, i32)> = ellipse
            .polygon(ellipse.segments_for_scale(1.0))
            .into_iter()
            .map(|point| (point.x.round() as i32, point.y.round() as i32))
            .collect();
        root.draw(&Polygon::new(outline, to_plotters_rgba(ellipse.color).filled()))
            .map_err(plot_error)?;
    }

    root.present()
        .map_err(plot_error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("wrote frame {}", path.display());
    Ok(())
}

/// Writes the chart, or its placeholder message, as SVG.
pub fn write_chart_svg(chart: &ChartPresentation, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    match chart {
        ChartPresentation::Lines(lines) => draw_line_chart(&root, lines)?,
        ChartPresentation::Placeholder { message } => {
            root.draw(&Text::new(
                message.clone(),
                (40, 60),
                ("sans-serif", 22).into_font(),
            ))
            .map_err(plot_error)?;
        }
    }

    root.present()
        .map_err(plot_error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("wrote chart {}", path.display());
    Ok(())
}

fn draw_line_chart(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    lines: &LineChartPresentation,
) -> Result<()> {
    let categories = lines.x_labels.len();
    let mut chart = ChartBuilder::on(root)
        .caption(&lines.title, ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5f32..(categories as f32 + 0.5), 0f32..lines.y_max)
        .map_err(plot_error)?;

    let label_for = |x: &f32| category_label(&lines.x_labels, *x);
    chart
        .configure_mesh()
        .x_labels(categories.max(1))
        .x_label_formatter(&label_for)
        .x_desc(lines.x_title.as_str())
        .y_desc(lines.y_title.as_str())
        .draw()
        .map_err(plot_error)?;

    for series in &lines.series {
        let color = to_plotters_rgb(series.color);
        let points: Vec<(f32, f32)> = series
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| (index as f32 + 1.0, *value))
            .collect();

        let _ = chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(plot_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        let _ = chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, MARKER_RADIUS, color.filled())),
            )
            .map_err(plot_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;
    Ok(())
}

/// Writes any serialisable value as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to serialise {}", path.display()))?;
    log::debug!("wrote table {}", path.display());
    Ok(())
}

fn category_label(labels: &[String], x: f32) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 0.01 || rounded < 1.0 {
        return String::new();
    }
    labels
        .get(rounded as usize - 1)
        .cloned()
        .unwrap_or_default()
}

fn to_plotters_rgba(color: cardiac_culture_rendering::Color) -> RGBAColor {
    let [red, green, blue, _] = color.to_rgba_u8();
    RGBAColor(red, green, blue, f64::from(color.alpha.clamp(0.0, 1.0)))
}

fn to_plotters_rgb(color: cardiac_culture_rendering::Color) -> RGBColor {
    let [red, green, blue, _] = color.to_rgba_u8();
    RGBColor(red, green, blue)
}

fn plot_error<E: fmt::Display>(error: E) -> anyhow::Error {
    anyhow!("plotting failed: {error}")
}
