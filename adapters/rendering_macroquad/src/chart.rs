//! Line chart drawing for the data visualization view.

use cardiac_culture_rendering::{ChartPresentation, LineChartPresentation, TablePresentation};
use glam::Vec2;
use macroquad::{
    color::{Color, BLACK, DARKGRAY, LIGHTGRAY},
    shapes::{draw_circle, draw_line, draw_rectangle, draw_rectangle_lines},
};

use crate::{draw_label, to_macroquad_color, Region};

const TITLE_HEIGHT: f32 = 36.0;
const AXIS_LABEL_WIDTH: f32 = 56.0;
const AXIS_LABEL_HEIGHT: f32 = 44.0;
const LEGEND_WIDTH: f32 = 160.0;
const TABLE_ROW_HEIGHT: f32 = 20.0;
const MARKER_RADIUS: f32 = 4.0;
const FONT_SIZE: f32 = 18.0;

/// Screen regions used by the chart and its data table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ChartLayout {
    pub(crate) title: Vec2,
    pub(crate) plot: Region,
    pub(crate) legend: Vec2,
    pub(crate) table: Region,
}

impl ChartLayout {
    /// Splits `area` into the plot, legend and table for `table_rows` data rows.
    pub(crate) fn new(area: Region, table_rows: usize) -> Self {
        let table_height = TABLE_ROW_HEIGHT * (table_rows + 1) as f32;
        let table_height = table_height.min(area.size.y * 0.4);
        let plot_origin = area.origin + Vec2::new(AXIS_LABEL_WIDTH, TITLE_HEIGHT);
        let plot_size = Vec2::new(
            area.size.x - AXIS_LABEL_WIDTH - LEGEND_WIDTH,
            area.size.y - TITLE_HEIGHT - AXIS_LABEL_HEIGHT - table_height,
        )
        .max(Vec2::ZERO);
        let plot = Region::new(plot_origin, plot_size);

        Self {
            title: area.origin + Vec2::new(AXIS_LABEL_WIDTH, TITLE_HEIGHT * 0.6),
            plot,
            legend: Vec2::new(plot.right() + 16.0, plot.origin.y + 8.0),
            table: Region::new(
                Vec2::new(area.origin.x, area.bottom() - table_height),
                Vec2::new(area.size.x, table_height),
            ),
        }
    }

    /// Screen position of the `index`-th category at `value`.
    ///
    /// Categories are centred in equal bands so the first and last points keep
    /// a margin from the plot edges.
    pub(crate) fn project(&self, index: usize, categories: usize, value: f32, y_max: f32) -> Vec2 {
        let band = self.plot.size.x / categories.max(1) as f32;
        let x = self.plot.origin.x + band * (index as f32 + 0.5);
        let ratio = if y_max <= f32::EPSILON {
            0.0
        } else {
            (value / y_max).clamp(0.0, 1.0)
        };
        let y = self.plot.bottom() - ratio * self.plot.size.y;
        Vec2::new(x, y)
    }
}

/// Tick values drawn along the vertical axis, from zero to `y_max` inclusive.
pub(crate) fn y_ticks(y_max: f32) -> Vec<f32> {
    if y_max <= 0.0 {
        return vec![0.0];
    }
    let step = if y_max <= 50.0 { 10.0 } else { 20.0 };
    let count = (y_max / step).floor() as usize;
    let mut ticks: Vec<f32> = (0..=count).map(|tick| tick as f32 * step).collect();
    if ticks.last().is_some_and(|last| *last < y_max) {
        ticks.push(y_max);
    }
    ticks
}

pub(crate) fn draw_chart(chart: &ChartPresentation, area: Region) {
    match chart {
        ChartPresentation::Lines(lines) => draw_line_chart(lines, area),
        ChartPresentation::Placeholder { message } => {
            let info = Color::from_rgba(220, 235, 250, 255);
            draw_rectangle(area.origin.x, area.origin.y, area.size.x, 48.0, info);
            draw_label(
                message,
                area.origin.x + 16.0,
                area.origin.y + 30.0,
                FONT_SIZE,
                DARKGRAY,
            );
        }
    }
}

fn draw_line_chart(chart: &LineChartPresentation, area: Region) {
    let layout = ChartLayout::new(area, chart.table.rows.len());
    let plot = layout.plot;
    let categories = chart.x_labels.len();

    draw_label(&chart.title, layout.title.x, layout.title.y, 22.0, BLACK);

    for tick in y_ticks(chart.y_max) {
        let y = layout.project(0, categories, tick, chart.y_max).y;
        draw_line(plot.origin.x, y, plot.right(), y, 1.0, LIGHTGRAY);
        draw_label(
            &format!("{tick:.0}"),
            plot.origin.x - 36.0,
            y + 5.0,
            FONT_SIZE,
            DARKGRAY,
        );
    }
    draw_rectangle_lines(
        plot.origin.x,
        plot.origin.y,
        plot.size.x,
        plot.size.y,
        1.5,
        DARKGRAY,
    );

    for (index, label) in chart.x_labels.iter().enumerate() {
        let x = layout.project(index, categories, 0.0, chart.y_max).x;
        draw_label(label, x - 4.0, plot.bottom() + 18.0, FONT_SIZE, DARKGRAY);
    }
    draw_label(
        &chart.x_title,
        plot.origin.x + plot.size.x * 0.5 - 12.0,
        plot.bottom() + 38.0,
        FONT_SIZE,
        BLACK,
    );
    draw_label(
        &chart.y_title,
        area.origin.x,
        plot.origin.y - 8.0,
        FONT_SIZE,
        BLACK,
    );

    for series in &chart.series {
        let color = to_macroquad_color(series.color);
        let points: Vec<Vec2> = series
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| layout.project(index, categories, *value, chart.y_max))
            .collect();
        for pair in points.windows(2) {
            draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, 2.0, color);
        }
        for point in &points {
            draw_circle(point.x, point.y, MARKER_RADIUS, color);
        }
    }

    draw_label("Metric", layout.legend.x, layout.legend.y, FONT_SIZE, BLACK);
    for (index, series) in chart.series.iter().enumerate() {
        let y = layout.legend.y + 22.0 * (index + 1) as f32;
        draw_rectangle(
            layout.legend.x,
            y - 10.0,
            12.0,
            12.0,
            to_macroquad_color(series.color),
        );
        draw_label(&series.label, layout.legend.x + 18.0, y, FONT_SIZE, DARKGRAY);
    }

    draw_table(&chart.table, layout.table);
}

fn draw_table(table: &TablePresentation, area: Region) {
    let columns = table.header.len().max(1);
    let column_width = area.size.x / columns as f32;
    let rows = std::iter::once(&table.header).chain(table.rows.iter());

    for (row_index, row) in rows.enumerate() {
        let y = area.origin.y + TABLE_ROW_HEIGHT * (row_index as f32 + 0.8);
        if y > area.bottom() {
            break;
        }
        let color = if row_index == 0 { BLACK } else { DARKGRAY };
        for (column_index, cell) in row.iter().enumerate() {
            let x = area.origin.x + column_width * column_index as f32;
            draw_label(cell, x, y, FONT_SIZE, color);
        }
    }
}
