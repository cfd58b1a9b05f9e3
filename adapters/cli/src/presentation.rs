//! Conversion from viewer state into backend-agnostic presentations.

use anyhow::Result;
use cardiac_culture_core::{Metric, MetricSelection, DAY_COUNT};
use cardiac_culture_rendering::{
    metric_color, CanvasPresentation, ChartPresentation, Color, ControlsPresentation, Ellipse,
    LineChartPresentation, LineSeriesPresentation, MetricToggle, PropertiesPresentation,
    PropertyGroup, PropertyLine, Scene, TablePresentation,
};
use cardiac_culture_system_bootstrap::{Bootstrap, PropertySheet};
use cardiac_culture_system_chart::{ChartModel, ChartOutcome, MetricTable};
use cardiac_culture_system_frame_generation::CultureFrame;
use cardiac_culture_world::{query, World};
use glam::Vec2;

/// Clear color behind every view.
pub(crate) const CLEAR_COLOR: Color = Color::from_rgb_u8(246, 247, 250);

/// Builds the full scene for the current viewer state.
pub(crate) fn scene(
    world: &World,
    frame: &CultureFrame,
    bootstrap: &Bootstrap,
    table: &MetricTable,
) -> Result<Scene> {
    let selection = query::metrics(world);
    Ok(Scene {
        title: bootstrap.title(world).to_string(),
        subtitle: bootstrap.subtitle().to_string(),
        heading: bootstrap.view_heading(world),
        tab: query::tab(world),
        canvas: canvas(frame)?,
        properties: properties(&bootstrap.property_sheet(world)),
        chart: chart(table, &selection),
        controls: controls(world, bootstrap),
    })
}

/// Converts a generated frame into paintable ellipses.
pub(crate) fn canvas(frame: &CultureFrame) -> Result<CanvasPresentation> {
    let ellipses = frame
        .ellipses
        .iter()
        .map(|ellipse| {
            let paint = ellipse.paint;
            Ellipse::from_bounds(
                Vec2::new(ellipse.x, ellipse.y),
                Vec2::new(ellipse.width, ellipse.height),
                Color::from_rgba_u8(
                    paint.color.red(),
                    paint.color.green(),
                    paint.color.blue(),
                    paint.alpha,
                ),
            )
        })
        .collect();
    let background = Color::from_rgb_u8(
        frame.background.red(),
        frame.background.green(),
        frame.background.blue(),
    );

    Ok(CanvasPresentation::new(
        frame.width,
        frame.height,
        background,
        ellipses,
    )?)
}

/// Lays out a property sheet as labelled groups.
pub(crate) fn properties(sheet: &PropertySheet) -> PropertiesPresentation {
    PropertiesPresentation {
        groups: sheet
            .sections
            .iter()
            .map(|section| PropertyGroup {
                title: section.title.to_string(),
                lines: section
                    .entries
                    .iter()
                    .map(|entry| PropertyLine {
                        label: entry.label.to_string(),
                        text: entry.text.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Builds the chart, or its placeholder, for the selected metrics.
pub(crate) fn chart(table: &MetricTable, selection: &MetricSelection) -> ChartPresentation {
    match ChartModel::build(table, selection) {
        ChartOutcome::Chart(model) => ChartPresentation::Lines(LineChartPresentation {
            title: model.title.to_string(),
            x_title: model.x_title.to_string(),
            y_title: model.y_title.to_string(),
            x_labels: model.days.iter().map(ToString::to_string).collect(),
            y_max: model.y_max as f32,
            series: model
                .series
                .iter()
                .map(|series| LineSeriesPresentation {
                    label: series.metric.label().to_string(),
                    color: metric_color(series.metric),
                    values: series.points.iter().map(|(_, value)| *value as f32).collect(),
                })
                .collect(),
            table: metric_table(table, selection),
        }),
        ChartOutcome::NothingSelected { message } => ChartPresentation::Placeholder {
            message: message.to_string(),
        },
    }
}

/// Formats the selected columns of the table, one row per day.
pub(crate) fn metric_table(table: &MetricTable, selection: &MetricSelection) -> TablePresentation {
    let header = std::iter::once("Day".to_string())
        .chain(selection.iter().map(|metric| metric.label().to_string()))
        .collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            std::iter::once(row.day.to_string())
                .chain(
                    selection
                        .iter()
                        .map(|metric| format_value(metric, row.value(metric))),
                )
                .collect()
        })
        .collect();

    TablePresentation { header, rows }
}

fn format_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::CellCount => format!("{value:.0}"),
        _ => format!("{value:.1}"),
    }
}

/// Renders a table as aligned plain-text columns.
pub(crate) fn table_text(table: &TablePresentation) -> String {
    let columns = table.header.len();
    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            std::iter::once(&table.header)
                .chain(table.rows.iter())
                .filter_map(|row| row.get(column))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    std::iter::once(&table.header)
        .chain(table.rows.iter())
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn controls(world: &World, bootstrap: &Bootstrap) -> ControlsPresentation {
    let selection = query::metrics(world);
    let instructions = bootstrap.instructions();

    ControlsPresentation {
        day: query::day(world).get(),
        day_count: DAY_COUNT,
        auto_play: query::auto_play(world),
        speed: query::speed(world),
        metrics: Metric::ALL
            .into_iter()
            .map(|metric| MetricToggle {
                metric,
                selected: selection.contains(metric),
                color: metric_color(metric),
            })
            .collect(),
        instructions: std::iter::once(instructions.intro)
            .chain(instructions.steps.iter().copied())
            .map(str::to_string)
            .collect(),
        about: bootstrap.about().to_string(),
        data_source: bootstrap.data_source().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiac_culture_core::{DayNumber, Pulse};
    use cardiac_culture_system_frame_generation::FrameGenerator;

    #[test]
    fn canvas_keeps_every_ellipse_and_alpha() {
        let frame = FrameGenerator::new(1).generate(DayNumber::LAST, Pulse::STATIC, 0);

        let canvas = canvas(&frame).expect("frame has a valid size");

        assert_eq!(canvas.ellipses.len(), frame.ellipses.len());
        assert_eq!((canvas.width, canvas.height), (800.0, 600.0));
        let debris = canvas.ellipses.last().expect("day 8 has debris");
        assert_eq!(debris.color.to_rgba_u8(), [150, 150, 150, 128]);
    }

    #[test]
    fn table_formats_selected_columns() {
        let table = MetricTable::standard();
        let selection: MetricSelection = [Metric::CellCount, Metric::DebrisLevel]
            .into_iter()
            .collect();

        let presentation = metric_table(&table, &selection);

        assert_eq!(presentation.header, vec!["Day", "Cell Count", "Debris Level"]);
        assert_eq!(presentation.rows.len(), 8);
        assert_eq!(presentation.rows[7], vec!["8", "12", "90.0"]);
    }

    #[test]
    fn table_text_aligns_columns() {
        let table = TablePresentation {
            header: vec!["Day".to_string(), "Value".to_string()],
            rows: vec![vec!["1".to_string(), "8.5".to_string()]],
        };

        assert_eq!(table_text(&table), "Day  Value\n  1    8.5");
    }

    #[test]
    fn empty_selection_becomes_placeholder() {
        let chart = chart(&MetricTable::standard(), &MetricSelection::empty());

        assert_eq!(
            chart,
            ChartPresentation::Placeholder {
                message: "Please select at least one metric to display".to_string()
            }
        );
    }

    #[test]
    fn scene_mirrors_world() {
        let world = World::new();
        let frame = FrameGenerator::new(1).generate(query::day(&world), query::pulse(&world), 0);

        let scene = scene(&world, &frame, &Bootstrap, &MetricTable::standard())
            .expect("scene builds");

        assert_eq!(scene.heading, "Day 1: Immature Stage");
        assert_eq!(scene.controls.day, 1);
        assert_eq!(scene.controls.metrics.len(), 4);
        assert!(!scene.controls.metrics[3].selected);
        assert_eq!(scene.controls.instructions.len(), 5);
        assert_eq!(scene.properties.groups.len(), 2);
        assert!(matches!(scene.chart, ChartPresentation::Lines(_)));
    }
}
