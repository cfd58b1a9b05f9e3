#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Metric tables and line-chart models derived from the day table.

use cardiac_culture_core::{DayNumber, DayRecord, Metric, MetricSelection, DAY_RECORDS};
use serde::Serialize;

/// Title displayed above the metric chart.
pub const CHART_TITLE: &str = "Cell Development Metrics Over Time";

/// Title of the horizontal axis.
pub const X_AXIS_TITLE: &str = "Day";

/// Title of the vertical axis.
pub const Y_AXIS_TITLE: &str = "Value";

/// Message shown in place of the chart when no metric is selected.
pub const NOTHING_SELECTED_MESSAGE: &str = "Please select at least one metric to display";

const Y_AXIS_STEP: f64 = 10.0;

/// Charted metric values for one day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricRow {
    /// Day described by the row.
    pub day: DayNumber,
    /// Beat strength in percent.
    pub beat_strength: f64,
    /// Synchronisation in percent.
    pub synchronization: f64,
    /// Number of cells.
    pub cell_count: f64,
    /// Debris level in percent.
    pub debris_level: f64,
}

impl MetricRow {
    fn from_record(record: &DayRecord) -> Self {
        Self {
            day: record.day,
            beat_strength: Metric::BeatStrength.charted_value(record),
            synchronization: Metric::Synchronization.charted_value(record),
            cell_count: Metric::CellCount.charted_value(record),
            debris_level: Metric::DebrisLevel.charted_value(record),
        }
    }

    /// Charted value of the provided metric.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BeatStrength => self.beat_strength,
            Metric::Synchronization => self.synchronization,
            Metric::CellCount => self.cell_count,
            Metric::DebrisLevel => self.debris_level,
        }
    }
}

/// Melted observation used by long-form chart encodings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LongFormRow {
    /// Day of the observation.
    pub day: DayNumber,
    /// Metric observed.
    pub metric: Metric,
    /// Charted value.
    pub value: f64,
}

/// Wide table of charted values, one row per day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricTable {
    rows: Vec<MetricRow>,
}

impl MetricTable {
    /// Builds the table from arbitrary records.
    #[must_use]
    pub fn from_records(records: &[DayRecord]) -> Self {
        Self {
            rows: records.iter().map(MetricRow::from_record).collect(),
        }
    }

    /// Builds the table for the scripted eight-day narrative.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_records(&DAY_RECORDS)
    }

    /// Rows in ascending day order.
    #[must_use]
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Charted value of a metric for a day, if the day is present.
    #[must_use]
    pub fn value(&self, day: DayNumber, metric: Metric) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.day == day)
            .map(|row| row.value(metric))
    }

    /// Melts the selected columns into `(day, metric, value)` rows.
    ///
    /// Rows are grouped by metric in canonical order, then by day.
    #[must_use]
    pub fn long_form(&self, selection: &MetricSelection) -> Vec<LongFormRow> {
        selection
            .iter()
            .flat_map(|metric| {
                self.rows.iter().map(move |row| LongFormRow {
                    day: row.day,
                    metric,
                    value: row.value(metric),
                })
            })
            .collect()
    }
}

impl Default for MetricTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Line series for one metric.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    /// Metric plotted by the series.
    pub metric: Metric,
    /// Points in ascending day order.
    pub points: Vec<(DayNumber, f64)>,
}

/// Line chart of the selected metrics over the eight days.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    /// Chart title.
    pub title: &'static str,
    /// Horizontal axis title.
    pub x_title: &'static str,
    /// Vertical axis title.
    pub y_title: &'static str,
    /// Days covered by the horizontal axis.
    pub days: Vec<DayNumber>,
    /// Upper bound of the vertical axis; the lower bound is zero.
    pub y_max: f64,
    /// One series per selected metric, in canonical order.
    pub series: Vec<ChartSeries>,
    /// Metrics plotted by the chart.
    pub selection: MetricSelection,
}

/// Result of building a chart for a selection.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartOutcome {
    /// At least one metric was selected.
    Chart(ChartModel),
    /// The selection was empty.
    NothingSelected {
        /// Hint displayed instead of the chart.
        message: &'static str,
    },
}

impl ChartModel {
    /// Builds the chart for the selected metrics.
    #[must_use]
    pub fn build(table: &MetricTable, selection: &MetricSelection) -> ChartOutcome {
        if selection.is_empty() {
            return ChartOutcome::NothingSelected {
                message: NOTHING_SELECTED_MESSAGE,
            };
        }

        let series: Vec<ChartSeries> = selection
            .iter()
            .map(|metric| ChartSeries {
                metric,
                points: table
                    .rows()
                    .iter()
                    .map(|row| (row.day, row.value(metric)))
                    .collect(),
            })
            .collect();

        let peak = series
            .iter()
            .flat_map(|series| series.points.iter().map(|(_, value)| *value))
            .fold(0.0_f64, f64::max);

        ChartOutcome::Chart(Self {
            title: CHART_TITLE,
            x_title: X_AXIS_TITLE,
            y_title: Y_AXIS_TITLE,
            days: table.rows().iter().map(|row| row.day).collect(),
            y_max: axis_ceiling(peak),
            series,
            selection: *selection,
        })
    }
}

fn axis_ceiling(peak: f64) -> f64 {
    if peak <= 0.0 {
        return Y_AXIS_STEP;
    }
    (peak / Y_AXIS_STEP).ceil() * Y_AXIS_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ceiling_rounds_up_to_step() {
        assert_eq!(axis_ceiling(0.0), 10.0);
        assert_eq!(axis_ceiling(28.0), 30.0);
        assert_eq!(axis_ceiling(100.0), 100.0);
        assert_eq!(axis_ceiling(100.5), 110.0);
    }

    #[test]
    fn rows_expose_each_metric() {
        let table = MetricTable::standard();
        let first = table.rows()[0];

        assert_eq!(first.value(Metric::BeatStrength), 20.0);
        assert_eq!(first.value(Metric::Synchronization), 10.0);
        assert_eq!(first.value(Metric::CellCount), 8.0);
        assert_eq!(first.value(Metric::DebrisLevel), 10.0);
    }
}
