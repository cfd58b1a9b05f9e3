#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the cardiac culture viewer.
//!
//! This crate defines the immutable day table and the message surface that
//! connects adapters, the authoritative viewer state, and pure systems.
//! Adapters submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values for systems to react to deterministically.

mod days;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use days::{day_record, DAY_RECORDS};

/// Canonical title shown when the viewer boots.
pub const APPLICATION_TITLE: &str = "Cardiac Cell Development Animation (Day 1-8) by Abu Sufian";

/// Number of days covered by the scripted culture narrative.
pub const DAY_COUNT: u8 = 8;

/// Number of pulse frames rendered for a single day while auto-play runs.
pub const PULSE_FRAMES_PER_DAY: usize = 10;

/// Validated day index in the range `1..=8`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayNumber(u8);

impl DayNumber {
    /// First day of the culture narrative.
    pub const FIRST: Self = Self(1);

    /// Last day of the culture narrative.
    pub const LAST: Self = Self(DAY_COUNT);

    /// Creates a day number, rejecting values outside `1..=8`.
    pub const fn new(value: u8) -> Result<Self, DayError> {
        if value == 0 || value > DAY_COUNT {
            return Err(DayError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Numeric value of the day.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position of the day inside the day table.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Following day, wrapping from the last day back to the first.
    #[must_use]
    pub const fn next_wrapping(self) -> Self {
        if self.0 >= DAY_COUNT {
            Self::FIRST
        } else {
            Self(self.0 + 1)
        }
    }

    /// Following day, stopping at the last day.
    #[must_use]
    pub const fn saturating_next(self) -> Self {
        if self.0 >= DAY_COUNT {
            Self::LAST
        } else {
            Self(self.0 + 1)
        }
    }

    /// Preceding day, stopping at the first day.
    #[must_use]
    pub const fn saturating_previous(self) -> Self {
        if self.0 <= 1 {
            Self::FIRST
        } else {
            Self(self.0 - 1)
        }
    }

    /// Shape family of the cells observed on this day.
    #[must_use]
    pub const fn stage(self) -> CellStage {
        match self.0 {
            0..=2 => CellStage::Round,
            3..=6 => CellStage::Elongated,
            _ => CellStage::Fragmented,
        }
    }

    /// Iterates over every day in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=DAY_COUNT).map(Self)
    }
}

impl TryFrom<u8> for DayNumber {
    type Error = DayError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayNumber> for u8 {
    fn from(day: DayNumber) -> Self {
        day.get()
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when a day number falls outside the narrative.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DayError {
    /// The provided value does not name one of the eight days.
    #[error("day {value} is outside the 1..=8 range")]
    OutOfRange {
        /// Value that failed validation.
        value: u8,
    },
}

/// Shape family used when drawing the cells of a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStage {
    /// Small round cells of the immature culture (days 1-2).
    Round,
    /// Elongated, aligning cells of the maturing culture (days 3-6).
    Elongated,
    /// Fragmented cells of the deteriorating culture (days 7-8).
    Fragmented,
}

impl CellStage {
    /// Fraction of the beat strength applied to the cell size at full pulse.
    #[must_use]
    pub const fn beat_gain(self) -> f32 {
        match self {
            Self::Round | Self::Elongated => 0.2,
            Self::Fragmented => 0.1,
        }
    }

    /// Size of the nucleus relative to its cell body.
    #[must_use]
    pub const fn nucleus_scale(self) -> f32 {
        match self {
            Self::Round => 0.7,
            Self::Elongated => 0.5,
            Self::Fragmented => 0.3,
        }
    }
}

/// Base appearance applied to the cells of a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CultureColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl CultureColor {
    /// Opaque white used as the culture dish background.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Morphological observations recorded for a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Morphology {
    /// Cell shape and attachment.
    pub shape: &'static str,
    /// Cell density and cell-to-cell interaction.
    pub density: &'static str,
    /// Nucleus appearance.
    pub nucleus: &'static str,
    /// Cytoplasm and filament organisation.
    pub cytoplasm: &'static str,
}

/// Functional observations recorded for a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Functionality {
    /// Contraction behaviour.
    pub contractility: &'static str,
    /// Noise and debris in the field of view.
    pub noise: &'static str,
    /// Overall functional maturity.
    pub functional_state: &'static str,
}

/// Scalar knobs driving both the rendered frame and the charts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DayMetrics {
    /// Beat strength in the range 0.0..=1.0.
    pub beat: f64,
    /// Synchronisation level in the range 0.0..=1.0.
    pub sync_level: f64,
    /// Number of cells drawn in the field of view.
    pub cell_count: u32,
    /// Debris level in the range 0.0..=1.0.
    pub debris_level: f64,
}

impl DayMetrics {
    /// Number of debris particles scattered across a frame.
    #[must_use]
    pub fn debris_particles(&self) -> u32 {
        percent(self.debris_level).floor().max(0.0) as u32
    }

    /// Whether cells visibly beat on this day.
    #[must_use]
    pub fn beats(&self) -> bool {
        self.beat > 0.1
    }
}

/// Immutable description of one developmental stage of the culture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DayRecord {
    /// Day described by the record.
    pub day: DayNumber,
    /// Display title of the stage.
    pub title: &'static str,
    /// Morphological observations.
    pub morphology: Morphology,
    /// Functional observations.
    pub functionality: Functionality,
    /// Base color of the cell bodies.
    pub color: CultureColor,
    /// Numeric metrics of the stage.
    pub metrics: DayMetrics,
}

/// Numeric series that can be charted over the eight days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Beat strength expressed as a percentage.
    BeatStrength,
    /// Synchronisation level expressed as a percentage.
    Synchronization,
    /// Raw number of cells.
    CellCount,
    /// Debris level expressed as a percentage.
    DebrisLevel,
}

impl Metric {
    /// Every metric in canonical chart order.
    pub const ALL: [Self; 4] = [
        Self::BeatStrength,
        Self::Synchronization,
        Self::CellCount,
        Self::DebrisLevel,
    ];

    /// Human readable label used in legends and tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeatStrength => "Beat Strength",
            Self::Synchronization => "Synchronization",
            Self::CellCount => "Cell Count",
            Self::DebrisLevel => "Debris Level",
        }
    }

    /// Short machine-friendly identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BeatStrength => "beat-strength",
            Self::Synchronization => "synchronization",
            Self::CellCount => "cell-count",
            Self::DebrisLevel => "debris-level",
        }
    }

    /// Position of the metric inside [`Metric::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::BeatStrength => 0,
            Self::Synchronization => 1,
            Self::CellCount => 2,
            Self::DebrisLevel => 3,
        }
    }

    /// Value plotted for the provided record.
    ///
    /// Fractional metrics are charted as percentages, the cell count as-is.
    #[must_use]
    pub fn charted_value(self, record: &DayRecord) -> f64 {
        let metrics = &record.metrics;
        match self {
            Self::BeatStrength => percent(metrics.beat),
            Self::Synchronization => percent(metrics.sync_level),
            Self::CellCount => f64::from(metrics.cell_count),
            Self::DebrisLevel => percent(metrics.debris_level),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised: String = value
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalised.as_str() {
            "beat" | "beat-strength" => Ok(Self::BeatStrength),
            "sync" | "sync-level" | "synchronization" => Ok(Self::Synchronization),
            "cells" | "cell-count" => Ok(Self::CellCount),
            "debris" | "debris-level" => Ok(Self::DebrisLevel),
            _ => Err(MetricParseError {
                name: value.to_owned(),
            }),
        }
    }
}

/// Error returned when a metric name cannot be recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown metric `{name}`")]
pub struct MetricParseError {
    /// Name that failed to parse.
    pub name: String,
}

// Rounded to one decimal so 0.6 charts as 60.0 rather than 60.000000000000007.
fn percent(fraction: f64) -> f64 {
    (fraction * 1_000.0).round() / 10.0
}

/// Set of metrics selected for charting, always iterated in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MetricSelection {
    selected: [bool; 4],
}

impl MetricSelection {
    /// Selection with no metric enabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            selected: [false; 4],
        }
    }

    /// Whether the metric is part of the selection.
    #[must_use]
    pub const fn contains(&self, metric: Metric) -> bool {
        self.selected[metric.index()]
    }

    /// Adds the metric to the selection.
    pub fn insert(&mut self, metric: Metric) {
        self.selected[metric.index()] = true;
    }

    /// Flips the metric's membership and reports whether it is now selected.
    pub fn toggle(&mut self, metric: Metric) -> bool {
        let slot = &mut self.selected[metric.index()];
        *slot = !*slot;
        *slot
    }

    /// Whether no metric is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.iter().all(|selected| !selected)
    }

    /// Number of selected metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.iter().filter(|selected| **selected).count()
    }

    /// Iterates over the selected metrics in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(move |metric| self.contains(*metric))
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        [
            Metric::BeatStrength,
            Metric::Synchronization,
            Metric::CellCount,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Metric> for MetricSelection {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        let mut selection = Self::empty();
        for metric in iter {
            selection.insert(metric);
        }
        selection
    }
}

/// Animation phase used to scale cells for the beating effect.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Pulse(f32);

impl Pulse {
    /// Phase used for the still frame shown while auto-play is off.
    pub const STATIC: Self = Self(0.5);

    /// Phase of a fully relaxed cell.
    pub const RELAXED: Self = Self(0.0);

    /// Creates a pulse, clamping the value into `0.0..=1.0`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::RELAXED;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Evenly spaced phase for frame `index` of a `count` frame sequence.
    ///
    /// The first frame is fully relaxed and the last frame fully contracted.
    #[must_use]
    pub fn frame(index: usize, count: usize) -> Self {
        if count <= 1 {
            return Self::RELAXED;
        }
        let last = count - 1;
        Self::new(index.min(last) as f32 / last as f32)
    }

    /// Numeric phase value.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Pulse {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Pulse> for f32 {
    fn from(pulse: Pulse) -> Self {
        pulse.get()
    }
}

/// Playback speed multiplier selectable by the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnimationSpeed(u8);

impl AnimationSpeed {
    /// Every selectable speed.
    pub const ALL: [Self; 3] = [Self(1), Self(2), Self(3)];

    /// Creates a speed, accepting only 1, 2 or 3.
    pub const fn new(value: u8) -> Result<Self, SpeedError> {
        match value {
            1..=3 => Ok(Self(value)),
            _ => Err(SpeedError::Unsupported { value }),
        }
    }

    /// Numeric multiplier.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Pause after a day's pulse sequence before moving to the next day.
    #[must_use]
    pub fn day_delay(self) -> Duration {
        Duration::from_secs(1) / u32::from(self.0)
    }

    /// Pause between two pulse frames of the same day.
    #[must_use]
    pub fn frame_delay(self) -> Duration {
        self.day_delay() / PULSE_FRAMES_PER_DAY as u32
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for AnimationSpeed {
    type Error = SpeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnimationSpeed> for u8 {
    fn from(speed: AnimationSpeed) -> Self {
        speed.get()
    }
}

/// Errors raised when a playback speed is not supported.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SpeedError {
    /// Only speeds 1, 2 and 3 are offered.
    #[error("animation speed {value} is not one of 1, 2 or 3")]
    Unsupported {
        /// Value that failed validation.
        value: u8,
    },
}

/// Views the viewer can switch between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewTab {
    /// Animated culture frames.
    #[default]
    Animation,
    /// Textual morphology and functionality of the selected day.
    CellProperties,
    /// Metric charts over the eight days.
    DataVisualization,
}

impl ViewTab {
    /// Every tab in display order.
    pub const ALL: [Self; 3] = [
        Self::Animation,
        Self::CellProperties,
        Self::DataVisualization,
    ];

    /// Label displayed on the tab.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Animation => "Animation",
            Self::CellProperties => "Cell Properties",
            Self::DataVisualization => "Data Visualization",
        }
    }
}

/// Commands that express all permissible viewer mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the viewer clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Selects a day on behalf of the user.
    SelectDay {
        /// Day requested by the user.
        day: DayNumber,
    },
    /// Starts or stops auto-play.
    SetAutoPlay {
        /// Whether auto-play should run.
        enabled: bool,
    },
    /// Changes the playback speed.
    SetSpeed {
        /// Requested speed.
        speed: AnimationSpeed,
    },
    /// Moves auto-play to the next pulse frame of the current day.
    AdvancePulse,
    /// Moves auto-play to the next day, wrapping after the last one.
    AdvanceDay,
    /// Switches the active view.
    SelectTab {
        /// Tab to activate.
        tab: ViewTab,
    },
    /// Adds or removes a metric from the chart selection.
    ToggleMetric {
        /// Metric to toggle.
        metric: Metric,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the viewer clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a different day is displayed.
    DaySelected {
        /// Day that became active.
        day: DayNumber,
        /// Whether the change came from the user rather than auto-play.
        manual: bool,
    },
    /// Announces that auto-play moved to another pulse frame.
    PulseAdvanced {
        /// Zero-based frame index within the day's sequence.
        frame: usize,
        /// Phase associated with the frame.
        pulse: Pulse,
    },
    /// Announces that auto-play started or stopped.
    AutoPlayChanged {
        /// Whether auto-play now runs.
        enabled: bool,
    },
    /// Announces a new playback speed.
    SpeedChanged {
        /// Speed that became active.
        speed: AnimationSpeed,
    },
    /// Announces that a different view is active.
    TabSelected {
        /// Tab that became active.
        tab: ViewTab,
    },
    /// Announces a new chart selection.
    MetricsChanged {
        /// Selection after the change.
        selection: MetricSelection,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_number_rejects_values_outside_narrative() {
        assert_eq!(DayNumber::new(0), Err(DayError::OutOfRange { value: 0 }));
        assert_eq!(DayNumber::new(9), Err(DayError::OutOfRange { value: 9 }));
        assert_eq!(DayNumber::new(8).map(DayNumber::get), Ok(8));
    }

    #[test]
    fn next_wrapping_returns_to_first_day() {
        assert_eq!(DayNumber::LAST.next_wrapping(), DayNumber::FIRST);
        assert_eq!(DayNumber::FIRST.next_wrapping().get(), 2);
    }

    #[test]
    fn saturating_steps_stay_inside_range() {
        assert_eq!(DayNumber::FIRST.saturating_previous(), DayNumber::FIRST);
        assert_eq!(DayNumber::LAST.saturating_next(), DayNumber::LAST);
        let day = DayNumber::new(4).expect("valid day");
        assert_eq!(day.saturating_previous().get(), 3);
        assert_eq!(day.saturating_next().get(), 5);
    }

    #[test]
    fn stages_follow_day_ranges() {
        let stages: Vec<CellStage> = DayNumber::all().map(DayNumber::stage).collect();
        assert_eq!(
            stages,
            vec![
                CellStage::Round,
                CellStage::Round,
                CellStage::Elongated,
                CellStage::Elongated,
                CellStage::Elongated,
                CellStage::Elongated,
                CellStage::Fragmented,
                CellStage::Fragmented,
            ]
        );
    }

    #[test]
    fn pulse_frames_span_unit_interval() {
        assert_eq!(Pulse::frame(0, PULSE_FRAMES_PER_DAY), Pulse::RELAXED);
        assert_eq!(Pulse::frame(9, PULSE_FRAMES_PER_DAY).get(), 1.0);
        assert!((Pulse::frame(3, PULSE_FRAMES_PER_DAY).get() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(Pulse::frame(42, PULSE_FRAMES_PER_DAY).get(), 1.0);
        assert_eq!(Pulse::frame(0, 1), Pulse::RELAXED);
    }

    #[test]
    fn pulse_clamps_out_of_range_values() {
        assert_eq!(Pulse::new(-3.0).get(), 0.0);
        assert_eq!(Pulse::new(7.5).get(), 1.0);
        assert_eq!(Pulse::new(f32::NAN), Pulse::RELAXED);
    }

    #[test]
    fn speed_delays_scale_inversely() {
        let slow = AnimationSpeed::new(1).expect("valid speed");
        let fast = AnimationSpeed::new(3).expect("valid speed");

        assert_eq!(slow.day_delay(), Duration::from_secs(1));
        assert_eq!(slow.frame_delay(), Duration::from_millis(100));
        assert!(fast.day_delay() < slow.day_delay());
        assert_eq!(AnimationSpeed::default().get(), 2);
        assert_eq!(
            AnimationSpeed::new(4),
            Err(SpeedError::Unsupported { value: 4 })
        );
    }

    #[test]
    fn metric_parsing_accepts_keys_and_labels() {
        assert_eq!("Beat Strength".parse(), Ok(Metric::BeatStrength));
        assert_eq!("sync_level".parse(), Ok(Metric::Synchronization));
        assert_eq!("cell-count".parse(), Ok(Metric::CellCount));
        assert_eq!(" DEBRIS ".parse(), Ok(Metric::DebrisLevel));
        assert!("pressure".parse::<Metric>().is_err());
    }

    #[test]
    fn selection_iterates_in_canonical_order() {
        let selection: MetricSelection = [Metric::DebrisLevel, Metric::BeatStrength]
            .into_iter()
            .collect();

        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![Metric::BeatStrength, Metric::DebrisLevel]
        );
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn selection_toggle_reports_membership() {
        let mut selection = MetricSelection::default();
        assert!(selection.contains(Metric::CellCount));
        assert!(!selection.toggle(Metric::CellCount));
        assert!(selection.toggle(Metric::DebrisLevel));
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![
                Metric::BeatStrength,
                Metric::Synchronization,
                Metric::DebrisLevel
            ]
        );
        assert!(MetricSelection::empty().is_empty());
    }
}
