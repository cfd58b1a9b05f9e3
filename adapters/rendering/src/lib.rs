#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for cardiac culture adapters.

use anyhow::Result as AnyResult;
use cardiac_culture_core::{AnimationSpeed, Metric, ViewTab};
use glam::Vec2;
use std::{error::Error, f32::consts::TAU, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Channels scaled to bytes, rounding to the nearest value.
    #[must_use]
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
            channel_to_u8(self.alpha),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Color assigned to a metric in charts, legends and toggles.
#[must_use]
pub const fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::BeatStrength => Color::from_rgb_u8(0x4c, 0x78, 0xa8),
        Metric::Synchronization => Color::from_rgb_u8(0xf5, 0x85, 0x18),
        Metric::CellCount => Color::from_rgb_u8(0xe4, 0x57, 0x56),
        Metric::DebrisLevel => Color::from_rgb_u8(0x72, 0xb7, 0xb2),
    }
}

/// Direction of a manual day change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayStep {
    /// Moves to the previous day, stopping at the first one.
    Previous,
    /// Moves to the next day, stopping at the last one.
    Next,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Day change requested on this frame.
    pub day_step: Option<DayStep>,
    /// Whether the adapter detected an auto-play toggle on this frame.
    pub toggle_auto_play: bool,
    /// Speed picked on this frame.
    pub speed: Option<AnimationSpeed>,
    /// Tab picked on this frame.
    pub tab: Option<ViewTab>,
    /// Metrics whose chart selection should flip, in click order.
    pub toggle_metrics: Vec<Metric>,
}

impl FrameInput {
    /// Returns `true` when the frame carries no request.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.day_step.is_none()
            && !self.toggle_auto_play
            && self.speed.is_none()
            && self.tab.is_none()
            && self.toggle_metrics.is_empty()
    }
}

/// Filled axis-aligned ellipse expressed in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    /// Centre of the ellipse.
    pub center: Vec2,
    /// Half width and half height.
    pub radii: Vec2,
    /// Fill color; alpha blends over what was painted before.
    pub color: Color,
}

impl Ellipse {
    /// Creates an ellipse inscribed in the bounding box starting at `origin`.
    #[must_use]
    pub fn from_bounds(origin: Vec2, size: Vec2, color: Color) -> Self {
        let radii = size * 0.5;
        Self {
            center: origin + radii,
            radii,
            color,
        }
    }

    /// Tessellates the outline into `segments` points in counter-clockwise order.
    ///
    /// Fewer than three segments are raised to three.
    #[must_use]
    pub fn polygon(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(3);
        (0..segments)
            .map(|index| {
                let angle = TAU * index as f32 / segments as f32;
                self.center + Vec2::new(angle.cos(), angle.sin()) * self.radii
            })
            .collect()
    }

    /// Number of segments that keeps the outline smooth at the given scale.
    #[must_use]
    pub fn segments_for_scale(&self, scale: f32) -> usize {
        let radius = self.radii.max_element() * scale.max(0.0);
        (radius.ceil() as usize).clamp(8, 48)
    }
}

/// Culture dish painted by the animation view.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasPresentation {
    /// Width of the canvas in pixels.
    pub width: f32,
    /// Height of the canvas in pixels.
    pub height: f32,
    /// Color filling the dish before any ellipse is painted.
    pub background: Color,
    /// Ellipses in paint order.
    pub ellipses: Vec<Ellipse>,
}

impl CanvasPresentation {
    /// Creates a canvas descriptor.
    ///
    /// Returns an error when either dimension is not a positive finite number.
    pub fn new(
        width: f32,
        height: f32,
        background: Color,
        ellipses: Vec<Ellipse>,
    ) -> std::result::Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidCanvasSize { width, height });
        }

        Ok(Self {
            width,
            height,
            background,
            ellipses,
        })
    }

    /// Uniform scale and offset that fit the canvas centred inside `area`.
    #[must_use]
    pub fn fit_within(&self, area: Vec2) -> CanvasFit {
        let scale = (area.x / self.width).min(area.y / self.height).max(0.0);
        let size = Vec2::new(self.width, self.height) * scale;
        CanvasFit {
            scale,
            offset: (area - size) * 0.5,
        }
    }
}

/// Placement of a canvas inside a drawing area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasFit {
    /// Factor applied to canvas pixels.
    pub scale: f32,
    /// Top-left corner of the scaled canvas relative to the area.
    pub offset: Vec2,
}

impl CanvasFit {
    /// Maps a canvas position into area coordinates.
    #[must_use]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

/// Labelled line of the properties view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyLine {
    /// Property name.
    pub label: String,
    /// Property description.
    pub text: String,
}

/// Titled group of property lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyGroup {
    /// Group title.
    pub title: String,
    /// Lines in display order.
    pub lines: Vec<PropertyLine>,
}

/// Text shown by the cell properties view.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PropertiesPresentation {
    /// Groups in display order, laid out side by side.
    pub groups: Vec<PropertyGroup>,
}

/// Single metric line of a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSeriesPresentation {
    /// Legend label.
    pub label: String,
    /// Stroke and marker color.
    pub color: Color,
    /// One value per x axis label.
    pub values: Vec<f32>,
}

/// Tabular view of the charted values.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TablePresentation {
    /// Column titles.
    pub header: Vec<String>,
    /// Formatted cells, one row per day.
    pub rows: Vec<Vec<String>>,
}

/// Line chart with its data table.
#[derive(Clone, Debug, PartialEq)]
pub struct LineChartPresentation {
    /// Chart title.
    pub title: String,
    /// Horizontal axis title.
    pub x_title: String,
    /// Vertical axis title.
    pub y_title: String,
    /// Category labels along the horizontal axis.
    pub x_labels: Vec<String>,
    /// Upper bound of the vertical axis; the lower bound is zero.
    pub y_max: f32,
    /// Series in legend order.
    pub series: Vec<LineSeriesPresentation>,
    /// Values of the selected metrics.
    pub table: TablePresentation,
}

/// Content of the data visualization view.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartPresentation {
    /// At least one metric is selected.
    Lines(LineChartPresentation),
    /// Nothing to chart.
    Placeholder {
        /// Hint displayed in place of the chart.
        message: String,
    },
}

/// Metric toggle offered by the control panel.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricToggle {
    /// Metric controlled by the toggle.
    pub metric: Metric,
    /// Whether the metric is charted.
    pub selected: bool,
    /// Legend color of the metric.
    pub color: Color,
}

/// State mirrored by the control panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlsPresentation {
    /// One-based day currently displayed.
    pub day: u8,
    /// Number of selectable days.
    pub day_count: u8,
    /// Whether auto-play runs.
    pub auto_play: bool,
    /// Active playback speed.
    pub speed: AnimationSpeed,
    /// Metric toggles in canonical order.
    pub metrics: Vec<MetricToggle>,
    /// Usage steps shown in the help section.
    pub instructions: Vec<String>,
    /// Paragraph describing the data.
    pub about: String,
    /// Attribution line.
    pub data_source: String,
}

/// Scene description combining every view of the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Header shown above the views.
    pub title: String,
    /// Sentence shown below the title.
    pub subtitle: String,
    /// Heading of the active view.
    pub heading: String,
    /// Active view.
    pub tab: ViewTab,
    /// Culture dish for the animation view.
    pub canvas: CanvasPresentation,
    /// Text for the cell properties view.
    pub properties: PropertiesPresentation,
    /// Content of the data visualization view.
    pub chart: ChartPresentation,
    /// Control panel state.
    pub controls: ControlsPresentation,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting cardiac culture scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Canvas dimensions must be positive and finite.
    InvalidCanvasSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvasSize { width, height } => {
                write!(
                    f,
                    "canvas size must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_bytes_survive_conversion() {
        let color = Color::from_rgba_u8(255, 200, 200, 180);

        assert_eq!(color.red, 1.0);
        assert_eq!(color.to_rgba_u8(), [255, 200, 200, 180]);
    }

    #[test]
    fn canvas_creation_rejects_degenerate_sizes() {
        let background = Color::from_rgb_u8(255, 255, 255);

        assert!(CanvasPresentation::new(800.0, 600.0, background, Vec::new()).is_ok());
        let error = CanvasPresentation::new(0.0, 600.0, background, Vec::new())
            .expect_err("zero width must be rejected");
        assert_eq!(
            error,
            RenderingError::InvalidCanvasSize {
                width: 0.0,
                height: 600.0
            }
        );
        assert!(CanvasPresentation::new(800.0, f32::NAN, background, Vec::new()).is_err());
    }

    #[test]
    fn canvas_fit_preserves_aspect_ratio() {
        let canvas = CanvasPresentation::new(800.0, 600.0, Color::from_rgb_u8(0, 0, 0), vec![])
            .expect("valid canvas");

        let fit = canvas.fit_within(Vec2::new(400.0, 400.0));

        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.offset, Vec2::new(0.0, 50.0));
        assert_eq!(fit.apply(Vec2::new(800.0, 600.0)), Vec2::new(400.0, 350.0));
    }

    #[test]
    fn polygon_points_lie_on_the_ellipse() {
        let ellipse = Ellipse::from_bounds(
            Vec2::new(10.0, 20.0),
            Vec2::new(40.0, 20.0),
            Color::from_rgb_u8(0, 0, 0),
        );

        assert_eq!(ellipse.center, Vec2::new(30.0, 30.0));
        let points = ellipse.polygon(16);
        assert_eq!(points.len(), 16);
        for point in points {
            let normalized = (point - ellipse.center) / ellipse.radii;
            assert!((normalized.length() - 1.0).abs() < 1e-4);
        }
        assert_eq!(ellipse.polygon(1).len(), 3);
    }

    #[test]
    fn metric_palette_is_distinct() {
        for (index, metric) in Metric::ALL.iter().enumerate() {
            for other in &Metric::ALL[index + 1..] {
                assert_ne!(metric_color(*metric), metric_color(*other));
            }
        }
    }

    #[test]
    fn default_input_is_idle() {
        let mut input = FrameInput::default();
        assert!(input.is_idle());

        input.toggle_metrics.push(Metric::CellCount);
        assert!(!input.is_idle());
    }
}
