#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the cardiac culture viewer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter uses Macroquad's immediate-mode UI module so the control panel
//! can host widgets. All UI-specific calls live inside the local `ui` module to
//! avoid leaking Macroquad UI types throughout the renderer.

mod chart;
mod ui;

use self::chart::draw_chart;
use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use cardiac_culture_core::{AnimationSpeed, Metric, ViewTab};
use cardiac_culture_rendering::{
    CanvasPresentation, DayStep, FrameInput, Presentation, PropertiesPresentation,
    RenderingBackend, Scene,
};
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, DARKGRAY},
    input::{is_key_pressed, KeyCode},
    shapes::{draw_rectangle, draw_triangle},
    text::draw_text,
};
use std::time::{Duration, Instant};

const PANEL_WIDTH: f32 = 300.0;
const HEADER_HEIGHT: f32 = 104.0;
const CONTENT_MARGIN: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 20.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    day_step_latched: Option<DayStep>,
    auto_play_toggle_latched: bool,
    speed_latched: Option<AnimationSpeed>,
    tab_latched: Option<ViewTab>,
    metric_toggles_latched: Vec<Metric>,
}

impl ControlPanelInputState {
    /// Returns the latched day change, clearing it so the action fires once.
    pub fn take_day_step(&mut self) -> Option<DayStep> {
        self.day_step_latched.take()
    }

    /// Records that a day button was pressed this frame.
    pub fn register_day_step(&mut self, step: DayStep) {
        self.day_step_latched = Some(step);
    }

    /// Returns whether the UI requested an auto-play toggle and clears the latch.
    pub fn take_auto_play_toggle(&mut self) -> bool {
        let latched = self.auto_play_toggle_latched;
        self.auto_play_toggle_latched = false;
        latched
    }

    /// Records that the auto-play button was pressed this frame.
    pub fn register_auto_play_toggle(&mut self) {
        self.auto_play_toggle_latched = true;
    }

    /// Returns the latched speed request, clearing it so the action fires once.
    pub fn take_speed(&mut self) -> Option<AnimationSpeed> {
        self.speed_latched.take()
    }

    /// Records that a speed button was pressed this frame.
    pub fn register_speed(&mut self, speed: AnimationSpeed) {
        self.speed_latched = Some(speed);
    }

    /// Returns the latched tab request, clearing it so the action fires once.
    pub fn take_tab(&mut self) -> Option<ViewTab> {
        self.tab_latched.take()
    }

    /// Records that a tab button was pressed this frame.
    pub fn register_tab(&mut self, tab: ViewTab) {
        self.tab_latched = Some(tab);
    }

    /// Returns the latched metric toggles in press order and clears them.
    pub fn take_metric_toggles(&mut self) -> Vec<Metric> {
        std::mem::take(&mut self.metric_toggles_latched)
    }

    /// Records that a metric toggle was pressed this frame.
    pub fn register_metric_toggle(&mut self, metric: Metric) {
        self.metric_toggles_latched.push(metric);
    }

    fn register_ui_result(&mut self, result: ControlPanelUiResult) {
        if let Some(step) = result.day_step {
            self.register_day_step(step);
        }
        if result.toggle_auto_play {
            self.register_auto_play_toggle();
        }
        if let Some(speed) = result.speed {
            self.register_speed(speed);
        }
        if let Some(tab) = result.tab {
            self.register_tab(tab);
        }
        for metric in result.toggle_metrics {
            self.register_metric_toggle(metric);
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the viewer.
    quit_requested: bool,
    /// `Left` and `Right` step through the days.
    day_step: Option<DayStep>,
    /// `Space` toggles auto-play.
    toggle_auto_play: bool,
    /// `1`, `2` and `3` pick a tab.
    tab: Option<ViewTab>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let day_step = if is_key_pressed(KeyCode::Left) {
            Some(DayStep::Previous)
        } else if is_key_pressed(KeyCode::Right) {
            Some(DayStep::Next)
        } else {
            None
        };
        let toggle_auto_play = is_key_pressed(KeyCode::Space);
        let tab = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3]
            .into_iter()
            .zip(ViewTab::ALL)
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, tab)| tab);

        Self {
            quit_requested,
            day_step,
            toggle_auto_play,
            tab,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_width: i32,
    window_height: i32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_width: 1280,
            window_height: 860,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures the initial window size in logical pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = i32::try_from(width).unwrap_or(i32::MAX);
        self.window_height = i32::try_from(height).unwrap_or(i32::MAX);
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns averages once one second has elapsed.
    fn record_frame(
        &mut self,
        frame: Duration,
        update: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += update;
        self.render_accum += render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_width,
            window_height,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let frame_input = gather_frame_input(&mut control_panel_input, keyboard);
                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let layout = ViewLayout::from_screen(screen_width, screen_height);
                let render_start = Instant::now();
                draw_header(&scene, layout.header);
                match scene.tab {
                    ViewTab::Animation => {
                        draw_canvas(&scene.canvas, layout.content);
                        mask_outside_canvas(&scene.canvas, layout.content, background);
                    }
                    ViewTab::CellProperties => draw_properties(&scene.properties, layout.content),
                    ViewTab::DataVisualization => draw_chart(&scene.chart, layout.content),
                }

                let panel_background = macroquad::color::Color::from_rgba(32, 36, 44, 255);
                draw_rectangle(
                    layout.panel.origin.x,
                    layout.panel.origin.y,
                    layout.panel.size.x,
                    layout.panel.size.y,
                    panel_background,
                );
                let mut control_panel_ui = macroquad::ui::root_ui();
                let result = draw_control_panel_ui(
                    &mut control_panel_ui,
                    ControlPanelUiContext {
                        origin: to_macroquad_vec(layout.panel.origin),
                        size: to_macroquad_vec(layout.panel.size),
                        background: panel_background,
                        tab: scene.tab,
                        controls: &scene.controls,
                    },
                );
                control_panel_input.register_ui_result(result);
                let render_duration = render_start.elapsed();

                if let Some(FpsMetrics {
                    per_second,
                    avg_update,
                    avg_render,
                }) = fps_counter.record_frame(frame_dt, update_duration, render_duration)
                {
                    if show_fps {
                        log::info!(
                            "FPS: {:.2} | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Region {
    pub(crate) origin: Vec2,
    pub(crate) size: Vec2,
}

impl Region {
    pub(crate) fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size: size.max(Vec2::ZERO),
        }
    }

    pub(crate) fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub(crate) fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }
}

/// Screen split between the header, the active view and the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ViewLayout {
    header: Region,
    content: Region,
    panel: Region,
}

impl ViewLayout {
    fn from_screen(screen_width: f32, screen_height: f32) -> Self {
        let panel_width = PANEL_WIDTH.min(screen_width);
        let view_width = (screen_width - panel_width).max(0.0);
        let header_height = HEADER_HEIGHT.min(screen_height);

        Self {
            header: Region::new(Vec2::ZERO, Vec2::new(view_width, header_height)),
            content: Region::new(
                Vec2::new(CONTENT_MARGIN, header_height),
                Vec2::new(
                    view_width - 2.0 * CONTENT_MARGIN,
                    screen_height - header_height - CONTENT_MARGIN,
                ),
            ),
            panel: Region::new(
                Vec2::new(view_width, 0.0),
                Vec2::new(panel_width, screen_height),
            ),
        }
    }
}

fn draw_header(scene: &Scene, area: Region) {
    let x = area.origin.x + CONTENT_MARGIN;
    draw_label(&scene.title, x, area.origin.y + 34.0, 30.0, BLACK);
    draw_label(&scene.subtitle, x, area.origin.y + 60.0, 18.0, DARKGRAY);
    draw_label(&scene.heading, x, area.origin.y + 92.0, 24.0, BLACK);
}

fn draw_canvas(canvas: &CanvasPresentation, area: Region) {
    let fit = canvas.fit_within(area.size);
    let origin = area.origin + fit.offset;
    draw_rectangle(
        origin.x,
        origin.y,
        canvas.width * fit.scale,
        canvas.height * fit.scale,
        to_macroquad_color(canvas.background),
    );

    for ellipse in &canvas.ellipses {
        let color = to_macroquad_color(ellipse.color);
        let center = to_macroquad_vec(area.origin + fit.apply(ellipse.center));
        let outline: Vec<MacroquadVec2> = ellipse
            .polygon(ellipse.segments_for_scale(fit.scale))
            .into_iter()
            .map(|point| to_macroquad_vec(area.origin + fit.apply(point)))
            .collect();
        for (index, point) in outline.iter().enumerate() {
            let next = outline[(index + 1) % outline.len()];
            draw_triangle(center, *point, next, color);
        }
    }
}

/// Paints the clear color over ellipse parts that spill beyond the dish.
fn mask_outside_canvas(
    canvas: &CanvasPresentation,
    area: Region,
    background: macroquad::color::Color,
) {
    let fit = canvas.fit_within(area.size);
    let dish = Region::new(
        area.origin + fit.offset,
        Vec2::new(canvas.width, canvas.height) * fit.scale,
    );
    let bleed = 64.0 * fit.scale.max(1.0);

    draw_rectangle(
        dish.right(),
        dish.origin.y - bleed,
        bleed,
        dish.size.y + 2.0 * bleed,
        background,
    );
    draw_rectangle(
        dish.origin.x - bleed,
        dish.bottom(),
        dish.size.x + 2.0 * bleed,
        bleed,
        background,
    );
}

fn draw_properties(properties: &PropertiesPresentation, area: Region) {
    let columns = properties.groups.len().max(1);
    let column_width = area.size.x / columns as f32;
    let max_characters = ((column_width - CONTENT_MARGIN) / (BODY_FONT_SIZE * 0.5)) as usize;

    for (index, group) in properties.groups.iter().enumerate() {
        let x = area.origin.x + column_width * index as f32;
        let mut y = area.origin.y + 32.0;
        draw_label(&group.title, x, y, 26.0, BLACK);
        y += 36.0;

        for line in &group.lines {
            draw_label(&format!("{}:", line.label), x, y, BODY_FONT_SIZE, BLACK);
            y += BODY_FONT_SIZE + 4.0;
            for wrapped in wrap_text(&line.text, max_characters) {
                draw_label(&wrapped, x + 12.0, y, BODY_FONT_SIZE, DARKGRAY);
                y += BODY_FONT_SIZE + 2.0;
            }
            y += 10.0;
        }
    }
}

/// Breaks `text` into lines of at most `width` characters at word boundaries.
///
/// Words longer than `width` occupy a line of their own.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn gather_frame_input(
    control_panel_input: &mut ControlPanelInputState,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    FrameInput {
        day_step: control_panel_input.take_day_step().or(keyboard.day_step),
        toggle_auto_play: control_panel_input.take_auto_play_toggle() || keyboard.toggle_auto_play,
        speed: control_panel_input.take_speed(),
        tab: control_panel_input.take_tab().or(keyboard.tab),
        toggle_metrics: control_panel_input.take_metric_toggles(),
    }
}

pub(crate) fn draw_label(
    text: &str,
    x: f32,
    y: f32,
    font_size: f32,
    color: macroquad::color::Color,
) {
    let _ = draw_text(text, x, y, font_size, color);
}

fn to_macroquad_vec(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}

pub(crate) fn to_macroquad_color(
    color: cardiac_culture_rendering::Color,
) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
