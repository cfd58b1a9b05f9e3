//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use cardiac_culture_core::{AnimationSpeed, Metric, ViewTab};
use cardiac_culture_rendering::{ControlsPresentation, DayStep};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

use crate::wrap_text;

const HELP_LINE_CHARACTERS: usize = 38;

/// Interactions captured by the control panel during the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Day button pressed this frame.
    pub day_step: Option<DayStep>,
    /// Whether the auto-play button was pressed.
    pub toggle_auto_play: bool,
    /// Speed button pressed this frame.
    pub speed: Option<AnimationSpeed>,
    /// Tab button pressed this frame.
    pub tab: Option<ViewTab>,
    /// Metric toggles pressed this frame.
    pub toggle_metrics: Vec<Metric>,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext<'scene> {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Active view, highlighted among the tab buttons.
    pub tab: ViewTab,
    /// State mirrored by the widgets.
    pub controls: &'scene ControlsPresentation,
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext<'_>,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(8.0, 8.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let controls = context.controls;
    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, "Controls");
        ui.label(
            None,
            &format!("Select Day: {} of {}", controls.day, controls.day_count),
        );
        if ui.button(None, "Previous day") {
            result.day_step = Some(DayStep::Previous);
        }
        if ui.button(None, "Next day") {
            result.day_step = Some(DayStep::Next);
        }

        let auto_play_label = if controls.auto_play {
            "Auto-play: on"
        } else {
            "Auto-play: off"
        };
        if ui.button(None, auto_play_label) {
            result.toggle_auto_play = true;
        }

        ui.label(
            None,
            &format!("Animation Speed: {}", controls.speed.get()),
        );
        for speed in AnimationSpeed::ALL {
            let marker = selection_marker(speed == controls.speed);
            if ui.button(None, format!("{marker} Speed {}", speed.get()).as_str()) {
                result.speed = Some(speed);
            }
        }

        ui.label(None, "");
        ui.label(None, "View");
        for (index, tab) in ViewTab::ALL.into_iter().enumerate() {
            let marker = selection_marker(tab == context.tab);
            let label = format!("{marker} {} ({})", tab.label(), index + 1);
            if ui.button(None, label.as_str()) {
                result.tab = Some(tab);
            }
        }

        ui.label(None, "");
        ui.label(None, "Select metrics to display");
        for toggle in &controls.metrics {
            let marker = selection_marker(toggle.selected);
            let label = format!("{marker} {}", toggle.metric.label());
            if ui.button(None, label.as_str()) {
                result.toggle_metrics.push(toggle.metric);
            }
        }

        ui.label(None, "");
        ui.label(None, "Instructions");
        // The first entry introduces the numbered steps.
        for (index, step) in controls.instructions.iter().enumerate() {
            let numbered = match index {
                0 => step.clone(),
                _ => format!("{index}. {step}"),
            };
            for line in wrap_text(&numbered, HELP_LINE_CHARACTERS) {
                ui.label(None, &line);
            }
        }

        ui.label(None, "");
        ui.label(None, "About the data");
        for line in wrap_text(&controls.about, HELP_LINE_CHARACTERS) {
            ui.label(None, &line);
        }
        ui.label(None, "");
        ui.label(None, &controls.data_source);
    });

    ui.pop_skin();

    result
}

fn selection_marker(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}
