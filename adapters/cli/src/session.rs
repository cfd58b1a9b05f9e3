//! Interactive viewer session driving the world, playback and frame generation.

use std::time::Duration;

use anyhow::Result;
use cardiac_culture_core::{Command, Event, Metric, MetricSelection};
use cardiac_culture_rendering::{DayStep, FrameInput, Scene};
use cardiac_culture_system_bootstrap::Bootstrap;
use cardiac_culture_system_chart::MetricTable;
use cardiac_culture_system_frame_generation::{CultureFrame, FrameGenerator};
use cardiac_culture_system_playback::Playback;
use cardiac_culture_world::{self as world, query, World};

use crate::{config::ViewerSettings, presentation};

/// Owns the viewer state and regenerates frames whenever the displayed day or
/// pulse changes.
#[derive(Debug)]
pub(crate) struct ViewerSession {
    world: World,
    playback: Playback,
    generator: FrameGenerator,
    bootstrap: Bootstrap,
    table: MetricTable,
    ordinal: u64,
    frame: CultureFrame,
}

impl ViewerSession {
    /// Creates a session that starts from the provided settings.
    pub(crate) fn new(seed: u64, settings: &ViewerSettings) -> Self {
        let world = World::new();
        let generator = FrameGenerator::new(seed);
        let frame = generator.generate(query::day(&world), query::pulse(&world), 0);
        let mut session = Self {
            world,
            playback: Playback::new(),
            generator,
            bootstrap: Bootstrap,
            table: MetricTable::standard(),
            ordinal: 0,
            frame,
        };

        let _ = session.submit(Command::SelectDay {
            day: settings.start_day,
        });
        let _ = session.submit(Command::SetSpeed {
            speed: settings.speed,
        });
        for metric in differing_metrics(query::metrics(&session.world), settings.metrics) {
            let _ = session.submit(Command::ToggleMetric { metric });
        }
        // Selecting a day stops auto-play, so it is enabled last.
        let _ = session.submit(Command::SetAutoPlay {
            enabled: settings.auto_play,
        });
        session
    }

    /// Window title for the session.
    pub(crate) fn title(&self) -> &str {
        self.bootstrap.title(&self.world)
    }

    /// Applies one frame of user input followed by the elapsed time.
    ///
    /// Returns `true` when anything visible changed.
    pub(crate) fn handle_input(&mut self, dt: Duration, input: FrameInput) -> bool {
        let mut changed = false;

        if let Some(step) = input.day_step {
            let day = query::day(&self.world);
            let day = match step {
                DayStep::Previous => day.saturating_previous(),
                DayStep::Next => day.saturating_next(),
            };
            changed |= self.submit(Command::SelectDay { day });
        }
        if input.toggle_auto_play {
            let enabled = !query::auto_play(&self.world);
            changed |= self.submit(Command::SetAutoPlay { enabled });
        }
        if let Some(speed) = input.speed {
            changed |= self.submit(Command::SetSpeed { speed });
        }
        if let Some(tab) = input.tab {
            changed |= self.submit(Command::SelectTab { tab });
        }
        for metric in input.toggle_metrics {
            changed |= self.submit(Command::ToggleMetric { metric });
        }
        changed |= self.submit(Command::Tick { dt });
        changed
    }

    /// Builds the scene for the current state.
    pub(crate) fn scene(&self) -> Result<Scene> {
        presentation::scene(&self.world, &self.frame, &self.bootstrap, &self.table)
    }

    fn submit(&mut self, command: Command) -> bool {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let processed = self.process(events);

        if processed.iter().any(affects_frame) {
            self.regenerate_frame();
        }
        processed
            .iter()
            .any(|event| !matches!(event, Event::TimeAdvanced { .. }))
    }

    fn process(&mut self, pending: Vec<Event>) -> Vec<Event> {
        let mut processed = Vec::new();
        let mut events = pending;
        while !events.is_empty() {
            let mut commands = Vec::new();
            self.playback
                .handle(&events, query::playback_view(&self.world), &mut commands);
            processed.append(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
        processed
    }

    fn regenerate_frame(&mut self) {
        self.ordinal = self.ordinal.wrapping_add(1);
        self.frame = self.generator.generate(
            query::day(&self.world),
            query::pulse(&self.world),
            self.ordinal,
        );
    }
}

fn affects_frame(event: &Event) -> bool {
    matches!(
        event,
        Event::DaySelected { .. } | Event::PulseAdvanced { .. } | Event::AutoPlayChanged { .. }
    )
}

fn differing_metrics(
    current: MetricSelection,
    wanted: MetricSelection,
) -> impl Iterator<Item = Metric> {
    Metric::ALL
        .into_iter()
        .filter(move |metric| current.contains(*metric) != wanted.contains(*metric))
}
