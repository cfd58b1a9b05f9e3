#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative viewer state for the cardiac culture viewer.
//!
//! The world owns the only mutable state of the application: which day is
//! displayed, whether auto-play runs, the playback speed, the active view and
//! the chart selection. Everything else is derived from the immutable day
//! table in `cardiac_culture_core`.

use cardiac_culture_core::{
    AnimationSpeed, Command, DayNumber, Event, MetricSelection, Pulse, ViewTab,
    APPLICATION_TITLE, PULSE_FRAMES_PER_DAY,
};

/// Selection and playback state of the viewer.
#[derive(Clone, Debug)]
pub struct World {
    title: &'static str,
    day: DayNumber,
    auto_play: bool,
    speed: AnimationSpeed,
    tab: ViewTab,
    metrics: MetricSelection,
    pulse_frame: Option<usize>,
}

impl World {
    /// Creates a viewer showing the first day with auto-play stopped.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: APPLICATION_TITLE,
            day: DayNumber::FIRST,
            auto_play: false,
            speed: AnimationSpeed::default(),
            tab: ViewTab::default(),
            metrics: MetricSelection::default(),
            pulse_frame: None,
        }
    }

    fn restart_pulse_sequence(&mut self) {
        self.pulse_frame = if self.auto_play { Some(0) } else { None };
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that leave the state unchanged emit no events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SelectDay { day } => {
            if world.day == day {
                return;
            }

            world.day = day;
            out_events.push(Event::DaySelected { day, manual: true });

            if world.auto_play {
                world.auto_play = false;
                world.restart_pulse_sequence();
                out_events.push(Event::AutoPlayChanged { enabled: false });
            }
        }
        Command::SetAutoPlay { enabled } => {
            if world.auto_play == enabled {
                return;
            }

            world.auto_play = enabled;
            world.restart_pulse_sequence();
            out_events.push(Event::AutoPlayChanged { enabled });
        }
        Command::SetSpeed { speed } => {
            if world.speed == speed {
                return;
            }

            world.speed = speed;
            out_events.push(Event::SpeedChanged { speed });
        }
        Command::AdvancePulse => {
            let Some(frame) = world.pulse_frame else {
                return;
            };
            let next = frame + 1;
            if next >= PULSE_FRAMES_PER_DAY {
                return;
            }

            world.pulse_frame = Some(next);
            out_events.push(Event::PulseAdvanced {
                frame: next,
                pulse: Pulse::frame(next, PULSE_FRAMES_PER_DAY),
            });
        }
        Command::AdvanceDay => {
            if !world.auto_play {
                return;
            }

            world.day = world.day.next_wrapping();
            world.restart_pulse_sequence();
            out_events.push(Event::DaySelected {
                day: world.day,
                manual: false,
            });
        }
        Command::SelectTab { tab } => {
            if world.tab == tab {
                return;
            }

            world.tab = tab;
            out_events.push(Event::TabSelected { tab });
        }
        Command::ToggleMetric { metric } => {
            let _ = world.metrics.toggle(metric);
            out_events.push(Event::MetricsChanged {
                selection: world.metrics,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use cardiac_culture_core::{
        day_record, AnimationSpeed, DayNumber, DayRecord, MetricSelection, Pulse, ViewTab,
        PULSE_FRAMES_PER_DAY,
    };

    /// Retrieves the application title that adapters may display.
    #[must_use]
    pub fn title(world: &World) -> &'static str {
        world.title
    }

    /// Day currently displayed.
    #[must_use]
    pub fn day(world: &World) -> DayNumber {
        world.day
    }

    /// Record describing the displayed day.
    #[must_use]
    pub fn record(world: &World) -> &'static DayRecord {
        day_record(world.day)
    }

    /// Whether auto-play is running.
    #[must_use]
    pub fn auto_play(world: &World) -> bool {
        world.auto_play
    }

    /// Active playback speed.
    #[must_use]
    pub fn speed(world: &World) -> AnimationSpeed {
        world.speed
    }

    /// Active view.
    #[must_use]
    pub fn tab(world: &World) -> ViewTab {
        world.tab
    }

    /// Metrics selected for charting.
    #[must_use]
    pub fn metrics(world: &World) -> MetricSelection {
        world.metrics
    }

    /// Phase used to draw the current frame.
    ///
    /// While auto-play is stopped the still frame uses [`Pulse::STATIC`].
    #[must_use]
    pub fn pulse(world: &World) -> Pulse {
        match world.pulse_frame {
            Some(frame) => Pulse::frame(frame, PULSE_FRAMES_PER_DAY),
            None => Pulse::STATIC,
        }
    }

    /// Captures the playback-related state consumed by timing systems.
    #[must_use]
    pub fn playback_view(world: &World) -> PlaybackView {
        PlaybackView {
            auto_play: world.auto_play,
            pulse_frame: world.pulse_frame,
            frame_delay: world.speed.frame_delay(),
            day_delay: world.speed.day_delay(),
        }
    }

    /// Read-only snapshot of the playback state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlaybackView {
        auto_play: bool,
        pulse_frame: Option<usize>,
        frame_delay: Duration,
        day_delay: Duration,
    }

    impl PlaybackView {
        /// Whether auto-play is running.
        #[must_use]
        pub const fn auto_play(&self) -> bool {
            self.auto_play
        }

        /// Zero-based pulse frame shown while auto-play runs.
        #[must_use]
        pub const fn pulse_frame(&self) -> Option<usize> {
            self.pulse_frame
        }

        /// Whether the last pulse frame of the day is displayed.
        #[must_use]
        pub const fn sequence_complete(&self) -> bool {
            match self.pulse_frame {
                Some(frame) => frame + 1 >= PULSE_FRAMES_PER_DAY,
                None => false,
            }
        }

        /// Pause between two pulse frames.
        #[must_use]
        pub const fn frame_delay(&self) -> Duration {
            self.frame_delay
        }

        /// Pause between the last pulse frame and the next day.
        #[must_use]
        pub const fn day_delay(&self) -> Duration {
            self.day_delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiac_culture_core::Metric;

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn day(value: u8) -> DayNumber {
        DayNumber::new(value).expect("valid day")
    }

    #[test]
    fn new_world_shows_static_first_day() {
        let world = World::new();

        assert_eq!(query::day(&world), DayNumber::FIRST);
        assert!(!query::auto_play(&world));
        assert_eq!(query::pulse(&world), Pulse::STATIC);
        assert_eq!(query::tab(&world), ViewTab::Animation);
        assert_eq!(query::metrics(&world), MetricSelection::default());
        assert_eq!(query::title(&world), APPLICATION_TITLE);
    }

    #[test]
    fn selecting_current_day_is_silent() {
        let mut world = World::new();

        assert!(run(&mut world, Command::SelectDay { day: DayNumber::FIRST }).is_empty());
    }

    #[test]
    fn manual_day_change_stops_auto_play() {
        let mut world = World::new();
        let _ = run(&mut world, Command::SetAutoPlay { enabled: true });

        let events = run(&mut world, Command::SelectDay { day: day(5) });

        assert_eq!(
            events,
            vec![
                Event::DaySelected {
                    day: day(5),
                    manual: true
                },
                Event::AutoPlayChanged { enabled: false },
            ]
        );
        assert!(!query::auto_play(&world));
        assert_eq!(query::pulse(&world), Pulse::STATIC);
    }

    #[test]
    fn enabling_auto_play_restarts_pulse_sequence() {
        let mut world = World::new();

        let events = run(&mut world, Command::SetAutoPlay { enabled: true });

        assert_eq!(events, vec![Event::AutoPlayChanged { enabled: true }]);
        assert_eq!(query::pulse(&world), Pulse::RELAXED);
        assert_eq!(query::playback_view(&world).pulse_frame(), Some(0));
    }

    #[test]
    fn pulse_advances_stop_at_last_frame() {
        let mut world = World::new();
        let _ = run(&mut world, Command::SetAutoPlay { enabled: true });

        for _ in 1..PULSE_FRAMES_PER_DAY {
            assert_eq!(run(&mut world, Command::AdvancePulse).len(), 1);
        }

        assert!(query::playback_view(&world).sequence_complete());
        assert!(run(&mut world, Command::AdvancePulse).is_empty());
        assert_eq!(query::pulse(&world).get(), 1.0);
    }

    #[test]
    fn advance_commands_require_auto_play() {
        let mut world = World::new();

        assert!(run(&mut world, Command::AdvancePulse).is_empty());
        assert!(run(&mut world, Command::AdvanceDay).is_empty());
        assert_eq!(query::day(&world), DayNumber::FIRST);
    }

    #[test]
    fn advance_day_wraps_after_last_day() {
        let mut world = World::new();
        let _ = run(&mut world, Command::SelectDay { day: DayNumber::LAST });
        let _ = run(&mut world, Command::SetAutoPlay { enabled: true });

        let events = run(&mut world, Command::AdvanceDay);

        assert_eq!(
            events,
            vec![Event::DaySelected {
                day: DayNumber::FIRST,
                manual: false
            }]
        );
        assert!(query::auto_play(&world));
        assert_eq!(query::playback_view(&world).pulse_frame(), Some(0));
    }

    #[test]
    fn toggling_metric_reports_new_selection() {
        let mut world = World::new();

        let events = run(
            &mut world,
            Command::ToggleMetric {
                metric: Metric::CellCount,
            },
        );

        let expected: MetricSelection = [Metric::BeatStrength, Metric::Synchronization]
            .into_iter()
            .collect();
        assert_eq!(
            events,
            vec![Event::MetricsChanged {
                selection: expected
            }]
        );
        assert_eq!(query::metrics(&world), expected);
    }

    #[test]
    fn speed_and_tab_changes_are_reported_once() {
        let mut world = World::new();
        let fast = AnimationSpeed::new(3).expect("valid speed");

        assert_eq!(
            run(&mut world, Command::SetSpeed { speed: fast }),
            vec![Event::SpeedChanged { speed: fast }]
        );
        assert!(run(&mut world, Command::SetSpeed { speed: fast }).is_empty());
        assert_eq!(
            run(
                &mut world,
                Command::SelectTab {
                    tab: ViewTab::DataVisualization
                }
            ),
            vec![Event::TabSelected {
                tab: ViewTab::DataVisualization
            }]
        );
    }
}
