#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure playback system that turns elapsed time into auto-play commands.
//!
//! While auto-play runs, every day shows [`PULSE_FRAMES_PER_DAY`] pulse frames
//! separated by the speed's frame delay. After the last frame the day stays on
//! screen for one more frame delay plus the day delay before the next day
//! starts.

use std::time::Duration;

use cardiac_culture_core::{Command, Event, PULSE_FRAMES_PER_DAY};
use cardiac_culture_world::query::PlaybackView;

// A stalled window must not replay more than one full day of frames at once.
const MAX_STEPS_PER_HANDLE: usize = PULSE_FRAMES_PER_DAY + 1;

/// Pure system that schedules pulse and day advances while auto-play runs.
#[derive(Debug, Default)]
pub struct Playback {
    accumulator: Duration,
}

impl Playback {
    /// Creates a playback system with an empty time accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time accumulated towards the next scheduled advance.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Consumes events and the playback view to emit advance commands.
    pub fn handle(&mut self, events: &[Event], view: PlaybackView, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                Event::DaySelected { manual: true, .. }
                | Event::AutoPlayChanged { .. }
                | Event::SpeedChanged { .. } => {
                    self.accumulator = Duration::ZERO;
                }
                _ => {}
            }
        }

        if !view.auto_play() {
            self.accumulator = Duration::ZERO;
            return;
        }

        let mut frame = view.pulse_frame().unwrap_or(0);
        let mut steps = 0;
        loop {
            let last_frame = frame + 1 >= PULSE_FRAMES_PER_DAY;
            let threshold = if last_frame {
                view.frame_delay().saturating_add(view.day_delay())
            } else {
                view.frame_delay()
            };
            if threshold.is_zero() || self.accumulator < threshold {
                break;
            }
            if steps == MAX_STEPS_PER_HANDLE {
                self.accumulator = Duration::ZERO;
                break;
            }

            self.accumulator -= threshold;
            steps += 1;
            if last_frame {
                out.push(Command::AdvanceDay);
                frame = 0;
            } else {
                out.push(Command::AdvancePulse);
                frame += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiac_culture_core::AnimationSpeed;
    use cardiac_culture_world::{self as world, query, World};

    fn playing_world(speed: u8) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetSpeed {
                speed: AnimationSpeed::new(speed).expect("valid speed"),
            },
            &mut events,
        );
        world::apply(&mut world, Command::SetAutoPlay { enabled: true }, &mut events);
        world
    }

    #[test]
    fn stopped_playback_discards_time() {
        let world = World::new();
        let mut playback = Playback::new();
        let mut commands = Vec::new();

        playback.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(5),
            }],
            query::playback_view(&world),
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(playback.pending(), Duration::ZERO);
    }

    #[test]
    fn emits_pulse_advance_after_frame_delay() {
        let world = playing_world(1);
        let mut playback = Playback::new();
        let mut commands = Vec::new();

        playback.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(99),
            }],
            query::playback_view(&world),
            &mut commands,
        );
        assert!(commands.is_empty());

        playback.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(2),
            }],
            query::playback_view(&world),
            &mut commands,
        );
        assert_eq!(commands, vec![Command::AdvancePulse]);
        assert_eq!(playback.pending(), Duration::from_millis(1));
    }

    #[test]
    fn manual_changes_reset_accumulator() {
        let world = playing_world(1);
        let mut playback = Playback::new();
        let mut commands = Vec::new();

        playback.handle(
            &[
                Event::TimeAdvanced {
                    dt: Duration::from_millis(80),
                },
                Event::SpeedChanged {
                    speed: AnimationSpeed::new(1).expect("valid speed"),
                },
            ],
            query::playback_view(&world),
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(playback.pending(), Duration::ZERO);
    }

    #[test]
    fn catch_up_is_bounded_to_one_day() {
        let world = playing_world(3);
        let mut playback = Playback::new();
        let mut commands = Vec::new();

        playback.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(60),
            }],
            query::playback_view(&world),
            &mut commands,
        );

        assert_eq!(commands.len(), MAX_STEPS_PER_HANDLE);
        assert_eq!(commands[PULSE_FRAMES_PER_DAY - 1], Command::AdvanceDay);
        assert_eq!(commands.last(), Some(&Command::AdvancePulse));
        assert_eq!(playback.pending(), Duration::ZERO);
    }
}
