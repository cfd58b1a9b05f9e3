#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that opens the cardiac culture viewer or exports its
//! frames and charts without a window.

mod config;
mod presentation;
mod session;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use cardiac_culture_core::{
    day_record, AnimationSpeed, DayNumber, Metric, MetricSelection, Pulse, PULSE_FRAMES_PER_DAY,
};
use cardiac_culture_export::{
    ensure_directory, frame_file_name, write_canvas_png, write_chart_svg, write_json,
};
use cardiac_culture_rendering::{Presentation, RenderingBackend};
use cardiac_culture_rendering_macroquad::MacroquadBackend;
use cardiac_culture_system_bootstrap::PropertySheet;
use cardiac_culture_system_chart::{LongFormRow, MetricRow, MetricTable, NOTHING_SELECTED_MESSAGE};
use cardiac_culture_system_frame_generation::FrameGenerator;
use clap::{Args, Parser, Subcommand};
use config::{ViewerConfig, ViewerSettings};
use env_logger::Env;
use serde::Serialize;
use session::ViewerSession;

#[derive(Debug, Parser)]
#[command(
    name = "cardiac-culture",
    version,
    about = "Animated viewer for eight days of cardiac cell culture development"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Opens the interactive viewer window (default).
    View(ViewArgs),
    /// Prints the morphology and functionality recorded for one day.
    Describe {
        /// Day to describe, 1 to 8.
        #[arg(long, value_parser = parse_day)]
        day: DayNumber,
    },
    /// Prints the quantitative metrics for every day.
    Metrics {
        /// Metric column to include; repeat for several.
        #[arg(long = "metric", value_name = "NAME")]
        metrics: Vec<Metric>,
    },
    /// Writes culture frames and the metric chart to a directory.
    Export(ExportArgs),
}

#[derive(Debug, Default, Args)]
struct ViewArgs {
    /// Day shown when the window opens.
    #[arg(long, value_parser = parse_day)]
    day: Option<DayNumber>,
    /// Whether auto-play starts immediately; a bare flag means `true`.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    auto_play: Option<bool>,
    /// Playback speed, 1 to 3.
    #[arg(long, value_parser = parse_speed)]
    speed: Option<AnimationSpeed>,
    /// Seed for the cell layout.
    #[arg(long)]
    seed: Option<u64>,
    /// Whether presentation waits for the display refresh.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Logs frame timings once per second.
    #[arg(long)]
    show_fps: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Output directory, created when missing.
    #[arg(long, value_name = "DIR")]
    out: PathBuf,
    /// Restricts frame export to one day.
    #[arg(long, value_parser = parse_day)]
    day: Option<DayNumber>,
    /// Pulse frames written per day.
    #[arg(long, default_value_t = PULSE_FRAMES_PER_DAY)]
    frames: usize,
    /// Seed for the cell layout.
    #[arg(long)]
    seed: Option<u64>,
    /// Metric charted in the exported chart; repeat for several.
    #[arg(long = "metric", value_name = "NAME")]
    metrics: Vec<Metric>,
}

#[derive(Debug, Serialize)]
struct MetricsDocument<'table> {
    rows: &'table [MetricRow],
    selected: Vec<LongFormRow>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let settings = config.validate()?;

    match cli
        .command
        .unwrap_or_else(|| CliCommand::View(ViewArgs::default()))
    {
        CliCommand::View(args) => run_view(settings, args),
        CliCommand::Describe { day } => {
            println!("{}", PropertySheet::from_record(day_record(day)).to_text());
            Ok(())
        }
        CliCommand::Metrics { metrics } => {
            print_metrics(selection_or(metrics, settings.metrics));
            Ok(())
        }
        CliCommand::Export(args) => run_export(settings, args),
    }
}

fn run_view(settings: ViewerSettings, args: ViewArgs) -> Result<()> {
    let settings = override_settings(settings, &args);
    let seed = resolve_seed(args.seed.or(settings.seed));
    let mut session = ViewerSession::new(seed, &settings);
    let scene = session.scene()?;
    let initial = Presentation::new(session.title(), presentation::CLEAR_COLOR, scene);

    MacroquadBackend::new()
        .with_vsync(settings.window.vsync)
        .with_show_fps(settings.window.show_fps)
        .with_window_size(settings.window.width, settings.window.height)
        .run(initial, move |dt, input, scene| {
            if !session.handle_input(dt, input) {
                return;
            }
            match session.scene() {
                Ok(next) => *scene = next,
                Err(error) => log::error!("failed to rebuild scene: {error:#}"),
            }
        })
}

/// Replaces configured values with the flags given on the command line.
fn override_settings(mut settings: ViewerSettings, args: &ViewArgs) -> ViewerSettings {
    if let Some(day) = args.day {
        settings.start_day = day;
    }
    if let Some(speed) = args.speed {
        settings.speed = speed;
    }
    if let Some(auto_play) = args.auto_play {
        settings.auto_play = auto_play;
    }
    if let Some(vsync) = args.vsync {
        settings.window.vsync = vsync;
    }
    settings.window.show_fps |= args.show_fps;
    settings
}

fn print_metrics(selection: MetricSelection) {
    if selection.is_empty() {
        println!("{NOTHING_SELECTED_MESSAGE}");
        return;
    }
    let table = presentation::metric_table(&MetricTable::standard(), &selection);
    println!("{}", presentation::table_text(&table));
}

fn run_export(settings: ViewerSettings, args: ExportArgs) -> Result<()> {
    ensure!(args.frames > 0, "--frames must be at least 1");
    ensure_directory(&args.out)?;

    let seed = resolve_seed(args.seed.or(settings.seed));
    let generator = FrameGenerator::new(seed);
    let days: Vec<DayNumber> = match args.day {
        Some(day) => vec![day],
        None => DayNumber::all().collect(),
    };

    for day in &days {
        for ordinal in 0..args.frames {
            let pulse = Pulse::frame(ordinal, args.frames);
            let frame = generator.generate(*day, pulse, ordinal as u64);
            let canvas = presentation::canvas(&frame)?;
            let path = args.out.join(frame_file_name(day.get(), ordinal));
            write_canvas_png(&canvas, &path)
                .with_context(|| format!("failed to export day {day} frame {ordinal}"))?;
        }
    }

    let table = MetricTable::standard();
    let selection = selection_or(args.metrics, settings.metrics);
    write_chart_svg(
        &presentation::chart(&table, &selection),
        &args.out.join("metrics.svg"),
    )?;
    write_json(
        &MetricsDocument {
            rows: table.rows(),
            selected: table.long_form(&selection),
        },
        &args.out.join("metrics.json"),
    )?;

    log::info!(
        "exported {} frames for {} day(s) to {}",
        args.frames * days.len(),
        days.len(),
        args.out.display()
    );
    Ok(())
}

fn selection_or(metrics: Vec<Metric>, fallback: MetricSelection) -> MetricSelection {
    if metrics.is_empty() {
        fallback
    } else {
        metrics.into_iter().collect()
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("frame seed {seed}");
    seed
}

fn parse_day(text: &str) -> Result<DayNumber, String> {
    let value: u8 = text.parse().map_err(|_| format!("`{text}` is not a day number"))?;
    DayNumber::new(value).map_err(|error| error.to_string())
}

fn parse_speed(text: &str) -> Result<AnimationSpeed, String> {
    let value: u8 = text.parse().map_err(|_| format!("`{text}` is not a speed"))?;
    AnimationSpeed::new(value).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_subcommand_opens_the_viewer() {
        let cli = Cli::try_parse_from(["cardiac-culture"]).expect("parses");

        assert!(cli.command.is_none());
    }

    #[test]
    fn view_flags_are_parsed_into_domain_types() {
        let cli = Cli::try_parse_from([
            "cardiac-culture",
            "view",
            "--day",
            "4",
            "--speed",
            "3",
            "--auto-play",
            "--vsync",
            "false",
        ])
        .expect("parses");

        let Some(CliCommand::View(args)) = cli.command else {
            panic!("expected the view command");
        };
        assert_eq!(args.day.map(DayNumber::get), Some(4));
        assert_eq!(args.speed.map(AnimationSpeed::get), Some(3));
        assert_eq!(args.auto_play, Some(true));
        assert_eq!(args.vsync, Some(false));
    }

    #[test]
    fn view_flags_override_the_configuration_both_ways() {
        let configured = ViewerConfig {
            start_day: 5,
            auto_play: true,
            ..ViewerConfig::default()
        }
        .validate()
        .expect("valid config");

        let cli = Cli::try_parse_from(["cardiac-culture", "view", "--auto-play", "false"])
            .expect("parses");
        let Some(CliCommand::View(args)) = cli.command else {
            panic!("expected the view command");
        };
        let settings = override_settings(configured.clone(), &args);
        assert!(!settings.auto_play);
        assert_eq!(settings.start_day.get(), 5);

        let untouched = override_settings(configured.clone(), &ViewArgs::default());
        assert_eq!(untouched, configured);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Cli::try_parse_from(["cardiac-culture", "describe", "--day", "9"]).is_err());
        assert!(Cli::try_parse_from(["cardiac-culture", "view", "--speed", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["cardiac-culture", "metrics", "--metric", "heart-rate"]).is_err()
        );
    }

    #[test]
    fn metric_flags_fall_back_to_the_configured_selection() {
        let fallback = MetricSelection::default();

        assert_eq!(selection_or(Vec::new(), fallback), fallback);
        let chosen = selection_or(vec![Metric::DebrisLevel], fallback);
        assert_eq!(chosen.iter().collect::<Vec<_>>(), vec![Metric::DebrisLevel]);
    }
}
