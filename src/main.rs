//! u-mentor CLI.
//!
//! Matches mentors to teams for a schedule and imports mentor calendars.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use u_mentor::calendar::{free_from_busy, parse_ics};
use u_mentor::config::ScheduleDir;
use u_mentor::geo::{resolve_distances, CachedGeocoder};
use u_mentor::matching::{Classifier, DEFAULT_MAX_SPEED_KMH};
use u_mentor::models::{parse_time_of_day, Interval, Weekday};
use u_mentor::report::{render, ReportFormat};
use u_mentor::validation::check_roster;

#[derive(Parser)]
#[command(name = "u-mentor", version)]
#[command(about = "Match volunteer mentors to teams by weekly availability")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding one sub-directory per schedule
    #[arg(long, global = true, default_value = "schedules")]
    schedules_dir: PathBuf,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify mentors for every team in a schedule.
    Match {
        /// Schedule name (directory under --schedules-dir)
        schedule: String,
        /// Reference postcode; enables distances and the speed check
        postcode: Option<String>,
        /// Close-call tolerance in minutes (overrides settings.json)
        #[arg(long)]
        tolerance: Option<u16>,
        /// Speed limit in km/h for the journey check (overrides settings.json)
        #[arg(long)]
        max_speed: Option<f64>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import busy times from an iCalendar file into a mentor's entry.
    ImportCalendar {
        /// Calendar export (.ics)
        ics: PathBuf,
        /// Mentor name in mentors.json
        mentor: String,
        /// Schedule name (directory under --schedules-dir)
        schedule: String,
        /// Earliest time the mentor is ever available
        #[arg(long, default_value = "08:00")]
        day_start: String,
        /// Latest time the mentor is ever available
        #[arg(long, default_value = "21:00")]
        day_end: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match {
            schedule,
            postcode,
            tolerance,
            max_speed,
            format,
            output,
        } => {
            let dir = ScheduleDir::new(&cli.schedules_dir, &schedule);
            let loaded = dir
                .load()
                .with_context(|| format!("loading schedule '{schedule}'"))?;

            for diagnostic in check_roster(&loaded.teams, &loaded.mentors) {
                warn!("{diagnostic}");
            }

            let mut config = loaded.settings.clone();
            if let Some(t) = tolerance {
                config.close_call_tolerance = t;
            }
            if let Some(s) = max_speed {
                config.max_speed_kmh = Some(s);
            }

            let mut distances = Default::default();
            if let Some(reference) = &postcode {
                config.max_speed_kmh.get_or_insert(DEFAULT_MAX_SPEED_KMH);
                let mut geocoder = CachedGeocoder::new(
                    dir.load_locations().context("loading locations")?,
                    dir.load_geocache().context("loading geocoding cache")?,
                );
                let (found, diagnostics) = resolve_distances(&loaded.teams, reference, &mut geocoder);
                for diagnostic in diagnostics {
                    warn!("{diagnostic}");
                }
                distances = found;
            }

            let classifier = Classifier::new(config).with_distances(distances);
            info!(
                schedule = %schedule,
                teams = loaded.teams.len(),
                mentors = loaded.mentors.len(),
                tolerance = classifier.config().close_call_tolerance,
                max_speed_kmh = ?classifier.config().max_speed_kmh,
                "classifying"
            );
            let matches = classifier.classify(&loaded.teams, &loaded.mentors);
            let unmatched = matches.iter().filter(|m| m.suitable.is_empty()).count();
            info!(teams = matches.len(), without_suitable = unmatched, "classified");

            let report = render(format, &matches, &loaded.mentors)?;
            write_report(output.as_deref(), &report)?;
        }

        Commands::ImportCalendar {
            ics,
            mentor,
            schedule,
            day_start,
            day_end,
        } => {
            let span = day_span(&day_start, &day_end)?;
            let text = std::fs::read_to_string(&ics)
                .with_context(|| format!("reading {}", ics.display()))?;
            let imported =
                parse_ics(&text).with_context(|| format!("parsing {}", ics.display()))?;
            for diagnostic in &imported.diagnostics {
                warn!("skipped calendar event {diagnostic}");
            }

            let free = free_from_busy(&imported.busy, span, &Weekday::ALL);

            let dir = ScheduleDir::new(&cli.schedules_dir, &schedule);
            let mut entries = dir
                .read_mentor_entries()
                .with_context(|| format!("loading mentors of '{schedule}'"))?;
            if !entries.contains_key(&mentor) {
                info!(mentor = %mentor, "adding new mentor");
            }
            let entry = entries.entry(mentor.clone()).or_default();
            entry.busy_times = imported.busy.iter().map(ToString::to_string).collect();
            entry.free_times = free.iter().map(ToString::to_string).collect();
            dir.write_mentor_entries(&entries)
                .with_context(|| format!("saving mentors of '{schedule}'"))?;

            info!(
                mentor = %mentor,
                busy = imported.busy.len(),
                free = free.len(),
                "calendar imported"
            );
        }
    }

    Ok(())
}

fn day_span(start: &str, end: &str) -> Result<Interval> {
    let (Some(start_min), Some(end_min)) = (parse_time_of_day(start), parse_time_of_day(end)) else {
        bail!("day span must be two HH:MM times, got '{start}' and '{end}'");
    };
    if start_min >= end_min {
        bail!("day span {start}-{end} is empty");
    }
    Ok(Interval::new(start_min, end_min))
}

fn write_report(output: Option<&Path>, report: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, report).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }
    Ok(())
}
