//! `finals` CLI: validate a final-exam schedule from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate, printing the annotated sections as JSON
//! finals validate -s sections.json -f finals.json -r rooms.json
//!
//! # Per-code counts instead of the full report
//! finals validate -s sections.json -f finals.json --summary
//!
//! # Institutional settings from a file, overridden on the command line
//! finals validate -s sections.json -f finals.json -c config.json --buffer 5
//!
//! # Fail a CI job when anything is flagged
//! finals validate -s sections.json -f finals.json --fail-on-errors
//!
//! # Normalize registrar times
//! finals normalize-time 0930-1045PM TBA
//!
//! # Look up the mandated final for a class slot
//! finals grid --credits 3 --days MWF --start 08:00
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use finals_engine::{
    normalize_time, validate, ErrorCode, FinalExamEntry, FinalsGrid, Report, RoomCapacities,
    Section, ValidationConfig,
};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status when `--fail-on-errors` is set and a section is flagged.
const EXIT_FLAGGED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "finals",
    version,
    about = "Final-exam schedule conflict checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a finals schedule against the course sections
    Validate {
        /// Normalized sections (JSON array)
        #[arg(short, long)]
        sections: String,
        /// Normalized final-exam entries (JSON array)
        #[arg(short, long)]
        finals: String,
        /// Room capacities (JSON object of room → seats)
        #[arg(short, long)]
        rooms: Option<String>,
        /// Validation config (JSON)
        #[arg(short, long)]
        config: Option<String>,
        /// Alternate finals grid (JSON array of rules)
        #[arg(short, long)]
        grid: Option<String>,
        /// Comma-separated stretch course numbers (replaces the config's set)
        #[arg(long)]
        stretch: Option<String>,
        /// Instructor back-to-back buffer in minutes (replaces the config's value)
        #[arg(long)]
        buffer: Option<i64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print per-code counts instead of the annotated sections
        #[arg(long)]
        summary: bool,
        /// Exit with status 2 when any section is flagged
        #[arg(long)]
        fail_on_errors: bool,
    },
    /// Convert registrar time strings to canonical HH:MM-HH:MM
    NormalizeTime {
        /// Raw times, e.g. 0930-1045PM
        #[arg(required = true)]
        times: Vec<String>,
    },
    /// Look up the mandated final for a class slot in the finals grid
    Grid {
        #[arg(long)]
        credits: u32,
        /// Meeting-day pattern, e.g. MWF
        #[arg(long)]
        days: String,
        /// Class start time, HH:MM
        #[arg(long)]
        start: String,
        /// Alternate finals grid (JSON array of rules)
        #[arg(short, long)]
        grid: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            sections,
            finals,
            rooms,
            config,
            grid,
            stretch,
            buffer,
            output,
            summary,
            fail_on_errors,
        } => {
            let sections: Vec<Section> = read_json(&sections, "sections")?;
            let finals: Vec<FinalExamEntry> = read_json(&finals, "finals")?;
            let rooms = match rooms {
                Some(path) => RoomCapacities::from_json(&read_file(&path)?)
                    .with_context(|| format!("Failed to parse room capacities: {}", path))?,
                None => RoomCapacities::new(),
            };
            let config = build_config(config.as_deref(), stretch.as_deref(), buffer)?;
            let custom_grid = load_grid(grid.as_deref())?;
            let grid: &FinalsGrid = custom_grid.as_ref().unwrap_or_else(|| FinalsGrid::standard());

            info!(
                sections = sections.len(),
                finals = finals.len(),
                rooms = rooms.len(),
                grid_rules = grid.len(),
                "validating"
            );
            let report = validate(sections, &finals, &rooms, grid, &config);

            let rendered = if summary {
                render_summary(&report)
            } else {
                serde_json::to_string_pretty(&report)?
            };
            write_output(output.as_deref(), &rendered)?;

            if fail_on_errors && !report.is_clean() {
                process::exit(EXIT_FLAGGED);
            }
        }
        Commands::NormalizeTime { times } => {
            for raw in times {
                println!("{}", normalize_time(&raw));
            }
        }
        Commands::Grid {
            credits,
            days,
            start,
            grid,
        } => {
            let custom_grid = load_grid(grid.as_deref())?;
            let grid: &FinalsGrid = custom_grid.as_ref().unwrap_or_else(|| FinalsGrid::standard());
            let meetings = finals_engine::time::meetings_per_week(&days);
            match grid.lookup(credits, meetings, &days, &start) {
                Some(rule) => println!("{} {}", rule.final_day, rule.final_time),
                None => println!("not found"),
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays a clean report stream.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any), then command-line overrides on top.
fn build_config(
    path: Option<&str>,
    stretch: Option<&str>,
    buffer: Option<i64>,
) -> Result<ValidationConfig> {
    let mut config = match path {
        Some(path) => ValidationConfig::from_json(&read_file(path)?)
            .with_context(|| format!("Failed to parse config: {}", path))?,
        None => ValidationConfig::default(),
    };

    if let Some(raw) = stretch {
        let numbers: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        config = config.with_stretch_courses(numbers);
    }
    if let Some(minutes) = buffer {
        config = config
            .with_buffer_minutes(minutes)
            .context("Invalid --buffer")?;
    }

    debug!(?config, "effective config");
    Ok(config)
}

fn load_grid(path: Option<&str>) -> Result<Option<FinalsGrid>> {
    path.map(|path| {
        FinalsGrid::from_json(&read_file(path)?)
            .with_context(|| format!("Failed to load finals grid: {}", path))
    })
    .transpose()
}

fn render_summary(report: &Report) -> String {
    let summary = report.summary();
    let mut out = format!(
        "Sections:  {}\nFlagged:   {}\n",
        report.sections.len(),
        report.flagged().count()
    );
    for code in ErrorCode::ALL {
        let count = summary.get(&code).copied().unwrap_or(0);
        out.push_str(&format!("{:<24}{}\n", code.as_str(), count));
    }
    out
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let text = read_file(path)?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {} file: {}", what, path))
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
