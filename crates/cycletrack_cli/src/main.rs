//! Command-line front end for the cycle tracker.
//!
//! # Responsibility
//! - Drive `cycletrack_core` use cases against a local SQLite file.
//! - Keep output deterministic and line-oriented for scripting.
//!
//! # Invariants
//! - The selection cursor lives for one invocation; pass both range ends to
//!   a single `pick`.
//! - Removal via `pick` needs `--yes`; otherwise the prompt is printed only.

use clap::{Parser, Subcommand};
use cycletrack_core::db::open_db;
use cycletrack_core::report::export::{to_csv, to_json, write_csv};
use cycletrack_core::{
    core_version, default_log_level, init_logging, removal_prompt, CalendarCell, CalendarDate,
    Period, PickOutcome, SqliteBlobRepository, TrackerService, VisibleMonth,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "CYCLETRACK_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "cycletrack.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "cycletrack")]
#[command(about = "Track cycle periods and predict the next start date")]
#[command(version)]
struct Cli {
    /// SQLite file (default: $CYCLETRACK_DB_PATH, then <temp>/cycletrack.sqlite3)
    #[arg(long = "db", value_name = "PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, value_name = "ABS_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Feed calendar picks; two dates close a range
    Pick {
        /// Confirm removal when a pick lands inside a stored period
        #[arg(long)]
        yes: bool,
        #[arg(value_name = "YYYY-MM-DD", required = true, value_parser = parse_date)]
        dates: Vec<CalendarDate>,
    },
    /// Remove one stored period
    Remove {
        #[arg(value_parser = parse_date)]
        start: CalendarDate,
        #[arg(value_parser = parse_date)]
        end: CalendarDate,
    },
    /// List stored periods by start date
    List,
    /// Show last period, average cycle and next prediction
    Stats,
    /// Print a month grid (default: current month)
    Month {
        #[arg(value_name = "YYYY-MM", value_parser = parse_month)]
        month: Option<VisibleMonth>,
    },
    /// Export periods as CSV (or JSON)
    Export {
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Delete every stored period
    Clear,
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir).map_err(|err| err.to_string())?;
    }

    if cli.command == Command::Version {
        println!("cycletrack_core version={}", core_version());
        return Ok(());
    }

    let db_path = resolve_db_path(cli.db_path.clone());
    let conn = open_db(&db_path).map_err(|err| format!("open {}: {err}", db_path.display()))?;
    let mut tracker =
        TrackerService::open(SqliteBlobRepository::new(&conn), CalendarDate::today());
    info!("event=cli_command module=cli status=start");

    match &cli.command {
        Command::Pick { dates, yes } => {
            let confirm = *yes;
            for date in dates {
                let outcome = tracker
                    .pick(*date, &|_: &Period| confirm)
                    .map_err(|err| err.to_string())?;
                println!("{}", describe_outcome(&outcome));
            }
            if let Some(pending) = tracker.pending_start() {
                println!("pending start {pending} discarded; pass both dates to one pick");
            }
        }
        Command::Remove { start, end } => {
            let period = Period::new(*start, *end);
            if !tracker.remove_period(&period) {
                return Err(format!(
                    "no stored period {} .. {}",
                    period.start(),
                    period.end()
                ));
            }
            println!("removed {} .. {}", period.start(), period.end());
        }
        Command::List => {
            for (index, period) in tracker.periods().iter().enumerate() {
                println!(
                    "{:>3}  {} .. {}  ({} days)",
                    index + 1,
                    period.start(),
                    period.end(),
                    period.length_days()
                );
            }
        }
        Command::Stats => {
            let summary = tracker.summary();
            println!("Last period:    {}", summary.last_period);
            println!("Average cycle:  {}", summary.average_cycle);
            println!("Next predicted: {}", summary.next_predicted);
        }
        Command::Month { month } => {
            if let Some(month) = month {
                tracker.show_month(*month);
            }
            print_month(&tracker.month_view());
        }
        Command::Export { json, out } => {
            let rows = tracker.export_rows();
            match (json, out) {
                (false, Some(path)) => {
                    write_csv(path, &rows).map_err(|err| err.to_string())?;
                    println!("wrote {} row(s) to {}", rows.len(), path.display());
                }
                (true, Some(path)) => {
                    let text = to_json(&rows).map_err(|err| err.to_string())?;
                    std::fs::write(path, text).map_err(|err| err.to_string())?;
                    println!("wrote {} row(s) to {}", rows.len(), path.display());
                }
                (false, None) => print!("{}", to_csv(&rows)),
                (true, None) => println!("{}", to_json(&rows).map_err(|err| err.to_string())?),
            }
        }
        Command::Clear => {
            tracker.clear_all();
            println!("cleared");
        }
        Command::Version => {}
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn parse_date(value: &str) -> Result<CalendarDate, String> {
    CalendarDate::parse(value).map_err(|err| err.to_string())
}

fn parse_month(value: &str) -> Result<VisibleMonth, String> {
    let invalid = || format!("invalid month `{value}`; expected YYYY-MM");
    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    VisibleMonth::new(year, month).ok_or_else(invalid)
}

fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn describe_outcome(outcome: &PickOutcome) -> String {
    match outcome {
        PickOutcome::RangeStarted(date) => format!("range started at {date}"),
        PickOutcome::PeriodAdded(period) => {
            format!("added {} .. {}", period.start(), period.end())
        }
        PickOutcome::PeriodRemoved(period) => {
            format!("removed {} .. {}", period.start(), period.end())
        }
        PickOutcome::RemovalDeclined(period) => {
            format!("{} (rerun with --yes to confirm)", removal_prompt(period))
        }
    }
}

fn print_month(view: &cycletrack_core::MonthView) {
    println!("{}", view.title);
    println!("Su Mo Tu We Th Fr Sa");
    let mut line = String::new();
    for (slot, cell) in view.cells.iter().enumerate() {
        let text = match cell {
            CalendarCell::Blank => "  ".to_string(),
            CalendarCell::Day(day) if day.pending_start => format!("{:>2}", ">"),
            CalendarCell::Day(day) if day.marked => format!("{:>2}", "*"),
            CalendarCell::Day(day) => format!("{:>2}", day.date.day()),
        };
        line.push_str(&text);
        if slot % 7 == 6 {
            println!("{}", line.trim_end());
            line.clear();
        } else {
            line.push(' ');
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }
}
