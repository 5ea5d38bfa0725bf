//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{command, Parser, Subcommand};
use geosync::IntervalKind;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the reference dates of an interval
    Dates {
        /// day, week, month, dekad or a number of days
        #[arg(short, long)]
        interval: IntervalKind,
        #[arg(short, long)]
        begin: NaiveDate,
        /// Defaults to today
        #[arg(short, long)]
        end: Option<NaiveDate>,
    },
    /// List the files each source is missing
    Plan {
        #[command(flatten)]
        target: Target,
    },
    /// Download the files each source is missing
    Sync {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(clap::Args)]
pub struct Target {
    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Only process the named source
    #[arg(short, long)]
    pub source: Option<String>,
    /// Last date to synchronise, defaults to today
    #[arg(short, long)]
    pub end: Option<NaiveDate>,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_dates_command() {
        let cli = Cli::try_parse_from([
            "geosync", "dates", "--interval", "dekad", "--begin", "2004-02-01", "--end", "2004-03-31",
        ])
        .unwrap();

        match cli.command {
            Commands::Dates { interval, begin, end } => {
                assert_eq!(interval, IntervalKind::Dekad);
                assert_eq!(begin, NaiveDate::from_ymd_opt(2004, 2, 1).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2004, 3, 31));
            }
            _ => panic!("expected dates command"),
        }
    }

    #[test]
    fn should_reject_invalid_interval() {
        let result = Cli::try_parse_from(["geosync", "dates", "-i", "0", "-b", "2004-02-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn should_parse_sync_target() {
        let cli = Cli::try_parse_from(["geosync", "sync", "--source", "TAMSAT"]).unwrap();

        match cli.command {
            Commands::Sync { target } => {
                assert_eq!(target.source.as_deref(), Some("TAMSAT"));
                assert!(target.config.is_none());
                assert!(target.end.is_none());
            }
            _ => panic!("expected sync command"),
        }
    }

    #[test]
    fn should_count_progress() {
        let pb = create_progress_bar(10, "Downloading...".to_string());
        pb.inc(4);

        assert_eq!(pb.length(), Some(10));
        assert_eq!(pb.position(), 4);
    }
}
