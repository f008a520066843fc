use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};

use crate::error::ReminderError;
use crate::types::Language;

#[derive(Parser, Debug)]
#[command(name = "dua-reminder", version, about = "Browse duas and schedule reminders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List all duas
    List,
    /// Show a dua with its transliteration and translations
    Show { id: String },
    /// Schedule a one-time reminder (defaults to one minute from now)
    Schedule {
        id: String,
        /// Local time as "YYYY-MM-DD HH:MM[:SS]"
        #[arg(long)]
        at: Option<String>,
    },
    /// Cancel the reminder for a dua
    Cancel { id: String },
    /// Cancel every pending notification
    CancelAll,
    /// Show pending notifications
    Pending,
    /// Forget active reminders that are no longer pending
    Reconcile,
    /// Back up active reminders to the cloud folder
    Backup,
    /// Restore active reminders from the cloud folder
    Restore,
    /// Set the display language
    Language { language: Language },
    /// Enable or disable reminders
    Notifications { state: Toggle },
    /// Deliver reminders as they come due
    Watch,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

const TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a wall-clock time in the local zone.
pub fn parse_reminder_time(input: &str) -> Result<DateTime<Local>, ReminderError> {
    let input = input.trim();
    let naive = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| ReminderError::InvalidDateTime(input.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ReminderError::InvalidDateTime(input.to_string()))
}
