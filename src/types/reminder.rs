use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use super::DuaRecord;

/// Title shown on every reminder notification.
pub const REMINDER_TITLE: &str = "Dua Reminder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

/// One-shot trigger matching calendar fields in the local calendar.
///
/// The year is part of the match, so once the moment has passed the trigger
/// never fires again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTrigger {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub repeats: bool,
}

impl CalendarTrigger {
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
            day: at.day(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            repeats: false,
        }
    }

    /// Resolves the fields to an instant in `tz`.
    ///
    /// Ambiguous wall-clock times take the earliest instant; times skipped by
    /// a DST gap resolve to `None`.
    pub fn fire_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)?;
        tz.from_local_datetime(&naive).earliest()
    }

    /// The next moment this trigger fires, if it still lies after `now`.
    pub fn next_fire_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.fire_date(&now.timezone()).filter(|at| at > now)
    }

    pub fn is_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.fire_date(&now.timezone())
            .map(|at| &at <= now)
            .unwrap_or(false)
    }
}

/// A pending notification, keyed by the Dua id it reminds about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub identifier: String,
    pub content: NotificationContent,
    pub trigger: CalendarTrigger,
}

impl NotificationRequest {
    pub fn for_dua<Tz: TimeZone>(dua: &DuaRecord, at: &DateTime<Tz>) -> Self {
        Self {
            identifier: dua.id.clone(),
            content: NotificationContent {
                title: REMINDER_TITLE.to_string(),
                body: dua.title_en.clone(),
                sound: true,
            },
            trigger: CalendarTrigger::from_datetime(at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    None,
    Pending,
}

impl ReminderState {
    pub fn of(id: &str, pending_ids: &[String]) -> Self {
        if pending_ids.iter().any(|pending| pending == id) {
            ReminderState::Pending
        } else {
            ReminderState::None
        }
    }
}
