use std::error::Error;
use std::io::Write;

use crate::commands::{parse_reminder_time, Command, Toggle};
use crate::error::ReminderError;
use crate::state::{default_reminder_time, AppState};

const PERMISSION_ALERT: &str =
    "Notifications permission was not granted. Please enable it in Settings.";

pub async fn command_handler<W: Write>(
    cmd: Command,
    state: &AppState,
    out: &mut W,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let language = state.language();

    match cmd {
        Command::List => {
            if state.duas.is_empty() {
                writeln!(out, "No duas available.")?;
            }
            for dua in &state.duas {
                let bell = if state.has_reminder(&dua.id) { "🔔" } else { "  " };
                match &dua.default_time_option {
                    Some(option) => {
                        writeln!(out, "{} {:<20} {} ({})", bell, dua.id, dua.title(language), option)?
                    }
                    None => writeln!(out, "{} {:<20} {}", bell, dua.id, dua.title(language))?,
                }
            }
        }
        Command::Show { id } => {
            let dua = state
                .dua(&id)
                .ok_or_else(|| ReminderError::UnknownDua(id.clone()))?;
            writeln!(out, "{}\n", dua.title(language))?;
            writeln!(out, "{}\n", dua.arabic_text)?;
            writeln!(out, "{}\n", dua.transliteration)?;
            writeln!(out, "{}\n", dua.translation_en)?;
            writeln!(out, "{}", dua.translation_es)?;
            if state.has_reminder(&dua.id) {
                writeln!(out, "\n🔔 Reminder scheduled")?;
            }
        }
        Command::Schedule { id, at } => {
            let at = match at {
                Some(input) => parse_reminder_time(&input)?,
                None => default_reminder_time(),
            };
            match state.confirm_reminder(&id, at).await {
                Ok(()) => writeln!(
                    out,
                    "🔔 Reminder set for {}",
                    at.format("%Y-%m-%d %H:%M:%S")
                )?,
                Err(ReminderError::PermissionDenied) => writeln!(out, "{}", PERMISSION_ALERT)?,
                Err(e) => return Err(e.into()),
            }
        }
        Command::Cancel { id } => {
            state.cancel_reminder(&id).await;
            writeln!(out, "Reminder for '{}' cancelled", id)?;
        }
        Command::CancelAll => {
            state.scheduler.cancel_all().await;
            state.active.clear()?;
            writeln!(out, "All reminders cancelled")?;
        }
        Command::Pending => {
            let pending = state.scheduler.fetch_pending_ids().await;
            if pending.is_empty() {
                writeln!(out, "No pending reminders.")?;
            }
            for id in pending {
                let title = state.dua(&id).map(|dua| dua.title(language)).unwrap_or("");
                writeln!(out, "🔔 {:<20} {}", id, title)?;
            }
        }
        Command::Reconcile => {
            let active = state.reconcile().await?;
            writeln!(out, "{} active reminders", active.len())?;
        }
        Command::Backup => {
            if state.backup.backup() {
                writeln!(out, "Backup complete. Your reminders have been backed up.")?;
            } else {
                writeln!(out, "Backup failed.")?;
            }
        }
        Command::Restore => match state.backup.restore() {
            Some(ids) => writeln!(
                out,
                "Restore complete. {} reminders have been restored.",
                ids.len()
            )?,
            None => writeln!(out, "Restore failed.")?,
        },
        Command::Language { language } => {
            state.set_language(language)?;
            writeln!(out, "Language set to {}", language)?;
        }
        Command::Notifications { state: toggle } => {
            let enabled = toggle == Toggle::On;
            state.set_notifications_enabled(enabled).await?;
            if enabled {
                writeln!(out, "Reminders enabled")?;
            } else {
                writeln!(out, "Reminders disabled, all pending reminders cancelled")?;
            }
        }
        Command::Watch => {
            writeln!(out, "Watching for due reminders, press Ctrl-C to stop.")?;
        }
    }
    Ok(())
}
