use chrono::{DateTime, Duration, Local};
use std::path::PathBuf;
use std::sync::Arc;

use crate::active::ActiveReminders;
use crate::backup::BackupService;
use crate::error::ReminderError;
use crate::loader::DuaLoader;
use crate::preferences::Preferences;
use crate::scheduler::{NotificationCenter, ReminderScheduler};
use crate::types::{CalendarTrigger, DuaRecord, Language};

/// Everything the front end needs, constructed once and passed around.
pub struct AppState {
    pub duas: Vec<DuaRecord>,
    pub preferences: Arc<Preferences>,
    pub active: ActiveReminders,
    pub scheduler: ReminderScheduler,
    pub backup: BackupService,
}

impl AppState {
    pub fn new(
        loader: &DuaLoader,
        preferences: Arc<Preferences>,
        center: Arc<dyn NotificationCenter>,
        cloud_container: Option<PathBuf>,
    ) -> Self {
        let duas = loader.load_all();
        log::info!("Loaded {} duas", duas.len());

        let active = ActiveReminders::new(preferences.clone());
        Self {
            duas,
            preferences,
            backup: BackupService::new(cloud_container, active.clone()),
            active,
            scheduler: ReminderScheduler::new(center),
        }
    }

    pub fn dua(&self, id: &str) -> Option<&DuaRecord> {
        self.duas.iter().find(|dua| dua.id == id)
    }

    pub fn language(&self) -> Language {
        self.preferences.selected_language()
    }

    pub fn set_language(&self, language: Language) -> Result<(), ReminderError> {
        self.preferences.set_selected_language(language)
    }

    pub fn has_reminder(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// Requests permission, then schedules the reminder and marks it active.
    ///
    /// A time that never fires again is rejected; any reminder already set
    /// for the dua is cancelled so nothing stale stays marked active.
    pub async fn confirm_reminder(
        &self,
        id: &str,
        at: DateTime<Local>,
    ) -> Result<(), ReminderError> {
        let dua = self
            .dua(id)
            .ok_or_else(|| ReminderError::UnknownDua(id.to_string()))?;

        if !self.scheduler.request_permission().await {
            log::warn!("Notification permission denied, not scheduling '{}'", id);
            return Err(ReminderError::PermissionDenied);
        }

        if CalendarTrigger::from_datetime(&at)
            .next_fire_date(&Local::now())
            .is_none()
        {
            log::warn!("Reminder time for '{}' has already passed", id);
            self.scheduler.cancel(dua).await;
            self.active.remove(&dua.id);
            return Err(ReminderError::InvalidDateTime(
                at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ));
        }

        self.scheduler.schedule(dua, at).await;
        self.active.add(&dua.id);
        Ok(())
    }

    pub async fn cancel_reminder(&self, id: &str) {
        self.scheduler.cancel_id(id).await;
        self.active.remove(id);
    }

    /// Drops active ids that no longer have a pending notification.
    pub async fn reconcile(&self) -> Result<Vec<String>, ReminderError> {
        let pending = self.scheduler.fetch_pending_ids().await;
        let active = self.active.ids();
        let kept: Vec<String> = active
            .iter()
            .filter(|id| pending.contains(id))
            .cloned()
            .collect();
        if kept.len() != active.len() {
            log::info!("Reconciled {} stale reminders", active.len() - kept.len());
            self.active.replace(&kept)
        } else {
            Ok(kept)
        }
    }

    /// Turning notifications off cancels every pending reminder.
    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), ReminderError> {
        self.preferences.set_notifications_enabled(enabled)?;
        if !enabled {
            self.scheduler.cancel_all().await;
            self.active.clear()?;
        }
        Ok(())
    }
}

/// Default time offered when scheduling: one minute from now.
pub fn default_reminder_time() -> DateTime<Local> {
    Local::now() + Duration::seconds(60)
}
