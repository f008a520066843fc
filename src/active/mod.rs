use std::sync::Arc;

use crate::error::ReminderError;
use crate::preferences::{Preferences, ACTIVE_REMINDERS_KEY};

/// Ordered, duplicate-free list of Dua ids that have a reminder scheduled.
///
/// Each mutation is a read-modify-write of the single `activeReminders` key.
#[derive(Clone)]
pub struct ActiveReminders {
    preferences: Arc<Preferences>,
}

impl ActiveReminders {
    pub fn new(preferences: Arc<Preferences>) -> Self {
        Self { preferences }
    }

    pub fn ids(&self) -> Vec<String> {
        self.preferences.string_array(ACTIVE_REMINDERS_KEY)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().iter().any(|active| active == id)
    }

    /// Appends `id` unless it is already present.
    pub fn add(&self, id: &str) {
        let mut active = self.ids();
        if active.iter().any(|existing| existing == id) {
            return;
        }
        active.push(id.to_string());
        if let Err(e) = self.preferences.set_string_array(ACTIVE_REMINDERS_KEY, &active) {
            log::error!("Failed to persist active reminder '{}': {}", id, e);
        }
    }

    pub fn remove(&self, id: &str) {
        let mut active = self.ids();
        let Some(index) = active.iter().position(|existing| existing == id) else {
            return;
        };
        active.remove(index);
        if let Err(e) = self.preferences.set_string_array(ACTIVE_REMINDERS_KEY, &active) {
            log::error!("Failed to persist removal of reminder '{}': {}", id, e);
        }
    }

    /// Overwrites the whole set. Later duplicates are dropped.
    pub fn replace(&self, ids: &[String]) -> Result<Vec<String>, ReminderError> {
        let mut unique: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        self.preferences.set_string_array(ACTIVE_REMINDERS_KEY, &unique)?;
        Ok(unique)
    }

    pub fn clear(&self) -> Result<(), ReminderError> {
        self.preferences.set_string_array(ACTIVE_REMINDERS_KEY, &[])
    }
}
