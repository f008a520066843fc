use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::active::ActiveReminders;
use crate::error::ReminderError;

pub const BACKUP_FILENAME: &str = "dua_reminders_backup.json";
pub const BACKUP_SUBFOLDER: &str = "Documents";

/// Copies the active reminder ids to and from a cloud-synced folder.
///
/// Nothing here returns an error to the caller; failures become `false` or
/// `None` plus a log line.
pub struct BackupService {
    container: Option<PathBuf>,
    active: ActiveReminders,
}

impl BackupService {
    pub fn new(container: Option<PathBuf>, active: ActiveReminders) -> Self {
        Self { container, active }
    }

    /// `<container>/Documents/dua_reminders_backup.json`
    pub fn backup_path(&self) -> Result<PathBuf, ReminderError> {
        Ok(self.documents_dir()?.join(BACKUP_FILENAME))
    }

    fn documents_dir(&self) -> Result<PathBuf, ReminderError> {
        match &self.container {
            Some(root) if root.is_dir() => Ok(root.join(BACKUP_SUBFOLDER)),
            _ => Err(ReminderError::CloudUnavailable),
        }
    }

    pub fn backup(&self) -> bool {
        match self.try_backup() {
            Ok(path) => {
                log::info!("Backed up active reminders to {}", path.display());
                true
            }
            Err(e) => {
                log::error!("Failed to encode or write backup data: {}", e);
                false
            }
        }
    }

    pub fn try_backup(&self) -> Result<PathBuf, ReminderError> {
        let ids = self.active.ids();
        let json = serde_json::to_vec(&ids)?;

        let documents = self.documents_dir()?;
        fs::create_dir_all(&documents)?;

        let mut temp = NamedTempFile::new_in(&documents)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;

        let path = documents.join(BACKUP_FILENAME);
        temp.persist(&path)?;
        Ok(path)
    }

    /// Replaces the active set with the backed-up ids. The current set is
    /// left untouched on any failure.
    pub fn restore(&self) -> Option<Vec<String>> {
        match self.try_restore() {
            Ok(ids) => {
                log::info!("Restored {} active reminders", ids.len());
                Some(ids)
            }
            Err(e) => {
                log::error!("Failed to read or decode backup data: {}", e);
                None
            }
        }
    }

    pub fn try_restore(&self) -> Result<Vec<String>, ReminderError> {
        let path = self.backup_path()?;
        if !path.is_file() {
            return Err(ReminderError::ResourceNotFound(path.display().to_string()));
        }
        let data = fs::read(&path)?;
        let restored: Vec<String> = serde_json::from_slice(&data)?;
        self.active.replace(&restored)
    }
}
