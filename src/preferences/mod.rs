use chrono::Local;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

use crate::error::ReminderError;
use crate::types::Language;

pub const ACTIVE_REMINDERS_KEY: &str = "activeReminders";
pub const SELECTED_LANGUAGE_KEY: &str = "selectedLanguage";
pub const NOTIFICATIONS_ENABLED_KEY: &str = "notificationsEnabled";

/// Small key-value store persisted as one JSON object.
///
/// Every write replaces the file atomically. Concurrent writers are
/// serialized by the internal lock; the last write wins.
pub struct Preferences {
    path: Option<PathBuf>,
    values: Mutex<Map<String, Value>>,
}

impl Preferences {
    /// Opens the store at `path`, creating an empty file on first launch.
    ///
    /// A file that no longer parses is moved aside and replaced by an empty
    /// store bound to the same path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ReminderError> {
        let path = path.into();
        let values = if path.exists() {
            log::info!("Loading existing {}", path.display());
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    let moved = move_aside(&path)?;
                    log::error!(
                        "Unreadable preferences moved to {}: {}. Starting with empty preferences.",
                        moved.display(),
                        e
                    );
                    let empty = Map::new();
                    write_atomic(&path, &empty)?;
                    empty
                }
            }
        } else {
            log::info!("Creating new {}", path.display());
            let empty = Map::new();
            write_atomic(&path, &empty)?;
            empty
        };

        Ok(Self {
            path: Some(path),
            values: Mutex::new(values),
        })
    }

    /// An empty store bound to `path` that has not touched disk yet; the
    /// next write creates the file.
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            values: Mutex::new(Map::new()),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(Map::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), ReminderError> {
        let mut values = self.lock();
        values.insert(key.to_string(), value);
        self.save(&values)
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), ReminderError> {
        match &self.path {
            Some(path) => write_atomic(path, values),
            None => Ok(()),
        }
    }

    /// Missing keys and non-array values read as an empty list.
    pub fn string_array(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_string_array(&self, key: &str, items: &[String]) -> Result<(), ReminderError> {
        let items = items.iter().cloned().map(Value::String).collect();
        self.set(key, Value::Array(items))
    }

    pub fn string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<(), ReminderError> {
        self.set(key, Value::String(value.to_string()))
    }

    /// Missing keys read as `false`.
    pub fn bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<(), ReminderError> {
        self.set(key, Value::Bool(value))
    }

    pub fn selected_language(&self) -> Language {
        self.string(SELECTED_LANGUAGE_KEY)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_selected_language(&self, language: Language) -> Result<(), ReminderError> {
        self.set_string(SELECTED_LANGUAGE_KEY, language.code())
    }

    pub fn notifications_enabled(&self) -> bool {
        self.bool(NOTIFICATIONS_ENABLED_KEY)
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<(), ReminderError> {
        self.set_bool(NOTIFICATIONS_ENABLED_KEY, enabled)
    }
}

/// Writes `value` to a uniquely named temp file beside `path`, then
/// persists it over `path`.
pub(crate) fn write_atomic<T: serde::Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), ReminderError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(value)?;
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

/// Renames an unreadable file to `<name>.corrupt-<timestamp>` and returns the
/// new path.
pub(crate) fn move_aside(path: &Path) -> Result<PathBuf, ReminderError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let moved = path.with_file_name(format!("{}.corrupt-{}", file_name, stamp));
    fs::rename(path, &moved)?;
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = Preferences::open(&path).unwrap();
        prefs.set_selected_language(Language::Es).unwrap();
        prefs.set_notifications_enabled(true).unwrap();
        drop(prefs);

        let reopened = Preferences::open(&path).unwrap();
        assert_eq!(reopened.selected_language(), Language::Es);
        assert!(reopened.notifications_enabled());
    }

    #[test]
    fn corrupt_file_is_moved_aside_and_store_stays_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let prefs = Preferences::open(&path).unwrap();
        assert!(prefs.string_array(ACTIVE_REMINDERS_KEY).is_empty());
        prefs
            .set_string_array(ACTIVE_REMINDERS_KEY, &["dua_morning".to_string()])
            .unwrap();

        let reopened = Preferences::open(&path).unwrap();
        assert_eq!(reopened.string_array(ACTIVE_REMINDERS_KEY), vec!["dua_morning"]);

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|name| name.starts_with("preferences.json.corrupt-")));
    }

    #[test]
    fn repeated_writes_leave_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = Preferences::open(&path).unwrap();
        for language in [Language::Es, Language::En, Language::Es] {
            prefs.set_selected_language(language).unwrap();
        }

        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
        assert!(path.is_file());
    }

    #[test]
    fn empty_at_creates_file_on_first_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let prefs = Preferences::empty_at(&path);
        assert!(!path.exists());
        prefs.set_notifications_enabled(true).unwrap();

        assert!(Preferences::open(&path).unwrap().notifications_enabled());
    }

    #[test]
    fn defaults_when_keys_are_absent() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.selected_language(), Language::En);
        assert!(!prefs.notifications_enabled());
        assert!(prefs.string_array(ACTIVE_REMINDERS_KEY).is_empty());
    }
}
