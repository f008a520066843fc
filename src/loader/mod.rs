use std::fs;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::ReminderError;
use crate::types::DuaRecord;

pub const RESOURCE_NAME: &str = "duas.txt";

const BUNDLED_DUAS: &str = include_str!("../../resources/duas.txt");

#[derive(Debug, Clone)]
pub enum DuaSource {
    Bundled,
    File(PathBuf),
}

/// Reads the Dua collection fresh on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct DuaLoader {
    source: DuaSource,
}

impl DuaLoader {
    pub fn bundled() -> Self {
        Self { source: DuaSource::Bundled }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { source: DuaSource::File(path.into()) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match &config.resource_path {
            Some(path) => Self::from_path(path.clone()),
            None => Self::bundled(),
        }
    }

    /// Loads every record, or none at all if the resource is missing or any
    /// record fails to decode.
    pub fn load_all(&self) -> Vec<DuaRecord> {
        match self.try_load() {
            Ok(duas) => duas,
            Err(e) => {
                log::error!("Failed to load or decode '{}': {}", RESOURCE_NAME, e);
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<DuaRecord>, ReminderError> {
        match &self.source {
            DuaSource::Bundled => decode_duas(BUNDLED_DUAS.as_bytes()),
            DuaSource::File(path) => {
                if !path.is_file() {
                    return Err(ReminderError::ResourceNotFound(path.display().to_string()));
                }
                let bytes = fs::read(path)?;
                decode_duas(&bytes)
            }
        }
    }
}

/// All-or-nothing decode of a JSON array of records.
pub fn decode_duas(bytes: &[u8]) -> Result<Vec<DuaRecord>, ReminderError> {
    let duas = serde_json::from_slice(bytes)?;
    Ok(duas)
}
