use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = ".dua-reminder";
const DEFAULT_DELIVERY_INTERVAL_SECS: u64 = 30;

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Overrides the compiled-in `duas.txt` when set.
    pub resource_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    /// Root of the cloud-synced container; `None` means it is unavailable.
    pub cloud_container: Option<PathBuf>,
    pub notifications_authorized: bool,
    pub delivery_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            resource_path: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cloud_container: None,
            notifications_authorized: true,
            delivery_interval: Duration::from_secs(DEFAULT_DELIVERY_INTERVAL_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }

        let defaults = Self::default();
        let notifications_authorized = match env::var("DUA_NOTIFICATIONS_AUTHORIZED") {
            Ok(value) => parse_flag(&value).unwrap_or_else(|| {
                log::warn!(
                    "Ignoring DUA_NOTIFICATIONS_AUTHORIZED='{}', expected true/false",
                    value
                );
                defaults.notifications_authorized
            }),
            Err(_) => defaults.notifications_authorized,
        };
        let delivery_interval = env::var("DUA_DELIVERY_INTERVAL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.delivery_interval);

        Self {
            resource_path: env::var_os("DUA_RESOURCE_PATH").map(PathBuf::from),
            data_dir: env::var_os("DUA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cloud_container: env::var_os("DUA_CLOUD_CONTAINER").map(PathBuf::from),
            notifications_authorized,
            delivery_interval,
        }
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }

    pub fn pending_notifications_path(&self) -> PathBuf {
        self.data_dir.join("pending_notifications.json")
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
