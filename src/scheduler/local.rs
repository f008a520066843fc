use async_trait::async_trait;
use chrono::{DateTime, Local};
use fd_lock::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::NotificationCenter;
use crate::error::ReminderError;
use crate::preferences::{move_aside, write_atomic};
use crate::types::NotificationRequest;

type Registry = BTreeMap<String, NotificationRequest>;

/// In-process notification registry, optionally mirrored to a JSON file so
/// separate invocations of the binary share one queue.
///
/// Every change to the file happens under an advisory lock on a sibling
/// `.lock` file, covering the reload, the change and the save.
/// When not authorized, `add` accepts the request and silently drops it.
pub struct LocalNotificationCenter {
    path: Option<PathBuf>,
    authorized: bool,
    requests: Mutex<Registry>,
}

impl LocalNotificationCenter {
    pub fn in_memory(authorized: bool) -> Self {
        Self {
            path: None,
            authorized,
            requests: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens the registry file. An unreadable file is moved aside and the
    /// registry starts empty.
    pub fn open(path: impl Into<PathBuf>, authorized: bool) -> Self {
        let path = path.into();
        let requests = match read_registry(&path) {
            Ok(requests) => {
                log::info!(
                    "Loaded {} pending notifications from {}",
                    requests.len(),
                    path.display()
                );
                requests
            }
            Err(e) => {
                match move_aside(&path) {
                    Ok(moved) => log::error!(
                        "Unreadable notification registry moved to {}: {}. Starting empty.",
                        moved.display(),
                        e
                    ),
                    Err(move_err) => log::error!(
                        "Unreadable notification registry {} ({}), could not move it aside: {}. Starting empty.",
                        path.display(),
                        e,
                        move_err
                    ),
                }
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            authorized,
            requests: Mutex::new(requests),
        }
    }

    /// Runs `change` against the registry after picking up what other
    /// processes saved, and saves the result when `change` reports a change.
    async fn with_registry<R, F>(&self, change: F) -> Result<R, ReminderError>
    where
        F: FnOnce(&mut Registry) -> (R, bool) + Send,
        R: Send,
    {
        let mut requests = self.requests.lock().await;
        let Some(path) = &self.path else {
            return Ok(change(&mut requests).0);
        };

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write()?;

        match read_registry(path) {
            Ok(on_disk) => *requests = on_disk,
            Err(e) => log::warn!("Keeping in-memory notifications, reload failed: {}", e),
        }
        let (result, changed) = change(&mut requests);
        if changed {
            let list: Vec<&NotificationRequest> = requests.values().collect();
            write_atomic(path, &list)?;
        }
        Ok(result)
    }

    /// Removes and returns every request whose trigger has fired by `now`.
    ///
    /// Requests whose fields no longer resolve to a real instant are discarded.
    pub async fn deliver_due(
        &self,
        now: DateTime<Local>,
    ) -> Result<Vec<NotificationRequest>, ReminderError> {
        self.with_registry(|requests| {
            let (expired, kept): (Registry, Registry) = std::mem::take(requests)
                .into_iter()
                .partition(|(_, request)| {
                    request.trigger.is_due(&now) || request.trigger.fire_date(&Local).is_none()
                });
            *requests = kept;
            let changed = !expired.is_empty();
            let delivered = expired
                .into_values()
                .filter(|request| request.trigger.fire_date(&Local).is_some())
                .collect();
            (delivered, changed)
        })
        .await
    }
}

fn lock_path(path: &Path) -> PathBuf {
    path.with_extension("lock")
}

fn read_registry(path: &Path) -> Result<Registry, ReminderError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let json = fs::read_to_string(path)?;
    let list: Vec<NotificationRequest> = serde_json::from_str(&json)?;
    Ok(list
        .into_iter()
        .map(|request| (request.identifier.clone(), request))
        .collect())
}

#[async_trait]
impl NotificationCenter for LocalNotificationCenter {
    async fn request_authorization(&self) -> Result<bool, ReminderError> {
        Ok(self.authorized)
    }

    /// A request that can never fire still replaces, and so removes, any
    /// request pending under the same identifier.
    async fn add(&self, request: NotificationRequest) -> Result<(), ReminderError> {
        if !self.authorized {
            log::debug!("Not authorized, dropping notification '{}'", request.identifier);
            return Ok(());
        }

        if request.trigger.next_fire_date(&Local::now()).is_none() {
            let id = request.identifier;
            let replaced = self
                .with_registry(|requests| {
                    let removed = requests.remove(&id).is_some();
                    (removed, removed)
                })
                .await?;
            log::warn!(
                "Notification '{}' would never fire, not scheduling it{}",
                id,
                if replaced { " (previous request removed)" } else { "" }
            );
            return Ok(());
        }

        self.with_registry(|requests| {
            requests.insert(request.identifier.clone(), request);
            ((), true)
        })
        .await
    }

    async fn remove_pending(&self, identifiers: &[String]) -> Result<(), ReminderError> {
        self.with_registry(|requests| {
            let before = requests.len();
            for id in identifiers {
                requests.remove(id);
            }
            ((), requests.len() != before)
        })
        .await
    }

    async fn remove_all_pending(&self) -> Result<(), ReminderError> {
        self.with_registry(|requests| {
            let changed = !requests.is_empty();
            requests.clear();
            ((), changed)
        })
        .await
    }

    async fn pending_requests(&self) -> Result<Vec<NotificationRequest>, ReminderError> {
        self.with_registry(|requests| (requests.values().cloned().collect(), false))
            .await
    }
}
