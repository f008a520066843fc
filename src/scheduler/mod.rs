use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::error::ReminderError;
use crate::types::{DuaRecord, NotificationRequest, ReminderState};

mod local;
pub use local::LocalNotificationCenter;

/// The notification registry the app schedules into.
///
/// Requests are keyed by identifier: adding a request whose identifier is
/// already pending replaces it.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Asks to alert with sound. Resolves once with the user's answer.
    async fn request_authorization(&self) -> Result<bool, ReminderError>;
    async fn add(&self, request: NotificationRequest) -> Result<(), ReminderError>;
    async fn remove_pending(&self, identifiers: &[String]) -> Result<(), ReminderError>;
    async fn remove_all_pending(&self) -> Result<(), ReminderError>;
    async fn pending_requests(&self) -> Result<Vec<NotificationRequest>, ReminderError>;
}

/// Schedules and cancels one-shot reminders keyed by Dua id.
///
/// Failures from the registry are logged here and never reach the caller.
#[derive(Clone)]
pub struct ReminderScheduler {
    center: Arc<dyn NotificationCenter>,
}

impl ReminderScheduler {
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self { center }
    }

    pub async fn request_permission(&self) -> bool {
        match self.center.request_authorization().await {
            Ok(granted) => granted,
            Err(e) => {
                log::error!("Permission request failed: {}", e);
                false
            }
        }
    }

    /// Registers a reminder firing at the calendar fields of `at`.
    ///
    /// Permission is not checked here; without it the registry drops the
    /// request.
    pub async fn schedule(&self, dua: &DuaRecord, at: DateTime<Local>) {
        let request = NotificationRequest::for_dua(dua, &at);
        log::info!("Scheduling reminder '{}' for {}", dua.id, at.format("%Y-%m-%d %H:%M:%S"));
        if let Err(e) = self.center.add(request).await {
            log::error!("Failed to schedule notification for '{}': {}", dua.id, e);
        }
    }

    pub async fn cancel(&self, dua: &DuaRecord) {
        self.cancel_id(&dua.id).await;
    }

    pub async fn cancel_id(&self, id: &str) {
        if let Err(e) = self.center.remove_pending(&[id.to_string()]).await {
            log::error!("Failed to cancel notification for '{}': {}", id, e);
        }
    }

    /// Clears every pending request in the registry, whatever created it.
    pub async fn cancel_all(&self) {
        if let Err(e) = self.center.remove_all_pending().await {
            log::error!("Failed to cancel all notifications: {}", e);
        }
    }

    pub async fn fetch_pending_ids(&self) -> Vec<String> {
        match self.center.pending_requests().await {
            Ok(requests) => requests.into_iter().map(|r| r.identifier).collect(),
            Err(e) => {
                log::error!("Failed to fetch pending notifications: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn state_of(&self, id: &str) -> ReminderState {
        ReminderState::of(id, &self.fetch_pending_ids().await)
    }
}
