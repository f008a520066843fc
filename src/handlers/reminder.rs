use chrono::Local;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::scheduler::LocalNotificationCenter;
use crate::types::NotificationRequest;

/// Presents a delivered notification to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, request: &NotificationRequest);
}

/// Logs each delivery and prints it to stdout.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, request: &NotificationRequest) {
        log::info!("Delivering reminder '{}'", request.identifier);
        println!("🔔 {}: {}", request.content.title, request.content.body);
    }
}

pub async fn start_reminder_delivery(
    center: Arc<LocalNotificationCenter>,
    notifier: Arc<dyn Notifier>,
    every: Duration,
) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let delivered = deliver_reminders(&center, notifier.as_ref()).await;
        if delivered > 0 {
            log::info!("Delivered {} reminders", delivered);
        }
    }
}

/// Hands every due request to `notifier` and returns how many fired.
pub async fn deliver_reminders(center: &LocalNotificationCenter, notifier: &dyn Notifier) -> usize {
    match center.deliver_due(Local::now()).await {
        Ok(delivered) => {
            for request in &delivered {
                notifier.notify(request);
            }
            delivered.len()
        }
        Err(e) => {
            log::error!("Failed to deliver due reminders: {}", e);
            0
        }
    }
}
