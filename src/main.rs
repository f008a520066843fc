use clap::Parser;
use std::error::Error;
use std::sync::Arc;

use dua_reminder::{
    command_handler, start_reminder_delivery, AppConfig, AppState, Cli, Command, DuaLoader,
    LocalNotificationCenter, LogNotifier, Preferences,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    log::debug!("Using data directory {}", config.data_dir.display());

    let preferences = match Preferences::open(config.preferences_path()) {
        Ok(prefs) => prefs,
        Err(e) => {
            log::error!("Failed to load preferences: {}. Starting with empty preferences.", e);
            Preferences::empty_at(config.preferences_path())
        }
    };

    let center = Arc::new(LocalNotificationCenter::open(
        config.pending_notifications_path(),
        config.notifications_authorized,
    ));

    let state = AppState::new(
        &DuaLoader::from_config(&config),
        Arc::new(preferences),
        center.clone(),
        config.cloud_container.clone(),
    );

    let watch = cli.command == Command::Watch;
    command_handler(cli.command, &state, &mut std::io::stdout()).await?;

    if watch {
        tokio::select! {
            _ = start_reminder_delivery(center, Arc::new(LogNotifier), config.delivery_interval) => {}
            _ = tokio::signal::ctrl_c() => log::info!("Stopping reminder delivery"),
        }
    }

    Ok(())
}
