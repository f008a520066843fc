mod types;
mod commands;
mod handlers;
mod error;
mod state;
mod config;
mod loader;
mod preferences;
mod active;
mod scheduler;
mod backup;

pub use types::*;
pub use commands::*;
pub use handlers::*;
pub use error::*;
pub use state::*;
pub use config::*;
pub use loader::*;
pub use preferences::*;
pub use active::*;
pub use scheduler::*;
pub use backup::*;
