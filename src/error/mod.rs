use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Cloud storage container is not available")]
    CloudUnavailable,
    #[error("Notification permission was not granted")]
    PermissionDenied,
    #[error("No dua with id '{0}'")]
    UnknownDua(String),
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Atomic write failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}
