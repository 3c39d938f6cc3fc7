use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task description cannot be empty")]
    EmptyDescription,

    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("unknown filter mode: {0}")]
    UnknownFilterMode(String),

    #[error("task storage unavailable")]
    StorageUnavailable(#[source] std::io::Error),
}
