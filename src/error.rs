use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
