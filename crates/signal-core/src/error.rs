use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Traffic light with this ID already exists.")]
    DuplicateKey(String),

    #[error("Traffic light not found.")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl SignalError {
    /// The signal id the failure refers to, if any.
    pub fn signal_id(&self) -> Option<&str> {
        match self {
            SignalError::DuplicateKey(id) | SignalError::NotFound(id) => Some(id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
