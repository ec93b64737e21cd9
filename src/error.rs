use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KVError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for KVError {
    fn from(e: serde_json::Error) -> Self {
        KVError::Serialization(e.to_string())
    }
}
