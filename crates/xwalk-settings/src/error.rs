use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("Unknown runtime switch: {0}")]
    UnknownSwitch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
