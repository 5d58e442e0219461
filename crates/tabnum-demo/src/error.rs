use tabnum_core::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("invalid arguments: {0}")]
    Args(String),

    #[error("failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl DemoError {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Args(_) => 2,
            Self::Settings(_) | Self::Json(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;
