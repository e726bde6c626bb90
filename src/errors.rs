use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetarError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("invalid setting for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}
