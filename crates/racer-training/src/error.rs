use thiserror::Error;

pub type LaunchResult<T> = std::result::Result<T, LaunchError>;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unsupported region `{region}` (training jobs run only in {supported})")]
    UnsupportedRegion { region: String, supported: String },

    #[error("missing hyperparameter key: {0}")]
    MissingKey(String),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to parse hyperparameter file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid launch settings: {0}")]
    Settings(String),

    #[error("invalid training job spec: {0}")]
    InvalidSpec(String),

    #[error("orchestration service rejected credentials: {0}")]
    Auth(String),

    #[error("orchestration service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("orchestration service rejected the job: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    /// Whether the failure was detected locally, before any remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRegion { .. }
                | Self::MissingKey(_)
                | Self::InvalidValue { .. }
                | Self::Parse { .. }
                | Self::Settings(_)
                | Self::InvalidSpec(_)
                | Self::Io(_)
        )
    }
}

impl From<config::ConfigError> for LaunchError {
    fn from(err: config::ConfigError) -> Self {
        Self::Settings(err.to_string())
    }
}
