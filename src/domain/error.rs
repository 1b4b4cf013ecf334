//! Domain error types.

/// Top-level error type for stocker.
#[derive(Debug, thiserror::Error)]
pub enum StockerError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid strategy: {reason}")]
    InvalidStrategy { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockerError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        StockerError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_strategy(reason: impl Into<String>) -> Self {
        StockerError::InvalidStrategy {
            reason: reason.into(),
        }
    }
}

impl From<&StockerError> for std::process::ExitCode {
    fn from(err: &StockerError) -> Self {
        let code: u8 = match err {
            StockerError::Io(_) | StockerError::Json(_) => 1,
            StockerError::ConfigParse { .. }
            | StockerError::ConfigMissing { .. }
            | StockerError::ConfigInvalid { .. } => 2,
            StockerError::NoData { .. } | StockerError::Data { .. } => 3,
            StockerError::InvalidStrategy { .. } => 4,
            StockerError::InvalidInput { .. } | StockerError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
