//! Domain error types.

/// Top-level error type for hhhl.
#[derive(Debug, thiserror::Error)]
pub enum HhhlError {
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

    #[error("missing {provider} API key: set [api] {key} or the {env_var} environment variable")]
    MissingCredential {
        provider: String,
        key: String,
        env_var: String,
    },

    #[error("request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("unparseable response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("response for {symbol} is missing field `{field}`")]
    MissingField { symbol: String, field: String },

    #[error("no price history for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient price history for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("chart rendering failed for {symbol}: {reason}")]
    Chart { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HhhlError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        HhhlError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&HhhlError> for std::process::ExitCode {
    fn from(err: &HhhlError) -> Self {
        let code: u8 = match err {
            HhhlError::Io(_) => 1,
            HhhlError::ConfigParse { .. }
            | HhhlError::ConfigMissing { .. }
            | HhhlError::ConfigInvalid { .. }
            | HhhlError::MissingCredential { .. } => 2,
            HhhlError::Http { .. }
            | HhhlError::HttpStatus { .. }
            | HhhlError::Decode { .. }
            | HhhlError::MissingField { .. } => 3,
            HhhlError::Chart { .. } => 4,
            HhhlError::NoData { .. } | HhhlError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
