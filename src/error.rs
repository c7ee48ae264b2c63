pub type PrintmockResult<T> = Result<T, PrintmockError>;

#[derive(thiserror::Error, Debug)]
pub enum PrintmockError {
    /// No placeholder region matched the classifier. The template is
    /// malformed or uncropped; not retryable.
    #[error("detection error: {0}")]
    Detection(String),

    /// Network failure while fetching a template or design image. Transient;
    /// the caller may retry.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Fetched bytes could not be decoded as a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// The rendering provider explicitly failed the job. Carries the
    /// provider's own detail string; not retried automatically.
    #[error("provider rejected: {0}")]
    ProviderRejected(String),

    /// The provider never reached a terminal status within the polling
    /// budget. Distinct from rejection so callers can retry with backoff.
    #[error("timeout: {0}")]
    Timeout(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrintmockError {
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn provider_rejected(msg: impl Into<String>) -> Self {
        Self::ProviderRejected(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
