use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    BrowserNotLaunched,

    #[error("Tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("Could not connect to the page: {0}")]
    PageUnreachable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Page snapshot failed: {0}")]
    SnapshotFailed(String),

    #[error("Unknown {kind} key: {value}")]
    UnknownKey { kind: &'static str, value: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, LocatorError>;

// headless_chrome reports failures as anyhow::Error
impl From<anyhow::Error> for LocatorError {
    fn from(err: anyhow::Error) -> Self {
        LocatorError::AnyhowError(err.to_string())
    }
}

impl LocatorError {
    pub fn unknown_key(kind: &'static str, value: &str) -> Self {
        LocatorError::UnknownKey {
            kind,
            value: value.to_string(),
        }
    }
}
