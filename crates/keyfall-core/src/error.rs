use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate lane key: {0}")]
    DuplicateLane(char),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Input source closed")]
    InputClosed,

    #[error("Credential file error: {0}")]
    Credential(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("No results found for query: {0}")]
    NoResults(String),

    #[error("{0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        let message = match &e {
            ureq::Error::StatusCode(status) => format!("HTTP {} error", status),
            ureq::Error::Timeout(_) => format!("Request timed out: {}", e),
            ureq::Error::Io(_) | ureq::Error::ConnectionFailed => {
                format!("Connection failed: {}", e)
            }
            _ => format!("HTTP error: {}", e),
        };
        Error::Http(message)
    }
}
