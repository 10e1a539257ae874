use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach prediction service: {0}")]
    Connection(String),
    #[error("bad response from prediction service: {0}")]
    Protocol(String),
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() || err.is_status() || err.is_body() {
            FetchError::Protocol(err.to_string())
        } else {
            FetchError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Protocol(err.to_string())
    }
}
