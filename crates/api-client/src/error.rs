use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    #[error("The request did not complete: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to serialize the request body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
