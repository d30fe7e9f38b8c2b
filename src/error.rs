use thiserror::Error;

/// Error types that can occur when talking to the model provider.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request/response errors
    #[error("HTTP Error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth Error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the LLM provider
    #[error("Provider Error: {0}")]
    ProviderError(String),
    /// API response could not be interpreted
    #[error("Response Format Error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
}

/// Converts reqwest HTTP errors into LLMErrors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.to_string())
    }
}
