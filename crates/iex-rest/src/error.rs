//! Error Types

/// Errors from a REST request.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server claimed a JSON body that did not parse.
    #[error("JSON body error: {0}")]
    Json(#[from] serde_json::Error),
}
