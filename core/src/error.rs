//! Error types for the template client.
//!
//! # Design
//! Three failure kinds are kept apart: transport (`Http`, `Network`),
//! decode (`Decode`) and remote (`Remote`, a 200 response whose body reports
//! a nonzero `errorCode`). `Http` carries the raw response body, unparsed,
//! whatever the server put in it.

use thiserror::Error;

/// Errors returned by `TemplateClient` and `TemplateApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than 200.
    #[error("unexpected status code: {status}, response: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("failed to send request: {0}")]
    Network(String),

    /// A 200 response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server accepted the request but reported an application error.
    #[error("server rejected request (error code {code}): {message}")]
    Remote { code: i64, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("server token must not be empty")]
    MissingServerToken,

    #[error("template has no id")]
    MissingTemplateId,
}

impl ApiError {
    /// True for failures at the HTTP layer: a non-200 status or no response at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Network(_))
    }
}
