//! Error types for the registry client.
//!
//! # Design
//! Failures fall into three groups that callers must be able to tell apart:
//! local errors raised before or after the round trip (`InvalidInput`,
//! `Encode`, `Decode`, `InvalidArtifactType`, `Transport`, `Config`), API
//! errors decoded from a problem-details body (`Api`), and
//! `UnexpectedServerError` for an error response whose body could not be
//! decoded at all. Only `Api` carries a server-supplied status.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by every client operation.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by `RegistryClient` operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An identifier or version expression failed client-side validation.
    /// No request was sent.
    #[error("invalid input for {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    /// The request payload could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A success response body could not be decoded into the expected type.
    #[error("failed to parse response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The `X-Registry-ArtifactType` header was missing or not a known type.
    #[error("invalid artifact type in response header: {value:?}")]
    InvalidArtifactType { value: Option<String> },

    /// The request never produced a response.
    #[error("failed to execute HTTP request: {0}")]
    Transport(#[from] TransportError),

    /// A configuration value could not be used.
    #[error("invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    /// The registry answered with an unexpected status and a problem-details body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The registry answered with an unexpected status and a body that is not
    /// a problem-details envelope.
    #[error("unexpected server error (HTTP {status}): {source}")]
    UnexpectedServerError {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    /// The decoded API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            RegistryError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Status reported by the registry. Only API errors carry one.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|err| err.status)
    }
}

/// Problem-details error envelope returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(default)]
pub struct ApiError {
    /// Human-readable explanation of this occurrence.
    pub detail: String,
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary of the problem type.
    pub title: String,
    pub status: u16,
    /// URI identifying this occurrence.
    pub instance: String,
    /// Server-side exception name, when the registry reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.title)?;
        if let Some(name) = &self.name {
            write!(f, ": {name}")?;
        }
        write!(
            f,
            " (detail: {}, instance: {}, type: {})",
            self.detail, self.instance, self.problem_type
        )
    }
}

/// A network-level failure: DNS, connect, timeout or I/O.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_decodes_partial_envelope() {
        let err: ApiError = serde_json::from_str(r#"{"status":404,"title":"Not found"}"#).unwrap();
        assert_eq!(err.status, 404);
        assert_eq!(err.title, "Not found");
        assert!(err.detail.is_empty());
        assert!(err.name.is_none());
    }

    #[test]
    fn api_error_maps_type_field() {
        let err: ApiError = serde_json::from_str(
            r#"{"type":"about:blank","status":409,"title":"Conflict","name":"ArtifactAlreadyExistsException"}"#,
        )
        .unwrap();
        assert_eq!(err.problem_type, "about:blank");
        assert_eq!(err.name.as_deref(), Some("ArtifactAlreadyExistsException"));
    }

    #[test]
    fn api_error_display_includes_status_and_title() {
        let err = ApiError {
            status: 404,
            title: "Not found".to_string(),
            detail: "No artifact with ID 'x'".to_string(),
            ..Default::default()
        };
        let text = err.to_string();
        assert!(text.starts_with("[404] Not found"));
        assert!(text.contains("No artifact with ID 'x'"));
    }

    #[test]
    fn status_only_for_api_errors() {
        let api = RegistryError::from(ApiError {
            status: 409,
            ..Default::default()
        });
        assert_eq!(api.status(), Some(409));

        let local = RegistryError::InvalidInput {
            field: "Group ID",
            value: String::new(),
        };
        assert_eq!(local.status(), None);
        assert!(local.api_error().is_none());
    }

    #[test]
    fn registry_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RegistryError>();
    }
}
