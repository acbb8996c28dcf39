//! Response interpretation: expected status → typed value, anything else →
//! structured error.
//!
//! # Design
//! The body arrives fully drained, so every path here works on owned bytes
//! and no exit can leave a connection half-read. An error response whose body
//! is not a problem-details envelope becomes `UnexpectedServerError`, kept
//! apart from both decoded API errors and success-body decode failures.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, RegistryError, Result};
use crate::http::HttpResponse;
use crate::types::{ArtifactContent, ArtifactType};

/// Header carrying the schema type of fetched content.
pub const ARTIFACT_TYPE_HEADER: &str = "X-Registry-ArtifactType";

/// Decode the body into `T` when the status matches.
pub fn interpret<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T> {
    check_status(&response, expected)?;
    serde_json::from_slice(&response.body).map_err(RegistryError::Decode)
}

/// Accept the expected status and ignore any body.
pub fn interpret_empty(response: HttpResponse, expected: u16) -> Result<()> {
    check_status(&response, expected)
}

/// Return the raw body text with the artifact type announced in the
/// `X-Registry-ArtifactType` header.
pub fn interpret_content(response: HttpResponse, expected: u16) -> Result<ArtifactContent> {
    check_status(&response, expected)?;
    let artifact_type = artifact_type_header(&response)?;
    let content = String::from_utf8_lossy(&response.body).into_owned();
    Ok(ArtifactContent {
        content,
        artifact_type,
    })
}

fn artifact_type_header(response: &HttpResponse) -> Result<ArtifactType> {
    let value = response.header(ARTIFACT_TYPE_HEADER);
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| RegistryError::InvalidArtifactType {
            value: value.map(str::to_string),
        })
}

/// Map a status other than `expected` to an API error, or to
/// `UnexpectedServerError` when the body is not a problem-details envelope.
fn check_status(response: &HttpResponse, expected: u16) -> Result<()> {
    debug!(status = response.status, expected, "registry response");
    if response.status == expected {
        return Ok(());
    }
    match serde_json::from_slice::<ApiError>(&response.body) {
        Ok(mut api_error) => {
            if api_error.status == 0 {
                api_error.status = response.status;
            }
            Err(RegistryError::Api(api_error))
        }
        Err(source) => {
            warn!(status = response.status, error = %source, "undecodable error response");
            Err(RegistryError::UnexpectedServerError {
                status: response.status,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArtifactVersionListResponse, Rule};

    #[test]
    fn decodes_expected_status() {
        let response = HttpResponse::new(200, r#"["VALIDITY","COMPATIBILITY"]"#);
        let rules: Vec<Rule> = interpret(response, 200).unwrap();
        assert_eq!(rules, vec![Rule::Validity, Rule::Compatibility]);
    }

    #[test]
    fn not_found_becomes_api_error() {
        let response = HttpResponse::new(404, r#"{"status":404,"title":"Not found"}"#);
        let err = interpret::<ArtifactVersionListResponse>(response, 200).unwrap_err();
        let api = err.api_error().expect("api error");
        assert_eq!(api.status, 404);
        assert_eq!(api.title, "Not found");
    }

    #[test]
    fn missing_status_is_taken_from_response() {
        let response = HttpResponse::new(409, r#"{"title":"Conflict","detail":"exists"}"#);
        let err = interpret_empty(response, 204).unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn envelope_status_wins_over_response_status() {
        let response = HttpResponse::new(500, r#"{"status":409,"title":"Conflict"}"#);
        let err = interpret_empty(response, 204).unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn non_json_error_body_is_unexpected_server_error() {
        let response = HttpResponse::new(500, "<html>gateway exploded</html>");
        let err = interpret::<Vec<Rule>>(response, 200).unwrap_err();
        assert!(matches!(err, RegistryError::UnexpectedServerError { status: 500, .. }));
        assert!(err.api_error().is_none());
    }

    #[test]
    fn empty_error_body_is_unexpected_server_error() {
        let err = interpret_empty(HttpResponse::new(405, ""), 204).unwrap_err();
        assert!(matches!(err, RegistryError::UnexpectedServerError { status: 405, .. }));
    }

    #[test]
    fn bad_success_body_is_decode_error() {
        let err = interpret::<Vec<Rule>>(HttpResponse::new(200, "not json"), 200).unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
        assert!(err.to_string().starts_with("failed to parse response body"));
    }

    #[test]
    fn empty_success_ignores_body() {
        assert!(interpret_empty(HttpResponse::new(204, ""), 204).is_ok());
    }

    #[test]
    fn success_with_other_2xx_is_still_an_error() {
        let err = interpret_empty(HttpResponse::new(200, "{}"), 204).unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn content_pairs_body_with_header_type() {
        let response = HttpResponse::new(200, r#"{"a":"1"}"#).with_header(ARTIFACT_TYPE_HEADER, "JSON");
        let content = interpret_content(response, 200).unwrap();
        assert_eq!(content.content, r#"{"a":"1"}"#);
        assert_eq!(content.artifact_type, ArtifactType::Json);
    }

    #[test]
    fn content_with_unknown_type_fails_locally() {
        let response = HttpResponse::new(200, r#"{"a":"1"}"#).with_header(ARTIFACT_TYPE_HEADER, "BOGUS");
        let err = interpret_content(response, 200).unwrap_err();
        match err {
            RegistryError::InvalidArtifactType { value } => assert_eq!(value.as_deref(), Some("BOGUS")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn content_without_header_fails_locally() {
        let err = interpret_content(HttpResponse::new(200, "syntax = \"proto3\";"), 200).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArtifactType { value: None }));
    }

    #[test]
    fn content_error_status_skips_header_check() {
        let response = HttpResponse::new(404, r#"{"status":404,"title":"Not found"}"#);
        let err = interpret_content(response, 200).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
