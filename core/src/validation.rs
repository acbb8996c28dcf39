//! Client-side checks on identifiers before a request is built.
//!
//! These mirror constraints documented by the registry but are not
//! authoritative: input that passes may still be rejected by the server.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{RegistryError, Result};

/// Group IDs, artifact IDs and comment IDs: 1 to 512 arbitrary characters.
pub static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{1,512}$").expect("identifier pattern is valid"));

/// Version expressions: 1 to 256 of `[a-zA-Z0-9._+-]`.
pub static VERSION_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._\-+]{1,256}$").expect("version pattern is valid"));

/// Fail with `InvalidInput` unless `value` matches `pattern`.
pub fn validate(value: &str, pattern: &Regex, field: &'static str) -> Result<()> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(RegistryError::InvalidInput {
            field,
            value: value.to_string(),
        })
    }
}

pub fn validate_group_id(group_id: &str) -> Result<()> {
    validate(group_id, &IDENTIFIER, "Group ID")
}

pub fn validate_artifact_id(artifact_id: &str) -> Result<()> {
    validate(artifact_id, &IDENTIFIER, "Artifact ID")
}

pub fn validate_version(version_expression: &str) -> Result<()> {
    validate(version_expression, &VERSION_EXPRESSION, "Version Expression")
}

pub fn validate_comment_id(comment_id: &str) -> Result<()> {
    validate(comment_id, &IDENTIFIER, "Comment ID")
}

/// An empty hash would address `/ids/contentHashes/`, a different endpoint.
pub fn validate_content_hash(content_hash: &str) -> Result<()> {
    validate(content_hash, &IDENTIFIER, "Content Hash")
}

/// Group and artifact ID, the prefix of most artifact-scoped paths.
pub(crate) fn validate_artifact(group_id: &str, artifact_id: &str) -> Result<()> {
    validate_group_id(group_id)?;
    validate_artifact_id(artifact_id)
}

/// Group, artifact and version expression.
pub(crate) fn validate_artifact_version(group_id: &str, artifact_id: &str, version: &str) -> Result<()> {
    validate_artifact(group_id, artifact_id)?;
    validate_version(version)
}
