//! Wire shapes accepted by the mock. Kept independent of the client crate so
//! the integration tests catch schema drift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Labels = BTreeMap<String, String>;

pub const ARTIFACT_TYPES: &[&str] = &[
    "AVRO", "PROTOBUF", "JSON", "KCONNECT", "OPENAPI", "ASYNCAPI", "GRAPHQL", "WSDL", "XSD",
];
pub const STATES: &[&str] = &["ENABLED", "DISABLED", "DEPRECATED", "DRAFT"];
pub const RULES: &[&str] = &["VALIDITY", "COMPATIBILITY", "INTEGRITY"];
pub const RULE_LEVELS: &[&str] = &[
    "NONE",
    "SYNTAX_ONLY",
    "FULL",
    "BACKWARD",
    "BACKWARD_TRANSITIVE",
    "FORWARD",
    "FORWARD_TRANSITIVE",
    "FULL_TRANSITIVE",
    "REFS_EXIST",
    "ALL_REFS_MAPPED",
    "NO_DUPLICATES",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifact {
    #[serde(default)]
    pub artifact_id: String,
    pub artifact_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Labels,
    pub first_version: Option<CreateVersion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersion {
    #[serde(default)]
    pub version: String,
    pub content: CreateContent,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContent {
    pub content: String,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub content_type: String,
}

/// Metadata edits; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub labels: Option<Labels>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateBody {
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBody {
    pub rule_type: String,
    pub config: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    pub value: String,
}

/// Every filter, paging and ordering key understood by the search and list
/// endpoints. Each endpoint reads the subset it supports.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub artifact_type: Option<String>,
    pub state: Option<String>,
    pub labels: Option<String>,
    pub global_id: Option<i64>,
    pub content_id: Option<i64>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub order: Option<String>,
    #[serde(rename = "orderby")]
    pub order_by: Option<String>,
    pub canonical: Option<bool>,
}

impl SearchQuery {
    /// `key` or `key:value` filters from the comma-joined `labels` value.
    pub fn label_filters(&self) -> Vec<(String, Option<String>)> {
        self.labels
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|f| !f.is_empty())
            .map(|f| match f.split_once(':') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => (f.to_string(), None),
            })
            .collect()
    }

    pub fn descending(&self) -> bool {
        self.order.as_deref() == Some("desc")
    }

    pub fn window(&self) -> (usize, usize) {
        (self.offset.unwrap_or(0), self.limit.unwrap_or(20))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArtifactQuery {
    pub if_exists: Option<String>,
    pub canonical: Option<bool>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DryRunQuery {
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefTypeQuery {
    pub ref_type: Option<String>,
}

pub fn labels_match(labels: &Labels, filters: &[(String, Option<String>)]) -> bool {
    filters.iter().all(|(key, value)| match (labels.get(key), value) {
        (Some(actual), Some(wanted)) => actual == wanted,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_artifact_defaults_optional_fields() {
        let input: CreateArtifact = serde_json::from_str(r#"{"artifactType":"AVRO"}"#).unwrap();
        assert!(input.artifact_id.is_empty());
        assert!(input.first_version.is_none());
    }

    #[test]
    fn create_artifact_rejects_missing_type() {
        let result: Result<CreateArtifact, _> = serde_json::from_str(r#"{"artifactId":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn label_filters_split_keys_and_values() {
        let query = SearchQuery {
            labels: Some("env:prod,team".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.label_filters(),
            vec![
                ("env".to_string(), Some("prod".to_string())),
                ("team".to_string(), None)
            ]
        );
    }

    #[test]
    fn labels_match_requires_every_filter() {
        let labels: Labels = [("env".to_string(), "prod".to_string())].into();
        assert!(labels_match(&labels, &[("env".to_string(), None)]));
        assert!(labels_match(&labels, &[("env".to_string(), Some("prod".to_string()))]));
        assert!(!labels_match(&labels, &[("env".to_string(), Some("dev".to_string()))]));
        assert!(!labels_match(&labels, &[("team".to_string(), None)]));
    }
}
