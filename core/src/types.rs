//! Wire enums and DTOs for the registry REST API.
//!
//! # Design
//! Closed string sets (artifact types, states, rules, ...) are Rust enums that
//! serialize to their registry spelling and parse back with `FromStr`.
//! Shared metadata fields are composed with `#[serde(flatten)]` so the JSON
//! stays flat while the Rust types stay small.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A string that does not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Schema format of an artifact.
    ArtifactType, "artifact type" {
        Avro => "AVRO",
        Protobuf => "PROTOBUF",
        Json => "JSON",
        /// Kafka Connect schema.
        KConnect => "KCONNECT",
        OpenApi => "OPENAPI",
        AsyncApi => "ASYNCAPI",
        GraphQl => "GRAPHQL",
        Wsdl => "WSDL",
        Xsd => "XSD",
    }
}

wire_enum! {
    /// Lifecycle state of an artifact version.
    State, "state" {
        Enabled => "ENABLED",
        Disabled => "DISABLED",
        Deprecated => "DEPRECATED",
        Draft => "DRAFT",
    }
}

wire_enum! {
    Order, "order" {
        Asc => "asc",
        Desc => "desc",
    }
}

wire_enum! {
    /// Field used to sort search and list results.
    OrderBy, "order-by field" {
        GroupId => "groupId",
        ArtifactId => "artifactId",
        Version => "version",
        Name => "name",
        CreatedOn => "createdOn",
        ModifiedOn => "modifiedOn",
        GlobalId => "globalId",
    }
}

wire_enum! {
    /// Server behaviour when creating an artifact that already exists.
    IfExists, "ifExists behaviour" {
        /// Reject with 409. Server default.
        Fail => "FAIL",
        CreateVersion => "CREATE_VERSION",
        /// Return a version with matching content, or create one.
        FindOrCreateVersion => "FIND_OR_CREATE_VERSION",
    }
}

wire_enum! {
    /// How references inside fetched content are handled.
    HandleReferences, "reference handling" {
        Preserve => "PRESERVE",
        Dereference => "DEREFERENCE",
        Rewrite => "REWRITE",
    }
}

wire_enum! {
    RefType, "reference type" {
        Outbound => "OUTBOUND",
        Inbound => "INBOUND",
    }
}

wire_enum! {
    /// Registry-enforced rule kind.
    Rule, "rule" {
        Validity => "VALIDITY",
        Compatibility => "COMPATIBILITY",
        Integrity => "INTEGRITY",
    }
}

wire_enum! {
    /// Configuration value of a rule. Which levels apply depends on the rule:
    /// validity takes `NONE`/`SYNTAX_ONLY`/`FULL`, integrity takes
    /// `NONE`/`REFS_EXIST`/`ALL_REFS_MAPPED`/`NO_DUPLICATES`/`FULL`, and
    /// compatibility takes the backward/forward/full family.
    RuleLevel, "rule level" {
        None => "NONE",
        SyntaxOnly => "SYNTAX_ONLY",
        Full => "FULL",
        Backward => "BACKWARD",
        BackwardTransitive => "BACKWARD_TRANSITIVE",
        Forward => "FORWARD",
        ForwardTransitive => "FORWARD_TRANSITIVE",
        FullTransitive => "FULL_TRANSITIVE",
        RefsExist => "REFS_EXIST",
        AllRefsMapped => "ALL_REFS_MAPPED",
        NoDuplicates => "NO_DUPLICATES",
    }
}

pub type Labels = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Decode a JSON `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactReference {
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// One entry of an artifact search or list result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchedArtifact {
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Registry spelling of the type. Custom types are kept as sent; parse
    /// into [`ArtifactType`] for the built-in ones.
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_on: String,
}

/// Raw schema content paired with the type announced by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactContent {
    pub content: String,
    pub artifact_type: ArtifactType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Labels,
}

/// Fields shared by artifact and artifact-version metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactMetadata {
    #[serde(flatten)]
    pub base: BaseMetadata,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_on: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactVersionMetadata {
    #[serde(flatten)]
    pub base: BaseMetadata,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub global_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub content_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactComment {
    #[serde(deserialize_with = "null_as_default")]
    pub comment_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,
}

/// Minimal identifying information about one artifact version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactVersion {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub global_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    #[serde(deserialize_with = "null_as_default")]
    pub content_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub modified_by: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub modified_on: String,
}

/// An artifact version together with its editable metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactVersionDetailed {
    #[serde(flatten)]
    pub version: ArtifactVersion,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(skip_serializing_if = "Labels::is_empty", deserialize_with = "null_as_default")]
    pub labels: Labels,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Payload for creating an artifact, optionally with its first version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactRequest {
    /// Left empty, the registry generates an ID.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub artifact_id: String,
    pub artifact_type: ArtifactType,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(skip_serializing_if = "Labels::is_empty", default)]
    pub labels: Labels,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_version: Option<CreateVersionRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub version: String,
    pub content: CreateContentRequest,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(skip_serializing_if = "Labels::is_empty", default)]
    pub labels: Labels,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub references: Vec<ArtifactReference>,
    /// MIME type of `content`, e.g. `application/json`.
    pub content_type: String,
}

/// Editable metadata. Empty fields are omitted and left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateArtifactMetadataRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRequest {
    pub state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    pub rule_type: Rule,
    pub config: RuleLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub value: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchArtifactsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub artifacts: Vec<SearchedArtifact>,
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
}

/// Listing the artifacts of a group returns the search shape.
pub type ListArtifactsResponse = SearchArtifactsResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateArtifactResponse {
    pub artifact: ArtifactDetail,
    /// Present when the request carried a first version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ArtifactVersionMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactVersionListResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub versions: Vec<ArtifactVersion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    pub state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub rule_type: Rule,
    pub config: RuleLevel,
}
