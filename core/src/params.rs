//! Optional query parameters, one struct per operation family.
//!
//! Every scalar field is an `Option`: `None` omits the key, while `Some(0)`,
//! `Some(false)` or `Some("")` are sent as given. Label filters are sent as a
//! single comma-joined value when the list is non-empty.

use crate::query::{QueryParams, ToQuery};
use crate::types::{ArtifactType, HandleReferences, IfExists, Order, OrderBy, RefType, State};

/// Filters for `GET /search/artifacts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArtifactsParams {
    pub name: Option<String>,
    pub offset: Option<u32>,
    /// Server default: 20.
    pub limit: Option<u32>,
    pub order: Option<Order>,
    pub order_by: Option<OrderBy>,
    /// `key` or `key:value` label filters.
    pub labels: Vec<String>,
    pub description: Option<String>,
    pub group_id: Option<String>,
    pub global_id: Option<i64>,
    pub content_id: Option<i64>,
    pub artifact_id: Option<String>,
    pub artifact_type: Option<ArtifactType>,
}

impl ToQuery for SearchArtifactsParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("name", self.name.as_ref());
        query.push_opt("offset", self.offset);
        query.push_opt("limit", self.limit);
        query.push_opt("order", self.order);
        query.push_opt("orderby", self.order_by);
        query.push_list("labels", &self.labels);
        query.push_opt("description", self.description.as_ref());
        query.push_opt("groupId", self.group_id.as_ref());
        query.push_opt("globalId", self.global_id);
        query.push_opt("contentId", self.content_id);
        query.push_opt("artifactId", self.artifact_id.as_ref());
        query.push_opt("artifactType", self.artifact_type);
        query
    }
}

/// Filters for `POST /search/artifacts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArtifactsByContentParams {
    /// Canonicalize the posted content before matching.
    pub canonical: Option<bool>,
    pub artifact_type: Option<ArtifactType>,
    pub group_id: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub order: Option<Order>,
    pub order_by: Option<OrderBy>,
}

impl ToQuery for SearchArtifactsByContentParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("canonical", self.canonical);
        query.push_opt("artifactType", self.artifact_type);
        query.push_opt("groupId", self.group_id.as_ref());
        query.push_opt("offset", self.offset);
        query.push_opt("limit", self.limit);
        query.push_opt("order", self.order);
        query.push_opt("orderby", self.order_by);
        query
    }
}

/// Options for `POST /groups/{groupId}/artifacts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArtifactParams {
    pub if_exists: Option<IfExists>,
    /// Canonicalize content when looking for an existing version.
    pub canonical: Option<bool>,
    /// Run the checks without persisting anything.
    pub dry_run: Option<bool>,
}

impl ToQuery for CreateArtifactParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("ifExists", self.if_exists);
        query.push_opt("canonical", self.canonical);
        query.push_opt("dryRun", self.dry_run);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArtifactReferencesByGlobalIdParams {
    pub ref_type: Option<RefType>,
}

impl ToQuery for ListArtifactReferencesByGlobalIdParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("refType", self.ref_type);
        query
    }
}

/// Paging and sorting for group listings and version listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArtifactsInGroupParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<Order>,
    pub order_by: Option<OrderBy>,
}

impl ToQuery for ListArtifactsInGroupParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("limit", self.limit);
        query.push_opt("offset", self.offset);
        query.push_opt("order", self.order);
        query.push_opt("orderby", self.order_by);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactVersionReferencesParams {
    pub ref_type: Option<RefType>,
}

impl ToQuery for ArtifactVersionReferencesParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("refType", self.ref_type);
        query
    }
}

/// Reference handling when fetching content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactReferenceParams {
    pub handle_references: Option<HandleReferences>,
}

impl ToQuery for ArtifactReferenceParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("references", self.handle_references);
        query
    }
}

/// Filters for `GET /search/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchVersionParams {
    pub version: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub order: Option<Order>,
    pub order_by: Option<OrderBy>,
    pub labels: Vec<String>,
    pub description: Option<String>,
    pub group_id: Option<String>,
    pub global_id: Option<i64>,
    pub content_id: Option<i64>,
    pub artifact_id: Option<String>,
    pub name: Option<String>,
    pub state: Option<State>,
    pub artifact_type: Option<ArtifactType>,
}

impl ToQuery for SearchVersionParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("version", self.version.as_ref());
        query.push_opt("offset", self.offset);
        query.push_opt("limit", self.limit);
        query.push_opt("order", self.order);
        query.push_opt("orderby", self.order_by);
        query.push_list("labels", &self.labels);
        query.push_opt("description", self.description.as_ref());
        query.push_opt("groupId", self.group_id.as_ref());
        query.push_opt("globalId", self.global_id);
        query.push_opt("contentId", self.content_id);
        query.push_opt("artifactId", self.artifact_id.as_ref());
        query.push_opt("name", self.name.as_ref());
        query.push_opt("state", self.state);
        query.push_opt("artifactType", self.artifact_type);
        query
    }
}

/// Filters for `POST /search/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchVersionByContentParams {
    pub canonical: Option<bool>,
    pub artifact_type: Option<ArtifactType>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub order: Option<Order>,
    pub order_by: Option<OrderBy>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
}

impl ToQuery for SearchVersionByContentParams {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("canonical", self.canonical);
        query.push_opt("artifactType", self.artifact_type);
        query.push_opt("offset", self.offset);
        query.push_opt("limit", self.limit);
        query.push_opt("order", self.order);
        query.push_opt("orderby", self.order_by);
        query.push_opt("groupId", self.group_id.as_ref());
        query.push_opt("artifactId", self.artifact_id.as_ref());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_render_no_keys() {
        assert!(SearchArtifactsParams::default().to_query().is_empty());
        assert!(SearchVersionParams::default().to_query().is_empty());
        assert!(CreateArtifactParams::default().to_query().is_empty());
        assert!(None::<ListArtifactsInGroupParams>.to_query().is_empty());
    }

    #[test]
    fn search_artifacts_uses_stable_key_names() {
        let params = SearchArtifactsParams {
            name: Some("orders".to_string()),
            limit: Some(5),
            order: Some(Order::Desc),
            order_by: Some(OrderBy::CreatedOn),
            labels: vec!["env:prod".to_string(), "team".to_string()],
            global_id: Some(42),
            artifact_type: Some(ArtifactType::Avro),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(
            query.encode(),
            "name=orders&limit=5&order=desc&orderby=createdOn&labels=env%3Aprod%2Cteam&globalId=42&artifactType=AVRO"
        );
    }

    #[test]
    fn explicit_zero_values_are_sent() {
        let params = SearchVersionByContentParams {
            canonical: Some(false),
            offset: Some(0),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(query.get("canonical"), Some("false"));
        assert_eq!(query.get("offset"), Some("0"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn create_artifact_params_render_flags() {
        let params = CreateArtifactParams {
            if_exists: Some(IfExists::FindOrCreateVersion),
            canonical: Some(true),
            dry_run: Some(true),
        };
        assert_eq!(
            params.to_query().encode(),
            "ifExists=FIND_OR_CREATE_VERSION&canonical=true&dryRun=true"
        );
    }

    #[test]
    fn reference_params_use_their_keys() {
        let refs = ArtifactVersionReferencesParams {
            ref_type: Some(RefType::Inbound),
        };
        assert_eq!(refs.to_query().get("refType"), Some("INBOUND"));

        let handling = ArtifactReferenceParams {
            handle_references: Some(HandleReferences::Dereference),
        };
        assert_eq!(handling.to_query().get("references"), Some("DEREFERENCE"));
    }

    #[test]
    fn search_versions_includes_state() {
        let params = SearchVersionParams {
            artifact_id: Some("orders".to_string()),
            state: Some(State::Deprecated),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(query.get("artifactId"), Some("orders"));
        assert_eq!(query.get("state"), Some("DEPRECATED"));
    }
}
