//! Artifact search, listing, content lookup, creation, deletion and
//! artifact-level rules.

use crate::client::RegistryClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::params::{
    ArtifactReferenceParams, CreateArtifactParams, ListArtifactReferencesByGlobalIdParams,
    ListArtifactsInGroupParams, SearchArtifactsByContentParams, SearchArtifactsParams,
};
use crate::query::{QueryParams, ToQuery};
use crate::request::RequestBody;
use crate::types::{
    ArtifactContent, ArtifactReference, CreateArtifactRequest, CreateArtifactResponse,
    ListArtifactsResponse, Rule, RuleLevel, RuleRequest, RuleResponse, SearchArtifactsResponse,
};
use crate::validation::{validate_artifact, validate_content_hash, validate_group_id};

/// Artifact operations, obtained from [`RegistryClient::artifacts`].
#[derive(Debug, Clone, Copy)]
pub struct ArtifactsApi<'a> {
    client: &'a RegistryClient,
}

impl<'a> ArtifactsApi<'a> {
    pub(crate) fn new(client: &'a RegistryClient) -> Self {
        Self { client }
    }

    /// `GET /search/artifacts`
    pub fn search(&self, params: Option<&SearchArtifactsParams>) -> Result<SearchArtifactsResponse> {
        let url = self.client.url(&["search", "artifacts"], &params.to_query());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `POST /search/artifacts`: artifacts with at least one version whose
    /// content matches `content`.
    pub fn search_by_content(
        &self,
        content: impl Into<Vec<u8>>,
        params: Option<&SearchArtifactsByContentParams>,
    ) -> Result<SearchArtifactsResponse> {
        let url = self.client.url(&["search", "artifacts"], &params.to_query());
        self.client
            .call(HttpMethod::Post, url, Some(RequestBody::raw(content)), 200)
    }

    /// `GET /ids/contentIds/{contentId}/references`
    pub fn list_references_by_content_id(&self, content_id: i64) -> Result<Vec<ArtifactReference>> {
        let id = content_id.to_string();
        let url = self
            .client
            .url(&["ids", "contentIds", &id, "references"], &QueryParams::new());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `GET /ids/globalIds/{globalId}/references`
    pub fn list_references_by_global_id(
        &self,
        global_id: i64,
        params: Option<&ListArtifactReferencesByGlobalIdParams>,
    ) -> Result<Vec<ArtifactReference>> {
        let id = global_id.to_string();
        let url = self
            .client
            .url(&["ids", "globalIds", &id, "references"], &params.to_query());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `GET /ids/contentHashes/{contentHash}/references`
    pub fn list_references_by_hash(&self, content_hash: &str) -> Result<Vec<ArtifactReference>> {
        validate_content_hash(content_hash)?;
        let url = self
            .client
            .url(&["ids", "contentHashes", content_hash, "references"], &QueryParams::new());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `GET /groups/{groupId}/artifacts`
    pub fn list_in_group(
        &self,
        group_id: &str,
        params: Option<&ListArtifactsInGroupParams>,
    ) -> Result<ListArtifactsResponse> {
        validate_group_id(group_id)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts"], &params.to_query());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `GET /ids/contentHashes/{contentHash}`: content by its SHA-256 hash.
    pub fn content_by_hash(&self, content_hash: &str) -> Result<ArtifactContent> {
        validate_content_hash(content_hash)?;
        let url = self
            .client
            .url(&["ids", "contentHashes", content_hash], &QueryParams::new());
        self.client.call_content(url)
    }

    /// `GET /ids/contentIds/{contentId}`
    pub fn content_by_id(&self, content_id: i64) -> Result<ArtifactContent> {
        let id = content_id.to_string();
        let url = self.client.url(&["ids", "contentIds", &id], &QueryParams::new());
        self.client.call_content(url)
    }

    /// `GET /ids/globalIds/{globalId}`
    pub fn content_by_global_id(
        &self,
        global_id: i64,
        params: Option<&ArtifactReferenceParams>,
    ) -> Result<ArtifactContent> {
        let id = global_id.to_string();
        let url = self.client.url(&["ids", "globalIds", &id], &params.to_query());
        self.client.call_content(url)
    }

    /// `DELETE /groups/{groupId}/artifacts`
    pub fn delete_in_group(&self, group_id: &str) -> Result<()> {
        validate_group_id(group_id)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts"], &QueryParams::new());
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    /// `DELETE /groups/{groupId}/artifacts/{artifactId}`, with all versions.
    /// Servers with deletion disabled answer 405.
    pub fn delete(&self, group_id: &str, artifact_id: &str) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts", artifact_id], &QueryParams::new());
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    /// `POST /groups/{groupId}/artifacts`
    pub fn create(
        &self,
        group_id: &str,
        request: &CreateArtifactRequest,
        params: Option<&CreateArtifactParams>,
    ) -> Result<CreateArtifactResponse> {
        validate_group_id(group_id)?;
        let body = RequestBody::json(request)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts"], &params.to_query());
        self.client.call(HttpMethod::Post, url, Some(body), 200)
    }

    /// `GET /groups/{groupId}/artifacts/{artifactId}/rules`
    pub fn list_rules(&self, group_id: &str, artifact_id: &str) -> Result<Vec<Rule>> {
        validate_artifact(group_id, artifact_id)?;
        let url = self.rules_url(group_id, artifact_id, None);
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// `POST /groups/{groupId}/artifacts/{artifactId}/rules`
    pub fn create_rule(&self, group_id: &str, artifact_id: &str, rule: Rule, level: RuleLevel) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let body = RequestBody::json(&RuleRequest {
            rule_type: rule,
            config: level,
        })?;
        let url = self.rules_url(group_id, artifact_id, None);
        self.client.call_empty(HttpMethod::Post, url, Some(body), 204)
    }

    /// `DELETE /groups/{groupId}/artifacts/{artifactId}/rules`
    pub fn delete_all_rules(&self, group_id: &str, artifact_id: &str) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let url = self.rules_url(group_id, artifact_id, None);
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    /// `GET /groups/{groupId}/artifacts/{artifactId}/rules/{rule}`
    pub fn get_rule(&self, group_id: &str, artifact_id: &str, rule: Rule) -> Result<RuleLevel> {
        validate_artifact(group_id, artifact_id)?;
        let url = self.rules_url(group_id, artifact_id, Some(rule));
        let response: RuleResponse = self.client.call(HttpMethod::Get, url, None, 200)?;
        Ok(response.config)
    }

    /// `PUT /groups/{groupId}/artifacts/{artifactId}/rules/{rule}`
    pub fn update_rule(&self, group_id: &str, artifact_id: &str, rule: Rule, level: RuleLevel) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let body = RequestBody::json(&RuleRequest {
            rule_type: rule,
            config: level,
        })?;
        let url = self.rules_url(group_id, artifact_id, Some(rule));
        let _: RuleResponse = self.client.call(HttpMethod::Put, url, Some(body), 200)?;
        Ok(())
    }

    /// `DELETE /groups/{groupId}/artifacts/{artifactId}/rules/{rule}`
    pub fn delete_rule(&self, group_id: &str, artifact_id: &str, rule: Rule) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let url = self.rules_url(group_id, artifact_id, Some(rule));
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    fn rules_url(&self, group_id: &str, artifact_id: &str, rule: Option<Rule>) -> String {
        let mut segments = vec!["groups", group_id, "artifacts", artifact_id, "rules"];
        if let Some(rule) = rule {
            segments.push(rule.as_str());
        }
        self.client.url(&segments, &QueryParams::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::response::ARTIFACT_TYPE_HEADER;
    use crate::transport::testing::FakeTransport;
    use crate::types::{ArtifactType, IfExists};
    use crate::RegistryError;

    const BASE: &str = "http://localhost:8080/apis/registry/v3";

    fn client(transport: &FakeTransport) -> RegistryClient {
        RegistryClient::builder(BASE).transport(transport.clone()).build()
    }

    #[test]
    fn search_renders_query() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            200,
            r#"{"artifacts":[{"groupId":"g","artifactId":"a","artifactType":"AVRO"}],"count":1}"#,
        ));
        let params = SearchArtifactsParams {
            name: Some("orders".to_string()),
            limit: Some(10),
            ..Default::default()
        };

        let result = client(&transport).artifacts().search(Some(&params)).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.artifacts[0].artifact_type, "AVRO");
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, format!("{BASE}/search/artifacts?name=orders&limit=10"));
    }

    #[test]
    fn search_by_content_sends_raw_body() {
        let transport = FakeTransport::new().respond(HttpResponse::new(200, r#"{"artifacts":[],"count":0}"#));
        let content = r#"{"type":"string"}"#;

        client(&transport).artifacts().search_by_content(content, None).unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some("*/*"));
        assert_eq!(request.body.as_deref(), Some(content.as_bytes()));
    }

    #[test]
    fn reference_lookups_use_id_paths() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, r#"[{"groupId":"g","artifactId":"ref","version":"1"}]"#))
            .respond(HttpResponse::new(200, "[]"))
            .respond(HttpResponse::new(200, "[]"));
        let api_client = client(&transport);
        let api = api_client.artifacts();

        let refs = api.list_references_by_content_id(12).unwrap();
        assert_eq!(refs[0].artifact_id, "ref");
        api.list_references_by_global_id(
            7,
            Some(&ListArtifactReferencesByGlobalIdParams {
                ref_type: Some(crate::types::RefType::Outbound),
            }),
        )
        .unwrap();
        api.list_references_by_hash("abc123").unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{BASE}/ids/contentIds/12/references"),
                format!("{BASE}/ids/globalIds/7/references?refType=OUTBOUND"),
                format!("{BASE}/ids/contentHashes/abc123/references"),
            ]
        );
    }

    #[test]
    fn content_by_id_reads_artifact_type_header() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, "syntax = \"proto3\";").with_header(ARTIFACT_TYPE_HEADER, "PROTOBUF"));

        let content = client(&transport).artifacts().content_by_id(3).unwrap();

        assert_eq!(content.artifact_type, ArtifactType::Protobuf);
        assert_eq!(content.content, "syntax = \"proto3\";");
        assert_eq!(transport.last_request().url, format!("{BASE}/ids/contentIds/3"));
    }

    #[test]
    fn content_by_hash_not_found_is_api_error() {
        let transport =
            FakeTransport::new().respond(HttpResponse::new(404, r#"{"status":404,"title":"Not found"}"#));
        let err = client(&transport).artifacts().content_by_hash("deadbeef").unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn create_sends_json_and_params() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            200,
            r#"{"artifact":{"groupId":"g","artifactId":"a","artifactType":"JSON"}}"#,
        ));
        let request = CreateArtifactRequest {
            artifact_id: "a".to_string(),
            artifact_type: ArtifactType::Json,
            name: String::new(),
            description: String::new(),
            labels: Default::default(),
            first_version: None,
        };
        let params = CreateArtifactParams {
            if_exists: Some(IfExists::CreateVersion),
            ..Default::default()
        };

        let response = client(&transport).artifacts().create("g", &request, Some(&params)).unwrap();

        assert_eq!(response.artifact.artifact_id, "a");
        let sent = transport.last_request();
        assert_eq!(sent.url, format!("{BASE}/groups/g/artifacts?ifExists=CREATE_VERSION"));
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["artifactType"], "JSON");
    }

    #[test]
    fn invalid_group_sends_nothing() {
        let transport = FakeTransport::new();
        let err = client(&transport).artifacts().delete_in_group("").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { field: "Group ID", .. }));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn empty_content_hash_sends_nothing() {
        let transport = FakeTransport::new();
        let api_client = client(&transport);
        let api = api_client.artifacts();

        let err = api.content_by_hash("").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { field: "Content Hash", .. }));
        let err = api.list_references_by_hash("").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { field: "Content Hash", .. }));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn delete_method_not_allowed_is_plain_api_error() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            405,
            r#"{"status":405,"title":"Method not allowed"}"#,
        ));
        let err = client(&transport).artifacts().delete("g", "a").unwrap_err();
        assert_eq!(err.status(), Some(405));
    }

    #[test]
    fn rule_operations_hit_rule_paths() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, r#"["VALIDITY"]"#))
            .respond(HttpResponse::new(204, ""))
            .respond(HttpResponse::new(200, r#"{"ruleType":"VALIDITY","config":"SYNTAX_ONLY"}"#))
            .respond(HttpResponse::new(200, r#"{"ruleType":"VALIDITY","config":"FULL"}"#))
            .respond(HttpResponse::new(204, ""))
            .respond(HttpResponse::new(204, ""));
        let api_client = client(&transport);
        let api = api_client.artifacts();

        assert_eq!(api.list_rules("g", "a").unwrap(), vec![Rule::Validity]);
        api.create_rule("g", "a", Rule::Validity, RuleLevel::SyntaxOnly).unwrap();
        assert_eq!(api.get_rule("g", "a", Rule::Validity).unwrap(), RuleLevel::SyntaxOnly);
        api.update_rule("g", "a", Rule::Validity, RuleLevel::Full).unwrap();
        api.delete_rule("g", "a", Rule::Validity).unwrap();
        api.delete_all_rules("g", "a").unwrap();

        let sent: Vec<(HttpMethod, String)> = transport.requests().into_iter().map(|r| (r.method, r.url)).collect();
        let rules = format!("{BASE}/groups/g/artifacts/a/rules");
        assert_eq!(
            sent,
            vec![
                (HttpMethod::Get, rules.clone()),
                (HttpMethod::Post, rules.clone()),
                (HttpMethod::Get, format!("{rules}/VALIDITY")),
                (HttpMethod::Put, format!("{rules}/VALIDITY")),
                (HttpMethod::Delete, format!("{rules}/VALIDITY")),
                (HttpMethod::Delete, rules),
            ]
        );
    }
}
