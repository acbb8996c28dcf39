//! Artifact versions: listing, creation, content, references, comments,
//! state and version search.

use crate::client::RegistryClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::params::{
    ArtifactReferenceParams, ArtifactVersionReferencesParams, ListArtifactsInGroupParams,
    SearchVersionByContentParams, SearchVersionParams,
};
use crate::query::{QueryParams, ToQuery};
use crate::request::RequestBody;
use crate::types::{
    ArtifactComment, ArtifactContent, ArtifactReference, ArtifactVersion, ArtifactVersionDetailed,
    ArtifactVersionListResponse, CommentRequest, CreateContentRequest, CreateVersionRequest, State,
    StateRequest, StateResponse,
};
use crate::validation::{validate_artifact, validate_artifact_version, validate_comment_id};

/// Version operations, obtained from [`RegistryClient::versions`].
#[derive(Debug, Clone, Copy)]
pub struct VersionsApi<'a> {
    client: &'a RegistryClient,
}

impl<'a> VersionsApi<'a> {
    pub(crate) fn new(client: &'a RegistryClient) -> Self {
        Self { client }
    }

    /// `DELETE /groups/{groupId}/artifacts/{artifactId}/versions/{version}`
    pub fn delete(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.version_url(group_id, artifact_id, version, &[], &QueryParams::new());
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    /// References declared by one version.
    pub fn references(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        params: Option<&ArtifactVersionReferencesParams>,
    ) -> Result<Vec<ArtifactReference>> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.version_url(group_id, artifact_id, version, &["references"], &params.to_query());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    pub fn comments(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Vec<ArtifactComment>> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.version_url(group_id, artifact_id, version, &["comments"], &QueryParams::new());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// Attach a comment; the registry assigns its ID.
    pub fn add_comment(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        value: &str,
    ) -> Result<ArtifactComment> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let body = RequestBody::json(&CommentRequest {
            value: value.to_string(),
        })?;
        let url = self.version_url(group_id, artifact_id, version, &["comments"], &QueryParams::new());
        self.client.call(HttpMethod::Post, url, Some(body), 200)
    }

    pub fn update_comment(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        comment_id: &str,
        value: &str,
    ) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        validate_comment_id(comment_id)?;
        let body = RequestBody::json(&CommentRequest {
            value: value.to_string(),
        })?;
        let url = self.version_url(group_id, artifact_id, version, &["comments", comment_id], &QueryParams::new());
        self.client.call_empty(HttpMethod::Put, url, Some(body), 204)
    }

    pub fn delete_comment(&self, group_id: &str, artifact_id: &str, version: &str, comment_id: &str) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        validate_comment_id(comment_id)?;
        let url = self.version_url(group_id, artifact_id, version, &["comments", comment_id], &QueryParams::new());
        self.client.call_empty(HttpMethod::Delete, url, None, 204)
    }

    /// All versions of an artifact. Read-only: calling it twice yields the
    /// same list.
    pub fn list(
        &self,
        group_id: &str,
        artifact_id: &str,
        params: Option<&ListArtifactsInGroupParams>,
    ) -> Result<Vec<ArtifactVersion>> {
        validate_artifact(group_id, artifact_id)?;
        let url = self.versions_url(group_id, artifact_id, &params.to_query());
        let response: ArtifactVersionListResponse = self.client.call(HttpMethod::Get, url, None, 200)?;
        Ok(response.versions)
    }

    /// Create a version. With `dry_run` the registry validates without
    /// persisting anything.
    pub fn create(
        &self,
        group_id: &str,
        artifact_id: &str,
        request: &CreateVersionRequest,
        dry_run: bool,
    ) -> Result<ArtifactVersionDetailed> {
        validate_artifact(group_id, artifact_id)?;
        let body = RequestBody::json(request)?;
        let url = self.versions_url(group_id, artifact_id, &dry_run_query(dry_run));
        self.client.call(HttpMethod::Post, url, Some(body), 200)
    }

    /// Raw content of one version with its artifact type.
    pub fn content(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        params: Option<&ArtifactReferenceParams>,
    ) -> Result<ArtifactContent> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.version_url(group_id, artifact_id, version, &["content"], &params.to_query());
        self.client.call_content(url)
    }

    /// Replace the content of a draft version.
    pub fn update_content(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        content: &CreateContentRequest,
    ) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let body = RequestBody::json(content)?;
        let url = self.version_url(group_id, artifact_id, version, &["content"], &QueryParams::new());
        self.client.call_empty(HttpMethod::Put, url, Some(body), 204)
    }

    /// `GET /search/versions`
    pub fn search(&self, params: Option<&SearchVersionParams>) -> Result<Vec<ArtifactVersion>> {
        let url = self.client.url(&["search", "versions"], &params.to_query());
        let response: ArtifactVersionListResponse = self.client.call(HttpMethod::Get, url, None, 200)?;
        Ok(response.versions)
    }

    /// `POST /search/versions`: versions whose content matches `content`.
    pub fn search_by_content(
        &self,
        content: impl Into<Vec<u8>>,
        params: Option<&SearchVersionByContentParams>,
    ) -> Result<Vec<ArtifactVersion>> {
        let url = self.client.url(&["search", "versions"], &params.to_query());
        let response: ArtifactVersionListResponse =
            self.client
                .call(HttpMethod::Post, url, Some(RequestBody::raw(content)), 200)?;
        Ok(response.versions)
    }

    pub fn state(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<State> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.version_url(group_id, artifact_id, version, &["state"], &QueryParams::new());
        let response: StateResponse = self.client.call(HttpMethod::Get, url, None, 200)?;
        Ok(response.state)
    }

    pub fn update_state(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        state: State,
        dry_run: bool,
    ) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let body = RequestBody::json(&StateRequest { state })?;
        let url = self.version_url(group_id, artifact_id, version, &["state"], &dry_run_query(dry_run));
        self.client.call_empty(HttpMethod::Put, url, Some(body), 204)
    }

    fn versions_url(&self, group_id: &str, artifact_id: &str, query: &QueryParams) -> String {
        self.client
            .url(&["groups", group_id, "artifacts", artifact_id, "versions"], query)
    }

    fn version_url(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        tail: &[&str],
        query: &QueryParams,
    ) -> String {
        let mut segments = vec!["groups", group_id, "artifacts", artifact_id, "versions", version];
        segments.extend_from_slice(tail);
        self.client.url(&segments, query)
    }
}

/// `dryRun=true` when set; the registry treats an absent flag as false.
fn dry_run_query(dry_run: bool) -> QueryParams {
    let mut query = QueryParams::new();
    if dry_run {
        query.push("dryRun", true);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::response::ARTIFACT_TYPE_HEADER;
    use crate::transport::testing::FakeTransport;
    use crate::types::{ArtifactType, HandleReferences};
    use crate::RegistryError;

    const BASE: &str = "http://registry/apis/registry/v3";

    fn client(transport: &FakeTransport) -> RegistryClient {
        RegistryClient::builder(BASE).transport(transport.clone()).build()
    }

    const VERSIONS: &str = r#"{"count":2,"versions":[
        {"version":"1","globalId":1,"contentId":1,"artifactId":"a","artifactType":"AVRO","state":"ENABLED"},
        {"version":"2","globalId":2,"contentId":2,"artifactId":"a","artifactType":"AVRO","state":"DRAFT"}
    ]}"#;

    #[test]
    fn list_unwraps_versions_and_is_repeatable() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, VERSIONS))
            .respond(HttpResponse::new(200, VERSIONS));
        let client = client(&transport);

        let first = client.versions().list("g", "a", None).unwrap();
        let second = client.versions().list("g", "a", None).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].state, Some(State::Draft));
        assert_eq!(transport.last_request().url, format!("{BASE}/groups/g/artifacts/a/versions"));
    }

    #[test]
    fn create_sends_dry_run_flag() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            200,
            r#"{"version":"3","globalId":9,"contentId":4,"artifactId":"a","name":"third"}"#,
        ));
        let request = CreateVersionRequest {
            version: "3".to_string(),
            content: CreateContentRequest {
                content: "{}".to_string(),
                references: Vec::new(),
                content_type: "application/json".to_string(),
            },
            ..Default::default()
        };

        let created = client(&transport).versions().create("g", "a", &request, true).unwrap();

        assert_eq!(created.version.global_id, 9);
        assert_eq!(created.name, "third");
        assert_eq!(
            transport.last_request().url,
            format!("{BASE}/groups/g/artifacts/a/versions?dryRun=true")
        );
    }

    #[test]
    fn invalid_version_expression_sends_nothing() {
        let transport = FakeTransport::new();
        let err = client(&transport).versions().state("g", "a", "1 0").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { field: "Version Expression", .. }));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn content_carries_reference_handling() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, "{}").with_header(ARTIFACT_TYPE_HEADER, "JSON"));
        let params = ArtifactReferenceParams {
            handle_references: Some(HandleReferences::Dereference),
        };

        let content = client(&transport).versions().content("g", "a", "1", Some(&params)).unwrap();

        assert_eq!(content.artifact_type, ArtifactType::Json);
        assert_eq!(
            transport.last_request().url,
            format!("{BASE}/groups/g/artifacts/a/versions/1/content?references=DEREFERENCE")
        );
    }

    #[test]
    fn comment_lifecycle_paths() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(200, r#"{"commentId":"c1","value":"looks good"}"#))
            .respond(HttpResponse::new(204, ""))
            .respond(HttpResponse::new(200, r#"[{"commentId":"c1","value":"updated"}]"#))
            .respond(HttpResponse::new(204, ""));
        let client = client(&transport);
        let versions = client.versions();

        let comment = versions.add_comment("g", "a", "1", "looks good").unwrap();
        versions.update_comment("g", "a", "1", &comment.comment_id, "updated").unwrap();
        let comments = versions.comments("g", "a", "1").unwrap();
        versions.delete_comment("g", "a", "1", "c1").unwrap();

        assert_eq!(comments[0].value, "updated");
        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].body.as_deref(), Some(br#"{"value":"looks good"}"#.as_slice()));
        assert_eq!(requests[1].url, format!("{BASE}/groups/g/artifacts/a/versions/1/comments/c1"));
        assert_eq!(requests[3].method, HttpMethod::Delete);
    }

    #[test]
    fn state_round_trip() {
        let transport = FakeTransport::new()
            .respond(HttpResponse::new(204, ""))
            .respond(HttpResponse::new(200, r#"{"state":"DEPRECATED"}"#));
        let client = client(&transport);

        client
            .versions()
            .update_state("g", "a", "1", State::Deprecated, false)
            .unwrap();
        assert_eq!(client.versions().state("g", "a", "1").unwrap(), State::Deprecated);

        let update = &transport.requests()[0];
        assert_eq!(update.url, format!("{BASE}/groups/g/artifacts/a/versions/1/state"));
        assert_eq!(update.body.as_deref(), Some(br#"{"state":"DEPRECATED"}"#.as_slice()));
    }

    #[test]
    fn search_by_content_posts_raw() {
        let transport = FakeTransport::new().respond(HttpResponse::new(200, VERSIONS));
        let params = SearchVersionByContentParams {
            artifact_id: Some("a".to_string()),
            ..Default::default()
        };

        let found = client(&transport)
            .versions()
            .search_by_content("syntax = \"proto3\";", Some(&params))
            .unwrap();

        assert_eq!(found.len(), 2);
        let request = transport.last_request();
        assert_eq!(request.url, format!("{BASE}/search/versions?artifactId=a"));
        assert_eq!(request.header("Content-Type"), Some("*/*"));
    }

    #[test]
    fn server_error_without_problem_body() {
        let transport = FakeTransport::new().respond(HttpResponse::new(500, "<html>oops</html>"));
        let err = client(&transport).versions().search(None).unwrap_err();
        assert!(matches!(err, RegistryError::UnexpectedServerError { status: 500, .. }));
    }
}
