use crate::client::RegistryClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::request::RequestBody;
use crate::types::{ArtifactMetadata, ArtifactVersionMetadata, UpdateArtifactMetadataRequest};
use crate::validation::{validate_artifact, validate_artifact_version};

/// Artifact and version metadata, obtained from [`RegistryClient::metadata`].
#[derive(Debug, Clone, Copy)]
pub struct MetadataApi<'a> {
    client: &'a RegistryClient,
}

impl<'a> MetadataApi<'a> {
    pub(crate) fn new(client: &'a RegistryClient) -> Self {
        Self { client }
    }

    pub fn version_metadata(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<ArtifactVersionMetadata> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let url = self.client.url(
            &["groups", group_id, "artifacts", artifact_id, "versions", version],
            &QueryParams::new(),
        );
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    /// Empty fields of `request` are left unchanged by the registry.
    pub fn update_version_metadata(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        request: &UpdateArtifactMetadataRequest,
    ) -> Result<()> {
        validate_artifact_version(group_id, artifact_id, version)?;
        let body = RequestBody::json(request)?;
        let url = self.client.url(
            &["groups", group_id, "artifacts", artifact_id, "versions", version],
            &QueryParams::new(),
        );
        self.client.call_empty(HttpMethod::Put, url, Some(body), 204)
    }

    pub fn artifact_metadata(&self, group_id: &str, artifact_id: &str) -> Result<ArtifactMetadata> {
        validate_artifact(group_id, artifact_id)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts", artifact_id], &QueryParams::new());
        self.client.call(HttpMethod::Get, url, None, 200)
    }

    pub fn update_artifact_metadata(
        &self,
        group_id: &str,
        artifact_id: &str,
        request: &UpdateArtifactMetadataRequest,
    ) -> Result<()> {
        validate_artifact(group_id, artifact_id)?;
        let body = RequestBody::json(request)?;
        let url = self
            .client
            .url(&["groups", group_id, "artifacts", artifact_id], &QueryParams::new());
        self.client.call_empty(HttpMethod::Put, url, Some(body), 204)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::transport::testing::FakeTransport;
    use crate::RegistryError;

    fn client(transport: &FakeTransport) -> RegistryClient {
        RegistryClient::builder("http://registry/apis/registry/v3")
            .transport(transport.clone())
            .build()
    }

    #[test]
    fn version_metadata_decodes_flattened_fields() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            200,
            r#"{"groupId":"g","artifactId":"a","name":"Orders","artifactType":"AVRO",
                "labels":{"env":"prod"},"version":"2","globalId":11,"contentId":5}"#,
        ));

        let meta = client(&transport).metadata().version_metadata("g", "a", "2").unwrap();

        assert_eq!(meta.base.name, "Orders");
        assert_eq!(meta.base.artifact_type, "AVRO");
        assert_eq!(meta.base.labels.get("env").map(String::as_str), Some("prod"));
        assert_eq!(meta.global_id, 11);
    }

    #[test]
    fn artifact_metadata_decodes_modification_fields() {
        let transport = FakeTransport::new().respond(HttpResponse::new(
            200,
            r#"{"groupId":"g","artifactId":"a","owner":"alice","modifiedBy":"bob","modifiedOn":"2024-05-01T00:00:00Z"}"#,
        ));

        let meta = client(&transport).metadata().artifact_metadata("g", "a").unwrap();

        assert_eq!(meta.base.owner, "alice");
        assert_eq!(meta.modified_by, "bob");
        assert_eq!(
            transport.last_request().url,
            "http://registry/apis/registry/v3/groups/g/artifacts/a"
        );
    }

    #[test]
    fn update_omits_empty_fields() {
        let transport = FakeTransport::new().respond(HttpResponse::new(204, ""));
        let request = UpdateArtifactMetadataRequest {
            description: "order events".to_string(),
            ..Default::default()
        };

        client(&transport)
            .metadata()
            .update_version_metadata("g", "a", "1", &request)
            .unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(sent.body.as_deref(), Some(br#"{"description":"order events"}"#.as_slice()));
    }

    #[test]
    fn unexpected_success_status_is_an_error() {
        let transport = FakeTransport::new().respond(HttpResponse::new(200, r#"{"status":200,"title":"OK"}"#));
        let err = client(&transport)
            .metadata()
            .update_artifact_metadata("g", "a", &UpdateArtifactMetadataRequest::default())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Api(_)));
    }

    #[test]
    fn reserved_characters_in_ids_are_encoded() {
        let transport = FakeTransport::new().respond(HttpResponse::new(200, "{}"));
        client(&transport).metadata().artifact_metadata("my group", "a/b").unwrap();
        assert_eq!(
            transport.last_request().url,
            "http://registry/apis/registry/v3/groups/my%20group/artifacts/a%2Fb"
        );
    }
}
