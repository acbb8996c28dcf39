//! The registry client: configuration, transport and the single call path
//! every resource operation goes through.
//!
//! # Design
//! `RegistryClient` holds the base URL, an optional static `Authorization`
//! value and a shared `Transport`; none of it changes after construction, so
//! one client can be cloned or shared across threads freely. Resource
//! operations (`artifacts()`, `versions()`, `metadata()`, `admin()`) only
//! validate inputs and pick a path, query, body and expected status; building,
//! executing and interpreting happen here and in `request` / `response`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{AdminApi, ArtifactsApi, MetadataApi, VersionsApi};
use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{Result, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;
use crate::request::{build_request, endpoint, RequestBody};
use crate::response::{interpret, interpret_content, interpret_empty};
use crate::transport::{Transport, UreqTransport};
use crate::types::ArtifactContent;

pub const AUTHORIZATION: &str = "Authorization";

/// Synchronous client for the registry REST API.
#[derive(Clone)]
pub struct RegistryClient {
    base_url: String,
    auth_header: Option<String>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url)
            .field("auth_header", &self.auth_header.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RegistryClient {
    /// Client with the default transport and no authorization.
    pub fn new(base_url: &str) -> Self {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> RegistryClientBuilder {
        RegistryClientBuilder {
            base_url: base_url.to_string(),
            auth_header: None,
            timeout: DEFAULT_TIMEOUT,
            transport: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::builder(&config.base_url).timeout(config.timeout);
        if let Some(auth_header) = &config.auth_header {
            builder = builder.auth_header(auth_header);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn artifacts(&self) -> ArtifactsApi<'_> {
        ArtifactsApi::new(self)
    }

    pub fn versions(&self) -> VersionsApi<'_> {
        VersionsApi::new(self)
    }

    pub fn metadata(&self) -> MetadataApi<'_> {
        MetadataApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    /// Perform one round trip, attaching the authorization header when one is
    /// configured.
    pub fn execute(&self, mut request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        if let Some(auth_header) = &self.auth_header {
            request.set_header(AUTHORIZATION, auth_header.as_str());
        }
        debug!(method = %request.method, url = %request.url, "registry request");
        self.transport.send(request)
    }

    /// Full URL for `segments` below the base URL, with `query` appended.
    pub(crate) fn url(&self, segments: &[&str], query: &QueryParams) -> String {
        endpoint(&self.base_url, segments, &query.encode())
    }

    /// Send and decode a `T` from a response with status `expected`.
    pub(crate) fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<RequestBody>,
        expected: u16,
    ) -> Result<T> {
        let response = self.execute(build_request(method, url, body))?;
        interpret(response, expected)
    }

    /// Send and accept status `expected` with no body of interest.
    pub(crate) fn call_empty(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<RequestBody>,
        expected: u16,
    ) -> Result<()> {
        let response = self.execute(build_request(method, url, body))?;
        interpret_empty(response, expected)
    }

    /// `GET` raw content and its `X-Registry-ArtifactType`.
    pub(crate) fn call_content(&self, url: String) -> Result<ArtifactContent> {
        let response = self.execute(build_request(HttpMethod::Get, url, None))?;
        interpret_content(response, 200)
    }
}

/// Builder for [`RegistryClient`].
pub struct RegistryClientBuilder {
    base_url: String,
    auth_header: Option<String>,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl RegistryClientBuilder {
    /// Static `Authorization` value, e.g. `Bearer <token>`. An empty value
    /// clears it.
    pub fn auth_header(mut self, value: &str) -> Self {
        self.auth_header = Some(value).filter(|v| !v.is_empty()).map(str::to_string);
        self
    }

    /// Timeout for the default transport. Ignored with a custom transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> RegistryClient {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(self.timeout)));
        RegistryClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            auth_header: self.auth_header,
            transport,
        }
    }
}
