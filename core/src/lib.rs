//! Synchronous client for the Apicurio schema registry REST API (v3).
//!
//! # Overview
//! Operations are grouped by resource: `client.artifacts()`,
//! `client.versions()`, `client.metadata()` and `client.admin()`. Each one
//! validates identifiers locally, builds an `HttpRequest`, hands it to a
//! `Transport` and interprets the `HttpResponse` against a single expected
//! status.
//!
//! # Design
//! - `RegistryClient` is immutable after construction; clone it or share it
//!   across threads.
//! - The network is behind the `Transport` trait. `UreqTransport` is the
//!   default; tests substitute their own.
//! - Every failure is a `RegistryError`. Decoded problem-details responses are
//!   `RegistryError::Api`; error statuses with an unreadable body are
//!   `RegistryError::UnexpectedServerError`.
//! - Optional query parameters are `Option`s, so `Some(0)` and `Some(false)`
//!   are sent while `None` is omitted.
//!
//! ```no_run
//! use registry_client::{RegistryClient, SearchArtifactsParams};
//!
//! let client = RegistryClient::new("http://localhost:8080/apis/registry/v3");
//! let params = SearchArtifactsParams {
//!     group_id: Some("payments".to_string()),
//!     ..Default::default()
//! };
//! let found = client.artifacts().search(Some(&params))?;
//! println!("{} artifacts", found.count);
//! # Ok::<(), registry_client::RegistryError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::{AdminApi, ArtifactsApi, MetadataApi, VersionsApi};
pub use client::{RegistryClient, RegistryClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, RegistryError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{
    ArtifactReferenceParams, ArtifactVersionReferencesParams, CreateArtifactParams,
    ListArtifactReferencesByGlobalIdParams, ListArtifactsInGroupParams,
    SearchArtifactsByContentParams, SearchArtifactsParams, SearchVersionByContentParams,
    SearchVersionParams,
};
pub use query::{QueryParams, ToQuery};
pub use request::RequestBody;
pub use transport::{Transport, UreqTransport};
pub use types::*;
