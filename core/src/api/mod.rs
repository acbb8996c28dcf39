//! Per-resource operations. Each one validates its inputs, then hands a
//! method, URL, optional body and expected status to the client.

mod admin;
mod artifacts;
mod metadata;
mod versions;

pub use admin::AdminApi;
pub use artifacts::ArtifactsApi;
pub use metadata::MetadataApi;
pub use versions::VersionsApi;
