//! Request construction: URL, body and content type.

use serde::Serialize;

use crate::error::{RegistryError, Result};
use crate::http::{HttpMethod, HttpRequest};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_ANY: &str = "*/*";

/// A request payload with the content type its shape implies.
///
/// Raw schema content goes out verbatim as `*/*`; structured values are
/// JSON-encoded up front, so an encoding failure surfaces before anything is
/// sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl RequestBody {
    pub fn raw(data: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: CONTENT_TYPE_ANY,
            bytes: data.into(),
        }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value).map_err(RegistryError::Encode)?;
        Ok(Self {
            content_type: CONTENT_TYPE_JSON,
            bytes,
        })
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Assemble a request. Bodiless requests still carry a JSON content type.
pub fn build_request(method: HttpMethod, url: String, body: Option<RequestBody>) -> HttpRequest {
    let (content_type, body) = match body {
        Some(body) => (body.content_type, Some(body.bytes)),
        None => (CONTENT_TYPE_JSON, None),
    };
    HttpRequest {
        method,
        url,
        headers: vec![(CONTENT_TYPE.to_string(), content_type.to_string())],
        body,
    }
}

/// Join `base_url` with percent-encoded path `segments` and an encoded query.
pub fn endpoint(base_url: &str, segments: &[&str], query: &str) -> String {
    let mut url = base_url.to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    url
}
