//! Outbound envelope returned to the hosting runtime.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Separator used when an origin header carries several values.
pub const HEADER_VALUE_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ProxyResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            body: body.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Build from an origin response, flattening multi-valued headers.
    pub fn from_origin(status: StatusCode, headers: &HeaderMap, body: String) -> Self {
        Self {
            status_code: status.as_u16(),
            body,
            headers: flatten_headers(headers),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Map each header name to all of its values joined with `, `.
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(HEADER_VALUE_SEPARATOR);
            (name.as_str().to_string(), joined)
        })
        .collect()
}
