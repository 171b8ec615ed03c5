//! Request translation.
//!
//! # Responsibilities
//! - Parse the inbound envelope text as a JSON object
//! - Build the outbound method, target, optional body and headers
//! - Reject shapes that cannot become an HTTP request
//!
//! # Design Decisions
//! - Pure transformation: no network activity happens here
//! - Reserved keys never become headers; every other key becomes exactly one
//! - Relative targets are accepted here and resolved by the forwarder

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

use crate::proxy::error::{ProxyError, ProxyResult};

pub const METHOD_KEY: &str = "method";
pub const REQUEST_URI_KEY: &str = "requestUri";
pub const ENTITY_BODY_KEY: &str = "entityBody";
pub const CONTENT_TYPE_KEY: &str = "Content-Type";

/// Envelope keys that describe the request itself rather than a header.
pub const RESERVED_KEYS: [&str; 4] = [METHOD_KEY, REQUEST_URI_KEY, ENTITY_BODY_KEY, CONTENT_TYPE_KEY];

/// Content type used when the envelope carries a body but no `Content-Type`.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Headers that describe the body; only settable through the reserved keys.
const CONTENT_HEADERS: [&str; 2] = ["content-type", "content-length"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn is_content_header(key: &str) -> bool {
    CONTENT_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(key))
}

/// Where the outbound request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    Absolute(Url),
    /// A relative reference, resolved against the forwarder's base URL.
    Relative(String),
}

impl RequestTarget {
    pub fn parse(raw: &str) -> ProxyResult<Self> {
        match Url::parse(raw) {
            Ok(url) => Ok(Self::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::Relative(raw.to_string())),
            Err(e) => Err(ProxyError::malformed_from(
                format!("`{}` is not a valid request URI", raw),
                e,
            )),
        }
    }

    /// Resolve to an absolute URL.
    ///
    /// A relative target with no base has nowhere to go; that is a
    /// forwarding failure, not a translation one.
    pub fn resolve(&self, base: Option<&Url>) -> ProxyResult<Url> {
        match (self, base) {
            (Self::Absolute(url), _) => Ok(url.clone()),
            (Self::Relative(path), Some(base)) => base.join(path).map_err(|e| {
                ProxyError::unreachable_from(format!("cannot resolve `{}` against {}", path, base), e)
            }),
            (Self::Relative(path), None) => Err(ProxyError::unreachable(format!(
                "relative request URI `{}` with no base address configured",
                path
            ))),
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(url) => write!(f, "{}", url),
            Self::Relative(path) => write!(f, "{}", path),
        }
    }
}

/// UTF-8 text body with the content type it is sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundBody {
    pub text: String,
    pub content_type: HeaderValue,
}

/// A fully-formed request ready to be forwarded.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub target: RequestTarget,
    pub body: Option<OutboundBody>,
    pub headers: HeaderMap,
}

impl OutboundRequest {
    /// Values of a header in the order the envelope listed them.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Converts envelope text into an [`OutboundRequest`].
#[derive(Debug, Clone)]
pub struct RequestTranslator {
    default_content_type: HeaderValue,
}

impl RequestTranslator {
    pub fn new(default_content_type: HeaderValue) -> Self {
        Self {
            default_content_type,
        }
    }

    pub fn translate(&self, envelope: &str) -> ProxyResult<OutboundRequest> {
        let value: Value = serde_json::from_str(envelope)
            .map_err(|e| ProxyError::malformed_from("envelope is not valid JSON", e))?;

        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ProxyError::malformed(format!(
                    "envelope must be a JSON object, found {}",
                    json_type(&other)
                )))
            }
        };

        let method = parse_method(required_str(&fields, METHOD_KEY)?)?;
        let target = RequestTarget::parse(required_str(&fields, REQUEST_URI_KEY)?)?;

        let body = match optional_str(&fields, ENTITY_BODY_KEY)? {
            Some(text) if !text.is_empty() => Some(OutboundBody {
                text: text.to_string(),
                content_type: self.content_type(&fields)?,
            }),
            _ => None,
        };

        let mut headers = HeaderMap::new();
        for (key, value) in fields.iter().filter(|(key, _)| !is_reserved(key)) {
            if is_content_header(key) {
                return Err(ProxyError::malformed(format!(
                    "`{}` describes the body and cannot be sent as a request header",
                    key
                )));
            }
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ProxyError::malformed_from(format!("`{}` is not a valid header name", key), e)
            })?;

            for raw in header_values(key, value)? {
                let value = HeaderValue::from_str(&raw).map_err(|e| {
                    ProxyError::malformed_from(format!("invalid value for header `{}`", key), e)
                })?;
                headers.append(name.clone(), value);
            }
        }

        Ok(OutboundRequest {
            method,
            target,
            body,
            headers,
        })
    }

    fn content_type(&self, fields: &Map<String, Value>) -> ProxyResult<HeaderValue> {
        match optional_str(fields, CONTENT_TYPE_KEY)? {
            Some(ct) if !ct.is_empty() => HeaderValue::from_str(ct).map_err(|e| {
                ProxyError::malformed_from(format!("`{}` is not a valid content type", ct), e)
            }),
            _ => Ok(self.default_content_type.clone()),
        }
    }
}

impl Default for RequestTranslator {
    fn default() -> Self {
        Self::new(HeaderValue::from_static(DEFAULT_CONTENT_TYPE))
    }
}

fn parse_method(raw: &str) -> ProxyResult<Method> {
    Method::from_bytes(raw.as_bytes())
        .map_err(|e| ProxyError::malformed_from(format!("`{}` is not a valid HTTP method", raw), e))
}

fn required_str<'a>(fields: &'a Map<String, Value>, key: &str) -> ProxyResult<&'a str> {
    optional_str(fields, key)?
        .ok_or_else(|| ProxyError::malformed(format!("missing required field `{}`", key)))
}

/// `null` counts as absent.
fn optional_str<'a>(fields: &'a Map<String, Value>, key: &str) -> ProxyResult<Option<&'a str>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ProxyError::malformed(format!(
            "field `{}` must be a string, found {}",
            key,
            json_type(other)
        ))),
    }
}

/// Coerce a header value to its list of strings.
///
/// An empty array still yields one (empty) value so the key stays a header.
fn header_values(key: &str, value: &Value) -> ProxyResult<Vec<String>> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(vec![String::new()]),
        Value::Array(items) => items.iter().map(|item| scalar_text(key, item)).collect(),
        other => Ok(vec![scalar_text(key, other)?]),
    }
}

fn scalar_text(key: &str, value: &Value) -> ProxyResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ProxyError::malformed(format!(
            "header `{}` values must be strings, found {}",
            key,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
