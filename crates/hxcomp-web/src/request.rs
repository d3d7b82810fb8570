use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Extensions, HeaderMap, Method, StatusCode, Uri};
use std::borrow::Cow;
use std::collections::HashMap;

pub const HX_REQUEST: &str = "hx-request";
pub const HX_BOOSTED: &str = "hx-boosted";
pub const HX_CURRENT_URL: &str = "hx-current-url";
pub const HX_TRIGGER: &str = "hx-trigger";
pub const HX_TRIGGER_NAME: &str = "hx-trigger-name";
pub const HX_TARGET: &str = "hx-target";
pub const HX_TRIGGER_AFTER_SETTLE: &str = "hx-trigger-after-settle";
pub const HX_REDIRECT: &str = "hx-redirect";
pub const HX_PUSH_URL: &str = "hx-push-url";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query or form field carrying the props token.
pub const TOKEN_PARAM: &str = "p";

/// Per-request values handed to hydration, actions and rendering.
///
/// Wraps `http::Extensions` so middleware can stash typed values (the
/// current user, a database handle) that components read back by type.
#[derive(Debug, Default)]
pub struct Context {
    extensions: Extensions,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_extensions(extensions: Extensions) -> Self {
        Self { extensions }
    }

    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    pub fn with<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

/// Framework-neutral view of an inbound request.
#[derive(Debug, Clone, Default)]
pub struct ComponentRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ComponentRequest {
    /// Builds a request from a method and a path with optional query.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query: parse_pairs(query.unwrap_or_default()),
            ..Self::default()
        }
    }

    /// Adapter entry point: a urlencoded body is parsed into `form`.
    pub fn from_parts(method: Method, uri: &Uri, headers: HeaderMap, body: Vec<u8>) -> Self {
        let is_form = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with(FORM_CONTENT_TYPE));
        let form = if is_form {
            parse_pairs(&String::from_utf8_lossy(&body))
        } else {
            HashMap::new()
        };
        Self {
            method,
            path: uri.path().to_string(),
            query: parse_pairs(uri.query().unwrap_or_default()),
            form,
            headers,
            body,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn htmx(self) -> Self {
        self.with_header(HX_REQUEST, "true")
    }

    /// Sets a urlencoded body and mirrors it into `form`.
    pub fn with_form(mut self, pairs: &[(&str, &str)]) -> Self {
        let encoded = serde_urlencoded::to_string(pairs).unwrap_or_default();
        self.form = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.body = encoded.into_bytes();
        self.with_header(CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Anything other than GET or HEAD.
    pub fn is_mutating(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

fn parse_pairs(raw: &str) -> HashMap<String, String> {
    if raw.is_empty() {
        return HashMap::new();
    }
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

pub fn is_htmx(req: &ComponentRequest) -> bool {
    req.header(HX_REQUEST) == Some("true")
}

pub fn is_boosted(req: &ComponentRequest) -> bool {
    req.header(HX_BOOSTED) == Some("true")
}

pub fn current_url(req: &ComponentRequest) -> Option<&str> {
    req.header(HX_CURRENT_URL)
}

/// `name` attribute of the element that triggered the request.
pub fn trigger_name(req: &ComponentRequest) -> Option<&str> {
    req.header(HX_TRIGGER_NAME)
}

/// `id` of the element that triggered the request.
pub fn trigger_id(req: &ComponentRequest) -> Option<&str> {
    req.header(HX_TRIGGER)
}

pub fn target_id(req: &ComponentRequest) -> Option<&str> {
    req.header(HX_TARGET)
}

/// Framework-neutral response produced by the registry.
#[derive(Debug, Clone)]
pub struct ComponentResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Default for ComponentResponse {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl ComponentResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        let mut response = Self::new(status);
        response.set_header(CONTENT_TYPE.as_str(), TEXT_CONTENT_TYPE);
        response.body = body.as_bytes().to_vec();
        response
    }

    pub fn html(body: String) -> Self {
        let mut response = Self::new(StatusCode::OK);
        response.set_header(CONTENT_TYPE.as_str(), HTML_CONTENT_TYPE);
        response.body = body.into_bytes();
        response
    }

    /// Replaces any existing value. Returns false when the name or value
    /// is not a legal header.
    pub fn set_header(&mut self, name: &str, value: &str) -> bool {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
                true
            }
            _ => {
                tracing::warn!(header = name, "dropping invalid response header");
                false
            }
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn write_str(&mut self, chunk: &str) {
        self.body.extend_from_slice(chunk.as_bytes());
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl std::io::Write for ComponentResponse {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
