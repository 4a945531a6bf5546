//! Plain-data request descriptors handed to the transport.
//!
//! # Design
//! A [`RequestDescriptor`] describes one HTTP call as owned data: method,
//! path, query parameters, headers, and an optional body with its declared
//! media type. The dispatch core builds a fresh descriptor from each typed
//! request and hands it to the transport; a caller-held typed request is
//! never mutated, so compatibility-mode header rewriting only ever touches
//! the dispatch core's own copy.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request body together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub media_type: String,
    pub content: Vec<u8>,
}

impl RequestBody {
    pub fn new(media_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    /// JSON body with the plain JSON media type.
    pub fn json(content: impl Into<Vec<u8>>) -> Self {
        Self::new(crate::media::MediaKind::Json.media_type(), content)
    }
}

/// An HTTP call described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether a header with this name is present. Header names compare
    /// case-insensitively.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(header, _)| header.eq_ignore_ascii_case(name))
    }
}

/// Per-call set of HTTP status codes that should be treated as valid,
/// parseable outcomes rather than failures.
///
/// Some operations overload an error status as data — a `get` encodes
/// "document not found" as a 404 with a regular response body. The set makes
/// that decision per-call data instead of per-operation control flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSet(Vec<u16>);

impl StatusSet {
    /// The empty set: every non-2xx status is a failure.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn of(codes: impl IntoIterator<Item = u16>) -> Self {
        Self(codes.into_iter().collect())
    }

    pub fn contains(&self, status: u16) -> bool {
        self.0.contains(&status)
    }
}
