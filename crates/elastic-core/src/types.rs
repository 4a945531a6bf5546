//! Wire documents and typed operation requests.
//!
//! Response documents derive `Deserialize` only; the client never writes
//! them back. Field names follow the service's JSON, with underscored keys
//! mapped through `#[serde(rename)]`.

use serde::Deserialize;

/// Typed request for the root info operation. Carries no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoRequest;

/// Typed request for the ping operation. Carries no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingRequest;

/// Root info document returned by `GET /`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InfoResponse {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cluster_name: Option<String>,

    #[serde(default)]
    pub cluster_uuid: Option<String>,

    pub version: ServerVersion,

    #[serde(default)]
    pub tagline: Option<String>,
}

/// `version` stanza of the info document.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerVersion {
    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub build_flavor: Option<String>,
}

/// Structured error document returned on failed requests:
/// `{"error": {...}, "status": N}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: ErrorCause,

    #[serde(default)]
    pub status: Option<u16>,
}

/// One cause inside an error document. Causes nest through `caused_by` and
/// fan out through `root_cause`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorCause {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub root_cause: Vec<ErrorCause>,

    #[serde(default)]
    pub caused_by: Option<Box<ErrorCause>>,
}

/// Typed request for fetching a document by id.
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub index: String,
    pub id: String,
}

impl GetRequest {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
        }
    }
}

/// Document fetch result. A missing document is a valid response with
/// `found == false`, not an error.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_id")]
    pub id: String,

    pub found: bool,

    #[serde(rename = "_source", default)]
    pub source: Option<serde_json::Value>,
}

/// Typed request for indexing a document.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub index: String,
    /// Server-assigned when absent.
    pub id: Option<String>,
    pub document: serde_json::Value,
}

impl IndexRequest {
    pub fn new(index: impl Into<String>, document: serde_json::Value) -> Self {
        Self {
            index: index.into(),
            id: None,
            document,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_id")]
    pub id: String,

    pub result: String,

    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
}

/// Typed request for deleting a document by id.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub index: String,
    pub id: String,
}

impl DeleteRequest {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
        }
    }
}

/// Delete result. Deleting a missing document yields a 404 whose body still
/// parses here, with `result == "not_found"`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeleteResponse {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_id")]
    pub id: String,

    pub result: String,
}

/// Typed search request. An empty index list searches all indices.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub indices: Vec<String>,
    pub body: serde_json::Value,
}

impl SearchRequest {
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            indices: Vec::new(),
            body,
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: Option<u64>,

    #[serde(default)]
    pub timed_out: Option<bool>,

    pub hits: SearchHits,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchHits {
    #[serde(default)]
    pub total: Option<TotalHits>,

    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TotalHits {
    pub value: u64,

    #[serde(default)]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    #[serde(rename = "_source", default)]
    pub source: Option<serde_json::Value>,
}
