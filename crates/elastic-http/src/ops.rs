//! Typed operations built on the dispatch core.
//!
//! Each operation is a request-builder/response-parser pair handed to the
//! dispatch entry points, together with its acceptable-status set. Operations
//! that overload 404 as a valid outcome (`get`, `exists`, `delete`) declare
//! it here, as data.

use elastic_core::{
    DeleteRequest, DeleteResponse, ElasticError, GetRequest, GetResponse, HttpMethod,
    IndexRequest, IndexResponse, InfoRequest, InfoResponse, MediaKind, PingRequest,
    RequestBody, RequestDescriptor, ResponseEnvelope, SearchRequest, SearchResponse, StatusSet,
    ValidationError,
};
use serde::de::DeserializeOwned;

use crate::cancel::Cancellable;
use crate::client::{ConversionError, ElasticClient};

impl ElasticClient {
    /// Info about the connected server (`GET /`).
    pub async fn info(&self) -> Result<InfoResponse, ElasticError> {
        self.perform(&InfoRequest, info_request, parse_json, StatusSet::none())
            .await
    }

    pub fn info_blocking(&self) -> Result<InfoResponse, ElasticError> {
        self.perform_blocking(&InfoRequest, info_request, parse_json, StatusSet::none())
    }

    pub fn info_with_listener(
        &self,
        listener: impl FnOnce(Result<InfoResponse, ElasticError>) + Send + 'static,
    ) -> Cancellable {
        self.perform_with_listener(
            &InfoRequest,
            info_request,
            parse_json,
            StatusSet::none(),
            listener,
        )
    }

    /// Whether the server answers at all (`HEAD /`).
    pub async fn ping(&self) -> Result<bool, ElasticError> {
        self.perform(&PingRequest, ping_request, status_is_ok, StatusSet::none())
            .await
    }

    pub fn ping_blocking(&self) -> Result<bool, ElasticError> {
        self.perform_blocking(&PingRequest, ping_request, status_is_ok, StatusSet::none())
    }

    /// Fetch a document by id. A missing document is a valid response with
    /// `found == false`, carried on a 404.
    pub async fn get(&self, request: &GetRequest) -> Result<GetResponse, ElasticError> {
        self.perform(request, get_request, parse_json, StatusSet::of([404]))
            .await
    }

    pub fn get_blocking(&self, request: &GetRequest) -> Result<GetResponse, ElasticError> {
        self.perform_blocking(request, get_request, parse_json, StatusSet::of([404]))
    }

    pub fn get_with_listener(
        &self,
        request: &GetRequest,
        listener: impl FnOnce(Result<GetResponse, ElasticError>) + Send + 'static,
    ) -> Cancellable {
        self.perform_with_listener(
            request,
            get_request,
            parse_json,
            StatusSet::of([404]),
            listener,
        )
    }

    /// Whether a document exists (`HEAD`, decided by status alone).
    pub async fn exists(&self, request: &GetRequest) -> Result<bool, ElasticError> {
        self.perform(request, exists_request, status_is_ok, StatusSet::of([404]))
            .await
    }

    pub fn exists_blocking(&self, request: &GetRequest) -> Result<bool, ElasticError> {
        self.perform_blocking(request, exists_request, status_is_ok, StatusSet::of([404]))
    }

    /// Index a document, creating or replacing it.
    pub async fn index(&self, request: &IndexRequest) -> Result<IndexResponse, ElasticError> {
        self.perform(request, index_request, parse_json, StatusSet::none())
            .await
    }

    pub fn index_blocking(&self, request: &IndexRequest) -> Result<IndexResponse, ElasticError> {
        self.perform_blocking(request, index_request, parse_json, StatusSet::none())
    }

    pub fn index_with_listener(
        &self,
        request: &IndexRequest,
        listener: impl FnOnce(Result<IndexResponse, ElasticError>) + Send + 'static,
    ) -> Cancellable {
        self.perform_with_listener(
            request,
            index_request,
            parse_json,
            StatusSet::none(),
            listener,
        )
    }

    /// Delete a document by id. Deleting a missing document yields a 404
    /// whose body still parses, with `result == "not_found"`.
    pub async fn delete(&self, request: &DeleteRequest) -> Result<DeleteResponse, ElasticError> {
        self.perform(request, delete_request, parse_json, StatusSet::of([404]))
            .await
    }

    pub fn delete_blocking(&self, request: &DeleteRequest) -> Result<DeleteResponse, ElasticError> {
        self.perform_blocking(request, delete_request, parse_json, StatusSet::of([404]))
    }

    /// Run a search.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ElasticError> {
        self.perform(request, search_request, parse_json, StatusSet::none())
            .await
    }

    pub fn search_blocking(&self, request: &SearchRequest) -> Result<SearchResponse, ElasticError> {
        self.perform_blocking(request, search_request, parse_json, StatusSet::none())
    }

    pub fn search_with_listener(
        &self,
        request: &SearchRequest,
        listener: impl FnOnce(Result<SearchResponse, ElasticError>) + Send + 'static,
    ) -> Cancellable {
        self.perform_with_listener(
            request,
            search_request,
            parse_json,
            StatusSet::none(),
            listener,
        )
    }
}

fn info_request(_: &InfoRequest) -> Result<RequestDescriptor, ElasticError> {
    Ok(RequestDescriptor::new(HttpMethod::Get, "/"))
}

fn ping_request(_: &PingRequest) -> Result<RequestDescriptor, ElasticError> {
    Ok(RequestDescriptor::new(HttpMethod::Head, "/"))
}

fn doc_path(index: &str, id: &str) -> String {
    format!("/{index}/_doc/{id}")
}

fn get_request(request: &GetRequest) -> Result<RequestDescriptor, ElasticError> {
    Ok(RequestDescriptor::new(
        HttpMethod::Get,
        doc_path(&request.index, &request.id),
    ))
}

fn exists_request(request: &GetRequest) -> Result<RequestDescriptor, ElasticError> {
    Ok(RequestDescriptor::new(
        HttpMethod::Head,
        doc_path(&request.index, &request.id),
    ))
}

fn index_request(request: &IndexRequest) -> Result<RequestDescriptor, ElasticError> {
    let content = serde_json::to_vec(&request.document).map_err(|e| {
        ElasticError::Validation(ValidationError::InvalidValue {
            field: "document",
            reason: e.to_string(),
        })
    })?;
    let descriptor = match &request.id {
        Some(id) => RequestDescriptor::new(HttpMethod::Put, doc_path(&request.index, id)),
        None => RequestDescriptor::new(HttpMethod::Post, format!("/{}/_doc", request.index)),
    };
    Ok(descriptor.body(RequestBody::json(content)))
}

fn delete_request(request: &DeleteRequest) -> Result<RequestDescriptor, ElasticError> {
    Ok(RequestDescriptor::new(
        HttpMethod::Delete,
        doc_path(&request.index, &request.id),
    ))
}

fn search_request(request: &SearchRequest) -> Result<RequestDescriptor, ElasticError> {
    let content = serde_json::to_vec(&request.body).map_err(|e| {
        ElasticError::Validation(ValidationError::InvalidValue {
            field: "body",
            reason: e.to_string(),
        })
    })?;
    let path = if request.indices.is_empty() {
        "/_search".to_string()
    } else {
        format!("/{}/_search", request.indices.join(","))
    };
    Ok(RequestDescriptor::new(HttpMethod::Post, path).body(RequestBody::json(content)))
}

/// Parse a JSON response body. Requires a body and a JSON content type —
/// plain or versioned-compatible.
fn parse_json<T: DeserializeOwned>(response: &ResponseEnvelope) -> Result<T, ConversionError> {
    let body = response
        .body
        .as_deref()
        .ok_or("response body expected but not returned")?;
    let content_type = response
        .content_type()
        .ok_or("response has no Content-Type header")?;
    match MediaKind::from_media_type(content_type) {
        Some(MediaKind::Json) => {}
        _ => return Err(format!("unsupported Content-Type: {content_type}").into()),
    }
    Ok(serde_json::from_slice(body)?)
}

/// Status-only conversion for `HEAD`-style operations.
fn status_is_ok(response: &ResponseEnvelope) -> Result<bool, ConversionError> {
    Ok(response.status == 200)
}
