// File: src/context.rs
// Purpose: Request context handed to hooks and page handlers

use axum::body::{Body, Bytes};
use axum::extract::{Query, Request};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;

use crate::error::{HandlerError, HeaderError};

/// Largest request body buffered into a context
const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Request context passed to `on_init` hooks and page handlers
#[derive(Clone)]
pub struct RequestContext {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: Method,

    /// Full request URI
    pub uri: Uri,

    /// Request path
    pub path: String,

    /// Named parameters captured by dynamic segments
    pub params: HashMap<String, String>,

    /// Query parameters from URL (?key=value)
    pub query: HashMap<String, String>,

    /// Request headers
    pub headers: HeaderMap,

    /// Buffered request body
    pub body: Bytes,

    /// Headers staged for the response
    response_headers: HeaderMap,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish()
    }
}

impl RequestContext {
    /// Create a new request context
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = Query::<HashMap<String, String>>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        Self {
            method,
            path: uri.path().to_string(),
            uri,
            params: HashMap::new(),
            query,
            headers,
            body,
            response_headers: HeaderMap::new(),
        }
    }

    /// Build a context from an incoming request, buffering its body
    pub async fn from_request(
        request: Request,
        params: HashMap<String, String>,
    ) -> Result<Self, HandlerError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| HandlerError::bad_request(format!("Failed to read body: {}", e)))?;

        Ok(Self::new(parts.method, parts.uri, parts.headers, body).with_params(params))
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get a path parameter captured by a dynamic segment
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a query parameter value
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Get a request header value
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Stage a response header
    ///
    /// Staged headers are added to the handler's response unless the handler
    /// already set the same header itself.
    pub fn header(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.response_headers.insert(name, value);
        Ok(())
    }

    /// Headers staged so far
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Plain-text response
    pub fn text(&self, status: axum::http::StatusCode, body: impl Into<String>) -> Response {
        (status, body.into()).into_response()
    }

    /// HTML response with status 200
    pub fn html(&self, body: impl Into<String>) -> Response {
        Html(body.into()).into_response()
    }

    /// Rebuild the request for a downstream service
    pub(crate) fn to_request(&self) -> Request {
        let mut request = Request::new(Body::from(self.body.clone()));
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();
        request
    }
}

/// Copies staged headers onto a response without overriding handler headers
pub(crate) fn apply_staged_headers(staged: &HeaderMap, response: &mut Response) {
    let headers = response.headers_mut();
    for (name, value) in staged {
        if !headers.contains_key(name) {
            headers.insert(name.clone(), value.clone());
        }
    }
}
