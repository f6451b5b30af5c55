//! Static file serving.
//!
//! Files the module loader does not recognise are served from the routes
//! directory through tower-http's `ServeDir`.

use axum::response::{IntoResponse, Response};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::context::RequestContext;

/// Serves files rooted at the routes directory
#[derive(Clone)]
pub struct StaticFiles {
    root: PathBuf,
    service: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            service: ServeDir::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file addressed by the request path
    pub async fn serve(&self, ctx: &RequestContext) -> Response {
        match self.service.clone().oneshot(ctx.to_request()).await {
            Ok(response) => response.into_response(),
            Err(infallible) => match infallible {},
        }
    }
}
