//! Handler and route types shared by the builder, patcher and engine.

use axum::response::Response;
use pathway_router::RouteKind;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::HandlerError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a page handler
pub type HandlerResult = Result<Response, HandlerError>;

/// Handler taking a request context
pub type PageHandler = Arc<dyn Fn(RequestContext) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Handler taking the error value first, then the request context
pub type ErrorPageHandler =
    Arc<dyn Fn(HandlerError, RequestContext) -> BoxFuture<'static, Response> + Send + Sync>;

/// Hook run with the request context before every discovered handler
pub type RequestHook = Arc<dyn Fn(&mut RequestContext) + Send + Sync>;

/// Hook run once when the server fires
pub type LaunchHook = Arc<dyn Fn() + Send + Sync>;

/// Wraps an async closure into a [`PageHandler`]
///
/// ```
/// use pathway::{page, RequestContext};
///
/// let handler = page(|ctx: RequestContext| async move {
///     Ok(ctx.html(format!("<h1>{}</h1>", ctx.param("name").unwrap_or("anonymous"))))
/// });
/// # let _ = handler;
/// ```
pub fn page<F, Fut>(f: F) -> PageHandler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |ctx: RequestContext| -> BoxFuture<'static, HandlerResult> { Box::pin(f(ctx)) })
}

/// Wraps an async closure into an [`ErrorPageHandler`]
pub fn error_page<F, Fut>(f: F) -> ErrorPageHandler
where
    F: Fn(HandlerError, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(
        move |err: HandlerError, ctx: RequestContext| -> BoxFuture<'static, Response> {
            Box::pin(f(err, ctx))
        },
    )
}

/// What a module loader yields for a supported file
#[derive(Clone)]
pub enum ModuleExport {
    Page(PageHandler),
    ErrorPage(ErrorPageHandler),
}

impl ModuleExport {
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Page(_) => "a page",
            Self::ErrorPage(_) => "an error-page",
        }
    }
}

impl std::fmt::Debug for ModuleExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Page(_) => "ModuleExport::Page",
            Self::ErrorPage(_) => "ModuleExport::ErrorPage",
        })
    }
}

/// Handler of a built route, tagged by how it is registered and invoked
#[derive(Clone)]
pub enum RouteHandler {
    Normal(PageHandler),
    ErrorHandler(ErrorPageHandler),
    NotFound(PageHandler),
    Static(PageHandler),
}

impl RouteHandler {
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Normal(_) => RouteKind::Normal,
            Self::ErrorHandler(_) => RouteKind::ErrorHandler,
            Self::NotFound(_) => RouteKind::NotFound,
            Self::Static(_) => RouteKind::Static,
        }
    }
}

/// A discovered route. Never mutated after the builder creates it.
#[derive(Clone)]
pub struct Route {
    pub target: String,
    pub handler: RouteHandler,
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        self.handler.kind()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("target", &self.target)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Routes in build (dispatch) order
///
/// Appended to only by the builder; everyone else reads it.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            routes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Targets in table order
    pub fn targets(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.target.as_str()).collect()
    }

    pub fn find(&self, target: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.target == target)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
impl FromIterator<Route> for RouteTable {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}
