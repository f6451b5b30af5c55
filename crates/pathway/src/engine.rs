//! Routing engine seam.
//!
//! The patcher only talks to [`RoutingEngine`]; [`AxumEngine`] is the
//! production implementation on top of `axum::Router`.

use axum::extract::{Path, Request};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::{HandlerError, PathwayError};
use crate::handler::{ErrorPageHandler, PageHandler, RouteHandler};

/// Registration surface of an HTTP routing engine
pub trait RoutingEngine {
    /// Install the handler invoked when a page handler fails
    fn on_error(&mut self, handler: ErrorPageHandler) -> Result<(), PathwayError>;

    /// Install the handler invoked when no route matches
    fn not_found(&mut self, handler: PageHandler) -> Result<(), PathwayError>;

    /// Register `handler` for every method at `target`
    fn all(&mut self, target: &str, handler: RouteHandler) -> Result<(), PathwayError>;
}

type ErrorSlot = Arc<OnceCell<ErrorPageHandler>>;

/// [`RoutingEngine`] backed by `axum::Router`
///
/// The error slot is shared with every registered route and read at request
/// time, so routes patched before the error handler still reach it.
#[derive(Clone, Default)]
pub struct AxumEngine {
    router: Router,
    error_slot: ErrorSlot,
}

impl AxumEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The router with everything registered so far
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn has_error_handler(&self) -> bool {
        self.error_slot.get().is_some()
    }

    /// Applies a router transformation, turning axum's registration panics
    /// (invalid or conflicting paths) into errors. The router is left
    /// untouched on failure.
    fn try_update<F>(&mut self, target: &str, update: F) -> Result<(), PathwayError>
    where
        F: FnOnce(Router) -> Router,
    {
        let current = self.router.clone();
        match catch_unwind(AssertUnwindSafe(move || update(current))) {
            Ok(router) => {
                self.router = router;
                Ok(())
            }
            Err(payload) => Err(PathwayError::Registration {
                target: target.to_string(),
                reason: panic_message(payload),
            }),
        }
    }
}

impl RoutingEngine for AxumEngine {
    fn on_error(&mut self, handler: ErrorPageHandler) -> Result<(), PathwayError> {
        self.error_slot
            .set(handler)
            .map_err(|_| PathwayError::Registration {
                target: pathway_router::ERROR_TARGET.to_string(),
                reason: "an error handler is already installed".to_string(),
            })
    }

    fn not_found(&mut self, handler: PageHandler) -> Result<(), PathwayError> {
        let slot = self.error_slot.clone();
        self.try_update(pathway_router::NOT_FOUND_TARGET, move |router| {
            router.fallback(move |request: Request| {
                let handler = handler.clone();
                let slot = slot.clone();
                async move { dispatch_page(handler, slot, request, HashMap::new()).await }
            })
        })
    }

    fn all(&mut self, target: &str, handler: RouteHandler) -> Result<(), PathwayError> {
        if !target.starts_with('/') {
            return Err(PathwayError::Registration {
                target: target.to_string(),
                reason: "target must start with '/'".to_string(),
            });
        }

        let slot = self.error_slot.clone();
        let path = target.to_string();
        self.try_update(target, move |router| {
            router.route(
                &path,
                any(
                    move |params: Option<Path<HashMap<String, String>>>, request: Request| {
                        let handler = handler.clone();
                        let slot = slot.clone();
                        let params = params.map(|Path(p)| p).unwrap_or_default();
                        async move { dispatch(handler, slot, request, params).await }
                    },
                ),
            )
        })?;

        debug!(route = %target, "Registered route");
        Ok(())
    }
}

async fn dispatch(
    handler: RouteHandler,
    slot: ErrorSlot,
    request: Request,
    params: HashMap<String, String>,
) -> Response {
    match handler {
        RouteHandler::Normal(h) | RouteHandler::NotFound(h) | RouteHandler::Static(h) => {
            dispatch_page(h, slot, request, params).await
        }
        RouteHandler::ErrorHandler(h) => match RequestContext::from_request(request, params).await {
            Ok(ctx) => h(HandlerError::direct_request(), ctx).await,
            Err(err) => err.into_response(),
        },
    }
}

async fn dispatch_page(
    handler: PageHandler,
    slot: ErrorSlot,
    request: Request,
    params: HashMap<String, String>,
) -> Response {
    let ctx = match RequestContext::from_request(request, params).await {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match handler(ctx.clone()).await {
        Ok(response) => response,
        Err(err) => match slot.get() {
            Some(on_error) => on_error(err, ctx).await,
            None => err.into_response(),
        },
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "registration panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{error_page, page};
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    async fn send(engine: &AxumEngine, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = engine.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn echo_param() -> PageHandler {
        page(|ctx: RequestContext| async move {
            Ok(ctx.param("name").unwrap_or("-").to_string().into_response())
        })
    }

    fn failing() -> PageHandler {
        page(|_ctx| async { Err(HandlerError::bad_request("broken page")) })
    }

    #[tokio::test]
    async fn test_all_matches_every_method() {
        let mut engine = AxumEngine::new();
        engine.all("/profile/:name", RouteHandler::Normal(echo_param())).unwrap();

        assert_eq!(send(&engine, "GET", "/profile/alice").await, (StatusCode::OK, "alice".into()));
        assert_eq!(send(&engine, "POST", "/profile/bob").await, (StatusCode::OK, "bob".into()));
        assert_eq!(send(&engine, "DELETE", "/profile/eve").await, (StatusCode::OK, "eve".into()));
    }

    #[tokio::test]
    async fn test_route_without_params() {
        let mut engine = AxumEngine::new();
        engine.all("/", RouteHandler::Normal(echo_param())).unwrap();
        assert_eq!(send(&engine, "GET", "/").await, (StatusCode::OK, "-".into()));
    }

    #[tokio::test]
    async fn test_handler_error_without_error_handler() {
        let mut engine = AxumEngine::new();
        engine.all("/broken", RouteHandler::Normal(failing())).unwrap();

        assert_eq!(
            send(&engine, "GET", "/broken").await,
            (StatusCode::BAD_REQUEST, "broken page".into())
        );
    }

    #[tokio::test]
    async fn test_error_handler_installed_after_route() {
        let mut engine = AxumEngine::new();
        engine.all("/broken", RouteHandler::Normal(failing())).unwrap();
        engine
            .on_error(error_page(|err, ctx| async move {
                (StatusCode::IM_A_TEAPOT, format!("{} at {}", err.message, ctx.path)).into_response()
            }))
            .unwrap();

        assert!(engine.has_error_handler());
        assert_eq!(
            send(&engine, "GET", "/broken").await,
            (StatusCode::IM_A_TEAPOT, "broken page at /broken".into())
        );
    }

    #[tokio::test]
    async fn test_second_error_handler_is_rejected() {
        let mut engine = AxumEngine::new();
        let handler = error_page(|err, _ctx| async move { err.into_response() });
        engine.on_error(handler.clone()).unwrap();
        assert!(matches!(engine.on_error(handler), Err(PathwayError::Registration { .. })));
    }

    #[tokio::test]
    async fn test_error_handler_route_called_directly() {
        let mut engine = AxumEngine::new();
        let handler = error_page(|err, _ctx| async move { (err.status, "oops").into_response() });
        engine.all("/_onError", RouteHandler::ErrorHandler(handler)).unwrap();

        assert_eq!(
            send(&engine, "GET", "/_onError").await,
            (StatusCode::INTERNAL_SERVER_ERROR, "oops".into())
        );
    }

    #[tokio::test]
    async fn test_not_found_fallback() {
        let mut engine = AxumEngine::new();
        assert_eq!(send(&engine, "GET", "/missing").await.0, StatusCode::NOT_FOUND);

        engine
            .not_found(page(|ctx: RequestContext| async move {
                Ok((StatusCode::NOT_FOUND, format!("no {}", ctx.path)).into_response())
            }))
            .unwrap();

        assert_eq!(
            send(&engine, "GET", "/missing").await,
            (StatusCode::NOT_FOUND, "no /missing".into())
        );
    }

    #[tokio::test]
    async fn test_conflicting_route_is_an_error_and_router_survives() {
        let mut engine = AxumEngine::new();
        engine.all("/profile/:name", RouteHandler::Normal(echo_param())).unwrap();

        let result = engine.all("/profile/:id", RouteHandler::Normal(echo_param()));
        assert!(matches!(result, Err(PathwayError::Registration { .. })));

        assert_eq!(send(&engine, "GET", "/profile/alice").await, (StatusCode::OK, "alice".into()));
    }

    #[test]
    fn test_relative_target_is_rejected() {
        let mut engine = AxumEngine::new();
        let result = engine.all("about", RouteHandler::Normal(echo_param()));
        assert!(matches!(result, Err(PathwayError::Registration { .. })));
    }
}
