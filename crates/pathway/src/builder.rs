//! Route builder: turns the routes directory into a [`RouteTable`].
//!
//! Every discovered file is loaded on its own task; results are collected in
//! dispatch order so registration precedence never depends on which load
//! finished first.

use axum::response::Response;
use pathway_router::{to_dynamic_pattern, to_static_pattern, RouteKind, TranslatorConfig};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::context::{apply_staged_headers, RequestContext};
use crate::error::{HandlerError, PathwayError};
use crate::handler::{
    BoxFuture, ErrorPageHandler, HandlerResult, ModuleExport, PageHandler, RequestHook, Route,
    RouteHandler, RouteTable,
};
use crate::loader::ModuleLoader;
use crate::static_files::StaticFiles;
use crate::walker::{walk, DirectoryEntry};

/// Header naming the HTTP stack
pub const POWERED_BY_HEADER: &str = "x-powered-by";
pub const POWERED_BY: &str = "axum";

/// Bytes a client percent-encodes in a path; non-ASCII is always encoded
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Form of a route pattern that matches the raw request path
///
/// The router compares against the path as sent on the wire, so a file named
/// `my logo.png` must be registered as `/my%20logo.png`.
pub fn request_target(pattern: &str) -> String {
    utf8_percent_encode(pattern, PATH_ENCODE_SET).to_string()
}

/// Outcome of a build
#[derive(Debug)]
pub struct BuildReport {
    pub routes: RouteTable,
    /// Entries processed, always equal to the entries discovered
    pub checked: usize,
    pub elapsed: Duration,
}

/// Builds routes from the files under `base_path`
#[derive(Clone)]
pub struct RouteBuilder {
    base_path: PathBuf,
    translator: TranslatorConfig,
    loader: Arc<dyn ModuleLoader>,
    on_init: Option<RequestHook>,
    server_name: String,
    static_files: StaticFiles,
}

impl RouteBuilder {
    pub fn new(base_path: impl Into<PathBuf>, loader: Arc<dyn ModuleLoader>) -> Self {
        let base_path = base_path.into();
        Self {
            static_files: StaticFiles::new(&base_path),
            base_path,
            translator: TranslatorConfig::default(),
            loader,
            on_init: None,
            server_name: crate::config::DEFAULT_SERVER_NAME.to_string(),
        }
    }

    pub fn translator(mut self, translator: TranslatorConfig) -> Self {
        self.translator = translator;
        self
    }

    pub fn on_init(mut self, hook: Option<RequestHook>) -> Self {
        self.on_init = hook;
        self
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Discover, load and wrap every file under the base path
    ///
    /// Directory listing failures and loader failures are fatal. The table
    /// holds exactly one route per discovered file, in discovery order.
    pub async fn build(&self) -> Result<BuildReport, PathwayError> {
        let start = Instant::now();

        let base = self.base_path.clone();
        let entries = tokio::task::spawn_blocking(move || walk(&base)).await??;
        let dispatched = entries.len();
        debug!(
            entries = dispatched,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Scanned routes directory"
        );

        let handles: Vec<_> = entries
            .into_iter()
            .map(|entry| {
                let loader = Arc::clone(&self.loader);
                tokio::spawn(async move {
                    let export = loader.load(&entry.full_path).await?;
                    Ok::<_, PathwayError>((entry, export))
                })
            })
            .collect();

        // Join every task before looking at any result
        let mut loaded = Vec::with_capacity(dispatched);
        for handle in handles {
            loaded.push(handle.await);
        }
        ensure_all_joined(dispatched, loaded.len())?;

        let mut routes = RouteTable::with_capacity(dispatched);
        for result in loaded {
            let (entry, export) = result??;
            routes.push(self.make_route(&entry, export)?);
        }
        let checked = routes.len();

        let elapsed = start.elapsed();
        info!(
            checked,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "All routes checked"
        );

        Ok(BuildReport {
            routes,
            checked,
            elapsed,
        })
    }

    /// Classify one loaded entry and wrap its handler
    fn make_route(
        &self,
        entry: &DirectoryEntry,
        export: Option<ModuleExport>,
    ) -> Result<Route, PathwayError> {
        let Some(export) = export else {
            return Ok(Route {
                target: request_target(&to_static_pattern(&entry.relative_path)),
                handler: RouteHandler::Static(self.wrap_static()),
            });
        };

        let target = to_dynamic_pattern(&entry.relative_path, &self.translator);
        let kind = RouteKind::for_dynamic_target(&target);

        let handler = match (kind, export) {
            (RouteKind::ErrorHandler, ModuleExport::ErrorPage(h)) => {
                RouteHandler::ErrorHandler(self.wrap_error_page(h))
            }
            (RouteKind::NotFound, ModuleExport::Page(h)) => RouteHandler::NotFound(self.wrap_page(h)),
            (RouteKind::Normal, ModuleExport::Page(h)) => RouteHandler::Normal(self.wrap_page(h)),
            (kind, export) => {
                return Err(PathwayError::ExportMismatch {
                    path: entry.full_path.clone(),
                    target,
                    expected: if kind == RouteKind::ErrorHandler {
                        "an error-page"
                    } else {
                        "a page"
                    },
                    found: export.shape(),
                })
            }
        };

        Ok(Route {
            target: request_target(&target),
            handler,
        })
    }

    fn wrap_page(&self, module: PageHandler) -> PageHandler {
        let on_init = self.on_init.clone();
        let server_name = self.server_name.clone();
        Arc::new(move |mut ctx: RequestContext| -> BoxFuture<'static, HandlerResult> {
            let module = Arc::clone(&module);
            prepare(&mut ctx, on_init.as_ref(), &server_name);
            let staged = ctx.response_headers().clone();
            Box::pin(async move {
                let mut response = module(ctx).await?;
                apply_staged_headers(&staged, &mut response);
                Ok(response)
            })
        })
    }

    fn wrap_error_page(&self, module: ErrorPageHandler) -> ErrorPageHandler {
        let on_init = self.on_init.clone();
        let server_name = self.server_name.clone();
        Arc::new(move |err: HandlerError, mut ctx: RequestContext| -> BoxFuture<'static, Response> {
            let module = Arc::clone(&module);
            prepare(&mut ctx, on_init.as_ref(), &server_name);
            let staged = ctx.response_headers().clone();
            Box::pin(async move {
                let mut response = module(err, ctx).await;
                apply_staged_headers(&staged, &mut response);
                response
            })
        })
    }

    fn wrap_static(&self) -> PageHandler {
        let on_init = self.on_init.clone();
        let static_files = self.static_files.clone();
        Arc::new(move |mut ctx: RequestContext| -> BoxFuture<'static, HandlerResult> {
            if let Some(hook) = &on_init {
                hook(&mut ctx);
            }
            let static_files = static_files.clone();
            Box::pin(async move { Ok(static_files.serve(&ctx).await) })
        })
    }
}

fn ensure_all_joined(dispatched: usize, completed: usize) -> Result<(), PathwayError> {
    if completed != dispatched {
        return Err(PathwayError::Inconsistent {
            dispatched,
            completed,
        });
    }
    Ok(())
}

/// Runs the init hook and stages the server identification headers
///
/// A header that cannot be set is logged and skipped; the request goes on.
fn prepare(ctx: &mut RequestContext, on_init: Option<&RequestHook>, server_name: &str) {
    if let Some(hook) = on_init {
        hook(ctx);
    }

    let injected = ctx
        .header(POWERED_BY_HEADER, POWERED_BY)
        .and_then(|_| ctx.header("server", server_name));
    if let Err(e) = injected {
        warn!(path = %ctx.path, error = %e, "No response headers assigned");
    }
}
