//! Route patcher: registers a built [`RouteTable`] with a [`RoutingEngine`].
//!
//! Routes are registered one at a time in table order. A route that fails to
//! register is logged and skipped; it never stops the routes after it.

use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::engine::RoutingEngine;
use crate::error::PathwayError;
use crate::handler::{Route, RouteHandler, RouteTable};

/// Outcome of a patch run
#[derive(Debug, Default)]
pub struct PatchReport {
    /// Targets registered, in registration order
    pub registered: Vec<String>,
    /// Targets that failed, with the reason
    pub failed: Vec<(String, String)>,
    pub elapsed: Duration,
}

/// Register every route of `table` with `engine`
///
/// The first route for a target wins; later routes with the same target are
/// reported as [`PathwayError::DuplicateTarget`].
pub fn patch<E: RoutingEngine>(engine: &mut E, table: &RouteTable) -> PatchReport {
    info!(routes = table.len(), "Patching...");
    let start = Instant::now();

    let mut seen: HashSet<&str> = HashSet::with_capacity(table.len());
    let mut report = PatchReport::default();

    for route in table {
        let result = if seen.contains(route.target.as_str()) {
            Err(PathwayError::DuplicateTarget(route.target.clone()))
        } else {
            register(engine, route)
        };

        match result {
            Ok(()) => {
                seen.insert(route.target.as_str());
                report.registered.push(route.target.clone());
            }
            Err(e) => {
                error!(
                    route = %route.target,
                    kind = %route.kind(),
                    error = %e,
                    "Failed to patch route"
                );
                report.failed.push((route.target.clone(), e.to_string()));
            }
        }
    }

    report.elapsed = start.elapsed();
    info!(
        registered = report.registered.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        "All routes patched"
    );
    report
}

fn register<E: RoutingEngine>(engine: &mut E, route: &Route) -> Result<(), PathwayError> {
    match &route.handler {
        RouteHandler::ErrorHandler(h) => engine.on_error(h.clone())?,
        RouteHandler::NotFound(h) => engine.not_found(h.clone())?,
        RouteHandler::Normal(_) | RouteHandler::Static(_) => {}
    }
    engine.all(&route.target, route.handler.clone())
}
