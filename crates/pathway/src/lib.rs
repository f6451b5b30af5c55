// Pathway - file-system routing for axum
// Discovers handlers in a directory tree, builds routes concurrently and patches them into a router

pub mod builder;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod handler;
pub mod live_reload;
pub mod loader;
pub mod patcher;
pub mod server;
pub mod static_files;
pub mod walker;

// Re-export framework types
pub use builder::{BuildReport, RouteBuilder};
pub use config::{PathwayConfig, ServerConfig, DEFAULT_PORT, DEFAULT_SERVER_NAME};
pub use context::RequestContext;
pub use engine::{AxumEngine, RoutingEngine};
pub use error::{HandlerError, HeaderError, PathwayError};
pub use handler::{
    error_page, page, BoxFuture, ErrorPageHandler, HandlerResult, LaunchHook, ModuleExport,
    PageHandler, RequestHook, Route, RouteHandler, RouteTable,
};
pub use live_reload::{LiveReload, LIVE_RELOAD_PATH};
pub use loader::{ModuleLoader, ModuleRegistry};
pub use patcher::{patch, PatchReport};
pub use server::{LifecycleState, Server, StartupReport};
pub use static_files::StaticFiles;
pub use walker::{walk, DirectoryEntry};

// Re-export the path translator
pub use pathway_router::{RouteKind, TranslatorConfig};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;
pub use axum::http::StatusCode;
