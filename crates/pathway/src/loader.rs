//! Module loading: decides whether a discovered file is a handler module.

use async_trait::async_trait;
use pathway_router::normalize_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::PathwayError;
use crate::handler::{ErrorPageHandler, ModuleExport, PageHandler};

/// Trait for handler module loaders
///
/// `Ok(None)` means the file is not a module; it becomes a static asset.
/// `Err` is reserved for genuine failures and aborts the build.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Try to load the file at `full_path` as a handler module
    async fn load(&self, full_path: &Path) -> Result<Option<ModuleExport>, PathwayError>;
}

/// Loader backed by handlers compiled into the binary
///
/// Each handler is registered against the path of its route file relative
/// to the routes directory. The file must exist on disk for the handler to
/// be picked up, so the directory tree stays the source of truth for which
/// routes exist.
///
/// ```
/// use pathway::{page, ModuleRegistry};
/// use axum::response::IntoResponse;
///
/// let registry = ModuleRegistry::new("routes")
///     .page("index.page", page(|_ctx| async { Ok("home".into_response()) }));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    base_path: PathBuf,
    modules: HashMap<String, ModuleExport>,
}

impl ModuleRegistry {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            modules: HashMap::new(),
        }
    }

    /// Register a page handler for a route file
    pub fn page(self, relative_path: &str, handler: PageHandler) -> Self {
        self.register(relative_path, ModuleExport::Page(handler))
    }

    /// Register an error-page handler, normally for `_onError.*`
    pub fn error_page(self, relative_path: &str, handler: ErrorPageHandler) -> Self {
        self.register(relative_path, ModuleExport::ErrorPage(handler))
    }

    pub fn register(mut self, relative_path: &str, export: ModuleExport) -> Self {
        self.modules.insert(registry_key(relative_path), export);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, full_path: &Path) -> Option<&ModuleExport> {
        let relative = full_path.strip_prefix(&self.base_path).unwrap_or(full_path);
        self.modules.get(&registry_key(&relative.to_string_lossy()))
    }
}

#[async_trait]
impl ModuleLoader for ModuleRegistry {
    async fn load(&self, full_path: &Path) -> Result<Option<ModuleExport>, PathwayError> {
        let Some(export) = self.lookup(full_path) else {
            return Ok(None);
        };

        let metadata = tokio::fs::metadata(full_path)
            .await
            .map_err(|source| PathwayError::Load {
                path: full_path.to_path_buf(),
                source,
            })?;

        Ok(metadata.is_file().then(|| export.clone()))
    }
}

/// Registry keys use the same normalization as route patterns
fn registry_key(relative_path: &str) -> String {
    normalize_path(relative_path).into_owned()
}
