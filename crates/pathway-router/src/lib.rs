//! # Pathway Router
//!
//! A zero-dependency translator from file-system paths to URL route patterns:
//! - Static routes (`about.page` → `/about`)
//! - Index files (`blog/index.page` → `/blog`)
//! - Dynamic segments (`profile/@name.page` → `/profile/:name`)
//! - Reserved special files (`_onError`, `_notFound`)
//! - Literal static-asset paths (`img/logo.png` → `/img/logo.png`)
//!
//! Every function in this crate is pure: the same relative path and the same
//! [`TranslatorConfig`] always produce the same pattern.
//!
//! ## Example
//!
//! ```
//! use pathway_router::{to_dynamic_pattern, to_static_pattern, RouteKind, TranslatorConfig};
//!
//! let config = TranslatorConfig::default();
//!
//! let pattern = to_dynamic_pattern("profile/@name.page", &config);
//! assert_eq!(pattern, "/profile/:name");
//! assert_eq!(RouteKind::for_dynamic_target(&pattern), RouteKind::Normal);
//!
//! let pattern = to_dynamic_pattern("_onError.page", &config);
//! assert_eq!(RouteKind::for_dynamic_target(&pattern), RouteKind::ErrorHandler);
//!
//! assert_eq!(to_static_pattern("img/logo.png"), "/img/logo.png");
//! ```

pub mod kind;
pub mod path;
pub mod route;

pub use kind::{RouteKind, ERROR_TARGET, NOT_FOUND_TARGET};
pub use path::{is_valid_path, normalize_path};
pub use route::parser::{to_dynamic_pattern, to_static_pattern};
pub use route::segment::{classify_segment, SegmentType};

/// Markers recognised while translating a relative path
///
/// Both markers are configurable so a project can pick a file naming
/// convention that suits its tooling.
///
/// # Examples
///
/// ```
/// use pathway_router::{to_dynamic_pattern, TranslatorConfig};
///
/// let config = TranslatorConfig::new("home", '$');
/// assert_eq!(to_dynamic_pattern("users/$id/home.page", &config), "/users/:id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// File stem that maps a directory onto its own root (default: `index`)
    pub index_marker: String,
    /// First character of a dynamic segment (default: `@`)
    pub dynamic_marker: char,
}

impl TranslatorConfig {
    pub fn new(index_marker: impl Into<String>, dynamic_marker: char) -> Self {
        Self {
            index_marker: index_marker.into(),
            dynamic_marker,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new("index", '@')
    }
}
