//! Path utilities for validation and normalization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use pathway_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/logo.png"));
/// assert!(is_valid_path("/img/logo.png"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("logo.png")); // Missing leading /
/// assert!(!is_valid_path("/img/")); // Trailing /
/// assert!(!is_valid_path("/img//logo.png")); // Double //
/// assert!(!is_valid_path("/img\\logo.png")); // Backslash
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations)
/// and `Cow::Owned` when normalization was needed.
///
/// # Handles
///
/// - Relative paths: `img/logo.png` → `/img/logo.png`
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Windows separators: `img\logo.png` → `/img/logo.png`
/// - Empty input: `` → `/`
///
/// # Examples
///
/// ```
/// use pathway_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/about");
/// assert!(matches!(path, Cow::Borrowed("/about")));
///
/// assert_eq!(normalize_path("img\\logo.png"), "/img/logo.png");
/// assert_eq!(normalize_path("/path//to///page/"), "/path/to/page");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = segments(path).collect::<Vec<_>>().join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Splits a relative or absolute path into its non-empty segments
///
/// Accepts both `/` and `\` as separators so paths produced on Windows
/// translate the same way.
///
/// ```
/// use pathway_router::path::segments;
///
/// let parts: Vec<&str> = segments("profile\\@name.page").collect();
/// assert_eq!(parts, vec!["profile", "@name.page"]);
/// ```
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/about"));
        assert!(is_valid_path("/css/site.css"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("about"));
        assert!(!is_valid_path("/about/"));
        assert!(!is_valid_path("/about//page"));
        assert!(!is_valid_path("/about\\page"));
    }

    #[test]
    fn test_normalize_path_valid_is_borrowed() {
        assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_relative() {
        assert_eq!(normalize_path("logo.png"), "/logo.png");
        assert_eq!(normalize_path("img/logo.png"), "/img/logo.png");
    }

    #[test]
    fn test_normalize_path_backslash() {
        assert_eq!(normalize_path("\\about"), "/about");
        assert_eq!(normalize_path("img\\icons\\x.svg"), "/img/icons/x.svg");
    }

    #[test]
    fn test_normalize_path_empty() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_segments_skips_empty() {
        let parts: Vec<&str> = segments("//a///b/").collect();
        assert_eq!(parts, vec!["a", "b"]);
    }
}
