//! Segment classification
//!
//! Pure functional parsing of one path segment into a typed segment.

use crate::kind::{ERROR_TARGET, NOT_FOUND_TARGET};

/// Represents the different kinds of segments found in a route file path
///
/// # Examples
///
/// ```
/// use pathway_router::{classify_segment, SegmentType, TranslatorConfig};
///
/// let config = TranslatorConfig::default();
///
/// assert_eq!(classify_segment("about", true, &config), SegmentType::Static("about"));
/// assert_eq!(classify_segment("@id", false, &config), SegmentType::Dynamic("id"));
/// assert_eq!(classify_segment("index", true, &config), SegmentType::Index);
/// assert_eq!(classify_segment("_onError", true, &config), SegmentType::Reserved("/_onError"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType<'a> {
    /// Literal text segment
    Static(&'a str),
    /// Named parameter segment (`@name` → `:name`)
    Dynamic(&'a str),
    /// Trailing index file, mapped onto the enclosing directory
    Index,
    /// Reserved special file mapped onto a fixed target
    Reserved(&'static str),
}

/// Classifies a single segment (pure function)
///
/// `segment` must already have its file extension removed when it is the
/// final segment. Reserved names and the index marker are only recognised
/// in the final position; anywhere else they are literal text.
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Reserved**: final `_onError` / `_notFound`
/// 2. **Index**: final segment equal to the index marker
/// 3. **Dynamic**: marker followed by a non-empty name
/// 4. **Static**: any other text
pub fn classify_segment<'a>(
    segment: &'a str,
    is_last: bool,
    config: &crate::TranslatorConfig,
) -> SegmentType<'a> {
    if is_last {
        if let Some(target) = reserved_target(segment) {
            return SegmentType::Reserved(target);
        }
        if segment == config.index_marker {
            return SegmentType::Index;
        }
    }

    match segment.strip_prefix(config.dynamic_marker) {
        Some(name) if !name.is_empty() => SegmentType::Dynamic(name),
        _ => SegmentType::Static(segment),
    }
}

/// Maps a reserved file stem onto its fixed target
fn reserved_target(segment: &str) -> Option<&'static str> {
    match segment {
        "_onError" => Some(ERROR_TARGET),
        "_notFound" => Some(NOT_FOUND_TARGET),
        _ => None,
    }
}

/// Removes the file extension from a file name
///
/// Only the last `.ext` is removed, and a leading dot (as in `.env`) is not
/// treated as an extension separator.
///
/// ```
/// use pathway_router::route::segment::strip_extension;
///
/// assert_eq!(strip_extension("@name.page"), "@name");
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(strip_extension(".env"), ".env");
/// assert_eq!(strip_extension("README"), "README");
/// ```
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}
