//! Route module for file-based routing
//!
//! Contains the pure components that turn a relative file path into a URL
//! pattern: segment classification and the fold-based parser.

pub mod parser;
pub mod segment;

pub use parser::{to_dynamic_pattern, to_static_pattern};
pub use segment::{classify_segment, strip_extension, SegmentType};
