//! # uri-resolve
//!
//! URI path decomposition and reference resolution.
//!
//! - [`UriPath`] splits a raw, percent-encoded path into segments, matrix
//!   parameters, directory name and file name, and always prints back the
//!   exact text it was parsed from.
//! - [`resolve`] resolves a reference against a context URI following
//!   RFC 3986 §5, and also handles composite locators
//!   (`jar:file:///a/b.jar!/c`) and UNC file URIs (`file:////server/share/`).
//!
//! ## Example
//! ```
//! use uri_resolve::{resolve_str, UriPath};
//!
//! let path = UriPath::parse("a/b;x=y").unwrap();
//! assert_eq!(path.file_name(), "b");
//! assert_eq!(path.parameter("x"), Some("y"));
//!
//! let uri = resolve_str("jar:file:///a/b.jar!/c", "d").unwrap();
//! assert_eq!(uri.to_string(), "jar:file:///a/b.jar!/d");
//! ```

pub mod error;
mod parser;
pub mod path;
pub mod percent;
pub mod resolver;
pub mod uri;

pub use error::{UriError, UriResult};
pub use path::UriPath;
pub use resolver::{remove_dot_segments, resolve, resolve_str, resolve_with, ResolverConfig};
pub use uri::Uri;
