use std::fmt;
use std::str::FromStr;

use crate::error::{UriError, UriResult};
use crate::parser::{self, Token, TokenKind};
use crate::path::UriPath;

/// A URI reference split into its generic components.
///
/// `raw` is the exact text the value was parsed from. Absent components are
/// `None`; a delimiter followed by nothing (e.g. `http://h/?`) is `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    raw: String,
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Parses a URI reference, absolute or relative.
    pub fn parse(input: &str) -> UriResult<Self> {
        let tokens = parser::lex(input)?;
        Ok(Self::from_tokens(input, tokens))
    }

    // Raw text assembled from components of already parsed values.
    pub(crate) fn from_raw(raw: String) -> Self {
        let tokens = parser::split(&raw);
        Self::from_tokens(&raw, tokens)
    }

    fn from_tokens(raw: &str, tokens: Vec<Token>) -> Self {
        let mut uri = Self {
            raw: raw.to_string(),
            scheme: None,
            authority: None,
            path: String::new(),
            query: None,
            fragment: None,
        };
        for t in tokens {
            match t.value {
                TokenKind::Scheme(a) => uri.scheme = Some(a),
                TokenKind::Authority(a) => uri.authority = Some(a),
                TokenKind::Path(a) => uri.path = a,
                TokenKind::Query(a) => uri.query = Some(a),
                TokenKind::Fragment(a) => uri.fragment = Some(a),
            }
        }
        uri
    }

    /// Recomposes a URI from its components (RFC 3986 §5.3).
    pub fn from_parts(
        scheme: Option<&str>,
        authority: Option<&str>,
        path: &str,
        query: Option<&str>,
        fragment: Option<&str>,
    ) -> Self {
        let mut raw = String::new();
        if let Some(scheme) = scheme {
            raw += scheme;
            raw += ":";
        }
        if let Some(authority) = authority {
            raw += "//";
            raw += authority;
        }
        raw += path;
        if let Some(query) = query {
            raw += "?";
            raw += query;
        }
        if let Some(fragment) = fragment {
            raw += "#";
            raw += fragment;
        }

        Self {
            raw,
            scheme: scheme.map(str::to_string),
            authority: authority.map(str::to_string),
            path: path.to_string(),
            query: query.map(str::to_string),
            fragment: fragment.map(str::to_string),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Raw text between `scheme:` and the fragment, query included.
    pub fn scheme_specific_part(&self) -> &str {
        let start = self.scheme.as_ref().map(|s| s.len() + 1).unwrap_or(0);
        let end = self.raw.find('#').unwrap_or_else(|| self.raw.len());
        &self.raw[start..end]
    }

    /// `true` when the reference carries its own scheme.
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    pub fn uri_path(&self) -> UriResult<UriPath> {
        UriPath::parse(&self.path)
    }

    /// Resolves `reference` against `self`. See [`crate::resolve`].
    pub fn resolve(&self, reference: &Uri) -> Uri {
        crate::resolver::resolve(self, reference)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> UriResult<Self> {
        Self::parse(s)
    }
}

#[test]
fn test_parse_components() {
    let uri = Uri::parse("https://github.com/iwot/parse-uri-rs?tab=1#readme").unwrap();
    assert_eq!(uri.scheme(), Some("https"));
    assert_eq!(uri.authority(), Some("github.com"));
    assert_eq!(uri.path(), "/iwot/parse-uri-rs");
    assert_eq!(uri.query(), Some("tab=1"));
    assert_eq!(uri.fragment(), Some("readme"));
    assert_eq!(uri.scheme_specific_part(), "//github.com/iwot/parse-uri-rs?tab=1");
    assert_eq!(uri.to_string(), "https://github.com/iwot/parse-uri-rs?tab=1#readme");
}

#[test]
fn test_parse_relative() {
    let uri = Uri::parse("../a;p=1?q").unwrap();
    assert!(!uri.is_absolute());
    assert_eq!(uri.authority(), None);
    assert_eq!(uri.path(), "../a;p=1");
    assert_eq!(uri.query(), Some("q"));
    assert_eq!(uri.fragment(), None);
    assert_eq!(uri.scheme_specific_part(), "../a;p=1?q");
}

#[test]
fn test_parse_empty_delimiters() {
    let uri = Uri::parse("s://h?#").unwrap();
    assert_eq!(uri.path(), "");
    assert_eq!(uri.query(), Some(""));
    assert_eq!(uri.fragment(), Some(""));
}

#[test]
fn test_from_parts() {
    let uri = Uri::from_parts(Some("file"), Some(""), "//server/share/", None, Some("x"));
    assert_eq!(uri.raw(), "file:////server/share/#x");
    assert_eq!(uri, Uri::parse("file:////server/share/#x").unwrap());
}

#[test]
fn test_uri_path() {
    let uri = Uri::parse("http://h/a/b;v=2").unwrap();
    let path = uri.uri_path().unwrap();
    assert_eq!(path.file_name(), "b");
    assert_eq!(path.parameter("v"), Some("2"));
}
