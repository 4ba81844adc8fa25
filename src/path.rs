use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{UriError, UriResult};
use crate::percent::{decode_span, find_unescaped, unescaped_spans};

/// The path component of a URI, decomposed into directory, file, segments
/// and matrix parameters.
///
/// The raw text is kept verbatim; everything else is derived from it, so
/// `UriPath::parse(p)?.to_string() == p` for any `p`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriPath {
    raw: String,
    absolute: bool,
    directory: bool,
    segments: Vec<String>,
    parameters: Vec<(String, String)>,
    directory_name_end: usize,
    file_name: String,
}

impl UriPath {
    pub fn parse(raw: &str) -> UriResult<Self> {
        let absolute = raw.starts_with('/');
        let directory = raw.is_empty() || raw.ends_with('/');

        let mut segments = vec![];
        for (start, end) in unescaped_spans(raw, b'/') {
            if start < end {
                segments.push(decode_span(raw, start, end)?);
            }
        }

        // directory part ends just after the last literal '/'
        let directory_name_end = find_unescaped(raw, b'/').last().map(|p| p + 1).unwrap_or(0);

        let mut parameters = vec![];
        let mut file_name = String::new();
        if !directory {
            let spans = unescaped_spans(&raw[directory_name_end..], b';')
                .into_iter()
                .map(|(start, end)| (start + directory_name_end, end + directory_name_end))
                .collect::<Vec<_>>();
            let (start, end) = spans[0];
            file_name = decode_span(raw, start, end)?;
            for &(start, end) in spans[1..].iter().filter(|(start, end)| start < end) {
                parameters.push(parse_parameter(raw, start, end)?);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            absolute,
            directory,
            segments,
            parameters,
            directory_name_end,
            file_name,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `true` when the path begins with `/`.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// `true` when the path is empty or ends with `/`.
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Decoded, non-empty segments. A segment keeps its matrix parameters.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Decoded matrix parameters of the final segment, in order of appearance.
    ///
    /// A key given more than once keeps every occurrence (`b;x=1;x=2` has two
    /// `x` entries).
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Value of the first parameter named `key`.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw text up to and including the last literal `/`.
    pub fn directory_name(&self) -> &str {
        &self.raw[..self.directory_name_end]
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

// Splits the parameter token `raw[start..end]` at its first literal '='.
fn parse_parameter(raw: &str, start: usize, end: usize) -> UriResult<(String, String)> {
    match find_unescaped(&raw[start..end], b'=').first() {
        Some(&eq) => Ok((
            decode_span(raw, start, start + eq)?,
            decode_span(raw, start + eq + 1, end)?,
        )),
        None => Ok((decode_span(raw, start, end)?, String::new())),
    }
}

impl fmt::Display for UriPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for UriPath {
    type Err = UriError;

    fn from_str(s: &str) -> UriResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for UriPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for UriPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[test]
fn test_parse_flags() {
    let path = UriPath::parse("/a/b/").unwrap();
    assert!(path.is_absolute());
    assert!(path.is_directory());

    let path = UriPath::parse("a/b").unwrap();
    assert!(!path.is_absolute());
    assert!(!path.is_directory());

    let path = UriPath::parse("").unwrap();
    assert!(!path.is_absolute());
    assert!(path.is_directory());
    assert!(path.segments().is_empty());
}

#[test]
fn test_parse_segments() {
    let path = UriPath::parse("//a///b/c//").unwrap();
    assert_eq!(path.segments(), &["a", "b", "c"]);

    let path = UriPath::parse("a%2Fb").unwrap();
    assert_eq!(path.segments(), &["a/b"]);
    assert_eq!(path.file_name(), "a/b");
    assert_eq!(path.directory_name(), "");
}

#[test]
fn test_parse_directory_name() {
    assert_eq!(UriPath::parse("/a/b/c").unwrap().directory_name(), "/a/b/");
    assert_eq!(UriPath::parse("/a/b/").unwrap().directory_name(), "/a/b/");
    assert_eq!(UriPath::parse("c%2Fd").unwrap().directory_name(), "");
    assert_eq!(UriPath::parse("a%20b/c").unwrap().directory_name(), "a%20b/");
}

#[test]
fn test_parse_parameters() {
    let path = UriPath::parse("a/b;x=y;z=").unwrap();
    assert_eq!(path.file_name(), "b");
    assert_eq!(
        path.parameters(),
        &[
            ("x".to_string(), "y".to_string()),
            ("z".to_string(), "".to_string())
        ]
    );
    assert_eq!(path.parameter("x"), Some("y"));
    assert_eq!(path.parameter("w"), None);

    let path = UriPath::parse("a;p=1/b").unwrap();
    assert!(path.parameters().is_empty());
    assert_eq!(path.segments(), &["a;p=1", "b"]);

    let path = UriPath::parse("a/b;flag").unwrap();
    assert_eq!(path.parameters(), &[("flag".to_string(), "".to_string())]);
}

#[test]
fn test_parse_directory_has_no_file() {
    let path = UriPath::parse("a/b;x=y/").unwrap();
    assert_eq!(path.file_name(), "");
    assert!(path.parameters().is_empty());
}

#[test]
fn test_parse_malformed() {
    assert!(matches!(
        UriPath::parse("a/%zz/b"),
        Err(UriError::MalformedPercentEncoding { .. })
    ));
    assert!(UriPath::parse("a/b;k=%4").is_err());
    assert_eq!(
        UriPath::parse("a/%"),
        Err(UriError::MalformedPercentEncoding {
            input: "a/%".to_string(),
            position: 2
        })
    );
}

#[test]
fn test_parse_duplicate_parameters() {
    let path = UriPath::parse("a/b;x=1;x=2").unwrap();
    assert_eq!(
        path.parameters(),
        &[
            ("x".to_string(), "1".to_string()),
            ("x".to_string(), "2".to_string())
        ]
    );
    assert_eq!(path.parameter("x"), Some("1"));
}
