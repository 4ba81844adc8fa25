//! Percent-encoding helpers.
//!
//! Delimiters are always located on the raw text first; [`decode`] is only
//! ever applied to a token whose boundaries are already known, so `%2F`,
//! `%3B` and `%3D` never act as delimiters.

use crate::error::{UriError, UriResult};

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// Byte value of a well-formed `%XX` triple starting at `pos`.
fn escaped_byte(input: &[u8], pos: usize) -> Option<u8> {
    if pos + 2 >= input.len() || input[pos] != b'%' {
        return None;
    }
    let hi = hex_value(input[pos + 1])?;
    let lo = hex_value(input[pos + 2])?;
    Some(hi << 4 | lo)
}

/// Replaces every `%XX` triple of `token` with the byte it encodes.
///
/// Fails with [`UriError::MalformedPercentEncoding`] when a `%` is not
/// followed by two hexadecimal digits. Bytes that do not form valid UTF-8
/// are replaced with U+FFFD.
pub fn decode(token: &str) -> UriResult<String> {
    let input = token.as_bytes();
    if !input.contains(&b'%') {
        return Ok(token.to_string());
    }

    let mut out = Vec::with_capacity(input.len());
    let mut pos = 0;
    while pos < input.len() {
        if input[pos] == b'%' {
            let b = escaped_byte(input, pos).ok_or_else(|| UriError::MalformedPercentEncoding {
                input: token.to_string(),
                position: pos,
            })?;
            out.push(b);
            pos += 3;
        } else {
            out.push(input[pos]);
            pos += 1;
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Decodes `input[start..end]`, reporting a malformed escape against the
/// whole of `input`.
pub fn decode_span(input: &str, start: usize, end: usize) -> UriResult<String> {
    decode(&input[start..end]).map_err(|err| match err {
        UriError::MalformedPercentEncoding { position, .. } => UriError::MalformedPercentEncoding {
            input: input.to_string(),
            position: start + position,
        },
        other => other,
    })
}

/// Byte offsets of every literal (unescaped) occurrence of `delim` in `raw`.
///
/// A well-formed `%XX` triple is skipped over as a unit.
pub fn find_unescaped(raw: &str, delim: u8) -> Vec<usize> {
    let input = raw.as_bytes();
    let mut found = vec![];
    let mut pos = 0;
    while pos < input.len() {
        if escaped_byte(input, pos).is_some() {
            pos += 3;
            continue;
        }
        if input[pos] == delim {
            found.push(pos);
        }
        pos += 1;
    }
    found
}

/// Byte ranges of the tokens between literal `delim` bytes, empty ones included.
pub fn unescaped_spans(raw: &str, delim: u8) -> Vec<(usize, usize)> {
    let mut spans = vec![];
    let mut start = 0;
    for pos in find_unescaped(raw, delim) {
        spans.push((start, pos));
        start = pos + 1;
    }
    spans.push((start, raw.len()));
    spans
}

/// Splits `raw` on literal `delim` bytes, keeping empty tokens.
pub fn split_unescaped(raw: &str, delim: u8) -> Vec<&str> {
    unescaped_spans(raw, delim)
        .into_iter()
        .map(|(start, end)| &raw[start..end])
        .collect()
}

#[test]
fn test_decode() {
    assert_eq!(decode("abc"), Ok("abc".to_string()));
    assert_eq!(decode("a%2Fb"), Ok("a/b".to_string()));
    assert_eq!(decode("%3b%3D"), Ok(";=".to_string()));
    assert_eq!(decode("caf%C3%A9"), Ok("café".to_string()));
    assert_eq!(decode(""), Ok("".to_string()));
}

#[test]
fn test_decode_malformed() {
    assert_eq!(
        decode("ab%2"),
        Err(UriError::MalformedPercentEncoding {
            input: "ab%2".to_string(),
            position: 2
        })
    );
    assert!(decode("%").is_err());
    assert!(decode("%zz").is_err());
    assert!(decode("x%G0").is_err());
}

#[test]
fn test_decode_span() {
    assert_eq!(decode_span("a/b%41;c", 2, 6), Ok("bA".to_string()));
    assert_eq!(
        decode_span("a/b%4;c", 2, 6),
        Err(UriError::MalformedPercentEncoding {
            input: "a/b%4;c".to_string(),
            position: 3
        })
    );
}

#[test]
fn test_find_unescaped() {
    assert_eq!(find_unescaped("a/b%2Fc/", b'/'), vec![1, 8]);
    assert_eq!(find_unescaped("b%3Bx;y", b';'), vec![5]);
    assert_eq!(find_unescaped("%", b'%'), vec![0]);
}

#[test]
fn test_unescaped_spans() {
    assert_eq!(unescaped_spans("/a%2F/", b'/'), vec![(0, 0), (1, 5), (6, 6)]);
}

#[test]
fn test_split_unescaped() {
    assert_eq!(split_unescaped("b;x=y;z", b';'), vec!["b", "x=y", "z"]);
    assert_eq!(split_unescaped("x%3Dy=z", b'='), vec!["x%3Dy", "z"]);
    assert_eq!(split_unescaped("", b';'), vec![""]);
}
