//! Generic URI reference lexer.
//!
//! Splits a URI reference into scheme, authority, path, query and fragment
//! tokens the way RFC 3986 Appendix B does. Components are only delimited,
//! never validated beyond rejecting whitespace and control characters.

use crate::error::UriError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Loc(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Annot<T> {
    pub value: T,
    pub loc: Loc,
}

impl<T> Annot<T> {
    fn new(value: T, loc: Loc) -> Self {
        Self { value, loc }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TokenKind {
    Scheme(String),
    Authority(String),
    Path(String),
    Query(String),
    Fragment(String),
}

pub(crate) type Token = Annot<TokenKind>;

impl Token {
    fn scheme(v: String, loc: Loc) -> Self {
        Self::new(TokenKind::Scheme(v), loc)
    }

    fn authority(v: String, loc: Loc) -> Self {
        Self::new(TokenKind::Authority(v), loc)
    }

    fn path(v: String, loc: Loc) -> Self {
        Self::new(TokenKind::Path(v), loc)
    }

    fn query(v: String, loc: Loc) -> Self {
        Self::new(TokenKind::Query(v), loc)
    }

    fn fragment(v: String, loc: Loc) -> Self {
        Self::new(TokenKind::Fragment(v), loc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum LexErrorKind {
    InvalidChar(char),
}

pub(crate) type LexError = Annot<LexErrorKind>;

impl LexError {
    fn invalid_char(c: char, loc: Loc) -> Self {
        LexError::new(LexErrorKind::InvalidChar(c), loc)
    }
}

impl From<LexError> for UriError {
    fn from(err: LexError) -> Self {
        let message = match err.value {
            LexErrorKind::InvalidChar(c) => format!("invalid character {:?}", c),
        };
        UriError::Parse {
            position: err.loc.0,
            message,
        }
    }
}

// Advances while `f` holds.
fn recognize_many0(input: &[char], mut pos: usize, mut f: impl FnMut(char) -> bool) -> usize {
    while pos < input.len() && f(input[pos]) {
        pos += 1;
    }
    pos
}

// Advances up to the first char in `stoppers`, or to the end.
fn recognize_until(input: &[char], pos: usize, stoppers: &[char]) -> usize {
    recognize_many0(input, pos, |c| !stoppers.contains(&c))
}

fn collect(input: &[char], start: usize, end: usize) -> String {
    input[start..end].iter().collect::<String>()
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "+-.".contains(c)
}

fn lex_scheme(input: &[char], pos: usize) -> Option<(Token, usize)> {
    if pos >= input.len() || !input[pos].is_ascii_alphabetic() {
        return None;
    }
    let end = recognize_many0(input, pos + 1, is_scheme_char);
    if end < input.len() && input[end] == ':' {
        Some((Token::scheme(collect(input, pos, end), Loc(pos, end)), end + 1))
    } else {
        None
    }
}

fn lex_authority(input: &[char], pos: usize) -> Option<(Token, usize)> {
    if pos + 1 < input.len() && input[pos] == '/' && input[pos + 1] == '/' {
        let start = pos + 2;
        let end = recognize_until(input, start, &['/', '?', '#']);
        Some((Token::authority(collect(input, start, end), Loc(start, end)), end))
    } else {
        None
    }
}

fn lex_path(input: &[char], pos: usize) -> (Token, usize) {
    let end = recognize_until(input, pos, &['?', '#']);
    (Token::path(collect(input, pos, end), Loc(pos, end)), end)
}

fn lex_query(input: &[char], pos: usize) -> (Token, usize) {
    let end = recognize_until(input, pos, &['#']);
    (Token::query(collect(input, pos, end), Loc(pos, end)), end)
}

fn lex_fragment(input: &[char], pos: usize) -> (Token, usize) {
    let end = input.len();
    (Token::fragment(collect(input, pos, end), Loc(pos, end)), end)
}

/// Splits `input` into component tokens. Any string is accepted.
pub(crate) fn split(input: &str) -> Vec<Token> {
    let input = input.chars().collect::<Vec<char>>();
    let mut tokens = vec![];
    let mut pos = 0;

    if let Some((tok, p)) = lex_scheme(&input, pos) {
        tokens.push(tok);
        pos = p;
    }
    if let Some((tok, p)) = lex_authority(&input, pos) {
        tokens.push(tok);
        pos = p;
    }
    let (tok, p) = lex_path(&input, pos);
    tokens.push(tok);
    pos = p;

    if pos < input.len() && input[pos] == '?' {
        let (tok, p) = lex_query(&input, pos + 1);
        tokens.push(tok);
        pos = p;
    }
    if pos < input.len() && input[pos] == '#' {
        let (tok, _) = lex_fragment(&input, pos + 1);
        tokens.push(tok);
    }
    tracing::trace!("split {} tokens", tokens.len());
    tokens
}

/// Like [`split`], but rejects whitespace and control characters first.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    if let Some((pos, c)) = input
        .chars()
        .enumerate()
        .find(|(_, c)| c.is_whitespace() || c.is_control())
    {
        return Err(LexError::invalid_char(c, Loc(pos, pos + 1)));
    }
    Ok(split(input))
}

#[test]
fn test_lex_full() {
    let expect = vec![
        Token::scheme("https".to_string(), Loc(0, 5)),
        Token::authority("user@zxy.com:8080".to_string(), Loc(8, 25)),
        Token::path("/aa1/bb2".to_string(), Loc(25, 33)),
        Token::query("k=v".to_string(), Loc(34, 37)),
        Token::fragment("top".to_string(), Loc(38, 41)),
    ];
    assert_eq!(lex("https://user@zxy.com:8080/aa1/bb2?k=v#top"), Ok(expect));
}

#[test]
fn test_lex_opaque() {
    let expect = vec![
        Token::scheme("jar".to_string(), Loc(0, 3)),
        Token::path("file:///a/b.jar!/c".to_string(), Loc(4, 22)),
    ];
    assert_eq!(lex("jar:file:///a/b.jar!/c"), Ok(expect));
}

#[test]
fn test_lex_unc() {
    let expect = vec![
        Token::scheme("file".to_string(), Loc(0, 4)),
        Token::authority("".to_string(), Loc(7, 7)),
        Token::path("//server/share/".to_string(), Loc(7, 22)),
    ];
    assert_eq!(lex("file:////server/share/"), Ok(expect));
}

#[test]
fn test_lex_relative() {
    assert_eq!(lex("a/b:c"), Ok(vec![Token::path("a/b:c".to_string(), Loc(0, 5))]));
    assert_eq!(lex("1a:b"), Ok(vec![Token::path("1a:b".to_string(), Loc(0, 4))]));
    assert_eq!(
        lex("?q"),
        Ok(vec![
            Token::path("".to_string(), Loc(0, 0)),
            Token::query("q".to_string(), Loc(1, 2)),
        ])
    );
    assert_eq!(lex(""), Ok(vec![Token::path("".to_string(), Loc(0, 0))]));
}

#[test]
fn test_lex_invalid_char() {
    assert_eq!(
        lex("http://a b"),
        Err(LexError::invalid_char(' ', Loc(8, 9)))
    );
}
