//! Reference resolution (RFC 3986 §5.2) with two additions: composite
//! `!` locators such as `jar:file:///a/b.jar!/c` resolve against the part
//! after the `!`, and UNC file URIs such as `file:////server/share/` keep
//! their leading slash run untouched.

use serde::{Deserialize, Serialize};

use crate::error::{UriError, UriResult};
use crate::uri::Uri;

/// Resolver behaviour switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Schemes the composite `!` rule applies to. `None` means every scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_schemes: Option<Vec<String>>,
    /// Keep the slash run of `file:////server/share` style contexts.
    pub preserve_unc: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            composite_schemes: None,
            preserve_unc: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> UriResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn allows_composite(&self, scheme: &str) -> bool {
        match &self.composite_schemes {
            Some(schemes) => schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)),
            None => true,
        }
    }
}

/// Resolves `reference` against `context` with the default configuration.
pub fn resolve(context: &Uri, reference: &Uri) -> Uri {
    resolve_with(&ResolverConfig::default(), context, reference)
}

/// Parses both arguments and resolves `reference` against `context`.
///
/// An empty `context` is rejected: there is no base to resolve against.
pub fn resolve_str(context: &str, reference: &str) -> UriResult<Uri> {
    if context.is_empty() {
        return Err(UriError::InvalidArgument("context URI is empty".to_string()));
    }
    let context = Uri::parse(context)?;
    let reference = Uri::parse(reference)?;
    Ok(resolve(&context, &reference))
}

pub fn resolve_with(config: &ResolverConfig, context: &Uri, reference: &Uri) -> Uri {
    if let Some(scheme) = reference.scheme() {
        let same = context
            .scheme()
            .map_or(false, |s| s.eq_ignore_ascii_case(scheme));
        if !same {
            tracing::debug!("{} is absolute, keeping it", reference);
            return reference.clone();
        }
    }

    if let Some(bang) = composite_separator(config, context) {
        tracing::debug!("resolving {} inside composite {}", reference, context);
        return resolve_composite(context, reference, bang);
    }

    let unc = config.preserve_unc && is_unc(context);
    if unc {
        tracing::debug!("resolving {} against UNC {}", reference, context);
    }
    merge(context, reference, unc)
}

// Offset of the last literal `!` in the hierarchical part of the
// scheme-specific part, if the composite rule applies.
fn composite_separator(config: &ResolverConfig, context: &Uri) -> Option<usize> {
    let scheme = context.scheme()?;
    if !config.allows_composite(scheme) {
        return None;
    }
    let ssp = context.scheme_specific_part();
    let hier_end = ssp.find('?').unwrap_or_else(|| ssp.len());
    ssp[..hier_end].rfind('!')
}

fn resolve_composite(context: &Uri, reference: &Uri, bang: usize) -> Uri {
    // Same scheme as the context: already a complete composite locator.
    if reference.is_absolute() {
        return reference.clone();
    }

    let ssp = context.scheme_specific_part();
    let hier_end = ssp.find('?').unwrap_or_else(|| ssp.len());
    let outer = &ssp[..=bang];
    // an empty entry path is the archive root
    let inner_path = match &ssp[bang + 1..hier_end] {
        "" => "/",
        p => p,
    };
    let inner = Uri::from_parts(
        None,
        None,
        inner_path,
        context.query(),
        context.fragment(),
    );

    let resolved = merge(&inner, reference, false);
    let scheme = context.scheme().unwrap_or_default();
    Uri::from_raw(format!("{}:{}{}", scheme, outer, resolved))
}

fn is_unc(context: &Uri) -> bool {
    context.is_absolute() && context.scheme_specific_part().starts_with("///")
}

// RFC 3986 §5.2.2, non-strict: the reference scheme, if any, equals the
// context scheme and is ignored. A reference with an empty path inherits
// the context query and fragment it does not carry itself.
fn merge(base: &Uri, reference: &Uri, unc: bool) -> Uri {
    let normalize = |path: &str| {
        if unc {
            remove_dot_segments_keep_root(path)
        } else {
            remove_dot_segments(path)
        }
    };

    let authority;
    let path;
    let query;
    let mut fragment = reference.fragment();
    if reference.authority().is_some() {
        authority = reference.authority();
        path = remove_dot_segments(reference.path());
        query = reference.query();
    } else {
        authority = base.authority();
        if reference.path().is_empty() {
            path = base.path().to_string();
            query = reference.query().or_else(|| base.query());
            fragment = fragment.or_else(|| base.fragment());
        } else {
            if reference.path().starts_with('/') {
                path = remove_dot_segments(reference.path());
            } else {
                path = normalize(&merge_paths(base, reference.path()));
            }
            query = reference.query();
        }
    }

    Uri::from_parts(
        base.scheme(),
        authority,
        &path,
        query,
        fragment,
    )
}

// RFC 3986 §5.2.3.
fn merge_paths(base: &Uri, reference_path: &str) -> String {
    if base.authority().is_some() && base.path().is_empty() {
        return format!("/{}", reference_path);
    }
    match base.path().rfind('/') {
        Some(slash) => format!("{}{}", &base.path()[..=slash], reference_path),
        None => reference_path.to_string(),
    }
}

/// Removes `.` and `..` segments (RFC 3986 §5.2.4). A `..` never climbs
/// above the root.
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = if input.starts_with('/') { 1 } else { 0 };
            let end = input[start..]
                .find('/')
                .map(|p| p + start)
                .unwrap_or_else(|| input.len());
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

fn pop_segment(output: &mut String) {
    match output.rfind('/') {
        Some(slash) => output.truncate(slash),
        None => output.clear(),
    }
}

// Dot-segment removal that leaves a leading run of slashes as it is.
fn remove_dot_segments_keep_root(path: &str) -> String {
    let run = path.len() - path.trim_start_matches('/').len();
    if run <= 1 {
        return remove_dot_segments(path);
    }
    format!("{}{}", &path[..run - 1], remove_dot_segments(&path[run - 1..]))
}

#[test]
fn test_remove_dot_segments() {
    assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
    assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
    assert_eq!(remove_dot_segments("/../../x"), "/x");
    assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
    assert_eq!(remove_dot_segments("/a/./"), "/a/");
    assert_eq!(remove_dot_segments(""), "");
    assert_eq!(remove_dot_segments(".."), "");
}

#[test]
fn test_remove_dot_segments_keep_root() {
    assert_eq!(
        remove_dot_segments_keep_root("//server/share/../../../x"),
        "//x"
    );
    assert_eq!(remove_dot_segments_keep_root("//s/d/./a"), "//s/d/a");
    assert_eq!(remove_dot_segments_keep_root("/a/../b"), "/b");
}

#[test]
fn test_merge_paths() {
    let base = Uri::parse("http://h").unwrap();
    assert_eq!(merge_paths(&base, "a"), "/a");
    let base = Uri::parse("http://h/x/y").unwrap();
    assert_eq!(merge_paths(&base, "a"), "/x/a");
    let base = Uri::parse("y").unwrap();
    assert_eq!(merge_paths(&base, "a"), "a");
}

#[test]
fn test_composite_separator() {
    let config = ResolverConfig::default();
    let uri = Uri::parse("jar:file:///a/b.jar!/c").unwrap();
    assert_eq!(composite_separator(&config, &uri), Some(15));

    let uri = Uri::parse("http://h/a?x=!").unwrap();
    assert_eq!(composite_separator(&config, &uri), None);

    let config = ResolverConfig {
        composite_schemes: Some(vec!["zip".to_string()]),
        ..ResolverConfig::default()
    };
    let uri = Uri::parse("jar:file:///a/b.jar!/c").unwrap();
    assert_eq!(composite_separator(&config, &uri), None);
}
