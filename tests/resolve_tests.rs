use pretty_assertions::assert_eq;
use uri_resolve::{resolve, resolve_str, resolve_with, ResolverConfig, Uri, UriError};

fn resolved(context: &str, reference: &str) -> String {
    resolve_str(context, reference).unwrap().to_string()
}

#[test]
fn test_relative_reference() {
    assert_eq!(resolved("scheme://example.com/a/b/", "c"), "scheme://example.com/a/b/c");
    assert_eq!(resolved("scheme://example.com/a/b", "c"), "scheme://example.com/a/c");
}

#[test]
fn test_absolute_path_reference() {
    assert_eq!(resolved("scheme://example.com/a/b/", "/c"), "scheme://example.com/c");
}

#[test]
fn test_absolute_reference_wins() {
    assert_eq!(resolved("scheme://example.com/a/b/", "other:/c"), "other:/c");
    assert_eq!(
        resolved("jar:file:///a/b.jar!/c", "http://h/x/../y"),
        "http://h/x/../y"
    );
}

#[test]
fn test_composite_scheme() {
    assert_eq!(resolved("jar:file:///a/b.jar!/c", "d"), "jar:file:///a/b.jar!/d");
    assert_eq!(resolved("jar:file:///a/b.jar!/c", "/d"), "jar:file:///a/b.jar!/d");
    assert_eq!(
        resolved("jar:file:///a/b.jar!/c/d/e", "../f"),
        "jar:file:///a/b.jar!/c/f"
    );
    assert_eq!(
        resolved("jar:file:///a/b.jar!/c", "../../../x"),
        "jar:file:///a/b.jar!/x"
    );
    assert_eq!(
        resolved("jar:file:///a/b.jar!/c", "jar:file:///z.jar!/y"),
        "jar:file:///z.jar!/y"
    );
}

#[test]
fn test_composite_scheme_empty_entry() {
    assert_eq!(resolved("jar:file:///a/b.jar!", "d"), "jar:file:///a/b.jar!/d");
    assert_eq!(resolved("jar:file:///a/b.jar!", "../d"), "jar:file:///a/b.jar!/d");
}

#[test]
fn test_composite_scheme_nested() {
    assert_eq!(
        resolved("jar:jar:file:///a.jar!/b.jar!/c/d", "e"),
        "jar:jar:file:///a.jar!/b.jar!/c/e"
    );
}

#[test]
fn test_composite_scheme_allow_list() {
    let context = Uri::parse("http://example.com/a!b/c").unwrap();
    let reference = Uri::parse("/d").unwrap();

    assert_eq!(resolve(&context, &reference).to_string(), "http://example.com/a!/d");

    let config = ResolverConfig {
        composite_schemes: Some(vec!["jar".to_string()]),
        ..ResolverConfig::default()
    };
    assert_eq!(
        resolve_with(&config, &context, &reference).to_string(),
        "http://example.com/d"
    );
}

#[test]
fn test_unc_path() {
    assert_eq!(
        resolved("file:////server/share/dir/", "a/b"),
        "file:////server/share/dir/a/b"
    );
    assert_eq!(resolved("file:////server/share/file", "a"), "file:////server/share/a");
    assert_eq!(
        resolved("file:////server/share/dir/", "../../../../x"),
        "file:////x"
    );
}

#[test]
fn test_unc_disabled() {
    let context = Uri::parse("file:////server/share/").unwrap();
    let reference = Uri::parse("../../../x").unwrap();
    let config = ResolverConfig {
        preserve_unc: false,
        ..ResolverConfig::default()
    };
    assert_eq!(resolve(&context, &reference).to_string(), "file:////x");
    assert_eq!(
        resolve_with(&config, &context, &reference).to_string(),
        "file:///x"
    );
}

#[test]
fn test_rfc3986_normal_examples() {
    let base = "http://a/b/c/d;p?q";
    let cases = [
        ("g:h", "g:h"),
        ("g", "http://a/b/c/g"),
        ("./g", "http://a/b/c/g"),
        ("g/", "http://a/b/c/g/"),
        ("/g", "http://a/g"),
        ("//g", "http://g"),
        ("?y", "http://a/b/c/d;p?y"),
        ("g?y", "http://a/b/c/g?y"),
        ("#s", "http://a/b/c/d;p?q#s"),
        ("g#s", "http://a/b/c/g#s"),
        ("g?y#s", "http://a/b/c/g?y#s"),
        (";x", "http://a/b/c/;x"),
        ("g;x", "http://a/b/c/g;x"),
        ("g;x?y#s", "http://a/b/c/g;x?y#s"),
        ("", "http://a/b/c/d;p?q"),
        (".", "http://a/b/c/"),
        ("./", "http://a/b/c/"),
        ("..", "http://a/b/"),
        ("../", "http://a/b/"),
        ("../g", "http://a/b/g"),
        ("../..", "http://a/"),
        ("../../", "http://a/"),
        ("../../g", "http://a/g"),
    ];
    for (reference, expected) in cases.iter() {
        assert_eq!(resolved(base, reference), *expected, "reference {}", reference);
    }
}

#[test]
fn test_rfc3986_abnormal_examples() {
    let base = "http://a/b/c/d;p?q";
    let cases = [
        ("../../../g", "http://a/g"),
        ("../../../../g", "http://a/g"),
        ("/./g", "http://a/g"),
        ("/../g", "http://a/g"),
        ("g.", "http://a/b/c/g."),
        (".g", "http://a/b/c/.g"),
        ("g..", "http://a/b/c/g.."),
        ("..g", "http://a/b/c/..g"),
        ("./../g", "http://a/b/g"),
        ("./g/.", "http://a/b/c/g/"),
        ("g/./h", "http://a/b/c/g/h"),
        ("g/../h", "http://a/b/c/h"),
        ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
        ("g;x=1/../y", "http://a/b/c/y"),
        ("http:g", "http://a/b/c/g"),
    ];
    for (reference, expected) in cases.iter() {
        assert_eq!(resolved(base, reference), *expected, "reference {}", reference);
    }
}

#[test]
fn test_empty_reference_inherits_fragment() {
    assert_eq!(resolved("http://a/b#f", ""), "http://a/b#f");
    assert_eq!(resolved("http://a/b?q#f", ""), "http://a/b?q#f");
    assert_eq!(resolved("http://a/b?q#f", "#g"), "http://a/b?q#g");
    assert_eq!(resolved("http://a/b?q#f", "?r"), "http://a/b?r#f");
    assert_eq!(resolved("http://a/b#f", "c"), "http://a/c");
    assert_eq!(resolved("jar:file:///a.jar!/b#f", ""), "jar:file:///a.jar!/b#f");
}

#[test]
fn test_resolve_result_is_parseable() {
    let uri = resolve_str("scheme://example.com/a/b/", "c?k=v#f").unwrap();
    assert_eq!(uri.scheme(), Some("scheme"));
    assert_eq!(uri.authority(), Some("example.com"));
    assert_eq!(uri.path(), "/a/b/c");
    assert_eq!(uri.query(), Some("k=v"));
    assert_eq!(uri.fragment(), Some("f"));
    assert_eq!(Uri::parse(&uri.to_string()).unwrap(), uri);
}

#[test]
fn test_uri_resolve_method() {
    let context = Uri::parse("scheme://example.com/a/b/").unwrap();
    let reference = Uri::parse("../c").unwrap();
    assert_eq!(context.resolve(&reference).to_string(), "scheme://example.com/a/c");
}

#[test]
fn test_invalid_arguments() {
    assert!(matches!(
        resolve_str("", "a"),
        Err(UriError::InvalidArgument(_))
    ));
    assert!(matches!(
        resolve_str("http://a/b c", "a"),
        Err(UriError::Parse { position: 10, .. })
    ));
}

#[test]
fn test_config_from_yaml() {
    let config = ResolverConfig::from_yaml("composite_schemes: [jar, zip]\npreserve_unc: false\n")
        .unwrap();
    assert_eq!(
        config.composite_schemes,
        Some(vec!["jar".to_string(), "zip".to_string()])
    );
    assert!(!config.preserve_unc);

    let config = ResolverConfig::from_yaml("{}").unwrap();
    assert_eq!(config, ResolverConfig::default());

    assert!(matches!(
        ResolverConfig::from_yaml("preserve_unc: [1"),
        Err(UriError::Config(_))
    ));
}

#[test]
fn test_config_to_yaml() {
    let yaml = serde_yaml::to_string(&ResolverConfig::default()).unwrap();
    assert_eq!(yaml, "preserve_unc: true\n");

    let config = ResolverConfig {
        composite_schemes: Some(vec!["jar".to_string()]),
        preserve_unc: false,
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(yaml.contains("composite_schemes"));
    assert_eq!(ResolverConfig::from_yaml(&yaml).unwrap(), config);
}
