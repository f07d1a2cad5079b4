use super::*;

#[test]
#[cfg(feature = "lang-javascript")]
fn lang_from_name() {
    assert_eq!(from_name("js").unwrap().name(), "javascript");
    assert_eq!(from_name("JavaScript").unwrap().name(), "javascript");
    assert!(from_name("unknown").is_none());
}

#[test]
#[cfg(feature = "lang-go")]
fn lang_from_name_golang() {
    assert_eq!(from_name("go").unwrap().name(), "go");
    assert_eq!(from_name("golang").unwrap().name(), "go");
    assert_eq!(from_name("GOLANG").unwrap().name(), "go");
}

#[test]
#[cfg(feature = "lang-javascript")]
fn lang_from_extension() {
    assert_eq!(from_ext("js").unwrap().name(), "javascript");
    assert_eq!(from_ext("mjs").unwrap().name(), "javascript");
    assert!(from_ext("nope").is_none());
}

#[test]
#[cfg(all(feature = "lang-typescript", feature = "lang-tsx"))]
fn typescript_and_tsx() {
    assert_eq!(typescript().name(), "typescript");
    assert_eq!(tsx().name(), "tsx");
    assert_eq!(from_ext("ts").unwrap().name(), "typescript");
    assert_eq!(from_ext("tsx").unwrap().name(), "tsx");
}

#[test]
fn all_returns_enabled_langs() {
    let langs = all();
    assert!(!langs.is_empty());
    for lang in &langs {
        assert!(!lang.name().is_empty());
    }
    assert_eq!(all_with_aliases().len(), langs.len());
}

#[test]
#[cfg(feature = "lang-json")]
fn lang_is_shared() {
    let a = json();
    let b = from_name("json").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
#[cfg(feature = "lang-json")]
fn parse_whole_document() {
    let tree = json().parse(r#"{"a": [1, 2]}"#).unwrap();
    let root = tree.root_node();
    assert_eq!(root.kind(), "document");
    assert!(!root.has_error());
    assert_eq!(root.child(0).unwrap().kind(), "object");
}

#[test]
#[cfg(feature = "lang-json")]
fn parse_keeps_errors_in_tree() {
    let tree = json().parse("{").unwrap();
    assert!(tree.root_node().has_error());
}

#[test]
#[cfg(feature = "lang-json")]
fn parse_included_ranges_only() {
    // Only the bracketed part is JSON.
    let source = "xx [1] yy";
    let range = tree_sitter::Range {
        start_byte: 3,
        end_byte: 6,
        start_point: tree_sitter::Point { row: 0, column: 3 },
        end_point: tree_sitter::Point { row: 0, column: 6 },
    };
    let tree = json().parse_ranges(source, &[range]).unwrap();
    let root = tree.root_node();
    assert!(!root.has_error());
    assert_eq!(root.start_byte(), 3);
    assert_eq!(root.end_byte(), 6);
}

#[test]
#[cfg(feature = "lang-json")]
fn parse_rejects_unordered_ranges() {
    let source = "[1] [2]";
    let first = tree_sitter::Range {
        start_byte: 4,
        end_byte: 7,
        start_point: tree_sitter::Point { row: 0, column: 4 },
        end_point: tree_sitter::Point { row: 0, column: 7 },
    };
    let second = tree_sitter::Range {
        start_byte: 0,
        end_byte: 3,
        start_point: tree_sitter::Point { row: 0, column: 0 },
        end_point: tree_sitter::Point { row: 0, column: 3 },
    };
    let err = json().parse_ranges(source, &[first, second]).unwrap_err();
    assert!(matches!(err, ParseError::InvalidRanges { .. }));
}

#[test]
#[cfg(feature = "lang-query")]
fn query_grammar_parses_patterns() {
    let tree = query().parse("(pair key: (string) @key)").unwrap();
    assert!(!tree.root_node().has_error());
}

#[test]
fn parse_error_messages() {
    assert_eq!(
        ParseError::NoTree("json".into()).to_string(),
        "parser produced no tree for 'json'"
    );
}
