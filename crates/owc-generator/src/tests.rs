//! Tests for the OWC declaration scanner and generator

use super::*;
use owc_core::{BuildConfig, MacroTable, TokenKind};
use owc_preprocessor::{Preprocessor, TokenPreprocessor};
use pretty_assertions::assert_eq;

fn preprocess(source: &str) -> Vec<Token> {
    TokenPreprocessor::new(MacroTable::with_builtins(), Vec::new())
        .preprocess("widget.h", source.as_bytes())
        .unwrap()
}

/// A typical header with a namespaced object class
#[test]
fn test_namespaced_object_class() {
    let source = r#"
#ifndef WIDGET_H
#define WIDGET_H

namespace gui {
namespace detail { struct Helper { int x; }; }

class Widget : public QObject
{
    Q_OBJECT
public:
    explicit Widget(QObject *parent = nullptr);
    void paint() { if (dirty) { repaint(); } }
};

}

#endif
"#;
    let result = get_parser().parse(&preprocess(source));

    assert!(result.warnings.is_empty());
    assert_eq!(result.classes.len(), 1);
    let widget = &result.classes[0];
    assert_eq!(widget.qualified_name(), "gui::Widget");
    assert_eq!(widget.superclasses, vec!["QObject".to_string()]);
    assert_eq!(widget.line, 8);
    assert_eq!(widget.kind, WrapperKind::Object);
}

/// Nested gadget classes are qualified by their outer class
#[test]
fn test_nested_gadget() {
    let source = r#"
struct Outer {
    struct Inner {
        Q_GADGET
    };
};
"#;
    let result = ClassScanner::new().scan(&preprocess(source));
    assert_eq!(result.classes.len(), 1);
    assert_eq!(result.classes[0].qualified_name(), "Outer::Inner");
    assert_eq!(result.classes[0].kind, WrapperKind::Gadget);
}

/// Marker macros outside a class body are reported
#[test]
fn test_stray_marker_warns() {
    let result = ClassScanner::new().scan(&preprocess("Q_OBJECT\nvoid f() { Q_OBJECT }\n"));
    assert!(result.classes.is_empty());
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0].line, 1);
    assert_eq!(
        result.warnings[0].message,
        "Q_OBJECT macro outside of a class declaration"
    );
}

/// Classes from included files are not wrapped
#[test]
fn test_included_classes_are_skipped() {
    let tokens = vec![
        Token::new(TokenKind::IncludeBegin, 1, "base.h"),
        Token::identifier(1, "class"),
        Token::identifier(1, "Base"),
        Token::new(TokenKind::Punctuator, 1, "{"),
        Token::identifier(1, "Q_OBJECT"),
        Token::new(TokenKind::Punctuator, 1, "}"),
        Token::new(TokenKind::Punctuator, 1, ";"),
        Token::new(TokenKind::IncludeEnd, 1, ""),
    ];
    let result = ClassScanner::new().scan(&tokens);
    assert!(result.classes.is_empty());
}

/// Generated output carries the include, the guard and one block per class
#[test]
fn test_generate() {
    let config = BuildConfig {
        input: Some("src/widget.h".to_string()),
        include_files: vec!["widget.h".to_string()],
        ..BuildConfig::default()
    };
    let classes = vec![ClassDef {
        name: "Widget".to_string(),
        namespaces: vec!["gui".to_string()],
        superclasses: vec!["QObject".to_string()],
        line: 8,
        kind: WrapperKind::Object,
    }];

    let mut out = Vec::new();
    WrapperGenerator::new(&config)
        .generate(&classes, &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("** Wrapper code from reading C++ file 'widget.h'"));
    assert!(text.contains("#include \"widget.h\"\n#if !defined(OWC_OUTPUT_REVISION)"));
    assert!(text.contains(&format!("#elif OWC_OUTPUT_REVISION != {}", OUTPUT_REVISION)));
    assert!(text.contains("static const char owc_stringdata_gui__Widget[] = \"gui::Widget\";"));
    assert!(text.contains("const char *gui::Widget::wrappedClassName()"));
    assert!(text.contains("    return \"QObject\";"));
}

/// Class names read from a non-UTF-8 header are written back byte for byte
#[test]
fn test_generate_keeps_source_bytes() {
    let tokens = TokenPreprocessor::new(MacroTable::with_builtins(), Vec::new())
        .preprocess("caf\u{e9}.h", b"class Caf\xe9 : public QObject { Q_OBJECT };\n")
        .unwrap();
    let result = get_parser().parse(&tokens);
    assert_eq!(result.classes.len(), 1);

    let config = BuildConfig {
        input: Some("src/caf\u{e9}.h".to_string()),
        ..BuildConfig::default()
    };
    let mut out = Vec::new();
    WrapperGenerator::new(&config)
        .generate(&result.classes, &mut out)
        .unwrap();

    let contains = |needle: &[u8]| out.windows(needle.len()).any(|w| w == needle);
    assert!(contains(b"const char *Caf\xe9::wrappedClassName()"));
    assert!(contains("reading C++ file 'caf\u{e9}.h'".as_bytes()));
}
