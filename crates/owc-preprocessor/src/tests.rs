//! Extended tests for the OWC preprocessor
//!
//! These tests run whole headers through the preprocessor and check the
//! text that preprocess-only mode writes back out.

use super::*;
use owc_core::{IncludePath, MacroDefinition, MacroTable, TokenKind};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn compose(tokens: &[owc_core::Token]) -> String {
    String::from_utf8(compose_preprocessor_output(tokens)).unwrap()
}

fn preprocess_to_text(source: &str, macros: MacroTable) -> String {
    let mut pp = TokenPreprocessor::new(macros, Vec::new());
    let tokens = pp.preprocess("test.h", source.as_bytes()).unwrap();
    compose(&tokens)
}

/// Adjacent string literals in real source come out merged
#[test]
fn test_string_concatenation() {
    let source = r#"const char *s = "abc" "def";"#;
    assert_eq!(
        preprocess_to_text(source, MacroTable::with_builtins()),
        r#"const char *s = "abcdef";"#
    );
}

/// Command-line definitions are expanded in the output
#[test]
fn test_command_line_macro() {
    let mut macros = MacroTable::with_builtins();
    macros.define("EXPORT", MacroDefinition::with_value("__declspec"));
    let source = "class EXPORT Foo;";
    assert_eq!(preprocess_to_text(source, macros), "class __declspec Foo;");
}

/// Directive lines disappear but the code after them keeps its line
#[test]
fn test_line_structure_survives_directives() {
    let source = r#"#ifndef FOO_H
#define FOO_H

class Foo
{
};

#endif
"#;
    assert_eq!(
        preprocess_to_text(source, MacroTable::with_builtins()),
        " \n\n\nclass Foo \n{ \n}; "
    );
}

/// GCC attributes are swallowed by the built-in sink macro
#[test]
fn test_attribute_is_dropped() {
    let source = "void f() __attribute__((deprecated));";
    assert_eq!(
        preprocess_to_text(source, MacroTable::with_builtins()),
        "void f() ;"
    );
}

/// Included content is spliced between markers and the parent resumes on its own lines
#[test]
fn test_include_splicing() {
    let temp = TempDir::new().unwrap();
    let main = temp.path().join("main.h");
    fs::write(temp.path().join("inc.h"), "int b;\nint c;\n").unwrap();
    fs::write(&main, "#include \"inc.h\"\nint a;\n").unwrap();

    let mut pp = TokenPreprocessor::new(MacroTable::with_builtins(), Vec::new());
    let source = fs::read(&main).unwrap();
    let tokens = pp.preprocess(&main.to_string_lossy(), &source).unwrap();

    let begin = tokens
        .iter()
        .position(|t| t.kind == TokenKind::IncludeBegin)
        .unwrap();
    let end = tokens
        .iter()
        .position(|t| t.kind == TokenKind::IncludeEnd)
        .unwrap();
    assert!(begin < end);
    assert_eq!(tokens[begin].line, 1);
    assert!(tokens[begin].lexeme.ends_with("inc.h"));
    assert_eq!(tokens[end].line, 1);

    assert_eq!(compose(&tokens), "\nint b; \nint c; \nint a; ");
}

/// A header is spliced only once per run
#[test]
fn test_include_once() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("inc.h"), "#define FROM_INC 1\nint b;\n").unwrap();

    let mut pp = TokenPreprocessor::new(
        MacroTable::with_builtins(),
        vec![IncludePath::new(temp.path())],
    );
    let tokens = pp
        .preprocess("main.h", b"#include <inc.h>\n#include \"inc.h\"\n#if FROM_INC\nok\n#endif\n")
        .unwrap();

    let begins = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::IncludeBegin)
        .count();
    assert_eq!(begins, 1);
    // Definitions made inside the include stay visible afterwards
    assert!(tokens.iter().any(|t| t.is_ident("ok")));
}

/// Reading from an arbitrary reader behaves like reading a string
#[test]
fn test_preprocess_reader() {
    let mut pp = TokenPreprocessor::new(MacroTable::with_builtins(), Vec::new());
    let mut input: &[u8] = b"int x;\n";
    let tokens = pp.preprocess_reader("standard input", &mut input).unwrap();
    assert_eq!(compose(&tokens), "int x; ");
    assert_eq!(pp.name(), "token");
}

/// Bytes that are not UTF-8 come back out unchanged
#[test]
fn test_latin1_source_is_byte_exact() {
    let mut pp = TokenPreprocessor::new(MacroTable::with_builtins(), Vec::new());
    let tokens = pp
        .preprocess("latin1.h", b"const char *s = \"caf\xe9\";\n#define \xe9t\xe9 1\nint x = \xe9t\xe9;\n")
        .unwrap();
    assert_eq!(
        compose_preprocessor_output(&tokens),
        b"const char *s = \"caf\xe9\"; \n\nint x = 1; ".to_vec()
    );
}

/// A `#` after a comment that spans lines does not start a directive
#[test]
fn test_hash_after_block_comment() {
    let source = "int a; /* x\n y */ # define Z 1\nZ\n";
    assert_eq!(
        preprocess_to_text(source, MacroTable::with_builtins()),
        "int a; \n# define Z 1 \nZ "
    );
}
