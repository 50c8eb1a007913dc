//! Declaration scanner
//!
//! Walks a preprocessed token stream looking for `class`/`struct`
//! definitions whose body carries a wrapper marker macro. Only the main
//! file is scanned: content between include markers is skipped.

use owc_core::{Token, TokenKind};
use tracing::debug;

use crate::{ClassDef, DeclarationParser, ParseResult, ScanWarning, WrapperKind};

/// Keywords that never name a base class
const BASE_SPECIFIERS: &[&str] = &["public", "protected", "private", "virtual"];

/// An open brace and what it belongs to
#[derive(Debug)]
enum Scope {
    Namespace(Vec<String>),
    Class(Candidate),
    Block,
}

#[derive(Debug)]
struct Candidate {
    name: String,
    enclosing: Vec<String>,
    superclasses: Vec<String>,
    line: u32,
    kind: Option<WrapperKind>,
}

/// Parsed `class Name : bases {` head
struct ClassHead {
    name: String,
    superclasses: Vec<String>,
    /// Index of the opening brace
    open: usize,
}

/// Token-level class scanner
#[derive(Debug, Default)]
pub struct ClassScanner;

impl ClassScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self
    }

    /// Scan `tokens` for wrapped classes
    pub fn scan(&self, tokens: &[Token]) -> ParseResult {
        let significant = main_file_tokens(tokens);
        let mut scopes: Vec<Scope> = Vec::new();
        let mut result = ParseResult::default();

        let mut i = 0;
        while i < significant.len() {
            let token = significant[i];

            if token.is_ident("namespace") {
                if let Some((names, open)) = namespace_head(&significant, i + 1) {
                    scopes.push(Scope::Namespace(names));
                    i = open + 1;
                    continue;
                }
            } else if (token.is_ident("class") || token.is_ident("struct"))
                && !(i > 0 && significant[i - 1].is_ident("enum"))
            {
                if let Some(head) = class_head(&significant, i + 1) {
                    debug!("Class head {} at line {}", head.name, token.line);
                    scopes.push(Scope::Class(Candidate {
                        name: head.name,
                        enclosing: enclosing_names(&scopes),
                        superclasses: head.superclasses,
                        line: token.line,
                        kind: None,
                    }));
                    i = head.open + 1;
                    continue;
                }
            } else if token.is_punct("{") {
                scopes.push(Scope::Block);
            } else if token.is_punct("}") {
                match scopes.pop() {
                    Some(Scope::Class(candidate)) => {
                        if let Some(kind) = candidate.kind {
                            result.classes.push(ClassDef {
                                name: candidate.name,
                                namespaces: candidate.enclosing,
                                superclasses: candidate.superclasses,
                                line: candidate.line,
                                kind,
                            });
                        }
                    }
                    Some(_) => {}
                    None => result.warnings.push(ScanWarning {
                        line: token.line,
                        message: "Unbalanced '}'".to_string(),
                    }),
                }
            } else if token.kind == TokenKind::Identifier {
                if let Some(kind) = WrapperKind::from_marker(&token.lexeme) {
                    match scopes.last_mut() {
                        Some(Scope::Class(candidate)) => candidate.kind = Some(kind),
                        _ => result.warnings.push(ScanWarning {
                            line: token.line,
                            message: format!(
                                "{} macro outside of a class declaration",
                                token.lexeme
                            ),
                        }),
                    }
                }
            }
            i += 1;
        }

        for scope in scopes {
            if let Scope::Class(candidate) = scope {
                result.warnings.push(ScanWarning {
                    line: candidate.line,
                    message: format!("Unterminated declaration of class {}", candidate.name),
                });
            }
        }

        result
    }
}

impl DeclarationParser for ClassScanner {
    fn parse(&mut self, tokens: &[Token]) -> ParseResult {
        self.scan(tokens)
    }

    fn name(&self) -> &str {
        "scanner"
    }
}

/// Significant tokens of the main file, in order
fn main_file_tokens(tokens: &[Token]) -> Vec<&Token> {
    let mut depth = 0usize;
    let mut out = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::IncludeBegin => depth += 1,
            TokenKind::IncludeEnd => depth = depth.saturating_sub(1),
            kind if kind.is_blank() => {}
            _ if depth == 0 => out.push(token),
            _ => {}
        }
    }
    out
}

fn enclosing_names(scopes: &[Scope]) -> Vec<String> {
    let mut names = Vec::new();
    for scope in scopes {
        match scope {
            Scope::Namespace(parts) => names.extend(parts.iter().cloned()),
            Scope::Class(candidate) => names.push(candidate.name.clone()),
            Scope::Block => {}
        }
    }
    names
}

/// `namespace a::b {`: names and the index of the brace
fn namespace_head(tokens: &[&Token], start: usize) -> Option<(Vec<String>, usize)> {
    let mut names = Vec::new();
    for (offset, token) in tokens[start..].iter().enumerate() {
        if token.is_punct("{") {
            return Some((names, start + offset));
        }
        match token.kind {
            TokenKind::Identifier => names.push(token.lexeme.clone()),
            TokenKind::Punctuator if token.lexeme == "::" => {}
            _ => return None,
        }
    }
    None
}

fn class_head(tokens: &[&Token], start: usize) -> Option<ClassHead> {
    let mut names: Vec<&str> = Vec::new();
    let mut j = start;
    loop {
        let token = tokens.get(j)?;
        if token.is_punct("{") || token.is_punct(":") {
            break;
        }
        match token.kind {
            TokenKind::Identifier => names.push(&token.lexeme),
            TokenKind::Punctuator if token.lexeme == "::" => {}
            // Forward declarations, elaborated types, template parameters
            _ => return None,
        }
        j += 1;
    }

    if names.len() > 1 {
        names.retain(|n| *n != "final");
    }
    let name = names.last()?.to_string();

    let mut superclasses = Vec::new();
    if tokens[j].is_punct(":") {
        let mut current = String::new();
        let mut depth = 0usize;
        j += 1;
        loop {
            let token = tokens.get(j)?;
            if depth == 0 && token.is_punct("{") {
                break;
            }
            match token.lexeme.as_str() {
                ";" => return None,
                "<" => depth += 1,
                ">" => depth = depth.saturating_sub(1),
                ">>" => depth = depth.saturating_sub(2),
                _ => {}
            }
            if depth == 0 && token.is_punct(",") {
                superclasses.push(std::mem::take(&mut current));
            } else if !(depth == 0
                && token.kind == TokenKind::Identifier
                && BASE_SPECIFIERS.contains(&token.lexeme.as_str()))
            {
                current.push_str(&token.lexeme);
            }
            j += 1;
        }
        if !current.is_empty() {
            superclasses.push(current);
        }
    }

    Some(ClassHead {
        name,
        superclasses,
        open: j,
    })
}
