//! Directive processing
//!
//! Drives the lexer over a file, handles conditional inclusion, macro
//! definitions and `#include`, and emits the expanded token stream.
//! Every resolved include is spliced at most once per run, delimited by
//! `IncludeBegin`/`IncludeEnd` markers carrying the directive's line.

use owc_core::{text, Error, IncludePath, MacroDefinition, MacroTable, Result, Token, TokenKind, TokenSequence};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::expand::Expander;
use super::expr;
use super::headers::IncludeResolver;
use crate::lexer::tokenize;
use crate::Preprocessor;

/// Maximum depth of nested includes
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// One open `#if`/`#ifdef`/`#ifndef` group
#[derive(Debug)]
struct Conditional {
    /// Tokens in the current branch are emitted
    active: bool,
    /// The enclosing group is active
    parent_active: bool,
    /// Some branch of this group has been taken
    taken: bool,
    seen_else: bool,
}

/// Token-producing preprocessor
pub struct TokenPreprocessor {
    macros: MacroTable,
    resolver: IncludeResolver,
    /// Files already spliced in during this run
    included: HashSet<PathBuf>,
    depth: usize,
}

impl TokenPreprocessor {
    /// Create a preprocessor seeded with `macros`, searching `include_paths`
    pub fn new(macros: MacroTable, include_paths: Vec<IncludePath>) -> Self {
        Self {
            macros,
            resolver: IncludeResolver::new(include_paths),
            included: HashSet::new(),
            depth: 0,
        }
    }

    fn process_source(&mut self, path: &Path, source: &str, out: &mut TokenSequence) -> Result<()> {
        let tokens = tokenize(source);
        let mut conditionals: Vec<Conditional> = Vec::new();
        let mut pending: Vec<Token> = Vec::new();
        let mut at_line_start = true;
        let mut i = 0;

        while i < tokens.len() {
            if at_line_start {
                let hash = skip_whitespace(&tokens, i);
                if tokens.get(hash).is_some_and(|t| t.is_punct("#")) {
                    let end = line_end(&tokens, hash);
                    self.flush(&mut pending, out);
                    self.handle_directive(
                        path,
                        tokens[hash].line,
                        &tokens[hash + 1..end],
                        &mut conditionals,
                        out,
                    )?;
                    i = end;
                    at_line_start = false;
                    continue;
                }
            }

            let token = &tokens[i];
            at_line_start = token.kind == TokenKind::Newline;
            if is_active(&conditionals) {
                pending.push(token.clone());
            }
            i += 1;
        }

        self.flush(&mut pending, out);

        if !conditionals.is_empty() {
            let line = tokens.last().map_or(1, |t| t.line);
            return Err(directive_error(path, line, "Unterminated conditional directive"));
        }
        Ok(())
    }

    /// Expand and emit the text collected since the last directive
    fn flush(&self, pending: &mut Vec<Token>, out: &mut TokenSequence) {
        if pending.is_empty() {
            return;
        }
        out.extend(Expander::new(&self.macros).expand(pending));
        pending.clear();
    }

    fn handle_directive(
        &mut self,
        path: &Path,
        line: u32,
        tokens: &[Token],
        conditionals: &mut Vec<Conditional>,
        out: &mut TokenSequence,
    ) -> Result<()> {
        let start = skip_whitespace(tokens, 0);
        // Null directive, or a line marker such as `# 1 "file"`
        let Some(name) = tokens.get(start).filter(|t| t.kind == TokenKind::Identifier) else {
            return Ok(());
        };
        let rest = &tokens[start + 1..];
        let active = is_active(conditionals);

        match name.lexeme.as_str() {
            "if" => {
                let value = active && self.evaluate(path, line, rest)?;
                conditionals.push(Conditional {
                    active: value,
                    parent_active: active,
                    taken: value,
                    seen_else: false,
                });
            }
            "ifdef" | "ifndef" => {
                let negate = name.lexeme == "ifndef";
                let value = if active {
                    let macro_name = first_identifier(rest)
                        .ok_or_else(|| directive_error(path, line, "Macro name missing"))?;
                    self.macros.contains(macro_name) != negate
                } else {
                    false
                };
                conditionals.push(Conditional {
                    active: value,
                    parent_active: active,
                    taken: value,
                    seen_else: false,
                });
            }
            "elif" => {
                let Some(group) = conditionals.last() else {
                    return Err(directive_error(path, line, "#elif without #if"));
                };
                if group.seen_else {
                    return Err(directive_error(path, line, "#elif after #else"));
                }
                let value = if group.parent_active && !group.taken {
                    self.evaluate(path, line, rest)?
                } else {
                    false
                };
                if let Some(group) = conditionals.last_mut() {
                    group.active = value;
                    group.taken |= value;
                }
            }
            "else" => {
                let Some(group) = conditionals.last_mut() else {
                    return Err(directive_error(path, line, "#else without #if"));
                };
                if group.seen_else {
                    return Err(directive_error(path, line, "#else after #else"));
                }
                group.active = group.parent_active && !group.taken;
                group.taken = true;
                group.seen_else = true;
            }
            "endif" => {
                if conditionals.pop().is_none() {
                    return Err(directive_error(path, line, "#endif without #if"));
                }
            }
            _ if !active => {}
            "define" => self.define(path, line, rest)?,
            "undef" => {
                let macro_name = first_identifier(rest)
                    .ok_or_else(|| directive_error(path, line, "Macro name missing"))?;
                self.macros.undefine(macro_name);
            }
            "include" => self.include(path, line, rest, out)?,
            other => trace!("Ignoring #{} at {}:{}", other, path.display(), line),
        }
        Ok(())
    }

    fn evaluate(&self, path: &Path, line: u32, tokens: &[Token]) -> Result<bool> {
        expr::evaluate(tokens, &self.macros)
            .map(|value| value != 0)
            .map_err(|message| directive_error(path, line, message))
    }

    fn define(&mut self, path: &Path, line: u32, tokens: &[Token]) -> Result<()> {
        let start = skip_whitespace(tokens, 0);
        let name = match tokens.get(start) {
            Some(t) if t.kind == TokenKind::Identifier => t.lexeme.clone(),
            _ => return Err(directive_error(path, line, "Macro name missing")),
        };

        let mut def = MacroDefinition::empty();
        let mut body_start = start + 1;

        // Function-like only when `(` follows the name directly
        if tokens.get(body_start).is_some_and(|t| t.is_punct("(")) {
            def.is_function = true;
            let mut i = body_start + 1;
            loop {
                i = skip_whitespace(tokens, i);
                let Some(token) = tokens.get(i) else {
                    return Err(directive_error(path, line, "Missing ')' in macro parameter list"));
                };
                i += 1;
                match token.kind {
                    TokenKind::Identifier if !def.is_variadic => {
                        def.parameters.push(token.lexeme.clone())
                    }
                    TokenKind::Punctuator if token.lexeme == "..." && !def.is_variadic => {
                        def.is_variadic = true;
                        def.parameters.push("__VA_ARGS__".to_string());
                    }
                    TokenKind::Punctuator if token.lexeme == "," => {}
                    TokenKind::Punctuator if token.lexeme == ")" => break,
                    _ => {
                        return Err(directive_error(
                            path,
                            line,
                            format!("Unexpected '{}' in macro parameter list", token.lexeme),
                        ))
                    }
                }
            }
            body_start = i;
        }

        let body = &tokens[body_start.min(tokens.len())..];
        let first = body.iter().position(|t| !t.kind.is_blank());
        let last = body.iter().rposition(|t| !t.kind.is_blank());
        if let (Some(first), Some(last)) = (first, last) {
            def.replacement = body[first..=last].to_vec();
        }

        debug!("#define {} {}", name, def.replacement_text());
        self.macros.define(name, def);
        Ok(())
    }

    fn include(&mut self, path: &Path, line: u32, tokens: &[Token], out: &mut TokenSequence) -> Result<()> {
        let target = match include_target(tokens) {
            Some(target) => Some(target),
            // Computed include: expand, then look again
            None => include_target(&Expander::new(&self.macros).expand(tokens)),
        };
        let Some((header, quoted)) = target else {
            return Err(directive_error(path, line, "Invalid #include directive"));
        };

        let name = String::from_utf8_lossy(&text::encode(&header)).into_owned();
        let Some(resolved) = self.resolver.resolve(&name, quoted, Some(path)) else {
            debug!("Skipping unresolved include {} at {}:{}", header, path.display(), line);
            return Ok(());
        };

        let key = fs::canonicalize(&resolved).unwrap_or_else(|_| resolved.clone());
        if !self.included.insert(key) {
            trace!("Already included: {:?}", resolved);
            return Ok(());
        }
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(directive_error(path, line, "#include nested too deeply"));
        }

        let source = text::decode(&fs::read(&resolved)?);

        out.push(Token::new(
            TokenKind::IncludeBegin,
            line,
            resolved.to_string_lossy(),
        ));
        self.depth += 1;
        let result = self.process_source(&resolved, &source, out);
        self.depth -= 1;
        result?;
        out.push(Token::new(TokenKind::IncludeEnd, line, ""));
        Ok(())
    }
}

impl Preprocessor for TokenPreprocessor {
    fn preprocess(&mut self, filename: &str, source: &[u8]) -> Result<TokenSequence> {
        let mut out = Vec::new();
        self.process_source(Path::new(filename), &text::decode(source), &mut out)?;
        debug!("Preprocessed {} into {} tokens", filename, out.len());
        Ok(out)
    }

    fn name(&self) -> &str {
        "token"
    }
}

fn is_active(conditionals: &[Conditional]) -> bool {
    conditionals.last().map_or(true, |c| c.active)
}

fn skip_whitespace(tokens: &[Token], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.kind == TokenKind::Whitespace) {
        i += 1;
    }
    i
}

/// Index of the newline ending the line that contains `i`
fn line_end(tokens: &[Token], i: usize) -> usize {
    tokens[i..]
        .iter()
        .position(|t| t.kind == TokenKind::Newline)
        .map_or(tokens.len(), |offset| i + offset)
}

fn first_identifier(tokens: &[Token]) -> Option<&str> {
    tokens
        .iter()
        .find(|t| !t.kind.is_blank())
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.lexeme.as_str())
}

/// `"name"` or `<name>`; returns the name and whether it was quoted
fn include_target(tokens: &[Token]) -> Option<(String, bool)> {
    let start = tokens.iter().position(|t| !t.kind.is_blank())?;
    let first = &tokens[start];
    if first.kind == TokenKind::StringLiteral && first.lexeme.starts_with('"') {
        let name = first.lexeme.trim_start_matches('"').trim_end_matches('"');
        return Some((name.to_string(), true));
    }
    if first.is_punct("<") {
        let close = tokens[start..].iter().position(|t| t.is_punct(">"))? + start;
        let name: String = tokens[start + 1..close]
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect();
        return Some((name, false));
    }
    None
}

fn directive_error(path: &Path, line: u32, message: impl Into<String>) -> Error {
    Error::Preprocess {
        file: path.display().to_string(),
        line,
        message: message.into(),
    }
}
