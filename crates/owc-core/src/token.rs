//! Lexical token types

use serde::{Deserialize, Serialize};

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// A single line break
    Newline,
    /// Run of blanks, tabs or comments
    Whitespace,
    /// `"..."`, possibly with an encoding prefix
    StringLiteral,
    /// `'...'`, possibly with an encoding prefix
    CharLiteral,
    Identifier,
    /// A pp-number
    Number,
    Punctuator,
    /// Start of content spliced in from an included file
    IncludeBegin,
    /// End of content spliced in from an included file
    IncludeEnd,
    /// Any character that fits no other category
    Other,
}

impl TokenKind {
    /// Whitespace and newlines carry no text of interest to the parser
    pub fn is_blank(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Whitespace)
    }

    /// Include-boundary markers
    pub fn is_marker(&self) -> bool {
        matches!(self, TokenKind::IncludeBegin | TokenKind::IncludeEnd)
    }
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Physical source line (1-based; 0 for tokens made up on the command line)
    pub line: u32,
    /// Literal text
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, line: u32, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            lexeme: lexeme.into(),
        }
    }

    /// Identifier token
    pub fn identifier(line: u32, name: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, line, name)
    }

    /// Whether this token is the given punctuator
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.lexeme == text
    }

    /// Whether this token is the given identifier
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == name
    }

    /// Same token moved to another line
    pub fn at_line(&self, line: u32) -> Self {
        Self {
            kind: self.kind,
            line,
            lexeme: self.lexeme.clone(),
        }
    }
}

/// Ordered token stream as produced by the preprocessor
pub type TokenSequence = Vec<Token>;
