//! C-family tokenizer
//!
//! Splits source text into [`Token`]s while keeping the physical line of
//! every token. Line splices are removed before tokenizing, so a token or
//! literal may continue across them. Comments become a single whitespace
//! token; tokens after a multi-line comment keep their real line numbers.

use owc_core::{Token, TokenKind, TokenSequence};

/// Punctuators, longest first so the first match wins
const PUNCTUATORS: &[&str] = &[
    "%:%:", "...", "<<=", ">>=", "->*", "<=>", "::", "->", "++", "--", "<<", ">>", "<=", ">=",
    "==", "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", ".*", "{",
    "}", "[", "]", "(", ")", "#", ";", ":", ",", ".", "?", "~", "!", "+", "-", "*", "/", "%",
    "^", "&", "|", "=", "<", ">",
];

/// Tokenizer over a single source buffer
pub struct Lexer {
    /// Source with line splices removed
    chars: Vec<char>,
    /// Physical line of each char in `chars`
    lines: Vec<u32>,
    pos: usize,
}

impl Lexer {
    /// Create a lexer for `source`, starting at line 1
    pub fn new(source: &str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut lines = Vec::with_capacity(source.len());
        let mut line = 1;
        let mut rest = source.chars();
        while let Some(c) = rest.next() {
            if c == '\\' {
                let mut after = rest.clone();
                let next = match after.next() {
                    Some('\r') => after.next(),
                    other => other,
                };
                if next == Some('\n') {
                    rest = after;
                    line += 1;
                    continue;
                }
            }
            chars.push(c);
            lines.push(line);
            if c == '\n' {
                line += 1;
            }
        }
        Self {
            chars,
            lines,
            pos: 0,
        }
    }

    /// Tokenize the whole buffer
    pub fn tokenize(mut self) -> TokenSequence {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek(0) {
            let line = self.lines[self.pos];
            match c {
                '\n' => {
                    self.pos += 1;
                    tokens.push(Token::new(TokenKind::Newline, line, "\n"));
                }
                '\r' if self.peek(1) == Some('\n') => {
                    self.pos += 2;
                    tokens.push(Token::new(TokenKind::Newline, line, "\n"));
                }
                ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                    let text = self.take_while(|c| matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c'));
                    tokens.push(Token::new(TokenKind::Whitespace, line, text));
                }
                '/' if self.peek(1) == Some('/') => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                    tokens.push(Token::new(TokenKind::Whitespace, line, " "));
                }
                '/' if self.peek(1) == Some('*') => {
                    self.pos += 2;
                    while let Some(c) = self.peek(0) {
                        self.pos += 1;
                        if c == '*' && self.peek(0) == Some('/') {
                            self.pos += 1;
                            break;
                        }
                    }
                    tokens.push(Token::new(TokenKind::Whitespace, line, " "));
                }
                c if is_ident_start(c) => {
                    let ident = self.take_while(is_ident_continue);
                    let prefix = matches!(ident.as_str(), "L" | "u" | "U" | "u8");
                    match self.peek(0) {
                        Some(q @ ('"' | '\'')) if prefix => {
                            let literal = self.take_quoted(q);
                            let kind = if q == '"' {
                                TokenKind::StringLiteral
                            } else {
                                TokenKind::CharLiteral
                            };
                            tokens.push(Token::new(kind, line, format!("{}{}", ident, literal)));
                        }
                        _ => tokens.push(Token::new(TokenKind::Identifier, line, ident)),
                    }
                }
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek(1).is_some_and(|d| d.is_ascii_digit())) =>
                {
                    let number = self.take_number();
                    tokens.push(Token::new(TokenKind::Number, line, number));
                }
                '"' => {
                    let literal = self.take_quoted('"');
                    tokens.push(Token::new(TokenKind::StringLiteral, line, literal));
                }
                '\'' => {
                    let literal = self.take_quoted('\'');
                    tokens.push(Token::new(TokenKind::CharLiteral, line, literal));
                }
                _ => {
                    if let Some(punct) = self.match_punctuator() {
                        self.pos += punct.chars().count();
                        tokens.push(Token::new(TokenKind::Punctuator, line, punct));
                    } else {
                        self.pos += 1;
                        tokens.push(Token::new(TokenKind::Other, line, c.to_string()));
                    }
                }
            }
        }
        tokens
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// pp-number: digits, letters, `.`, `'` separators and signed exponents
    fn take_number(&mut self) -> String {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            if matches!(c, '+' | '-')
                && matches!(self.chars[self.pos - 1], 'e' | 'E' | 'p' | 'P')
            {
                self.pos += 1;
            } else if c == '\'' && self.peek(1).is_some_and(|d| d.is_ascii_alphanumeric()) {
                self.pos += 2;
            } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Quoted literal including both quotes. An unterminated literal stops
    /// before the end of the line.
    fn take_quoted(&mut self, quote: char) -> String {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            match c {
                '\\' if self.peek(1).is_some_and(|n| n != '\n') => self.pos += 2,
                '\n' => break,
                c if c == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn match_punctuator(&self) -> Option<&'static str> {
        PUNCTUATORS.iter().copied().find(|p| {
            p.chars()
                .enumerate()
                .all(|(i, c)| self.peek(i) == Some(c))
        })
    }
}

/// Bytes above ASCII count as identifier characters
fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphabetic() || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Tokenize `source`
pub fn tokenize(source: &str) -> TokenSequence {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = kinds("int x = 0x1F;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "int".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Punctuator, "=".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Number, "0x1F".to_string()),
                (TokenKind::Punctuator, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_longest_punctuator() {
        let tokens = tokenize("a->b::c <<= ...");
        let puncts: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Punctuator)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(puncts, vec!["->", "::", "<<=", "..."]);
    }

    #[test]
    fn test_literals() {
        let tokens = kinds(r#"L"wide" 'c' "esc\"aped" u8"x""#);
        assert_eq!(tokens[0], (TokenKind::StringLiteral, "L\"wide\"".to_string()));
        assert_eq!(tokens[2], (TokenKind::CharLiteral, "'c'".to_string()));
        assert_eq!(tokens[4], (TokenKind::StringLiteral, r#""esc\"aped""#.to_string()));
        assert_eq!(tokens[6], (TokenKind::StringLiteral, "u8\"x\"".to_string()));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("a\nb\n\nc");
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect();
        assert_eq!(idents, vec![("a", 1), ("b", 2), ("c", 4)]);
    }

    #[test]
    fn test_block_comment_keeps_lines() {
        let tokens = tokenize("a /* one\ntwo\n */ b");
        let b = tokens.iter().find(|t| t.is_ident("b")).unwrap();
        assert_eq!(b.line, 3);
        // The comment is one blank; its line breaks are not line starts
        let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
        assert_eq!(newlines, 0);
    }

    #[test]
    fn test_line_splice() {
        let tokens = tokenize("#define X \\\n 1\ny");
        let one = tokens.iter().find(|t| t.lexeme == "1").unwrap();
        assert_eq!(one.line, 2);
        // The splice does not produce a newline token
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(), 1);
        assert_eq!(tokens.iter().find(|t| t.is_ident("y")).unwrap().line, 3);
    }

    #[test]
    fn test_splice_inside_token() {
        let tokens = kinds("ab\\\ncd \"x\\\r\ny\"");
        assert_eq!(tokens[0], (TokenKind::Identifier, "abcd".to_string()));
        assert_eq!(tokens[2], (TokenKind::StringLiteral, "\"xy\"".to_string()));
    }

    #[test]
    fn test_high_bytes_are_identifier_chars() {
        let tokens = kinds("caf\u{e9} \u{c3}\u{a9}t\u{e9}");
        assert_eq!(tokens[0], (TokenKind::Identifier, "caf\u{e9}".to_string()));
        assert_eq!(tokens[2], (TokenKind::Identifier, "\u{c3}\u{a9}t\u{e9}".to_string()));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("1e+5 .5f 1'000");
        assert_eq!(tokens[0], (TokenKind::Number, "1e+5".to_string()));
        assert_eq!(tokens[2], (TokenKind::Number, ".5f".to_string()));
        assert_eq!(tokens[4], (TokenKind::Number, "1'000".to_string()));
    }
}
