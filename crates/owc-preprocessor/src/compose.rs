//! Preprocess-only output
//!
//! Rebuilds source text from an expanded token stream. Whitespace runs
//! collapse to one space, adjacent string literals are merged, and
//! significant tokens are pushed down to their original line with
//! newline padding.

use owc_core::{text, Token, TokenKind};

/// Two most recently emitted token kinds. Newlines are recorded as
/// whitespace.
#[derive(Debug, Default)]
struct Recent {
    last: Option<TokenKind>,
    second_last: Option<TokenKind>,
}

impl Recent {
    fn push(&mut self, kind: TokenKind) {
        self.second_last = self.last;
        self.last = Some(kind);
    }

    fn last_is(&self, kind: TokenKind) -> bool {
        self.last == Some(kind)
    }

    /// A literal followed by collapsed whitespace
    fn literal_then_space(&self) -> bool {
        self.second_last == Some(TokenKind::StringLiteral)
            && self.last == Some(TokenKind::Whitespace)
    }
}

/// Compose the text of a preprocessed token stream, as the bytes that
/// were read.
///
/// The caller appends the final newline when writing it out.
pub fn compose_preprocessor_output(tokens: &[Token]) -> Vec<u8> {
    let mut output = String::new();
    let mut line: u32 = 1;
    let mut recent = Recent::default();

    for token in tokens {
        match token.kind {
            TokenKind::Newline | TokenKind::Whitespace => {
                if !recent.last_is(TokenKind::Whitespace) {
                    recent.push(TokenKind::Whitespace);
                    output.push(' ');
                }
                continue;
            }
            TokenKind::StringLiteral => {
                let chop = if recent.last_is(TokenKind::StringLiteral) {
                    1
                } else if recent.literal_then_space() {
                    2
                } else {
                    0
                };
                if chop > 0 {
                    for _ in 0..chop {
                        output.pop();
                    }
                    output.push_str(without_first_char(&token.lexeme));
                    recent.push(TokenKind::StringLiteral);
                    continue;
                }
            }
            TokenKind::IncludeBegin => {
                line = 0;
                continue;
            }
            TokenKind::IncludeEnd => {
                line = token.line;
                continue;
            }
            _ => {}
        }

        recent.push(token.kind);

        // A token can sit above the tracked line after an include reset;
        // it gets no padding.
        if token.line > line {
            let padding = (token.line - line) as usize;
            output.extend(std::iter::repeat('\n').take(padding));
            line = token.line;
        }

        output.push_str(&token.lexeme);
    }

    text::encode(&output)
}

fn without_first_char(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.as_str()
}
