//! `#if` / `#elif` expression evaluation

use owc_core::{MacroTable, Token, TokenKind};

use super::expand::Expander;

/// Evaluate a conditional-directive expression to an integer
pub fn evaluate(tokens: &[Token], macros: &MacroTable) -> Result<i64, String> {
    let resolved = replace_defined(tokens, macros)?;
    let expanded = Expander::new(macros).expand(&resolved);
    let significant: Vec<Token> = expanded
        .into_iter()
        .filter(|t| !t.kind.is_blank())
        .collect();
    if significant.is_empty() {
        return Err("#if with no expression".to_string());
    }

    let mut parser = ExprParser {
        tokens: &significant,
        pos: 0,
    };
    let value = parser.ternary()?;
    match parser.peek() {
        None => Ok(value),
        Some(t) => Err(format!("Unexpected '{}' in #if expression", t.lexeme)),
    }
}

/// Replace `defined X` and `defined(X)` before macro expansion
fn replace_defined(tokens: &[Token], macros: &MacroTable) -> Result<Vec<Token>, String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if !token.is_ident("defined") {
            out.push(token.clone());
            i += 1;
            continue;
        }

        let mut j = skip_blanks(tokens, i + 1);
        let parenthesized = tokens.get(j).is_some_and(|t| t.is_punct("("));
        if parenthesized {
            j = skip_blanks(tokens, j + 1);
        }
        let name = match tokens.get(j) {
            Some(t) if t.kind == TokenKind::Identifier => &t.lexeme,
            _ => return Err("Macro name missing after 'defined'".to_string()),
        };
        j += 1;
        if parenthesized {
            j = skip_blanks(tokens, j);
            if !tokens.get(j).is_some_and(|t| t.is_punct(")")) {
                return Err("Missing ')' after 'defined'".to_string());
            }
            j += 1;
        }

        let value = if macros.contains(name) { "1" } else { "0" };
        out.push(Token::new(TokenKind::Number, token.line, value));
        i = j;
    }
    Ok(out)
}

fn skip_blanks(tokens: &[Token], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.kind.is_blank()) {
        i += 1;
    }
    i
}

fn precedence(op: &str) -> Option<u8> {
    Some(match op {
        "*" | "/" | "%" => 10,
        "+" | "-" => 9,
        "<<" | ">>" => 8,
        "<" | ">" | "<=" | ">=" => 7,
        "==" | "!=" => 6,
        "&" => 5,
        "^" => 4,
        "|" => 3,
        "&&" => 2,
        "||" => 1,
        _ => return None,
    })
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'a Token, String> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| "Unexpected end of #if expression".to_string())?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, punct: &str) -> Result<(), String> {
        let token = self.next()?;
        if token.is_punct(punct) {
            Ok(())
        } else {
            Err(format!("Expected '{}' in #if expression, found '{}'", punct, token.lexeme))
        }
    }

    fn ternary(&mut self) -> Result<i64, String> {
        let cond = self.binary(1)?;
        if self.peek().is_some_and(|t| t.is_punct("?")) {
            self.pos += 1;
            let then = self.ternary()?;
            self.expect(":")?;
            let otherwise = self.ternary()?;
            return Ok(if cond != 0 { then } else { otherwise });
        }
        Ok(cond)
    }

    fn binary(&mut self, min_prec: u8) -> Result<i64, String> {
        let mut lhs = self.unary()?;
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Punctuator {
                break;
            }
            let Some(prec) = precedence(&token.lexeme) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(prec + 1)?;
            lhs = apply(&token.lexeme, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<i64, String> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Punctuator => match token.lexeme.as_str() {
                "!" => Ok((self.unary()? == 0) as i64),
                "~" => Ok(!self.unary()?),
                "-" => Ok(self.unary()?.wrapping_neg()),
                "+" => self.unary(),
                "(" => {
                    let value = self.ternary()?;
                    self.expect(")")?;
                    Ok(value)
                }
                other => Err(format!("Unexpected '{}' in #if expression", other)),
            },
            TokenKind::Number => parse_integer(&token.lexeme),
            TokenKind::CharLiteral => parse_char(&token.lexeme),
            // -Dname=value stores the value as an identifier token
            TokenKind::Identifier if token.lexeme.starts_with(|c: char| c.is_ascii_digit()) => {
                parse_integer(&token.lexeme)
            }
            TokenKind::Identifier => Ok((token.lexeme == "true") as i64),
            _ => Err(format!("Unexpected '{}' in #if expression", token.lexeme)),
        }
    }
}

fn apply(op: &str, lhs: i64, rhs: i64) -> Result<i64, String> {
    Ok(match op {
        "*" => lhs.wrapping_mul(rhs),
        "/" | "%" if rhs == 0 => return Err("Division by zero in #if expression".to_string()),
        "/" => lhs.wrapping_div(rhs),
        "%" => lhs.wrapping_rem(rhs),
        "+" => lhs.wrapping_add(rhs),
        "-" => lhs.wrapping_sub(rhs),
        "<<" => lhs.wrapping_shl(rhs as u32),
        ">>" => lhs.wrapping_shr(rhs as u32),
        "<" => (lhs < rhs) as i64,
        ">" => (lhs > rhs) as i64,
        "<=" => (lhs <= rhs) as i64,
        ">=" => (lhs >= rhs) as i64,
        "==" => (lhs == rhs) as i64,
        "!=" => (lhs != rhs) as i64,
        "&" => lhs & rhs,
        "^" => lhs ^ rhs,
        "|" => lhs | rhs,
        "&&" => (lhs != 0 && rhs != 0) as i64,
        "||" => (lhs != 0 || rhs != 0) as i64,
        _ => return Err(format!("Unknown operator '{}'", op)),
    })
}

fn parse_integer(literal: &str) -> Result<i64, String> {
    let digits: String = literal
        .trim_end_matches(['u', 'U', 'l', 'L'])
        .chars()
        .filter(|c| *c != '\'')
        .collect();

    let parsed = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2)
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<u64>()
    };

    parsed
        .map(|v| v as i64)
        .map_err(|_| format!("Invalid integer '{}' in #if expression", literal))
}

fn parse_char(literal: &str) -> Result<i64, String> {
    let start = literal
        .find('\'')
        .ok_or_else(|| format!("Invalid character literal {}", literal))?;
    let body = literal[start + 1..].trim_end_matches('\'');
    let mut chars = body.chars();
    let value = match (chars.next(), chars.next()) {
        (Some('\\'), Some(escaped)) => match escaped {
            'n' => '\n' as i64,
            't' => '\t' as i64,
            'r' => '\r' as i64,
            '0' => 0,
            other => other as i64,
        },
        (Some(c), _) => c as i64,
        (None, _) => return Err(format!("Empty character literal {}", literal)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use owc_core::MacroDefinition;

    fn eval(expr: &str, macros: &MacroTable) -> Result<i64, String> {
        evaluate(&tokenize(expr), macros)
    }

    #[test]
    fn test_arithmetic_and_precedence() {
        let macros = MacroTable::new();
        assert_eq!(eval("1 + 2 * 3", &macros), Ok(7));
        assert_eq!(eval("(1 + 2) * 3", &macros), Ok(9));
        assert_eq!(eval("10 - 4 - 3", &macros), Ok(3));
        assert_eq!(eval("1 << 4 | 1", &macros), Ok(17));
        assert_eq!(eval("!0 && (2 > 1)", &macros), Ok(1));
        assert_eq!(eval("0 ? 5 : 6", &macros), Ok(6));
        assert_eq!(eval("-1 < 0", &macros), Ok(1));
    }

    #[test]
    fn test_literals() {
        let macros = MacroTable::new();
        assert_eq!(eval("0x10 == 16", &macros), Ok(1));
        assert_eq!(eval("010", &macros), Ok(8));
        assert_eq!(eval("100UL", &macros), Ok(100));
        assert_eq!(eval("'A'", &macros), Ok(65));
        assert_eq!(eval("'\\n'", &macros), Ok(10));
    }

    #[test]
    fn test_defined_and_macros() {
        let mut macros = MacroTable::with_builtins();
        macros.define("VERSION", MacroDefinition::with_value("5"));

        assert_eq!(eval("defined(Q_MOC_RUN)", &macros), Ok(1));
        assert_eq!(eval("defined VERSION && VERSION >= 4", &macros), Ok(1));
        assert_eq!(eval("defined(NOPE)", &macros), Ok(0));
        assert_eq!(eval("UNKNOWN_NAME", &macros), Ok(0));
        assert_eq!(eval("true", &macros), Ok(1));
    }

    #[test]
    fn test_errors() {
        let macros = MacroTable::new();
        assert!(eval("1 / 0", &macros).is_err());
        assert!(eval("(1", &macros).is_err());
        assert!(eval("1 2", &macros).is_err());
        assert!(eval("", &macros).is_err());
        assert!(eval("defined", &macros).is_err());
    }
}
