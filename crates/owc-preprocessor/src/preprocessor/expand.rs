//! Macro expansion
//!
//! Object-like and function-like macros with parameter and `__VA_ARGS__`
//! substitution. Replacement lists are rescanned with the expanded macro's
//! name hidden. `#` and `##` operators are left as they are.

use owc_core::{MacroDefinition, MacroTable, Token, TokenKind};

/// Expands macro invocations against a macro table
pub struct Expander<'a> {
    macros: &'a MacroTable,
}

impl<'a> Expander<'a> {
    pub fn new(macros: &'a MacroTable) -> Self {
        Self { macros }
    }

    /// Expand every invocation in `tokens`
    pub fn expand(&self, tokens: &[Token]) -> Vec<Token> {
        self.expand_hidden(tokens, &[])
    }

    fn expand_hidden(&self, tokens: &[Token], hidden: &[&str]) -> Vec<Token> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.kind == TokenKind::Identifier && !hidden.contains(&token.lexeme.as_str()) {
                if let Some(def) = self.macros.get(&token.lexeme) {
                    let mut rescan_hidden = hidden.to_vec();
                    rescan_hidden.push(&token.lexeme);

                    if !def.is_function {
                        let body: Vec<Token> = def
                            .replacement
                            .iter()
                            .map(|t| t.at_line(token.line))
                            .collect();
                        out.extend(self.expand_hidden(&body, &rescan_hidden));
                        i += 1;
                        continue;
                    }

                    // A function-like macro name without arguments is left alone
                    if let Some((args, next)) = collect_arguments(tokens, i + 1, def) {
                        let body = self.substitute(def, &args, token.line, hidden);
                        out.extend(self.expand_hidden(&body, &rescan_hidden));
                        i = next;
                        continue;
                    }
                }
            }
            out.push(token.clone());
            i += 1;
        }
        out
    }

    fn substitute(
        &self,
        def: &MacroDefinition,
        args: &[Vec<Token>],
        line: u32,
        hidden: &[&str],
    ) -> Vec<Token> {
        let mut body = Vec::new();
        for token in &def.replacement {
            if token.kind == TokenKind::Identifier {
                if let Some(index) = def.parameters.iter().position(|p| *p == token.lexeme) {
                    let arg = args.get(index).map(Vec::as_slice).unwrap_or(&[]);
                    body.extend(self.expand_hidden(arg, hidden));
                    continue;
                }
            }
            body.push(token.at_line(line));
        }
        body
    }
}

/// Collect the parenthesized arguments starting at `start`.
///
/// Returns the arguments (blank-trimmed) and the index just past the
/// closing parenthesis, or `None` when no complete argument list follows.
fn collect_arguments(
    tokens: &[Token],
    start: usize,
    def: &MacroDefinition,
) -> Option<(Vec<Vec<Token>>, usize)> {
    let mut i = start;
    while i < tokens.len() && tokens[i].kind.is_blank() {
        i += 1;
    }
    if !tokens.get(i)?.is_punct("(") {
        return None;
    }
    i += 1;

    let mut args: Vec<Vec<Token>> = vec![Vec::new()];
    let mut depth = 0usize;
    while let Some(token) = tokens.get(i) {
        i += 1;
        if token.is_punct("(") {
            depth += 1;
        } else if token.is_punct(")") {
            if depth == 0 {
                return Some((args.into_iter().map(trim_blanks).collect(), i));
            }
            depth -= 1;
        } else if token.is_punct(",") && depth == 0 {
            // The variadic parameter takes the rest, commas included
            let in_variadic = def.is_variadic && args.len() >= def.parameters.len();
            if !in_variadic {
                args.push(Vec::new());
                continue;
            }
        }
        if let Some(current) = args.last_mut() {
            current.push(token.clone());
        }
    }
    None
}

fn trim_blanks(mut tokens: Vec<Token>) -> Vec<Token> {
    while tokens.last().is_some_and(|t| t.kind.is_blank()) {
        tokens.pop();
    }
    let leading = tokens.iter().take_while(|t| t.kind.is_blank()).count();
    tokens.drain(..leading);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn text(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    fn function_macro(params: &[&str], body: &str, variadic: bool) -> MacroDefinition {
        MacroDefinition {
            replacement: tokenize(body),
            parameters: params.iter().map(|p| p.to_string()).collect(),
            is_function: true,
            is_variadic: variadic,
        }
    }

    #[test]
    fn test_object_like() {
        let mut macros = MacroTable::new();
        macros.define("FOO", MacroDefinition::with_value("bar"));
        let out = Expander::new(&macros).expand(&tokenize("a FOO b"));
        assert_eq!(text(&out), "a bar b");
    }

    #[test]
    fn test_expanded_tokens_take_invocation_line() {
        let mut macros = MacroTable::new();
        macros.define("FOO", MacroDefinition::with_value("bar"));
        let out = Expander::new(&macros).expand(&tokenize("\n\nFOO"));
        let bar = out.iter().find(|t| t.is_ident("bar")).unwrap();
        assert_eq!(bar.line, 3);
    }

    #[test]
    fn test_self_reference_stops() {
        let mut macros = MacroTable::new();
        macros.define("A", MacroDefinition { replacement: tokenize("B"), ..Default::default() });
        macros.define("B", MacroDefinition { replacement: tokenize("A"), ..Default::default() });
        let out = Expander::new(&macros).expand(&tokenize("A"));
        assert_eq!(text(&out), "A");
    }

    #[test]
    fn test_function_like() {
        let mut macros = MacroTable::new();
        macros.define("MAX", function_macro(&["a", "b"], "((a)>(b)?(a):(b))", false));
        let out = Expander::new(&macros).expand(&tokenize("MAX(x, f(y, z))"));
        assert_eq!(text(&out), "((x)>(f(y, z))?(x):(f(y, z)))");
    }

    #[test]
    fn test_function_like_without_arguments_is_kept() {
        let mut macros = MacroTable::new();
        macros.define("F", function_macro(&["a"], "a", false));
        let out = Expander::new(&macros).expand(&tokenize("F + 1"));
        assert_eq!(text(&out), "F + 1");
    }

    #[test]
    fn test_variadic() {
        let mut macros = MacroTable::new();
        macros.define("CALL", function_macro(&["f", "__VA_ARGS__"], "f(__VA_ARGS__)", true));
        let out = Expander::new(&macros).expand(&tokenize("CALL(g, 1, 2)"));
        assert_eq!(text(&out), "g(1, 2)");
    }

    #[test]
    fn test_attribute_sink() {
        let macros = MacroTable::with_builtins();
        let out = Expander::new(&macros).expand(&tokenize("int f() __attribute__((noreturn));"));
        assert_eq!(text(&out), "int f() ;");
    }
}
