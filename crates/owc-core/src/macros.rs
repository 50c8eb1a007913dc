//! Macro definitions and the macro table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::token::Token;

/// A preprocessor macro
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    /// Replacement list
    pub replacement: Vec<Token>,
    /// Parameter names of a function-like macro (`__VA_ARGS__` for `...`)
    pub parameters: Vec<String>,
    pub is_function: bool,
    pub is_variadic: bool,
}

impl MacroDefinition {
    /// Object-like macro with an empty replacement
    pub fn empty() -> Self {
        Self::default()
    }

    /// Object-like macro whose replacement is a single identifier token
    /// carrying `value`. This is what `-Dname=value` produces.
    pub fn with_value(value: &str) -> Self {
        Self {
            replacement: vec![Token::identifier(0, value)],
            ..Self::default()
        }
    }

    /// Function-like variadic macro that swallows its arguments
    pub fn variadic_sink() -> Self {
        Self {
            replacement: Vec::new(),
            parameters: vec!["__VA_ARGS__".to_string()],
            is_function: true,
            is_variadic: true,
        }
    }

    /// Replacement text joined back together, mainly for diagnostics
    pub fn replacement_text(&self) -> String {
        self.replacement.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// Macro table keyed by macro name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTable {
    macros: BTreeMap<String, MacroDefinition>,
}

impl MacroTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-seeded with the names every run knows about
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.define("Q_MOC_RUN", MacroDefinition::empty());
        table.define("__cplusplus", MacroDefinition::empty());
        // Don't stumble over GCC extensions
        table.define("__attribute__", MacroDefinition::variadic_sink());
        table
    }

    /// Insert or overwrite a definition
    pub fn define(&mut self, name: impl Into<String>, def: MacroDefinition) {
        self.macros.insert(name.into(), def);
    }

    /// Remove a definition; returns whether it existed
    pub fn undefine(&mut self, name: &str) -> bool {
        self.macros.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }
}
