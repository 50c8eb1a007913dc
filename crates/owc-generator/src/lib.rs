//! OWC Generator
//!
//! Finds the classes that need wrapper code in a preprocessed token stream
//! and writes the wrapper translation unit for them.
//!
//! ## Modules
//!
//! - `scanner` - Declaration scanner for wrapped classes
//! - `generator` - Wrapper code output, including the re-include of the header

pub mod generator;
pub mod scanner;

pub use generator::{WrapperGenerator, OUTPUT_REVISION};
pub use scanner::ClassScanner;

use owc_core::Token;
use serde::{Deserialize, Serialize};

/// Macro that marks a class as needing wrapper code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapperKind {
    /// `Q_OBJECT`
    Object,
    /// `Q_GADGET`
    Gadget,
}

impl WrapperKind {
    /// Map a marker macro name to its kind
    pub fn from_marker(name: &str) -> Option<Self> {
        match name {
            "Q_OBJECT" => Some(WrapperKind::Object),
            "Q_GADGET" => Some(WrapperKind::Gadget),
            _ => None,
        }
    }
}

/// A class declaration that needs wrapper code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Unqualified class name
    pub name: String,
    /// Enclosing namespaces, outermost first
    pub namespaces: Vec<String>,
    /// Base classes in declaration order
    pub superclasses: Vec<String>,
    /// Line of the class head
    pub line: u32,
    pub kind: WrapperKind,
}

impl ClassDef {
    /// `ns::inner::Name`
    pub fn qualified_name(&self) -> String {
        let mut parts = self.namespaces.clone();
        parts.push(self.name.clone());
        parts.join("::")
    }
}

/// Non-fatal problem found while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub line: u32,
    pub message: String,
}

/// Scan result
#[derive(Debug, Default, Clone)]
pub struct ParseResult {
    /// Classes that need wrapper code, in source order
    pub classes: Vec<ClassDef>,
    /// Warnings (non-fatal)
    pub warnings: Vec<ScanWarning>,
}

/// Declaration parser trait for different backends
pub trait DeclarationParser {
    /// Scan a preprocessed token stream
    fn parse(&mut self, tokens: &[Token]) -> ParseResult;

    /// Get parser name
    fn name(&self) -> &str;
}

/// Get the default declaration parser
pub fn get_parser() -> Box<dyn DeclarationParser> {
    Box::new(ClassScanner::new())
}

#[cfg(test)]
mod tests;
