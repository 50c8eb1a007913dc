//! OWC Core
//!
//! Core types shared by the Object Wrapper Compiler crates: lexical tokens,
//! the macro table, include search paths, the resolved build configuration and
//! the byte-preserving text codec.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod macros;
pub mod text;
pub mod token;

pub use config::{BuildConfig, IncludeMode, IncludePath};
pub use diagnostics::Diagnostics;
pub use error::{Error, Result};
pub use macros::{MacroDefinition, MacroTable};
pub use token::{Token, TokenKind, TokenSequence};
