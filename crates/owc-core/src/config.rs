//! Build configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::diagnostics::Diagnostics;
use crate::macros::MacroTable;

/// A directory searched for included headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludePath {
    /// Directory to search
    pub path: PathBuf,
    /// Search `<dir>/<Name>.framework/Headers` instead of `<dir>` itself
    pub is_framework: bool,
}

impl IncludePath {
    /// Plain `-I` search path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_framework: false,
        }
    }

    /// Framework-style `-F` search path
    pub fn framework(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_framework: true,
        }
    }
}

/// How the generated code refers back to the input header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeMode {
    /// No `#include` is emitted
    Suppressed,
    /// Emitted when the input looks like a header
    Automatic,
    /// Forced on with `-f`
    Explicit,
}

/// Resolved policy for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Input file (None = standard input)
    pub input: Option<String>,

    /// Output file (None = standard output)
    pub output: Option<String>,

    /// Include emission policy
    pub include_mode: IncludeMode,

    /// Files the generated code includes, in order
    pub include_files: Vec<String>,

    /// Prefix prepended to every emitted include
    pub include_prefix: Option<String>,

    /// Which diagnostics are shown
    pub diagnostics: Diagnostics,

    /// Stop after preprocessing (`-E`)
    pub preprocess_only: bool,

    /// Macro table handed to the preprocessor
    pub macros: MacroTable,

    /// Include search paths, in priority order
    pub include_paths: Vec<IncludePath>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            include_mode: IncludeMode::Automatic,
            include_files: Vec::new(),
            include_prefix: None,
            diagnostics: Diagnostics::default(),
            preprocess_only: false,
            macros: MacroTable::with_builtins(),
            include_paths: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Whether the generated code should carry `#include` directives
    pub fn emits_includes(&self) -> bool {
        self.include_mode != IncludeMode::Suppressed
    }

    /// Name used for the input in messages
    pub fn input_display_name(&self) -> &str {
        self.input.as_deref().unwrap_or("standard input")
    }
}
