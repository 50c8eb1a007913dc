//! User-facing notes and warnings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which non-fatal diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub notes: bool,
    pub warnings: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            notes: true,
            warnings: true,
        }
    }
}

impl Diagnostics {
    /// `-nn`
    pub fn suppress_notes(&mut self) {
        self.notes = false;
    }

    /// `-nw` silences notes too
    pub fn suppress_warnings(&mut self) {
        self.warnings = false;
        self.notes = false;
    }

    /// Print a note to stderr unless notes are off
    pub fn note(&self, file: &str, line: u32, msg: impl fmt::Display) {
        if self.notes {
            eprintln!("{}", Self::format("Note", file, line, msg));
        }
    }

    /// Print a warning to stderr unless warnings are off
    pub fn warning(&self, file: &str, line: u32, msg: impl fmt::Display) {
        if self.warnings {
            eprintln!("{}", Self::format("Warning", file, line, msg));
        }
    }

    fn format(level: &str, file: &str, line: u32, msg: impl fmt::Display) -> String {
        if line > 0 {
            format!("owc: {}:{}: {}: {}", file, line, level, msg)
        } else {
            format!("owc: {}: {}: {}", file, level, msg)
        }
    }
}
