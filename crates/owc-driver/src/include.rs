//! Whether and what the generated code includes

use owc_core::{BuildConfig, IncludeMode};
use std::path::MAIN_SEPARATOR;
use tracing::debug;

use crate::path::combine_path;

/// Include policy flags collected while resolving options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDecision {
    /// Let the input's extension decide whether includes are emitted
    pub auto_include: bool,
    /// Append the input itself to the include files
    pub default_include: bool,
}

impl Default for IncludeDecision {
    fn default() -> Self {
        Self {
            auto_include: true,
            default_include: true,
        }
    }
}

impl IncludeDecision {
    /// Apply the policy to a resolved configuration
    pub fn finalize(&self, config: &mut BuildConfig) {
        if self.auto_include {
            let header = config.input.as_deref().is_some_and(has_header_extension);
            config.include_mode = if header {
                IncludeMode::Automatic
            } else {
                IncludeMode::Suppressed
            };
        }

        if self.default_include {
            if let Some(input) = config.input.as_deref() {
                let file = match (&config.include_prefix, config.output.as_deref()) {
                    (None, Some(output)) => combine_path(input, output),
                    (None, None) => input.to_string(),
                    (Some(_), _) => combine_path(input, input),
                };
                config.include_files.push(file);
            }
        }

        debug!(
            "Include mode {:?}, files {:?}",
            config.include_mode, config.include_files
        );
    }
}

/// `foo.h`, `foo.hpp`, `foo.H` and the like
pub fn has_header_extension(name: &str) -> bool {
    let segment = name
        .rsplit(|c: char| c == '/' || c == MAIN_SEPARATOR)
        .next()
        .unwrap_or(name);
    match segment.rfind('.') {
        Some(dot) => segment[dot + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'h')),
        None => false,
    }
}
