//! Include File Resolver
//!
//! Finds the file an `#include` directive refers to, searching plain and
//! framework-style include paths.

use owc_core::IncludePath;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header file resolver
#[derive(Debug, Clone, Default)]
pub struct IncludeResolver {
    /// Include search paths, in priority order
    include_paths: Vec<IncludePath>,
}

impl IncludeResolver {
    /// Create a resolver searching `include_paths` in order
    pub fn new(include_paths: Vec<IncludePath>) -> Self {
        Self { include_paths }
    }

    /// Resolve a header file path
    ///
    /// Given an include directive like `#include <QtCore/qobject.h>` or
    /// `#include "myheader.h"`, find the actual file path. Quoted names are
    /// looked up next to the including file first.
    pub fn resolve(&self, header: &str, quoted: bool, from_file: Option<&Path>) -> Option<PathBuf> {
        if quoted {
            if let Some(parent) = from_file.and_then(Path::parent) {
                let relative_path = parent.join(header);
                if relative_path.is_file() {
                    debug!("Resolved {} relative to {:?}", header, parent);
                    return Some(relative_path);
                }
            }
        }

        for include_path in &self.include_paths {
            let candidate = if include_path.is_framework {
                match Self::framework_candidate(&include_path.path, header) {
                    Some(candidate) => candidate,
                    None => continue,
                }
            } else {
                include_path.path.join(header)
            };
            if candidate.is_file() {
                debug!("Resolved {} in {:?}", header, include_path.path);
                return Some(candidate);
            }
        }

        debug!("Failed to resolve header: {}", header);
        None
    }

    /// `Name/rest.h` maps to `<dir>/Name.framework/Headers/rest.h`
    fn framework_candidate(dir: &Path, header: &str) -> Option<PathBuf> {
        let (framework, rest) = header.split_once('/')?;
        if framework.is_empty() || rest.is_empty() {
            return None;
        }
        Some(
            dir.join(format!("{}.framework", framework))
                .join("Headers")
                .join(rest),
        )
    }
}
