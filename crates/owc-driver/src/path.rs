//! Relative include paths between input and output files

use std::env;
use std::path::{Component, Path};

/// Longest path the native toolchain can open on Windows
pub const MAX_PATH: usize = 260;

/// A path resolved against a working directory, with `.` and `..` folded away
#[derive(Debug, PartialEq, Eq)]
struct Resolved {
    root: String,
    parts: Vec<String>,
}

impl Resolved {
    fn new(path: &str, cwd: &Path) -> Self {
        let mut root = String::new();
        let mut parts: Vec<String> = Vec::new();
        for component in cwd.join(path).components() {
            match component {
                Component::Prefix(prefix) => root.push_str(&prefix.as_os_str().to_string_lossy()),
                Component::RootDir => root.push('/'),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop();
                }
                Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            }
        }
        Self { root, parts }
    }

    fn display(&self, len: usize) -> String {
        format!("{}{}", self.root, self.parts[..len].join("/"))
    }
}

/// Path of `infile` as seen from the directory containing `outfile`
///
/// ```text
/// /tmp/abc, /tmp/bcd -> abc
/// xyz/a/bc, xyz/b/ac -> ../a/bc
/// /tmp/abc, xyz/klm  -> /tmp/abc
/// ```
pub fn combine_path(infile: &str, outfile: &str) -> String {
    let cwd = env::current_dir().unwrap_or_default();
    let limit = if cfg!(windows) { Some(MAX_PATH) } else { None };
    combine_path_from(infile, outfile, &cwd, limit)
}

/// [`combine_path`] against an explicit working directory. When `limit` is
/// set and the output directory plus the relative path reach it, the
/// absolute input path is returned instead.
pub fn combine_path_from(infile: &str, outfile: &str, cwd: &Path, limit: Option<usize>) -> String {
    let input = Resolved::new(infile, cwd);
    let output = Resolved::new(outfile, cwd);
    let absolute = input.display(input.parts.len());

    let out_dir = &output.parts[..output.parts.len().saturating_sub(1)];
    let common = input
        .parts
        .iter()
        .zip(out_dir)
        .take_while(|(a, b)| a == b)
        .count();

    // Sharing only the root means unrelated trees, unless the output
    // directory is the root itself
    if input.root != output.root || (common == 0 && !out_dir.is_empty()) {
        return absolute;
    }

    let mut relative: Vec<&str> = vec![".."; out_dir.len() - common];
    relative.extend(input.parts[common..].iter().map(String::as_str));
    let relative = relative.join("/");

    if let Some(limit) = limit {
        if output.display(out_dir.len()).len() + relative.len() + 1 >= limit {
            return absolute;
        }
    }
    relative
}
