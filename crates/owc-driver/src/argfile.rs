//! `@file` option files

use owc_core::{Error, Result};
use std::fs;
use tracing::debug;

/// Replace every `@file` argument with the non-blank, trimmed lines of
/// `file`. Lines read from a file are not expanded again.
pub fn expand_option_files(args: Vec<String>) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(args.len());
    for arg in args {
        let Some(path) = arg.strip_prefix('@') else {
            expanded.push(arg);
            continue;
        };
        if path.is_empty() {
            return Err(Error::usage("The @ option requires an input file"));
        }

        let content = fs::read_to_string(path).map_err(|source| Error::OptionsFile {
            path: path.to_string(),
            source,
        })?;
        let before = expanded.len();
        expanded.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        debug!("Read {} arguments from {}", expanded.len() - before, path);
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lines_are_spliced_in_place() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("opts.txt");
        fs::write(&file, "  -E  \n\n\tfoo.h\n").unwrap();

        let at = format!("@{}", file.display());
        let result = expand_option_files(args(&["-Ifirst", &at, "-Ilast"])).unwrap();
        assert_eq!(result, args(&["-Ifirst", "-E", "foo.h", "-Ilast"]));
    }

    #[test]
    fn test_single_line_stays_one_argument() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("opts.txt");
        fs::write(&file, "-Efoo.h\n").unwrap();

        let result = expand_option_files(vec![format!("@{}", file.display())]).unwrap();
        assert_eq!(result, args(&["-Efoo.h"]));
    }

    #[test]
    fn test_nested_at_is_not_expanded() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("opts.txt");
        fs::write(&file, "@other.txt\n").unwrap();

        let result = expand_option_files(vec![format!("@{}", file.display())]).unwrap();
        assert_eq!(result, args(&["@other.txt"]));
    }

    #[test]
    fn test_every_command_line_at_is_expanded() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.txt");
        let more = temp.path().join("more.txt");
        fs::write(&empty, "\n").unwrap();
        fs::write(&more, "-nn\n").unwrap();

        let result = expand_option_files(vec![
            format!("@{}", empty.display()),
            format!("@{}", more.display()),
        ])
        .unwrap();
        assert_eq!(result, args(&["-nn"]));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            expand_option_files(args(&["@"])),
            Err(Error::Usage(msg)) if msg == "The @ option requires an input file"
        ));
        assert!(matches!(
            expand_option_files(args(&["@/nonexistent/owc/options"])),
            Err(Error::OptionsFile { .. })
        ));
    }
}
