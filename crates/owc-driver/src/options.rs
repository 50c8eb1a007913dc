//! Command-line option resolution
//!
//! The argument grammar is order sensitive: `@file` arguments are spliced in
//! place, options may take their value attached or as the next argument, and
//! `--ignore-option-clashes` changes how every later option is treated.

use owc_core::{text, BuildConfig, Error, IncludeMode, IncludePath, MacroDefinition, Result};
use tracing::debug;

use crate::argfile::expand_option_files;
use crate::include::IncludeDecision;

/// What the command line asks for
#[derive(Debug)]
pub enum Resolution {
    /// Process an input with the resolved configuration
    Run(BuildConfig),
    /// `-v`
    ShowVersion,
    /// `-h`
    ShowHelp,
}

/// Turns raw arguments into a [`BuildConfig`]
#[derive(Debug, Default)]
pub struct OptionResolver {
    config: BuildConfig,
    includes: IncludeDecision,
    /// Set by `--ignore-option-clashes`; later `-f`, `-b`, `-p` and `-n`
    /// options are skipped
    ignore_clashes: bool,
}

impl OptionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the arguments that follow the program name
    pub fn resolve(mut self, args: Vec<String>) -> Result<Resolution> {
        let args = expand_option_files(args)?;
        let mut rest = args.into_iter();

        while let Some(arg) = rest.next() {
            if arg.is_empty() {
                continue;
            }
            let Some(opt) = arg.strip_prefix('-') else {
                if self.config.input.is_some() {
                    return Err(Error::usage("Too many input files specified"));
                }
                self.config.input = Some(arg);
                continue;
            };

            let mut chars = opt.chars();
            let flag = chars.next();
            let suffix = chars.as_str();

            match flag {
                Some('o') => {
                    let output = value_or_next(suffix, &mut rest)
                        .ok_or_else(|| Error::usage("Missing output file name"))?;
                    self.config.output = Some(output);
                }
                Some('E') => self.config.preprocess_only = true,
                Some('i') => {
                    if !suffix.is_empty() {
                        return Err(invalid_argument());
                    }
                    self.config.include_mode = IncludeMode::Suppressed;
                    self.includes.auto_include = false;
                }
                Some('f') => {
                    if self.ignore_clashes {
                        continue;
                    }
                    self.config.include_mode = IncludeMode::Explicit;
                    self.includes.auto_include = false;
                    if !suffix.is_empty() {
                        self.config.include_files.push(suffix.to_string());
                        self.includes.default_include = false;
                    }
                }
                Some('b') => {
                    if self.ignore_clashes {
                        continue;
                    }
                    let file = value_or_next(suffix, &mut rest)
                        .ok_or_else(|| Error::usage("Missing file name for the -b option."))?;
                    self.config.include_files.insert(0, file);
                }
                Some('p') => {
                    if self.ignore_clashes {
                        continue;
                    }
                    let prefix = value_or_next(suffix, &mut rest)
                        .ok_or_else(|| Error::usage("Missing path name for the -p option."))?;
                    self.config.include_prefix = Some(prefix);
                }
                Some('I') => {
                    let dir = value_or_next(suffix, &mut rest)
                        .ok_or_else(|| Error::usage("Missing path name for the -I option."))?;
                    self.config.include_paths.push(IncludePath::new(dir));
                }
                Some('F') => {
                    let dir = value_or_next(suffix, &mut rest)
                        .ok_or_else(|| Error::usage("Missing path name for the -F option."))?;
                    self.config.include_paths.push(IncludePath::framework(dir));
                }
                Some('D') => {
                    let definition = value_or_next(suffix, &mut rest).unwrap_or_default();
                    let (name, value) = definition.split_once('=').unwrap_or((definition.as_str(), "1"));
                    if name.is_empty() {
                        return Err(Error::usage("Missing macro name"));
                    }
                    debug!("Defining {} as {}", name, value);
                    // Macro names and values live alongside header text
                    self.config.macros.define(
                        text::from_utf8(name),
                        MacroDefinition::with_value(&text::from_utf8(value)),
                    );
                }
                Some('U') => {
                    let name = value_or_next(suffix, &mut rest).unwrap_or_default();
                    if name.is_empty() {
                        return Err(Error::usage("Missing macro name"));
                    }
                    self.config.macros.undefine(&text::from_utf8(&name));
                }
                Some('v') => {
                    if !suffix.is_empty() && opt != "version" {
                        return Err(invalid_argument());
                    }
                    return Ok(Resolution::ShowVersion);
                }
                Some('n') => {
                    if self.ignore_clashes {
                        continue;
                    }
                    match opt {
                        "nw" => self.config.diagnostics.suppress_warnings(),
                        "nn" => self.config.diagnostics.suppress_notes(),
                        _ => return Err(invalid_argument()),
                    }
                }
                Some('h') => {
                    if !suffix.is_empty() && opt != "help" {
                        return Err(invalid_argument());
                    }
                    return Ok(Resolution::ShowHelp);
                }
                Some('-') if arg == "--ignore-option-clashes" => {
                    debug!("Ignoring clashing options from here on");
                    self.ignore_clashes = true;
                }
                _ => return Err(invalid_argument()),
            }
        }

        self.includes.finalize(&mut self.config);
        Ok(Resolution::Run(self.config))
    }
}

/// Resolve `args` with a fresh resolver
pub fn resolve(args: Vec<String>) -> Result<Resolution> {
    OptionResolver::new().resolve(args)
}

/// Attached value, or the next argument when there is none
fn value_or_next(suffix: &str, rest: &mut impl Iterator<Item = String>) -> Option<String> {
    if suffix.is_empty() {
        rest.next()
    } else {
        Some(suffix.to_string())
    }
}

fn invalid_argument() -> Error {
    Error::usage("Invalid argument")
}
