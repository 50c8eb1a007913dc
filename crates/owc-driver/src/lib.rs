//! OWC Driver
//!
//! Turns a command line into a run of the Object Wrapper Compiler.
//!
//! ## Modules
//!
//! - `argfile` - `@file` option files
//! - `options` - Option resolution into a `BuildConfig`
//! - `include` - Include emission policy
//! - `path` - Include paths relative to the output file
//! - `driver` - Read, preprocess, scan and write for one input
//! - `usage` - Usage and version text

pub mod argfile;
pub mod driver;
pub mod include;
pub mod options;
pub mod path;
pub mod usage;

pub use driver::run;
pub use include::{has_header_extension, IncludeDecision};
pub use options::{resolve, OptionResolver, Resolution};
pub use path::combine_path;
pub use usage::{version, USAGE};
