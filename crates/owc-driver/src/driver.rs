//! One run of the compiler: read, preprocess, scan, write

use owc_core::{BuildConfig, Error, Result};
use owc_generator::{get_parser, WrapperGenerator};
use owc_preprocessor::{compose_preprocessor_output, get_preprocessor};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use tracing::{debug, info};

/// Run with a resolved configuration. `stdin` and `stdout` stand in for
/// the missing input and output files.
pub fn run<R: Read, W: Write>(config: &BuildConfig, stdin: &mut R, stdout: &mut W) -> Result<()> {
    if let Ok(json) = serde_json::to_string(config) {
        debug!("Configuration: {}", json);
    }

    let filename = config.input_display_name();
    let mut preprocessor = get_preprocessor(config);
    let tokens = match &config.input {
        Some(path) => {
            let mut file = File::open(path).map_err(|_| Error::InputNotFound(path.clone()))?;
            preprocessor.preprocess_reader(path, &mut file)?
        }
        None => preprocessor.preprocess_reader(filename, stdin)?,
    };
    info!(
        "Preprocessed {} into {} tokens with {}",
        filename,
        tokens.len(),
        preprocessor.name()
    );

    let scanned = if config.preprocess_only {
        None
    } else {
        let mut parser = get_parser();
        let result = parser.parse(&tokens);
        debug!(
            "{} found {} classes in {}",
            parser.name(),
            result.classes.len(),
            filename
        );
        Some(result)
    };

    let mut file_out;
    let out: &mut dyn Write = match &config.output {
        Some(path) => {
            let file = File::create(path).map_err(|_| Error::CannotCreate(path.clone()))?;
            file_out = BufWriter::new(file);
            &mut file_out
        }
        None => stdout,
    };

    match scanned {
        None => {
            out.write_all(&compose_preprocessor_output(&tokens))?;
            out.write_all(b"\n")?;
        }
        Some(result) => {
            for warning in &result.warnings {
                config
                    .diagnostics
                    .warning(filename, warning.line, &warning.message);
            }
            if result.classes.is_empty() {
                config
                    .diagnostics
                    .note(filename, 0, "No relevant classes found. No output generated.");
            } else {
                WrapperGenerator::new(config).generate(&result.classes, out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
