//! OWC CLI
//!
//! Command-line entry point of the Object Wrapper Compiler.

use anyhow::Result;
use owc_driver::{resolve, run, version, Resolution, USAGE};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so `-E` output stays clean
    let filter = EnvFilter::try_from_env("OWC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match try_main() {
        Ok(code) => code,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let args: Vec<String> = env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    debug!("Arguments: {:?}", args);

    match resolve(args)? {
        Resolution::ShowVersion => {
            eprintln!("{}", version());
            Ok(ExitCode::FAILURE)
        }
        Resolution::ShowHelp => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::FAILURE)
        }
        Resolution::Run(config) => {
            run(&config, &mut io::stdin().lock(), &mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `owc: <message>`, followed by the usage text for argument errors
fn report(err: &anyhow::Error) {
    eprintln!("owc: {}", err);
    let wants_usage = err
        .downcast_ref::<owc_core::Error>()
        .is_some_and(owc_core::Error::wants_usage);
    if wants_usage {
        eprintln!("{}", USAGE);
    }
}
