//! OWC Preprocessor
//!
//! Produces the token stream the Object Wrapper Compiler parses, and turns
//! that stream back into text for preprocess-only (`-E`) output.
//!
//! ## Modules
//!
//! - `lexer` - C-family tokenizer keeping physical line numbers
//! - `preprocessor` - Directive handling, macro expansion and include splicing
//! - `compose` - Reassembly of preprocessed text from tokens

pub mod compose;
pub mod lexer;
pub mod preprocessor;

pub use compose::compose_preprocessor_output;
pub use preprocessor::{IncludeResolver, TokenPreprocessor};

use owc_core::{BuildConfig, Result, TokenSequence};
use std::io::Read;

/// Preprocessor trait for different backends
pub trait Preprocessor {
    /// Preprocess the bytes that were read from `filename`
    fn preprocess(&mut self, filename: &str, source: &[u8]) -> Result<TokenSequence>;

    /// Preprocess everything readable from `input`
    fn preprocess_reader(&mut self, filename: &str, input: &mut dyn Read) -> Result<TokenSequence> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        self.preprocess(filename, &bytes)
    }

    /// Get preprocessor name
    fn name(&self) -> &str;
}

/// Preprocessor configured from the macro table and include paths of `config`
pub fn get_preprocessor(config: &BuildConfig) -> Box<dyn Preprocessor> {
    Box::new(TokenPreprocessor::new(
        config.macros.clone(),
        config.include_paths.clone(),
    ))
}

#[cfg(test)]
mod tests;
