//! C Preprocessor
//!
//! Turns a header into the macro-expanded token stream the rest of the
//! compiler works on: conditional inclusion, macro definitions and
//! `#include` splicing with include-boundary markers.

pub mod engine;
pub mod expand;
pub mod expr;
pub mod headers;

pub use engine::{TokenPreprocessor, MAX_INCLUDE_DEPTH};
pub use expand::Expander;
pub use headers::IncludeResolver;
