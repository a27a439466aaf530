//! Error types
//!
//! Only two things can abort a conversion call: input the parser refuses to accept, and a
//! mapping registration that is missing its tag or target. Everything else (stylesheet
//! parse failures, compiler problems, validation diagnostics) is recovered and reported as
//! a [`ConversionWarning`](crate::warning::ConversionWarning).

use thiserror::Error;

/// Fatal errors returned by the conversion API
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The HTML parser refused the input
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A mapping registration was missing its source tag or target tag
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A `<style>` block could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CSS at line {line}, column {column}: {reason}")]
pub struct StyleError {
    pub line: u32,
    pub column: u32,
    pub reason: String,
}

/// Failures of the MJML compiler collaborator
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler is not installed or could not be started
    #[error("MJML compiler unavailable: {0}")]
    Unavailable(String),

    /// The compiler ran but did not produce output
    #[error("{0}")]
    Failed(String),

    #[error("I/O error while running the MJML compiler: {0}")]
    Io(#[from] std::io::Error),
}
