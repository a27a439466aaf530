//! MJML compiler bridge
//!
//!     Converting produces MJML; turning that into email-ready HTML is the job of an MJML
//!     compiler, which this crate only talks to through the [MjmlCompiler] trait. The bridge
//!     compiles in soft mode, reports the compiler's validation errors as warnings, and falls
//!     back to the raw MJML whenever compilation is unavailable or fails. It never turns a
//!     compiler problem into an error.
//!
//!     [CommandCompiler] drives the `mjml` executable from the npm package.

pub mod command;

pub use command::CommandCompiler;

use crate::error::CompilerError;
use crate::options::{Conversion, OutputKind};
use crate::warning::ConversionWarning;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How strictly the compiler validates its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// Refuse to render invalid MJML
    Strict,
    /// Render anyway and report problems
    #[default]
    Soft,
    /// Do not validate
    Skip,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Strict => "strict",
            ValidationLevel::Soft => "soft",
            ValidationLevel::Skip => "skip",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub validation_level: ValidationLevel,
}

/// One validation problem reported by the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    pub line: Option<usize>,
    pub message: String,
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub html: String,
    pub errors: Vec<CompileDiagnostic>,
}

/// Something that renders MJML to HTML
pub trait MjmlCompiler: Send + Sync {
    fn compile(&self, mjml: &str, options: &CompileOptions) -> Result<CompileOutput, CompilerError>;
}

pub const SKIPPED_MESSAGE: &str = "MJML validation skipped: no MJML compiler configured";

/// Compile `mjml` in soft mode, falling back to the MJML itself on any failure.
///
/// The returned [Conversion] carries only the warnings produced here.
pub fn compile_or_fallback(compiler: Option<&dyn MjmlCompiler>, mjml: String) -> Conversion {
    let Some(compiler) = compiler else {
        debug!("no MJML compiler configured, returning MJML");
        return Conversion {
            output: mjml,
            kind: OutputKind::Mjml,
            warnings: vec![ConversionWarning::new(SKIPPED_MESSAGE)],
        };
    };

    let options = CompileOptions {
        validation_level: ValidationLevel::Soft,
    };
    match compiler.compile(&mjml, &options) {
        Ok(compiled) => {
            debug!(errors = compiled.errors.len(), "MJML compiled");
            let warnings = compiled
                .errors
                .into_iter()
                .map(|error| {
                    let warning =
                        ConversionWarning::new(format!("MJML validation error: {}", error.message));
                    match error.line {
                        Some(line) => warning.with_line(line),
                        None => warning,
                    }
                })
                .collect();
            Conversion {
                output: compiled.html,
                kind: OutputKind::Html,
                warnings,
            }
        }
        Err(error) => {
            debug!(%error, "MJML compilation failed, returning MJML");
            Conversion {
                output: mjml,
                kind: OutputKind::Mjml,
                warnings: vec![ConversionWarning::new(format!(
                    "MJML processing error: {}",
                    error
                ))],
            }
        }
    }
}
