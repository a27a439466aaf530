//! `mjml` executable as a compiler
//!
//! MJML is piped through `mjml -i -s`, which reads stdin and writes the rendered HTML to
//! stdout. Validation problems are printed on stderr, one per line:
//!
//! ```text
//! Line 4 of stdin (mj-text) — Attribute foo is illegal
//! ```

use super::{CompileDiagnostic, CompileOptions, CompileOutput, MjmlCompiler};
use crate::error::CompilerError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;
use tracing::debug;

static DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Line (\d+) of .+? \(([^)]+)\) (?:—|-) (.+)$").unwrap()
});

/// Runs an installed `mjml` binary
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: PathBuf,
}

impl CommandCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandCompiler {
            program: program.into(),
        }
    }

    /// Find `mjml` on `PATH`
    pub fn locate() -> Result<Self, CompilerError> {
        which::which("mjml")
            .map(Self::new)
            .map_err(|err| CompilerError::Unavailable(format!("mjml not found on PATH: {}", err)))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl MjmlCompiler for CommandCompiler {
    fn compile(&self, mjml: &str, options: &CompileOptions) -> Result<CompileOutput, CompilerError> {
        debug!(program = %self.program.display(), level = %options.validation_level, "running mjml");

        let mut child = Command::new(&self.program)
            .arg("-i")
            .arg("-s")
            .arg(format!("--config.validationLevel={}", options.validation_level))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => CompilerError::Unavailable(
                    format!("cannot run {}: {}", self.program.display(), err),
                ),
                _ => CompilerError::Io(err),
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CompilerError::Failed("mjml stdin was not captured".to_string()))?;
        // stdin is fed from its own thread so a full stdout pipe cannot stall the write
        let input = mjml.to_owned();
        let writer = thread::spawn(move || feed(stdin, &input));

        let output = child.wait_with_output()?;
        let fed = writer
            .join()
            .map_err(|_| CompilerError::Failed("mjml stdin writer panicked".to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let detail = stderr.trim();
            return Err(CompilerError::Failed(if detail.is_empty() {
                format!("mjml exited with {}", output.status)
            } else {
                detail.to_string()
            }));
        }
        fed?;

        let html = String::from_utf8(output.stdout)
            .map_err(|err| CompilerError::Failed(format!("mjml wrote invalid UTF-8: {}", err)))?;
        Ok(CompileOutput {
            html,
            errors: parse_diagnostics(&stderr),
        })
    }
}

/// Write all of `input`; a program that stops reading early is judged by its exit status
fn feed(mut stdin: ChildStdin, input: &str) -> io::Result<()> {
    match stdin.write_all(input.as_bytes()) {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            debug!("mjml closed stdin before reading all input");
            Ok(())
        }
        other => other,
    }
}

/// Pick the validation errors out of `mjml`'s stderr
pub fn parse_diagnostics(stderr: &str) -> Vec<CompileDiagnostic> {
    stderr
        .lines()
        .filter_map(|line| {
            let caps = DIAGNOSTIC.captures(line.trim())?;
            Some(CompileDiagnostic {
                line: caps[1].parse().ok(),
                tag_name: Some(caps[2].to_string()),
                message: caps[3].trim().to_string(),
            })
        })
        .collect()
}
