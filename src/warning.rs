//! Conversion warnings
//!
//! Warnings are the side channel of a conversion call: advisory, ordered, never
//! deduplicated, and never able to change the returned text.

use serde::Serialize;
use std::fmt;

/// Prefix used when a warning is rendered for an operator
pub const WARNING_PREFIX: &str = "[html2mjml] WARNING:";

/// A non-fatal diagnostic collected while converting one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionWarning {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
            line: None,
        }
    }

    /// Tag the warning with the source element that triggered it
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", WARNING_PREFIX, self.message)?;
        if let Some(element) = &self.element {
            write!(f, " (Element: {})", element)?;
        }
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        Ok(())
    }
}
