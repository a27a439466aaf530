//! HTML to MJML conversion
//!
//!     This crate turns an HTML document into MJML, the component markup that email
//!     frameworks compile into table-based, client-safe HTML. CSS is not carried over as
//!     CSS: inline `style` attributes and the class rules of `<style>` blocks are resolved
//!     into MJML component attributes, and anything MJML has no attribute for is dropped.
//!
//!     This is a pure lib: it powers html2mjml-cli but makes no assumptions about a shell.
//!     Nothing here reads env vars or prints; warnings are returned to the caller and, when
//!     asked for, logged through `tracing`.
//!
//! Architecture
//!
//!     raw HTML ─ HtmlParser ─> Document ─ root normalization ─> Transformer ─> MJML
//!                                 │                                 ▲
//!                                 └── <style> blocks ─> StyleMap ───┘
//!
//!     MJML ─ compiler bridge (optional) ─> HTML, or the MJML itself on failure
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── warning.rs
//!     ├── markup.rs               # Attribute maps, escaping and tag rendering
//!     ├── options.rs              # ConversionOptions and the detailed result
//!     ├── style                   # Inline styles, <style> blocks, the CSS → MJML table
//!     ├── mapping                 # ElementMapping, defaults, MappingRegistry
//!     ├── dom                     # Owned document model and the html5ever parser
//!     ├── transform               # Tree walk, tables and lists, structural repair
//!     ├── compiler                # MjmlCompiler trait, soft-validation bridge, mjml binary
//!     ├── converter.rs            # Converter: one call end to end
//!     └── lib.rs
//!
//! Known simplifications
//!
//!     There is no CSS cascade. Class rules match by exact class name only, later rules win
//!     attribute by attribute, and inline declarations win over class rules. Ordered lists
//!     get no numbers. Forms and inputs become look-alikes with a warning.
//!
//! Usage
//!
//!     let options = ConversionOptions { validate_output: false, ..Default::default() };
//!     let mjml = html2mjml::convert("<h1>Hello</h1>", &options)?;

pub mod compiler;
pub mod converter;
pub mod dom;
pub mod error;
pub mod mapping;
pub mod markup;
pub mod options;
pub mod style;
pub mod transform;
pub mod warning;

pub use compiler::{CommandCompiler, MjmlCompiler, ValidationLevel};
pub use converter::Converter;
pub use dom::{Document, Element, Html5everParser, HtmlParser, Node};
pub use error::{CompilerError, ConvertError, StyleError};
pub use mapping::{ElementMapping, MappingRegistry, Transform};
pub use markup::Attributes;
pub use options::{Conversion, ConversionOptions, OutputKind};
pub use warning::ConversionWarning;

/// Convert `html` with a default [Converter] (built-in mappings, no compiler)
pub fn convert(html: &str, options: &ConversionOptions) -> Result<String, ConvertError> {
    Converter::new().convert(html, options)
}
