//! Per-call options and the detailed conversion result

use crate::mapping::ElementMapping;
use crate::warning::ConversionWarning;
use indexmap::IndexMap;
use serde::Serialize;

/// Options for one conversion call
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Run the generated MJML through the configured compiler
    pub validate_output: bool,
    /// Copy the source `class` attribute into `css-class`
    pub preserve_class_names: bool,
    /// Resolve inline styles and `<style>` class rules into attributes
    pub inline_styles: bool,
    /// Mappings layered over the registry for this call only
    pub custom_element_mappings: IndexMap<String, ElementMapping>,
    /// Synthesize `html`/`body` around input that has no `html` root
    pub wrap_content: bool,
    /// Log collected warnings through `tracing`
    pub show_warnings: bool,
    /// Also compile input that already is MJML
    pub validate_passthrough: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            validate_output: true,
            preserve_class_names: false,
            inline_styles: true,
            custom_element_mappings: IndexMap::new(),
            wrap_content: true,
            show_warnings: true,
            validate_passthrough: false,
        }
    }
}

/// What kind of text a conversion returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// MJML markup (validation off, skipped, or failed)
    Mjml,
    /// HTML rendered by the MJML compiler
    Html,
}

/// Detailed result of a conversion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub output: String,
    pub kind: OutputKind,
    pub warnings: Vec<ConversionWarning>,
}

impl Conversion {
    pub fn is_html(&self) -> bool {
        self.kind == OutputKind::Html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConversionOptions::default();
        assert!(options.validate_output);
        assert!(!options.preserve_class_names);
        assert!(options.inline_styles);
        assert!(options.custom_element_mappings.is_empty());
        assert!(options.wrap_content);
        assert!(options.show_warnings);
        assert!(!options.validate_passthrough);
    }

    #[test]
    fn test_conversion_serializes_kind_in_lowercase() {
        let conversion = Conversion {
            output: "<mjml />".to_string(),
            kind: OutputKind::Mjml,
            warnings: vec![ConversionWarning::new("w")],
        };
        let json = serde_json::to_value(&conversion).unwrap();
        assert_eq!(json["kind"], "mjml");
        assert_eq!(json["warnings"][0]["message"], "w");
        assert!(!conversion.is_html());
    }
}
