//! Document-level conversion
//!
//! [Converter] ties the pieces together for one call: parse, collect `<style>` rules,
//! normalize the root, transform (or pass an embedded MJML document through), and hand
//! the result to the compiler bridge.

use crate::compiler::{compile_or_fallback, MjmlCompiler};
use crate::dom::{Document, Html5everParser, HtmlParser};
use crate::error::ConvertError;
use crate::mapping::{ElementMapping, MappingRegistry};
use crate::options::{Conversion, ConversionOptions, OutputKind};
use crate::style::{resolve_style_block, StyleMap};
use crate::transform::Transformer;
use crate::warning::ConversionWarning;
use std::borrow::Cow;
use tracing::{debug, warn};

pub const DISCARDED_OUTSIDE_MJML: &str =
    "Content outside the <mjml> root was discarded; only the MJML document is passed through.";

/// HTML → MJML converter
///
/// Owns the mapping registry, the HTML parser, and an optional MJML compiler. Conversions
/// only need `&self`, so a converter can be shared across threads; registering mappings
/// needs `&mut self`.
///
/// # Examples
///
/// ```ignore
/// let converter = Converter::new();
/// let options = ConversionOptions {
///     validate_output: false,
///     ..Default::default()
/// };
/// let mjml = converter.convert("<p>Hello</p>", &options)?;
/// ```
pub struct Converter {
    registry: MappingRegistry,
    parser: Box<dyn HtmlParser>,
    compiler: Option<Box<dyn MjmlCompiler>>,
}

impl Converter {
    /// Built-in mappings, the html5ever parser, and no compiler
    pub fn new() -> Self {
        Converter {
            registry: MappingRegistry::new(),
            parser: Box::new(Html5everParser::new()),
            compiler: None,
        }
    }

    pub fn with_registry(mut self, registry: MappingRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_parser<P: HtmlParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_compiler<C: MjmlCompiler + 'static>(mut self, compiler: C) -> Self {
        self.compiler = Some(Box::new(compiler));
        self
    }

    pub fn registry_mut(&mut self) -> &mut MappingRegistry {
        &mut self.registry
    }

    /// Register a mapping used by every later conversion through this converter
    pub fn register_mapping(
        &mut self,
        tag: &str,
        mapping: ElementMapping,
    ) -> Result<(), ConvertError> {
        self.registry.register(tag, mapping)
    }

    /// Convert `html`, returning MJML (or compiled HTML when validating with a compiler)
    pub fn convert(&self, html: &str, options: &ConversionOptions) -> Result<String, ConvertError> {
        self.convert_detailed(html, options)
            .map(|conversion| conversion.output)
    }

    /// Convert `html` and report the output kind and every warning
    pub fn convert_detailed(
        &self,
        html: &str,
        options: &ConversionOptions,
    ) -> Result<Conversion, ConvertError> {
        let mut document = self.parser.parse(html)?;
        let mut warnings = Vec::new();

        let styles = if options.inline_styles {
            collect_styles(&document, &mut warnings)
        } else {
            StyleMap::new()
        };

        if options.wrap_content && document.normalize_root() {
            debug!("wrapped top-level content in html/body");
        }

        let (mjml, passthrough) = match document.find_element("mjml") {
            Some(root) => {
                debug!("input already contains MJML, passing it through");
                if document.has_content_outside(root) {
                    warnings.push(ConversionWarning::new(DISCARDED_OUTSIDE_MJML));
                }
                (root.outer_html(), true)
            }
            None => {
                let registry = if options.custom_element_mappings.is_empty() {
                    Cow::Borrowed(&self.registry)
                } else {
                    Cow::Owned(
                        self.registry
                            .with_overrides(&options.custom_element_mappings)?,
                    )
                };
                let mut transformer = Transformer::new(&registry, &styles).with_options(options);
                let mjml = transform_document(&mut transformer, &document);
                warnings.extend(transformer.into_warnings());
                (mjml, false)
            }
        };
        let mjml = mjml.trim().to_string();

        let conversion = if options.validate_output && (!passthrough || options.validate_passthrough)
        {
            let compiled = compile_or_fallback(self.compiler.as_deref(), mjml);
            warnings.extend(compiled.warnings);
            Conversion {
                output: compiled.output,
                kind: compiled.kind,
                warnings,
            }
        } else {
            Conversion {
                output: mjml,
                kind: OutputKind::Mjml,
                warnings,
            }
        };

        if options.show_warnings {
            for warning in &conversion.warnings {
                warn!("{}", warning);
            }
        }
        Ok(conversion)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold every `<style>` block into one map; unparsable blocks contribute nothing
fn collect_styles(document: &Document, warnings: &mut Vec<ConversionWarning>) -> StyleMap {
    let mut styles = StyleMap::new();
    for css in document.style_blocks() {
        match resolve_style_block(&css) {
            Ok(block) => styles.merge(block),
            Err(err) => warnings.push(ConversionWarning::new(format!(
                "Failed to parse <style> block: {}",
                err
            ))),
        }
    }
    debug!(classes = styles.len(), "collected class styles");
    styles
}

/// Transform from the `html` root, else the top-level `body`, else the whole fragment
fn transform_document(transformer: &mut Transformer<'_>, document: &Document) -> String {
    match document
        .top_level_node("html")
        .or_else(|| document.top_level_node("body"))
    {
        Some(root) => transformer.transform_node(root),
        None => transformer.transform_fragment(&document.nodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, CompileOutput};
    use crate::error::CompilerError;
    use crate::mapping::Transform;

    fn mjml_only() -> ConversionOptions {
        ConversionOptions {
            validate_output: false,
            show_warnings: false,
            ..Default::default()
        }
    }

    struct Echo;

    impl MjmlCompiler for Echo {
        fn compile(&self, mjml: &str, _: &CompileOptions) -> Result<CompileOutput, CompilerError> {
            Ok(CompileOutput {
                html: format!("<!doctype html>{}", mjml),
                errors: Vec::new(),
            })
        }
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let out = Converter::new().convert("<p>Hi</p>", &mjml_only()).unwrap();
        assert_eq!(out, "<mjml><mj-body><mj-text>Hi</mj-text></mj-body></mjml>");
    }

    #[test]
    fn test_unwrapped_fragment_is_repaired() {
        let options = ConversionOptions {
            wrap_content: false,
            ..mjml_only()
        };
        let out = Converter::new().convert("<p>Hi</p>", &options).unwrap();
        assert_eq!(
            out,
            "<mj-section><mj-column><mj-text>Hi</mj-text></mj-column></mj-section>"
        );
    }

    #[test]
    fn test_registration_persists() {
        let mut converter = Converter::new();
        converter
            .register_mapping("div", ElementMapping::new("mj-wrapper"))
            .unwrap();
        for _ in 0..2 {
            let out = converter
                .convert("<div class=\"column\">x</div>", &mjml_only())
                .unwrap();
            assert!(out.contains("<mj-wrapper>x</mj-wrapper>"), "{}", out);
        }
    }

    #[test]
    fn test_per_call_mappings_do_not_persist() {
        let converter = Converter::new();
        let mut options = mjml_only();
        options.custom_element_mappings.insert(
            "p".to_string(),
            ElementMapping::new("mj-raw").with_transform(|_| Transform::Rewrite(Default::default())),
        );

        let layered = converter.convert("<p id=\"x\">a</p>", &options).unwrap();
        assert!(layered.contains("<mj-raw>a</mj-raw>"), "{}", layered);

        let plain = converter.convert("<p>a</p>", &mjml_only()).unwrap();
        assert!(plain.contains("<mj-text>a</mj-text>"), "{}", plain);
    }

    #[test]
    fn test_compiler_output_is_returned() {
        let converter = Converter::new().with_compiler(Echo);
        let options = ConversionOptions {
            show_warnings: false,
            ..Default::default()
        };
        let result = converter.convert_detailed("<p>Hi</p>", &options).unwrap();
        assert_eq!(result.kind, OutputKind::Html);
        assert!(result.output.starts_with("<!doctype html><mjml>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_passthrough_skips_compiler_unless_asked() {
        let converter = Converter::new().with_compiler(Echo);
        let source = "<mjml><mj-body><mj-text>x</mj-text></mj-body></mjml>";
        let mut options = ConversionOptions {
            show_warnings: false,
            ..Default::default()
        };

        let result = converter.convert_detailed(source, &options).unwrap();
        assert_eq!(result.kind, OutputKind::Mjml);
        assert_eq!(result.output, source);

        options.validate_passthrough = true;
        let result = converter.convert_detailed(source, &options).unwrap();
        assert_eq!(result.kind, OutputKind::Html);
    }

    #[test]
    fn test_passthrough_reports_discarded_content() {
        let result = Converter::new()
            .convert_detailed(
                "<p>intro</p><mjml><mj-body></mj-body></mjml><p>outro</p>",
                &mjml_only(),
            )
            .unwrap();
        assert_eq!(result.output, "<mjml><mj-body /></mjml>");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, DISCARDED_OUTSIDE_MJML);

        let clean = Converter::new()
            .convert_detailed("\n<mjml><mj-body></mj-body></mjml>\n", &mjml_only())
            .unwrap();
        assert!(clean.warnings.is_empty());
    }

    #[test]
    fn test_fragment_title_lands_in_head() {
        let out = Converter::new()
            .convert("<title>T</title><p>x</p>", &mjml_only())
            .unwrap();
        assert_eq!(
            out,
            "<mjml><mj-head><mj-title>T</mj-title></mj-head><mj-body><mj-text>x</mj-text></mj-body></mjml>"
        );
    }

    #[test]
    fn test_broken_style_block_warns() {
        let result = Converter::new()
            .convert_detailed(
                "<style>.a { color red }</style><style>.b { color: blue }</style><p class=\"a b\">x</p>",
                &mjml_only(),
            )
            .unwrap();
        assert!(result.output.contains(r#"<mj-text color="blue">x</mj-text>"#));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0]
            .message
            .starts_with("Failed to parse <style> block:"));
    }
}
