use html2mjml::compiler::{CompileDiagnostic, CompileOptions, CompileOutput};
use html2mjml::{
    CompilerError, ConversionOptions, ConvertError, Converter, ElementMapping, Html5everParser,
    MjmlCompiler, OutputKind, Transform,
};
use insta::assert_snapshot;
use rstest::rstest;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

fn mjml_only() -> ConversionOptions {
    ConversionOptions {
        validate_output: false,
        show_warnings: false,
        ..Default::default()
    }
}

fn fragment_only() -> ConversionOptions {
    ConversionOptions {
        wrap_content: false,
        ..mjml_only()
    }
}

fn convert(html: &str) -> String {
    html2mjml::convert(html, &mjml_only()).unwrap()
}

struct Throwing;

impl MjmlCompiler for Throwing {
    fn compile(&self, _: &str, _: &CompileOptions) -> Result<CompileOutput, CompilerError> {
        Err(CompilerError::Failed("renderer crashed".to_string()))
    }
}

struct Complaining;

impl MjmlCompiler for Complaining {
    fn compile(&self, mjml: &str, _: &CompileOptions) -> Result<CompileOutput, CompilerError> {
        Ok(CompileOutput {
            html: format!("<html><body>{}</body></html>", mjml.len()),
            errors: vec![CompileDiagnostic {
                line: Some(1),
                message: "mj-text cannot be used inside mj-body".to_string(),
                tag_name: Some("mj-text".to_string()),
            }],
        })
    }
}

#[test]
fn lone_paragraph_becomes_a_document() {
    assert_snapshot!(convert("<p>Hi</p>"), @"<mjml><mj-body><mj-text>Hi</mj-text></mj-body></mjml>");
}

#[test]
fn lone_paragraph_is_repaired_without_wrapping() {
    let out = html2mjml::convert("<p>Hi</p>", &fragment_only()).unwrap();
    assert_snapshot!(out, @"<mj-section><mj-column><mj-text>Hi</mj-text></mj-column></mj-section>");
}

#[test]
fn every_fragment_root_is_repaired() {
    let out = html2mjml::convert("<p>A</p><div class=\"col\">B</div>", &fragment_only()).unwrap();
    assert_eq!(
        out,
        "<mj-section><mj-column><mj-text>A</mj-text></mj-column></mj-section>\
         <mj-section><mj-column>B</mj-column></mj-section>"
    );
}

#[test]
fn explicit_body_is_promoted() {
    let out = convert("<head><title>T</title></head><body><p>x</p></body>");
    assert_eq!(
        out,
        "<mjml><mj-head><mj-title>T</mj-title></mj-head><mj-body><mj-text>x</mj-text></mj-body></mjml>"
    );
}

#[test]
fn unwrapped_body_is_the_root() {
    let out = html2mjml::convert("<body><p>x</p></body>", &fragment_only()).unwrap();
    assert_eq!(out, "<mj-body><mj-text>x</mj-text></mj-body>");
}

#[test]
fn inline_style_beats_class_rules() {
    let out = convert(
        "<style>.a { color: blue } .b { padding: 4px }</style>\
         <p class=\"a b\" style=\"color:red\">x</p>",
    );
    assert!(out.contains(r#"<mj-text color="red" padding="4px">x</mj-text>"#), "{}", out);
}

#[test]
fn heading_sizes_always_win() {
    let out = convert("<h1 style=\"font-size: 10px; font-weight: 300\">Title</h1>");
    assert!(
        out.contains(r#"<mj-text font-size="28px" font-weight="bold">Title</mj-text>"#),
        "{}",
        out
    );
}

#[rstest]
#[case("<div class=\"column-wrapper\">x</div>", "<mj-column>x</mj-column>")]
#[case("<div class=\"hero\">x</div>", "<mj-section>x</mj-section>")]
#[case("<ul><li>One</li></ul>", "<mj-text><mj-text>• One</mj-text></mj-text>")]
#[case("<ol><li>One</li></ol>", "<mj-text><mj-text>One</mj-text></mj-text>")]
#[case("<table><tr><td>x</td></tr></table>", "<mj-table><mj-text><mj-text><mj-text>x</mj-text></mj-text></mj-text></mj-table>")]
#[case("<a href=\"/x\" style=\"padding: 8px\">Go</a>", r#"<mj-button padding="8px" href="/x">Go</mj-button>"#)]
#[case("<p>Line<br>break</p>", r#"<mj-text>Line<mj-spacer height="20px" />break</mj-text>"#)]
#[case("<img src=\"a.png\" alt=\"A\" responsive=\"true\" onclick=\"x()\">", r#"<mj-image src="a.png" alt="A" fluid="true" />"#)]
fn element_mapping(#[case] html: &str, #[case] expected: &str) {
    let out = convert(html);
    assert_eq!(out, format!("<mjml><mj-body>{}</mj-body></mjml>", expected));
}

#[test]
fn unknown_css_is_dropped_silently() {
    let result = Converter::new()
        .convert_detailed("<p style=\"display: flex; color: red\">x</p>", &mjml_only())
        .unwrap();
    assert!(result.output.contains(r#"<mj-text color="red">x</mj-text>"#));
    assert!(result.warnings.is_empty());
}

#[test]
fn class_names_can_be_preserved() {
    let options = ConversionOptions {
        preserve_class_names: true,
        ..mjml_only()
    };
    let out = html2mjml::convert("<p class=\"intro  lead\">x</p>", &options).unwrap();
    assert!(out.contains(r#"<mj-text css-class="intro  lead">x</mj-text>"#), "{}", out);
}

#[test]
fn styles_can_be_left_alone() {
    let options = ConversionOptions {
        inline_styles: false,
        ..mjml_only()
    };
    let out = html2mjml::convert(
        "<style>.a { color: blue }</style><p class=\"a\" style=\"color: red\">x</p>",
        &options,
    )
    .unwrap();
    assert!(out.contains("<mj-text>x</mj-text>"), "{}", out);
}

#[rstest]
#[case(mjml_only())]
#[case(fragment_only())]
#[case(ConversionOptions { inline_styles: false, preserve_class_names: true, ..mjml_only() })]
fn mjml_input_passes_through(#[case] options: ConversionOptions) {
    let source = "<mjml><mj-body><mj-section css-class=\"x\"><mj-column>\
                  <mj-text>Hi</mj-text></mj-column></mj-section></mj-body></mjml>";
    let out = html2mjml::convert(source, &options).unwrap();
    assert_eq!(out, source);
}

#[rstest]
#[case("<p>a</p><img src=\"x.png\"><p>b</p><hr><p>c</p>")]
#[case("<p>a<br>b</p><br><p>c</p>")]
#[case("<div class=\"column\"><img src=\"x.png\" alt=\"X\"><h2>T</h2></div><hr><!-- end -->")]
fn converted_output_converts_to_itself(#[case] html: &str) {
    let once = convert(html);
    assert_eq!(convert(&once), once);
}

#[test]
fn handwritten_self_closing_mjml_is_kept_flat() {
    let source = "<mjml><mj-body><mj-section><mj-column><mj-image src=\"a.png\"/>\
                  <mj-divider/><mj-spacer height=\"8px\" /><mj-text>x</mj-text>\
                  </mj-column></mj-section></mj-body></mjml>";
    assert_snapshot!(convert(source), @r#"<mjml><mj-body><mj-section><mj-column><mj-image src="a.png" /><mj-divider /><mj-spacer height="8px" /><mj-text>x</mj-text></mj-column></mj-section></mj-body></mjml>"#);
}

#[test]
fn content_around_mjml_is_reported() {
    let result = Converter::new()
        .convert_detailed(
            "<p>intro</p><mjml><mj-body></mj-body></mjml><p>outro</p>",
            &mjml_only(),
        )
        .unwrap();
    assert_eq!(result.output, "<mjml><mj-body /></mjml>");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.starts_with("Content outside the <mjml> root"));
}

#[test]
fn fragment_title_is_a_head_component() {
    let out = convert("<title>T</title><p>x</p>");
    assert!(out.starts_with("<mjml><mj-head><mj-title>T</mj-title></mj-head><mj-body>"), "{}", out);
}

#[test]
fn throwing_compiler_returns_raw_mjml() {
    let converter = Converter::new().with_compiler(Throwing);
    let options = ConversionOptions {
        show_warnings: false,
        ..Default::default()
    };
    let result = converter.convert_detailed("<p>Hi</p>", &options).unwrap();
    assert_eq!(result.kind, OutputKind::Mjml);
    assert_eq!(
        result.output,
        "<mjml><mj-body><mj-text>Hi</mj-text></mj-body></mjml>"
    );
    assert_eq!(
        result.warnings[0].message,
        "MJML processing error: renderer crashed"
    );
}

#[test]
fn validation_errors_do_not_change_the_output() {
    let converter = Converter::new().with_compiler(Complaining);
    let options = ConversionOptions {
        show_warnings: false,
        ..Default::default()
    };
    let result = converter.convert_detailed("<p>Hi</p>", &options).unwrap();
    assert_eq!(result.kind, OutputKind::Html);
    assert!(result.output.starts_with("<html><body>"));
    assert_eq!(
        result.warnings[0].to_string(),
        "[html2mjml] WARNING: MJML validation error: mj-text cannot be used inside mj-body at line 1"
    );
}

#[test]
fn missing_compiler_is_reported() {
    let result = Converter::new()
        .convert_detailed("<p>Hi</p>", &ConversionOptions::default())
        .unwrap();
    assert_eq!(result.kind, OutputKind::Mjml);
    assert_eq!(
        result.warnings.last().map(|w| w.message.as_str()),
        Some("MJML validation skipped: no MJML compiler configured")
    );
}

#[test]
fn registered_mapping_persists_until_overwritten() {
    let mut converter = Converter::new();
    converter
        .register_mapping("div", ElementMapping::new("mj-wrapper"))
        .unwrap();

    let first = converter.convert("<div>x</div>", &mjml_only()).unwrap();
    let second = converter.convert("<div>y</div>", &mjml_only()).unwrap();
    assert!(first.contains("<mj-wrapper>x</mj-wrapper>"), "{}", first);
    assert!(second.contains("<mj-wrapper>y</mj-wrapper>"), "{}", second);

    converter
        .register_mapping(
            "DIV",
            ElementMapping::new("mj-section")
                .with_transform(|_| Transform::Retarget("mj-group".to_string(), Default::default())),
        )
        .unwrap();
    let third = converter.convert("<div>z</div>", &mjml_only()).unwrap();
    assert!(third.contains("<mj-group>z</mj-group>"), "{}", third);
}

#[test]
fn invalid_registrations_are_rejected() {
    let mut converter = Converter::new();
    let result = converter.register_mapping("", ElementMapping::new("mj-text"));
    assert!(matches!(result, Err(ConvertError::InvalidMapping(_))));

    let out = converter.convert("<p>x</p>", &mjml_only()).unwrap();
    assert!(out.contains("<mj-text>x</mj-text>"));
}

#[test]
fn malformed_input_is_fatal() {
    let result = html2mjml::convert("<p>\0</p>", &mjml_only());
    assert!(matches!(result, Err(ConvertError::MalformedInput(_))));

    let converter = Converter::new().with_parser(Html5everParser::new().with_max_input_bytes(16));
    let result = converter.convert(&"<p>x</p>".repeat(4), &mjml_only());
    assert!(matches!(result, Err(ConvertError::MalformedInput(_))));
}

#[rstest]
#[case("")]
#[case("plain text")]
#[case("<p>unclosed <b>bold")]
#[case("</div></div><p>")]
#[case("<table><p>misnested</table>")]
#[case("<!-- only a comment -->")]
fn sloppy_html_never_errors(#[case] html: &str) {
    assert!(html2mjml::convert(html, &mjml_only()).is_ok());
    assert!(html2mjml::convert(html, &fragment_only()).is_ok());
}

#[test]
fn warnings_keep_repeats_in_document_order() {
    let result = Converter::new()
        .convert_detailed(
            "<form><input><input></form><style>.x { color }</style>",
            &mjml_only(),
        )
        .unwrap();
    let messages: Vec<_> = result
        .warnings
        .iter()
        .map(|w| w.element.clone().unwrap_or_else(|| w.message.clone()))
        .collect();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("Failed to parse <style> block"));
    assert_eq!(&messages[1..], ["form", "input", "input"]);
}

#[test]
fn newsletter_converts() {
    let result = Converter::new()
        .convert_detailed(&fixture("newsletter.html"), &mjml_only())
        .unwrap();
    let out = &result.output;

    assert!(out.starts_with("<mjml><mj-head>"), "{}", out);
    assert!(out.contains("<mj-title>Weekly digest</mj-title>"), "{}", out);
    assert!(out.ends_with("</mj-body></mjml>"), "{}", out);
    assert!(!out.contains("<style"));
    assert!(!out.contains("trackOpen"));

    for expected in [
        r##"<mj-text color="#1a1a1a" font-family="Georgia, serif" font-size="28px" font-weight="bold">This week</mj-text>"##,
        r##"<mj-text color="#777777" font-size="12px" align="center">Three things worth reading.</mj-text>"##,
        r#"<mj-image src="https://example.com/hero.png" alt="Hero" width="600" fluid="true" />"#,
        "<mj-text>• First story</mj-text>",
        "<mj-text>Step one</mj-text>",
        r##"<mj-button background-color="#0055ff" border-radius="4px" href="https://example.com/read">Read more</mj-button>"##,
        r#"<mj-text href="https://example.com/unsubscribe">Unsubscribe</mj-text>"#,
        "<mj-divider />",
        r#"<mj-spacer height="20px" />"#,
    ] {
        assert!(out.contains(expected), "missing {}\n{}", expected, out);
    }
    assert!(out.contains("<mj-section>"));
    assert!(out.contains("<mj-column>"));

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].element.as_deref(), Some("script"));
}
