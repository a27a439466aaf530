//! Markup text helpers shared by the transformer and the DOM serializer

use indexmap::IndexMap;

/// Insertion-ordered attribute set.
///
/// Re-inserting an existing name replaces the value in place, so the emitted attribute
/// order is the order in which names were first seen.
pub type Attributes = IndexMap<String, String>;

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape character data
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render attributes as ` name="value"` pairs (with a leading space when non-empty)
pub fn attributes_to_string(attributes: &Attributes) -> String {
    let mut out = String::new();
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    out
}

/// `<tag attrs />`
pub fn self_closing_tag(tag: &str, attributes: &Attributes) -> String {
    format!("<{}{} />", tag, attributes_to_string(attributes))
}

/// `<tag attrs>content</tag>`
pub fn full_tag(tag: &str, attributes: &Attributes, content: &str) -> String {
    format!(
        "<{}{}>{}</{}>",
        tag,
        attributes_to_string(attributes),
        content,
        tag
    )
}

/// Wrap already-rendered markup in a bare container tag
pub fn wrap(tag: &str, content: &str) -> String {
    format!("<{}>{}</{}>", tag, content, tag)
}
