//! Built-in HTML → MJML mapping table

use super::{ElementMapping, Transform};
use crate::markup::Attributes;
use std::collections::HashMap;

pub const FORM_WARNING: &str =
    "Forms are not fully supported in email. Converting to visual representation only.";
pub const INPUT_WARNING: &str =
    "Input elements are not supported in email. Converting to visual representation only.";
pub const SCRIPT_WARNING: &str = "Script elements are not supported in email and were removed.";

/// Font sizes injected into `h1`..`h6`
const HEADING_SIZES: [(&str, &str); 6] = [
    ("h1", "28px"),
    ("h2", "24px"),
    ("h3", "20px"),
    ("h4", "18px"),
    ("h5", "16px"),
    ("h6", "14px"),
];

/// Mapping used for any tag without an entry
pub fn fallback() -> ElementMapping {
    ElementMapping::new("mj-text")
}

/// The default table, keyed by lowercase tag name
pub fn default_mappings() -> HashMap<String, ElementMapping> {
    let mut table = HashMap::new();
    let mut add = |tag: &str, mapping: ElementMapping| {
        table.insert(tag.to_string(), mapping);
    };

    // structure
    add("html", ElementMapping::new("mjml"));
    add("head", ElementMapping::new("mj-head"));
    add("title", ElementMapping::new("mj-title"));
    add("body", ElementMapping::new("mj-body"));

    // content
    add("div", ElementMapping::new("mj-section").with_transform(classify_div));
    add("p", ElementMapping::new("mj-text"));
    for (tag, size) in HEADING_SIZES {
        add(
            tag,
            ElementMapping::new("mj-text").with_transform(move |attrs| heading(attrs, size)),
        );
    }
    add("span", ElementMapping::new("mj-text").inline());
    add("a", ElementMapping::new("mj-button").with_transform(classify_link));
    add(
        "img",
        ElementMapping::new("mj-image")
            .with_transform(image_attributes)
            .self_closing(),
    );
    add("table", ElementMapping::new("mj-table").special());
    add("button", ElementMapping::new("mj-button"));
    add("hr", ElementMapping::new("mj-divider").self_closing());
    add(
        "br",
        ElementMapping::new("mj-spacer")
            .with_transform(spacer_attributes)
            .self_closing(),
    );
    add("ul", ElementMapping::new("mj-text").special());
    add("ol", ElementMapping::new("mj-text").special());
    add("li", ElementMapping::new("mj-text").inline().special());

    // forms become look-alikes
    add("form", ElementMapping::new("mj-section").with_warning(FORM_WARNING));
    add(
        "input",
        ElementMapping::new("mj-text")
            .with_transform(simulated_input)
            .with_warning(INPUT_WARNING),
    );

    // nothing to render
    add("style", ElementMapping::new("mj-style").omitted());
    add(
        "script",
        ElementMapping::new("mj-raw")
            .omitted()
            .with_warning(SCRIPT_WARNING),
    );
    for tag in ["meta", "link", "base"] {
        add(tag, ElementMapping::new("mj-raw").omitted());
    }

    table
}

fn with(attrs: &Attributes, extra: &[(&str, &str)]) -> Attributes {
    let mut out = attrs.clone();
    for (name, value) in extra {
        out.insert(name.to_string(), value.to_string());
    }
    out
}

fn heading(attrs: &Attributes, size: &str) -> Transform {
    Transform::Rewrite(with(
        attrs,
        &[("font-size", size), ("font-weight", "bold")],
    ))
}

fn classify_div(attrs: &Attributes) -> Transform {
    let is_column = attrs
        .get("class")
        .is_some_and(|class| class.contains("column") || class.contains("col"));
    if is_column {
        Transform::Retarget("mj-column".to_string(), attrs.clone())
    } else {
        Transform::Rewrite(attrs.clone())
    }
}

fn classify_link(attrs: &Attributes) -> Transform {
    let class_signal = attrs
        .get("class")
        .is_some_and(|class| class.contains("button") || class.contains("btn"));
    let style_signal = attrs
        .get("style")
        .is_some_and(|style| style.contains("background") || style.contains("padding"));

    if class_signal || style_signal {
        Transform::Rewrite(attrs.clone())
    } else {
        let mut out = attrs.clone();
        if let Some(href) = attrs.get("href") {
            out.insert("href".to_string(), href.clone());
        }
        Transform::Retarget("mj-text".to_string(), out)
    }
}

fn image_attributes(attrs: &Attributes) -> Transform {
    let mut out = Attributes::new();
    for name in ["src", "alt", "width", "height"] {
        if let Some(value) = attrs.get(name) {
            out.insert(name.to_string(), value.clone());
        }
    }
    if attrs.get("responsive").map(String::as_str) == Some("true") {
        out.insert("fluid".to_string(), "true".to_string());
    }
    Transform::Rewrite(out)
}

fn spacer_attributes(attrs: &Attributes) -> Transform {
    let mut out = Attributes::new();
    out.insert("height".to_string(), "20px".to_string());
    for (name, value) in attrs {
        out.insert(name.clone(), value.clone());
    }
    Transform::Rewrite(out)
}

fn simulated_input(attrs: &Attributes) -> Transform {
    Transform::Rewrite(with(attrs, &[("css-class", "form-input-simulation")]))
}
