//! Emission for tables and lists

use crate::markup::{full_tag, Attributes};

/// Glyph prepended to items of an unordered list
pub const BULLET: &str = "• ";

/// Emit a `special` element.
///
/// Tables and lists always get a full open/close tag around their transformed children.
/// List items under `ul` get a bullet; items under `ol` get nothing, there is no numbering.
pub fn emit_special(
    source_tag: &str,
    target_tag: &str,
    attributes: &Attributes,
    children: &str,
    parent: Option<&str>,
) -> String {
    match source_tag {
        "li" => {
            let prefix = if parent == Some("ul") { BULLET } else { "" };
            full_tag(target_tag, attributes, &format!("{}{}", prefix, children))
        }
        _ => full_tag(target_tag, attributes, children),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_items() {
        let attrs = Attributes::new();
        assert_eq!(
            emit_special("li", "mj-text", &attrs, "One", Some("ul")),
            "<mj-text>• One</mj-text>"
        );
        assert_eq!(
            emit_special("li", "mj-text", &attrs, "One", Some("ol")),
            "<mj-text>One</mj-text>"
        );
        assert_eq!(
            emit_special("li", "mj-text", &attrs, "One", None),
            "<mj-text>One</mj-text>"
        );
    }

    #[test]
    fn test_empty_table_keeps_full_tag() {
        let mut attrs = Attributes::new();
        attrs.insert("width".into(), "100%".into());
        assert_eq!(
            emit_special("table", "mj-table", &attrs, "", None),
            r#"<mj-table width="100%"></mj-table>"#
        );
    }
}
