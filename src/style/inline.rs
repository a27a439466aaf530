//! Inline `style="…"` resolution

use super::properties::mjml_attribute_for;
use crate::markup::Attributes;

/// Resolve an inline style string into MJML attributes.
///
/// Declarations are split on `;` and then on the first `:`. Declarations with an empty
/// property or value are skipped; the rest of the string is still honored.
pub fn resolve_inline_style(style: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for (property, value) in parse_declarations(style) {
        if let Some(name) = mjml_attribute_for(&property) {
            attributes.insert(name.to_string(), value);
        }
    }
    attributes
}

/// Split an inline style string into `(lowercase property, value)` pairs
pub(crate) fn parse_declarations(source: &str) -> Vec<(String, String)> {
    source
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = strip_important(value);
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name, value.to_string()))
        })
        .collect()
}

/// Trim a declaration value and drop a trailing `!important`
pub(crate) fn strip_important(value: &str) -> &str {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    match lower.strip_suffix("important") {
        Some(rest) if rest.trim_end().ends_with('!') => {
            let bang = rest.trim_end().len() - 1;
            value[..bang].trim_end()
        }
        _ => value,
    }
}
