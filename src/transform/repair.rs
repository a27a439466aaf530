//! Structural repair for parentless nodes
//!
//! MJML only accepts content components inside `mj-column`, and columns only inside
//! `mj-section`. A node converted without a parent gets whatever wrappers it is missing.

use crate::markup::wrap;

/// Components that must live directly inside `mj-column`
pub const COLUMN_CHILDREN: [&str; 8] = [
    "mj-text",
    "mj-image",
    "mj-button",
    "mj-divider",
    "mj-spacer",
    "mj-table",
    "mj-social",
    "mj-navbar",
];

pub fn needs_column(tag: &str) -> bool {
    COLUMN_CHILDREN.contains(&tag)
}

pub fn needs_section(tag: &str) -> bool {
    matches!(tag, "mj-column" | "mj-group")
}

/// Wrap the markup of a root node emitted as `tag`
pub fn wrap_root(tag: &str, markup: String) -> String {
    let mut tag = tag;
    let mut markup = markup;
    if needs_column(tag) {
        markup = wrap("mj-column", &markup);
        tag = "mj-column";
    }
    if needs_section(tag) {
        markup = wrap("mj-section", &markup);
    }
    markup
}
