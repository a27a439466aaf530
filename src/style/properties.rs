//! CSS property → MJML attribute table
//!
//! The table is closed: a property missing from it is dropped without a warning.

const CSS_TO_MJML: &[(&str, &str)] = &[
    // text
    ("color", "color"),
    ("font-family", "font-family"),
    ("font-size", "font-size"),
    ("font-style", "font-style"),
    ("font-weight", "font-weight"),
    ("line-height", "line-height"),
    ("letter-spacing", "letter-spacing"),
    ("text-align", "align"),
    ("text-decoration", "text-decoration"),
    ("text-transform", "text-transform"),
    // spacing
    ("padding", "padding"),
    ("padding-top", "padding-top"),
    ("padding-right", "padding-right"),
    ("padding-bottom", "padding-bottom"),
    ("padding-left", "padding-left"),
    ("margin", "margin"),
    ("margin-top", "margin-top"),
    ("margin-right", "margin-right"),
    ("margin-bottom", "margin-bottom"),
    ("margin-left", "margin-left"),
    // layout
    ("width", "width"),
    ("height", "height"),
    ("max-width", "max-width"),
    ("background-color", "background-color"),
    ("background", "background"),
    ("border", "border"),
    ("border-radius", "border-radius"),
    ("border-top", "border-top"),
    ("border-right", "border-right"),
    ("border-bottom", "border-bottom"),
    ("border-left", "border-left"),
    // section containers
    ("direction", "direction"),
    ("vertical-align", "vertical-align"),
];

/// Translate a (lowercase) CSS property name into its MJML attribute name
pub fn mjml_attribute_for(property: &str) -> Option<&'static str> {
    CSS_TO_MJML
        .iter()
        .find(|(css, _)| *css == property)
        .map(|(_, mjml)| *mjml)
}

/// Every attribute name the table can produce
pub fn mjml_attribute_names() -> impl Iterator<Item = &'static str> {
    CSS_TO_MJML.iter().map(|(_, mjml)| *mjml)
}
