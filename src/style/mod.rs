//! Style resolution
//!
//!     Turns CSS into MJML attributes. Two sources feed a node's styling: its own `style`
//!     attribute and the class rules of every `<style>` block in the document. Both go
//!     through the same closed property table (see [properties]), so anything outside it
//!     never reaches the output.
//!
//!     There is no cascade: no specificity, no pseudo-classes, no media queries. Class rules
//!     are looked up by exact class name and applied in the order the classes are listed on
//!     the element.

pub mod inline;
pub mod properties;
pub mod sheet;

pub use inline::resolve_inline_style;
pub use properties::mjml_attribute_for;
pub use sheet::resolve_style_block;

use crate::markup::Attributes;
use std::collections::HashMap;

/// Class name (without the leading `.`) → resolved MJML attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    classes: HashMap<String, Attributes>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `attributes` onto whatever `class` already has
    pub fn assign(&mut self, class: &str, attributes: &Attributes) {
        let entry = self.classes.entry(class.to_string()).or_default();
        for (name, value) in attributes {
            entry.insert(name.clone(), value.clone());
        }
    }

    /// Fold a later block into this one; later values win per class per attribute
    pub fn merge(&mut self, other: StyleMap) {
        for (class, attributes) in other.classes {
            self.assign(&class, &attributes);
        }
    }

    pub fn get(&self, class: &str) -> Option<&Attributes> {
        self.classes.get(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Layer the styles of each class in `class_value` onto `base`, in listed order
pub fn apply_class_styles(base: &Attributes, class_value: &str, styles: &StyleMap) -> Attributes {
    let mut attributes = base.clone();
    for class in class_value.split_whitespace() {
        if let Some(resolved) = styles.get(class) {
            for (name, value) in resolved {
                attributes.insert(name.clone(), value.clone());
            }
        }
    }
    attributes
}
