//! Element mappings
//!
//!     A mapping says what an HTML tag becomes in MJML: the target component, an optional
//!     attribute transform, and a handful of structural flags. The built-in table lives in
//!     [defaults]; [registry::MappingRegistry] layers caller registrations on top of it.
//!
//!     Transforms are pure functions of the source element's HTML attributes. They either
//!     rewrite the attribute set or retarget the element to a different component, which
//!     is how `div` becomes a column and a plain link stops being a button.

pub mod defaults;
pub mod registry;

pub use registry::MappingRegistry;

use crate::markup::Attributes;
use std::fmt;
use std::sync::Arc;

/// Outcome of an attribute transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Keep the mapping's target tag and use these attributes
    Rewrite(Attributes),
    /// Switch to another target tag with these attributes
    Retarget(String, Attributes),
}

/// Shared attribute transform, called with the source element's HTML attributes
pub type AttributeTransform = Arc<dyn Fn(&Attributes) -> Transform + Send + Sync>;

/// How one HTML tag is turned into MJML
#[derive(Clone)]
pub struct ElementMapping {
    /// Target MJML component
    pub mjml_tag: String,
    /// Attribute transform; `None` copies the source attributes through
    pub transform: Option<AttributeTransform>,
    /// Always emit `<tag />`, even when the element has children
    pub self_closing: bool,
    /// Emission is handled by the special-element handler (tables and lists)
    pub special: bool,
    pub inline_element: bool,
    /// Wrap non-blank children output in this tag
    pub children_container: Option<String>,
    /// Advisory text recorded every time the element is converted
    pub warning: Option<String>,
    /// The element produces no output at all
    pub omit: bool,
}

impl ElementMapping {
    pub fn new(mjml_tag: impl Into<String>) -> Self {
        Self {
            mjml_tag: mjml_tag.into(),
            transform: None,
            self_closing: false,
            special: false,
            inline_element: false,
            children_container: None,
            warning: None,
            omit: false,
        }
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Attributes) -> Transform + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn special(mut self) -> Self {
        self.special = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline_element = true;
        self
    }

    pub fn with_children_container(mut self, container: impl Into<String>) -> Self {
        self.children_container = Some(container.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn omitted(mut self) -> Self {
        self.omit = true;
        self
    }

    /// Run the transform (or the identity) over the source attributes
    pub fn apply(&self, source: &Attributes) -> Transform {
        match &self.transform {
            Some(transform) => transform(source),
            None => Transform::Rewrite(source.clone()),
        }
    }
}

impl fmt::Debug for ElementMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMapping")
            .field("mjml_tag", &self.mjml_tag)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .field("self_closing", &self.self_closing)
            .field("special", &self.special)
            .field("inline_element", &self.inline_element)
            .field("children_container", &self.children_container)
            .field("warning", &self.warning)
            .field("omit", &self.omit)
            .finish()
    }
}
