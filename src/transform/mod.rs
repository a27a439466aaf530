//! Tree transformation
//!
//!     A depth-first walk over the [Document](crate::dom::Document) model that emits MJML
//!     text. Each element is looked up in the [MappingRegistry], its styling is resolved
//!     into attributes, its children are transformed in order, and the result is written
//!     as a full or self-closing tag.
//!
//!     Elements that already are MJML components (`mj-*`, `mjml`) pass through with their
//!     attributes untouched. Nodes transformed without a parent get the `mj-column` and
//!     `mj-section` wrappers MJML requires (see [repair]).
//!
//!     Attribute layering, lowest to highest precedence:
//!
//!         class rules from `<style>` blocks, in class-list order
//!         declarations from the `style` attribute
//!         `css-class` (when class names are preserved)
//!         the mapping's transform output
//!
//!     The source `style` and `class` attributes are consumed by these layers and never
//!     copied through as-is.

pub mod repair;
pub mod special;

use crate::dom::{Element, Node};
use crate::mapping::{MappingRegistry, Transform};
use crate::markup::{full_tag, self_closing_tag, wrap, Attributes};
use crate::options::ConversionOptions;
use crate::style::{apply_class_styles, resolve_inline_style, StyleMap};
use crate::warning::ConversionWarning;
use tracing::trace;

/// Source attributes consumed by style resolution
const CONSUMED_ATTRIBUTES: [&str; 2] = ["style", "class"];

/// Is `tag` already an MJML component?
pub fn is_mjml_component(tag: &str) -> bool {
    tag == "mjml" || tag.starts_with("mj-")
}

/// Output of one node: its markup and, for elements, the tag it was emitted as
struct Emitted {
    tag: Option<String>,
    markup: String,
}

impl Emitted {
    fn text(markup: String) -> Self {
        Emitted { tag: None, markup }
    }

    fn nothing() -> Self {
        Emitted::text(String::new())
    }
}

/// Converts document nodes to MJML markup, collecting warnings along the way
pub struct Transformer<'a> {
    registry: &'a MappingRegistry,
    styles: &'a StyleMap,
    inline_styles: bool,
    preserve_class_names: bool,
    warnings: Vec<ConversionWarning>,
}

impl<'a> Transformer<'a> {
    pub fn new(registry: &'a MappingRegistry, styles: &'a StyleMap) -> Self {
        Transformer {
            registry,
            styles,
            inline_styles: true,
            preserve_class_names: false,
            warnings: Vec::new(),
        }
    }

    /// Take the styling switches from `options`
    pub fn with_options(mut self, options: &ConversionOptions) -> Self {
        self.inline_styles = options.inline_styles;
        self.preserve_class_names = options.preserve_class_names;
        self
    }

    /// Transform `node` as a parentless root, repairing its structure
    pub fn transform_node(&mut self, node: &Node) -> String {
        let emitted = self.visit(node, None);
        match emitted.tag {
            Some(tag) => repair::wrap_root(&tag, emitted.markup),
            None => emitted.markup,
        }
    }

    /// Transform each node as a parentless root and concatenate the results
    pub fn transform_fragment(&mut self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.transform_node(node)).collect()
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }

    fn visit(&mut self, node: &Node, parent: Option<&str>) -> Emitted {
        match node {
            Node::Text(text) => Emitted::text(text.clone()),
            Node::Comment(text) => Emitted::text(format!("<!-- {} -->", text)),
            Node::Element(element) if is_mjml_component(&element.name) => {
                self.pass_through(element)
            }
            Node::Element(element) => self.convert(element, parent),
        }
    }

    fn children(&mut self, element: &Element) -> String {
        element
            .children
            .iter()
            .map(|child| self.visit(child, Some(element.name.as_str())).markup)
            .collect()
    }

    fn pass_through(&mut self, element: &Element) -> Emitted {
        let children = self.children(element);
        let markup = if children.trim().is_empty() {
            self_closing_tag(&element.name, &element.attributes)
        } else {
            full_tag(&element.name, &element.attributes, &children)
        };
        Emitted {
            tag: Some(element.name.clone()),
            markup,
        }
    }

    fn convert(&mut self, element: &Element, parent: Option<&str>) -> Emitted {
        let registry = self.registry;
        let mapping = registry.lookup(&element.name);

        if let Some(message) = &mapping.warning {
            self.warnings
                .push(ConversionWarning::new(message.clone()).with_element(element.name.clone()));
        }
        if mapping.omit {
            trace!(tag = %element.name, "omitted element");
            return Emitted::nothing();
        }

        let mut attributes = self.styled_attributes(element);
        let (tag, transformed) = match mapping.apply(&element.attributes) {
            Transform::Rewrite(attrs) => (mapping.mjml_tag.clone(), attrs),
            Transform::Retarget(tag, attrs) => (tag, attrs),
        };
        for (name, value) in transformed {
            if !CONSUMED_ATTRIBUTES.contains(&name.as_str()) {
                attributes.insert(name, value);
            }
        }

        let children = self.children(element);
        let markup = if mapping.special {
            special::emit_special(&element.name, &tag, &attributes, &children, parent)
        } else {
            let content = match &mapping.children_container {
                Some(container) if !children.trim().is_empty() => wrap(container, &children),
                _ => children,
            };
            if mapping.self_closing || content.trim().is_empty() {
                self_closing_tag(&tag, &attributes)
            } else {
                full_tag(&tag, &attributes, &content)
            }
        };

        trace!(source = %element.name, target = %tag, "converted element");
        Emitted {
            tag: Some(tag),
            markup,
        }
    }

    /// Attributes contributed by class rules, the inline style, and `css-class`
    fn styled_attributes(&self, element: &Element) -> Attributes {
        let class = element.attribute("class");
        let mut attributes = Attributes::new();

        if self.inline_styles {
            if let Some(class) = class {
                attributes = apply_class_styles(&attributes, class, self.styles);
            }
            if let Some(style) = element.attribute("style") {
                attributes.extend(resolve_inline_style(style));
            }
        }
        if self.preserve_class_names {
            if let Some(class) = class {
                attributes.insert("css-class".to_string(), class.to_string());
            }
        }
        attributes
    }
}
