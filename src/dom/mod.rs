//! Document model
//!
//!     The converter works on a small owned tree rather than on the parser's own DOM. Any
//!     [HtmlParser] produces it; the html5ever-backed [Html5everParser] is the default.
//!
//!     Besides traversal the model supports the one mutation conversion needs: root
//!     normalization, which relocates the top-level nodes under a synthesized `html`/`body`
//!     pair. It also re-serializes elements, which is how an MJML document embedded in the
//!     input is passed through.

pub mod parser;

pub use parser::{Html5everParser, HtmlParser};

use crate::markup::{attributes_to_string, escape_text, Attributes};
use std::mem;

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Check whether this is an element named `name`
    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|element| element.is(name))
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_markup(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

/// An element with lowercase tag name and ordered attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into().to_ascii_lowercase(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// First descendant element (or this element) named `name`, depth-first
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.is(name) {
            return Some(self);
        }
        find_in(&self.children, name)
    }

    /// Serialize the element and its subtree
    ///
    /// Childless elements are written self-closing, which is the form MJML expects for
    /// `mj-image` and friends.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        out.push_str(&attributes_to_string(&self.attributes));
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Comment(_) => {}
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .find_map(|element| element.find(name))
}

fn collect_named<'a>(nodes: &'a [Node], name: &str, out: &mut Vec<&'a Element>) {
    for element in nodes.iter().filter_map(Node::as_element) {
        if element.is(name) {
            out.push(element);
        }
        collect_named(&element.children, name, out);
    }
}

/// A parsed document: the ordered list of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }

    /// First element named `name` anywhere in the document, depth-first
    pub fn find_element(&self, name: &str) -> Option<&Element> {
        find_in(&self.nodes, name)
    }

    pub fn contains_element(&self, name: &str) -> bool {
        self.find_element(name).is_some()
    }

    /// Every element named `name`, in document order
    pub fn elements_named(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_named(&self.nodes, name, &mut out);
        out
    }

    /// Text of every `<style>` block, in document order
    pub fn style_blocks(&self) -> Vec<String> {
        self.elements_named("style")
            .into_iter()
            .map(Element::text_content)
            .collect()
    }

    /// The top-level element named `name`, if any
    pub fn top_level(&self, name: &str) -> Option<&Element> {
        self.top_level_node(name).and_then(Node::as_element)
    }

    /// Like [Document::top_level], but returns the enclosing node
    pub fn top_level_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_element(name))
    }

    /// Ensure the document has a single top-level `html` element.
    ///
    /// An existing top-level `body` is kept and everything at the top level moves under a
    /// new `html`. Otherwise a `body` is created to hold the top-level nodes, with a
    /// top-level `head` kept beside it; top-level `title`, `style`, `meta`, `link` and
    /// `base` elements move into that `head`, which is created if needed. Returns `false` when an `html` root was already
    /// present and nothing moved.
    pub fn normalize_root(&mut self) -> bool {
        if self.top_level("html").is_some() {
            return false;
        }

        let nodes = mem::take(&mut self.nodes);
        let html = if nodes.iter().any(|node| node.is_element("body")) {
            Element::new("html").with_children(nodes)
        } else {
            let mut head: Option<Element> = None;
            let mut head_only = Vec::new();
            let mut content = Vec::with_capacity(nodes.len());
            for node in nodes {
                match node {
                    Node::Element(element) if head.is_none() && element.is("head") => {
                        head = Some(element);
                    }
                    Node::Element(element) if HEAD_ONLY.iter().any(|name| element.is(name)) => {
                        head_only.push(Node::Element(element));
                    }
                    other => content.push(other),
                }
            }
            if !head_only.is_empty() {
                head.get_or_insert_with(|| Element::new("head"))
                    .children
                    .extend(head_only);
            }
            let body = Element::new("body").with_children(content);
            let mut children: Vec<Node> = Vec::with_capacity(2);
            if let Some(head) = head {
                children.push(head.into());
            }
            children.push(body.into());
            Element::new("html").with_children(children)
        };

        self.nodes = vec![html.into()];
        true
    }

    /// Check whether keeping only `kept` would drop anything but blank text and comments.
    ///
    /// `html`/`head`/`body` wrappers and the ancestors of `kept` don't count themselves;
    /// only what they hold besides `kept`.
    pub fn has_content_outside(&self, kept: &Element) -> bool {
        content_outside(&self.nodes, kept)
    }
}

/// Elements that only make sense inside `head`
const HEAD_ONLY: [&str; 5] = ["title", "style", "meta", "link", "base"];

const SKELETON: [&str; 3] = ["html", "head", "body"];

fn content_outside(nodes: &[Node], kept: &Element) -> bool {
    nodes.iter().any(|node| match node {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Comment(_) => false,
        Node::Element(element) if std::ptr::eq(element, kept) => false,
        Node::Element(element)
            if SKELETON.iter().any(|name| element.is(name)) || holds(element, kept) =>
        {
            content_outside(&element.children, kept)
        }
        Node::Element(_) => true,
    })
}

fn holds(element: &Element, kept: &Element) -> bool {
    element
        .children
        .iter()
        .filter_map(Node::as_element)
        .any(|child| std::ptr::eq(child, kept) || holds(child, kept))
}
