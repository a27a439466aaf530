//! HTML parsing
//!
//! html5ever always builds a full `html`/`head`/`body` skeleton, even for a bare fragment.
//! The adapter undoes that: synthesized wrappers are dissolved into their children so the
//! resulting [Document] only holds the structure the author actually wrote.
//!
//! The tree builder also ignores `/>` on tags it does not know, so `<mj-image />` would
//! swallow its following siblings. Self-closing MJML tags are expanded to an explicit
//! end tag before parsing. Comments and `script`/`style` text are left alone by both steps.

use super::{Document, Element, Node};
use crate::error::ConvertError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Default input limit (5MB)
pub const MAX_INPUT_BYTES: usize = 5_000_000;

/// Comments and raw-text elements; unterminated spans run to the end of input
const OPAQUE_SPANS: &str = r"<!--.*?(?:-->|\z)|<script\b[^>]*>.*?(?:</script\s*>|\z)|<style\b[^>]*>.*?(?:</style\s*>|\z)";

static OPAQUE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("(?is){}", OPAQUE_SPANS)).unwrap());
static SELF_CLOSING_MJML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?is)(?P<opaque>{})|<(?P<tag>mjml|mj-[a-z0-9-]+)(?P<attrs>(?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*/>"#,
        OPAQUE_SPANS
    ))
    .unwrap()
});
static EXPLICIT_HTML: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html[\s>/]").unwrap());
static EXPLICIT_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<head[\s>/]").unwrap());
static EXPLICIT_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<body[\s>/]").unwrap());

/// Turns HTML text into a [Document]
pub trait HtmlParser: Send + Sync {
    /// Parse `source`; fails only when the input cannot be accepted at all
    fn parse(&self, source: &str) -> Result<Document, ConvertError>;
}

/// [HtmlParser] backed by html5ever's WHATWG tree builder
#[derive(Debug, Clone)]
pub struct Html5everParser {
    max_input_bytes: usize,
}

impl Html5everParser {
    pub fn new() -> Self {
        Html5everParser {
            max_input_bytes: MAX_INPUT_BYTES,
        }
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    fn check_input(&self, source: &str) -> Result<(), ConvertError> {
        if source.len() > self.max_input_bytes {
            return Err(ConvertError::MalformedInput(format!(
                "input is {} bytes, limit is {} bytes",
                source.len(),
                self.max_input_bytes
            )));
        }
        if let Some(offset) = source.find('\0') {
            return Err(ConvertError::MalformedInput(format!(
                "input contains a NUL byte at offset {}",
                offset
            )));
        }
        Ok(())
    }
}

impl Default for Html5everParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlParser for Html5everParser {
    fn parse(&self, source: &str) -> Result<Document, ConvertError> {
        self.check_input(source)?;

        let prepared = expand_self_closing_mjml(source);
        let dom = parse_document(RcDom::default(), Default::default()).one(&*prepared);

        Ok(Document::new(top_level_nodes(&dom.document, &Written::scan(source))))
    }
}

/// Rewrite `<mj-x ... />` as `<mj-x ...></mj-x>` outside comments and raw text
pub fn expand_self_closing_mjml(source: &str) -> Cow<'_, str> {
    SELF_CLOSING_MJML.replace_all(source, |caps: &Captures<'_>| {
        if let Some(opaque) = caps.name("opaque") {
            return opaque.as_str().to_string();
        }
        let tag = &caps["tag"];
        format!("<{}{}></{}>", tag, &caps["attrs"], tag)
    })
}

/// Which skeleton elements appear in the source text
struct Written {
    html: bool,
    head: bool,
    body: bool,
}

impl Written {
    fn scan(source: &str) -> Self {
        let structure = OPAQUE.replace_all(source, "");
        Written {
            html: EXPLICIT_HTML.is_match(&structure),
            head: EXPLICIT_HEAD.is_match(&structure),
            body: EXPLICIT_BODY.is_match(&structure),
        }
    }
}

fn top_level_nodes(document: &Handle, written: &Written) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in document.children.borrow().iter() {
        if written.html || element_name(child) != Some("html") {
            nodes.extend(convert_node(child));
            continue;
        }
        for part in child.children.borrow().iter() {
            match element_name(part) {
                Some("head") if !written.head => nodes.extend(convert_children(part)),
                Some("body") if !written.body => nodes.extend(convert_children(part)),
                _ => nodes.extend(convert_node(part)),
            }
        }
    }
    nodes
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(&*name.local);
            for attr in attrs.borrow().iter() {
                element
                    .attributes
                    .insert(attr.name.local.to_string(), attr.value.to_string());
            }
            element.children = convert_children(handle);
            Some(Node::Element(element))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        _ => None,
    }
}
