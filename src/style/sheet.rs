//! `<style>` block resolution
//!
//! Blocks are tokenized with `cssparser`. Only plain style rules contribute, and only
//! through selectors that are a single class (`.name`). At-rules are skipped whole, so
//! `@media` and `@font-face` blocks neither contribute nor fail the block.

use super::inline::strip_important;
use super::properties::mjml_attribute_for;
use super::StyleMap;
use crate::error::StyleError;
use crate::markup::Attributes;
use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.(-?[_a-zA-Z][_a-zA-Z0-9-]*)$").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Resolve a stylesheet into a class-name → attributes map.
///
/// Any syntax error fails the whole block; callers are expected to treat that as an
/// empty contribution.
pub fn resolve_style_block(css: &str) -> Result<StyleMap, StyleError> {
    let mut map = StyleMap::default();
    for rule in parse_rules(css)? {
        let attributes = resolve_declarations(&rule.declarations);
        for selector in rule.selectors.split(',') {
            if let Some(class) = class_selector(selector) {
                map.assign(class, &attributes);
            }
        }
    }
    Ok(map)
}

/// The class name of a single class selector, if that is what `selector` is
pub fn class_selector(selector: &str) -> Option<&str> {
    CLASS_SELECTOR
        .captures(selector.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn resolve_declarations(declarations: &[(String, String)]) -> Attributes {
    let mut attributes = Attributes::new();
    for (property, value) in declarations {
        if let Some(name) = mjml_attribute_for(property) {
            attributes.insert(name.to_string(), value.clone());
        }
    }
    attributes
}

struct StyleRule {
    selectors: String,
    declarations: Vec<(String, String)>,
}

enum SheetItem {
    Style(StyleRule),
    Skipped,
}

fn parse_rules(css: &str) -> Result<Vec<StyleRule>, StyleError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules_parser = SheetRules;
    let mut rules = Vec::new();

    for item in StyleSheetParser::new(&mut parser, &mut rules_parser) {
        match item {
            Ok(SheetItem::Style(rule)) => rules.push(rule),
            Ok(SheetItem::Skipped) => {}
            Err((error, slice)) => {
                return Err(StyleError {
                    line: error.location.line + 1,
                    column: error.location.column,
                    reason: format!("unexpected input near `{}`", slice.trim()),
                });
            }
        }
    }
    Ok(rules)
}

/// Consume whatever is left in the current block and return its source text, minus comments
fn rest_of_block(input: &mut Parser<'_, '_>) -> String {
    let start = input.position();
    while input.next().is_ok() {}
    COMMENT
        .replace_all(input.slice_from(start), "")
        .trim()
        .to_string()
}

struct SheetRules;

impl<'i> QualifiedRuleParser<'i> for SheetRules {
    type Prelude = String;
    type QualifiedRule = SheetItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(rest_of_block(input))
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut collector = DeclarationCollector;
        let mut declarations = Vec::new();
        for item in RuleBodyParser::new(input, &mut collector) {
            match item {
                Ok(Some(declaration)) => declarations.push(declaration),
                Ok(None) => {}
                Err((error, _)) => return Err(error),
            }
        }
        Ok(SheetItem::Style(StyleRule {
            selectors,
            declarations,
        }))
    }
}

impl<'i> AtRuleParser<'i> for SheetRules {
    type Prelude = ();
    type AtRule = SheetItem;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        rest_of_block(input);
        Ok(())
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(SheetItem::Skipped)
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        rest_of_block(input);
        Ok(SheetItem::Skipped)
    }
}

type Declaration = Option<(String, String)>;

struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let raw = rest_of_block(input);
        let value = strip_important(&raw);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some((name.to_ascii_lowercase(), value.to_string())))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
