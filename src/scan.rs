//! Tag scanning
//!
//! Tokenizes URDF text into [`Tag`]s with byte spans and recognizes tags by
//! fixed markers ([`TagPattern`]). Nothing here builds a tree; element
//! extents are resolved by [`crate::document::Document`].

use std::ops::Range;

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::errors::{ScanError, SourceContext};
use crate::{Rule, UrdfParser};

/// Kind of markup tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `<name .../>`
    Empty,
    /// `</name>`
    Close,
}

/// A quoted attribute on a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Raw text between the quotes
    pub value: String,
    /// Byte range of the value, excluding the quotes
    pub value_span: Range<usize>,
}

impl Attribute {
    /// Byte offset right after the closing quote
    pub fn end(&self) -> usize {
        self.value_span.end + 1
    }
}

/// A single markup tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
    pub name_span: Range<usize>,
    /// Byte range of the whole tag, `<` to `>`
    pub span: Range<usize>,
    pub attributes: Vec<Attribute>,
}

impl Tag {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    /// Open or self-closing
    pub fn is_start(&self) -> bool {
        self.kind != TagKind::Close
    }
}

/// Tokenize `ctx.source` into tags; comments, declarations and text are dropped.
pub fn scan(ctx: &SourceContext) -> Result<Vec<Tag>, ScanError> {
    let pairs = UrdfParser::parse(Rule::document, &ctx.source).map_err(|e| {
        let (start, end) = match e.location {
            InputLocation::Pos(pos) => (pos, pos),
            InputLocation::Span((start, end)) => (start, end),
        };
        ScanError::Malformed {
            message: e.variant.message().into_owned(),
            src: ctx.named_source(),
            span: (start, end - start).into(),
        }
    })?;

    let mut tags = Vec::new();
    for pair in pairs {
        if pair.as_rule() != Rule::document {
            continue;
        }
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::open_tag => tags.push(parse_open_tag(inner)),
                Rule::close_tag => tags.push(parse_close_tag(inner)),
                _ => {}
            }
        }
    }
    Ok(tags)
}

fn parse_open_tag(pair: Pair<Rule>) -> Tag {
    let span = pair.as_span();
    let mut tag = Tag {
        kind: TagKind::Open,
        name: String::new(),
        name_span: 0..0,
        span: span.start()..span.end(),
        attributes: Vec::new(),
    };

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag_name => {
                let name = inner.as_span();
                tag.name = name.as_str().to_string();
                tag.name_span = name.start()..name.end();
            }
            Rule::attribute => tag.attributes.push(parse_attribute(inner)),
            Rule::self_close => tag.kind = TagKind::Empty,
            _ => {}
        }
    }
    tag
}

fn parse_close_tag(pair: Pair<Rule>) -> Tag {
    let span = pair.as_span();
    let mut tag = Tag {
        kind: TagKind::Close,
        name: String::new(),
        name_span: 0..0,
        span: span.start()..span.end(),
        attributes: Vec::new(),
    };
    if let Some(name) = pair.into_inner().find(|p| p.as_rule() == Rule::tag_name) {
        let name = name.as_span();
        tag.name = name.as_str().to_string();
        tag.name_span = name.start()..name.end();
    }
    tag
}

fn parse_attribute(pair: Pair<Rule>) -> Attribute {
    let mut attribute = Attribute {
        name: String::new(),
        value: String::new(),
        value_span: 0..0,
    };
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => attribute.name = inner.as_str().to_string(),
            Rule::dq_value | Rule::sq_value => {
                let span = inner.as_span();
                attribute.value = span.as_str().to_string();
                attribute.value_span = span.start()..span.end();
            }
            _ => {}
        }
    }
    attribute
}

// ============================================================================
// Patterns
// ============================================================================

/// Fixed markers that identify a tag: its element name, attribute values it
/// must carry, and the attributes whose values are extracted.
#[derive(Debug, Clone, Copy)]
pub struct TagPattern {
    pub element: &'static str,
    pub markers: &'static [(&'static str, &'static str)],
    pub fields: &'static [&'static str],
}

impl TagPattern {
    pub const fn new(element: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            element,
            markers: &[],
            fields,
        }
    }

    /// Element name and markers match; fields are not checked.
    pub fn matches(&self, tag: &Tag) -> bool {
        tag.is_start()
            && tag.name == self.element
            && self
                .markers
                .iter()
                .all(|(name, value)| tag.value(name) == Some(*value))
    }

    /// All fields, in pattern order. `None` when the tag does not match or a
    /// field is missing, which callers treat as "not applicable".
    pub fn scan<'t>(&self, tag: &'t Tag) -> Option<Vec<&'t Attribute>> {
        if !self.matches(tag) {
            return None;
        }
        self.fields.iter().map(|f| tag.attribute(f)).collect()
    }

    /// Each field independently, for tags whose fields are all optional.
    pub fn scan_each<'t>(&self, tag: &'t Tag) -> Option<Vec<Option<&'t Attribute>>> {
        if !self.matches(tag) {
            return None;
        }
        Some(self.fields.iter().map(|f| tag.attribute(f)).collect())
    }
}

/// `<joint name="..." type="revolute">`
pub const REVOLUTE_JOINT: TagPattern = TagPattern {
    element: "joint",
    markers: &[("type", "revolute")],
    fields: &["name"],
};
/// `<joint name="...">` of any type
pub const JOINT: TagPattern = TagPattern::new("joint", &["name"]);
pub const LINK: TagPattern = TagPattern::new("link", &["name"]);
pub const PARENT: TagPattern = TagPattern::new("parent", &["link"]);
pub const CHILD: TagPattern = TagPattern::new("child", &["link"]);
pub const LIMIT: TagPattern = TagPattern::new("limit", &["lower", "upper"]);
pub const MIMIC: TagPattern = TagPattern::new("mimic", &["joint"]);
pub const MESH: TagPattern = TagPattern::new("mesh", &["filename"]);
