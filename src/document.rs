//! A scanned URDF document
//!
//! The text is never reflowed: passes collect [`Edits`] against byte spans of
//! the scanned source and splice them in one go, so every line that no edit
//! touches comes out byte-identical.

use std::ops::Range;

use miette::NamedSource;

use crate::errors::{SourceContext, UrdfError, span};
use crate::log::debug;
use crate::scan::{Tag, TagKind, scan};

#[derive(Debug, Clone)]
pub struct Document {
    context: SourceContext,
    tags: Vec<Tag>,
}

impl Document {
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self, UrdfError> {
        let context = SourceContext::new(name, source);
        let tags = scan(&context)?;
        debug!(name = %context.name, tags = tags.len(), "scanned document");
        Ok(Self { context, tags })
    }

    pub fn source(&self) -> &str {
        &self.context.source
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    pub fn named_source(&self) -> NamedSource<String> {
        self.context.named_source()
    }

    /// Index of the tag closing the element started at `index`.
    /// A self-closing tag is its own end. Every close tag on the way must
    /// match the innermost open element.
    pub fn element_end(&self, index: usize) -> Result<usize, UrdfError> {
        let start = &self.tags[index];
        if start.kind == TagKind::Empty {
            return Ok(index);
        }

        let mut open = vec![start];
        for (i, tag) in self.tags.iter().enumerate().skip(index + 1) {
            match tag.kind {
                TagKind::Open => open.push(tag),
                TagKind::Empty => {}
                TagKind::Close => {
                    let Some(innermost) = open.pop() else {
                        break;
                    };
                    if innermost.name != tag.name {
                        return Err(UrdfError::MismatchedClose {
                            expected: innermost.name.clone(),
                            found: tag.name.clone(),
                            src: self.named_source(),
                            opened: span(&innermost.span),
                            span: span(&tag.span),
                        });
                    }
                    if open.is_empty() {
                        return Ok(i);
                    }
                }
            }
        }

        Err(UrdfError::UnclosedElement {
            element: start.name.clone(),
            src: self.named_source(),
            span: span(&start.span),
        })
    }

    /// Tags strictly inside the element started at `index`
    pub fn body(&self, index: usize) -> Result<&[Tag], UrdfError> {
        let end = self.element_end(index)?;
        Ok(&self.tags[(index + 1).min(end)..end])
    }

    /// Index of the first start tag, normally `<robot>`
    pub fn root(&self) -> Option<usize> {
        self.tags.iter().position(Tag::is_start)
    }

    /// Indices of the start tags directly inside the element at `index`
    pub fn children(&self, index: usize) -> Result<Vec<usize>, UrdfError> {
        let end = self.element_end(index)?;
        let mut children = Vec::new();
        let mut i = index + 1;
        while i < end {
            if self.tags[i].is_start() {
                children.push(i);
                i = self.element_end(i)?;
            }
            i += 1;
        }
        Ok(children)
    }

    pub fn edits(&self) -> Edits<'_> {
        Edits {
            source: self.source(),
            edits: Vec::new(),
        }
    }
}

/// Pending byte-span replacements against a document's source
#[derive(Debug)]
pub struct Edits<'d> {
    source: &'d str,
    edits: Vec<(Range<usize>, String)>,
}

impl Edits<'_> {
    /// Replace `range`. A second replacement of the same range wins.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        let text = text.into();
        match self.edits.iter_mut().find(|(r, _)| *r == range && !r.is_empty()) {
            Some(edit) => edit.1 = text,
            None => self.edits.push((range, text)),
        }
    }

    /// Insert `text` at byte offset `at`
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.edits.push((at..at, text.into()));
    }

    pub(crate) fn len(&self) -> usize {
        self.edits.len()
    }

    /// Splice every edit into the source
    pub fn apply(mut self) -> String {
        self.edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (range, text) in self.edits {
            if range.start < cursor {
                debug!(?range, "dropping overlapping edit");
                continue;
            }
            out.push_str(&self.source[cursor..range.start]);
            out.push_str(&text);
            cursor = range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
