//! Error types with rich diagnostics using miette
//!
//! Every error that points at the document carries the named source and a
//! span, so the CLI can show the offending tag in context.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (file path or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Scan Errors
// ============================================================================

/// Errors raised while tokenizing the markup
#[derive(Error, Diagnostic, Debug)]
pub enum ScanError {
    #[error("malformed markup: {message}")]
    #[diagnostic(code(urdf_tidy::scan::malformed))]
    Malformed {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("cannot tokenize from here")]
        span: SourceSpan,
    },
}

// ============================================================================
// Document Errors
// ============================================================================

/// Errors raised by the transformation passes and the tree printer
#[derive(Error, Diagnostic, Debug)]
pub enum UrdfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),

    #[error("<{element}> is never closed")]
    #[diagnostic(code(urdf_tidy::structure::unclosed_element))]
    UnclosedElement {
        element: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("</{found}> closes <{expected}>")]
    #[diagnostic(
        code(urdf_tidy::structure::mismatched_close),
        help("close <{expected}> before closing its parent")
    )]
    MismatchedClose {
        expected: String,
        found: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("<{expected}> opened here")]
        opened: SourceSpan,
        #[label("closed by </{found}>")]
        span: SourceSpan,
    },

    #[error("joint {joint} has no child link")]
    #[diagnostic(
        code(urdf_tidy::structure::joint_without_child),
        help("add a <child link=\"...\"/> tag inside the joint")
    )]
    JointWithoutChild {
        joint: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("joint declared here")]
        span: SourceSpan,
    },

    #[error("joint {joint} has no {role} link")]
    #[diagnostic(code(urdf_tidy::structure::missing_joint_link))]
    MissingJointLink {
        joint: String,
        role: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("joint declared here")]
        span: SourceSpan,
    },

    #[error("unknown link: {name}")]
    #[diagnostic(code(urdf_tidy::structure::unknown_link))]
    UnknownLink {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("no <link> with this name")]
        span: SourceSpan,
    },

    #[error("root link {name} not found")]
    #[diagnostic(
        code(urdf_tidy::structure::missing_root_link),
        help("the tree is printed from the link named `{name}`")
    )]
    MissingRootLink {
        name: String,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("link {name} is reached twice while walking the tree")]
    #[diagnostic(
        code(urdf_tidy::structure::link_visited_twice),
        help("a link can be the child of only one joint, and joints must not form a cycle")
    )]
    LinkVisitedTwice {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this joint leads back to {name}")]
        span: SourceSpan,
    },

    #[error("invalid number: {text:?}")]
    #[diagnostic(code(urdf_tidy::resize::invalid_number))]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected whitespace-separated numbers")]
        span: SourceSpan,
    },

    #[error("mimic refers to unknown joint {name}")]
    #[diagnostic(
        code(urdf_tidy::mimic::unknown_reference),
        help("the referenced joint must be a revolute joint with a <limit> tag")
    )]
    UnknownMimicReference {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("referenced here")]
        span: SourceSpan,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(urdf_tidy::config::invalid))]
    InvalidConfig { message: String },
}

/// Convert a byte range into a miette span
pub(crate) fn span(range: &std::ops::Range<usize>) -> SourceSpan {
    (range.start, range.end - range.start).into()
}
