//! Readable joint and link names
//!
//! Every attribute value equal to a joint name becomes `<joint>_joint`, and
//! every value equal to that joint's child link becomes `<joint>_link`.
//! Whole values are compared, so a name that happens to be a substring of
//! another identifier is left alone.

use std::borrow::Cow;

use crate::document::Document;
use crate::log::debug;
use crate::relations::JointLinks;

pub const JOINT_SUFFIX: &str = "_joint";
pub const LINK_SUFFIX: &str = "_link";

/// Rewrite identifiers throughout the document
pub fn rename_identifiers(doc: &Document, links: &JointLinks) -> String {
    let pending: Vec<_> = links
        .iter()
        .filter(|(joint, link)| {
            let tidy = is_renamed(joint, link);
            if tidy {
                debug!(joint = %joint, "already renamed");
            }
            !tidy
        })
        .collect();

    let mut edits = doc.edits();
    for attribute in doc.tags().iter().flat_map(|t| &t.attributes) {
        if let Some(renamed) = renamed_value(&attribute.value, &pending) {
            edits.replace(attribute.value_span.clone(), renamed);
        }
    }
    debug!(replacements = edits.len(), "renamed identifiers");
    edits.apply()
}

/// Apply each pair in order; a later pair sees the result of earlier ones.
fn renamed_value(value: &str, pairs: &[(&str, &str)]) -> Option<String> {
    let mut current = Cow::Borrowed(value);
    for (joint, link) in pairs {
        if current == *joint {
            current = Cow::Owned(format!("{joint}{JOINT_SUFFIX}"));
        }
        if current == *link {
            current = Cow::Owned(format!("{joint}{LINK_SUFFIX}"));
        }
    }
    (current != value).then(|| current.into_owned())
}

/// `X_joint` whose child is `X_link` was produced by an earlier run
fn is_renamed(joint: &str, link: &str) -> bool {
    joint
        .strip_suffix(JOINT_SUFFIX)
        .and_then(|base| link.strip_suffix(LINK_SUFFIX).map(|l| l == base))
        .unwrap_or(false)
}
