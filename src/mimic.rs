//! Mimic joints: derived limits and optional fixing
//!
//! A mimic joint follows `reference * multiplier + offset`. Its limits are
//! derived from the reference joint's limits, widened by a margin so the
//! follower never clamps before the joint it mimics.

use std::collections::HashMap;

use crate::document::{Document, Edits};
use crate::errors::{UrdfError, span};
use crate::log::debug;
use crate::number::{format_number, parse_number};
use crate::scan::{LIMIT, MIMIC, REVOLUTE_JOINT, Tag};

/// Lower and upper bound of a revolute joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub lower: f64,
    pub upper: f64,
}

impl Limits {
    /// Limits of a joint mimicking one bounded by `self`.
    /// A negative multiplier inverts the range, so the bounds are reordered.
    pub fn mimicked(&self, multiplier: f64, offset: f64, margin: f64) -> Limits {
        let lower = (self.lower * multiplier + offset) * margin;
        let upper = (self.upper * multiplier + offset) * margin;
        if lower > upper {
            Limits {
                lower: upper,
                upper: lower,
            }
        } else {
            Limits { lower, upper }
        }
    }
}

/// Joint name to limits, for every revolute joint with a `<limit>`
#[derive(Debug, Clone, Default)]
pub struct JointLimits {
    limits: HashMap<String, Limits>,
}

impl JointLimits {
    pub fn get(&self, joint: &str) -> Option<Limits> {
        self.limits.get(joint).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.limits.len()
    }
}

/// Collect the first `<limit>` of every revolute joint. A missing bound reads
/// as `0.0`, the URDF default.
pub fn joint_limits(doc: &Document) -> Result<JointLimits, UrdfError> {
    let mut limits = JointLimits::default();

    for (index, tag) in doc.tags().iter().enumerate() {
        let Some(fields) = REVOLUTE_JOINT.scan(tag) else {
            continue;
        };
        let Some(limit) = doc.body(index)?.iter().find(|t| LIMIT.matches(t)) else {
            continue;
        };
        let bounds = read_limits(doc, limit)?;
        limits.limits.insert(fields[0].value.clone(), bounds);
    }

    debug!(joints = limits.len(), "collected joint limits");
    Ok(limits)
}

fn read_limits(doc: &Document, limit: &Tag) -> Result<Limits, UrdfError> {
    let bound = |name| match limit.attribute(name) {
        Some(attr) => parse_number(doc, attr),
        None => Ok(0.0),
    };
    Ok(Limits {
        lower: bound("lower")?,
        upper: bound("upper")?,
    })
}

/// Rewrite the limits of every mimic joint from the limits of the joint it
/// mimics. A mimic joint whose `<limit>` does not come before its `<mimic>`
/// is left as it is.
pub fn adjust_mimic_limits(
    doc: &Document,
    limits: &JointLimits,
    margin: f64,
) -> Result<String, UrdfError> {
    let mut edits = doc.edits();

    for (index, tag) in doc.tags().iter().enumerate() {
        let Some(fields) = REVOLUTE_JOINT.scan(tag) else {
            continue;
        };
        let joint = &fields[0].value;

        let mut limit: Option<&Tag> = None;
        for inner in doc.body(index)? {
            if LIMIT.matches(inner) {
                limit = Some(inner);
                continue;
            }
            let Some(mimic) = MIMIC.scan(inner) else {
                continue;
            };
            let Some(limit) = limit else {
                debug!(joint = %joint, "no limit before mimic, skipping");
                break;
            };

            let reference = mimic[0];
            let multiplier = match inner.attribute("multiplier") {
                Some(attr) => parse_number(doc, attr)?,
                None => 1.0,
            };
            let offset = match inner.attribute("offset") {
                Some(attr) => parse_number(doc, attr)?,
                None => 0.0,
            };
            let bounds = limits
                .get(&reference.value)
                .ok_or_else(|| UrdfError::UnknownMimicReference {
                    name: reference.value.clone(),
                    src: doc.named_source(),
                    span: span(&reference.value_span),
                })?
                .mimicked(multiplier, offset, margin);

            debug!(
                joint = %joint,
                reference = %reference.value,
                lower = bounds.lower,
                upper = bounds.upper,
                "derived mimic limits"
            );
            write_bound(&mut edits, limit, "lower", bounds.lower);
            write_bound(&mut edits, limit, "upper", bounds.upper);
            break;
        }
    }

    Ok(edits.apply())
}

fn write_bound(edits: &mut Edits<'_>, limit: &Tag, name: &str, value: f64) {
    let value = format_number(value);
    match limit.attribute(name) {
        Some(attr) => edits.replace(attr.value_span.clone(), value),
        None => edits.insert(limit.name_span.end, format!(" {name}=\"{value}\"")),
    }
}

/// Turn every revolute joint that carries a `<mimic>` into a fixed joint
pub fn fix_mimic_joints(doc: &Document) -> Result<String, UrdfError> {
    let mut edits = doc.edits();

    for (index, tag) in doc.tags().iter().enumerate() {
        if REVOLUTE_JOINT.scan(tag).is_none() {
            continue;
        }
        if !doc.body(index)?.iter().any(|t| MIMIC.matches(t)) {
            continue;
        }
        if let Some(kind) = tag.attribute("type") {
            debug!(joint = ?tag.value("name"), "fixing mimic joint");
            edits.replace(kind.value_span.clone(), "fixed");
        }
    }

    Ok(edits.apply())
}
