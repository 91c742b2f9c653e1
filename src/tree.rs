//! Kinematic tree printing
//!
//! The printed tree hides fixed and mimic joints: such a joint is not listed
//! and its subtree stays at the joint's own depth, so only independently
//! actuated joints add indentation.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use crate::document::Document;
use crate::errors::{SourceContext, UrdfError, span};
use crate::log::debug;
use crate::scan::{CHILD, JOINT, LINK, PARENT, Tag};

/// Index of a link in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joint {
    pub name: String,
    pub parent: LinkId,
    pub child: LinkId,
    span: Range<usize>,
}

/// Links and joints of a robot, in document order
#[derive(Debug, Clone)]
pub struct KinematicTree {
    context: SourceContext,
    links: Vec<Link>,
    joints: Vec<Joint>,
    /// Child links of fixed and mimic joints
    ignored: HashSet<LinkId>,
}

/// A joint reference before links are resolved
struct PendingJoint {
    name: String,
    span: Range<usize>,
    parent: Option<(String, Range<usize>)>,
    child: Option<(String, Range<usize>)>,
    ignored: bool,
}

impl KinematicTree {
    /// Read the `<link>` and `<joint>` declarations directly under the root element
    pub fn from_document(doc: &Document) -> Result<Self, UrdfError> {
        let mut links = Vec::new();
        let mut pending = Vec::new();

        let declarations = match doc.root() {
            Some(root) => doc.children(root)?,
            None => Vec::new(),
        };
        for index in declarations {
            let tag = &doc.tags()[index];
            if let Some(fields) = LINK.scan(tag) {
                links.push(Link {
                    name: fields[0].value.clone(),
                });
            } else if let Some(fields) = JOINT.scan(tag) {
                pending.push(read_joint(doc, index, tag, fields[0].value.clone())?);
            }
        }

        let mut tree = Self {
            context: doc.context().clone(),
            links,
            joints: Vec::new(),
            ignored: HashSet::new(),
        };

        for joint in pending {
            let parent = tree.resolve(&joint, joint.parent.as_ref(), "parent")?;
            let child = tree.resolve(&joint, joint.child.as_ref(), "child")?;
            if joint.ignored {
                tree.ignored.insert(child);
            }
            tree.joints.push(Joint {
                name: joint.name,
                parent,
                child,
                span: joint.span,
            });
        }

        debug!(
            links = tree.links.len(),
            joints = tree.joints.len(),
            ignored = tree.ignored.len(),
            "built kinematic tree"
        );
        Ok(tree)
    }

    fn resolve(
        &self,
        joint: &PendingJoint,
        link: Option<&(String, Range<usize>)>,
        role: &'static str,
    ) -> Result<LinkId, UrdfError> {
        let Some((name, range)) = link else {
            return Err(UrdfError::MissingJointLink {
                joint: joint.name.clone(),
                role,
                src: self.context.named_source(),
                span: span(&joint.span),
            });
        };
        self.link_id(name).ok_or_else(|| UrdfError::UnknownLink {
            name: name.clone(),
            src: self.context.named_source(),
            span: span(range),
        })
    }

    /// First link declared with `name`
    pub fn link_id(&self, name: &str) -> Option<LinkId> {
        self.links.iter().position(|l| l.name == name).map(LinkId)
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Whether the joint leading to `link` is hidden from the listing
    pub fn is_ignored(&self, link: LinkId) -> bool {
        self.ignored.contains(&link)
    }

    /// Walk depth-first from `root`, visiting joints in document order
    pub fn listing(&self, root: &str) -> Result<TreeListing, UrdfError> {
        let root = self
            .link_id(root)
            .ok_or_else(|| UrdfError::MissingRootLink {
                name: root.to_string(),
                src: self.context.named_source(),
            })?;

        let mut outgoing = vec![Vec::new(); self.links.len()];
        for (index, joint) in self.joints.iter().enumerate() {
            outgoing[joint.parent.0].push(index);
        }

        let mut visited = vec![false; self.links.len()];
        visited[root.0] = true;

        // (joint, depth); pushed in reverse so joints pop in document order
        let mut stack: Vec<(usize, usize)> = outgoing[root.0].iter().rev().map(|&j| (j, 0)).collect();
        let mut lines = Vec::new();

        while let Some((index, depth)) = stack.pop() {
            let joint = &self.joints[index];
            if visited[joint.child.0] {
                return Err(UrdfError::LinkVisitedTwice {
                    name: self.link(joint.child).name.clone(),
                    src: self.context.named_source(),
                    span: span(&joint.span),
                });
            }
            visited[joint.child.0] = true;

            let printed = !self.is_ignored(joint.child);
            if printed {
                lines.push(TreeLine {
                    depth,
                    joint: joint.name.clone(),
                });
            }
            let next = depth + usize::from(printed);
            stack.extend(outgoing[joint.child.0].iter().rev().map(|&j| (j, next)));
        }

        Ok(TreeListing { lines })
    }
}

fn read_joint(
    doc: &Document,
    index: usize,
    tag: &Tag,
    name: String,
) -> Result<PendingJoint, UrdfError> {
    let mut joint = PendingJoint {
        name,
        span: tag.span.clone(),
        parent: None,
        child: None,
        ignored: tag.value("type") == Some("fixed"),
    };

    for inner in doc.body(index)? {
        if let Some(fields) = PARENT.scan(inner) {
            joint.parent = Some((fields[0].value.clone(), fields[0].value_span.clone()));
        } else if let Some(fields) = CHILD.scan(inner) {
            joint.child = Some((fields[0].value.clone(), fields[0].value_span.clone()));
        } else if inner.is_start() && inner.name == "mimic" {
            joint.ignored = true;
        }
    }
    Ok(joint)
}

/// One printed joint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub joint: String,
}

/// Printed joints in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub lines: Vec<TreeLine>,
}

impl fmt::Display for TreeListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}{}", "-".repeat(line.depth), line.joint)?;
        }
        Ok(())
    }
}
