//! Joint to child link relationships

use crate::document::Document;
use crate::errors::{UrdfError, span};
use crate::log::debug;
use crate::scan::{CHILD, REVOLUTE_JOINT};

/// Joint name to child link name, kept in discovery order.
///
/// Inserting a joint that is already present replaces its link but keeps its
/// position, so substitution order stays the order joints were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JointLinks {
    pairs: Vec<(String, String)>,
}

impl JointLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: impl Into<String>, link: impl Into<String>) {
        let joint = joint.into();
        let link = link.into();
        match self.pairs.iter_mut().find(|(j, _)| *j == joint) {
            Some(pair) => pair.1 = link,
            None => self.pairs.push((joint, link)),
        }
    }

    pub fn get(&self, joint: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(j, _)| j == joint)
            .map(|(_, l)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(j, l)| (j.as_str(), l.as_str()))
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Pair every revolute joint with the first child link inside it
pub fn joint_links(doc: &Document) -> Result<JointLinks, UrdfError> {
    let mut links = JointLinks::new();

    for (index, tag) in doc.tags().iter().enumerate() {
        let Some(fields) = REVOLUTE_JOINT.scan(tag) else {
            continue;
        };
        let joint = &fields[0].value;

        let child = doc
            .body(index)?
            .iter()
            .find_map(|t| CHILD.scan(t))
            .map(|f| f[0].value.clone());

        match child {
            Some(link) => {
                debug!(joint = %joint, link = %link, "joint relationship");
                links.insert(joint.clone(), link);
            }
            None => {
                return Err(UrdfError::JointWithoutChild {
                    joint: joint.clone(),
                    src: doc.named_source(),
                    span: span(&tag.span),
                });
            }
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_joints_with_their_child() {
        let doc = Document::parse(
            "<test>",
            r#"<robot name="r">
  <joint name="Null_1" type="revolute">
    <parent link="base_link"/>
    <child link="rx78_Null_001_link"/>
  </joint>
  <joint name="fixed_1" type="fixed">
    <parent link="base_link"/>
    <child link="camera"/>
  </joint>
  <joint name="Null_2" type="revolute">
    <child link="rx78_Null_002_link"/>
    <parent link="rx78_Null_001_link"/>
  </joint>
</robot>"#,
        )
        .unwrap();

        let links = joint_links(&doc).unwrap();
        let pairs: Vec<_> = links.iter().collect();
        assert_eq!(
            pairs,
            [
                ("Null_1", "rx78_Null_001_link"),
                ("Null_2", "rx78_Null_002_link")
            ]
        );
        assert_eq!(links.get("fixed_1"), None);
    }

    #[test]
    fn child_search_stops_at_the_joint_end() {
        let doc = Document::parse(
            "<test>",
            r#"<robot>
  <joint name="lonely" type="revolute">
    <parent link="base_link"/>
  </joint>
  <joint name="other" type="revolute">
    <child link="c"/>
  </joint>
</robot>"#,
        )
        .unwrap();

        let err = joint_links(&doc).unwrap_err();
        assert!(matches!(err, UrdfError::JointWithoutChild { ref joint, .. } if joint == "lonely"));
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut links = JointLinks::new();
        links.insert("a", "1");
        links.insert("b", "2");
        links.insert("a", "3");
        let pairs: Vec<_> = links.iter().collect();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
        assert_eq!(links.len(), 2);
    }
}
