//! Rescaling physical quantities

use crate::config::{Config, Quantity};
use crate::document::Document;
use crate::errors::UrdfError;
use crate::log::debug;
use crate::number::{format_number, format_numbers, parse_numbers};
use crate::scan::{MESH, TagPattern};

/// Tags whose numeric attributes scale with the model, and their dimension
const SCALED: [(TagPattern, Quantity); 5] = [
    (TagPattern::new("origin", &["xyz"]), Quantity::Length),
    (TagPattern::new("mass", &["value"]), Quantity::Mass),
    (
        TagPattern::new("inertia", &["ixx", "ixy", "ixz", "iyy", "iyz", "izz"]),
        Quantity::Inertia,
    ),
    (TagPattern::new("limit", &["effort"]), Quantity::Effort),
    (
        TagPattern::new("dynamics", &["damping", "friction"]),
        Quantity::Damping,
    ),
];

/// Scale every recognized quantity by `config.resize_scale` raised to its
/// dimension, and give every mesh a matching `scale` attribute.
pub fn resize_quantities(doc: &Document, config: &Config) -> Result<String, UrdfError> {
    let mut edits = doc.edits();

    for tag in doc.tags() {
        for (pattern, quantity) in &SCALED {
            let Some(fields) = pattern.scan_each(tag) else {
                continue;
            };
            let factor = config.factor(*quantity);
            for attribute in fields.into_iter().flatten() {
                let values: Vec<f64> = parse_numbers(doc, attribute)?
                    .into_iter()
                    .map(|v| v * factor)
                    .collect();
                edits.replace(attribute.value_span.clone(), format_numbers(&values));
            }
        }

        // Not idempotent: a mesh that already has a scale gets a second one.
        if let Some(fields) = MESH.scan(tag) {
            let s = format_number(config.resize_scale);
            edits.insert(fields[0].end(), format!(" scale=\"{s} {s} {s}\""));
        }
    }

    debug!(edits = edits.len(), scale = config.resize_scale, "resized quantities");
    Ok(edits.apply())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(source: &str, config: &Config) -> String {
        let doc = Document::parse("<test>", source).unwrap();
        resize_quantities(&doc, config).unwrap()
    }

    fn scale(s: f64) -> Config {
        Config {
            resize_scale: s,
            ..Config::default()
        }
    }

    #[test]
    fn scales_by_dimension() {
        let source = r#"<link name="l">
  <inertial>
    <origin xyz="1.0 -2.0 4.0" rpy="0.5 0 0"/>
    <mass value="3.0"/>
    <inertia ixx="1.0" ixy="0.0" ixz="0.0" iyy="2.0" iyz="0.0" izz="4.0"/>
  </inertial>
</link>"#;
        let expected = r#"<link name="l">
  <inertial>
    <origin xyz="2.0 -4.0 8.0" rpy="0.5 0 0"/>
    <mass value="24.0"/>
    <inertia ixx="32.0" ixy="0.0" ixz="0.0" iyy="64.0" iyz="0.0" izz="128.0"/>
  </inertial>
</link>"#;
        assert_eq!(resize(source, &scale(2.0)), expected);
    }

    #[test]
    fn importer_scaling_changes_inertia_and_effort() {
        let source = r#"<inertia ixx="1.0" ixy="0" ixz="0" iyy="1.0" iyz="0" izz="1.0"/>
<limit lower="-1.0" upper="1.0" effort="1.0" velocity="3.0"/>
<dynamics damping="1.0" friction="2.0"/>"#;
        let mut config = scale(2.0);
        config.use_importer_scaling = true;
        let expected = r#"<inertia ixx="8.0" ixy="0.0" ixz="0.0" iyy="8.0" iyz="0.0" izz="8.0"/>
<limit lower="-1.0" upper="1.0" effort="16.0" velocity="3.0"/>
<dynamics damping="8.0" friction="16.0"/>"#;
        assert_eq!(resize(source, &config), expected);

        config.use_importer_scaling = false;
        let resized = resize(source, &config);
        assert!(resized.contains(r#"effort="64.0""#));
        assert!(resized.contains(r#"<dynamics damping="16.0" friction="32.0"/>"#));
    }

    #[test]
    fn partial_tags_scale_what_is_there() {
        let resized = resize(r#"<dynamics damping="0.5"/>"#, &scale(2.0));
        assert_eq!(resized, r#"<dynamics damping="8.0"/>"#);
    }

    #[test]
    fn mesh_gets_a_scale_attribute() {
        let source = r#"<mesh filename="package://rx78/meshes/head.dae"/>"#;
        let once = resize(source, &Config::default());
        assert_eq!(
            once,
            r#"<mesh filename="package://rx78/meshes/head.dae" scale="0.1 0.1 0.1"/>"#
        );
        let twice = resize(&once, &Config::default());
        assert_eq!(twice.matches("scale=").count(), 2);
    }

    #[test]
    fn untagged_lines_are_unchanged() {
        let source = "<robot name=\"r\">\n  <!-- origin xyz=\"1 2 3\" -->\n  <material name=\"grey\"/>\n</robot>\n";
        assert_eq!(resize(source, &scale(3.0)), source);
    }

    #[test]
    fn malformed_number_is_fatal() {
        let doc = Document::parse("<test>", r#"<mass value="heavy"/>"#).unwrap();
        let err = resize_quantities(&doc, &Config::default()).unwrap_err();
        assert!(matches!(err, UrdfError::InvalidNumber { ref text, .. } if text == "heavy"));
    }
}
