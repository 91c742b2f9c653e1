//! Numeric attribute values

use crate::document::Document;
use crate::errors::{UrdfError, span};
use crate::scan::Attribute;

/// Parse a whitespace-separated list of numbers
pub(crate) fn parse_numbers(doc: &Document, attr: &Attribute) -> Result<Vec<f64>, UrdfError> {
    let values = attr
        .value
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(doc, attr))?;
    if values.is_empty() {
        return Err(invalid(doc, attr));
    }
    Ok(values)
}

/// Parse a single number
pub(crate) fn parse_number(doc: &Document, attr: &Attribute) -> Result<f64, UrdfError> {
    attr.value.trim().parse().map_err(|_| invalid(doc, attr))
}

/// Shortest text that reads back to the same `f64`, always with a decimal
/// point or an exponent (`1.0`, `0.05`, `1e-7`).
pub fn format_number(value: f64) -> String {
    format!("{value:?}")
}

pub(crate) fn format_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn invalid(doc: &Document, attr: &Attribute) -> UrdfError {
    UrdfError::InvalidNumber {
        text: attr.value.clone(),
        src: doc.named_source(),
        span: span(&attr.value_span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_round_trip_repr() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(0.05), "0.05");
        assert_eq!(format_number(-0.625), "-0.625");
        assert_eq!(format_numbers(&[0.0, 1.5, -2.0]), "0.0 1.5 -2.0");
    }

    #[test]
    fn rejects_non_numeric_text() {
        let doc = Document::parse("<test>", r#"<origin xyz="0 abc 1" rpy=""/>"#).unwrap();
        let tag = &doc.tags()[0];
        let err = parse_numbers(&doc, tag.attribute("xyz").unwrap()).unwrap_err();
        assert!(matches!(err, UrdfError::InvalidNumber { ref text, .. } if text == "0 abc 1"));
        assert!(parse_numbers(&doc, tag.attribute("rpy").unwrap()).is_err());
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let doc = Document::parse("<test>", r#"<origin xyz=" 1  2 3 "/>"#).unwrap();
        let values = parse_numbers(&doc, doc.tags()[0].attribute("xyz").unwrap()).unwrap();
        assert_eq!(values, [1.0, 2.0, 3.0]);
    }
}
