//! Tag extraction from representative slices

pub mod rules;
pub mod tags;

pub use rules::{default_tag_rules, TagRule, ValueKind, ValueTransform};
pub use tags::*;

use crate::error::Result;
use crate::types::{TagTable, TagValue};
use dicom_object::{open_file, InMemDicomObject};
use log::debug;
use std::path::Path;

/// Reads the tags listed in `rules` from one DICOM file
///
/// # Errors
///
/// Returns [`crate::MrseqError::DicomError`] if the file cannot be opened or parsed.
/// Missing or unreadable tags are not errors; they are left out of the table.
pub fn extract_tags(path: &Path, rules: &[TagRule]) -> Result<TagTable> {
    debug!("Reading tags from {}", path.display());
    let obj = open_file(path)?;
    Ok(extract_from_object(&obj, rules))
}

/// Reads the tags listed in `rules` from an in-memory object
pub fn extract_from_object(dcm: &InMemDicomObject, rules: &[TagRule]) -> TagTable {
    let mut table = TagTable::new();
    for rule in rules {
        if let Some(value) = read_value(dcm, rule) {
            table.insert(rule.tag, rule.name, rule.transform.apply(value));
        }
    }
    table
}

fn read_value(dcm: &InMemDicomObject, rule: &TagRule) -> Option<TagValue> {
    match rule.kind {
        ValueKind::Text => get_string_value(dcm, rule.tag)
            .filter(|s| !s.is_empty())
            .map(TagValue::Text),
        ValueKind::Decimal => get_float_value(dcm, rule.tag).map(TagValue::Decimal),
        ValueKind::Integers => get_multi_int_value(dcm, rule.tag)
            .filter(|v| !v.is_empty())
            .map(TagValue::Integers),
        ValueKind::Decimals => get_multi_float_value(dcm, rule.tag)
            .filter(|v| !v.is_empty())
            .map(TagValue::Decimals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn strs(values: &[&str]) -> PrimitiveValue {
        PrimitiveValue::Strs(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_extract_from_object() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("T1 AX C"),
        ));
        dcm.put(DataElement::new(
            CONTRAST_BOLUS_AGENT,
            VR::LO,
            PrimitiveValue::from("GADOVIST"),
        ));
        dcm.put(DataElement::new(
            SLICE_THICKNESS,
            VR::DS,
            PrimitiveValue::from("5"),
        ));
        dcm.put(DataElement::new(
            IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            strs(&["0.9998", "0.01", "0", "-0.01", "0.9997", "0.02"]),
        ));

        let table = extract_from_object(&dcm, &default_tag_rules());

        assert_eq!(
            table.get(SERIES_DESCRIPTION).and_then(TagValue::as_text),
            Some("T1 AX C")
        );
        assert_eq!(table.get(CONTRAST_BOLUS_AGENT), Some(&TagValue::Integer(1)));
        assert_eq!(table.get(SLICE_THICKNESS), Some(&TagValue::Decimal(5.0)));
        assert_eq!(
            table
                .get(IMAGE_ORIENTATION_PATIENT)
                .and_then(TagValue::as_integers),
            Some([1, 0, 0, 0, 1, 0].as_slice())
        );
        assert!(!table.contains(SPACING_BETWEEN_SLICES));
        assert!(!table.contains(ACQUISITION_MATRIX));
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from(""),
        ));
        dcm.put(DataElement::new(
            IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            PrimitiveValue::Empty,
        ));

        let table = extract_from_object(&dcm, &default_tag_rules());
        assert!(table.is_empty());
    }

    #[test]
    fn test_extract_tags_missing_file() {
        let result = extract_tags(Path::new("/nonexistent/file.dcm"), &default_tag_rules());
        assert!(result.is_err());
    }
}
