use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Series Tags
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const CONTRAST_BOLUS_AGENT: Tag = Tag(0x0018, 0x0010);

// Acquisition Geometry Tags
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
pub const SPACING_BETWEEN_SLICES: Tag = Tag(0x0018, 0x0088);
pub const ACQUISITION_MATRIX: Tag = Tag(0x0018, 0x1310);
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);

// Pixel Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get floating point value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to f64
pub fn get_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_float64().ok())
}

/// Helper to get multi-valued floating point value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<f64>
pub fn get_multi_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<f64>> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_multi_float64().ok())
}

/// Helper to get multi-valued integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<i64>
pub fn get_multi_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<i64>> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_multi_int::<i64>().ok())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn test_tag_values() {
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
        assert_eq!(CONTRAST_BOLUS_AGENT, Tag(0x0018, 0x0010));
        assert_eq!(IMAGE_ORIENTATION_PATIENT, Tag(0x0020, 0x0037));
    }

    #[test]
    fn test_getters() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("T1 AX "),
        ));
        dcm.put(DataElement::new(
            SLICE_THICKNESS,
            VR::DS,
            PrimitiveValue::from("5.0"),
        ));
        dcm.put(DataElement::new(
            IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            PrimitiveValue::Strs(
                ["1", "0", "0", "0", "0.99", "-0.01"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        ));
        dcm.put(DataElement::new(
            ACQUISITION_MATRIX,
            VR::US,
            PrimitiveValue::U16([0, 256, 256, 0].as_slice().into()),
        ));
        dcm.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(512_u16)));

        assert_eq!(
            get_string_value(&dcm, SERIES_DESCRIPTION).as_deref(),
            Some("T1 AX")
        );
        assert_eq!(get_float_value(&dcm, SLICE_THICKNESS), Some(5.0));
        assert_eq!(
            get_multi_float_value(&dcm, IMAGE_ORIENTATION_PATIENT),
            Some(vec![1.0, 0.0, 0.0, 0.0, 0.99, -0.01])
        );
        assert_eq!(
            get_multi_int_value(&dcm, ACQUISITION_MATRIX),
            Some(vec![0, 256, 256, 0])
        );
        assert_eq!(get_u16_value(&dcm, ROWS), Some(512));
        assert_eq!(get_string_value(&dcm, CONTRAST_BOLUS_AGENT), None);
    }
}
