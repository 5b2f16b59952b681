use crate::extraction::tags::{
    ACQUISITION_MATRIX, CONTRAST_BOLUS_AGENT, IMAGE_ORIENTATION_PATIENT, SERIES_DESCRIPTION,
    SLICE_THICKNESS, SPACING_BETWEEN_SLICES,
};
use crate::types::TagValue;
use dicom_core::Tag;

/// How a tag's raw value is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Decimal,
    Integers,
    Decimals,
}

/// Normalization applied to a value after it has been read
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueTransform {
    /// Value is stored as read
    None,
    /// Every decimal component is rounded to the nearest integer (ties to even)
    Round,
    /// Value is replaced by a constant, recording only that the tag is present
    Constant(i64),
}

impl ValueTransform {
    /// Applies the transform to a value read from the file
    pub fn apply(&self, value: TagValue) -> TagValue {
        match (self, value) {
            (ValueTransform::None, value) => value,
            (ValueTransform::Constant(c), _) => TagValue::Integer(*c),
            (ValueTransform::Round, TagValue::Decimal(d)) => {
                TagValue::Integer(d.round_ties_even() as i64)
            }
            (ValueTransform::Round, TagValue::Decimals(v)) => TagValue::Integers(
                v.into_iter().map(|d| d.round_ties_even() as i64).collect(),
            ),
            (ValueTransform::Round, value) => value,
        }
    }
}

/// One tag of interest: where to read it, what to call it, how to normalize it
#[derive(Debug, Clone, PartialEq)]
pub struct TagRule {
    pub tag: Tag,
    pub name: &'static str,
    pub kind: ValueKind,
    pub transform: ValueTransform,
}

impl TagRule {
    pub const fn new(
        tag: Tag,
        name: &'static str,
        kind: ValueKind,
        transform: ValueTransform,
    ) -> Self {
        Self {
            tag,
            name,
            kind,
            transform,
        }
    }
}

/// Free-text agent names only matter as a presence flag.
pub const CONTRAST_PRESENT: ValueTransform = ValueTransform::Constant(1);

/// Returns the tags read from the representative slice of every series
pub fn default_tag_rules() -> Vec<TagRule> {
    vec![
        TagRule::new(
            SERIES_DESCRIPTION,
            "Series Description",
            ValueKind::Text,
            ValueTransform::None,
        ),
        TagRule::new(
            CONTRAST_BOLUS_AGENT,
            "Contrast/Bolus Agent",
            ValueKind::Text,
            CONTRAST_PRESENT,
        ),
        TagRule::new(
            SLICE_THICKNESS,
            "Slice Thickness",
            ValueKind::Decimal,
            ValueTransform::None,
        ),
        TagRule::new(
            SPACING_BETWEEN_SLICES,
            "Spacing Between Slices",
            ValueKind::Decimal,
            ValueTransform::None,
        ),
        TagRule::new(
            ACQUISITION_MATRIX,
            "Acquisition Matrix",
            ValueKind::Integers,
            ValueTransform::None,
        ),
        TagRule::new(
            IMAGE_ORIENTATION_PATIENT,
            "Image Orientation (Patient)",
            ValueKind::Decimals,
            ValueTransform::Round,
        ),
    ]
}
