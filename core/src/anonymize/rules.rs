use dicom_core::Tag;
use dicom_dictionary_std::tags;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Specifies the action to perform on a DICOM data element during anonymization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "lowercase")]
pub enum Action {
    /// Leave the data element unchanged.
    Keep,

    /// Completely remove the data element from the dataset.
    Remove,

    /// Replace the data element value with the specified string, keeping its VR.
    Replace(String),
}

/// Identifying tags that are deleted outright
pub const DELETE_TAGS: [Tag; 7] = [
    tags::PATIENT_BIRTH_DATE,
    tags::REFERRING_PHYSICIAN_NAME,
    tags::PATIENT_ADDRESS,
    tags::PATIENT_WEIGHT,
    tags::STUDY_DATE,
    tags::STUDY_TIME,
    tags::INSTITUTION_ADDRESS,
];

/// Tags rewritten to the new identity
pub const IDENTITY_TAGS: [Tag; 2] = [tags::PATIENT_NAME, tags::PATIENT_ID];

/// Identifying attributes listed explicitly in the rule map, all starting out as
/// [`Action::Keep`]
///
/// This is a subset of the DICOM basic de-identification profile, not the full attribute
/// list. It only affects the serialized map: tags outside it are kept anyway.
pub const KNOWN_TAGS: &[Tag] = &[
    tags::ACCESSION_NUMBER,
    tags::ACQUISITION_COMMENTS,
    tags::ACQUISITION_DATE,
    tags::ACQUISITION_DATE_TIME,
    tags::ACQUISITION_TIME,
    tags::ADDITIONAL_PATIENT_HISTORY,
    tags::ADMISSION_ID,
    tags::ADMITTING_DIAGNOSES_DESCRIPTION,
    tags::ALLERGIES,
    tags::BRANCH_OF_SERVICE,
    tags::CONTENT_DATE,
    tags::CONTENT_TIME,
    tags::CONTRAST_BOLUS_AGENT,
    tags::COUNTRY_OF_RESIDENCE,
    tags::CURRENT_PATIENT_LOCATION,
    tags::DERIVATION_DESCRIPTION,
    tags::DEVICE_SERIAL_NUMBER,
    tags::DEVICE_UID,
    tags::ETHNIC_GROUP,
    tags::FRAME_OF_REFERENCE_UID,
    tags::IMAGE_COMMENTS,
    tags::INSTANCE_CREATION_DATE,
    tags::INSTANCE_CREATION_TIME,
    tags::INSTANCE_CREATOR_UID,
    tags::INSTITUTION_ADDRESS,
    tags::INSTITUTION_NAME,
    tags::INSTITUTIONAL_DEPARTMENT_NAME,
    tags::MEDICAL_ALERTS,
    tags::MEDICAL_RECORD_LOCATOR,
    tags::OCCUPATION,
    tags::OPERATORS_NAME,
    tags::OTHER_PATIENT_I_DS,
    tags::OTHER_PATIENT_NAMES,
    tags::PATIENT_ADDRESS,
    tags::PATIENT_AGE,
    tags::PATIENT_BIRTH_DATE,
    tags::PATIENT_BIRTH_NAME,
    tags::PATIENT_BIRTH_TIME,
    tags::PATIENT_COMMENTS,
    tags::PATIENT_ID,
    tags::PATIENT_MOTHER_BIRTH_NAME,
    tags::PATIENT_NAME,
    tags::PATIENT_SEX,
    tags::PATIENT_SIZE,
    tags::PATIENT_TELEPHONE_NUMBERS,
    tags::PATIENT_WEIGHT,
    tags::PERFORMING_PHYSICIAN_NAME,
    tags::PHYSICIANS_OF_RECORD,
    tags::PROTOCOL_NAME,
    tags::REFERRING_PHYSICIAN_ADDRESS,
    tags::REFERRING_PHYSICIAN_NAME,
    tags::REFERRING_PHYSICIAN_TELEPHONE_NUMBERS,
    tags::REQUEST_ATTRIBUTES_SEQUENCE,
    tags::REQUESTING_PHYSICIAN,
    tags::SERIES_DATE,
    tags::SERIES_DESCRIPTION,
    tags::SERIES_INSTANCE_UID,
    tags::SERIES_TIME,
    tags::SOP_INSTANCE_UID,
    tags::STATION_NAME,
    tags::STUDY_COMMENTS,
    tags::STUDY_DATE,
    tags::STUDY_DESCRIPTION,
    tags::STUDY_ID,
    tags::STUDY_INSTANCE_UID,
    tags::STUDY_TIME,
];

/// Mapping from tag to anonymization action
///
/// Tags that are not in the map are kept, except private tags which are always removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagActionMap(BTreeMap<Tag, Action>);

impl TagActionMap {
    pub fn new() -> Self {
        TagActionMap(BTreeMap::new())
    }

    pub fn insert(&mut self, tag: Tag, action: Action) -> Option<Action> {
        self.0.insert(tag, action)
    }

    pub fn get(&self, tag: &Tag) -> Option<&Action> {
        self.0.get(tag)
    }

    /// Effective action for a tag found in a dataset
    pub fn get_action(&self, tag: &Tag) -> &Action {
        match self.0.get(tag) {
            _ if is_private_tag(tag) => &Action::Remove,
            Some(action) => action,
            None => &Action::Keep,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Action)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TagActionMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (tag, action) in &self.0 {
            map.serialize_entry(&format!("{:04X}{:04X}", tag.group(), tag.element()), action)?;
        }
        map.end()
    }
}

pub(crate) fn is_private_tag(tag: &Tag) -> bool {
    // tags with odd group numbers are private tags
    tag.group() % 2 != 0
}

/// Builds a [`TagActionMap`] in three phases, each overriding the previous one:
/// keep every known tag, remove the identifying tags, then replace the identity.
///
/// # Example
///
/// ```
/// use mrseq_core::anonymize::{Action, RuleMapBuilder};
/// use dicom_dictionary_std::tags;
///
/// let map = RuleMapBuilder::new().identity("ANON001").build();
/// assert_eq!(map.get(&tags::PATIENT_NAME), Some(&Action::Replace("ANON001".into())));
/// assert_eq!(map.get(&tags::STUDY_DATE), Some(&Action::Remove));
/// assert_eq!(map.get(&tags::SERIES_DESCRIPTION), Some(&Action::Keep));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleMapBuilder {
    identity: Option<String>,
}

impl RuleMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value written to Patient's Name and Patient ID
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn maybe_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(&self) -> TagActionMap {
        let mut map = TagActionMap::new();

        for tag in KNOWN_TAGS {
            map.insert(*tag, Action::Keep);
        }
        for tag in DELETE_TAGS {
            map.insert(tag, Action::Remove);
        }
        if let Some(identity) = &self.identity {
            for tag in IDENTITY_TAGS {
                map.insert(tag, Action::Replace(identity.clone()));
            }
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_replace_over_delete_over_keep() {
        let map = RuleMapBuilder::new().identity("ANON001").build();

        for tag in DELETE_TAGS {
            assert_eq!(map.get(&tag), Some(&Action::Remove), "{}", tag);
        }
        for tag in IDENTITY_TAGS {
            assert_eq!(map.get(&tag), Some(&Action::Replace("ANON001".into())));
        }
        assert_eq!(map.get(&tags::STUDY_INSTANCE_UID), Some(&Action::Keep));
    }

    #[test]
    fn test_one_action_per_tag() {
        let map = RuleMapBuilder::new().identity("X").build();
        let mut expected: Vec<Tag> = KNOWN_TAGS.to_vec();
        expected.extend(DELETE_TAGS);
        expected.extend(IDENTITY_TAGS);
        expected.sort();
        expected.dedup();
        assert_eq!(map.len(), expected.len());
    }

    #[test]
    fn test_without_identity_name_is_kept() {
        let map = RuleMapBuilder::new().build();
        assert_eq!(map.get(&tags::PATIENT_NAME), Some(&Action::Keep));
        assert_eq!(map.get(&tags::PATIENT_ID), Some(&Action::Keep));
    }

    #[test]
    fn test_get_action_defaults() {
        let map = RuleMapBuilder::new().build();
        assert_eq!(map.get_action(&tags::ROWS), &Action::Keep);
        assert_eq!(map.get_action(&Tag(0x0029, 0x1010)), &Action::Remove);
        assert_eq!(map.get_action(&tags::STUDY_TIME), &Action::Remove);
    }

    #[test]
    fn test_tags_outside_known_list_are_kept_unlisted() {
        let map = RuleMapBuilder::new().build();
        assert!(!KNOWN_TAGS.contains(&tags::MODALITY));
        assert_eq!(map.get(&tags::MODALITY), None);
        assert_eq!(map.get_action(&tags::MODALITY), &Action::Keep);
        for tag in KNOWN_TAGS.iter().filter(|t| !DELETE_TAGS.contains(t)) {
            assert_eq!(map.get_action(tag), &Action::Keep, "{}", tag);
        }
    }

    #[test]
    fn test_serialize() {
        let mut map = TagActionMap::new();
        map.insert(tags::PATIENT_ID, Action::Replace("A1".into()));
        map.insert(tags::STUDY_DATE, Action::Remove);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"00080020":{"action":"remove"},"00100020":{"action":"replace","value":"A1"}}"#
        );
    }
}
