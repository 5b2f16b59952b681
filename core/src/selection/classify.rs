use crate::error::Result;
use crate::extraction::{CONTRAST_BOLUS_AGENT, IMAGE_ORIENTATION_PATIENT, SERIES_DESCRIPTION};
use crate::selection::rules::{ClassifierConfig, CompiledRule};
use crate::series::{SeriesGroup, SeriesIndex};
use crate::types::{SeriesKey, TagValue};
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Role table produced by [`classify`]
///
/// Keys keep their insertion order. A key is never reassigned: when a role is already
/// taken the series is recorded under its description, and when that is taken too the
/// description gets a ` (<sequence>.<series>)` suffix, numbered further if needed. A series
/// is recorded at most once under a fallback name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification(Vec<(String, SeriesKey)>);

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SeriesKey> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, key)| *key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SeriesKey)> {
        self.0.iter().map(|(name, key)| (name.as_str(), *key))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stores `key` under `role`, or under a fallback name if `role` is taken
    ///
    /// A name already holding the same series is reused rather than duplicated. Returns
    /// the name actually used.
    pub(crate) fn assign(&mut self, role: &str, fallback: String, key: SeriesKey) -> String {
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => role.to_string(),
                1 => fallback.clone(),
                2 => format!("{} ({})", fallback, key),
                n => format!("{} ({}) {}", fallback, key, n - 1),
            };
            match self.get(&name) {
                None => {
                    self.0.push((name.clone(), key));
                    return name;
                }
                Some(existing) if existing == key => return name,
                Some(_) => attempt += 1,
            }
        }
    }
}

impl Serialize for Classification {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, key) in self.iter() {
            map.serialize_entry(name, &key)?;
        }
        map.end()
    }
}

struct Candidate<'a> {
    key: SeriesKey,
    description: &'a str,
    has_contrast: bool,
    axial: bool,
}

impl<'a> Candidate<'a> {
    /// Returns `None` for series without an orientation
    fn from_group(key: SeriesKey, group: &'a SeriesGroup, axial: &[i64; 6]) -> Option<Self> {
        let orientation = group.tag(IMAGE_ORIENTATION_PATIENT)?;
        Some(Self {
            key,
            description: group
                .tag(SERIES_DESCRIPTION)
                .and_then(TagValue::as_text)
                .unwrap_or_default(),
            has_contrast: group.tag(CONTRAST_BOLUS_AGENT).is_some(),
            axial: orientation.as_integers() == Some(axial.as_slice()),
        })
    }

    fn qualifies(&self, rule: &CompiledRule) -> bool {
        self.axial && rule.matches(self.description, self.has_contrast)
    }
}

/// Assigns series to roles
///
/// Exclusive rules run first, in configuration order, each over all remaining series in
/// [`SeriesKey`] order; a series they claim is withdrawn from later rules. The remaining
/// series are then visited in key order and offered to every non-exclusive rule in turn,
/// so one series may fill several non-exclusive roles.
///
/// # Errors
///
/// [`crate::MrseqError::Config`] if the configuration does not compile.
pub fn classify(index: &SeriesIndex, config: &ClassifierConfig) -> Result<Classification> {
    let rules = config.compile()?;
    let mut table = Classification::new();

    let mut candidates: Vec<Candidate> = index
        .iter()
        .filter_map(|(key, group)| {
            let candidate = Candidate::from_group(*key, group, &config.axial_orientation);
            if candidate.is_none() {
                debug!("Series {} has no orientation, skipped", key);
            }
            candidate
        })
        .collect();

    for rule in rules.iter().filter(|r| r.rule.exclusive) {
        candidates.retain(|candidate| {
            if !candidate.qualifies(rule) {
                return true;
            }
            let name = table.assign(
                &rule.rule.role,
                rule.collision_key(candidate.description),
                candidate.key,
            );
            debug!("Series {} -> {}", candidate.key, name);
            false
        });
    }

    for candidate in &candidates {
        for rule in rules.iter().filter(|r| !r.rule.exclusive) {
            if candidate.qualifies(rule) {
                let name = table.assign(
                    &rule.rule.role,
                    rule.collision_key(candidate.description),
                    candidate.key,
                );
                debug!("Series {} -> {}", candidate.key, name);
            }
        }
    }

    Ok(table)
}
