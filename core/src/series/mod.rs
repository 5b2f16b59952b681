//! Grouping of slices into series

use crate::error::Result;
use crate::extraction::{extract_tags, TagRule};
use crate::types::{SeriesKey, SliceRef, TagTable, TagValue};
use log::{debug, info};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

/// All slices sharing one [`SeriesKey`], plus the tags read from its representative slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesGroup {
    slices: Vec<SliceRef>,
    tags: TagTable,
}

impl SeriesGroup {
    /// Number of slices in the group (gaps in image indices are not detected)
    pub fn image_count(&self) -> usize {
        self.slices.len()
    }

    /// Slices sorted by image index
    pub fn slices(&self) -> &[SliceRef] {
        &self.slices
    }

    /// Slice with the lowest image index
    pub fn representative(&self) -> Option<&SliceRef> {
        self.slices.first()
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: TagTable) {
        self.tags = tags;
    }

    pub fn tag(&self, tag: dicom_core::Tag) -> Option<&TagValue> {
        self.tags.get(tag)
    }
}

impl Serialize for SeriesGroup {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.tags.len() + 1))?;
        map.serialize_entry("Imgs", &self.image_count())?;
        for (name, value) in self.tags.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered map of every series in a study
///
/// Iteration is ascending by [`SeriesKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeriesIndex(BTreeMap<SeriesKey, SeriesGroup>);

impl SeriesIndex {
    /// Groups slice references by `(sequence, series)`
    pub fn from_slices(slices: impl IntoIterator<Item = SliceRef>) -> Self {
        let mut groups: BTreeMap<SeriesKey, SeriesGroup> = BTreeMap::new();
        for slice in slices {
            groups.entry(slice.key()).or_default().slices.push(slice);
        }
        for group in groups.values_mut() {
            group.slices.sort_by_key(|s| s.image);
        }
        SeriesIndex(groups)
    }

    /// Reads the representative slice of every group and stores its tags
    ///
    /// # Errors
    ///
    /// Fails on the first representative slice that cannot be read.
    pub fn merge_metadata(&mut self, rules: &[TagRule]) -> Result<()> {
        for (key, group) in self.0.iter_mut() {
            if let Some(slice) = group.representative() {
                debug!("Series {}: reading {}", key, slice.path.display());
                group.tags = extract_tags(&slice.path, rules)?;
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&SeriesGroup> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &SeriesKey) -> Option<&mut SeriesGroup> {
        self.0.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeriesKey, &SeriesGroup)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SeriesKey> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the image counts of all groups
    pub fn total_images(&self) -> usize {
        self.0.values().map(SeriesGroup::image_count).sum()
    }

    /// Pretty JSON with a 4-space indent
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Writes [`Self::to_json_pretty`] to a file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        info!("Wrote series table to {}", path.display());
        Ok(())
    }

    /// Logs one line per series
    pub fn log_summary(&self) {
        info!("Found the following sequences:");
        for (key, group) in self.iter() {
            let description = group
                .tag(crate::extraction::SERIES_DESCRIPTION)
                .map(ToString::to_string)
                .unwrap_or_default();
            info!("  {:>6}  {:>4} imgs  {}", key, group.image_count(), description);
        }
    }
}
