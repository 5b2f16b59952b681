use crate::anonymize::rules::{is_private_tag, Action, TagActionMap};
use crate::error::Result;
use crate::scan::is_dicom_file;
use dicom_core::header::Header;
use dicom_core::value::Value;
use dicom_core::{DataElement, PrimitiveValue, Tag};
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Applies a [`TagActionMap`] to DICOM files
///
/// The rule map applies to top-level elements. Private elements are removed at every depth,
/// including inside sequence items.
#[derive(Debug, Clone, PartialEq)]
pub struct Anonymizer {
    rules: TagActionMap,
}

impl Anonymizer {
    pub fn new(rules: TagActionMap) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TagActionMap {
        &self.rules
    }

    /// Applies the rules to an object in place
    pub fn anonymize_object(&self, obj: &mut DefaultDicomObject) {
        let tags: Vec<Tag> = obj.iter().map(|elem| elem.tag()).collect();

        for tag in tags {
            match self.rules.get_action(&tag) {
                Action::Keep => {}
                Action::Remove => {
                    obj.remove_element(tag);
                }
                Action::Replace(new_value) => {
                    if let Ok(elem) = obj.element(tag) {
                        let vr = elem.vr();
                        let is_primitive = matches!(elem.value(), Value::Primitive(_));
                        if is_primitive {
                            obj.put(DataElement::new(
                                tag,
                                vr,
                                PrimitiveValue::from(new_value.as_str()),
                            ));
                        }
                    }
                }
            }
        }

        remove_nested_private_tags(obj);
    }

    /// Anonymizes one file and writes the result to `output`
    pub fn anonymize_file(&self, input: &Path, output: &Path) -> Result<()> {
        let mut obj = open_file(input)?;
        self.anonymize_object(&mut obj);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        obj.write_to_file(output)?;
        debug!("{} -> {}", input.display(), output.display());
        Ok(())
    }

    /// Anonymizes a file or a directory tree
    ///
    /// A single input file is written to `output`, or into it when `output` is an existing
    /// directory. A directory is walked recursively and every DICOM file is written to the
    /// same relative path under `output`. Returns the written paths.
    pub fn anonymize_path(&self, input: &Path, output: &Path) -> Result<Vec<PathBuf>> {
        if !input.is_dir() {
            let target = match (output.is_dir(), input.file_name()) {
                (true, Some(name)) => output.join(name),
                _ => output.to_path_buf(),
            };
            self.anonymize_file(input, &target)?;
            return Ok(vec![target]);
        }

        let mut written = Vec::new();
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_dicom_file(path) {
                continue;
            }
            let relative = path.strip_prefix(input).unwrap_or(path);
            let target = output.join(relative);
            self.anonymize_file(path, &target)?;
            written.push(target);
        }

        info!("Anonymized {} files into {}", written.len(), output.display());
        Ok(written)
    }
}

/// Removes private elements from the items of every sequence, recursively
fn remove_nested_private_tags(obj: &mut InMemDicomObject) {
    let tags: Vec<Tag> = obj.tags().collect();
    for tag in tags {
        if is_private_tag(&tag) {
            obj.remove_element(tag);
            continue;
        }
        let is_sequence = obj
            .element(tag)
            .map(|elem| elem.items().is_some())
            .unwrap_or(false);
        if is_sequence {
            obj.update_value(tag, |value| {
                if let Some(items) = value.items_mut() {
                    for item in items.iter_mut() {
                        remove_nested_private_tags(item);
                    }
                }
            });
        }
    }
}
