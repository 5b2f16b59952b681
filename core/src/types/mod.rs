//! Core type definitions shared by the pipeline stages
//!
//! - [`SeriesKey`]: `(sequence, series)` identity of a group of slices
//! - [`SliceRef`]: one slice file and the ids parsed from its name
//! - [`TagValue`]: normalized value of one extracted DICOM tag
//! - [`TagTable`]: per-series mapping from tag to extracted value

mod series_key;
pub(crate) mod slice;
mod tag_value;

pub use series_key::SeriesKey;
pub use slice::SliceRef;
pub use tag_value::{TagTable, TagValue};
