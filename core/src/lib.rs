pub mod anonymize;
pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod registration;
pub mod scan;
pub mod selection;
pub mod series;
pub mod types;
pub mod volume;

pub use api::{Catalog, ExtractOptions, ExtractionSummary, SequenceExtractor};
pub use cli::report::TextReport;
pub use error::{MrseqError, Result};
pub use selection::{classify, Classification, ClassifierConfig};
pub use series::{SeriesGroup, SeriesIndex};
pub use types::*;
pub use volume::{FailurePolicy, Materializer, NiftiConverter, VolumeConverter};
