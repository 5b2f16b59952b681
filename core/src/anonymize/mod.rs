//! Rule-based removal and replacement of patient-identifying tags

mod processor;
mod rules;

pub use processor::Anonymizer;
pub use rules::{Action, RuleMapBuilder, TagActionMap, DELETE_TAGS, IDENTITY_TAGS, KNOWN_TAGS};
