//! Sequence classification
//!
//! Maps series to canonical roles (`T1c_ax`, `T1_ax`, `T2_ax`) using an ordered,
//! configurable rule table.

mod classify;
mod rules;

pub use classify::{classify, Classification};
pub use rules::{ClassificationRule, ClassifierConfig, CompiledRule, AXIAL_ORIENTATION};
