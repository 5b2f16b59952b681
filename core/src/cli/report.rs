use crate::api::ExtractionSummary;
use crate::extraction::SERIES_DESCRIPTION;
use std::fmt;

/// Text report formatter for an extraction run
pub struct TextReport<'a> {
    summary: &'a ExtractionSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a ExtractionSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series")?;
        writeln!(f, "======")?;
        for (key, group) in self.summary.index.iter() {
            let description = group
                .tag(SERIES_DESCRIPTION)
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<8} {:>4} imgs  {}",
                key.to_string(),
                group.image_count(),
                description
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Selected Sequences")?;
        writeln!(f, "==================")?;
        if self.summary.classification.is_empty() {
            writeln!(f, "none")?;
        }
        for outcome in &self.summary.report.outcomes {
            let status = if outcome.success {
                outcome.output.display().to_string()
            } else {
                format!(
                    "FAILED ({})",
                    outcome.error.as_deref().unwrap_or("unknown error")
                )
            };
            writeln!(f, "{:<16} {:<8} {}", outcome.role, outcome.series.to_string(), status)?;
        }

        Ok(())
    }
}
