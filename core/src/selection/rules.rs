use crate::error::{MrseqError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Orientation of an axial acquisition after rounding: row along x, column along y
pub const AXIAL_ORIENTATION: [i64; 6] = [1, 0, 0, 0, 1, 0];

/// One role and the conditions a series must meet to fill it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Output role name, e.g. `T1_ax`
    pub role: String,

    /// Regular expression the series description must match
    pub description_pattern: String,

    /// Regular expressions the series description must not match
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Whether a contrast agent must be recorded for the series
    #[serde(default)]
    pub requires_contrast: bool,

    /// Series claimed by an exclusive rule are not offered to later rules
    #[serde(default)]
    pub exclusive: bool,

    /// Remove `/` from the description when it is used as a collision key
    #[serde(default)]
    pub strip_slashes_on_collision: bool,
}

impl ClassificationRule {
    pub fn new(role: impl Into<String>, description_pattern: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            description_pattern: description_pattern.into(),
            exclude_patterns: Vec::new(),
            requires_contrast: false,
            exclusive: false,
            strip_slashes_on_collision: false,
        }
    }

    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    pub fn with_contrast(mut self) -> Self {
        self.requires_contrast = true;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn strip_slashes(mut self) -> Self {
        self.strip_slashes_on_collision = true;
        self
    }
}

/// Ordered classifier configuration
///
/// The default reproduces the axial T1 post-contrast, T1 and T2 selection. Other
/// protocols can load their own rules from JSON:
///
/// ```
/// use mrseq_core::selection::ClassifierConfig;
///
/// let json = r#"{
///     "rules": [
///         {"role": "FLAIR_ax", "description_pattern": "(?i)flair"}
///     ]
/// }"#;
/// let config = ClassifierConfig::from_json(json).unwrap();
/// assert_eq!(config.axial_orientation, [1, 0, 0, 0, 1, 0]);
/// assert_eq!(config.rules[0].role, "FLAIR_ax");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_axial_orientation")]
    pub axial_orientation: [i64; 6],
    pub rules: Vec<ClassificationRule>,
}

fn default_axial_orientation() -> [i64; 6] {
    AXIAL_ORIENTATION
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            axial_orientation: AXIAL_ORIENTATION,
            rules: vec![
                ClassificationRule::new("T1c_ax", "[Tt]1")
                    .excluding("(?i)neck")
                    .with_contrast()
                    .exclusive()
                    .strip_slashes(),
                ClassificationRule::new("T1_ax", "[Tt]1")
                    .excluding("(?i)f/s")
                    .excluding("(?i)neck"),
                ClassificationRule::new("T2_ax", "[Tt]2")
                    .excluding("(?i)f/s")
                    .excluding("(?i)neck"),
            ],
        }
    }
}

impl ClassifierConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.compile()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Compiles every pattern
    ///
    /// # Errors
    ///
    /// [`MrseqError::Config`] for an invalid pattern or a duplicated role name.
    pub fn compile(&self) -> Result<Vec<CompiledRule>> {
        let mut compiled: Vec<CompiledRule> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if compiled.iter().any(|c| c.rule.role == rule.role) {
                return Err(MrseqError::Config(format!(
                    "role '{}' is defined more than once",
                    rule.role
                )));
            }
            compiled.push(CompiledRule::new(rule)?);
        }
        Ok(compiled)
    }
}

/// A rule with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ClassificationRule,
    description: Regex,
    excludes: Vec<Regex>,
}

impl CompiledRule {
    fn new(rule: &ClassificationRule) -> Result<Self> {
        Ok(Self {
            rule: rule.clone(),
            description: Regex::new(&rule.description_pattern)?,
            excludes: rule
                .exclude_patterns
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<_, _>>()?,
        })
    }

    /// Checks the description and contrast conditions (orientation is checked by the caller)
    pub fn matches(&self, description: &str, has_contrast: bool) -> bool {
        if self.rule.requires_contrast && !has_contrast {
            return false;
        }
        self.description.is_match(description)
            && !self.excludes.iter().any(|re| re.is_match(description))
    }

    /// Key used when the role is already taken
    pub fn collision_key(&self, description: &str) -> String {
        if self.rule.strip_slashes_on_collision {
            description.replace('/', "")
        } else {
            description.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn default_rule(role: &str) -> CompiledRule {
        ClassifierConfig::default()
            .compile()
            .unwrap()
            .into_iter()
            .find(|r| r.rule.role == role)
            .unwrap()
    }

    #[rstest]
    #[case("T1 AX", false, true)]
    #[case("t1 ax", false, true)]
    #[case("T1 AX F/S", false, false)]
    #[case("T1 ax f/s", false, false)]
    #[case("T1 AX NECK", false, false)]
    #[case("T2 AX", false, false)]
    #[case("T1 AX", true, true)]
    fn test_t1_rule(#[case] description: &str, #[case] contrast: bool, #[case] expected: bool) {
        assert_eq!(default_rule("T1_ax").matches(description, contrast), expected);
    }

    #[rstest]
    #[case("T1 AX C", true, true)]
    #[case("T1 AX F/S +C", true, true)]
    #[case("T1 AX C", false, false)]
    #[case("T1 Neck C", true, false)]
    #[case("T2 AX", true, false)]
    fn test_t1c_rule(#[case] description: &str, #[case] contrast: bool, #[case] expected: bool) {
        assert_eq!(default_rule("T1c_ax").matches(description, contrast), expected);
    }

    #[test]
    fn test_collision_key() {
        assert_eq!(default_rule("T1c_ax").collision_key("T1 AX F/S +C"), "T1 AX FS +C");
        assert_eq!(default_rule("T1_ax").collision_key("T1/AX"), "T1/AX");
    }

    #[test]
    fn test_default_order() {
        let roles: Vec<_> = ClassifierConfig::default()
            .rules
            .into_iter()
            .map(|r| r.role)
            .collect();
        assert_eq!(roles, vec!["T1c_ax", "T1_ax", "T2_ax"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let json = r#"{"rules": [{"role": "X", "description_pattern": "(unclosed"}]}"#;
        assert!(matches!(
            ClassifierConfig::from_json(json),
            Err(MrseqError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_role() {
        let mut config = ClassifierConfig::default();
        config.rules.push(ClassificationRule::new("T1_ax", "T1"));
        assert!(matches!(config.compile(), Err(MrseqError::Config(_))));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&ClassifierConfig::default()).unwrap();
        assert_eq!(
            ClassifierConfig::from_json(&json).unwrap(),
            ClassifierConfig::default()
        );
    }
}
