use crate::error::MrseqError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identity of a series group: the `(sequence, series)` pair embedded in slice file names
///
/// Ordering is numeric by sequence id, then series id. This ordering is the tie-break
/// policy of the classifier: when several groups qualify for one role, the lowest key wins.
///
/// Displayed and parsed as `"<sequence>.<series>"`.
///
/// # Example
///
/// ```
/// use mrseq_core::SeriesKey;
///
/// let key: SeriesKey = "1.2".parse().unwrap();
/// assert_eq!(key, SeriesKey::new(1, 2));
/// assert_eq!(key.to_string(), "1.2");
/// assert!(SeriesKey::new(2, 1) > SeriesKey::new(1, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub sequence: u32,
    pub series: u32,
}

impl SeriesKey {
    /// Creates a new SeriesKey
    pub fn new(sequence: u32, series: u32) -> Self {
        Self { sequence, series }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sequence, self.series)
    }
}

impl FromStr for SeriesKey {
    type Err = MrseqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MrseqError::InvalidValue(format!("'{}' is not a <sequence>.<series> key", s));

        let (sequence, series) = s.split_once('.').ok_or_else(invalid)?;
        let sequence = sequence.trim().parse().map_err(|_| invalid())?;
        let series = series.trim().parse().map_err(|_| invalid())?;

        Ok(Self::new(sequence, series))
    }
}

impl Serialize for SeriesKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeriesKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2", SeriesKey::new(1, 2))]
    #[case("10.3", SeriesKey::new(10, 3))]
    #[case("0.0", SeriesKey::new(0, 0))]
    fn test_parse(#[case] input: &str, #[case] expected: SeriesKey) {
        assert_eq!(input.parse::<SeriesKey>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1")]
    #[case("a.b")]
    #[case("1.2.3")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<SeriesKey>().is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let mut keys = vec![
            SeriesKey::new(10, 1),
            SeriesKey::new(2, 5),
            SeriesKey::new(2, 11),
            SeriesKey::new(1, 3),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                SeriesKey::new(1, 3),
                SeriesKey::new(2, 5),
                SeriesKey::new(2, 11),
                SeriesKey::new(10, 1),
            ]
        );
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&SeriesKey::new(4, 7)).unwrap();
        assert_eq!(json, "\"4.7\"");
        let back: SeriesKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SeriesKey::new(4, 7));
    }
}
