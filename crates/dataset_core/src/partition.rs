//! Partition paths and partition value coercion.
//!
//! A partitioned dataset encodes attributes as nested `key=value` directory
//! names. Values are compared as their logical type, so `month=01` and an
//! embedded integer `1` are the same partition.

use crate::LogicalType;
use serde::Serialize;
use std::fmt;

/// Value Hive-style writers use for a null partition.
pub const DEFAULT_NULL_PARTITION_VALUE: &str = "__HIVE_DEFAULT_PARTITION__";

/// One `key=value` directory level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartitionSegment {
    pub key: String,
    pub value: String,
}

impl PartitionSegment {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PartitionSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Classification of a directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryName {
    /// Well-formed `key=value`
    Partition(PartitionSegment),
    /// Contains `=` but the key or the value is empty
    Malformed,
    /// No `=` at all
    Plain,
}

impl DirectoryName {
    /// Classifies a single directory name.
    pub fn classify(name: &str) -> Self {
        match name.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                DirectoryName::Partition(PartitionSegment::new(key, value))
            }
            Some(_) => DirectoryName::Malformed,
            None => DirectoryName::Plain,
        }
    }
}

/// The ordered partition segments from the dataset root down to a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PartitionPath {
    segments: Vec<PartitionSegment>,
}

impl PartitionPath {
    /// The empty path of the dataset root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PartitionSegment>) -> Self {
        Self { segments }
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: PartitionSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Number of partition levels.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Partition keys, outermost first.
    pub fn keys(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.key.as_str()).collect()
    }

    /// Returns the directory value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }

    pub fn segments(&self) -> impl Iterator<Item = &PartitionSegment> {
        self.segments.iter()
    }
}

impl fmt::Display for PartitionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A partition value after type-aware coercion.
#[derive(Debug, Clone)]
pub enum PartitionValue {
    Null,
    Boolean(bool),
    Integer(i128),
    Float(f64),
    Text(String),
}

impl PartitionValue {
    /// Coerces a raw partition string to `data_type`.
    ///
    /// Returns `None` when the string is not a valid value of that type, or
    /// the type cannot be a partition value at all.
    pub fn coerce(raw: &str, data_type: &LogicalType, null_value: &str) -> Option<Self> {
        if raw == null_value {
            return Some(PartitionValue::Null);
        }

        match data_type {
            t if t.is_integer() => raw.trim().parse::<i128>().ok().map(PartitionValue::Integer),
            t if t.is_float() || matches!(t, LogicalType::Decimal { .. }) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(PartitionValue::Float),
            LogicalType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(PartitionValue::Boolean(true)),
                "false" => Some(PartitionValue::Boolean(false)),
                _ => None,
            },
            LogicalType::Null
            | LogicalType::Utf8
            | LogicalType::Binary
            | LogicalType::Date
            | LogicalType::Time
            | LogicalType::Timestamp { .. }
            | LogicalType::Duration
            | LogicalType::Other(_) => Some(PartitionValue::Text(raw.to_string())),
            // Nested types never hold a partition value.
            _ => None,
        }
    }

    /// Canonical text form; equal values have equal canonical forms.
    pub fn canonical(&self) -> String {
        match self {
            PartitionValue::Null => DEFAULT_NULL_PARTITION_VALUE.to_string(),
            PartitionValue::Boolean(b) => b.to_string(),
            PartitionValue::Integer(i) => i.to_string(),
            PartitionValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e18 => {
                (*f as i128).to_string()
            }
            PartitionValue::Float(f) => f.to_string(),
            PartitionValue::Text(s) => s.clone(),
        }
    }
}

impl PartialEq for PartitionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PartitionValue::Null, PartitionValue::Null) => true,
            (PartitionValue::Boolean(a), PartitionValue::Boolean(b)) => a == b,
            (PartitionValue::Integer(a), PartitionValue::Integer(b)) => a == b,
            (PartitionValue::Float(a), PartitionValue::Float(b)) => a == b,
            (PartitionValue::Integer(a), PartitionValue::Float(b))
            | (PartitionValue::Float(b), PartitionValue::Integer(a)) => *a as f64 == *b,
            (PartitionValue::Text(a), PartitionValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Compares two raw partition values as `data_type`.
///
/// Falls back to exact string comparison when either side does not coerce.
pub fn values_match(expected: &str, actual: &str, data_type: &LogicalType, null_value: &str) -> bool {
    match (
        PartitionValue::coerce(expected, data_type, null_value),
        PartitionValue::coerce(actual, data_type, null_value),
    ) {
        (Some(e), Some(a)) => e == a,
        _ => expected == actual,
    }
}

/// Infers the type of a partition key from all of its directory values.
///
/// All integers give `int64`, otherwise all numbers give `float64`,
/// otherwise `string`. Null markers are ignored.
pub fn infer_partition_type<'a>(
    values: impl IntoIterator<Item = &'a str>,
    null_value: &str,
) -> LogicalType {
    let mut all_integers = true;
    let mut all_numbers = true;
    let mut any = false;

    for value in values.into_iter().filter(|v| *v != null_value) {
        any = true;
        let trimmed = value.trim();
        if trimmed.parse::<i64>().is_err() {
            all_integers = false;
        }
        if !trimmed.parse::<f64>().is_ok_and(|f| f.is_finite()) {
            all_numbers = false;
        }
    }

    match (any, all_integers, all_numbers) {
        (false, _, _) => LogicalType::Utf8,
        (true, true, _) => LogicalType::Int64,
        (true, false, true) => LogicalType::Float64,
        _ => LogicalType::Utf8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_directory_names() {
        assert_eq!(
            DirectoryName::classify("year=2023"),
            DirectoryName::Partition(PartitionSegment::new("year", "2023"))
        );
        assert_eq!(
            DirectoryName::classify("expr=a=b"),
            DirectoryName::Partition(PartitionSegment::new("expr", "a=b"))
        );
        assert_eq!(DirectoryName::classify("year="), DirectoryName::Malformed);
        assert_eq!(DirectoryName::classify("=2023"), DirectoryName::Malformed);
        assert_eq!(DirectoryName::classify("data"), DirectoryName::Plain);
    }

    #[test]
    fn test_partition_path() {
        let path = PartitionPath::root()
            .child(PartitionSegment::new("year", "2023"))
            .child(PartitionSegment::new("month", "01"));
        assert_eq!(path.depth(), 2);
        assert_eq!(path.keys(), vec!["year", "month"]);
        assert_eq!(path.get("month"), Some("01"));
        assert_eq!(path.to_string(), "year=2023/month=01");
        assert_eq!(PartitionPath::root().to_string(), "<root>");
    }

    #[test]
    fn test_numeric_comparison() {
        let null = DEFAULT_NULL_PARTITION_VALUE;
        assert!(values_match("01", "1", &LogicalType::Int64, null));
        assert!(values_match("2", "2.0", &LogicalType::Float64, null));
        assert!(!values_match("01", "1", &LogicalType::Utf8, null));
        assert!(!values_match("2023", "2022", &LogicalType::Int32, null));
    }

    #[test]
    fn test_non_coercible_values_compare_as_strings() {
        let null = DEFAULT_NULL_PARTITION_VALUE;
        assert!(!values_match("2023", "abc", &LogicalType::Int64, null));
        assert!(values_match("abc", "abc", &LogicalType::Int64, null));
    }

    #[test]
    fn test_null_marker() {
        let null = DEFAULT_NULL_PARTITION_VALUE;
        assert_eq!(
            PartitionValue::coerce(null, &LogicalType::Int64, null),
            Some(PartitionValue::Null)
        );
        assert!(values_match(null, null, &LogicalType::Int64, null));
        assert!(!values_match(null, "0", &LogicalType::Int64, null));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            PartitionValue::coerce("TRUE", &LogicalType::Boolean, DEFAULT_NULL_PARTITION_VALUE),
            Some(PartitionValue::Boolean(true))
        );
        assert_eq!(
            PartitionValue::coerce("yes", &LogicalType::Boolean, DEFAULT_NULL_PARTITION_VALUE),
            None
        );
    }

    #[test]
    fn test_opaque_types_coerce_as_text() {
        let null = DEFAULT_NULL_PARTITION_VALUE;
        for data_type in [LogicalType::Null, LogicalType::Binary, LogicalType::Duration] {
            assert_eq!(
                PartitionValue::coerce("eu", &data_type, null),
                Some(PartitionValue::Text("eu".into()))
            );
        }
        assert_eq!(
            PartitionValue::coerce("eu", &LogicalType::List(Box::new(LogicalType::Utf8)), null),
            None
        );
    }

    #[test]
    fn test_canonical_forms() {
        assert_eq!(PartitionValue::Integer(1).canonical(), "1");
        assert_eq!(PartitionValue::Float(1.0).canonical(), "1");
        assert_eq!(PartitionValue::Float(1.5).canonical(), "1.5");
        assert_eq!(PartitionValue::Text("01".into()).canonical(), "01");
    }

    #[test]
    fn test_infer_partition_type() {
        let null = DEFAULT_NULL_PARTITION_VALUE;
        assert_eq!(infer_partition_type(["2023", "2024"], null), LogicalType::Int64);
        assert_eq!(infer_partition_type(["1.5", "2"], null), LogicalType::Float64);
        assert_eq!(infer_partition_type(["us", "2"], null), LogicalType::Utf8);
        assert_eq!(infer_partition_type(["7", null], null), LogicalType::Int64);
        assert_eq!(infer_partition_type([null], null), LogicalType::Utf8);
    }
}
