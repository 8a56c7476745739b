//! Partition value checks.

use crate::reader::DataFile;
use crate::walker::PartitionGroup;
use dataset_core::{
    IssueKind, LogicalType, PartitionValue, ValidationIssue, ValidatorConfig, infer_partition_type,
    values_match,
};
use std::collections::{BTreeMap, HashMap};

/// Keys of the deepest partition branch, outermost first.
pub fn deepest_keys(groups: &[PartitionGroup]) -> Vec<String> {
    let mut deepest: Option<&PartitionGroup> = None;
    for group in groups {
        if deepest.is_none_or(|d| group.path.depth() > d.path.depth()) {
            deepest = Some(group);
        }
    }
    deepest
        .map(|g| g.path.keys().into_iter().map(String::from).collect())
        .unwrap_or_default()
}

/// Checks that directory names agree with the files under them and with
/// each other.
pub struct PartitionValidator<'a> {
    null_value: &'a str,
}

impl<'a> PartitionValidator<'a> {
    pub fn new(null_value: &'a str) -> Self {
        Self { null_value }
    }

    pub fn from_config(config: &'a ValidatorConfig) -> Self {
        Self::new(&config.null_partition_value)
    }

    /// Validates `groups` (in walk order) and the readable `files` in them.
    ///
    /// Issues come out group by group: the group's own layout issues first,
    /// then value mismatches of its files in file order.
    pub fn validate(&self, groups: &[PartitionGroup], files: &[DataFile]) -> Vec<ValidationIssue> {
        let inferred = self.infer_key_types(groups);
        let expected_keys = deepest_keys(groups);
        let max_depth = expected_keys.len();

        let mut files_by_group: BTreeMap<usize, Vec<&DataFile>> = BTreeMap::new();
        for file in files {
            files_by_group.entry(file.group).or_default().push(file);
        }

        let mut issues = Vec::new();
        let mut seen: HashMap<Vec<(String, String)>, String> = HashMap::new();

        for (index, group) in groups.iter().enumerate() {
            let group_location = group.location();

            // Empty branches already carry an EmptyPartition warning.
            if group.path.depth() < max_depth && !group.files.is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::IncompletePartitioning {
                        expected: expected_keys.clone(),
                        actual: group.path.keys().into_iter().map(String::from).collect(),
                    },
                    group_location.clone(),
                ));
            }

            if !group.path.is_root() {
                let canonical = self.canonical_path(group, &inferred);
                match seen.get(&canonical) {
                    Some(other) => issues.push(ValidationIssue::new(
                        IssueKind::DuplicatePartition {
                            partition: group.path.to_string(),
                            other: other.clone(),
                        },
                        group_location,
                    )),
                    None => {
                        seen.insert(canonical, group_location);
                    }
                }
            }

            for file in files_by_group.get(&index).into_iter().flatten() {
                self.check_file(file, &inferred, &mut issues);
            }
        }

        issues
    }

    /// Type of each key inferred from all of its directory values.
    fn infer_key_types(&self, groups: &[PartitionGroup]) -> BTreeMap<String, LogicalType> {
        let mut values: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for group in groups {
            for segment in group.path.segments() {
                values
                    .entry(segment.key.as_str())
                    .or_default()
                    .push(segment.value.as_str());
            }
        }
        values
            .into_iter()
            .map(|(key, vals)| (key.to_string(), infer_partition_type(vals, self.null_value)))
            .collect()
    }

    fn canonical_path(
        &self,
        group: &PartitionGroup,
        inferred: &BTreeMap<String, LogicalType>,
    ) -> Vec<(String, String)> {
        group
            .path
            .segments()
            .map(|segment| {
                let value = inferred
                    .get(&segment.key)
                    .and_then(|ty| PartitionValue::coerce(&segment.value, ty, self.null_value))
                    .map(|v| v.canonical())
                    .unwrap_or_else(|| segment.value.clone());
                (segment.key.clone(), value)
            })
            .collect()
    }

    fn check_file(
        &self,
        file: &DataFile,
        inferred: &BTreeMap<String, LogicalType>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for segment in file.partition.segments() {
            let declared = file
                .metadata
                .schema
                .iter()
                .find(|c| c.name == segment.key)
                .map(|c| &c.data_type)
                .or_else(|| inferred.get(&segment.key))
                .cloned()
                .unwrap_or(LogicalType::Utf8);

            let actual = if let Some(embedded) = file.metadata.partition_values.get(&segment.key) {
                (!values_match(&segment.value, embedded, &declared, self.null_value))
                    .then(|| embedded.clone())
            } else if let Some(range) = file.metadata.column_ranges.get(&segment.key) {
                if !range.is_constant() {
                    Some(format!("{}..{}", range.min, range.max))
                } else {
                    (!values_match(&segment.value, &range.min, &declared, self.null_value))
                        .then(|| range.min.clone())
                }
            } else {
                None
            };

            if let Some(actual) = actual {
                issues.push(ValidationIssue::new(
                    IssueKind::PartitionValueMismatch {
                        key: segment.key.clone(),
                        expected: segment.value.clone(),
                        actual,
                    },
                    file.location.clone(),
                ));
            }
        }
    }
}
