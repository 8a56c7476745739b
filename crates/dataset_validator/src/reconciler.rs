//! Schema reconciliation across data files.

use crate::reader::DataFile;
use dataset_core::{
    CompatibilityRules, IssueKind, LogicalSchema, PartitionValue, ValidationIssue, ValidatorConfig,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Folds the schemas of all readable files into one dataset schema.
///
/// The first file seeds the schema. Later files must match it column by
/// column, up to the widenings allowed by the [`CompatibilityRules`].
pub struct SchemaReconciler<'a> {
    rules: &'a CompatibilityRules,
    allow_evolution: bool,
    null_value: &'a str,
}

impl<'a> SchemaReconciler<'a> {
    pub fn new(rules: &'a CompatibilityRules, allow_evolution: bool, null_value: &'a str) -> Self {
        Self {
            rules,
            allow_evolution,
            null_value,
        }
    }

    pub fn from_config(config: &'a ValidatorConfig) -> Self {
        Self::new(
            &config.compatibility,
            config.allow_schema_evolution,
            &config.null_partition_value,
        )
    }

    /// Reconciles `files`, given in discovery order.
    ///
    /// Returns the dataset schema and the schema-stage issues. The result
    /// depends only on the input, so calling this twice gives equal output.
    pub fn reconcile(&self, files: &[DataFile]) -> (LogicalSchema, Vec<ValidationIssue>) {
        let mut schema = LogicalSchema::new();
        let mut issues = Vec::new();
        let mut seed_names: Vec<String> = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let seeding = index == 0;
            self.check_shadowing(file, &mut issues);

            for column in &file.metadata.schema {
                let Some(position) = schema.position(&column.name) else {
                    if seeding || self.allow_evolution {
                        if !seeding {
                            debug!("Column '{}' added by {}", column.name, file.location);
                        }
                        schema.push(column.clone());
                    }
                    continue;
                };

                let Some(existing) = schema.get(&column.name) else {
                    continue;
                };
                match self.rules.unify_columns(existing, column) {
                    Some(unified) if unified == *existing => {}
                    Some(unified) => {
                        debug!(
                            "Column '{}' widened from {} to {} by {}",
                            column.name,
                            existing.type_label(),
                            unified.type_label(),
                            file.location
                        );
                        schema.replace(position, unified);
                    }
                    None => {
                        // Nullability is only named when it is the conflict.
                        let (expected, actual) =
                            if self.rules.unify(&existing.data_type, &column.data_type).is_some() {
                                (existing.type_label(), column.type_label())
                            } else {
                                (existing.data_type.to_string(), column.data_type.to_string())
                            };
                        issues.push(ValidationIssue::new(
                            IssueKind::IncompatibleColumnType {
                                column: column.name.clone(),
                                expected,
                                actual,
                            },
                            file.location.clone(),
                        ));
                    }
                }
            }

            if seeding {
                seed_names = unique_names(file);
            } else if !self.allow_evolution {
                self.check_column_set(file, &seed_names, &mut issues);
            }
        }

        (schema, issues)
    }

    fn check_column_set(&self, file: &DataFile, seed: &[String], issues: &mut Vec<ValidationIssue>) {
        let names = unique_names(file);
        let missing: Vec<String> = seed.iter().filter(|n| !names.contains(n)).cloned().collect();
        let unexpected: Vec<String> = names.iter().filter(|n| !seed.contains(n)).cloned().collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            issues.push(ValidationIssue::new(
                IssueKind::ColumnSetMismatch {
                    missing,
                    unexpected,
                },
                file.location.clone(),
            ));
        }
    }

    /// A partition key stored as a data column must be a valid value of
    /// that column's type.
    fn check_shadowing(&self, file: &DataFile, issues: &mut Vec<ValidationIssue>) {
        for segment in file.partition.segments() {
            let Some(column) = file.metadata.schema.iter().find(|c| c.name == segment.key) else {
                continue;
            };
            let conflicts = match PartitionValue::coerce(&segment.value, &column.data_type, self.null_value) {
                Some(PartitionValue::Null) => !column.nullable,
                Some(_) => false,
                None => true,
            };
            if conflicts {
                issues.push(ValidationIssue::new(
                    IssueKind::PartitionColumnShadowing {
                        column: column.name.clone(),
                        column_type: column.type_label(),
                        value: segment.value.clone(),
                    },
                    file.location.clone(),
                ));
            }
        }
    }
}

/// Column names of a file, first occurrence order, without repeats.
fn unique_names(file: &DataFile) -> Vec<String> {
    let mut seen = BTreeSet::new();
    file.metadata
        .schema
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect()
}
