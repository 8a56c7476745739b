//! Footer-only metadata reading.
//!
//! A [`MetadataReader`] turns one data file into [`FileMetadata`]: the
//! file's schema, the partition values it records about itself and the
//! min/max statistics of its top-level columns. Data pages are never
//! decoded.

use crate::converter::arrow_field_to_column;
use dataset_core::{Column, DirectoryName, LogicalType, PartitionPath, ValidatorConfig};
use parquet::arrow::parquet_to_arrow_schema;
use parquet::errors::ParquetError;
use parquet::file::metadata::ParquetMetaData;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Why a file's metadata could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt, truncated or unsupported footer
    #[error("invalid parquet footer: {0}")]
    Parquet(#[from] ParquetError),

    /// The footer schema has no logical representation
    #[error("unsupported schema: {0}")]
    Schema(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The blocking read task panicked or was cancelled
    #[error("read task failed: {0}")]
    Join(String),
}

/// Observed min/max of a column across all row groups, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRange {
    pub min: String,
    pub max: String,
}

impl ColumnRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// True if every row holds the same value.
    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }
}

/// What a data file says about itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    /// Top-level columns in file order
    pub schema: Vec<Column>,

    /// Partition values the file embeds, keyed by partition key
    pub partition_values: BTreeMap<String, String>,

    /// Statistics of top-level integer, string and boolean columns
    pub column_ranges: BTreeMap<String, ColumnRange>,

    pub num_rows: i64,
}

/// A data file that was read successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile {
    /// Path relative to the dataset root, `/`-separated
    pub location: String,

    /// Partition path of the directory holding the file
    pub partition: PartitionPath,

    /// Index of the file's group in walk order
    pub group: usize,

    pub metadata: FileMetadata,
}

/// Reads the metadata of one data file.
///
/// Implementations are called from the blocking thread pool and must not
/// assume an async context.
pub trait MetadataReader: Send + Sync {
    fn read_metadata(&self, path: &Path) -> Result<FileMetadata, ReadError>;
}

/// Reads Parquet footers with the `parquet` crate.
#[derive(Debug, Clone)]
pub struct ParquetMetadataReader {
    partition_prefix: String,
}

impl ParquetMetadataReader {
    /// Creates a reader that takes partition values from footer keys
    /// starting with `partition_prefix`.
    pub fn new(partition_prefix: impl Into<String>) -> Self {
        Self {
            partition_prefix: partition_prefix.into(),
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(config.partition_metadata_prefix.clone())
    }
}

impl Default for ParquetMetadataReader {
    fn default() -> Self {
        Self::new(dataset_core::DEFAULT_PARTITION_METADATA_PREFIX)
    }
}

impl MetadataReader for ParquetMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<FileMetadata, ReadError> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();
        let file_metadata = metadata.file_metadata();

        let arrow_schema = parquet_to_arrow_schema(
            file_metadata.schema_descr(),
            file_metadata.key_value_metadata(),
        )
        .map_err(|e| ReadError::Schema(e.to_string()))?;

        let schema: Vec<Column> = arrow_schema
            .fields()
            .iter()
            .map(|field| arrow_field_to_column(field))
            .collect();

        let mut partition_values = BTreeMap::new();

        // Explicit footer entries win over chunk paths.
        if let Some(entries) = file_metadata.key_value_metadata() {
            for entry in entries {
                let Some(key) = entry.key.strip_prefix(self.partition_prefix.as_str()) else {
                    continue;
                };
                if let (false, Some(value)) = (key.is_empty(), entry.value.as_ref()) {
                    partition_values.insert(key.to_string(), value.clone());
                }
            }
        }

        let chunk_paths = metadata
            .row_groups()
            .iter()
            .flat_map(|row_group| row_group.columns())
            .filter_map(|chunk| chunk.file_path());
        add_chunk_path_values(chunk_paths, &mut partition_values);

        Ok(FileMetadata {
            column_ranges: column_ranges(metadata, &schema),
            schema,
            partition_values,
            num_rows: file_metadata.num_rows(),
        })
    }
}

/// Adds `key=value` directory segments of column-chunk paths to `values`.
///
/// Keys already present are kept. The last segment names the file and is
/// never read as a partition.
fn add_chunk_path_values<'a>(
    file_paths: impl IntoIterator<Item = &'a str>,
    values: &mut BTreeMap<String, String>,
) {
    for file_path in file_paths {
        let Some((dirs, _file)) = file_path.rsplit_once('/') else {
            continue;
        };
        for name in dirs.split('/') {
            if let DirectoryName::Partition(segment) = DirectoryName::classify(name) {
                values.entry(segment.key).or_insert(segment.value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum Bound {
    Bool(bool),
    Int(i128),
    Text(String),
}

impl Bound {
    fn into_text(self) -> String {
        match self {
            Bound::Bool(b) => b.to_string(),
            Bound::Int(i) => i.to_string(),
            Bound::Text(s) => s,
        }
    }
}

/// Whether statistics of this type are trusted for partition checks.
///
/// UInt32 and UInt64 are stored as signed physical values and excluded.
fn has_usable_statistics(data_type: &LogicalType) -> bool {
    data_type.is_signed_integer()
        || matches!(
            data_type,
            LogicalType::UInt8 | LogicalType::UInt16 | LogicalType::Utf8 | LogicalType::Boolean
        )
}

/// Exact min/max of a chunk. Truncated bounds (long strings) are unusable.
fn stat_bounds(statistics: &Statistics) -> Option<(Bound, Bound)> {
    if !statistics.min_is_exact() || !statistics.max_is_exact() {
        return None;
    }
    match statistics {
        Statistics::Boolean(s) => Some((Bound::Bool(*s.min_opt()?), Bound::Bool(*s.max_opt()?))),
        Statistics::Int32(s) => Some((
            Bound::Int(i128::from(*s.min_opt()?)),
            Bound::Int(i128::from(*s.max_opt()?)),
        )),
        Statistics::Int64(s) => Some((
            Bound::Int(i128::from(*s.min_opt()?)),
            Bound::Int(i128::from(*s.max_opt()?)),
        )),
        Statistics::ByteArray(s) => Some((
            Bound::Text(s.min_opt()?.as_utf8().ok()?.to_string()),
            Bound::Text(s.max_opt()?.as_utf8().ok()?.to_string()),
        )),
        _ => None,
    }
}

/// Merges per-row-group statistics into one range per column.
///
/// A column is left out entirely if any row group lacks usable statistics
/// for it, since a partial range would be wrong.
fn column_ranges(metadata: &ParquetMetaData, schema: &[Column]) -> BTreeMap<String, ColumnRange> {
    let mut bounds: BTreeMap<String, (Bound, Bound)> = BTreeMap::new();
    let mut incomplete: BTreeSet<String> = BTreeSet::new();

    for row_group in metadata.row_groups() {
        for chunk in row_group.columns() {
            let parts = chunk.column_path().parts();
            let [name] = parts else {
                continue;
            };
            let Some(column) = schema.iter().find(|c| &c.name == name) else {
                continue;
            };
            if !has_usable_statistics(&column.data_type) || incomplete.contains(name) {
                continue;
            }

            match chunk.statistics().and_then(stat_bounds) {
                Some((min, max)) => match bounds.get_mut(name) {
                    Some((current_min, current_max)) => {
                        if min < *current_min {
                            *current_min = min;
                        }
                        if max > *current_max {
                            *current_max = max;
                        }
                    }
                    None => {
                        bounds.insert(name.clone(), (min, max));
                    }
                },
                None => {
                    bounds.remove(name);
                    incomplete.insert(name.clone());
                }
            }
        }
    }

    bounds
        .into_iter()
        .map(|(name, (min, max))| (name, ColumnRange::new(min.into_text(), max.into_text())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{Int32Array, Int64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use parquet::file::metadata::KeyValue;
    use parquet::file::properties::WriterProperties;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_parquet(path: &Path, batches: &[RecordBatch], metadata: Vec<KeyValue>) {
        let file = File::create(path).unwrap();
        let props = WriterProperties::builder()
            .set_key_value_metadata(Some(metadata))
            .build();
        let mut writer = ArrowWriter::try_new(file, batches[0].schema(), Some(props)).unwrap();
        for batch in batches {
            writer.write(batch).unwrap();
            writer.flush().unwrap();
        }
        writer.close().unwrap();
    }

    fn batch(ids: Vec<i64>, years: Vec<i32>, names: Vec<&str>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("year", DataType::Int32, true),
            Field::new("name", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(ids)),
                Arc::new(Int32Array::from(years)),
                Arc::new(StringArray::from(names)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_reads_schema_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.parquet");
        write_parquet(&path, &[batch(vec![1, 2, 3], vec![2023; 3], vec!["a", "b", "c"])], vec![]);

        let metadata = ParquetMetadataReader::default().read_metadata(&path).unwrap();
        assert_eq!(
            metadata.schema,
            vec![
                Column::required("id", LogicalType::Int64),
                Column::nullable("year", LogicalType::Int32),
                Column::nullable("name", LogicalType::Utf8),
            ]
        );
        assert_eq!(metadata.num_rows, 3);
        assert!(metadata.partition_values.is_empty());
    }

    #[test]
    fn test_embedded_partition_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.parquet");
        write_parquet(
            &path,
            &[batch(vec![1], vec![2022], vec!["a"])],
            vec![
                KeyValue::new("partition.year".to_string(), "2022".to_string()),
                KeyValue::new("partition.".to_string(), "ignored".to_string()),
                KeyValue::new("writer".to_string(), "test".to_string()),
            ],
        );

        let metadata = ParquetMetadataReader::default().read_metadata(&path).unwrap();
        assert_eq!(metadata.partition_values.len(), 1);
        assert_eq!(metadata.partition_values["year"], "2022");

        let custom = ParquetMetadataReader::new("writer");
        let metadata = custom.read_metadata(&path).unwrap();
        assert!(metadata.partition_values.is_empty());
    }

    #[test]
    fn test_ranges_merge_across_row_groups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.parquet");
        write_parquet(
            &path,
            &[
                batch(vec![5, 9], vec![2023, 2023], vec!["m", "q"]),
                batch(vec![-3, 4], vec![2023, 2023], vec!["b", "z"]),
            ],
            vec![],
        );

        let metadata = ParquetMetadataReader::default().read_metadata(&path).unwrap();
        assert_eq!(metadata.column_ranges["id"], ColumnRange::new("-3", "9"));
        assert_eq!(metadata.column_ranges["name"], ColumnRange::new("b", "z"));
        assert!(metadata.column_ranges["year"].is_constant());
        assert_eq!(metadata.column_ranges["year"].min, "2023");
    }

    #[test]
    fn test_truncated_string_statistics_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.parquet");
        let long = "x".repeat(80);
        write_parquet(
            &path,
            &[batch(vec![1, 2], vec![2023, 2023], vec![long.as_str(), long.as_str()])],
            vec![],
        );

        let metadata = ParquetMetadataReader::default().read_metadata(&path).unwrap();
        assert!(!metadata.column_ranges.contains_key("name"));
        assert_eq!(metadata.column_ranges["id"], ColumnRange::new("1", "2"));
    }

    #[test]
    fn test_chunk_paths_supply_missing_partition_values() {
        let mut values = BTreeMap::from([("year".to_string(), "2022".to_string())]);
        add_chunk_path_values(
            [
                "data/year=2023/month=01/part-0.parquet",
                "year=2023/day=/part-1.parquet",
                "region=eu.parquet",
            ],
            &mut values,
        );

        assert_eq!(
            values,
            BTreeMap::from([
                ("month".to_string(), "01".to_string()),
                ("year".to_string(), "2022".to_string()),
            ])
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();

        let err = ParquetMetadataReader::default().read_metadata(&path).unwrap_err();
        assert!(matches!(err, ReadError::Parquet(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ParquetMetadataReader::default()
            .read_metadata(&dir.path().join("missing.parquet"))
            .unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}
