use arrow_array::{Array, ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{Field, Schema};
use assert_cmd::Command;
use parquet::arrow::ArrowWriter;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create a Command for the pdv binary
#[allow(deprecated)]
fn pdv() -> Command {
    let mut cmd = Command::cargo_bin("pdv").expect("Failed to find pdv binary");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_file(root: &Path, relative: &str, id: ArrayRef) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let value: ArrayRef = Arc::new(Float64Array::from(vec![0.5; id.len()]));
    let schema = Schema::new(vec![
        Field::new("id", id.data_type().clone(), true),
        Field::new("v", value.data_type().clone(), true),
    ]);
    let batch = RecordBatch::try_new(Arc::new(schema), vec![id, value]).unwrap();

    let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn int_ids() -> ArrayRef {
    Arc::new(Int64Array::from(vec![1, 2, 3]))
}

fn string_ids() -> ArrayRef {
    Arc::new(StringArray::from(vec!["a", "b"]))
}

/// `year=2023/month=01` and `year=2023/month=02`, both with integer ids.
fn valid_dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "year=2023/month=01/a.parquet", int_ids());
    write_file(dir.path(), "year=2023/month=02/b.parquet", int_ids());
    dir
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_valid_dataset() {
    let dataset = valid_dataset();
    pdv()
        .arg("validate")
        .arg(dataset.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"))
        .stdout(predicate::str::contains("year/month"));
}

#[test]
fn test_validate_incompatible_schema_fails() {
    let dataset = valid_dataset();
    write_file(dataset.path(), "year=2023/month=03/c.parquet", string_ids());

    pdv()
        .arg("validate")
        .arg(dataset.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("IncompatibleColumnType"))
        .stdout(predicate::str::contains("year=2023/month=03/c.parquet"));
}

#[test]
fn test_validate_json_output() {
    let dataset = valid_dataset();
    fs::create_dir_all(dataset.path().join("year=2024/month=01")).unwrap();

    let output = pdv()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(dataset.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout should be a JSON report");
    assert_eq!(value["verdict"], "pass");
    assert_eq!(value["issues"][0]["kind"]["code"], "EmptyPartition");
    assert_eq!(value["issues"][0]["severity"], "warning");
    assert_eq!(value["stats"]["files_read"], 2);
}

#[test]
fn test_validate_strict_mode() {
    let dataset = valid_dataset();
    fs::create_dir_all(dataset.path().join("year=2024/month=01")).unwrap();

    pdv()
        .arg("validate")
        .arg("--strict")
        .arg(dataset.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("EmptyPartition"));
}

#[test]
fn test_validate_schema_only_mode() {
    let dataset = valid_dataset();
    write_file(dataset.path(), "year=2024/d.parquet", int_ids());

    pdv()
        .arg("validate")
        .arg(dataset.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("IncompletePartitioning"));

    pdv()
        .arg("validate")
        .arg("--schema-only")
        .arg(dataset.path())
        .assert()
        .success();
}

#[test]
fn test_validate_with_config_file() {
    let dataset = valid_dataset();
    fs::write(dataset.path().join("year=2023/month=01/a.parquet.crc"), b"crc").unwrap();

    pdv()
        .arg("validate")
        .arg(dataset.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("UnreadableFile"));

    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("pdv.yml");
    fs::write(&config, "ignore_patterns:\n  - '\\.crc$'\nworkers: 2\n").unwrap();

    pdv()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .arg(dataset.path())
        .assert()
        .success();
}

#[test]
fn test_validate_missing_root() {
    pdv()
        .arg("validate")
        .arg("/nonexistent/dataset")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_validate_invalid_config_file() {
    let dataset = valid_dataset();
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("pdv.toml");
    fs::write(&config, "workers = \"many\"\n").unwrap();

    pdv()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .arg(dataset.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_validate_with_invalid_workers() {
    let dataset = valid_dataset();
    pdv()
        .arg("validate")
        .arg("--workers")
        .arg("0")
        .arg(dataset.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be at least 1"));
}

#[test]
fn test_validate_with_invalid_format() {
    let dataset = valid_dataset();
    pdv()
        .arg("validate")
        .arg("--format")
        .arg("xml")
        .arg(dataset.path())
        .assert()
        .failure();
}

// ============================================================================
// schema command tests
// ============================================================================

#[test]
fn test_schema_text_output() {
    let dataset = valid_dataset();
    pdv()
        .arg("schema")
        .arg(dataset.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("id: int64"))
        .stdout(predicate::str::contains("v: float64"))
        .stdout(predicate::str::contains("year/month"));
}

#[test]
fn test_schema_json_output() {
    let dataset = valid_dataset();
    let output = pdv()
        .arg("schema")
        .arg("--format")
        .arg("json")
        .arg(dataset.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["partition_keys"], serde_json::json!(["year", "month"]));
    assert_eq!(value["schema"][0]["name"], "id");
    assert_eq!(value["schema"][0]["type"], "int64");
}

#[test]
fn test_schema_does_not_fail_on_issues() {
    let dataset = valid_dataset();
    write_file(dataset.path(), "year=2023/month=03/c.parquet", string_ids());

    pdv()
        .arg("schema")
        .arg(dataset.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 error(s)"));
}

// ============================================================================
// init command tests
// ============================================================================

#[test]
fn test_init_to_stdout() {
    pdv()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden_prefixes"))
        .stdout(predicate::str::contains("integer_promotion"));
}

#[test]
fn test_init_with_output_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pdv.toml");

    pdv()
        .arg("init")
        .arg("--output")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[compatibility]"));

    // The written file is accepted back.
    let dataset = valid_dataset();
    pdv()
        .arg("validate")
        .arg("--config")
        .arg(&path)
        .arg(dataset.path())
        .assert()
        .success();
}

#[test]
fn test_init_unknown_extension() {
    let dir = TempDir::new().unwrap();
    pdv()
        .arg("init")
        .arg("--output")
        .arg(dir.path().join("pdv.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--format"));
}

// ============================================================================
// General CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    pdv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_cli_version() {
    pdv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_help() {
    pdv()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema-only"))
        .stdout(predicate::str::contains("strict"))
        .stdout(predicate::str::contains("timeout-ms"))
        .stdout(predicate::str::contains("format"));
}
