use colored::*;
use dataset_core::{Report, Severity, ValidationIssue};
use serde_json::json;

pub fn print_validation_report(report: &Report, format: &str) {
    match format {
        "json" => print_json_report(report),
        _ => print_text_report(report),
    }
}

fn print_issue(index: usize, issue: &ValidationIssue) {
    let line = format!("{}. {}", index + 1, issue);
    match issue.severity {
        Severity::Error => println!("  {} {}", "error".red().bold(), line.red()),
        Severity::Warning => println!("  {} {}", "warning".yellow().bold(), line.yellow()),
    }
}

fn print_text_report(report: &Report) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));
    println!("  Dataset: {}", report.root);

    if report.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if report.aborted {
        println!(
            "{}",
            "  Run was interrupted; not every file was checked.".yellow()
        );
    }

    if !report.issues.is_empty() {
        println!("\n{}", "Issues:".bold());
        for (i, issue) in report.issues.iter().enumerate() {
            print_issue(i, issue);
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Partition keys:   {}", partition_keys(report));
    println!("  Partitions:       {}", report.stats.partitions);
    println!(
        "  Files read:       {} of {}",
        report.stats.files_read, report.stats.files_discovered
    );
    println!("  Columns:          {}", report.stats.columns);
    println!("  Total errors:     {}", report.error_count());
    println!("  Total warnings:   {}", report.warning_count());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &Report) {
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize report: {}", e)),
    }
}

pub fn print_schema(report: &Report, format: &str) {
    match format {
        "json" => {
            let output = json!({
                "root": report.root,
                "partition_keys": report.partition_keys,
                "schema": report.schema,
                "files_read": report.stats.files_read,
                "files_discovered": report.stats.files_discovered,
                "summary": {
                    "error_count": report.error_count(),
                    "warning_count": report.warning_count(),
                }
            });
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => print_error(&format!("Failed to serialize schema: {}", e)),
            }
        }
        _ => {
            println!("\nDataset Schema:");
            println!("  Root:           {}", report.root);
            println!("  Partition keys: {}", partition_keys(report));
            println!(
                "  Files read:     {} of {}",
                report.stats.files_read, report.stats.files_discovered
            );
            println!("\nColumns ({}):", report.schema.len());
            for column in report.schema.columns() {
                println!("  {}", column);
            }

            if !report.issues.is_empty() {
                println!();
                print_error(&format!(
                    "{} error(s) and {} warning(s) found; run `pdv validate` for details",
                    report.error_count(),
                    report.warning_count()
                ));
            }
        }
    }
}

fn partition_keys(report: &Report) -> String {
    if report.partition_keys.is_empty() {
        "(none)".to_string()
    } else {
        report.partition_keys.join("/")
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}
