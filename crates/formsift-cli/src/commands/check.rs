//! Check command implementation.

use anyhow::{Context, Result};
use formsift::{profile_from_file, CheckResult};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(input: &Path, profile_path: &Path, format: OutputFormat) -> Result<()> {
    let profile = profile_from_file(profile_path)
        .with_context(|| format!("Failed to load profile: {}", profile_path.display()))?;

    let raw = read_input(input)?;
    let data: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Input is not valid JSON: {}", input.display()))?;

    tracing::info!(
        "Checking {} against {} attribute(s)",
        input.display(),
        profile.attribs().len()
    );

    let result = profile.run(&data).context("Profile run failed")?;

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result)?,
    }

    // Exit with error code if the record did not validate
    if result.has_error() {
        std::process::exit(1);
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))
}

fn print_text(result: &CheckResult) {
    for (path, entry) in result.invalid() {
        match &entry.error {
            Some(error) => println!("\x1b[31minvalid\x1b[0m {path}: {error}"),
            None => println!("\x1b[31minvalid\x1b[0m {path}"),
        }
    }
    for (path, entry) in result.missing() {
        println!("\x1b[33mmissing\x1b[0m {path}: {}", entry.error);
    }
    for path in result.unknown().keys() {
        println!("\x1b[34munknown\x1b[0m {path}");
    }

    let summary_color = if result.has_error() { "\x1b[31m" } else { "\x1b[32m" };
    println!(
        "{}{} valid, {} invalid, {} missing, {} unknown\x1b[0m",
        summary_color,
        result.valid().len(),
        result.invalid().len(),
        result.missing().len(),
        result.unknown().len(),
    );
}

fn print_json(result: &CheckResult) -> Result<()> {
    let rendered = json!({
        "ok": !result.has_error(),
        "valid": result.valid_data(),
        "invalid": result.invalid_data(),
        "errors": result.all_errors(),
        "unknown": result.unknown(),
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
