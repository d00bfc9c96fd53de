use std::{fs, path::Path};

use tempfile::tempdir;

use svgsift::{SiftError, exchange::StorageRecord};
use svgsift_cli::{Args, run};

const BATCH: &str = r#"{
  "data": [
    { "id": "logo", "svg": "<svg class=\"logo\" width=\"120\" height=\"40\"><rect width=\"10\" height=\"10\"/></svg>" },
    { "id": "star", "svg": "<symbol id=\"star\" viewBox=\"0 0 24 24\"><path d=\"M12 2l3 7h7z\"/></symbol>" },
    { "id": "text", "svg": "<p>not a vector</p>" },
    { "id": "broken", "svg": "<svg width=\"4\"><rect></svg>" },
    { "id": "sheet", "svg": "<img src=\"data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='16' height='16'%3E%3Cg id='dot'/%3E%3C/svg%3E\">" }
  ],
  "host": "example.com",
  "origin": "https://example.com"
}"#;

fn args(input: &Path, output: &Path, presentation: bool) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        presentation,
    }
}

fn read_records(path: &Path) -> Vec<StorageRecord> {
    let json = fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&json).expect("Output is a list of stored records")
}

#[test]
fn e2e_smoke_test_batch() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("batch.json");
    let output = temp_dir.path().join("records.json");
    fs::write(&input, BATCH).expect("Failed to write batch");

    run(&args(&input, &output, false)).expect("Batch should process");

    let records = read_records(&output);
    let ids: Vec<_> = records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids.len(), 4, "unexpected records: {ids:?}");
    assert_eq!(ids[..3], ["logo", "star", "sheet"]);

    let logo = &records[0];
    assert!(!logo.svg.contains("class="));
    assert!(!logo.svg.contains("width=\"120\""));
    assert!(!logo.last_edited.is_empty());
}

#[test]
fn e2e_smoke_test_presentation() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("batch.json");
    let output = temp_dir.path().join("records.json");
    fs::write(&input, BATCH).expect("Failed to write batch");

    run(&args(&input, &output, true)).expect("Batch should process");

    let records = read_records(&output);
    assert!(records[0].svg.contains(r#"viewBox="0 0 120 40""#));
    assert!(records[1].svg.contains(r#"viewBox="0 0 24 24""#));
    assert!(records[3].svg.contains(r#"viewBox="0 0 16 16""#));
}

#[test]
fn e2e_smoke_test_error_inputs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("records.json");

    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(
        run(&args(&missing, &output, false)),
        Err(SiftError::Io(_))
    ));

    let malformed = temp_dir.path().join("malformed.json");
    fs::write(&malformed, r#"{"data": [{"id": "a"}]}"#).expect("Failed to write batch");
    assert!(matches!(
        run(&args(&malformed, &output, false)),
        Err(SiftError::Json { .. })
    ));

    let mut with_config = args(&malformed, &output, false);
    with_config.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());
    assert!(matches!(run(&with_config), Err(SiftError::Config(_))));

    assert!(!output.exists());
}
