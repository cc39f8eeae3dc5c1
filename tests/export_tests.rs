mod common;
use common::{init_db_with_data, run_with, temp_out};
use std::fs;

#[test]
fn test_export_csv_all() {
    let (db_path, rx_path) = init_db_with_data("export_csv_all");
    let out = temp_out("export_csv_all", "csv");

    run_with(&db_path, &rx_path, &["mark", "2"]).success();
    run_with(
        &db_path,
        &rx_path,
        &["export", "--format", "csv", "--file", &out],
    )
    .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    let header = lines.next().expect("csv header");
    assert!(header.contains("drug_name"));
    assert!(header.contains("administered"));
    assert_eq!(lines.count(), 5);
    assert!(content.contains("26/07/2025"));
    assert!(content.contains("27/07/2025"));
    assert!(content.contains("Gaviz 20mg"));
    assert!(content.contains("true"));
}

#[test]
fn test_export_json_range() {
    let (db_path, rx_path) = init_db_with_data("export_json_range");
    let out = temp_out("export_json_range", "json");

    run_with(
        &db_path,
        &rx_path,
        &[
            "export", "--format", "json", "--file", &out, "--range", "2025-07-27",
        ],
    )
    .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = rows.as_array().expect("json array");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["date"] == "27/07/2025"));
}

#[test]
fn test_export_skips_day_note_anchor() {
    let (db_path, rx_path) = init_db_with_data("export_no_anchor");
    let out = temp_out("export_no_anchor", "json");

    run_with(&db_path, &rx_path, &["note", "--day", "2025-08-05", "x"]).success();
    run_with(
        &db_path,
        &rx_path,
        &["export", "--format", "json", "--file", &out, "--range", "all"],
    )
    .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    assert!(!content.contains("__day_note__"));
    assert!(!content.contains("05/08/2025"));
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let (db_path, rx_path) = init_db_with_data("export_force");
    let out = temp_out("export_force", "csv");
    fs::write(&out, "old").expect("seed file");

    run_with(
        &db_path,
        &rx_path,
        &["export", "--format", "csv", "--file", &out],
    )
    .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "old");

    run_with(
        &db_path,
        &rx_path,
        &["export", "--format", "csv", "--file", &out, "--force"],
    )
    .success();
    assert_ne!(fs::read_to_string(&out).unwrap(), "old");
}

#[test]
fn test_export_bad_range_fails() {
    let (db_path, rx_path) = init_db_with_data("export_bad_range");
    let out = temp_out("export_bad_range", "csv");

    run_with(
        &db_path,
        &rx_path,
        &[
            "export",
            "--format",
            "csv",
            "--file",
            &out,
            "--range",
            "2025-07-28:2025-07-01",
        ],
    )
    .failure();
}
