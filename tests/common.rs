#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Three days of a short regimen. 05/08/2025 has no doses on purpose.
pub const SAMPLE_PRESCRIPTION: &str = r#"
revision: "2025-07-26"
days:
  - date: "26/07/2025"
    doses:
      - time: "22:00"
        drug: "Bactrim"
        dosage: "1 tablet"
      - time: "07:30"
        drug: "Gaviz 20mg"
        dosage: "2 tablets"
        note: "Before breakfast"
      - time: "14:00"
        drug: "Diprona 1g"
        dosage: "1 tablet"
  - date: "2025-07-27"
    doses:
      - time: "07:30"
        drug: "Gaviz 20mg"
        dosage: "2 tablets"
        note: "Before breakfast"
      - time: "18:00"
        drug: "Diprona 1g"
        dosage: "1 tablet"
        note: "With water"
"#;

pub fn rdl() -> Command {
    cargo_bin_cmd!("rdoselog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rdoselog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `content` as a prescription document named after the test
pub fn write_prescription(name: &str, content: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_prescription.yaml", name));
    fs::write(&path, content).expect("write prescription");
    path.to_string_lossy().to_string()
}

/// Run a command against the test DB and prescription, in test mode
pub fn run_with(db_path: &str, rx_path: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    rdl()
        .args(["--db", db_path, "--prescription", rx_path, "--test"])
        .args(args)
        .assert()
}

/// Initialize DB and materialize the sample prescription
pub fn init_db_with_data(name: &str) -> (String, String) {
    let db_path = setup_test_db(name);
    let rx_path = write_prescription(name, SAMPLE_PRESCRIPTION);

    run_with(&db_path, &rx_path, &["init"]).success();
    run_with(&db_path, &rx_path, &["sync"]).success();

    (db_path, rx_path)
}
