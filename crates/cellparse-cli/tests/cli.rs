//! Command line behaviour of the `cellparse` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const RECORD: &str = "Иванов Иван 89011234567 ул. Ключевая д. 14, корп. 1, лит. А, кв. 93 тел.";

fn cellparse() -> Command {
    Command::cargo_bin("cellparse").unwrap()
}

#[test]
fn process_single_record_as_json() {
    cellparse()
        .args(["process", RECORD])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""address":"ул. Ключевая 14-1А-93""#))
        .stdout(predicate::str::contains(r#""phone":"89011234567""#))
        .stdout(predicate::str::contains(r#""other_info":"Иванов Иван""#));
}

#[test]
fn process_stdin_lines_as_csv() {
    cellparse()
        .args(["process", "--format", "csv"])
        .write_stdin("пр. Науки 15\n\nСидоров 901-123-456\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("text,address,phone,other_info"))
        .stdout(predicate::str::contains("пр. Науки 15,пр. Науки 15,,"))
        .stdout(predicate::str::contains("Сидоров 901-123-456,,,Сидоров 901-123-456"));
}

#[test]
fn process_text_with_letter_stripping() {
    cellparse()
        .args(["process", "--format", "text", "--strip-letters", "ул. Ключевая 54А-121"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address: ул. Ключевая 54-121"))
        .stdout(predicate::str::contains("Phone:   -"));
}

#[test]
fn process_with_custom_catalog() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"catalog": {"use_builtin": false, "extra_streets": [{"name": "Тестовая", "type": "наб."}]}}"#,
    )
    .unwrap();

    cellparse()
        .args(["-c", config_path.to_str().unwrap(), "process", "Тестовая 7, пр. Науки 15"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""address":"наб. Тестовая 7""#));
}

#[test]
fn streets_find_and_list() {
    cellparse()
        .args(["streets", "find", "живет на пискаревском? нет, Пискаревский 5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("пр. Пискарёвский"));

    cellparse()
        .args(["streets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("пр. Науки"))
        .stdout(predicate::str::contains("дор. Кушелевская"));
}

#[test]
fn batch_appends_fields_and_writes_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    let out_dir = dir.path().join("out");
    fs::write(
        &input,
        format!("id,text\n1,\"{}\"\n2,\n3,Гражданство РФ\n", RECORD),
    )
    .unwrap();

    cellparse()
        .args([
            "batch",
            input.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--jobs",
            "2",
            "--summary",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 rows"));

    let mut reader = csv::Reader::from_path(out_dir.join("people.parsed.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "text", "address", "phone", "other_info"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][1], "");
    assert_eq!(&rows[0][2], "ул. Ключевая 14-1А-93");
    assert_eq!(&rows[0][3], "89011234567");
    assert_eq!(&rows[0][4], "Иванов Иван");
    // Nothing extracted: the source stays
    assert_eq!(&rows[2][1], "Гражданство РФ");
    assert_eq!(&rows[2][2], "");

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("people.csv,success,3,1,1,1,3,"));
}

#[test]
fn batch_keep_source() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("rows.csv");
    fs::write(&input, "note\nпр. Науки 15\n").unwrap();

    cellparse()
        .args(["batch", input.to_str().unwrap(), "--column", "note", "--keep-source"])
        .assert()
        .success();

    let output = fs::read_to_string(dir.path().join("rows.parsed.csv")).unwrap();
    assert!(output.contains("пр. Науки 15,пр. Науки 15,,"));
}

#[test]
fn batch_missing_column_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("rows.csv");
    fs::write(&input, "name\nИванов\n").unwrap();

    cellparse()
        .args(["batch", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'text' not found"));
}

#[test]
fn config_init_set_get() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("nested").join("config.json");
    let config_arg = config_path.to_str().unwrap();

    cellparse()
        .args(["-c", config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config_path.exists());

    cellparse()
        .args(["-c", config_arg, "config", "set", "extraction.phone_scan", "tail"])
        .assert()
        .success();

    cellparse()
        .args(["-c", config_arg, "config", "get", "extraction.phone_scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tail\""));

    cellparse()
        .args(["-c", config_arg, "config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();
}
