use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn geoquery(dataset: &Path, rect: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geoquery"))
        .arg(dataset)
        .arg(rect)
        .arg(output)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run geoquery")
}

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let data = dir.join("data");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("parcels.wkt"),
        "# id\tgeometry\n\
         7\tPOLYGON((0 0, 2 0, 2 2, 0 2, 0 0))\n\
         3\tPOLYGON((5 5, 6 5, 6 6, 5 6, 5 5))\n",
    )
    .unwrap();
    fs::write(
        data.join("zones.wkt"),
        "5\tMULTIPOLYGON(((1 1, 2 1, 2 2, 1 1)), ((2.5 2.5, 3 2.5, 3 3, 2.5 2.5)))\n\
         11\tLINESTRING(0 0, 100 100)\n\
         not-an-id\tPOLYGON((0 0, 1 0, 1 1, 0 0))\n",
    )
    .unwrap();
    data
}

#[test]
fn test_query_writes_sorted_ids() {
    let dir = tempdir().unwrap();
    let data = write_dataset(dir.path());
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "1.5 1.5 5.5 5.5\n").unwrap();

    let output = geoquery(&data, &rect, &out);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&out).unwrap(), "3\n5\n7\n");
}

#[test]
fn test_touching_query_counts() {
    let dir = tempdir().unwrap();
    let data = write_dataset(dir.path());
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "6 6 8 8").unwrap();

    let output = geoquery(&data, &rect, &out);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&out).unwrap(), "3\n");
}

#[test]
fn test_empty_result_writes_empty_file() {
    let dir = tempdir().unwrap();
    let data = write_dataset(dir.path());
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "50 50 60 60").unwrap();

    let output = geoquery(&data, &rect, &out);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_missing_dataset_fails() {
    let dir = tempdir().unwrap();
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "0 0 1 1").unwrap();

    let output = geoquery(&dir.path().join("missing"), &rect, &out);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot open dataset"));
    assert!(!out.exists());
}

#[test]
fn test_malformed_rect_fails_without_output() {
    let dir = tempdir().unwrap();
    let data = write_dataset(dir.path());
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "0 0 one 1").unwrap();

    let output = geoquery(&data, &rect, &out);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_inverted_rect_fails_without_output() {
    let dir = tempdir().unwrap();
    let data = write_dataset(dir.path());
    let rect = dir.path().join("rect.txt");
    let out = dir.path().join("ids.txt");
    fs::write(&rect, "5 0 1 1").unwrap();

    let output = geoquery(&data, &rect, &out);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("inverted"));
    assert!(!out.exists());
}

#[test]
fn test_missing_arguments_fail() {
    let output = Command::new(env!("CARGO_BIN_EXE_geoquery"))
        .arg("data")
        .output()
        .expect("failed to run geoquery");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage:"));
}
