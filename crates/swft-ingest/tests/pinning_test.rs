//! Content-addressed pinning.

use std::fs;

use swft_core::digest::sha256_hex;
use swft_core::errors::FileError;
use swft_ingest::pin_source_file;
use tempfile::TempDir;

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn repeated_pin_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("catalog.json");
    fs::write(&source, b"{\"catalog\": {}}").unwrap();
    let dest = dir.path().join("pinned");

    let first = pin_source_file(&source, &dest, "nist").unwrap();
    let modified = fs::metadata(&first.path).unwrap().modified().unwrap();
    let second = pin_source_file(&source, &dest, "nist").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.sha256, sha256_hex(b"{\"catalog\": {}}"));
    assert_eq!(fs::metadata(&second.path).unwrap().modified().unwrap(), modified);
    assert_eq!(
        entries(&dest),
        vec![format!("nist-{}.json", &first.sha256[..12])]
    );
}

#[test]
fn differing_content_never_collides() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("pinned");
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    fs::write(&a, b"[1]").unwrap();
    fs::write(&b, b"[2]").unwrap();

    let pin_a = pin_source_file(&a, &dest, "doc").unwrap();
    let pin_b = pin_source_file(&b, &dest, "doc").unwrap();
    assert_ne!(pin_a.path, pin_b.path);
    assert_eq!(fs::read(&pin_a.path).unwrap(), b"[1]");
    assert_eq!(fs::read(&pin_b.path).unwrap(), b"[2]");
    assert_eq!(entries(&dest).len(), 2);
}

#[test]
fn existing_pin_is_never_rewritten() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("report.tar.gz");
    fs::write(&source, b"archive").unwrap();
    let dest = dir.path().join("pinned");

    let pin = pin_source_file(&source, &dest, "report").unwrap();
    assert!(pin.path.to_str().unwrap().ends_with(".tar.gz"));

    // Tamper with the pin; re-pinning the original must not repair it.
    fs::write(&pin.path, b"tampered").unwrap();
    pin_source_file(&source, &dest, "report").unwrap();
    assert_eq!(fs::read(&pin.path).unwrap(), b"tampered");
}

#[test]
fn unreadable_source_fails() {
    let dir = TempDir::new().unwrap();
    let err = pin_source_file(&dir.path().join("missing.json"), dir.path(), "x").unwrap_err();
    assert!(matches!(err, FileError::Unreadable { .. }));
}
