//! Integration tests for CLI

use assert_cmd::Command;
use git2::{Repository, Signature};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn merger() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("codebase-merger"))
}

/// Commit every file under `dir` into a fresh repository rooted there.
fn commit_all(dir: &Path) {
    let repo = Repository::init(dir).expect("init");
    let mut index = repo.index().expect("index");
    index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None).expect("add");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = Signature::now("Fixture", "fixture@example.com").expect("sig");
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).expect("commit");
}

fn create_fixture_repo() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    fs::create_dir_all(root.join("src/main")).expect("mkdir");
    fs::create_dir_all(root.join("src/test")).expect("mkdir");
    fs::write(root.join("README.md"), "# Fixture\n").expect("write");
    fs::write(root.join("src/main/app.py"), "print('app')\n").expect("write");
    fs::write(root.join("src/test/test_app.py"), "def test_app():\n    pass\n").expect("write");
    fs::write(root.join("binary_file.bin"), [0u8, 1, 2, 3, 0, 255]).expect("write");
    commit_all(root);
    tmp
}

#[test]
fn test_cli_version() {
    merger().arg("--version").assert().success().stdout(predicate::str::contains("codebase-merger"));
}

#[test]
fn test_cli_help() {
    merger()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge an entire repository"))
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--max-size"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_missing_repo_url_fails() {
    merger().assert().failure().stderr(predicate::str::contains("REPO_URL"));
}

#[test]
fn test_clone_failure_exits_nonzero() {
    let work = TempDir::new().expect("work");
    merger()
        .current_dir(work.path())
        .arg(work.path().join("does-not-exist").to_str().expect("utf8"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Cloning repository:"))
        .stderr(predicate::str::contains("Failed to clone the repository."));

    assert!(!work.path().join("merged_codebase.txt").exists());
}

#[test]
fn test_invalid_exclude_pattern_fails_before_clone() {
    let work = TempDir::new().expect("work");
    merger()
        .current_dir(work.path())
        .args(["https://example.invalid/repo.git", "-e", "(unclosed"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cloning repository").not())
        .stderr(predicate::str::contains("(unclosed"));
}

#[test]
fn test_merge_local_repository() {
    let fixture = create_fixture_repo();
    let work = TempDir::new().expect("work");

    merger()
        .current_dir(work.path())
        .arg(fixture.path().to_str().expect("utf8"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing repository..."))
        .stdout(predicate::str::contains("  Processing: README.md"))
        .stdout(predicate::str::contains("Done! Processed 3 files."))
        .stdout(predicate::str::contains("Output written to: merged_codebase.txt"));

    let merged = fs::read_to_string(work.path().join("merged_codebase.txt")).expect("read");
    assert!(merged.starts_with("# MERGED CODEBASE: "));
    assert!(merged.contains("FILE: README.md\n"));
    assert!(merged.contains("FILE: src/main/app.py\n"));
    assert!(merged.contains("FILE: src/test/test_app.py\n"));
    assert!(!merged.contains("binary_file.bin"));
    assert!(!merged.contains("FILE: .git"));
    assert_eq!(merged.matches("\nFILE: ").count(), 3);
}

#[test]
fn test_exclude_pattern_and_output_path() {
    let fixture = create_fixture_repo();
    let work = TempDir::new().expect("work");

    merger()
        .current_dir(work.path())
        .arg(fixture.path().to_str().expect("utf8"))
        .args(["-e", "^src/test/", "-o", "custom.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done! Processed 2 files."));

    let merged = fs::read_to_string(work.path().join("custom.txt")).expect("read");
    assert!(merged.contains("FILE: src/main/app.py\n"));
    assert!(!merged.contains("test_app.py"));
    assert!(!work.path().join("merged_codebase.txt").exists());
}

#[test]
fn test_zero_max_size_keeps_only_empty_files() {
    let fixture = create_fixture_repo();
    let work = TempDir::new().expect("work");

    merger()
        .current_dir(work.path())
        .arg(fixture.path().to_str().expect("utf8"))
        .args(["-m", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done! Processed 0 files."));

    let merged = fs::read_to_string(work.path().join("merged_codebase.txt")).expect("read");
    assert!(!merged.contains("FILE: "));
}

#[test]
fn test_config_file_supplies_defaults() {
    let fixture = create_fixture_repo();
    let work = TempDir::new().expect("work");
    fs::write(
        work.path().join("codebase-merger.toml"),
        "output = 'from_config.txt'\nexclude = ['\\.md$']\n",
    )
    .expect("write config");

    merger()
        .current_dir(work.path())
        .arg(fixture.path().to_str().expect("utf8"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Done! Processed 2 files."));

    let merged = fs::read_to_string(work.path().join("from_config.txt")).expect("read");
    assert!(!merged.contains("README.md"));
}

#[test]
fn test_report_written() {
    let fixture = create_fixture_repo();
    let work = TempDir::new().expect("work");

    merger()
        .current_dir(work.path())
        .arg(fixture.path().to_str().expect("utf8"))
        .args(["--report", "report.json", "--no-timestamp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to: report.json"));

    let raw = fs::read_to_string(work.path().join("report.json")).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(report["schema_version"], "1.0.0");
    assert!(report.get("generated_at").is_none());
    assert_eq!(report["stats"]["files_included"], 3);
    assert_eq!(report["stats"]["files_skipped_content_type"], 1);
}

#[test]
fn test_completions_generated() {
    merger()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("codebase-merger"));
}
