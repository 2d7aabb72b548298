use std::fs;
use std::path::Path;

use assert_cmd::Command;
use filetime::FileTime;
use predicates::prelude::*;
use tempfile::TempDir;

fn source_tree() -> TempDir {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join(".ignorecomments"), "*.log\n").unwrap();
    write(source.path(), "app.py", "print('hi')  # ¤ remove me\n# keep me\n");
    write(source.path(), "docs/guide.md", "Guide<!--¤ draft --> done\n");
    write(source.path(), "debug.log", "noise\n");
    source
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
}

fn draincleaner() -> Command {
    let mut cmd = Command::cargo_bin("draincleaner").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_output() {
    draincleaner()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mirror a source tree"))
        .stdout(predicate::str::contains("<SOURCEPATH>"))
        .stdout(predicate::str::contains("<TARGETPATH>"))
        .stdout(predicate::str::contains("--remove-all"))
        .stdout(predicate::str::contains("--replace-all"))
        .stdout(predicate::str::contains("--show-prints"))
        .stdout(predicate::str::contains("--follow-symlinks"));
}

#[test]
fn test_version_output() {
    draincleaner()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_arguments_prints_usage() {
    draincleaner()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_target_argument() {
    draincleaner()
        .arg("src")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<TARGETPATH>"));
}

#[test]
fn test_sync_mirrors_tree() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let target = out.path().join("mirror");

    draincleaner()
        .arg(source.path())
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("NEW FILE: app.py in app.py"))
        .stdout(predicate::str::contains("NEW FILE: guide.md in docs/guide.md"))
        .stdout(predicate::str::contains("debug.log").not())
        .stdout(predicate::str::contains("\x1b[").not());

    assert_eq!(
        fs::read_to_string(target.join("app.py")).unwrap(),
        "print('hi')\n# keep me\n"
    );
    assert_eq!(
        fs::read_to_string(target.join("docs/guide.md")).unwrap(),
        "Guide done\n"
    );
    assert!(!target.join("debug.log").exists());
    assert!(
        source
            .path()
            .join(".draincleaner/draincleaner.json")
            .is_file()
    );
}

#[test]
fn test_second_run_reports_nothing() {
    let source = source_tree();
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success();

    draincleaner()
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_verbose_progress_and_summary() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let target = out.path().join("mirror");

    draincleaner()
        .arg("-v")
        .arg(source.path())
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist, creating..."))
        .stdout(predicate::str::contains("Initialize metadata storage:"))
        .stdout(predicate::str::contains(
            "Removing prefixed comments from app.py",
        ))
        .stdout(predicate::str::contains("Writing guide.md  =>  "))
        .stdout(predicate::str::contains("=== Sync Summary ==="))
        .stdout(predicate::str::contains("Status: ✓ Success"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let target = out.path().join("mirror");

    draincleaner()
        .args(["--dry-run", "--verbose"])
        .arg(source.path())
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("NEW FILE: app.py in app.py"))
        .stdout(predicate::str::contains("Sync Summary (dry run)"));

    assert!(!target.exists());
    assert!(!source.path().join(".draincleaner").exists());
}

#[test]
fn test_remove_all_flag() {
    let source = source_tree();
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg("-r")
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.path().join("app.py")).unwrap(),
        "print('hi')\n"
    );
}

#[test]
fn test_show_prints_and_strings() {
    let source = source_tree();
    let out = TempDir::new().unwrap();

    draincleaner()
        .args(["-p", "-s"])
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("print statements in"))
        .stdout(predicate::str::contains(" 1: print('hi')  # ¤ remove me"))
        .stdout(predicate::str::contains("Strings in"))
        .stdout(predicate::str::contains(" 1: 'hi'"));
}

#[test]
fn test_colored_output() {
    let source = source_tree();
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg("--colored")
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
}

#[test]
fn test_missing_ignore_file_fails() {
    let source = TempDir::new().unwrap();
    write(source.path(), "app.py", "x = 1\n");
    let out = TempDir::new().unwrap();
    let target = out.path().join("mirror");

    draincleaner()
        .arg(source.path())
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ignore file not found"));

    assert!(!target.exists());
}

#[test]
fn test_missing_source_fails() {
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg(out.path().join("nope"))
        .arg(out.path().join("mirror"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("source path is not a directory"));
}

#[test]
fn test_missing_config_file_fails() {
    let source = source_tree();
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg("--config")
        .arg(out.path().join("absent.toml"))
        .arg(source.path())
        .arg(out.path().join("mirror"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_config_file_changes_extensions() {
    let source = source_tree();
    fs::create_dir_all(source.path().join(".draincleaner")).unwrap();
    fs::write(
        source.path().join(".draincleaner/config.toml"),
        "source_extensions = [\"py\", \"pyw\"]\n",
    )
    .unwrap();
    write(source.path(), "gui.pyw", "run()  # ¤ hidden\n");
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg(source.path())
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.path().join("gui.pyw")).unwrap(),
        "run()\n"
    );
    assert!(!out.path().join(".draincleaner").exists());
}

#[test]
fn test_per_file_error_fails_after_walk() {
    let source = source_tree();
    fs::write(source.path().join("broken.py"), b"x = '\xff'\n").unwrap();
    let out = TempDir::new().unwrap();

    draincleaner()
        .arg(source.path())
        .arg(out.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR: failed to decode"))
        .stderr(predicate::str::contains("1 file(s) failed to sync"));

    assert!(out.path().join("app.py").is_file());
    assert!(
        source
            .path()
            .join(".draincleaner/draincleaner.json")
            .is_file()
    );
}

#[test]
fn test_invalid_flag() {
    draincleaner()
        .args(["--bogus", "a", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_target_in_ignored_directory() {
    let source = source_tree();
    fs::write(source.path().join(".ignorecomments"), "*.log\ndist/\n").unwrap();
    let target = source.path().join("dist");

    draincleaner()
        .arg(source.path())
        .arg(&target)
        .assert()
        .success();
    assert!(target.join("app.py").is_file());

    draincleaner()
        .arg(source.path())
        .arg(source.path().join("mirror"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("lies inside source path"));
}
