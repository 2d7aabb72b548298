//! Classification of real scans across simulated runs

use std::fs;
use std::path::Path;

use filetime::FileTime;
use tempfile::TempDir;

use super::{ChangeClassifier, ChangeKind};
use crate::config::{Config, IgnoreMatcher};
use crate::scanner::{EntryFilter, Scanner, Snapshot};

fn scan(root: &Path) -> Snapshot {
    let matcher = IgnoreMatcher::from_file(root, ".ignorecomments").unwrap();
    let filter = EntryFilter::new(&Config::default(), matcher);
    Scanner::new(&filter, false).snapshot(root).unwrap()
}

fn write_at(root: &Path, rel: &str, content: &str, secs: i64) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

#[test]
fn test_rescan_without_changes() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".ignorecomments"), "").unwrap();
    write_at(tmp.path(), "a.py", "a = 1\n", 1_000);
    write_at(tmp.path(), "docs/b.md", "b\n", 1_000);

    let first = scan(tmp.path());
    let second = scan(tmp.path());

    assert!(ChangeClassifier::classify(&first, &second).is_empty());
}

#[test]
fn test_touch_edit_delete_between_scans() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".ignorecomments"), "").unwrap();
    write_at(tmp.path(), "touched.py", "same\n", 1_000);
    write_at(tmp.path(), "deleted.py", "bye\n", 1_000);
    write_at(tmp.path(), "steady.py", "steady\n", 1_000);

    let before = scan(tmp.path());

    write_at(tmp.path(), "touched.py", "same\n", 2_000);
    fs::remove_file(tmp.path().join("deleted.py")).unwrap();
    write_at(tmp.path(), "added.md", "hello\n", 2_000);

    let after = scan(tmp.path());
    let changes = ChangeClassifier::classify(&before, &after);

    assert_eq!(changes.kind_of("touched.py"), ChangeKind::Modified);
    assert_eq!(changes.kind_of("deleted.py"), ChangeKind::Removed);
    assert_eq!(changes.kind_of("added.md"), ChangeKind::New);
    assert_eq!(changes.kind_of("steady.py"), ChangeKind::Unchanged);
    assert_eq!(changes.total(), 3);
}

#[test]
fn test_newly_ignored_file_reported_removed() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".ignorecomments"), "").unwrap();
    write_at(tmp.path(), "scratch.py", "tmp\n", 1_000);

    let before = scan(tmp.path());
    fs::write(tmp.path().join(".ignorecomments"), "scratch.py\n").unwrap();
    let after = scan(tmp.path());

    let changes = ChangeClassifier::classify(&before, &after);
    assert_eq!(changes.kind_of("scratch.py"), ChangeKind::Removed);
}
