//! Snapshot comparison and change classification
//!
//! Classification is purely metadata based: a file is modified when its
//! modification time changed. Size is carried in the records but a size
//! change alone never marks a file modified.

mod timestamp;

#[cfg(test)]
mod integration_tests;

use std::collections::BTreeSet;

pub use timestamp::TimestampComparator;

use crate::scanner::Snapshot;

/// Classification of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present now, absent from the previous snapshot
    New,
    /// Present in both with a different modification time
    Modified,
    /// Present before, absent now
    Removed,
    /// Present in both with the same modification time
    Unchanged,
}

/// Disjoint sets of changed relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Paths only in the current snapshot
    pub new: BTreeSet<String>,
    /// Paths in both snapshots whose modification time differs
    pub modified: BTreeSet<String>,
    /// Paths only in the previous snapshot
    pub removed: BTreeSet<String>,
}

impl ChangeSet {
    /// Classify a path of the current snapshot
    #[must_use]
    pub fn kind_of(&self, rel_path: &str) -> ChangeKind {
        if self.new.contains(rel_path) {
            ChangeKind::New
        } else if self.modified.contains(rel_path) {
            ChangeKind::Modified
        } else if self.removed.contains(rel_path) {
            ChangeKind::Removed
        } else {
            ChangeKind::Unchanged
        }
    }

    /// Whether the file is new or modified and so must be reprocessed
    #[must_use]
    pub fn needs_processing(&self, rel_path: &str) -> bool {
        self.new.contains(rel_path) || self.modified.contains(rel_path)
    }

    /// Total number of classified changes
    #[must_use]
    pub fn total(&self) -> usize {
        self.new.len() + self.modified.len() + self.removed.len()
    }

    /// Whether nothing changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Diffs a previous snapshot against the current one
pub struct ChangeClassifier;

impl ChangeClassifier {
    /// Classify every path of both snapshots
    #[must_use]
    pub fn classify(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for (rel, record) in current {
            match previous.get(rel) {
                None => {
                    changes.new.insert(rel.clone());
                }
                Some(old) if old.mtime_ns != record.mtime_ns => {
                    changes.modified.insert(rel.clone());
                }
                Some(_) => {}
            }
        }

        changes.removed = previous
            .keys()
            .filter(|rel| !current.contains_key(*rel))
            .cloned()
            .collect();

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;

    fn snapshot(entries: &[(&str, i64, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|(rel, mtime_ns, size)| {
                (
                    (*rel).to_string(),
                    FileRecord {
                        mtime_ns: *mtime_ns,
                        size: *size,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let s = snapshot(&[("a.py", 1, 10), ("b/c.md", 2, 20)]);
        let changes = ChangeClassifier::classify(&s, &s);
        assert!(changes.is_empty());
        assert_eq!(changes.kind_of("a.py"), ChangeKind::Unchanged);
    }

    #[test]
    fn test_empty_snapshots() {
        let changes = ChangeClassifier::classify(&Snapshot::new(), &Snapshot::new());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_mtime_change_is_modified() {
        let before = snapshot(&[("a.py", 1, 10), ("b.py", 5, 10)]);
        let after = snapshot(&[("a.py", 2, 10), ("b.py", 5, 10)]);
        let changes = ChangeClassifier::classify(&before, &after);

        assert_eq!(changes.modified.iter().collect::<Vec<_>>(), vec!["a.py"]);
        assert!(changes.new.is_empty());
        assert!(changes.removed.is_empty());
        assert_eq!(changes.kind_of("a.py"), ChangeKind::Modified);
    }

    #[test]
    fn test_size_change_alone_is_not_modified() {
        let before = snapshot(&[("a.py", 1, 10)]);
        let after = snapshot(&[("a.py", 1, 99)]);
        let changes = ChangeClassifier::classify(&before, &after);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_new_and_removed() {
        let before = snapshot(&[("gone.py", 1, 1), ("kept.py", 1, 1)]);
        let after = snapshot(&[("kept.py", 1, 1), ("fresh.py", 3, 1)]);
        let changes = ChangeClassifier::classify(&before, &after);

        assert_eq!(changes.new.iter().collect::<Vec<_>>(), vec!["fresh.py"]);
        assert_eq!(changes.removed.iter().collect::<Vec<_>>(), vec!["gone.py"]);
        assert!(changes.modified.is_empty());
        assert!(changes.needs_processing("fresh.py"));
        assert!(!changes.needs_processing("kept.py"));
        assert!(!changes.needs_processing("gone.py"));
        assert_eq!(changes.total(), 2);
    }

    #[test]
    fn test_cold_start_marks_everything_new() {
        let current = snapshot(&[("a.py", 1, 1), ("b.md", 1, 1)]);
        let changes = ChangeClassifier::classify(&Snapshot::new(), &current);
        assert_eq!(changes.new.len(), 2);
    }

    #[test]
    fn test_file_turned_directory_is_removed() {
        // `pkg` was a file; now it is a directory holding `pkg/x.py`
        let before = snapshot(&[("pkg", 1, 1)]);
        let after = snapshot(&[("pkg/x.py", 2, 1)]);
        let changes = ChangeClassifier::classify(&before, &after);

        assert_eq!(changes.kind_of("pkg"), ChangeKind::Removed);
        assert_eq!(changes.kind_of("pkg/x.py"), ChangeKind::New);
    }
}
