//! Modification timestamps as signed nanoseconds since the Unix epoch

use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::error::Result;

/// Timestamp extraction for snapshot records
pub struct TimestampComparator;

impl TimestampComparator {
    /// Modification time of `metadata` in nanoseconds
    ///
    /// # Errors
    ///
    /// Returns an error if the platform does not expose modification times.
    pub fn mtime_ns(metadata: &Metadata) -> Result<i64> {
        let modified = metadata
            .modified()
            .context("Failed to get modification time")?;
        Ok(Self::to_nanos(modified))
    }

    /// Convert a `SystemTime` to nanoseconds, negative before the epoch
    #[must_use]
    pub fn to_nanos(time: SystemTime) -> i64 {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_nanos())
                .map(|n| -n)
                .unwrap_or(i64::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    use filetime::FileTime;
    use tempfile::TempDir;

    #[test]
    fn test_epoch_and_offsets() {
        assert_eq!(TimestampComparator::to_nanos(UNIX_EPOCH), 0);
        let later = UNIX_EPOCH + Duration::new(2, 5);
        assert_eq!(TimestampComparator::to_nanos(later), 2_000_000_005);
        let earlier = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(TimestampComparator::to_nanos(earlier), -1_000_000_000);
    }

    #[test]
    fn test_mtime_from_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "content").unwrap();
        filetime::set_file_mtime(&file, FileTime::from_unix_time(1_700_000_000, 42)).unwrap();

        let metadata = fs::metadata(&file).unwrap();
        let ns = TimestampComparator::mtime_ns(&metadata).unwrap();
        assert_eq!(ns, 1_700_000_000_000_000_042);
    }
}
