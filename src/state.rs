//! Persisted version state.
//!
//! One file, one record: the last release row that went out to recipients.
//! Comparison happens on a whitespace-free normalization; the raw record
//! plus a trailing newline is what lands on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Remove all whitespace. The equality key for release records; never shown
/// to recipients.
pub fn normalize(record: &str) -> String {
    record.split_whitespace().collect()
}

/// Read the last notified version in normalized form.
///
/// Absence or unreadability is the expected first-run state and yields an
/// empty string.
pub fn read_last_version(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => normalize(&content),
        Err(_) => String::new(),
    }
}

/// Overwrite the state file with the raw record plus a trailing newline,
/// creating parent directories as needed.
pub fn write_latest_version(path: &Path, record: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state dir: {}", parent.display()))?;
        }
    }
    fs::write(path, format!("{record}\n"))
        .with_context(|| format!("failed to write state file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_all_whitespace() {
        assert_eq!(
            normalize("macOS Sequoia 15.6\nmacOS\n29 Jul 2025\n"),
            "macOSSequoia15.6macOS29Jul2025"
        );
        assert_eq!(normalize("  \t \n "), "");
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_last_version(&dir.path().join("absent.txt")), "");
    }

    #[test]
    fn test_write_then_read_round_trips_up_to_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("last-version.txt");
        let record = "macOS Sequoia 15.6\nmacOS\n29 Jul 2025";

        write_latest_version(&path, record).unwrap();

        assert_eq!(read_last_version(&path), normalize(record));
        // Raw form is preserved verbatim plus the trailing newline.
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{record}\n"));
    }

    #[test]
    fn test_write_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-version.txt");

        write_latest_version(&path, "macOS 14.5").unwrap();
        write_latest_version(&path, "macOS 15.0").unwrap();

        assert_eq!(read_last_version(&path), "macOS15.0");
    }
}
