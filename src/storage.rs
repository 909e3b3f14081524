// SPDX-License-Identifier: GPL-3.0-only

//! Media store for captured photos
//!
//! Captures land below the media root under a fixed relative path
//! (`DCIM/Camera`), named after the capture instant. Name collisions are
//! resolved here with a numbered suffix, the way a platform media store
//! dedups display names.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::constants::CAPTURE_RELATIVE_PATH;
use crate::errors::StorageError;

/// Build the display name for a capture taken at `instant`.
///
/// Pattern: `yyyy_MMM_dd_HH_mm_ss` with US-English month abbreviations,
/// e.g. `2024_Jan_05_14_30_00`.
pub fn capture_file_name(instant: NaiveDateTime) -> String {
    instant.format("%Y_%b_%d_%H_%M_%S").to_string()
}

/// Where and under what name a capture should be saved
#[derive(Debug, Clone)]
pub struct SaveTarget {
    pub store: MediaStore,
    /// Display name without extension
    pub name: String,
}

/// Filesystem-backed media store
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Store rooted at the user's home directory (falling back to the
    /// working directory when no home is known)
    pub fn new_default() -> Self {
        Self {
            root: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Store rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory captures are written to
    pub fn capture_dir(&self) -> PathBuf {
        self.root.join(CAPTURE_RELATIVE_PATH)
    }

    /// Write encoded JPEG bytes under `name`, deduplicating collisions.
    ///
    /// Returns the path actually written.
    pub fn save_jpeg(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let dir = self.capture_dir();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::CreateDirFailed(format!("{}: {}", dir.display(), e)))?;

        let path = unique_path(&dir, name, "jpg");
        std::fs::write(&path, bytes)
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), bytes = bytes.len(), "Photo saved");
        Ok(path)
    }
}

/// First non-existing `name.ext`, `name (1).ext`, `name (2).ext`, … in `dir`
fn unique_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let direct = dir.join(format!("{name}.{ext}"));
    if !direct.exists() {
        return direct;
    }

    for n in 1u32.. {
        let candidate = dir.join(format!("{name} ({n}).{ext}"));
        if !candidate.exists() {
            debug!(path = %candidate.display(), "Display name collision, renamed");
            return candidate;
        }
    }

    unreachable!("ran out of dedup suffixes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_capture_file_name_pattern() {
        assert_eq!(capture_file_name(fixed_instant()), "2024_Jan_05_14_30_00");
    }

    #[test]
    fn test_capture_file_name_month_abbreviations() {
        let december = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(capture_file_name(december), "2025_Dec_31_23_59_59");
    }

    #[test]
    fn test_save_writes_under_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::with_root(tmp.path());

        let path = store.save_jpeg("2024_Jan_05_14_30_00", b"not-really-jpeg").unwrap();

        assert!(path.starts_with(tmp.path().join("DCIM/Camera")));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_Jan_05_14_30_00.jpg"
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"not-really-jpeg");
    }

    #[test]
    fn test_save_dedups_collisions() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::with_root(tmp.path());

        let first = store.save_jpeg("shot", b"a").unwrap();
        let second = store.save_jpeg("shot", b"b").unwrap();
        let third = store.save_jpeg("shot", b"c").unwrap();

        assert_eq!(first.file_name().unwrap().to_str().unwrap(), "shot.jpg");
        assert_eq!(second.file_name().unwrap().to_str().unwrap(), "shot (1).jpg");
        assert_eq!(third.file_name().unwrap().to_str().unwrap(), "shot (2).jpg");
    }
}
