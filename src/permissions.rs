// SPDX-License-Identifier: GPL-3.0-only

//! Startup access checks for camera devices and the capture directory
//!
//! Checked once on screen entry. Detection never gates binding: when access
//! is missing the bind simply fails inside the camera layer, and the report
//! here lets the UI show a useful hint instead of a bare failure.

use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::storage::MediaStore;

/// Result of the startup access probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessReport {
    /// At least one camera device node is readable and writable
    pub camera_ok: bool,
    /// The capture directory exists (or could be created) and is writable
    pub storage_ok: bool,
    /// User-facing advice when camera hardware exists but cannot be opened
    pub advice: Option<String>,
}

impl AccessReport {
    /// Whether anything is worth warning the user about
    pub fn has_warning(&self) -> bool {
        !self.camera_ok || !self.storage_ok || self.advice.is_some()
    }
}

/// Probe camera device nodes and the capture directory.
pub fn check(store: &MediaStore) -> AccessReport {
    let (camera_ok, advice) = check_camera_nodes();
    let storage_ok = check_capture_dir(&store.capture_dir());

    info!(camera_ok, storage_ok, "Access check complete");
    AccessReport {
        camera_ok,
        storage_ok,
        advice,
    }
}

/// Scan `/dev/video*` nodes for one we can open for capture.
fn check_camera_nodes() -> (bool, Option<String>) {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        warn!("Cannot read /dev — camera access check skipped");
        return (false, None);
    };

    let mut denied: Vec<PathBuf> = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else {
            continue;
        };
        if !name_str.starts_with("video") {
            continue;
        }

        let path = entry.path();
        match std::fs::OpenOptions::new().read(true).write(true).open(&path) {
            Ok(_) => return (true, None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Camera node not accessible");
                denied.push(path);
            }
        }
    }

    if denied.is_empty() {
        // No camera hardware at all; nothing actionable to advise
        (false, None)
    } else {
        (false, Some(build_permission_advice(&denied)))
    }
}

/// Whether the capture directory is usable
fn check_capture_dir(dir: &Path) -> bool {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Capture directory not writable");
        return false;
    }
    !std::fs::metadata(dir)
        .map(|meta| meta.permissions().readonly())
        .unwrap_or(true)
}

/// Build a user-friendly permission advice message.
///
/// Dynamically detects the current username, the required group from device
/// ownership, and whether `doas` or `sudo` is available.
fn build_permission_advice(denied: &[PathBuf]) -> String {
    let username = std::env::var("USER").unwrap_or_else(|_| "user".to_string());

    let escalation_tool = if Path::new("/usr/bin/doas").exists() {
        "doas"
    } else {
        "sudo"
    };

    // Resolve the owning group of the first denied node
    let group = denied
        .first()
        .and_then(|path| {
            let meta = std::fs::metadata(path).ok()?;
            let gid = meta.gid();
            let group_contents = std::fs::read_to_string("/etc/group").ok()?;
            for line in group_contents.lines() {
                let parts: Vec<&str> = line.split(':').collect();
                if parts.len() >= 3 && parts[2].parse::<u32>().ok() == Some(gid) {
                    return Some(parts[0].to_string());
                }
            }
            None
        })
        .unwrap_or_else(|| "video".to_string());

    format!(
        "Camera devices found but cannot be opened.\n\n\
         Run: {escalation_tool} adduser {username} {group}\n\n\
         Then log out and back in."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_dir_created_and_writable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("DCIM/Camera");
        assert!(check_capture_dir(&dir));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_advice_names_an_escalation_command() {
        let advice = build_permission_advice(&[PathBuf::from("/dev/video0")]);
        assert!(advice.contains("adduser"));
        assert!(advice.contains("log out"));
    }

    #[test]
    fn test_report_warning_flag() {
        let clean = AccessReport {
            camera_ok: true,
            storage_ok: true,
            advice: None,
        };
        assert!(!clean.has_warning());

        let denied = AccessReport {
            camera_ok: false,
            storage_ok: true,
            advice: Some("join the video group".to_string()),
        };
        assert!(denied.has_warning());
    }
}
