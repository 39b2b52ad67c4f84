//! Developer Disk Image lookup
//!
//! Images live under `<root>/<major>.<minor>/DeveloperDiskImage.dmg` with a
//! sibling `.signature` file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const IMAGE_FILE_NAME: &str = "DeveloperDiskImage.dmg";
pub const SIGNATURE_EXTENSION: &str = "signature";

/// Image and signature pair for one iOS version
#[derive(Debug, Clone, PartialEq)]
pub struct DiskImage {
    pub image_path: PathBuf,
    pub signature_path: PathBuf,
}

/// Truncate a version to major.minor ("16.0.1" -> "16.0").
/// Versions with fewer than two components are returned unchanged.
pub fn normalize_version(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() >= 2 {
        format!("{}.{}", parts[0], parts[1])
    } else {
        version.to_string()
    }
}

/// Find the image pair for a normalized version under `root`.
/// Returns `None` if either file is missing.
pub fn locate_disk_image(root: &Path, normalized_version: &str) -> Option<DiskImage> {
    let image_path = root.join(normalized_version).join(IMAGE_FILE_NAME);
    let signature_path = PathBuf::from(format!(
        "{}.{}",
        image_path.display(),
        SIGNATURE_EXTENSION
    ));

    if !image_path.is_file() || !signature_path.is_file() {
        return None;
    }

    Some(DiskImage {
        image_path,
        signature_path,
    })
}

/// Which iOS major versions get a disk image mounted before setting location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountPolicy {
    pub min_major: u32,
    pub max_major: u32,
}

impl Default for MountPolicy {
    fn default() -> Self {
        Self {
            min_major: 16,
            max_major: 16,
        }
    }
}

impl MountPolicy {
    /// Whether a full version string ("16.0.2") falls in the mount range.
    /// Empty or non-numeric versions never mount.
    pub fn allows(&self, version: &str) -> bool {
        let major = version.split('.').next().unwrap_or_default();
        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        match major.parse::<u32>() {
            Ok(m) => m >= self.min_major && m <= self.max_major,
            Err(_) => false,
        }
    }
}
