use anyhow::Result;
use std::path::{Path, PathBuf};

/// Directory name under the home directory holding user-installed tools
const INSTALL_DIR: &str = ".ios-location-simulator";

/// Resolve an external tool to an executable path.
///
/// Lookup order: an explicit path, `~/.ios-location-simulator/bin/`, the
/// directory of the current executable, then the system PATH.
pub fn find_binary(name: &str) -> Result<PathBuf> {
    let mut checked_paths = Vec::new();

    // 1. Explicit path (configured as e.g. /opt/libimobiledevice/bin/idevicesetlocation)
    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }
        checked_paths.push(format!("Explicit: {:?}", as_path));
    }

    let file_name = executable_name(name);

    // 2. Install directory (~/.ios-location-simulator/bin)
    if let Some(home) = dirs::home_dir() {
        let installed = home.join(INSTALL_DIR).join("bin").join(&file_name);
        checked_paths.push(format!("Install Dir: {:?}", installed));
        if installed.is_file() {
            return Ok(installed);
        }
    }

    // 3. Next to the running executable (bundled distributions)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let sibling = exe_dir.join(&file_name);
            checked_paths.push(format!("Sibling: {:?}", sibling));
            if sibling.is_file() {
                return Ok(sibling);
            }
        }
    } else {
        checked_paths.push("Failed to get current_exe".to_string());
    }

    // 4. Fallback to system PATH
    if let Ok(path) = which::which(name) {
        return Ok(path);
    }
    checked_paths.push("System PATH".to_string());

    Err(anyhow::anyhow!(
        "Could not find binary '{}'. Checked paths:\n{}",
        name,
        checked_paths.join("\n")
    ))
}

fn executable_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    if cfg!(windows) && !base.ends_with(".exe") {
        format!("{}.exe", base)
    } else {
        base
    }
}
