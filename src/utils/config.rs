use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::ios::MountPolicy;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ios-location-simulator.yaml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory holding `<major>.<minor>/DeveloperDiskImage.dmg`
    pub disk_image_root: PathBuf,

    /// Disk image mounting tool (name or path)
    pub mount_tool: String,

    /// Location simulation tool (name or path)
    pub location_tool: String,

    /// Major versions that need a disk image mounted
    pub mount_policy: MountPolicy,

    /// Upper bound for each device protocol call (s)
    pub device_timeout_secs: u64,

    /// Upper bound for each external tool run (s)
    pub tool_timeout_secs: u64,

    /// Clear the terminal before menu and help screens
    pub clear_screen: bool,

    /// Label sent to the device when opening connections
    pub connection_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disk_image_root: PathBuf::from("DeveloperDiskImages"),
            mount_tool: "ideviceimagemounter".to_string(),
            location_tool: "idevicesetlocation".to_string(),
            mount_policy: MountPolicy::default(),
            device_timeout_secs: 30,
            tool_timeout_secs: 60,
            clear_screen: true,
            connection_label: "ios-location-simulator".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit file, else from `ios-location-simulator.yaml`
    /// in the working directory if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.mount_policy.min_major > config.mount_policy.max_major {
            anyhow::bail!(
                "mount_policy.min_major ({}) is greater than max_major ({})",
                config.mount_policy.min_major,
                config.mount_policy.max_major
            );
        }
        Ok(config)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.disk_image_root, PathBuf::from("DeveloperDiskImages"));
        assert_eq!(config.location_tool, "idevicesetlocation");
        assert_eq!(config.mount_policy, MountPolicy::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            r#"
disk_image_root: /opt/ddi
mount_policy:
  min_major: 14
  max_major: 16
"#,
        )
        .unwrap();
        assert_eq!(config.disk_image_root, PathBuf::from("/opt/ddi"));
        assert_eq!(config.mount_policy.min_major, 14);
        assert_eq!(config.mount_tool, "ideviceimagemounter");
        assert_eq!(config.tool_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_inverted_policy_rejected() {
        let result = Config::from_yaml("mount_policy: { min_major: 17, max_major: 16 }");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/locsim.yaml")));
        assert!(result.is_err());
    }
}
