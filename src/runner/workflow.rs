//! Device workflow shared by the interactive menu and the subcommands

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::io::{self, Write};

use crate::driver::ios::{self, normalize_version};
use crate::driver::traits::DeviceBackend;
use crate::parser::coordinates::Coordinates;
use crate::runner::process::{ToolOutput, ToolRunner};
use crate::utils::config::Config;

/// Outcome of preparing a device for location simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// Version unknown or outside the mount policy
    NotRequired,
    /// No image/signature pair for this version
    ImageMissing,
    /// Mount tool ran; `true` if it reported success
    Attempted(bool),
}

pub struct Workflow<B, R> {
    pub backend: B,
    pub runner: R,
    pub config: Config,
}

impl<B: DeviceBackend, R: ToolRunner> Workflow<B, R> {
    pub fn new(backend: B, runner: R, config: Config) -> Self {
        Self {
            backend,
            runner,
            config,
        }
    }

    /// Attached device UDIDs (empty if none)
    pub async fn devices(&self) -> Result<Vec<String>> {
        ios::list_connected_devices(&self.backend, self.config.device_timeout())
            .await
            .context("Failed to list connected devices")
    }

    /// OS version of a device, empty if it could not be read
    pub async fn os_version(&self, udid: &str) -> String {
        ios::get_os_version(
            &self.backend,
            udid,
            &self.config.connection_label,
            self.config.device_timeout(),
        )
        .await
    }

    /// Probe the device version and mount a disk image when the policy
    /// asks for one. Mount problems are reported, never returned.
    pub async fn prepare_device<W: Write>(&self, udid: &str, out: &mut W) -> io::Result<MountOutcome> {
        let version = self.os_version(udid).await;
        if version.is_empty() {
            debug!("No version for {}, skipping disk image mount", udid);
            return Ok(MountOutcome::NotRequired);
        }
        writeln!(out, "Device {} is running iOS {}", udid.cyan(), version)?;

        if !self.config.mount_policy.allows(&version) {
            return Ok(MountOutcome::NotRequired);
        }

        let normalized = normalize_version(&version);
        let image = match ios::locate_disk_image(&self.config.disk_image_root, &normalized) {
            Some(image) => image,
            None => {
                writeln!(
                    out,
                    "{}",
                    format!("Developer disk image for iOS {} not found.", normalized).yellow()
                )?;
                return Ok(MountOutcome::ImageMissing);
            }
        };

        writeln!(out, "Mounting developer disk image for iOS {}...", normalized)?;
        let result = ios::mount_image(&self.runner, &self.config.mount_tool, &image).await;
        let ok = report_tool_output(out, &self.config.mount_tool, result)?;
        Ok(MountOutcome::Attempted(ok))
    }

    pub async fn set_location<W: Write>(
        &self,
        udid: &str,
        coordinates: Coordinates,
        out: &mut W,
    ) -> io::Result<bool> {
        let result =
            ios::set_location(&self.runner, &self.config.location_tool, udid, coordinates).await;
        report_tool_output(out, &self.config.location_tool, result)
    }

    pub async fn reset_location<W: Write>(&self, udid: &str, out: &mut W) -> io::Result<bool> {
        let result = ios::reset_location(&self.runner, &self.config.location_tool, udid).await;
        let ok = report_tool_output(out, &self.config.location_tool, result)?;
        writeln!(out, "Simulated location has been disabled.")?;
        Ok(ok)
    }
}

/// Relay a tool's stdout and stderr to the operator.
/// Returns whether the run looked successful.
pub fn report_tool_output<W: Write>(
    out: &mut W,
    tool: &str,
    result: Result<ToolOutput>,
) -> io::Result<bool> {
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            writeln!(out, "{} {:#}", "Error:".red(), e)?;
            return Ok(false);
        }
    };

    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        writeln!(out, "{}", stdout)?;
    }
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        writeln!(out, "{} {}", "Error:".red(), stderr)?;
    } else if !output.success {
        writeln!(out, "{} {} exited with a failure status", "Error:".red(), tool)?;
    }
    Ok(!output.failed())
}
