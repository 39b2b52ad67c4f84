//! Non-interactive subcommands
//!
//! Same workflow as the menu, driven by command-line arguments instead of
//! prompts.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use crate::driver::traits::DeviceBackend;
use crate::parser::coordinates::Coordinates;
use crate::runner::process::ToolRunner;
use crate::runner::workflow::Workflow;

/// Attached device as reported by `devices`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeviceInfo {
    pub udid: String,
    /// Empty if the version could not be read
    pub product_version: String,
}

/// Choose the target device: the requested UDID, or the only one attached
pub fn pick_device(devices: &[String], requested: Option<&str>) -> Result<String> {
    if let Some(udid) = requested {
        if devices.iter().any(|d| d == udid) {
            return Ok(udid.to_string());
        }
        anyhow::bail!("Device {} is not connected", udid);
    }

    match devices {
        [] => anyhow::bail!("No devices connected. Please connect a device."),
        [only] => Ok(only.clone()),
        many => anyhow::bail!(
            "Multiple devices connected ({}). Pass --udid to choose one.",
            many.join(", ")
        ),
    }
}

pub async fn list_devices<B: DeviceBackend, R: ToolRunner, W: Write>(
    workflow: &Workflow<B, R>,
    json: bool,
    out: &mut W,
) -> Result<Vec<DeviceInfo>> {
    let mut infos = Vec::new();
    for udid in workflow.devices().await? {
        let product_version = workflow.os_version(&udid).await;
        infos.push(DeviceInfo {
            udid,
            product_version,
        });
    }

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&infos)?)?;
    } else if infos.is_empty() {
        writeln!(out, "No devices connected.")?;
    } else {
        writeln!(out, "Connected iOS devices:")?;
        for info in &infos {
            let version = if info.product_version.is_empty() {
                "unknown".to_string()
            } else {
                info.product_version.clone()
            };
            writeln!(out, "  {} (iOS {})", info.udid.cyan(), version)?;
        }
    }
    Ok(infos)
}

/// Returns whether the location tool reported success
pub async fn set_location<B: DeviceBackend, R: ToolRunner, W: Write>(
    workflow: &Workflow<B, R>,
    udid: Option<&str>,
    coordinates: Coordinates,
    out: &mut W,
) -> Result<bool> {
    let devices = workflow.devices().await?;
    let udid = pick_device(&devices, udid)?;
    workflow.prepare_device(&udid, out).await?;
    let ok = workflow.set_location(&udid, coordinates, out).await?;
    if ok {
        writeln!(
            out,
            "{} Location set to ({}, {}).",
            "✓".green(),
            coordinates.latitude,
            coordinates.longitude
        )?;
    }
    Ok(ok)
}

/// Returns whether the location tool reported success
pub async fn reset_location<B: DeviceBackend, R: ToolRunner, W: Write>(
    workflow: &Workflow<B, R>,
    udid: Option<&str>,
    out: &mut W,
) -> Result<bool> {
    let devices = workflow.devices().await?;
    let udid = pick_device(&devices, udid)?;
    Ok(workflow.reset_location(&udid, out).await?)
}
