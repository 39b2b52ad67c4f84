use anyhow::Result;
use log::debug;

use crate::parser::coordinates::Coordinates;
use crate::runner::process::{ToolOutput, ToolRunner};

/// Simulate a GPS position: `<tool> --udid <udid> -- <lat> <lon>`.
///
/// The `--` keeps negative coordinates from being read as options.
pub async fn set_location<R: ToolRunner + ?Sized>(
    runner: &R,
    tool: &str,
    udid: &str,
    coordinates: Coordinates,
) -> Result<ToolOutput> {
    let [lat, lon] = coordinates.to_args();
    debug!("Setting location of {} to ({}, {})", udid, lat, lon);
    let args = vec![
        "--udid".to_string(),
        udid.to_string(),
        "--".to_string(),
        lat,
        lon,
    ];
    runner.run(tool, &args).await
}

/// Stop simulating: `<tool> --udid <udid> reset`
pub async fn reset_location<R: ToolRunner + ?Sized>(
    runner: &R,
    tool: &str,
    udid: &str,
) -> Result<ToolOutput> {
    debug!("Resetting location of {}", udid);
    let args = vec!["--udid".to_string(), udid.to_string(), "reset".to_string()];
    runner.run(tool, &args).await
}
