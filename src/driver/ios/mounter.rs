use anyhow::Result;
use log::debug;

use super::disk_image::DiskImage;
use crate::runner::process::{ToolOutput, ToolRunner};

/// Mount a developer disk image with the external mounting tool.
///
/// Invoked as `<tool> <image_path> <signature_path>`.
pub async fn mount_image<R: ToolRunner + ?Sized>(
    runner: &R,
    tool: &str,
    image: &DiskImage,
) -> Result<ToolOutput> {
    let args = vec![
        image.image_path.display().to_string(),
        image.signature_path.display().to_string(),
    ];
    debug!("Mounting {}", image.image_path.display());
    runner.run(tool, &args).await
}
