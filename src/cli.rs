// SPDX-License-Identifier: GPL-3.0-only

//! Terminal subcommands

use spyglass::backends::camera::{CameraService, v4l2::V4l2Service};
use spyglass::errors::AppResult;

/// Print the cameras the service can see
pub fn list_cameras() -> AppResult<()> {
    let service = V4l2Service::probe()?;
    let devices = service.enumerate();

    if devices.is_empty() {
        println!("No cameras found");
        return Ok(());
    }

    println!("{:<12} {:<8} NAME", "PATH", "FACING");
    for device in devices {
        println!("{:<12} {:<8} {}", device.path, device.facing, device.name);
    }

    Ok(())
}
