// SPDX-License-Identifier: GPL-3.0-only

//! Camera service abstraction
//!
//! The platform camera framework is opaque to the rest of the app: binding,
//! frame production, zoom/focus control, and capture-and-save all happen
//! behind the [`CameraService`] / [`CameraSession`] traits. The concrete
//! implementation is the V4L2 backend in [`v4l2`].

pub mod controls;
pub mod convert;
pub mod types;
pub mod v4l2;

use std::sync::Arc;

use futures::channel::mpsc;
use tracing::info;

use crate::errors::CameraError;
use crate::storage::SaveTarget;
use types::{CameraDevice, CameraFrame, CameraInfo, CaptureEvent, LensFacing, MeteringPoint, UseCases};

/// Entry point to the platform camera framework.
pub trait CameraService: Send + Sync {
    /// List the cameras currently attached to the system
    fn enumerate(&self) -> Vec<CameraDevice>;

    /// Open a device and start producing preview frames into `frames`.
    ///
    /// The returned session stays bound until dropped; dropping it stops the
    /// frame stream and releases the device.
    fn open(
        &self,
        device: &CameraDevice,
        use_cases: UseCases,
        frames: mpsc::Sender<Arc<CameraFrame>>,
    ) -> Result<Box<dyn CameraSession>, CameraError>;
}

/// A bound camera: capability info, control calls, and still capture.
pub trait CameraSession: Send + Sync + std::fmt::Debug {
    /// Capability info queried at bind time
    fn info(&self) -> &CameraInfo;

    /// Forward a zoom ratio to the device.
    ///
    /// The caller is responsible for clamping into the reported range.
    fn set_zoom_ratio(&self, ratio: f32) -> Result<(), CameraError>;

    /// Request focus and exposure convergence on a normalized point
    fn focus_and_meter(&self, point: MeteringPoint) -> Result<(), CameraError>;

    /// Capture a still asynchronously, reporting progress through `events`.
    ///
    /// Fire-and-forget: the work runs on its own thread and the outcome
    /// arrives as [`CaptureEvent`]s.
    fn take_picture(&self, target: SaveTarget, events: mpsc::UnboundedSender<CaptureEvent>);
}

/// Acquire the platform camera service.
///
/// The analog of awaiting a process camera provider: resolves once the
/// service is usable and fails fatally when the platform has none.
pub async fn acquire_service() -> Result<Arc<dyn CameraService>, CameraError> {
    // Device probing touches the filesystem; keep it off the UI executor.
    let service = tokio::task::spawn_blocking(v4l2::V4l2Service::probe)
        .await
        .map_err(|e| CameraError::ServiceUnavailable(e.to_string()))??;

    Ok(Arc::new(service))
}

/// Pick the first device matching the requested facing.
pub fn pick_device(devices: &[CameraDevice], facing: LensFacing) -> Option<CameraDevice> {
    let picked = devices.iter().find(|dev| dev.facing == facing).cloned();

    if let Some(dev) = &picked {
        info!(name = %dev.name, path = %dev.path, %facing, "Selected camera");
    }

    picked
}

/// Classify a device as front- or back-facing from its reported name.
///
/// Laptops label the user-facing camera "integrated"/"front"/"user"; anything
/// else is treated as world-facing.
pub fn classify_facing(name: &str) -> LensFacing {
    let lowered = name.to_ascii_lowercase();
    let front_markers = ["front", "user", "integrated", "facetime", "internal"];

    if front_markers.iter().any(|marker| lowered.contains(marker)) {
        LensFacing::Front
    } else {
        LensFacing::Back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, path: &str, facing: LensFacing) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            facing,
        }
    }

    #[test]
    fn test_classify_facing() {
        assert_eq!(classify_facing("Integrated Camera"), LensFacing::Front);
        assert_eq!(classify_facing("HD USB FRONT cam"), LensFacing::Front);
        assert_eq!(classify_facing("Logitech BRIO"), LensFacing::Back);
    }

    #[test]
    fn test_pick_device_matches_facing() {
        let devices = vec![
            device("World cam", "/dev/video0", LensFacing::Back),
            device("Integrated Camera", "/dev/video2", LensFacing::Front),
        ];

        let back = pick_device(&devices, LensFacing::Back).unwrap();
        assert_eq!(back.path, "/dev/video0");

        let front = pick_device(&devices, LensFacing::Front).unwrap();
        assert_eq!(front.path, "/dev/video2");
    }

    #[test]
    fn test_pick_device_missing_facing() {
        let devices = vec![device("World cam", "/dev/video0", LensFacing::Back)];
        assert!(pick_device(&devices, LensFacing::Front).is_none());
    }
}
