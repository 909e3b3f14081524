// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera service seam

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Which physical camera the app binds to.
///
/// Flipping is an involution: `facing.flipped().flipped() == facing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LensFacing {
    /// World-facing camera
    #[default]
    Back,
    /// User-facing camera
    Front,
}

impl LensFacing {
    /// The opposite facing
    pub fn flipped(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensFacing::Back => write!(f, "back"),
            LensFacing::Front => write!(f, "front"),
        }
    }
}

/// A camera device discovered by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable device name
    pub name: String,
    /// Device path (e.g. /dev/video0)
    pub path: String,
    /// Which way the device faces
    pub facing: LensFacing,
}

/// A decoded RGBA frame from the preview stream
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, `width * 4` bytes per row
    pub data: Arc<[u8]>,
    pub stride: u32,
    pub captured_at: Instant,
}

/// Device-reported zoom ratio bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    /// Clamp a ratio into the range
    pub fn clamp(&self, ratio: f32) -> f32 {
        ratio.clamp(self.min, self.max)
    }

    /// Normalize a ratio to [0, 1] within the range.
    ///
    /// Degenerate bounds (`max <= min`) report 0 rather than dividing by zero.
    pub fn normalize(&self, ratio: f32) -> f32 {
        if self.max > self.min {
            (self.clamp(ratio) - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }
}

/// A normalized focus/exposure target in sensor space, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteringPoint {
    pub x: f32,
    pub y: f32,
}

/// Maps frame-space tap coordinates into normalized metering points.
///
/// Built from the resolution of the current preview frame; absent until the
/// first frame arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteringPointFactory {
    width: f32,
    height: f32,
}

impl MeteringPointFactory {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Create a metering point from frame-space coordinates, clamped to [0, 1]
    pub fn create(&self, x: f32, y: f32) -> MeteringPoint {
        MeteringPoint {
            x: if self.width > 0.0 {
                (x / self.width).clamp(0.0, 1.0)
            } else {
                0.0
            },
            y: if self.height > 0.0 {
                (y / self.height).clamp(0.0, 1.0)
            } else {
                0.0
            },
        }
    }
}

/// Capability info for a bound camera
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub device: CameraDevice,
    /// Active capture resolution
    pub resolution: (u32, u32),
    /// Zoom ratio bounds, `None` when the device has no zoom control
    pub zoom: Option<ZoomRange>,
    /// Whether the device reports incremental capture-save progress
    pub supports_capture_progress: bool,
}

/// Use cases requested at bind time.
///
/// Video capture is accepted as a placeholder only; nothing records from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCases {
    pub preview: bool,
    pub still_capture: bool,
    pub video_capture: bool,
}

impl UseCases {
    /// Preview + still capture + video placeholder
    pub const fn standard() -> Self {
        Self {
            preview: true,
            still_capture: true,
            video_capture: true,
        }
    }
}

/// Events reported while a capture is being taken and saved
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// Exposure started; shutter feedback should fire now
    Started,
    /// Incremental save progress in percent (only on capable devices)
    Progressed(u8),
    /// The image was written to the media store
    Saved(PathBuf),
    /// Capture or save failed
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_facing_flip_is_involution() {
        assert_eq!(LensFacing::Back.flipped(), LensFacing::Front);
        assert_eq!(LensFacing::Front.flipped(), LensFacing::Back);
        for facing in [LensFacing::Back, LensFacing::Front] {
            assert_eq!(facing.flipped().flipped(), facing);
        }
    }

    #[test]
    fn test_zoom_range_clamp() {
        let range = ZoomRange { min: 1.0, max: 4.0 };
        assert_eq!(range.clamp(0.25), 1.0);
        assert_eq!(range.clamp(2.0), 2.0);
        assert_eq!(range.clamp(100.0), 4.0);
    }

    #[test]
    fn test_zoom_range_normalize() {
        let range = ZoomRange { min: 1.0, max: 5.0 };
        assert_eq!(range.normalize(1.0), 0.0);
        assert_eq!(range.normalize(3.0), 0.5);
        assert_eq!(range.normalize(5.0), 1.0);
        // Out-of-range ratios clamp before normalizing
        assert_eq!(range.normalize(9.0), 1.0);
    }

    #[test]
    fn test_zoom_range_normalize_degenerate() {
        let range = ZoomRange { min: 2.0, max: 2.0 };
        assert_eq!(range.normalize(2.0), 0.0);
        let inverted = ZoomRange { min: 3.0, max: 1.0 };
        assert_eq!(inverted.normalize(2.0), 0.0);
    }

    #[test]
    fn test_metering_point_factory() {
        let factory = MeteringPointFactory::new(1920, 1080);
        let point = factory.create(960.0, 270.0);
        assert!((point.x - 0.5).abs() < f32::EPSILON);
        assert!((point.y - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_metering_point_clamps_outside_taps() {
        let factory = MeteringPointFactory::new(640, 480);
        let point = factory.create(-10.0, 5000.0);
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 1.0);
    }
}
