// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// How long the autofocus indicator stays on screen after a tap, in ms
pub const AUTOFOCUS_INDICATOR_MS: u64 = 1000;

/// How long the shutter button stays pressed-in after a capture, in ms
pub const CAPTURE_ANIMATION_MS: u64 = 150;

/// Relative path of saved captures below the media root
pub const CAPTURE_RELATIVE_PATH: &str = "DCIM/Camera";

/// JPEG quality for saved captures (0-100)
pub const JPEG_QUALITY: u8 = 92;

/// Scope overlay geometry
pub mod overlay {
    /// Opacity of the dimmed area around the scope circle
    pub const DIM_ALPHA: f32 = 0.85;

    /// Maximum radius shrink as zoom approaches its maximum
    pub const SHRINK_FRACTION: f32 = 0.05;

    /// Length of the cardinal tick lines as a fraction of the radius
    pub const TICK_FRACTION: f32 = 0.18;

    /// Stroke width of the tick lines, in overlay pixels
    pub const TICK_STROKE: f32 = 2.0;

    /// Half-length of the center crosshair arms, in overlay pixels
    pub const CROSSHAIR_ARM: f32 = 9.0;

    /// Stroke width of the center crosshair
    pub const CROSSHAIR_STROKE: f32 = 2.0;

    /// Radius of the autofocus indicator ring, in overlay pixels
    pub const FOCUS_RING_RADIUS: f32 = 24.0;

    /// Stroke width of the autofocus indicator ring
    pub const FOCUS_RING_STROKE: f32 = 2.0;

    /// Longest side of the rasterized overlay bitmap
    pub const MAX_DIMENSION: u32 = 960;
}

/// Zoom behavior
pub mod zoom {
    /// Ratio used before any camera reports its range
    pub const DEFAULT_RATIO: f32 = 1.0;

    /// Ratio space presented for hardware zoom controls.
    ///
    /// V4L2 zoom units are vendor-defined, so the session maps the
    /// hardware control span linearly onto [1.0, MAX_RATIO].
    pub const MAX_RATIO: f32 = 4.0;

    /// Multiplicative zoom change per scroll line over the viewfinder
    pub const SCROLL_STEP: f32 = 0.05;
}

/// Camera stream parameters
pub mod camera {
    /// Preferred capture width when the device supports it
    pub const PREFERRED_WIDTH: u32 = 1280;
    /// Preferred capture height when the device supports it
    pub const PREFERRED_HEIGHT: u32 = 720;
    /// Number of mmap buffers for the capture stream
    pub const STREAM_BUFFERS: u32 = 4;
    /// Capacity of the frame channel between capture thread and UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 8;
}

/// UI sizing
pub mod ui {
    /// Outer diameter of the shutter button
    pub const CAPTURE_BUTTON_OUTER: f32 = 72.0;
    /// Inner circle diameter of the shutter button
    pub const CAPTURE_BUTTON_INNER: f32 = 56.0;
    /// Corner radius of the shutter button inner circle
    pub const CAPTURE_BUTTON_RADIUS: f32 = 28.0;
    /// Size of the flip-camera icon button
    pub const ICON_BUTTON_SIZE: f32 = 52.0;
    /// Width of the invisible placeholder that balances the bottom row
    pub const PLACEHOLDER_BUTTON_WIDTH: f32 = 52.0;
}
