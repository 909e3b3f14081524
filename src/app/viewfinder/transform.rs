// SPDX-License-Identifier: GPL-3.0-only

//! Widget-space to frame-space coordinate mapping
//!
//! The preview is letterboxed into the viewfinder (contain fit); taps arrive
//! in widget coordinates and the camera wants frame coordinates.

/// Maps between the viewfinder widget area and the camera frame it displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    view_width: f32,
    view_height: f32,
    frame_width: f32,
    frame_height: f32,
}

impl CoordinateTransformer {
    pub fn new(view: (f32, f32), frame: (u32, u32)) -> Self {
        Self {
            view_width: view.0,
            view_height: view.1,
            frame_width: frame.0 as f32,
            frame_height: frame.1 as f32,
        }
    }

    /// Displayed video rectangle within the widget: (offset_x, offset_y,
    /// width, height), letterboxed with contain-fit logic.
    fn video_bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.view_width <= 0.0
            || self.view_height <= 0.0
            || self.frame_width <= 0.0
            || self.frame_height <= 0.0
        {
            return None;
        }

        let frame_aspect = self.frame_width / self.frame_height;
        let view_aspect = self.view_width / self.view_height;

        Some(if frame_aspect > view_aspect {
            // Frame is wider - fit to width
            let display_width = self.view_width;
            let display_height = self.view_width / frame_aspect;
            let offset_y = (self.view_height - display_height) / 2.0;
            (0.0, offset_y, display_width, display_height)
        } else {
            // Frame is taller - fit to height
            let display_height = self.view_height;
            let display_width = self.view_height * frame_aspect;
            let offset_x = (self.view_width - display_width) / 2.0;
            (offset_x, 0.0, display_width, display_height)
        })
    }

    /// Map a widget-space point into frame coordinates.
    ///
    /// Returns `None` for points in the letterbox bars or when either space
    /// is degenerate.
    pub fn view_to_frame(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (offset_x, offset_y, display_width, display_height) = self.video_bounds()?;

        if x < offset_x
            || y < offset_y
            || x > offset_x + display_width
            || y > offset_y + display_height
        {
            return None;
        }

        let frame_x = (x - offset_x) * (self.frame_width / display_width);
        let frame_y = (y - offset_y) * (self.frame_height / display_height);

        Some((
            frame_x.clamp(0.0, self.frame_width),
            frame_y.clamp(0.0, self.frame_height),
        ))
    }

    /// Map a widget-space point into normalized [0, 1] frame coordinates.
    pub fn view_to_normalized(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (frame_x, frame_y) = self.view_to_frame(x, y)?;
        Some((frame_x / self.frame_width, frame_y / self.frame_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_center() {
        let transformer = CoordinateTransformer::new((800.0, 600.0), (1920, 1080));
        let (x, y) = transformer.view_to_frame(400.0, 300.0).unwrap();
        assert!((x - 960.0).abs() < 0.5);
        assert!((y - 540.0).abs() < 0.5);
    }

    #[test]
    fn test_wide_frame_letterboxes_vertically() {
        // 1920x1080 frame into a square 600x600 view: 600x337.5 display,
        // offset_y = 131.25
        let transformer = CoordinateTransformer::new((600.0, 600.0), (1920, 1080));

        // Tap in the top letterbox bar is outside the video
        assert!(transformer.view_to_frame(300.0, 50.0).is_none());

        // Top-left corner of the displayed video is frame origin
        let (x, y) = transformer.view_to_frame(0.0, 131.25).unwrap();
        assert!(x.abs() < 0.5);
        assert!(y.abs() < 0.5);
    }

    #[test]
    fn test_tall_frame_letterboxes_horizontally() {
        let transformer = CoordinateTransformer::new((1000.0, 500.0), (480, 640));

        // Display is 375x500 centered, offset_x = 312.5
        assert!(transformer.view_to_frame(100.0, 250.0).is_none());

        let (x, y) = transformer.view_to_frame(312.5 + 187.5, 250.0).unwrap();
        assert!((x - 240.0).abs() < 0.5);
        assert!((y - 320.0).abs() < 0.5);
    }

    #[test]
    fn test_normalized_mapping() {
        let transformer = CoordinateTransformer::new((1920.0, 1080.0), (1920, 1080));
        let (nx, ny) = transformer.view_to_normalized(480.0, 810.0).unwrap();
        assert!((nx - 0.25).abs() < 0.001);
        assert!((ny - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_spaces() {
        let zero_view = CoordinateTransformer::new((0.0, 0.0), (1920, 1080));
        assert!(zero_view.view_to_frame(0.0, 0.0).is_none());

        let zero_frame = CoordinateTransformer::new((800.0, 600.0), (0, 0));
        assert!(zero_frame.view_to_frame(10.0, 10.0).is_none());
    }
}
