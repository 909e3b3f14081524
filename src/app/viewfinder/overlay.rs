// SPDX-License-Identifier: GPL-3.0-only

//! Scope overlay rasterizer
//!
//! Renders the binocular vignette as an RGBA bitmap composited over the
//! preview: a dimmed surface with a fully transparent circle punched out of
//! the center (clear blend, not additive), scope tick marks at the circle's
//! cardinal points, a center crosshair, and the transient autofocus ring.
//! The circle shrinks slightly as zoom approaches its maximum to suggest the
//! lens converging.

use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform,
};
use tracing::warn;

use crate::backends::camera::types::ZoomRange;
use crate::constants::overlay as overlay_constants;

/// Everything the overlay bitmap depends on; re-rendered only when changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeOverlay {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Normalized zoom position `t` in [0, 1]
    pub zoom_position: f32,
    /// Autofocus indicator position in normalized frame coordinates
    pub focus_ring: Option<(f32, f32)>,
}

/// Normalize the current ratio against the reported bounds.
///
/// No bounds, or degenerate bounds, mean no shrink at all.
pub fn zoom_position(ratio: f32, range: Option<ZoomRange>) -> f32 {
    range.map(|range| range.normalize(ratio)).unwrap_or(0.0)
}

/// Scope radius for a normalized zoom position.
///
/// Shrinks linearly from `base_radius` down to 95 % of it at maximum zoom.
pub fn adjusted_radius(base_radius: f32, t: f32) -> f32 {
    base_radius * (1.0 - overlay_constants::SHRINK_FRACTION * t.clamp(0.0, 1.0))
}

/// Bitmap size for a frame, capped so pinch gestures re-render cheaply.
pub fn overlay_size(frame_width: u32, frame_height: u32) -> (u32, u32) {
    let longest = frame_width.max(frame_height).max(1);
    if longest <= overlay_constants::MAX_DIMENSION {
        return (frame_width.max(1), frame_height.max(1));
    }

    let scale = overlay_constants::MAX_DIMENSION as f32 / longest as f32;
    (
        ((frame_width as f32 * scale) as u32).max(1),
        ((frame_height as f32 * scale) as u32).max(1),
    )
}

/// Rasterize the overlay. Returns RGBA bytes, `width * height * 4` long.
pub fn render(overlay: &ScopeOverlay) -> Option<Vec<u8>> {
    let mut pixmap = Pixmap::new(overlay.width, overlay.height)?;

    let center_x = overlay.width as f32 / 2.0;
    let center_y = overlay.height as f32 / 2.0;
    let base_radius = overlay.width.min(overlay.height) as f32 / 2.0;
    let radius = adjusted_radius(base_radius, overlay.zoom_position);

    // Dim the whole surface
    pixmap.fill(Color::from_rgba(0.0, 0.0, 0.0, overlay_constants::DIM_ALPHA)?);

    let mut paint = Paint::default();
    paint.anti_alias = true;

    // Punch the viewing window: clear blend erases pixels outright, leaving
    // the preview below untouched
    let circle = PathBuilder::from_circle(center_x, center_y, radius)?;
    paint.blend_mode = BlendMode::Clear;
    pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);

    // Everything else paints normally in white
    paint.blend_mode = BlendMode::SourceOver;
    paint.set_color(Color::WHITE);

    let tick_stroke = Stroke {
        width: overlay_constants::TICK_STROKE,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };

    // Scope ticks: short lines inward from the circle's cardinal points
    let tick_length = radius * overlay_constants::TICK_FRACTION;
    let ticks = [
        // Top, toward center
        ((center_x, center_y - radius), (center_x, center_y - radius + tick_length)),
        // Bottom, toward center
        ((center_x, center_y + radius), (center_x, center_y + radius - tick_length)),
        // Left, toward center
        ((center_x - radius, center_y), (center_x - radius + tick_length, center_y)),
        // Right, toward center
        ((center_x + radius, center_y), (center_x + radius - tick_length, center_y)),
    ];

    for (start, end) in ticks {
        let mut builder = PathBuilder::new();
        builder.move_to(start.0, start.1);
        builder.line_to(end.0, end.1);
        if let Some(path) = builder.finish() {
            pixmap.stroke_path(&path, &paint, &tick_stroke, Transform::identity(), None);
        }
    }

    // Center crosshair glyph
    let arm = overlay_constants::CROSSHAIR_ARM;
    let crosshair_stroke = Stroke {
        width: overlay_constants::CROSSHAIR_STROKE,
        ..Stroke::default()
    };
    let mut builder = PathBuilder::new();
    builder.move_to(center_x - arm, center_y);
    builder.line_to(center_x + arm, center_y);
    builder.move_to(center_x, center_y - arm);
    builder.line_to(center_x, center_y + arm);
    if let Some(path) = builder.finish() {
        pixmap.stroke_path(&path, &paint, &crosshair_stroke, Transform::identity(), None);
    }

    // Autofocus indicator ring at the tapped position
    if let Some((norm_x, norm_y)) = overlay.focus_ring {
        let ring_x = norm_x.clamp(0.0, 1.0) * overlay.width as f32;
        let ring_y = norm_y.clamp(0.0, 1.0) * overlay.height as f32;
        let ring_stroke = Stroke {
            width: overlay_constants::FOCUS_RING_STROKE,
            ..Stroke::default()
        };
        match PathBuilder::from_circle(ring_x, ring_y, overlay_constants::FOCUS_RING_RADIUS) {
            Some(ring) => {
                pixmap.stroke_path(&ring, &paint, &ring_stroke, Transform::identity(), None);
            }
            None => warn!("Focus ring path construction failed"),
        }
    }

    Some(pixmap.take())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(data: &[u8], width: u32, x: u32, y: u32) -> u8 {
        data[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn test_adjusted_radius_monotonic_and_bounded() {
        let base = 200.0;
        let mut previous = f32::MAX;
        for step in 0..=100 {
            let t = step as f32 / 100.0;
            let radius = adjusted_radius(base, t);
            assert!(radius <= previous, "radius must not grow with zoom");
            assert!(radius <= base);
            assert!(radius >= 0.95 * base);
            previous = radius;
        }
        assert_eq!(adjusted_radius(base, 0.0), base);
        assert!((adjusted_radius(base, 1.0) - 0.95 * base).abs() < 0.001);
    }

    #[test]
    fn test_adjusted_radius_clamps_t() {
        let base = 100.0;
        assert_eq!(adjusted_radius(base, -5.0), base);
        assert!((adjusted_radius(base, 42.0) - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_zoom_position_without_range_is_zero() {
        assert_eq!(zoom_position(3.0, None), 0.0);
    }

    #[test]
    fn test_zoom_position_degenerate_range_is_zero() {
        let degenerate = ZoomRange { min: 2.0, max: 2.0 };
        assert_eq!(zoom_position(2.0, Some(degenerate)), 0.0);
    }

    #[test]
    fn test_overlay_size_caps_longest_side() {
        assert_eq!(overlay_size(640, 480), (640, 480));
        let (w, h) = overlay_size(1920, 1080);
        assert_eq!(w, 960);
        assert_eq!(h, 540);
    }

    #[test]
    fn test_render_punches_transparent_window() {
        let overlay = ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 0.0,
            focus_ring: None,
        };
        let data = render(&overlay).unwrap();
        assert_eq!(data.len(), 400 * 400 * 4);

        // Inside the circle, away from ticks and crosshair: fully erased
        assert_eq!(alpha_at(&data, 400, 230, 160), 0);

        // Corner stays dimmed at 85 % opacity
        let corner = alpha_at(&data, 400, 2, 2);
        assert!((216..=218).contains(&corner), "corner alpha was {corner}");
    }

    #[test]
    fn test_render_center_has_crosshair() {
        let overlay = ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 0.0,
            focus_ring: None,
        };
        let data = render(&overlay).unwrap();
        // The crosshair paints over the punched window at the exact center
        assert!(alpha_at(&data, 400, 200, 200) > 200);
    }

    #[test]
    fn test_render_focus_ring_appears_at_tap() {
        let without = render(&ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 0.0,
            focus_ring: None,
        })
        .unwrap();
        let with = render(&ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 0.0,
            focus_ring: Some((0.5, 0.5)),
        })
        .unwrap();

        // A point on the ring circumference, right of the tap position
        let x = 200 + 24;
        let y = 200;
        assert_eq!(alpha_at(&without, 400, x, y), 0);
        assert!(alpha_at(&with, 400, x, y) > 200);
    }

    #[test]
    fn test_render_window_shrinks_with_zoom(){
        let wide = render(&ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 0.0,
            focus_ring: None,
        })
        .unwrap();
        let tight = render(&ScopeOverlay {
            width: 400,
            height: 400,
            zoom_position: 1.0,
            focus_ring: None,
        })
        .unwrap();

        // A pixel just inside the full-zoomed-out radius (200) but outside
        // the fully-zoomed-in radius (190), along the diagonal to dodge the
        // tick marks
        let x = 200 + 138;
        let y = 200 - 138; // distance ~195.2 from center
        assert_eq!(alpha_at(&wide, 400, x, y), 0);
        assert!(alpha_at(&tight, 400, x, y) > 150);
    }
}
