// SPDX-License-Identifier: GPL-3.0-only

//! Gesture handlers
//!
//! Tap-to-focus: the last tracked cursor position is mapped through the
//! coordinate transformer into frame space, forwarded to the controller, and
//! mirrored by an indicator ring that hides after a fixed timeout. Pinch
//! zoom: multiplicative deltas accumulate into the clamped ratio.

use cosmic::Task;
use cosmic::iced::{Point, Size};
use tracing::debug;

use crate::app::state::{AppModel, Message};
use crate::app::viewfinder::transform::CoordinateTransformer;
use crate::constants::AUTOFOCUS_INDICATOR_MS;

impl AppModel {
    pub(crate) fn handle_viewfinder_cursor(
        &mut self,
        position: Point,
        size: Size,
    ) -> Task<cosmic::Action<Message>> {
        self.viewfinder_cursor = Some((position, size));
        Task::none()
    }

    pub(crate) fn handle_viewfinder_pressed(&mut self) -> Task<cosmic::Action<Message>> {
        // Presses report no position of their own; the last tracked cursor
        // position stands in for the tap point.
        let Some((position, size)) = self.viewfinder_cursor else {
            return Task::none();
        };
        // Before the first frame there is nothing to focus on
        let Some(frame) = &self.current_frame else {
            return Task::none();
        };

        let transformer =
            CoordinateTransformer::new((size.width, size.height), (frame.width, frame.height));
        let Some((frame_x, frame_y)) = transformer.view_to_frame(position.x, position.y) else {
            debug!("Tap in letterbox area ignored");
            return Task::none();
        };

        let normalized = (
            frame_x / frame.width as f32,
            frame_y / frame.height as f32,
        );

        self.controller.tap_to_focus(frame_x, frame_y);

        let id = self.autofocus.record_tap(normalized);
        self.refresh_overlay();

        // Each tap gets its own hide timer; a stale timer is a no-op
        Self::delay_task(AUTOFOCUS_INDICATOR_MS, Message::AutofocusExpired(id))
    }

    pub(crate) fn handle_pinch_zoom(&mut self, delta: f32) -> Task<cosmic::Action<Message>> {
        if !delta.is_finite() || delta <= 0.0 {
            return Task::none();
        }

        let ratio = self.controller.apply_pinch(delta);
        debug!(delta, ratio, "Pinch zoom");
        self.refresh_overlay();
        Task::none()
    }

    pub(crate) fn handle_autofocus_expired(&mut self, id: u64) -> Task<cosmic::Action<Message>> {
        if self.autofocus.expire(id) {
            self.refresh_overlay();
        }
        Task::none()
    }
}
