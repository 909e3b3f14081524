// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function routes every message to a focused handler
//! method; the handlers live in the `handlers` submodules organized by
//! functional domain.

use cosmic::Task;

use crate::app::state::{AppModel, Message};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Camera Lifecycle =====
            Message::CameraBound(session) => self.handle_camera_bound(session),
            Message::BindFailed(error) => self.handle_bind_failed(error),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::FlipCamera => self.handle_flip_camera(),

            // ===== Gestures =====
            Message::ViewfinderCursor(position, size) => {
                self.handle_viewfinder_cursor(position, size)
            }
            Message::ViewfinderPressed => self.handle_viewfinder_pressed(),
            Message::PinchZoom(delta) => self.handle_pinch_zoom(delta),
            Message::AutofocusExpired(id) => self.handle_autofocus_expired(id),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::CaptureEvent(event) => self.handle_capture_event(event),
            Message::ClearCaptureAnimation => self.handle_clear_capture_animation(),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ToggleShutterSound(enabled) => self.handle_toggle_shutter_sound(enabled),
            Message::OpenPhotoFolder => self.handle_open_photo_folder(),

            // ===== System =====
            Message::AccessChecked(report) => self.handle_access_checked(report),
        }
    }
}
