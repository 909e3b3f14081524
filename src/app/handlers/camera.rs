// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle handlers
//!
//! Binding completion, fatal bind failures, preview frames, and selector
//! flips. The bind task itself is the subscription in `app`; flipping the
//! selector changes the subscription key, which tears the old binding down
//! and starts a new one.

use std::sync::Arc;

use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::widget;
use tracing::{error, info, warn};

use crate::app::state::{AppModel, Message};
use crate::backends::audio::{ShutterSound, SoundPlayer};
use crate::backends::camera::CameraSession;
use crate::backends::camera::types::CameraFrame;

impl AppModel {
    pub(crate) fn handle_camera_bound(
        &mut self,
        session: Arc<dyn CameraSession>,
    ) -> Task<cosmic::Action<Message>> {
        // The shutter sound lives exactly as long as the binding
        let sound: Option<Box<dyn SoundPlayer>> = if self.config.shutter_sound {
            match ShutterSound::load() {
                Ok(sound) => Some(Box::new(sound)),
                Err(e) => {
                    warn!(error = %e, "Shutter sound unavailable");
                    None
                }
            }
        } else {
            None
        };

        self.bind_error = None;
        self.controller.bind_complete(session, sound);
        Task::none()
    }

    pub(crate) fn handle_bind_failed(&mut self, error: String) -> Task<cosmic::Action<Message>> {
        error!(%error, "Camera bind failed");
        self.bind_error = Some(error);
        self.controller.unbind();
        self.current_frame = None;
        self.frame_handle = None;
        self.refresh_overlay();
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        self.controller.on_frame(&frame);

        self.frame_handle = Some(widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        self.current_frame = Some(frame);

        // No-op unless the frame resolution (and with it the overlay
        // geometry) changed
        self.refresh_overlay();
        Task::none()
    }

    pub(crate) fn handle_flip_camera(&mut self) -> Task<cosmic::Action<Message>> {
        let facing = self.controller.flip();
        info!(%facing, "Rebinding after camera flip");

        self.config.last_facing = facing;
        if let Some(handler) = &self.config_handler {
            if let Err(e) = self.config.write_entry(handler) {
                error!(error = ?e, "Failed to persist lens facing");
            }
        }

        // Tear down now; the bind subscription is keyed on the facing and
        // restarts against the other camera on its own.
        self.controller.unbind();
        self.autofocus.clear();
        self.bind_error = None;
        self.current_frame = None;
        self.frame_handle = None;
        self.viewfinder_cursor = None;
        self.refresh_overlay();
        Task::none()
    }
}
