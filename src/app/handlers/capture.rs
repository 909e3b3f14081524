// SPDX-License-Identifier: GPL-3.0-only

//! Capture operation handlers

use cosmic::Task;
use tracing::info;

use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::CaptureEvent;
use crate::constants::CAPTURE_ANIMATION_MS;

impl AppModel {
    /// Create a delayed task that sends a message after the specified milliseconds
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(events) = self.controller.take_picture(self.store.clone()) else {
            info!("Capture ignored, camera not bound");
            return Task::none();
        };

        self.is_capturing = true;

        let event_task = Task::run(events, |event| {
            cosmic::Action::App(Message::CaptureEvent(event))
        });
        let animation_task =
            Self::delay_task(CAPTURE_ANIMATION_MS, Message::ClearCaptureAnimation);

        Task::batch([event_task, animation_task])
    }

    pub(crate) fn handle_capture_event(
        &mut self,
        event: CaptureEvent,
    ) -> Task<cosmic::Action<Message>> {
        self.controller.on_capture_event(&event);
        Task::none()
    }

    pub(crate) fn handle_clear_capture_animation(&mut self) -> Task<cosmic::Action<Message>> {
        self.is_capturing = false;
        Task::none()
    }
}
