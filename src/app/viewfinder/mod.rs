// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder element
//!
//! Stacks the live preview and the scope overlay bitmap (both contain-fit,
//! so they cover the same letterboxed rectangle) and captures gestures over
//! the whole area: presses for tap-to-focus, cursor moves to track the tap
//! position, and scroll for pinch zoom.

pub mod overlay;
pub mod transform;

use cosmic::iced::widget::{image as frame_image, responsive};
use cosmic::iced::{Background, ContentFit, Length, mouse};
use cosmic::widget;
use cosmic::Element;

use crate::app::state::{AppModel, Message};
use crate::constants::zoom as zoom_constants;
use crate::fl;

impl AppModel {
    /// Build the viewfinder: preview, overlay, and gesture capture.
    ///
    /// Shows an error state on fatal bind failure and a waiting state until
    /// the first frame arrives.
    pub fn build_viewfinder(&self) -> Element<'_, Message> {
        if let Some(error) = &self.bind_error {
            return placeholder(
                widget::column()
                    .push(widget::text::title4(fl!("camera-error")))
                    .push(widget::text(error.clone()))
                    .spacing(8)
                    .align_x(cosmic::iced::alignment::Horizontal::Center),
            );
        }

        let Some(handle) = &self.frame_handle else {
            return placeholder(widget::text(fl!("initializing-camera")).size(20));
        };

        responsive(move |size| {
            let preview = frame_image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill);

            let mut layers = cosmic::iced::widget::stack![preview]
                .width(Length::Fill)
                .height(Length::Fill);

            if let Some(overlay_handle) = &self.overlay_handle {
                layers = layers.push(
                    frame_image(overlay_handle.clone())
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fill),
                );
            }

            // Presses carry no position, so the tap point is the last
            // tracked cursor position over the viewfinder
            widget::mouse_area(layers)
                .on_press(Message::ViewfinderPressed)
                .on_move(move |position| Message::ViewfinderCursor(position, size))
                .on_scroll(|delta| {
                    let lines = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y / 20.0,
                    };
                    Message::PinchZoom((1.0 + lines * zoom_constants::SCROLL_STEP).max(0.05))
                })
                .into()
        })
        .into()
    }
}

/// Dark filler shown in place of the preview
fn placeholder<'a>(
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .style(|theme| widget::container::Style {
            background: Some(Background::Color(theme.cosmic().bg_color().into())),
            text_color: Some(theme.cosmic().on_bg_color().into()),
            ..Default::default()
        })
        .into()
}
