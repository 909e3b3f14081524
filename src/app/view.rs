// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Layout, top to bottom: zoom readout (and any access warning), the
//! viewfinder, the save-progress indicator while a capture is being written,
//! and the control row with the flip button, the shutter, and an invisible
//! placeholder that keeps the shutter centered.

use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget;

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;

/// Camera switch icon SVG (camera with circular arrows)
const CAMERA_SWITCH_ICON: &[u8] = include_bytes!("../../resources/button_icons/camera-switch.svg");

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut content = widget::column().width(Length::Fill).height(Length::Fill);

        if let Some(warning) = self.access_warning() {
            content = content.push(
                widget::container(widget::text::caption(warning))
                    .width(Length::Fill)
                    .padding([spacing.space_xxs, spacing.space_s])
                    .style(|theme| widget::container::Style {
                        background: Some(Background::Color(
                            theme.cosmic().warning_color().into(),
                        )),
                        text_color: Some(Color::BLACK),
                        ..Default::default()
                    }),
            );
        }

        content = content
            .push(self.build_zoom_readout())
            .push(
                widget::container(self.build_viewfinder())
                    .width(Length::Fill)
                    .height(Length::Fill),
            );

        if let Some(progress) = self.controller.save_progress() {
            content = content.push(
                widget::container(
                    widget::column()
                        .push(widget::text::caption(fl!("saving-photo")))
                        .push(
                            widget::progress_bar(0.0..=1.0, progress)
                                .width(Length::Fixed(240.0))
                                .height(Length::Fixed(6.0)),
                        )
                        .spacing(spacing.space_xxs)
                        .align_x(cosmic::iced::alignment::Horizontal::Center),
                )
                .width(Length::Fill)
                .align_x(cosmic::iced::alignment::Horizontal::Center)
                .padding([spacing.space_xxs, 0]),
            );
        }

        content = content.push(self.build_controls());

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Min / current / max zoom ratio, centered above the viewfinder
    fn build_zoom_readout(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let range = self.controller.zoom_range();

        let mut readout = widget::row()
            .spacing(spacing.space_l)
            .align_y(Alignment::Center);

        if let Some(range) = range {
            readout = readout.push(widget::text::caption(format!("{:.1}×", range.min)));
        }

        readout = readout.push(widget::text::title4(format!(
            "{:.1}×",
            self.controller.zoom_ratio()
        )));

        if let Some(range) = range {
            readout = readout.push(widget::text::caption(format!("{:.1}×", range.max)));
        }

        widget::container(readout)
            .width(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .padding([spacing.space_xxs, 0])
            .into()
    }

    /// Bottom control row: flip, shutter, and the balancing placeholder
    fn build_controls(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let row = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(self.build_flip_button())
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(self.build_capture_button())
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            // Invisible placeholder with the flip button's width keeps the
            // shutter centered
            .push(widget::Space::new(
                Length::Fixed(ui::PLACEHOLDER_BUTTON_WIDTH),
                Length::Shrink,
            ))
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .align_y(Alignment::Center)
            .width(Length::Fill);

        widget::container(row)
            .width(Length::Fill)
            .padding([spacing.space_xs, 0])
            .into()
    }

    /// Build the camera flip button
    fn build_flip_button(&self) -> Element<'_, Message> {
        let switch_icon = widget::icon::from_svg_bytes(CAMERA_SWITCH_ICON).symbolic(true);

        let icon_content = widget::container(widget::icon(switch_icon).size(32))
            .width(Length::Fixed(ui::ICON_BUTTON_SIZE))
            .height(Length::Fixed(ui::ICON_BUTTON_SIZE))
            .center(Length::Fixed(ui::ICON_BUTTON_SIZE));

        widget::button::custom(icon_content)
            .padding(0)
            .class(cosmic::theme::Button::Text)
            .on_press(Message::FlipCamera)
            .into()
    }

    /// Build the shutter button
    ///
    /// White circle, gray while a capture is in flight, with a brief press
    /// animation shrinking it.
    fn build_capture_button(&self) -> Element<'_, Message> {
        let capture_button_color = if self.is_capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        let (inner_size, outer_size) = if self.is_capturing {
            (
                ui::CAPTURE_BUTTON_INNER * 0.85,
                ui::CAPTURE_BUTTON_OUTER * 0.85,
            )
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(capture_button_color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = widget::button::custom(button_inner)
            .on_press(Message::Capture)
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));

        // Fixed-size wrapper prevents layout shift when the button shrinks
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .into()
    }

    /// User-facing access warning, if the startup check found one
    fn access_warning(&self) -> Option<String> {
        let report = self.access.as_ref()?;
        if let Some(advice) = &report.advice {
            return Some(advice.replace('\n', " "));
        }
        if !report.storage_ok {
            return Some(format!(
                "Photo folder is not writable: {}",
                self.store.capture_dir().display()
            ));
        }
        None
    }
}
