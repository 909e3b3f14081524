// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer

use cosmic::app::context_drawer;
use cosmic::widget;

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::fl;

impl AppModel {
    /// Build the settings context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let selected_theme = match self.config.app_theme {
            AppTheme::System => 0,
            AppTheme::Dark => 1,
            AppTheme::Light => 2,
        };

        let appearance = widget::settings::section()
            .title(fl!("appearance"))
            .add(widget::settings::item(
                fl!("theme"),
                widget::dropdown(&self.theme_names, Some(selected_theme), Message::SetAppTheme),
            ));

        let capture = widget::settings::section()
            .title(fl!("capture"))
            .add(widget::settings::item(
                fl!("shutter-sound"),
                widget::toggler(self.config.shutter_sound).on_toggle(Message::ToggleShutterSound),
            ));

        let photos = widget::settings::section().title(fl!("photos")).add(
            widget::settings::item_row(vec![
                widget::button::standard(fl!("open-photo-folder"))
                    .on_press(Message::OpenPhotoFolder)
                    .into(),
            ]),
        );

        let content = widget::column()
            .push(appearance)
            .push(capture)
            .push(photos)
            .spacing(cosmic::theme::spacing().space_m);

        context_drawer::context_drawer(
            content,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
