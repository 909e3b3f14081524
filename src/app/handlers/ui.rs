// SPDX-License-Identifier: GPL-3.0-only

//! UI navigation and settings handlers

use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, warn};

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::audio::{ShutterSound, SoundPlayer};
use crate::config::{AppTheme, Config};
use crate::permissions::AccessReport;

impl AppModel {
    pub(crate) fn handle_launch_url(&mut self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(e) = open::that_detached(&url) {
            error!(%url, error = %e, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        self.config = config;
        cosmic::command::set_theme(self.config.app_theme.theme())
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => AppTheme::System,
        };

        self.config.app_theme = app_theme;
        self.persist_config();
        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_toggle_shutter_sound(
        &mut self,
        enabled: bool,
    ) -> Task<cosmic::Action<Message>> {
        self.config.shutter_sound = enabled;
        self.persist_config();

        // Apply to the live binding; otherwise it takes effect on next bind
        if self.controller.is_bound() {
            let sound: Option<Box<dyn SoundPlayer>> = if enabled {
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
            self.controller.set_sound(sound);
        }

        Task::none()
    }

    pub(crate) fn handle_open_photo_folder(&mut self) -> Task<cosmic::Action<Message>> {
        let dir = self.store.capture_dir();
        if let Err(e) = open::that_detached(&dir) {
            error!(dir = %dir.display(), error = %e, "Failed to open photo folder");
        }
        Task::none()
    }

    pub(crate) fn handle_access_checked(
        &mut self,
        report: AccessReport,
    ) -> Task<cosmic::Action<Message>> {
        if report.has_warning() {
            warn!(?report, "Access check reported problems");
        }
        self.access = Some(report);
        Task::none()
    }

    fn persist_config(&mut self) {
        if let Some(handler) = &self.config_handler {
            if let Err(e) = self.config.write_entry(handler) {
                error!(error = ?e, "Failed to persist configuration");
            }
        }
    }
}
