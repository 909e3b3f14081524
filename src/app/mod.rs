// SPDX-License-Identifier: GPL-3.0-only

//! Main application module
//!
//! # Architecture
//!
//! - `state`: application state types (AppModel, Message, autofocus state)
//! - `controller`: capture controller (binding, zoom/focus, capture events)
//! - `viewfinder`: preview + scope overlay + gesture capture
//! - `view`: main view rendering
//! - `settings`: settings drawer UI
//! - `update`: message dispatch
//! - `handlers`: message handling grouped by domain
//!
//! The camera bind task is the subscription below: keyed by the lens facing,
//! it acquires the camera service, opens the selected device, forwards
//! frames, and tears the binding down when the key changes or the app exits.

pub mod controller;
mod handlers;
mod settings;
pub mod state;
mod update;
mod view;
pub mod viewfinder;

use std::sync::Arc;

use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
use tracing::{error, info};

pub use state::{AppModel, ContextPage, Message};

use crate::backends::camera::{self, CameraSession};
use crate::backends::camera::types::UseCases;
use crate::config::Config;
use crate::constants::camera as camera_constants;
use crate::fl;
use crate::permissions;
use crate::storage::MediaStore;

const REPOSITORY: &str = "https://github.com/spyglass-camera/spyglass";
const APP_ICON: &[u8] = include_bytes!(
    "../../resources/icons/hicolor/scalable/apps/io.github.spyglass-camera.spyglass.svg"
);

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.spyglass-camera.spyglass";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        let store = MediaStore::new_default();
        let controller = crate::app::controller::CaptureController::new(config.last_facing);

        let theme_task = cosmic::command::set_theme(config.app_theme.theme());

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            theme_names: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            controller,
            store: store.clone(),
            access: None,
            bind_error: None,
            current_frame: None,
            frame_handle: None,
            overlay: None,
            overlay_handle: None,
            autofocus: state::AutofocusIndicator::default(),
            viewfinder_cursor: None,
            is_capturing: false,
        };

        // One-shot access probe, the screen-entry permission request analog
        let access_task = Task::perform(
            async move {
                tokio::task::spawn_blocking(move || permissions::check(&store))
                    .await
                    .unwrap_or_else(|e| {
                        error!(error = %e, "Access check task failed");
                        permissions::AccessReport {
                            camera_ok: false,
                            storage_ok: false,
                            advice: None,
                        }
                    })
            },
            |report| cosmic::Action::App(Message::AccessChecked(report)),
        );

        (app, Task::batch([theme_task, access_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    ///
    /// The camera bind task lives here: it runs for as long as its key
    /// (the lens facing) is stable, suspends while forwarding frames, and is
    /// cancelled - unbinding the camera - when the facing flips or the
    /// window goes away.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let facing = self.controller.facing();

        let camera_sub = Subscription::run_with_id(
            ("camera", facing),
            cosmic::iced::stream::channel(
                camera_constants::FRAME_CHANNEL_CAPACITY,
                move |mut output| async move {
                    info!(%facing, "Camera bind task started");

                    // Acquire the camera service; failure is fatal to the bind
                    let service = match camera::acquire_service().await {
                        Ok(service) => service,
                        Err(e) => {
                            let _ = output.send(Message::BindFailed(e.to_string())).await;
                            return;
                        }
                    };

                    let devices = service.enumerate();
                    let Some(device) = camera::pick_device(&devices, facing) else {
                        let _ = output
                            .send(Message::BindFailed(
                                crate::errors::CameraError::NoCameraFound.to_string(),
                            ))
                            .await;
                        return;
                    };

                    let (frame_tx, mut frame_rx) = futures::channel::mpsc::channel(
                        camera_constants::FRAME_CHANNEL_CAPACITY,
                    );

                    let session: Arc<dyn CameraSession> =
                        match service.open(&device, UseCases::standard(), frame_tx) {
                            Ok(session) => Arc::from(session),
                            Err(e) => {
                                let _ = output.send(Message::BindFailed(e.to_string())).await;
                                return;
                            }
                        };

                    if output
                        .send(Message::CameraBound(Arc::clone(&session)))
                        .await
                        .is_err()
                    {
                        return;
                    }

                    while let Some(frame) = frame_rx.next().await {
                        // Dropping frames is fine for live preview; we want
                        // the latest frame
                        match output.try_send(Message::CameraFrame(frame)) {
                            Ok(()) => {}
                            Err(e) if e.is_disconnected() => {
                                info!("Output channel closed, bind task ending");
                                break;
                            }
                            Err(_) => {}
                        }
                    }

                    info!(%facing, "Camera bind task ended");
                    // The session reference drops here; once the model lets
                    // go of its clone the device is released
                    drop(session);
                },
            ),
        );

        Subscription::batch([config_sub, camera_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
