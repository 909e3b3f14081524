// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use std::sync::Arc;

use cosmic::cosmic_config;
use cosmic::iced::{Point, Size};
use cosmic::widget::{self, about::About};
use tracing::warn;

use crate::app::controller::CaptureController;
use crate::app::viewfinder::overlay::{self, ScopeOverlay};
use crate::backends::camera::CameraSession;
use crate::backends::camera::types::{CameraFrame, CaptureEvent};
use crate::config::Config;
use crate::permissions::AccessReport;
use crate::storage::MediaStore;

/// One autofocus indicator request at a time, keyed by a monotonically
/// increasing counter.
///
/// Each tap takes a fresh id; the hide timer captured an id and clears state
/// only while that id is still current. A stale timer whose tap was already
/// replaced expires as a no-op, so a later tap's indicator never flickers
/// away early.
#[derive(Debug, Default)]
pub struct AutofocusIndicator {
    counter: u64,
    /// Active request: (id, normalized frame position)
    active: Option<(u64, (f32, f32))>,
}

impl AutofocusIndicator {
    /// Record a tap and return the id its hide timer must carry.
    pub fn record_tap(&mut self, position: (f32, f32)) -> u64 {
        self.counter += 1;
        self.active = Some((self.counter, position));
        self.counter
    }

    /// Hide the indicator if `id` is still the current request.
    ///
    /// Returns whether anything changed.
    pub fn expire(&mut self, id: u64) -> bool {
        match self.active {
            Some((current, _)) if current == id => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Position of the visible indicator, if any
    pub fn position(&self) -> Option<(f32, f32)> {
        self.active.map(|(_, position)| position)
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    /// Drop any visible indicator without invalidating pending timers
    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// The application model stores app-specific state used to describe its
/// interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Localized theme names for the settings dropdown
    pub theme_names: Vec<String>,
    /// Camera binding, zoom/focus control, and capture lifecycle
    pub controller: CaptureController,
    /// Media store captures are saved into
    pub store: MediaStore,
    /// Startup device/storage access report
    pub access: Option<AccessReport>,
    /// Fatal bind failure shown in place of the viewfinder
    pub bind_error: Option<String>,
    /// Current preview frame
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Render handle for the current frame
    pub frame_handle: Option<widget::image::Handle>,
    /// Parameters of the cached overlay bitmap
    pub overlay: Option<ScopeOverlay>,
    /// Render handle for the cached overlay bitmap
    pub overlay_handle: Option<widget::image::Handle>,
    /// Autofocus indicator request state
    pub autofocus: AutofocusIndicator,
    /// Last cursor position and viewport size over the viewfinder
    pub viewfinder_cursor: Option<(Point, Size)>,
    /// Whether a photo capture animation is in flight
    pub is_capturing: bool,
}

impl AppModel {
    /// Re-render the scope overlay bitmap if its inputs changed.
    ///
    /// Called from handlers after zoom, tap, frame, or binding changes; the
    /// cached handle is reused while the parameters are identical.
    pub fn refresh_overlay(&mut self) {
        let Some(frame) = &self.current_frame else {
            self.overlay = None;
            self.overlay_handle = None;
            return;
        };

        let (width, height) = overlay::overlay_size(frame.width, frame.height);
        let params = ScopeOverlay {
            width,
            height,
            zoom_position: overlay::zoom_position(
                self.controller.zoom_ratio(),
                self.controller.zoom_range(),
            ),
            focus_ring: self.autofocus.position(),
        };

        if self.overlay.as_ref() == Some(&params) && self.overlay_handle.is_some() {
            return;
        }

        match overlay::render(&params) {
            Some(data) => {
                self.overlay_handle =
                    Some(widget::image::Handle::from_rgba(width, height, data));
                self.overlay = Some(params);
            }
            None => {
                warn!(width, height, "Overlay render failed");
                self.overlay = None;
                self.overlay_handle = None;
            }
        }
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
///
/// Messages are organized into logical groups:
/// - **UI Navigation**: Context drawer pages, external URLs
/// - **Camera Lifecycle**: Bind results, frames, selector flips
/// - **Gestures**: Tap-to-focus and pinch zoom over the viewfinder
/// - **Capture**: Shutter press and capture lifecycle events
/// - **Settings**: Configuration updates
/// - **System**: Access checks
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Camera Lifecycle =====
    /// The bind task attached to a camera
    CameraBound(Arc<dyn CameraSession>),
    /// The bind task failed fatally
    BindFailed(String),
    /// New preview frame from the bound camera
    CameraFrame(Arc<CameraFrame>),
    /// Toggle the camera selector and rebind
    FlipCamera,

    // ===== Gestures =====
    /// Cursor moved over the viewfinder (position, viewport size)
    ViewfinderCursor(Point, Size),
    /// Press on the viewfinder at the last tracked cursor position
    ViewfinderPressed,
    /// Multiplicative zoom delta from a pinch/scroll gesture
    PinchZoom(f32),
    /// An autofocus indicator hide timer fired
    AutofocusExpired(u64),

    // ===== Capture =====
    /// Shutter pressed
    Capture,
    /// Capture lifecycle event from the camera
    CaptureEvent(CaptureEvent),
    /// Clear the shutter press animation
    ClearCaptureAnimation,

    // ===== Settings =====
    /// Configuration updated externally
    UpdateConfig(Config),
    /// Theme selected in the settings drawer
    SetAppTheme(usize),
    /// Shutter sound toggled in the settings drawer
    ToggleShutterSound(bool),
    /// Open the capture directory in the file manager
    OpenPhotoFolder,

    // ===== System =====
    /// Startup access check finished
    AccessChecked(AccessReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_hidden_initially() {
        let indicator = AutofocusIndicator::default();
        assert!(!indicator.is_visible());
        assert!(indicator.position().is_none());
    }

    #[test]
    fn test_indicator_shows_latest_tap() {
        let mut indicator = AutofocusIndicator::default();
        indicator.record_tap((0.2, 0.2));
        indicator.record_tap((0.8, 0.6));
        assert_eq!(indicator.position(), Some((0.8, 0.6)));
    }

    #[test]
    fn test_stale_timer_does_not_clear_newer_tap() {
        let mut indicator = AutofocusIndicator::default();

        // Tap at t=0, second tap at t=500ms, first timer fires at t=1000ms:
        // the indicator must still reflect the second tap.
        let first = indicator.record_tap((0.1, 0.1));
        let second = indicator.record_tap((0.9, 0.9));

        assert!(!indicator.expire(first));
        assert!(indicator.is_visible());
        assert_eq!(indicator.position(), Some((0.9, 0.9)));

        // The second timer (t=1500ms) hides it for good
        assert!(indicator.expire(second));
        assert!(!indicator.is_visible());

        // And firing again stays a no-op
        assert!(!indicator.expire(second));
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut indicator = AutofocusIndicator::default();
        let a = indicator.record_tap((0.0, 0.0));
        let b = indicator.record_tap((0.0, 0.0));
        let c = indicator.record_tap((0.0, 0.0));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_clear_keeps_counter_monotonic() {
        let mut indicator = AutofocusIndicator::default();
        let first = indicator.record_tap((0.5, 0.5));
        indicator.clear();
        let second = indicator.record_tap((0.5, 0.5));
        assert!(second > first);
        // The old timer still cannot clear the new request
        assert!(!indicator.expire(first));
        assert!(indicator.is_visible());
    }
}
