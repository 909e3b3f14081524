// SPDX-License-Identifier: GPL-3.0-only

//! Capture controller
//!
//! Owns the camera binding state, translates gestures into camera commands,
//! runs the capture lifecycle, and exposes the observable state the
//! viewfinder renders (zoom ratio, save progress, saved location). Contains
//! no UI toolkit types, so the whole permission → bind → capture → save →
//! unbind machine is testable with fake services.

use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::mpsc;
use tracing::{debug, error, info, warn};

use crate::backends::audio::SoundPlayer;
use crate::backends::camera::CameraSession;
use crate::backends::camera::types::{
    CameraFrame, CameraInfo, CaptureEvent, LensFacing, MeteringPointFactory, ZoomRange,
};
use crate::constants::zoom as zoom_constants;
use crate::storage::{MediaStore, SaveTarget, capture_file_name};

#[derive(Debug)]
pub struct CaptureController {
    /// Which camera binds next (and is bound now, when `session` is set)
    facing: LensFacing,
    session: Option<Arc<dyn CameraSession>>,
    info: Option<CameraInfo>,
    /// Built from the resolution of the current preview frame
    metering_factory: Option<MeteringPointFactory>,
    /// Device reports incremental capture-save progress
    can_progress: bool,
    /// Present only while an image is being written
    save_progress: Option<f32>,
    last_saved: Option<PathBuf>,
    sound: Option<Box<dyn SoundPlayer>>,
    zoom_ratio: f32,
}

impl CaptureController {
    pub fn new(facing: LensFacing) -> Self {
        Self {
            facing,
            session: None,
            info: None,
            metering_factory: None,
            can_progress: false,
            save_progress: None,
            last_saved: None,
            sound: None,
            zoom_ratio: zoom_constants::DEFAULT_RATIO,
        }
    }

    pub fn facing(&self) -> LensFacing {
        self.facing
    }

    /// Toggle the camera selector.
    ///
    /// Does not rebind by itself; the caller restarts the bind task.
    pub fn flip(&mut self) -> LensFacing {
        self.facing = self.facing.flipped();
        info!(facing = %self.facing, "Camera flipped");
        self.facing
    }

    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// Complete a bind: store the session and its capability info, and take
    /// ownership of the shutter sound for the session's lifetime.
    pub fn bind_complete(
        &mut self,
        session: Arc<dyn CameraSession>,
        sound: Option<Box<dyn SoundPlayer>>,
    ) {
        let info = session.info().clone();
        info!(
            camera = %info.device.name,
            resolution = ?info.resolution,
            zoom = ?info.zoom,
            capture_progress = info.supports_capture_progress,
            "Camera bound"
        );

        self.can_progress = info.supports_capture_progress;
        self.info = Some(info);
        self.session = Some(session);
        self.sound = sound;
        self.zoom_ratio = zoom_constants::DEFAULT_RATIO;
    }

    /// Tear down the binding: drop the session (stopping the stream and
    /// releasing the device) and release the sound player.
    ///
    /// Safe to call when already unbound.
    pub fn unbind(&mut self) {
        if self.session.take().is_some() {
            info!(facing = %self.facing, "Camera unbound");
        }
        self.info = None;
        self.metering_factory = None;
        self.can_progress = false;
        self.save_progress = None;
        self.sound = None;
        self.zoom_ratio = zoom_constants::DEFAULT_RATIO;
    }

    /// Track the current preview frame; the metering factory follows the
    /// frame resolution.
    pub fn on_frame(&mut self, frame: &CameraFrame) {
        let factory = MeteringPointFactory::new(frame.width, frame.height);
        if self.metering_factory != Some(factory) {
            debug!(
                width = frame.width,
                height = frame.height,
                "Metering point factory updated"
            );
            self.metering_factory = Some(factory);
        }
    }

    /// Request focus and exposure convergence at frame-space coordinates.
    ///
    /// Silently does nothing before the first frame (no factory yet) or
    /// while unbound. Returns whether a command was issued.
    pub fn tap_to_focus(&self, x: f32, y: f32) -> bool {
        let Some(factory) = self.metering_factory else {
            return false;
        };
        let Some(session) = &self.session else {
            return false;
        };

        let point = factory.create(x, y);
        match session.focus_and_meter(point) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Focus request failed");
                false
            }
        }
    }

    /// Forward a zoom ratio to the camera without clamping; callers clamp.
    pub fn set_zoom(&self, ratio: f32) {
        if let Some(session) = &self.session {
            if let Err(e) = session.set_zoom_ratio(ratio) {
                warn!(ratio, error = %e, "Zoom command failed");
            }
        }
    }

    /// Accumulate a multiplicative pinch delta into the running ratio.
    ///
    /// With zoom bounds available the ratio is clamped and forwarded to the
    /// camera; without bounds only the local ratio changes.
    pub fn apply_pinch(&mut self, delta: f32) -> f32 {
        self.zoom_ratio *= delta;

        if let Some(range) = self.zoom_range() {
            self.zoom_ratio = range.clamp(self.zoom_ratio);
            self.set_zoom(self.zoom_ratio);
        }

        self.zoom_ratio
    }

    pub fn zoom_ratio(&self) -> f32 {
        self.zoom_ratio
    }

    /// Swap the shutter sound on the live binding
    pub fn set_sound(&mut self, sound: Option<Box<dyn SoundPlayer>>) {
        self.sound = sound;
    }

    pub fn zoom_range(&self) -> Option<ZoomRange> {
        self.info.as_ref().and_then(|info| info.zoom)
    }

    pub fn save_progress(&self) -> Option<f32> {
        self.save_progress
    }

    pub fn last_saved(&self) -> Option<&PathBuf> {
        self.last_saved.as_ref()
    }

    /// Start an asynchronous capture-and-save with a timestamped name.
    ///
    /// Returns the capture event stream, or `None` while unbound.
    pub fn take_picture(
        &mut self,
        store: MediaStore,
    ) -> Option<mpsc::UnboundedReceiver<CaptureEvent>> {
        let session = self.session.as_ref()?;

        let name = capture_file_name(chrono::Local::now().naive_local());
        info!(%name, "Taking picture");

        let (events_tx, events_rx) = mpsc::unbounded();
        session.take_picture(SaveTarget { store, name }, events_tx);
        Some(events_rx)
    }

    /// Apply one capture lifecycle event to the observable state.
    pub fn on_capture_event(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::Started => {
                if let Some(sound) = &self.sound {
                    sound.play();
                }
                if self.can_progress {
                    self.save_progress = Some(0.0);
                }
            }
            CaptureEvent::Progressed(pct) => {
                if self.can_progress {
                    self.save_progress = Some(f32::from(*pct) / 100.0);
                }
            }
            CaptureEvent::Saved(path) => {
                info!(path = %path.display(), "Capture saved");
                self.save_progress = None;
                self.last_saved = Some(path.clone());
            }
            CaptureEvent::Failed(err) => {
                error!(error = %err, "Capture failed");
                // The save is over either way; stale progress would wedge
                // the indicator
                self.save_progress = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::{CameraDevice, MeteringPoint};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeSession {
        info: CameraInfo,
        zoom_calls: Mutex<Vec<f32>>,
        focus_calls: Mutex<Vec<MeteringPoint>>,
        scripted_events: Vec<CaptureEvent>,
    }

    impl FakeSession {
        fn new(zoom: Option<ZoomRange>, supports_capture_progress: bool) -> Self {
            Self {
                info: CameraInfo {
                    device: CameraDevice {
                        name: "Fake camera".to_string(),
                        path: "/dev/video9".to_string(),
                        facing: LensFacing::Back,
                    },
                    resolution: (1920, 1080),
                    zoom,
                    supports_capture_progress,
                },
                zoom_calls: Mutex::new(Vec::new()),
                focus_calls: Mutex::new(Vec::new()),
                scripted_events: Vec::new(),
            }
        }

        fn with_events(mut self, events: Vec<CaptureEvent>) -> Self {
            self.scripted_events = events;
            self
        }
    }

    impl CameraSession for FakeSession {
        fn info(&self) -> &CameraInfo {
            &self.info
        }

        fn set_zoom_ratio(&self, ratio: f32) -> Result<(), crate::errors::CameraError> {
            self.zoom_calls.lock().unwrap().push(ratio);
            Ok(())
        }

        fn focus_and_meter(&self, point: MeteringPoint) -> Result<(), crate::errors::CameraError> {
            self.focus_calls.lock().unwrap().push(point);
            Ok(())
        }

        fn take_picture(
            &self,
            _target: SaveTarget,
            events: mpsc::UnboundedSender<CaptureEvent>,
        ) {
            for event in &self.scripted_events {
                let _ = events.unbounded_send(event.clone());
            }
        }
    }

    #[derive(Debug)]
    struct CountingSound(Arc<AtomicUsize>);

    impl SoundPlayer for CountingSound {
        fn play(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct DropFlagSound(Arc<AtomicBool>);

    impl SoundPlayer for DropFlagSound {
        fn play(&self) {}
    }

    impl Drop for DropFlagSound {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: Arc::from(vec![0u8; (width * height * 4) as usize]),
            stride: width * 4,
            captured_at: std::time::Instant::now(),
        }
    }

    #[test]
    fn test_flip_is_involution() {
        let mut controller = CaptureController::new(LensFacing::Back);
        assert_eq!(controller.flip(), LensFacing::Front);
        assert_eq!(controller.flip(), LensFacing::Back);
        assert_eq!(controller.facing(), LensFacing::Back);
    }

    #[test]
    fn test_tap_before_any_frame_is_silent() {
        let session = Arc::new(FakeSession::new(None, false));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session.clone(), None);

        // No frame yet: no metering factory, no command, no panic
        assert!(!controller.tap_to_focus(100.0, 100.0));
        assert!(session.focus_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tap_unbound_is_silent() {
        let controller = CaptureController::new(LensFacing::Back);
        assert!(!controller.tap_to_focus(10.0, 10.0));
    }

    #[test]
    fn test_tap_after_frame_issues_normalized_command() {
        let session = Arc::new(FakeSession::new(None, false));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session.clone(), None);
        controller.on_frame(&frame(1920, 1080));

        assert!(controller.tap_to_focus(960.0, 540.0));

        let calls = session.focus_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].x - 0.5).abs() < f32::EPSILON);
        assert!((calls[0].y - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pinch_zoom_always_clamped() {
        let range = ZoomRange { min: 1.0, max: 4.0 };
        let session = Arc::new(FakeSession::new(Some(range), false));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session.clone(), None);

        // Wildly out-of-range deltas in both directions
        for delta in [1000.0, 3.5, 0.000_01, 0.5, 250.0, 0.0] {
            let ratio = controller.apply_pinch(delta);
            assert!((range.min..=range.max).contains(&ratio));
        }

        for forwarded in session.zoom_calls.lock().unwrap().iter() {
            assert!((range.min..=range.max).contains(forwarded));
        }
    }

    #[test]
    fn test_pinch_without_bounds_issues_no_command() {
        let session = Arc::new(FakeSession::new(None, false));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session.clone(), None);

        let ratio = controller.apply_pinch(2.0);
        assert!((ratio - 2.0).abs() < f32::EPSILON);
        assert!(session.zoom_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_capture_lifecycle_progress_sequence() {
        let range = ZoomRange { min: 1.0, max: 4.0 };
        let events = vec![
            CaptureEvent::Started,
            CaptureEvent::Progressed(0),
            CaptureEvent::Progressed(25),
            CaptureEvent::Progressed(50),
            CaptureEvent::Progressed(100),
            CaptureEvent::Saved(PathBuf::from("/tmp/photo.jpg")),
        ];
        let session = Arc::new(FakeSession::new(Some(range), true).with_events(events));
        let plays = Arc::new(AtomicUsize::new(0));

        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session, Some(Box::new(CountingSound(plays.clone()))));

        let mut rx = controller
            .take_picture(MediaStore::with_root("/tmp"))
            .expect("bound controller should start a capture");

        let mut observed = Vec::new();
        while let Ok(Some(event)) = rx.try_next() {
            controller.on_capture_event(&event);
            observed.push(controller.save_progress());
        }

        assert_eq!(
            observed,
            vec![
                Some(0.0),
                Some(0.0),
                Some(0.25),
                Some(0.5),
                Some(1.0),
                None,
            ]
        );
        assert_eq!(plays.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.last_saved(),
            Some(&PathBuf::from("/tmp/photo.jpg"))
        );
    }

    #[test]
    fn test_progress_gated_by_capability() {
        let session = Arc::new(FakeSession::new(None, false));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session, None);

        controller.on_capture_event(&CaptureEvent::Started);
        assert_eq!(controller.save_progress(), None);

        controller.on_capture_event(&CaptureEvent::Progressed(50));
        assert_eq!(controller.save_progress(), None);
    }

    #[test]
    fn test_failure_clears_progress() {
        let session = Arc::new(FakeSession::new(None, true));
        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session, None);

        controller.on_capture_event(&CaptureEvent::Started);
        controller.on_capture_event(&CaptureEvent::Progressed(40));
        assert_eq!(controller.save_progress(), Some(0.4));

        controller.on_capture_event(&CaptureEvent::Failed("disk full".to_string()));
        assert_eq!(controller.save_progress(), None);
    }

    #[test]
    fn test_take_picture_unbound_returns_none() {
        let mut controller = CaptureController::new(LensFacing::Back);
        assert!(controller.take_picture(MediaStore::with_root("/tmp")).is_none());
    }

    #[test]
    fn test_unbind_releases_sound_and_is_idempotent() {
        let released = Arc::new(AtomicBool::new(false));
        let session = Arc::new(FakeSession::new(None, false));

        let mut controller = CaptureController::new(LensFacing::Back);
        controller.bind_complete(session, Some(Box::new(DropFlagSound(released.clone()))));
        controller.on_frame(&frame(640, 480));

        controller.unbind();
        assert!(released.load(Ordering::SeqCst));
        assert!(!controller.is_bound());
        assert!(!controller.tap_to_focus(10.0, 10.0));

        // Double teardown must be harmless
        controller.unbind();
    }
}
