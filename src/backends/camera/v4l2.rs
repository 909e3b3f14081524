// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Streams preview frames from a dedicated capture thread and exposes zoom,
//! focus, and metering through V4L2 controls. Dropping the session stops the
//! stream and releases the device.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::channel::mpsc;
use tracing::{debug, error, info, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;

use super::{CameraService, CameraSession, classify_facing, controls, convert};
use crate::constants::{JPEG_QUALITY, camera as camera_constants, zoom as zoom_constants};
use crate::errors::{CameraError, CaptureError};
use crate::storage::SaveTarget;
use super::types::{
    CameraDevice, CameraFrame, CameraInfo, CaptureEvent, MeteringPoint, UseCases, ZoomRange,
};

/// How long to wait for the capture thread to negotiate a format
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// V4L2-backed camera service
#[derive(Debug)]
pub struct V4l2Service;

impl V4l2Service {
    /// Probe for the platform video layer.
    ///
    /// Fails when the system has no device tree to speak of; individual
    /// device problems surface later, at open time.
    pub fn probe() -> Result<Self, CameraError> {
        if !Path::new("/dev").is_dir() {
            return Err(CameraError::ServiceUnavailable(
                "/dev is not available".to_string(),
            ));
        }
        Ok(Self)
    }
}

impl CameraService for V4l2Service {
    fn enumerate(&self) -> Vec<CameraDevice> {
        let mut devices = Vec::new();

        for node in v4l::context::enum_devices() {
            let path = format!("/dev/video{}", node.index());

            let Ok(dev) = v4l::Device::with_path(&path) else {
                continue;
            };
            let Ok(caps) = dev.query_caps() else {
                continue;
            };

            // Skip metadata/output nodes; only frame producers are cameras
            if !caps
                .capabilities
                .contains(v4l::capability::Flags::VIDEO_CAPTURE)
            {
                continue;
            }

            let name = caps.card.clone();
            let facing = classify_facing(&name);
            debug!(%path, %name, %facing, "Found capture device");

            devices.push(CameraDevice { name, path, facing });
        }

        info!(count = devices.len(), "Enumerated cameras");
        devices
    }

    fn open(
        &self,
        device: &CameraDevice,
        use_cases: UseCases,
        frames: mpsc::Sender<Arc<CameraFrame>>,
    ) -> Result<Box<dyn CameraSession>, CameraError> {
        info!(
            name = %device.name,
            path = %device.path,
            preview = use_cases.preview,
            still_capture = use_cases.still_capture,
            video_capture = use_cases.video_capture,
            "Opening camera"
        );

        let stop = Arc::new(AtomicBool::new(false));
        let latest = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let worker = {
            let path = device.path.clone();
            let stop = Arc::clone(&stop);
            let latest = Arc::clone(&latest);
            std::thread::Builder::new()
                .name("camera-capture".to_string())
                .spawn(move || capture_loop(&path, stop, latest, frames, ready_tx))
                .map_err(|e| CameraError::OpenFailed(e.to_string()))?
        };

        // Wait for the capture thread to negotiate a format
        let resolution = match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(resolution)) => resolution,
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                stop.store(true, Ordering::Release);
                return Err(CameraError::OpenFailed(
                    "timed out waiting for capture format".to_string(),
                ));
            }
        };

        // Hardware zoom span, when the driver has one
        let zoom_control = controls::query_control(&device.path, controls::V4L2_CID_ZOOM_ABSOLUTE)
            .filter(|ctrl| !ctrl.is_disabled() && ctrl.maximum > ctrl.minimum);

        let zoom = zoom_control.as_ref().map(|ctrl| {
            info!(
                hw_min = ctrl.minimum,
                hw_max = ctrl.maximum,
                max_ratio = zoom_constants::MAX_RATIO,
                "Hardware zoom available"
            );
            ZoomRange {
                min: 1.0,
                max: zoom_constants::MAX_RATIO,
            }
        });

        let info = CameraInfo {
            device: device.clone(),
            resolution,
            zoom,
            // V4L2 has no incremental save-progress reporting
            supports_capture_progress: false,
        };

        Ok(Box::new(V4l2Session {
            info,
            zoom_control,
            latest,
            stop,
            worker: Mutex::new(Some(worker)),
        }))
    }
}

/// A bound V4L2 camera
#[derive(Debug)]
pub struct V4l2Session {
    info: CameraInfo,
    zoom_control: Option<controls::ControlInfo>,
    /// Most recent preview frame, shared with the capture thread
    latest: Arc<Mutex<Option<Arc<CameraFrame>>>>,
    stop: Arc<AtomicBool>,
    worker: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl CameraSession for V4l2Session {
    fn info(&self) -> &CameraInfo {
        &self.info
    }

    fn set_zoom_ratio(&self, ratio: f32) -> Result<(), CameraError> {
        let Some(ctrl) = &self.zoom_control else {
            return Err(CameraError::ControlFailed(
                "device has no zoom control".to_string(),
            ));
        };

        // Map the presented ratio space linearly onto the hardware span
        let span = (ctrl.maximum - ctrl.minimum) as f32;
        let t = (ratio - 1.0) / (zoom_constants::MAX_RATIO - 1.0);
        let value = ctrl.minimum + (t.clamp(0.0, 1.0) * span).round() as i32;

        debug!(ratio, value, "Setting hardware zoom");
        controls::set_control(&self.info.device.path, ctrl.id, value)
            .map_err(CameraError::ControlFailed)
    }

    fn focus_and_meter(&self, point: MeteringPoint) -> Result<(), CameraError> {
        let path = &self.info.device.path;
        debug!(x = point.x, y = point.y, "Focus and metering requested");

        // V4L2 has no per-region metering; retrigger autofocus and bias
        // exposure metering toward spot where the driver supports it.
        if controls::has_control(path, controls::V4L2_CID_FOCUS_AUTO) {
            controls::set_control(path, controls::V4L2_CID_FOCUS_AUTO, 0)
                .and_then(|_| controls::set_control(path, controls::V4L2_CID_FOCUS_AUTO, 1))
                .map_err(CameraError::ControlFailed)?;
        } else {
            debug!(%path, "No autofocus control, tap ignored by driver");
        }

        if controls::has_control(path, controls::V4L2_CID_EXPOSURE_METERING) {
            let _ = controls::set_control(
                path,
                controls::V4L2_CID_EXPOSURE_METERING,
                controls::V4L2_EXPOSURE_METERING_SPOT,
            );
        }

        Ok(())
    }

    fn take_picture(&self, target: SaveTarget, events: mpsc::UnboundedSender<CaptureEvent>) {
        let frame = self.latest.lock().ok().and_then(|guard| guard.clone());

        // Encoding and disk IO stay off the UI thread
        let spawned = std::thread::Builder::new()
            .name("photo-save".to_string())
            .spawn(move || {
                let _ = events.unbounded_send(CaptureEvent::Started);

                match encode_and_save(frame, &target) {
                    Ok(path) => {
                        let _ = events.unbounded_send(CaptureEvent::Saved(path));
                    }
                    Err(e) => {
                        error!(error = %e, "Photo capture failed");
                        let _ = events.unbounded_send(CaptureEvent::Failed(e.to_string()));
                    }
                }
            });

        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn photo save thread");
        }
    }
}

impl Drop for V4l2Session {
    fn drop(&mut self) {
        info!(path = %self.info.device.path, "Unbinding camera");
        self.stop.store(true, Ordering::Release);
        if let Ok(mut worker) = self.worker.lock() {
            if let Some(handle) = worker.take() {
                let _ = handle.join();
            }
        }
    }
}

/// Encode the latest preview frame as JPEG and write it to the store
fn encode_and_save(
    frame: Option<Arc<CameraFrame>>,
    target: &SaveTarget,
) -> Result<std::path::PathBuf, CaptureError> {
    let frame = frame.ok_or(CaptureError::NoFrameAvailable)?;

    // JPEG carries no alpha; strip it before encoding
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| CaptureError::EncodingFailed("frame buffer size mismatch".to_string()))?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut jpeg = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
        &mut std::io::Cursor::new(&mut jpeg),
        JPEG_QUALITY,
    );
    image::ImageEncoder::write_image(
        encoder,
        rgb.as_raw(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    let path = target.store.save_jpeg(&target.name, &jpeg)?;
    Ok(path)
}

/// Capture loop running on the dedicated camera thread.
///
/// Opens the device, negotiates a format, reports readiness, then forwards
/// frames until the stop flag is raised or every receiver is gone.
fn capture_loop(
    path: &str,
    stop: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<Arc<CameraFrame>>>>,
    mut frames: mpsc::Sender<Arc<CameraFrame>>,
    ready: std::sync::mpsc::Sender<Result<(u32, u32), CameraError>>,
) {
    let (device, fourcc, width, height) = match negotiate_format(path) {
        Ok(ok) => ok,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mut stream = match Stream::with_buffers(
        &device,
        Type::VideoCapture,
        camera_constants::STREAM_BUFFERS,
    ) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(CameraError::OpenFailed(e.to_string())));
            return;
        }
    };

    let _ = ready.send(Ok((width, height)));
    info!(%path, width, height, format = %fourcc, "Capture stream started");

    let mut frame_count = 0u64;
    let mut decode_warned = false;

    while !stop.load(Ordering::Acquire) {
        let (buf, meta) = match stream.next() {
            Ok(ok) => ok,
            Err(e) => {
                error!(%path, error = %e, "Capture stream ended");
                break;
            }
        };
        let used = &buf[..(meta.bytesused as usize).min(buf.len())];

        let rgba = match &fourcc.repr {
            b"MJPG" => match convert::mjpg_to_rgba(used) {
                Ok((rgba, _, _)) => rgba,
                Err(e) => {
                    if !decode_warned {
                        warn!(error = %e, "Dropping undecodable frame");
                        decode_warned = true;
                    }
                    continue;
                }
            },
            b"YUYV" => convert::yuyv_to_rgba(used, width, height),
            other => {
                if !decode_warned {
                    warn!(format = ?other, "Unsupported pixel format");
                    decode_warned = true;
                }
                continue;
            }
        };

        let frame = Arc::new(CameraFrame {
            width,
            height,
            data: Arc::from(rgba),
            stride: width * 4,
            captured_at: Instant::now(),
        });

        if let Ok(mut guard) = latest.lock() {
            *guard = Some(Arc::clone(&frame));
        }

        frame_count += 1;
        if frame_count % 120 == 0 {
            debug!(frame = frame_count, "Capture stream alive");
        }

        // Dropping frames is fine for live preview; we want the latest one
        match frames.try_send(frame) {
            Ok(()) => {}
            Err(e) if e.is_disconnected() => {
                info!("Frame receiver gone, stopping capture");
                break;
            }
            Err(_) => {}
        }
    }

    info!(%path, frames = frame_count, "Capture stream stopped");
}

/// Open the device and pick a capture format, preferring MJPG at the
/// preferred resolution, falling back to whatever the driver offers.
fn negotiate_format(path: &str) -> Result<(v4l::Device, FourCC, u32, u32), CameraError> {
    let device =
        v4l::Device::with_path(path).map_err(|e| CameraError::OpenFailed(e.to_string()))?;

    let descriptions = device
        .enum_formats()
        .map_err(|e| CameraError::InvalidFormat(e.to_string()))?;

    let supported: Vec<FourCC> = descriptions.iter().map(|desc| desc.fourcc).collect();
    let fourcc = if supported.contains(&FourCC::new(b"MJPG")) {
        FourCC::new(b"MJPG")
    } else if supported.contains(&FourCC::new(b"YUYV")) {
        FourCC::new(b"YUYV")
    } else {
        return Err(CameraError::InvalidFormat(format!(
            "no supported pixel format, device offers {:?}",
            supported
        )));
    };

    let requested = v4l::Format::new(
        camera_constants::PREFERRED_WIDTH,
        camera_constants::PREFERRED_HEIGHT,
        fourcc,
    );
    let actual = device
        .set_format(&requested)
        .map_err(|e| CameraError::InvalidFormat(e.to_string()))?;

    Ok((device, actual.fourcc, actual.width, actual.height))
}
