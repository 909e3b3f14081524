// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Storage/filesystem errors
    Storage(StorageError),
    /// Audio feedback errors
    Audio(AudioError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Camera binding and control errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found for the requested facing
    NoCameraFound,
    /// Camera service is unavailable on this system
    ServiceUnavailable(String),
    /// Opening the camera device failed
    OpenFailed(String),
    /// A camera control call failed
    ControlFailed(String),
    /// The selected format could not be negotiated
    InvalidFormat(String),
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Encoding the frame failed
    EncodingFailed(String),
    /// Saving the encoded image failed
    SaveFailed(String),
}

/// Media store errors
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Directory could not be created
    CreateDirFailed(String),
    /// File could not be written
    WriteFailed(String),
}

/// Shutter sound errors
#[derive(Debug, Clone)]
pub enum AudioError {
    /// No output device available
    NoOutputDevice,
    /// The bundled sound asset could not be decoded
    InvalidAsset(String),
    /// Building or starting the output stream failed
    StreamFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Audio(e) => write!(f, "Audio error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::ServiceUnavailable(msg) => write!(f, "Camera service unavailable: {}", msg),
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::ControlFailed(msg) => write!(f, "Camera control failed: {}", msg),
            CameraError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::CreateDirFailed(msg) => write!(f, "Failed to create directory: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Failed to write file: {}", msg),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "No audio output device found"),
            AudioError::InvalidAsset(msg) => write!(f, "Invalid sound asset: {}", msg),
            AudioError::StreamFailed(msg) => write!(f, "Audio stream failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for StorageError {}
impl std::error::Error for AudioError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        AppError::Audio(err)
    }
}

impl From<StorageError> for CaptureError {
    fn from(err: StorageError) -> Self {
        CaptureError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::WriteFailed(err.to_string())
    }
}
