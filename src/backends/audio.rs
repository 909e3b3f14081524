// SPDX-License-Identifier: GPL-3.0-only

//! Shutter sound playback
//!
//! A bundled WAV asset is decoded once and played through the default output
//! device. The cpal stream lives on a dedicated audio thread (cpal streams
//! are not `Send`); the app talks to it through a small command channel.
//! Triggering play while the sound is still sounding restarts it from the
//! beginning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info};

use crate::errors::AudioError;

/// Bundled shutter click, 16-bit PCM mono
const SHUTTER_ASSET: &[u8] = include_bytes!("../../resources/sounds/shutter.wav");

/// Something that can produce shutter feedback.
///
/// The production implementation is [`ShutterSound`]; tests substitute a
/// counting player.
pub trait SoundPlayer: Send + std::fmt::Debug {
    fn play(&self);
}

/// Commands for the audio thread
enum Command {
    Play,
    Shutdown,
}

/// Shutter sound player backed by a cpal output stream
pub struct ShutterSound {
    commands: Sender<Command>,
}

impl std::fmt::Debug for ShutterSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShutterSound")
    }
}

impl ShutterSound {
    /// Decode the bundled asset and bring up the output stream.
    pub fn load() -> Result<Self, AudioError> {
        let (samples, sample_rate) = decode_wav_pcm16(SHUTTER_ASSET)?;
        let samples = Arc::new(samples);

        let (command_tx, command_rx) = channel();
        let (ready_tx, ready_rx) = channel();

        std::thread::Builder::new()
            .name("shutter-sound".to_string())
            .spawn(move || audio_thread(samples, sample_rate, command_rx, ready_tx))
            .map_err(|e| AudioError::StreamFailed(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| AudioError::StreamFailed("audio thread died during setup".to_string()))??;

        info!(sample_rate, "Shutter sound loaded");
        Ok(Self {
            commands: command_tx,
        })
    }
}

impl SoundPlayer for ShutterSound {
    fn play(&self) {
        if self.commands.send(Command::Play).is_err() {
            debug!("Audio thread gone, shutter sound skipped");
        }
    }
}

impl Drop for ShutterSound {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        debug!("Shutter sound released");
    }
}

/// Owns the cpal stream for its whole lifetime.
fn audio_thread(
    samples: Arc<Vec<f32>>,
    wav_rate: u32,
    commands: Receiver<Command>,
    ready: Sender<Result<(), AudioError>>,
) {
    let restart = Arc::new(AtomicBool::new(false));

    let stream = match build_stream(samples, wav_rate, Arc::clone(&restart)) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready.send(Err(AudioError::StreamFailed(e.to_string())));
        return;
    }

    let _ = ready.send(Ok(()));

    // Keep the stream alive until shutdown; Play restarts from the start,
    // matching a media player that stops, re-prepares, and starts again.
    loop {
        match commands.recv() {
            Ok(Command::Play) => restart.store(true, Ordering::Release),
            Ok(Command::Shutdown) | Err(_) => break,
        }
    }
}

fn build_stream(
    samples: Arc<Vec<f32>>,
    wav_rate: u32,
    restart: Arc<AtomicBool>,
) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;
    let config = device
        .default_output_config()
        .map_err(|e| AudioError::StreamFailed(e.to_string()))?;

    let channels = config.channels() as usize;
    let device_rate = config.sample_rate().0;
    let step = wav_rate as f64 / device_rate as f64;

    // Playback cursor past the end means silence
    let mut cursor = samples.len() as f64;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if restart.swap(false, Ordering::AcqRel) {
                    cursor = 0.0;
                }

                for frame in out.chunks_mut(channels) {
                    let value = match samples.get(cursor as usize) {
                        Some(sample) => *sample,
                        None => 0.0,
                    };
                    for slot in frame.iter_mut() {
                        *slot = value;
                    }
                    cursor += step;
                }
            },
            |e| error!(error = %e, "Audio stream error"),
            None,
        )
        .map_err(|e| AudioError::StreamFailed(e.to_string()))?;

    Ok(stream)
}

/// Decode a canonical PCM16 WAV file into mono f32 samples.
///
/// Only handles what the bundled asset uses: RIFF/WAVE with a PCM `fmt `
/// chunk; multi-channel input is downmixed by averaging.
fn decode_wav_pcm16(bytes: &[u8]) -> Result<(Vec<f32>, u32), AudioError> {
    let invalid = |msg: &str| AudioError::InvalidAsset(msg.to_string());

    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(invalid("not a RIFF/WAVE file"));
    }

    let mut channels = 0u16;
    let mut sample_rate = 0u32;
    let mut data: Option<&[u8]> = None;

    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().unwrap()) as usize;
        let body_end = (offset + 8 + size).min(bytes.len());
        let body = &bytes[offset + 8..body_end];

        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(invalid("truncated fmt chunk"));
                }
                let format = u16::from_le_bytes(body[0..2].try_into().unwrap());
                if format != 1 {
                    return Err(invalid("only PCM is supported"));
                }
                channels = u16::from_le_bytes(body[2..4].try_into().unwrap());
                sample_rate = u32::from_le_bytes(body[4..8].try_into().unwrap());
                let bits = u16::from_le_bytes(body[14..16].try_into().unwrap());
                if bits != 16 {
                    return Err(invalid("only 16-bit samples are supported"));
                }
            }
            b"data" => data = Some(body),
            _ => {}
        }

        // Chunks are word-aligned
        offset = body_end + (size & 1);
    }

    let data = data.ok_or_else(|| invalid("missing data chunk"))?;
    if channels == 0 || sample_rate == 0 {
        return Err(invalid("missing fmt chunk"));
    }

    let per_frame = channels as usize;
    let mut samples = Vec::with_capacity(data.len() / 2 / per_frame);
    for frame in data.chunks_exact(2 * per_frame) {
        let mut acc = 0.0f32;
        for sample in frame.chunks_exact(2) {
            acc += i16::from_le_bytes(sample.try_into().unwrap()) as f32 / 32768.0;
        }
        samples.push(acc / per_frame as f32);
    }

    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a canonical WAV in memory
    fn wav(channels: u16, rate: u32, samples: &[i16]) -> Vec<u8> {
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * u32::from(channels) * 2).to_le_bytes());
        out.extend_from_slice(&(channels * 2).to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn test_decode_mono() {
        let bytes = wav(1, 22050, &[0, 16384, -16384, 32767]);
        let (samples, rate) = decode_wav_pcm16(&bytes).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 0.5).abs() < 0.001);
        assert!((samples[2] + 0.5).abs() < 0.001);
    }

    #[test]
    fn test_decode_stereo_downmixes() {
        let bytes = wav(2, 44100, &[16384, -16384, 32000, 32000]);
        let (samples, rate) = decode_wav_pcm16(&bytes).unwrap();
        assert_eq!(rate, 44100);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].abs() < 0.001);
        assert!(samples[1] > 0.9);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_wav_pcm16(b"definitely not a wav").is_err());
    }

    #[test]
    fn test_bundled_asset_decodes() {
        let (samples, rate) = decode_wav_pcm16(SHUTTER_ASSET).unwrap();
        assert!(rate > 0);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }
}
