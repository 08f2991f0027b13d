//! Audio system: cpal output stream playing the ambient rain loop.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;

use super::synthesis::RAIN_COMPOSITION;
use super::track::AmbientTrack;
use crate::params::audio_constants::{BLOCK_SIZE, OUTPUT_LIMIT};
use crate::params::AudioParams;

/// Failures opening or decoding audio. All of them are recoverable: the
/// app keeps running without sound.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format {0:?} (need f32)")]
    SampleFormat(cpal::SampleFormat),
    #[error("rain synth init failed: {0}")]
    Synth(String),
    #[error("failed to read ambient track {path}: {source}")]
    Track {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("ambient track {0} has no samples")]
    EmptyTrack(PathBuf),
}

/// What the stream plays
pub enum AudioSource {
    /// Glicol rain composition
    Synth,
    /// Looping decoded WAV
    Track(AmbientTrack),
}

/// Produces stereo frames for the callback
enum Voice {
    Synth {
        engine: Box<Engine<BLOCK_SIZE>>,
        block: Vec<(f32, f32)>,
        cursor: usize,
    },
    Track(AmbientTrack),
}

impl Voice {
    fn next_frame(&mut self, device_rate: u32) -> (f32, f32) {
        match self {
            Voice::Synth {
                engine,
                block,
                cursor,
            } => {
                if *cursor >= block.len() {
                    let (buffers, _) = engine.next_block(vec![]);
                    block.clear();
                    block.extend((0..BLOCK_SIZE).map(|i| (buffers[0][i], buffers[1][i])));
                    *cursor = 0;
                }
                let frame = block[*cursor];
                *cursor += 1;
                frame
            }
            Voice::Track(track) => track.next_frame(device_rate),
        }
    }
}

/// Running output stream plus the volume handle the callback reads
pub struct AudioSystem {
    /// Playback volume in [0, 1], shared with the audio callback
    volume: Arc<Mutex<f32>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start playing `source` silently;
    /// the caller raises the volume via [`AudioSystem::set_volume`].
    pub fn start(params: &AudioParams, source: AudioSource) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::SampleFormat(supported.sample_format()));
        }

        let config: cpal::StreamConfig = supported.into();
        let device_rate = config.sample_rate.0;
        let channels = config.channels.max(1) as usize;
        log::info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_rate,
            channels
        );

        let mut voice = match source {
            AudioSource::Synth => {
                let mut engine = Engine::<BLOCK_SIZE>::new();
                let rate = if device_rate > 0 {
                    device_rate as usize
                } else {
                    params.sample_rate_hz
                };
                engine.set_sr(rate);
                engine.update_with_code(RAIN_COMPOSITION);
                engine
                    .update()
                    .map_err(|e| AudioError::Synth(format!("{e:?}")))?;
                Voice::Synth {
                    engine: Box::new(engine),
                    block: Vec::with_capacity(BLOCK_SIZE),
                    cursor: 0,
                }
            }
            AudioSource::Track(track) => Voice::Track(track),
        };

        let volume = Arc::new(Mutex::new(0.0_f32));
        let volume_cb = Arc::clone(&volume);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let gain = volume_cb.lock().map(|v| *v).unwrap_or(0.0);
                for frame in data.chunks_mut(channels) {
                    let (left, right) = voice.next_frame(device_rate);
                    // Safety limiter: hard clip to ±0.5
                    let left = (left * gain).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
                    let right = (right * gain).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
                    for (ch, sample) in frame.iter_mut().enumerate() {
                        *sample = if ch % 2 == 0 { left } else { right };
                    }
                }
            },
            |err| log::error!("Audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            volume,
            _stream: stream,
        })
    }

    /// Apply the modulator's current volume (clamped to [0, 1])
    pub fn set_volume(&self, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Ok(mut shared) = self.volume.lock() {
            *shared = volume;
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume.lock().map(|v| *v).unwrap_or(0.0)
    }
}
