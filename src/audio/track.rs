//! Looping ambient WAV track.

use std::path::Path;

use super::AudioError;

/// Decoded ambient track, stored as interleaved stereo f32 and played back
/// in a loop at the device rate.
#[derive(Debug, Clone)]
pub struct AmbientTrack {
    /// Interleaved L/R samples in [-1, 1]
    frames: Vec<f32>,
    sample_rate: u32,
    /// Playback position in frames (fractional when resampling)
    position: f64,
}

impl AmbientTrack {
    /// Decode a WAV file. Mono is duplicated to both channels; extra
    /// channels beyond the first two are dropped.
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let reader = hound::WavReader::open(path).map_err(|source| AudioError::Track {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|source| AudioError::Track {
                    path: path.to_path_buf(),
                    source,
                })?,
            hound::SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|source| AudioError::Track {
                        path: path.to_path_buf(),
                        source,
                    })?
            }
        };

        let track = Self::from_interleaved(&samples, channels, spec.sample_rate);
        if track.is_empty() {
            return Err(AudioError::EmptyTrack(path.to_path_buf()));
        }
        log::info!(
            "Ambient track: {} ({} frames @ {}Hz)",
            path.display(),
            track.len(),
            track.sample_rate
        );
        Ok(track)
    }

    /// Build from interleaved samples with `channels` per frame
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let frames = samples
            .chunks_exact(channels)
            .flat_map(|frame| {
                let left = frame[0];
                let right = if channels > 1 { frame[1] } else { left };
                [left, right]
            })
            .collect();
        Self {
            frames,
            sample_rate: sample_rate.max(1),
            position: 0.0,
        }
    }

    /// Number of stereo frames
    pub fn len(&self) -> usize {
        self.frames.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Next stereo frame for a device running at `device_rate` Hz.
    /// Nearest-frame resampling; wraps at the end of the track.
    pub fn next_frame(&mut self, device_rate: u32) -> (f32, f32) {
        let len = self.len();
        if len == 0 {
            return (0.0, 0.0);
        }
        let index = (self.position as usize) % len;
        let frame = (self.frames[index * 2], self.frames[index * 2 + 1]);

        self.position += self.sample_rate as f64 / device_rate.max(1) as f64;
        if self.position >= len as f64 {
            self.position %= len as f64;
        }
        frame
    }
}
