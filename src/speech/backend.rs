//! Speech synthesis backend seam
//!
//! The worker drives whatever backend it is given through `init`/`render`.
//! The production backend synthesizes MP3 audio over HTTP and plays it on
//! the default output device; both calls block, which is why the worker runs
//! on its own thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::config::SpeechConfig;
use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Synthesis device seam used by the speech worker
///
/// `init` produces a device handle or fails; `render` speaks one line to
/// completion. Both are blocking calls made only from the worker thread, so
/// the handle never needs its own locking.
pub trait SpeechBackend: Send + 'static {
    /// Opaque device handle owned by the worker
    type Handle: Send;

    /// Initialize (or reinitialize) the synthesis device
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be brought up
    fn init(&self) -> Result<Self::Handle>;

    /// Speak one line to completion
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    fn render(&self, handle: &mut Self::Handle, text: &str) -> Result<()>;

    /// Apply a pacing pause between lines
    fn pause(&self, hint: Duration) {
        std::thread::sleep(hint);
    }
}

/// Production backend: HTTP synthesis plus local playback
///
/// Posts text to an OpenAI-style speech endpoint and plays the returned MP3
/// through the default cpal output device.
pub struct HttpSpeechBackend {
    config: SpeechConfig,
}

/// Initialized synthesis device: HTTP client plus opened audio output
pub struct SpeechDevice {
    client: reqwest::blocking::Client,
    device: Device,
    stream_config: StreamConfig,
}

impl HttpSpeechBackend {
    #[must_use]
    pub const fn new(config: SpeechConfig) -> Self {
        Self { config }
    }
}

impl SpeechBackend for HttpSpeechBackend {
    type Handle = SpeechDevice;

    fn init(&self) -> Result<SpeechDevice> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            return Err(Error::Config(
                "speech API key required (SOUS_SPEECH_API_KEY or OPENAI_API_KEY)".to_string(),
            ));
        };
        if api_key.is_empty() {
            return Err(Error::Config("speech API key is empty".to_string()));
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let stream_config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = stream_config.channels,
            "speech device opened"
        );

        Ok(SpeechDevice {
            client: reqwest::blocking::Client::new(),
            device,
            stream_config,
        })
    }

    fn render(&self, handle: &mut SpeechDevice, text: &str) -> Result<()> {
        let mp3 = self.synthesize(&handle.client, text)?;
        let samples = decode_mp3(&mp3)?;
        play_samples(&handle.device, &handle.stream_config, samples)
    }
}

impl HttpSpeechBackend {
    /// Synthesize one line of text to MP3 bytes
    fn synthesize(&self, client: &reqwest::blocking::Client, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            speed: self.config.speed,
        };

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let response = client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::Speech(format!("synthesis error {status}: {body}")));
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Play samples on the opened output device, blocking until done
fn play_samples(device: &Device, config: &StreamConfig, samples: Vec<f32>) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let channels = usize::from(config.channels);
    let sample_count = samples.len();

    let samples = Arc::new(samples);
    let position = Arc::new(Mutex::new(0usize));
    let finished = Arc::new(AtomicBool::new(false));

    let samples_cb = Arc::clone(&samples);
    let position_cb = Arc::clone(&position);
    let finished_cb = Arc::clone(&finished);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut pos) = position_cb.lock() else {
                    return;
                };

                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < samples_cb.len() {
                        let s = samples_cb[*pos];
                        *pos += 1;
                        s
                    } else {
                        finished_cb.store(true, Ordering::Relaxed);
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    // Poll for completion, bounded by the expected playback duration
    let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
    let deadline = std::time::Instant::now() + Duration::from_millis(duration_ms + 500);

    while !finished.load(Ordering::Relaxed) {
        if std::time::Instant::now() > deadline {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    // Let the tail of the buffer flush before tearing the stream down
    std::thread::sleep(Duration::from_millis(100));

    drop(stream);
    tracing::trace!(samples = sample_count, "playback complete");

    Ok(())
}

/// Decode MP3 bytes to mono f32 samples
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(std::io::Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if frame.channels == 2 {
                    // Stereo: average channels down to mono
                    samples.extend(frame.data.chunks(2).map(|chunk| {
                        let left = f32::from(chunk[0]) / 32768.0;
                        let right = f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                        (left + right) / 2.0
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}
