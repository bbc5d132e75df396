//! Continuous sine output on the default device, gated by the playing flag.
//!
//! The cpal stream is not `Send`, so it is built and kept alive on a
//! dedicated thread. The audio callback reads the shared flag and renders
//! silence while paused; playback state never rebuilds the stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, StreamConfig};

#[derive(Debug, Clone, Copy)]
pub struct ToneConfig {
    pub freq_hz: f32,
    pub gain: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            freq_hz: 440.0,
            gain: 0.2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("No default output device available")]
    NoOutputDevice,
    #[error("Failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
    #[error("Failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("Failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Start the tone output in the background. Failure to open the device is
/// logged; the transport and clock keep working without audio.
pub fn spawn_output(gate: Arc<AtomicBool>, tone: ToneConfig) {
    thread::spawn(move || {
        if let Err(e) = run_output(gate, tone) {
            log::error!("Tone output unavailable: {}", e);
        }
    });
}

fn run_output(gate: Arc<AtomicBool>, tone: ToneConfig) -> Result<(), SynthError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(SynthError::NoOutputDevice)?;
    let config = device.default_output_config()?;

    log::info!(
        "Tone output: {} Hz sine on {:?} ({:?})",
        tone.freq_hz,
        device.name().unwrap_or_else(|_| "<unknown>".to_string()),
        config.sample_format()
    );

    match config.sample_format() {
        SampleFormat::F32 => run_stream::<f32>(gate, tone, device, config.into()),
        SampleFormat::I16 => run_stream::<i16>(gate, tone, device, config.into()),
        SampleFormat::U16 => run_stream::<u16>(gate, tone, device, config.into()),
        other => Err(SynthError::UnsupportedFormat(other)),
    }
}

fn run_stream<T: SizedSample + FromSample<f32>>(
    gate: Arc<AtomicBool>,
    tone: ToneConfig,
    device: Device,
    config: StreamConfig,
) -> Result<(), SynthError> {
    let channels = config.channels as usize;
    let mut osc = SineOsc::new(tone.freq_hz, config.sample_rate.0 as f32);
    let gain = tone.gain;

    let err_fn = |err| log::warn!("Output stream error: {}", err);
    let stream = device.build_output_stream(
        &config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = if gate.load(Ordering::Relaxed) {
                    osc.next_sample() * gain
                } else {
                    0.0
                };

                let value: T = T::from_sample(sample);
                for out in frame.iter_mut() {
                    *out = value;
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    // Dropping the stream stops playback, so this thread parks for the
    // app's lifetime.
    loop {
        thread::park();
    }
}

/// Phase-accumulator sine oscillator.
struct SineOsc {
    phase: f32,
    step: f32,
}

impl SineOsc {
    fn new(freq_hz: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            step: freq_hz / sample_rate,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let value = (self.phase * std::f32::consts::TAU).sin();
        // Wrap the phase to keep f32 precision stable over long sessions.
        self.phase = (self.phase + self.step) % 1.0;
        value
    }
}
