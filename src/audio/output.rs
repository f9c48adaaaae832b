//! Audio backends that pull blocks from a [`RenderCore`]

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::engine::{EngineHandle, MAX_BLOCK, RenderCore, engine};
use super::midi::MidiSink;
use super::synth::SynthSettings;

/// Where rendered audio goes
pub enum AudioBackend {
    Device(AudioOutput),
    /// No sound card: blocks are rendered on a timer so MIDI still plays
    Headless(HeadlessDriver),
}

impl AudioBackend {
    /// Open the default output device, falling back to a headless driver
    pub fn open(
        synth: SynthSettings,
        midi: Option<MidiSink>,
        fallback_sample_rate: u32,
    ) -> (AudioBackend, EngineHandle) {
        match AudioOutput::open(synth, midi.clone()) {
            Ok((output, handle)) => (AudioBackend::Device(output), handle),
            Err(e) => {
                log::warn!("audio output unavailable ({}), rendering headless", e);
                let (handle, core) = engine(fallback_sample_rate as f64, synth, midi);
                (AudioBackend::Headless(HeadlessDriver::spawn(core, fallback_sample_rate)), handle)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            AudioBackend::Device(output) => format!(
                "{} ({} Hz, {} ch)",
                output.device_name, output.sample_rate, output.channels
            ),
            AudioBackend::Headless(driver) => format!("headless ({} Hz)", driver.sample_rate),
        }
    }
}

pub struct AudioOutput {
    /// Kept alive for as long as audio should play
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    pub fn open(synth: SynthSettings, midi: Option<MidiSink>) -> Result<(Self, EngineHandle)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown device".to_string());
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();
        let sample_rate = config.sample_rate.0;

        let (handle, core) = engine(sample_rate as f64, synth, midi);
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, core)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, core)?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, core)?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };
        stream
            .play()
            .map_err(|e| anyhow!("Failed to start output stream: {}", e))?;

        log::info!(
            "audio output on {} at {} Hz, {} channel(s), {:?}",
            device_name,
            sample_rate,
            config.channels,
            sample_format
        );

        Ok((
            AudioOutput {
                _stream: stream,
                device_name,
                sample_rate,
                channels: config.channels,
            },
            handle,
        ))
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        mut core: RenderCore,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + FromSample<f32> + Send + 'static,
    {
        let channels = config.channels.max(1) as usize;
        let err_fn = |err| log::error!("output stream error: {}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    for chunk in data.chunks_mut(channels * MAX_BLOCK) {
                        let frames = chunk.len() / channels;
                        let mono = core.process(frames);
                        for (frame, &value) in chunk.chunks_mut(channels).zip(mono) {
                            let value = T::from_sample(value);
                            frame.fill(value);
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }
}

/// Renders blocks on a plain thread at roughly real-time pace
pub struct HeadlessDriver {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl HeadlessDriver {
    const BLOCK: usize = 256;

    pub fn spawn(mut core: RenderCore, sample_rate: u32) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let period = Duration::from_secs_f64(Self::BLOCK as f64 / sample_rate.max(1) as f64);

        let thread = thread::Builder::new()
            .name("headless-render".to_string())
            .spawn(move || {
                while flag.load(Ordering::Relaxed) {
                    core.process(Self::BLOCK);
                    thread::sleep(period);
                }
            });

        let thread = match thread {
            Ok(t) => Some(t),
            Err(e) => {
                log::error!("could not start headless renderer: {}", e);
                None
            }
        };

        HeadlessDriver {
            running,
            thread,
            sample_rate,
        }
    }
}

impl Drop for HeadlessDriver {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
