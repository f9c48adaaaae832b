//! Stub polyphonic synthesizer
//!
//! A fixed bank of oscillator voices driven by note events. Each voice fixes
//! its waveform when it is triggered and fades out linearly on note-off.

use chordwheel_core::EventSink;
use std::f32::consts::PI;

/// Number of simultaneously sounding voices; the oldest is stolen beyond this
pub const MAX_VOICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    #[default]
    Triangle,
}

impl Waveform {
    /// Case-insensitive name lookup
    pub fn parse(s: &str) -> Option<Waveform> {
        match s.trim().to_lowercase().as_str() {
            "sine" | "sin" => Some(Waveform::Sine),
            "saw" | "sawtooth" => Some(Waveform::Saw),
            "square" | "sq" => Some(Waveform::Square),
            "triangle" | "tri" => Some(Waveform::Triangle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Saw => "saw",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
        }
    }

    /// Value at `phase` in [0, 1), in [-1, 1]
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSettings {
    pub waveform: Waveform,
    /// Per-voice amplitude (0.0-1.0)
    pub level: f32,
    /// Linear fade length after note-off
    pub release_seconds: f32,
}

impl Default for SynthSettings {
    fn default() -> Self {
        SynthSettings {
            waveform: Waveform::Triangle,
            level: 0.15,
            release_seconds: 0.08,
        }
    }
}

/// Equal-tempered frequency with A4 (MIDI 69) at 440 Hz
pub fn midi_to_frequency(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    note: u8,
    active: bool,
    waveform: Waveform,
    phase: f32,
    increment: f32,
    amplitude: f32,
    /// Amplitude removed per sample once released
    release_step: Option<f32>,
    started_at: u64,
}

impl Voice {
    const SILENT: Voice = Voice {
        note: 0,
        active: false,
        waveform: Waveform::Sine,
        phase: 0.0,
        increment: 0.0,
        amplitude: 0.0,
        release_step: None,
        started_at: 0,
    };

    fn next_sample(&mut self) -> f32 {
        let value = self.waveform.sample(self.phase) * self.amplitude;

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        if let Some(step) = self.release_step {
            self.amplitude -= step;
            if self.amplitude <= 1e-4 {
                self.active = false;
            }
        }

        value
    }
}

pub struct VoiceBank {
    voices: [Voice; MAX_VOICES],
    settings: SynthSettings,
    sample_rate: f32,
    clock: u64,
}

impl VoiceBank {
    pub fn new(settings: SynthSettings, sample_rate: f32) -> Self {
        VoiceBank {
            voices: [Voice::SILENT; MAX_VOICES],
            settings,
            sample_rate,
            clock: 0,
        }
    }

    /// Applies to voices triggered after the call
    pub fn set_settings(&mut self, settings: SynthSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> SynthSettings {
        self.settings
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }

    pub fn trigger(&mut self, note: u8) {
        let slot = self
            .voices
            .iter()
            .position(|v| v.active && v.note == note && v.release_step.is_none())
            .or_else(|| self.voices.iter().position(|v| !v.active))
            .unwrap_or_else(|| self.oldest_voice());

        self.voices[slot] = Voice {
            note,
            active: true,
            waveform: self.settings.waveform,
            phase: 0.0,
            increment: midi_to_frequency(note) / self.sample_rate,
            amplitude: 1.0,
            release_step: None,
            started_at: self.clock,
        };
    }

    pub fn release(&mut self, note: u8) {
        let release_samples = self.settings.release_seconds * self.sample_rate;

        for voice in self
            .voices
            .iter_mut()
            .filter(|v| v.active && v.note == note && v.release_step.is_none())
        {
            if release_samples < 1.0 {
                voice.active = false;
            } else {
                voice.release_step = Some(voice.amplitude / release_samples);
            }
        }
    }

    /// Silence everything at once
    pub fn reset(&mut self) {
        self.voices = [Voice::SILENT; MAX_VOICES];
    }

    /// Mix all active voices into one sample
    pub fn next_sample(&mut self) -> f32 {
        self.clock = self.clock.wrapping_add(1);

        let mut mix = 0.0;
        for voice in self.voices.iter_mut().filter(|v| v.active) {
            mix += voice.next_sample();
        }
        (mix * self.settings.level).clamp(-1.0, 1.0)
    }

    fn oldest_voice(&self) -> usize {
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.started_at)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl EventSink for VoiceBank {
    fn note_on(&mut self, _offset: usize, note: u8) {
        self.trigger(note);
    }

    fn note_off(&mut self, _offset: usize, note: u8) {
        self.release(note);
    }
}
