use std::path::PathBuf;

use chordwheel_core::{Key, Realizer, TimeSignature, Voicing};
use serde::Deserialize;

use crate::audio::synth::{SynthSettings, Waveform};
use crate::commands::Session;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    realize: RealizeConfig,
    #[serde(default)]
    midi: MidiConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    tempo: Option<f64>,
    key: Option<String>,
    time_signature: Option<[u8; 2]>,
    looping: Option<bool>,
    sevenths: Option<bool>,
    voicing: Option<String>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    waveform: Option<String>,
    level: Option<f32>,
    release_seconds: Option<f32>,
    fallback_sample_rate: Option<u32>,
}

#[derive(Deserialize, Default)]
struct RealizeConfig {
    base_note: Option<i16>,
    low: Option<i16>,
    high: Option<i16>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    port: Option<String>,
    channel: Option<u8>,
}

pub struct Config {
    defaults: DefaultsConfig,
    audio: AudioConfig,
    realize: RealizeConfig,
    midi: MidiConfig,
}

impl Config {
    /// Embedded defaults, overridden by the user's config file if one exists
    pub fn load() -> Self {
        let user = user_config_path().and_then(|path| {
            if !path.exists() {
                return None;
            }
            match std::fs::read_to_string(&path) {
                Ok(contents) => Some((path, contents)),
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                    None
                }
            }
        });

        match user {
            Some((path, contents)) => {
                log::info!(target: "config", "loading overrides from {}", path.display());
                Self::from_sources(Some(&contents))
            }
            None => Self::from_sources(None),
        }
    }

    /// Build from the embedded defaults plus optional user TOML text
    pub fn from_sources(user: Option<&str>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(contents) = user {
            match toml::from_str::<ConfigFile>(contents) {
                Ok(user) => {
                    merge_defaults(&mut base.defaults, user.defaults);
                    merge_audio(&mut base.audio, user.audio);
                    merge_realize(&mut base.realize, user.realize);
                    merge_midi(&mut base.midi, user.midi);
                }
                Err(e) => log::warn!(target: "config", "ignoring malformed config: {}", e),
            }
        }

        Config {
            defaults: base.defaults,
            audio: base.audio,
            realize: base.realize,
            midi: base.midi,
        }
    }

    /// Starting transport and generation settings for a session
    pub fn session(&self) -> Session {
        let fallback = Session::default();
        Session {
            key: self
                .defaults
                .key
                .as_deref()
                .and_then(|s| s.parse::<Key>().ok())
                .unwrap_or(fallback.key),
            tempo: self
                .defaults
                .tempo
                .filter(|t| (1.0..=400.0).contains(t))
                .unwrap_or(fallback.tempo),
            time_signature: self
                .defaults
                .time_signature
                .and_then(|[n, d]| TimeSignature::new(n, d).ok())
                .unwrap_or(fallback.time_signature),
            looping: self.defaults.looping.unwrap_or(fallback.looping),
            sevenths: self.defaults.sevenths.unwrap_or(fallback.sevenths),
            voicing: self
                .defaults
                .voicing
                .as_deref()
                .and_then(|s| s.parse::<Voicing>().ok())
                .unwrap_or(fallback.voicing),
        }
    }

    pub fn synth_settings(&self) -> SynthSettings {
        let fallback = SynthSettings::default();
        SynthSettings {
            waveform: self
                .audio
                .waveform
                .as_deref()
                .and_then(Waveform::parse)
                .unwrap_or(fallback.waveform),
            level: self
                .audio
                .level
                .map(|l| l.clamp(0.0, 1.0))
                .unwrap_or(fallback.level),
            release_seconds: self
                .audio
                .release_seconds
                .map(|r| r.clamp(0.0, 5.0))
                .unwrap_or(fallback.release_seconds),
        }
    }

    /// Sample rate assumed when no output device reports one
    pub fn fallback_sample_rate(&self) -> u32 {
        self.audio
            .fallback_sample_rate
            .filter(|&sr| sr > 0)
            .unwrap_or(48_000)
    }

    pub fn realizer(&self) -> Realizer {
        let fallback = Realizer::default();
        let base_note = self.realize.base_note.unwrap_or(fallback.base_note);
        let low = self.realize.low.unwrap_or(fallback.low);
        let high = self.realize.high.unwrap_or(fallback.high);

        if high <= low {
            log::warn!(target: "config", "empty realize range [{}, {}), using defaults", low, high);
            return Realizer::new(base_note, fallback.low, fallback.high);
        }
        Realizer::new(base_note, low, high)
    }

    /// MIDI port to connect at startup, if any
    pub fn midi_port(&self) -> Option<&str> {
        self.midi
            .port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Zero-based MIDI channel (config uses 1-16)
    pub fn midi_channel(&self) -> u8 {
        self.midi.channel.unwrap_or(1).clamp(1, 16) - 1
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chordwheel").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.tempo.is_some() {
        base.tempo = user.tempo;
    }
    if user.key.is_some() {
        base.key = user.key;
    }
    if user.time_signature.is_some() {
        base.time_signature = user.time_signature;
    }
    if user.looping.is_some() {
        base.looping = user.looping;
    }
    if user.sevenths.is_some() {
        base.sevenths = user.sevenths;
    }
    if user.voicing.is_some() {
        base.voicing = user.voicing;
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.waveform.is_some() {
        base.waveform = user.waveform;
    }
    if user.level.is_some() {
        base.level = user.level;
    }
    if user.release_seconds.is_some() {
        base.release_seconds = user.release_seconds;
    }
    if user.fallback_sample_rate.is_some() {
        base.fallback_sample_rate = user.fallback_sample_rate;
    }
}

fn merge_realize(base: &mut RealizeConfig, user: RealizeConfig) {
    if user.base_note.is_some() {
        base.base_note = user.base_note;
    }
    if user.low.is_some() {
        base.low = user.low;
    }
    if user.high.is_some() {
        base.high = user.high;
    }
}

fn merge_midi(base: &mut MidiConfig, user: MidiConfig) {
    if user.port.is_some() {
        base.port = user.port;
    }
    if user.channel.is_some() {
        base.channel = user.channel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_config() {
        let config = Config::from_sources(None);
        let session = config.session();
        assert_eq!(session.tempo, 120.0);
        assert_eq!(session.key, Key::C);
        assert_eq!(session.time_signature, TimeSignature::COMMON);
        assert!(!session.looping);
        assert!(!session.sevenths);
        assert_eq!(session.voicing, Voicing::Close);

        let synth = config.synth_settings();
        assert_eq!(synth.waveform, Waveform::Triangle);
        assert!((synth.level - 0.15).abs() < f32::EPSILON);

        assert_eq!(config.fallback_sample_rate(), 48_000);
        assert_eq!(config.realizer(), Realizer::default());
        assert_eq!(config.midi_port(), None);
        assert_eq!(config.midi_channel(), 0);
    }

    #[test]
    fn test_user_overrides_single_fields() {
        let user = r#"
            [defaults]
            key = "Bb"
            time_signature = [3, 4]

            [audio]
            waveform = "SAW"

            [midi]
            port = " IAC "
            channel = 10
        "#;
        let config = Config::from_sources(Some(user));
        let session = config.session();
        assert_eq!(session.key, Key::ASharp);
        assert_eq!(session.time_signature, TimeSignature::new(3, 4).unwrap());
        // Untouched keys keep their defaults
        assert_eq!(session.tempo, 120.0);
        assert_eq!(config.synth_settings().waveform, Waveform::Saw);
        assert_eq!(config.midi_port(), Some("IAC"));
        assert_eq!(config.midi_channel(), 9);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let user = r#"
            [defaults]
            tempo = 9000.0
            key = "H"
            time_signature = [4, 3]
            voicing = "cluster"

            [realize]
            low = 80
            high = 40
        "#;
        let config = Config::from_sources(Some(user));
        let session = config.session();
        assert_eq!(session.tempo, 120.0);
        assert_eq!(session.key, Key::C);
        assert_eq!(session.time_signature, TimeSignature::COMMON);
        assert_eq!(session.voicing, Voicing::Close);
        assert_eq!(config.realizer(), Realizer::default());
    }

    #[test]
    fn test_malformed_user_config_is_ignored() {
        let config = Config::from_sources(Some("this is [not toml"));
        assert_eq!(config.session().tempo, 120.0);
    }
}
