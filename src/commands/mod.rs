//! Command registry for REPL commands
//!
//! Each command is a plain function taking its argument string and the shared
//! [`CommandContext`]. Prefixes are matched longest first, so "midi connect"
//! wins over a hypothetical "midi".

pub mod general;
pub mod midi;
pub mod playback;
pub mod theory;

use crate::audio::{EngineHandle, MidiOutputHandle};
use chordwheel_core::theory::note_name;
use chordwheel_core::{EmotionWheel, Key, KeyManager, Realizer, ScaleDegree, TimeSignature, Voicing};

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No registered command matches the input
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Transport and generation settings mirrored on the control side
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub key: Key,
    pub tempo: f64,
    pub time_signature: TimeSignature,
    pub looping: bool,
    pub sevenths: bool,
    pub voicing: Voicing,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            key: Key::C,
            tempo: 120.0,
            time_signature: TimeSignature::COMMON,
            looping: false,
            sevenths: false,
            voicing: Voicing::Close,
        }
    }
}

/// Context passed to command handlers
pub struct CommandContext {
    pub keys: KeyManager,
    pub wheel: EmotionWheel,
    pub realizer: Realizer,
    pub session: Session,
    pub engine: Option<EngineHandle>,
    pub midi: Option<MidiOutputHandle>,
    /// Human-readable description of the audio backend
    pub backend: String,
}

impl CommandContext {
    /// Context without audio or MIDI; playback commands report an error
    pub fn new(session: Session, realizer: Realizer) -> Self {
        Self {
            keys: KeyManager::with_key(session.key),
            wheel: EmotionWheel::new(),
            realizer,
            session,
            engine: None,
            midi: None,
            backend: "none".to_string(),
        }
    }

    pub fn with_engine(mut self, engine: EngineHandle, backend: String) -> Self {
        self.engine = Some(engine);
        self.backend = backend;
        self
    }

    pub fn with_midi(mut self, midi: MidiOutputHandle) -> Self {
        self.midi = Some(midi);
        self
    }

    /// Push the session's transport settings to the audio engine
    pub fn sync_engine(&self) -> anyhow::Result<()> {
        if let Some(engine) = &self.engine {
            engine.set_tempo(self.session.tempo)?;
            engine.set_time_signature(self.session.time_signature)?;
            engine.set_looping(self.session.looping)?;
        }
        Ok(())
    }

    pub(crate) fn engine(&self) -> Result<&EngineHandle, CommandResult> {
        self.engine
            .as_ref()
            .ok_or_else(|| CommandResult::Error("Audio engine not running".to_string()))
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Run the handler whose prefix matches `input`, or return `NotACommand`
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        let input = input.trim();
        for (prefix, handler) in &self.commands {
            let matches = input == prefix
                || input
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with(char::is_whitespace));
            if matches {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every built-in command
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Theory
    registry.register("key", theory::cmd_key);
    registry.register("scale", theory::cmd_scale);
    registry.register("chords", theory::cmd_chords);
    registry.register("chord", theory::cmd_chord);
    registry.register("progressions", theory::cmd_progressions);
    registry.register("progression", theory::cmd_progression);
    registry.register("emotions", theory::cmd_emotions);
    registry.register("emotion", theory::cmd_emotion);

    // Playback
    registry.register("play", playback::cmd_play);
    registry.register("audition", playback::cmd_audition);
    registry.register("stop", playback::cmd_stop);
    registry.register("tempo", playback::cmd_tempo);
    registry.register("timesig", playback::cmd_timesig);
    registry.register("loop", playback::cmd_loop);

    // MIDI
    registry.register("midi devices", midi::cmd_midi_devices);
    registry.register("midi connect", midi::cmd_midi_connect);
    registry.register("midi disconnect", midi::cmd_midi_disconnect);
    registry.register("midi channel", midi::cmd_midi_channel);
    registry.register("midi status", midi::cmd_midi_status);
    registry.register("midi panic", midi::cmd_midi_panic);

    // General
    registry.register("status", general::cmd_status);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

// ----------------------------------------------------------------------
// Argument helpers shared by handlers
// ----------------------------------------------------------------------

/// Trailing `sevenths`/`triads` and voicing words split off an argument list
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ChordOptions {
    pub sevenths: Option<bool>,
    pub voicing: Option<Voicing>,
}

/// Peel recognised option words off the end of `args`, returning the rest
pub(crate) fn split_options(args: &str) -> (String, ChordOptions) {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    let mut options = ChordOptions::default();

    while let Some(last) = tokens.last() {
        match last.to_lowercase().as_str() {
            "sevenths" | "7ths" | "seventh" if options.sevenths.is_none() => {
                options.sevenths = Some(true);
            }
            "triads" | "triad" if options.sevenths.is_none() => {
                options.sevenths = Some(false);
            }
            word => match word.parse::<Voicing>() {
                Ok(v) if options.voicing.is_none() => options.voicing = Some(v),
                _ => break,
            },
        }
        tokens.pop();
    }

    (tokens.join(" "), options)
}

/// A degree given as 1-7 or a roman numeral
pub(crate) fn parse_degree(s: &str) -> Option<u8> {
    match s.trim().parse::<u8>() {
        Ok(n) => ScaleDegree::from_number(n).map(|d| d.number()),
        Err(_) => ScaleDegree::parse_roman(s).map(|d| d.number()),
    }
}

/// Note names of a chord, e.g. "D F A"
pub(crate) fn note_names(chord: &[i16]) -> String {
    chord
        .iter()
        .map(|&n| note_name(chordwheel_core::theory::pitch_class(n)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// MIDI note numbers of a realised chord, e.g. "[62, 65, 69]"
pub(crate) fn note_numbers(chord: &[i16]) -> String {
    format!("{:?}", chord)
}
