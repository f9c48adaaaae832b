//! # ChordWheel
//!
//! Interactive host around [`chordwheel_core`]: pick a key, browse diatonic
//! chords, preset progressions and emotion colours, and hear them through a
//! small built-in synthesizer and an optional MIDI output port.
//!
//! ## Modules
//!
//! - `audio`: cpal output, the control/audio handoff, the stub synthesizer
//!   and the MIDI output thread.
//! - `commands`: REPL command registry and handlers.
//! - `config`: embedded defaults merged with the user's config file.
//! - `repl`: the interactive loop.

pub mod audio;
pub mod commands;
pub mod config;
pub mod repl;

pub use crate::commands::{CommandContext, CommandResult, Session};
pub use crate::config::Config;
pub use crate::repl::Repl;
