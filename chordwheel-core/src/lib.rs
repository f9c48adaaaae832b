//! Music theory and progression sequencing for ChordWheel
//!
//! - [`theory`]: note names, keys, chord types, scale degrees and preset progressions
//! - [`KeyManager`]: scale queries, diatonic chord generation and analysis
//! - [`Voicing`]: octave rearrangements that keep pitch classes
//! - [`EmotionWheel`]: 48 emotion profiles mapped onto interval sets
//! - [`Realizer`]: places relative chords into a MIDI octave
//! - [`ProgressionPlayer`]: sample-accurate chord scheduler
//!
//! Chords are `Vec<i16>` of semitones relative to C. Only [`Realizer`] turns
//! them into MIDI note numbers.

pub mod emotion;
pub mod key_manager;
pub mod player;
pub mod realize;
pub mod theory;
pub mod voicing;

pub use emotion::{Emotion, EmotionProfile, EmotionWheel};
pub use key_manager::KeyManager;
pub use player::{
    EventSink, NoteEvent, PlayerState, Progression, ProgressionPlayer, TimeSignature,
};
pub use realize::Realizer;
pub use theory::{Chord, ChordType, Key, ScaleDegree, Tonality};
pub use voicing::{Voicing, pitch_class_set};
