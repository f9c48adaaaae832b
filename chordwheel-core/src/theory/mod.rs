// chordwheel-core/src/theory/mod.rs
pub mod chord_type;
pub mod degree;
pub mod key;
pub mod presets;

pub use chord_type::{ChordType, Tonality};
pub use degree::ScaleDegree;
pub use key::{Key, MAJOR_SCALE_INTERVALS, NOTE_NAMES, note_name, pitch_class};
pub use presets::{PRESETS, ProgressionPreset, find_preset, parse_degree_list};

/// An ordered chord in relative semitones measured from C
pub type Chord = Vec<i16>;
