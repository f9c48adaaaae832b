use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// Chromatic note names, indexed by pitch class (0 = C)
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone offsets of the major scale from its tonic (W-W-H-W-W-W-H)
pub const MAJOR_SCALE_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Reduce any semitone value to its pitch class (0-11)
#[inline]
pub fn pitch_class(note: i16) -> u8 {
    note.rem_euclid(12) as u8
}

/// Display name of a pitch class; values above 11 wrap
pub fn note_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[(pitch_class % 12) as usize]
}

/// The tonic of a diatonic major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Key {
    #[default]
    C = 0,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    const ALL: [Key; 12] = [
        Key::C,
        Key::CSharp,
        Key::D,
        Key::DSharp,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
        Key::GSharp,
        Key::A,
        Key::ASharp,
        Key::B,
    ];

    /// All twelve keys in chromatic order starting from C
    pub fn all() -> [Key; 12] {
        Self::ALL
    }

    /// Key whose tonic is the given pitch class (wraps modulo 12)
    pub fn from_pitch_class(pitch_class: u8) -> Key {
        Self::ALL[(pitch_class % 12) as usize]
    }

    /// Pitch class of the tonic (0-11)
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self as usize]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();

        // 'S' is accepted as a typeable sharp, 'B' after the letter is a flat
        let pitch_class = match upper.as_str() {
            "C" | "B#" | "BS" => 0,
            "C#" | "CS" | "DB" => 1,
            "D" => 2,
            "D#" | "DS" | "EB" => 3,
            "E" | "FB" => 4,
            "F" | "E#" | "ES" => 5,
            "F#" | "FS" | "GB" => 6,
            "G" => 7,
            "G#" | "GS" | "AB" => 8,
            "A" => 9,
            "A#" | "AS" | "BB" => 10,
            "B" | "CB" => 11,
            _ => return Err(anyhow!("Invalid key name: {}", s.trim())),
        };

        Ok(Key::from_pitch_class(pitch_class))
    }
}
