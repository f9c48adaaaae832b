use std::fmt;

/// Binary major/minor colour of a chord or emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tonality {
    Major,
    Minor,
}

impl Tonality {
    /// Parse "major"/"minor" (and the short forms "maj"/"min"), case-insensitive
    pub fn parse(s: &str) -> Option<Tonality> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" => Some(Tonality::Major),
            "minor" | "min" => Some(Tonality::Minor),
            _ => None,
        }
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tonality::Major => write!(f, "Major"),
            Tonality::Minor => write!(f, "Minor"),
        }
    }
}

/// Named chord qualities with a fixed chromatic interval table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    Diminished7,
    HalfDiminished7,
    Sus2,
    Sus4,
    Add9,
    Major9,
    Minor9,
    Dominant9,
}

impl ChordType {
    const ALL: [ChordType; 15] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::Major7,
        ChordType::Minor7,
        ChordType::Dominant7,
        ChordType::Diminished7,
        ChordType::HalfDiminished7,
        ChordType::Sus2,
        ChordType::Sus4,
        ChordType::Add9,
        ChordType::Major9,
        ChordType::Minor9,
        ChordType::Dominant9,
    ];

    pub fn all() -> [ChordType; 15] {
        Self::ALL
    }

    /// Semitone offsets from the root, root first. Ninths are kept above the octave.
    pub fn intervals(self) -> &'static [i16] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Diminished7 => &[0, 3, 6, 9],
            ChordType::HalfDiminished7 => &[0, 3, 6, 10],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Sus4 => &[0, 5, 7],
            ChordType::Add9 => &[0, 4, 7, 14],
            ChordType::Major9 => &[0, 4, 7, 11, 14],
            ChordType::Minor9 => &[0, 3, 7, 10, 14],
            ChordType::Dominant9 => &[0, 4, 7, 10, 14],
        }
    }

    /// Suffix appended to the root name in chord symbols (e.g. "m7", "ø7")
    pub fn suffix(self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "°",
            ChordType::Augmented => "+",
            ChordType::Major7 => "M7",
            ChordType::Minor7 => "m7",
            ChordType::Dominant7 => "7",
            ChordType::Diminished7 => "°7",
            ChordType::HalfDiminished7 => "ø7",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Add9 => "add9",
            ChordType::Major9 => "M9",
            ChordType::Minor9 => "m9",
            ChordType::Dominant9 => "9",
        }
    }

    /// Long name used in listings and accepted by [`ChordType::parse`]
    pub fn name(self) -> &'static str {
        match self {
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Diminished => "diminished",
            ChordType::Augmented => "augmented",
            ChordType::Major7 => "major7",
            ChordType::Minor7 => "minor7",
            ChordType::Dominant7 => "dominant7",
            ChordType::Diminished7 => "diminished7",
            ChordType::HalfDiminished7 => "half-diminished7",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Add9 => "add9",
            ChordType::Major9 => "major9",
            ChordType::Minor9 => "minor9",
            ChordType::Dominant9 => "dominant9",
        }
    }

    /// Parse a chord type from its long name or its symbol suffix
    pub fn parse(s: &str) -> Option<ChordType> {
        let trimmed = s.trim();
        // Suffixes are case-sensitive ("M7" vs "m7"), long names are not
        if let Some(t) = Self::ALL.iter().find(|t| !t.suffix().is_empty() && t.suffix() == trimmed) {
            return Some(*t);
        }

        match trimmed.to_lowercase().as_str() {
            "maj" | "major" => Some(ChordType::Major),
            "min" | "minor" => Some(ChordType::Minor),
            "dim" | "diminished" => Some(ChordType::Diminished),
            "aug" | "augmented" => Some(ChordType::Augmented),
            "maj7" | "major7" => Some(ChordType::Major7),
            "min7" | "minor7" => Some(ChordType::Minor7),
            "dom7" | "dominant7" => Some(ChordType::Dominant7),
            "dim7" | "diminished7" => Some(ChordType::Diminished7),
            "m7b5" | "half-diminished7" | "halfdiminished7" => Some(ChordType::HalfDiminished7),
            "sus2" => Some(ChordType::Sus2),
            "sus4" => Some(ChordType::Sus4),
            "add9" => Some(ChordType::Add9),
            "maj9" | "major9" => Some(ChordType::Major9),
            "min9" | "minor9" => Some(ChordType::Minor9),
            "dom9" | "dominant9" => Some(ChordType::Dominant9),
            _ => None,
        }
    }

    /// Major/minor colour of the chord, used to pick an emotion pool
    pub fn tonality(self) -> Tonality {
        match self {
            ChordType::Minor
            | ChordType::Diminished
            | ChordType::Minor7
            | ChordType::Diminished7
            | ChordType::HalfDiminished7
            | ChordType::Minor9 => Tonality::Minor,
            _ => Tonality::Major,
        }
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
