// chordwheel-core/src/theory/degree.rs
use super::chord_type::ChordType;
use std::fmt;

/// Position of a note within the seven-tone major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScaleDegree {
    I = 1,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl ScaleDegree {
    const ALL: [ScaleDegree; 7] = [
        ScaleDegree::I,
        ScaleDegree::II,
        ScaleDegree::III,
        ScaleDegree::IV,
        ScaleDegree::V,
        ScaleDegree::VI,
        ScaleDegree::VII,
    ];

    pub fn all() -> [ScaleDegree; 7] {
        Self::ALL
    }

    /// Degree for a 1-based scale position; anything outside 1..=7 is `None`
    pub fn from_number(n: u8) -> Option<ScaleDegree> {
        match n {
            1..=7 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// 1-based scale position
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 0-based index into a seven-note scale
    pub fn index(self) -> usize {
        self as usize - 1
    }

    fn upper(self) -> &'static str {
        match self {
            ScaleDegree::I => "I",
            ScaleDegree::II => "II",
            ScaleDegree::III => "III",
            ScaleDegree::IV => "IV",
            ScaleDegree::V => "V",
            ScaleDegree::VI => "VI",
            ScaleDegree::VII => "VII",
        }
    }

    /// Parse an upper or lower case roman numeral, ignoring quality marks
    pub fn parse_roman(s: &str) -> Option<ScaleDegree> {
        let core: String = s
            .trim()
            .chars()
            .take_while(|c| matches!(c, 'i' | 'v' | 'I' | 'V'))
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|d| d.upper() == core.to_uppercase())
    }

    /// Roman numeral with case and symbol following the chord quality
    ///
    /// Major-family chords are upper case, minor and diminished lower case.
    /// Diminished and half-diminished chords carry their symbol (`vii°`, `viiø7`),
    /// augmented ones a trailing `+`, seventh chords a trailing `7`.
    pub fn roman(self, quality: ChordType) -> String {
        let upper = self.upper();
        let lower = upper.to_lowercase();

        match quality {
            ChordType::Major => upper.to_string(),
            ChordType::Minor => lower,
            ChordType::Diminished => format!("{}°", lower),
            ChordType::Augmented => format!("{}+", upper),
            ChordType::Major7 => format!("{}M7", upper),
            ChordType::Minor7 => format!("{}7", lower),
            ChordType::Dominant7 => format!("{}7", upper),
            ChordType::Diminished7 => format!("{}°7", lower),
            ChordType::HalfDiminished7 => format!("{}ø7", lower),
            ChordType::Minor9 => format!("{}9", lower),
            other => format!("{}{}", upper, other.suffix()),
        }
    }
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.upper())
    }
}
