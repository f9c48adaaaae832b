// chordwheel-core/src/key_manager.rs
use crate::theory::{
    Chord, ChordType, Key, MAJOR_SCALE_INTERVALS, NOTE_NAMES, PRESETS, ScaleDegree, find_preset,
    pitch_class,
};
use crate::voicing::Voicing;
use log::{debug, trace};

/// Source of truth for the current key and everything derived from it
///
/// All chord builders return relative semitones (see [`Chord`]); the root is
/// always a pitch class in 0..=11 and upper tones are never reduced. Any
/// lookup miss degrades to a fixed default instead of an error.
#[derive(Debug, Clone, Default)]
pub struct KeyManager {
    current_key: Key,
}

impl KeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: Key) -> Self {
        KeyManager { current_key: key }
    }

    pub fn set_current_key(&mut self, key: Key) {
        if key != self.current_key {
            debug!("Key changed: {} -> {}", self.current_key, key);
        }
        self.current_key = key;
    }

    pub fn current_key(&self) -> Key {
        self.current_key
    }

    pub fn key_name(&self) -> &'static str {
        self.current_key.name()
    }

    // ------------------------------------------------------------------
    // Scale queries
    // ------------------------------------------------------------------

    /// The seven pitch classes of the current major scale, tonic first
    pub fn scale_notes(&self) -> [u8; 7] {
        let root = self.current_key.pitch_class();
        MAJOR_SCALE_INTERVALS.map(|interval| (root + interval) % 12)
    }

    pub fn scale_note_names(&self) -> Vec<&'static str> {
        self.scale_notes()
            .iter()
            .map(|&pc| NOTE_NAMES[pc as usize])
            .collect()
    }

    pub fn chromatic_notes(&self) -> Vec<u8> {
        (0..12).collect()
    }

    pub fn chromatic_note_names(&self) -> Vec<&'static str> {
        NOTE_NAMES.to_vec()
    }

    /// Whether a note (any octave, negative allowed) belongs to the current scale
    pub fn is_note_in_key(&self, note: i16) -> bool {
        self.scale_notes().contains(&pitch_class(note))
    }

    /// Pitch class at a 1-based degree; out of range gives C (0)
    pub fn note_from_degree(&self, degree: u8) -> u8 {
        ScaleDegree::from_number(degree)
            .map(|d| self.scale_notes()[d.index()])
            .unwrap_or(0)
    }

    /// Degree of a note in the current scale; notes outside the key map to I
    pub fn degree_from_note(&self, note: i16) -> ScaleDegree {
        let pc = pitch_class(note);
        self.scale_notes()
            .iter()
            .position(|&n| n == pc)
            .and_then(|i| ScaleDegree::from_number(i as u8 + 1))
            .unwrap_or(ScaleDegree::I)
    }

    pub fn chord_intervals(&self, chord_type: ChordType) -> &'static [i16] {
        chord_type.intervals()
    }

    pub fn transpose_note(&self, note: i16, semitones: i16) -> u8 {
        pitch_class(note.saturating_add(semitones))
    }

    // ------------------------------------------------------------------
    // Chord generation
    // ------------------------------------------------------------------

    /// Diatonic triad on a degree, strictly ascending; empty if the degree is invalid
    pub fn generate_triad(&self, degree: u8) -> Chord {
        self.stack_thirds(degree, 3)
    }

    /// Diatonic seventh chord on a degree, strictly ascending; empty if invalid
    pub fn generate_seventh(&self, degree: u8) -> Chord {
        self.stack_thirds(degree, 4)
    }

    fn stack_thirds(&self, degree: u8, voices: usize) -> Chord {
        let Some(degree) = ScaleDegree::from_number(degree) else {
            trace!("Ignoring chord request for degree {}", degree);
            return Vec::new();
        };

        let scale = self.scale_notes();
        let mut chord: Chord = Vec::with_capacity(voices);

        for step in 0..voices {
            let mut note = scale[(degree.index() + step * 2) % 7] as i16;
            if let Some(&below) = chord.last() {
                while note <= below {
                    note += 12;
                }
            }
            chord.push(note);
        }

        chord
    }

    /// Chord of a given type rooted on the scale tone at `degree`
    ///
    /// The interval table is applied chromatically, so the result may contain
    /// notes outside the key. Invalid degrees give an empty chord.
    pub fn generate_chord(&self, degree: u8, chord_type: ChordType) -> Chord {
        let Some(degree) = ScaleDegree::from_number(degree) else {
            return Vec::new();
        };

        let root = self.scale_notes()[degree.index()] as i16;
        chord_type
            .intervals()
            .iter()
            .map(|interval| root + interval)
            .collect()
    }

    /// Like [`generate_chord`](Self::generate_chord) but by name, falling back to a major triad
    pub fn generate_chord_named(&self, degree: u8, chord_type: &str) -> Chord {
        let chord_type = ChordType::parse(chord_type).unwrap_or(ChordType::Major);
        self.generate_chord(degree, chord_type)
    }

    /// Diatonic triad quality of a degree in a major key; invalid degrees are Major
    pub fn analyze_triad(&self, degree: u8) -> ChordType {
        match degree {
            1 | 4 | 5 => ChordType::Major,
            2 | 3 | 6 => ChordType::Minor,
            7 => ChordType::Diminished,
            _ => ChordType::Major,
        }
    }

    /// Diatonic seventh quality of a degree in a major key; invalid degrees are Major7
    pub fn analyze_seventh(&self, degree: u8) -> ChordType {
        match degree {
            1 | 4 => ChordType::Major7,
            2 | 3 | 6 => ChordType::Minor7,
            5 => ChordType::Dominant7,
            7 => ChordType::HalfDiminished7,
            _ => ChordType::Major7,
        }
    }

    pub fn apply_voicing(&self, chord: &[i16], voicing: Voicing) -> Chord {
        voicing.apply(chord)
    }

    // ------------------------------------------------------------------
    // Progressions
    // ------------------------------------------------------------------

    /// One chord per degree, in order; invalid degrees leave an empty chord in place
    pub fn generate_progression(&self, degrees: &[u8], use_sevenths: bool) -> Vec<Chord> {
        degrees
            .iter()
            .map(|&d| {
                if use_sevenths {
                    self.generate_seventh(d)
                } else {
                    self.generate_triad(d)
                }
            })
            .collect()
    }

    /// A named preset realised in the current key; unknown names give an empty progression
    pub fn common_progression(&self, name: &str, use_sevenths: bool, voicing: Voicing) -> Vec<Chord> {
        let Some(preset) = find_preset(name) else {
            debug!("Unknown progression: {}", name);
            return Vec::new();
        };

        self.generate_progression(preset.degrees, use_sevenths)
            .iter()
            .map(|chord| voicing.apply(chord))
            .collect()
    }

    /// Preset names in their stable display order
    pub fn available_progressions(&self) -> Vec<&'static str> {
        PRESETS.iter().map(|p| p.name).collect()
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// Chord symbol such as "Am" or "G7"; invalid degrees are named from C
    pub fn chord_name(&self, degree: u8, chord_type: ChordType) -> String {
        let root = NOTE_NAMES[self.note_from_degree(degree) as usize];
        format!("{}{}", root, chord_type.suffix())
    }

    /// Roman numeral of the diatonic chord on a degree (e.g. "vii°", "V7")
    pub fn roman_numeral(&self, degree: u8, use_sevenths: bool) -> Option<String> {
        let d = ScaleDegree::from_number(degree)?;
        let quality = if use_sevenths {
            self.analyze_seventh(degree)
        } else {
            self.analyze_triad(degree)
        };
        Some(d.roman(quality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_notes_c_and_g() {
        let km = KeyManager::new();
        assert_eq!(km.scale_notes(), [0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(km.scale_note_names(), vec!["C", "D", "E", "F", "G", "A", "B"]);

        let km = KeyManager::with_key(Key::G);
        assert_eq!(km.scale_notes(), [7, 9, 11, 0, 2, 4, 6]);
        assert_eq!(km.scale_note_names()[6], "F#");
    }

    #[test]
    fn test_set_key_affects_later_queries_only() {
        let mut km = KeyManager::new();
        let before = km.generate_triad(1);
        km.set_current_key(Key::D);
        assert_eq!(km.current_key(), Key::D);
        assert_eq!(km.key_name(), "D");
        assert_eq!(before, vec![0, 4, 7]);
        assert_eq!(km.generate_triad(1), vec![2, 6, 9]);
    }

    #[test]
    fn test_triads_in_c() {
        let km = KeyManager::new();
        assert_eq!(km.generate_triad(1), vec![0, 4, 7]);
        assert_eq!(km.generate_triad(2), vec![2, 5, 9]);
        assert_eq!(km.generate_triad(5), vec![7, 11, 14]);
        assert_eq!(km.generate_triad(7), vec![11, 14, 17]);
        assert!(km.generate_triad(0).is_empty());
        assert!(km.generate_triad(8).is_empty());
    }

    #[test]
    fn test_sevenths_in_c() {
        let km = KeyManager::new();
        assert_eq!(km.generate_seventh(1), vec![0, 4, 7, 11]);
        assert_eq!(km.generate_seventh(5), vec![7, 11, 14, 17]);
        assert_eq!(km.generate_seventh(7), vec![11, 14, 17, 21]);
        assert!(km.generate_seventh(9).is_empty());
    }

    #[test]
    fn test_generate_chord_is_chromatic() {
        let km = KeyManager::new();
        // A dominant 7 on degree II brings in F#, which is outside C major
        assert_eq!(km.generate_chord(2, ChordType::Dominant7), vec![2, 6, 9, 12]);
        assert!(!km.is_note_in_key(6));
        assert_eq!(km.generate_chord(1, ChordType::Add9), vec![0, 4, 7, 14]);
        assert!(km.generate_chord(0, ChordType::Major).is_empty());
    }

    #[test]
    fn test_generate_chord_named_falls_back_to_major() {
        let km = KeyManager::with_key(Key::A);
        assert_eq!(km.generate_chord_named(1, "m7"), vec![9, 12, 16, 19]);
        assert_eq!(km.generate_chord_named(1, "nonsense"), vec![9, 13, 16]);
    }

    #[test]
    fn test_degree_note_lookups() {
        let km = KeyManager::with_key(Key::F);
        assert_eq!(km.note_from_degree(4), 10);
        assert_eq!(km.note_from_degree(0), 0);
        assert_eq!(km.degree_from_note(5), ScaleDegree::I);
        assert_eq!(km.degree_from_note(12 + 7), ScaleDegree::II);
        // B natural is not in F major
        assert_eq!(km.degree_from_note(11), ScaleDegree::I);
        assert!(km.is_note_in_key(-2));
        assert_eq!(km.transpose_note(11, 2), 1);
        assert_eq!(km.transpose_note(0, -1), 11);
    }

    #[test]
    fn test_diatonic_quality_table() {
        let km = KeyManager::new();
        let triads: Vec<ChordType> = (1..=7).map(|d| km.analyze_triad(d)).collect();
        assert_eq!(
            triads,
            vec![
                ChordType::Major,
                ChordType::Minor,
                ChordType::Minor,
                ChordType::Major,
                ChordType::Major,
                ChordType::Minor,
                ChordType::Diminished,
            ]
        );
        let sevenths: Vec<ChordType> = (1..=7).map(|d| km.analyze_seventh(d)).collect();
        assert_eq!(
            sevenths,
            vec![
                ChordType::Major7,
                ChordType::Minor7,
                ChordType::Minor7,
                ChordType::Major7,
                ChordType::Dominant7,
                ChordType::Minor7,
                ChordType::HalfDiminished7,
            ]
        );
        assert_eq!(km.analyze_triad(0), ChordType::Major);
        assert_eq!(km.analyze_seventh(42), ChordType::Major7);
    }

    #[test]
    fn test_common_progression() {
        let km = KeyManager::new();
        let prog = km.common_progression("ii-V-I", false, Voicing::Close);
        assert_eq!(prog, vec![vec![2, 5, 9], vec![7, 11, 14], vec![0, 4, 7]]);

        let voiced = km.common_progression("ii-V-I", true, Voicing::Drop2);
        assert_eq!(voiced.len(), 3);
        assert_eq!(voiced[2], vec![-5, 0, 4, 11]);

        assert!(km.common_progression("nonexistent", true, Voicing::Spread).is_empty());
        assert_eq!(km.available_progressions().len(), 8);
        assert_eq!(km.available_progressions()[0], "I-IV-V-I");
    }

    #[test]
    fn test_generate_progression_keeps_empty_slots() {
        let km = KeyManager::new();
        let prog = km.generate_progression(&[1, 9, 5], false);
        assert_eq!(prog.len(), 3);
        assert!(prog[1].is_empty());
    }

    #[test]
    fn test_names() {
        let km = KeyManager::with_key(Key::D);
        assert_eq!(km.chord_name(2, ChordType::Minor7), "Em7");
        assert_eq!(km.chord_name(7, ChordType::HalfDiminished7), "C#ø7");
        assert_eq!(km.chord_name(0, ChordType::Major), "C");
        assert_eq!(km.roman_numeral(7, false).as_deref(), Some("vii°"));
        assert_eq!(km.roman_numeral(5, true).as_deref(), Some("V7"));
        assert_eq!(km.roman_numeral(8, true), None);
    }
}
