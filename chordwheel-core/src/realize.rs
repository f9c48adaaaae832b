// chordwheel-core/src/realize.rs
use crate::theory::Chord;

/// Places relative chords into a playable MIDI octave
///
/// The base note is added to every tone, then the whole chord is shifted by
/// octaves until its lowest note lies in `[low, high)`. Shifting the chord as
/// a unit keeps the voicing intact. A range narrower than an octave may leave
/// the lowest note below `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Realizer {
    pub base_note: i16,
    pub low: i16,
    pub high: i16,
}

impl Default for Realizer {
    fn default() -> Self {
        Realizer {
            base_note: 60,
            low: 48,
            high: 84,
        }
    }
}

impl Realizer {
    pub fn new(base_note: i16, low: i16, high: i16) -> Self {
        Realizer {
            base_note,
            low,
            high,
        }
    }

    pub fn realize(&self, chord: &[i16]) -> Chord {
        let Some(&lowest) = chord.iter().min() else {
            return Vec::new();
        };

        let mut shift = self.base_note;
        while lowest + shift < self.low {
            shift += 12;
        }
        while lowest + shift >= self.high {
            shift -= 12;
        }

        chord.iter().map(|&n| n + shift).collect()
    }

    pub fn realize_progression(&self, chords: &[Chord]) -> Vec<Chord> {
        chords.iter().map(|c| self.realize(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realize_adds_base_note() {
        let r = Realizer::default();
        assert_eq!(r.realize(&[0, 4, 7]), vec![60, 64, 67]);
        assert_eq!(r.realize(&[11, 14, 17]), vec![71, 74, 77]);
        assert!(r.realize(&[]).is_empty());
    }

    #[test]
    fn test_realize_folds_whole_chord() {
        let r = Realizer::default();
        // Drop-2 leaves the lowest note at -5: 55 is still in range
        assert_eq!(r.realize(&[-5, 0, 4, 11]), vec![55, 60, 64, 71]);
        // Lowest at -15 -> 45 is too low, the chord moves up an octave
        assert_eq!(r.realize(&[-15, 0]), vec![57, 72]);
        // Spread chord rooted high stays in shape
        assert_eq!(r.realize(&[26, 30]), vec![74, 78]);
        assert_eq!(r.realize(&[30, 34]), vec![78, 82]);
        assert_eq!(r.realize(&[36]), vec![72]);
    }

    #[test]
    fn test_lowest_note_in_range_for_any_chord() {
        let r = Realizer::new(60, 48, 84);
        for lowest in -40..40 {
            let chord = [lowest, lowest + 7, lowest + 16];
            let out = r.realize(&chord);
            let min = *out.iter().min().unwrap();
            assert!((48..84).contains(&min), "lowest {} realised to {}", lowest, min);
            assert_eq!(out[1] - out[0], 7);
            assert_eq!(out[2] - out[0], 16);
        }
    }
}
