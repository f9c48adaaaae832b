// chordwheel-core/src/voicing.rs
use crate::theory::{Chord, pitch_class};
use anyhow::{Result, anyhow};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Octave rearrangements of an already generated chord
///
/// Every voicing moves notes by whole octaves only, so the set of pitch
/// classes in the output always equals the set in the input. Chords too
/// short for a given voicing come back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Voicing {
    #[default]
    Close,
    Open,
    Drop2,
    Drop3,
    FirstInversion,
    SecondInversion,
    Spread,
}

impl Voicing {
    const ALL: [Voicing; 7] = [
        Voicing::Close,
        Voicing::Open,
        Voicing::Drop2,
        Voicing::Drop3,
        Voicing::FirstInversion,
        Voicing::SecondInversion,
        Voicing::Spread,
    ];

    pub fn all() -> [Voicing; 7] {
        Self::ALL
    }

    pub fn name(self) -> &'static str {
        match self {
            Voicing::Close => "close",
            Voicing::Open => "open",
            Voicing::Drop2 => "drop2",
            Voicing::Drop3 => "drop3",
            Voicing::FirstInversion => "first",
            Voicing::SecondInversion => "second",
            Voicing::Spread => "spread",
        }
    }

    /// Apply the voicing to a copy of `chord`
    pub fn apply(self, chord: &[i16]) -> Chord {
        let mut notes = chord.to_vec();

        match self {
            Voicing::Close => return notes,
            Voicing::Open => {
                notes.sort_unstable();
                let top = notes.len().saturating_sub(1);
                for (i, note) in notes.iter_mut().enumerate() {
                    if i % 2 == 1 && i != top {
                        *note += 12;
                    }
                }
            }
            Voicing::Drop2 => drop_from_top(&mut notes, 2),
            Voicing::Drop3 => drop_from_top(&mut notes, 3),
            Voicing::FirstInversion => {
                if notes.len() >= 2 {
                    invert(&mut notes);
                }
            }
            Voicing::SecondInversion => {
                if notes.len() >= 3 {
                    invert(&mut notes);
                    invert(&mut notes);
                }
            }
            Voicing::Spread => {
                if notes.len() >= 3 {
                    notes.sort_unstable();
                    for (i, note) in notes.iter_mut().enumerate() {
                        *note += 12 * (i / 2) as i16;
                    }
                }
            }
        }

        notes.sort_unstable();
        notes
    }
}

/// Lower the `n`th-highest note an octave (n = 2 is drop-2)
fn drop_from_top(notes: &mut [i16], n: usize) {
    if notes.len() < n {
        return;
    }
    notes.sort_unstable();
    let idx = notes.len() - n;
    notes[idx] -= 12;
}

/// Move the lowest note up by octaves until it sits above the highest
fn invert(notes: &mut Vec<i16>) {
    notes.sort_unstable();
    let lowest = notes.remove(0);
    let highest = notes.last().copied().unwrap_or(lowest);

    let mut raised = lowest;
    while raised <= highest {
        raised += 12;
    }
    notes.push(raised);
}

/// Distinct pitch classes present in a chord
pub fn pitch_class_set(chord: &[i16]) -> BTreeSet<u8> {
    chord.iter().map(|&n| pitch_class(n)).collect()
}

impl fmt::Display for Voicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Voicing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "close" => Ok(Voicing::Close),
            "open" => Ok(Voicing::Open),
            "drop2" | "drop-2" => Ok(Voicing::Drop2),
            "drop3" | "drop-3" => Ok(Voicing::Drop3),
            "first" | "inv1" | "first-inversion" => Ok(Voicing::FirstInversion),
            "second" | "inv2" | "second-inversion" => Ok(Voicing::SecondInversion),
            "spread" => Ok(Voicing::Spread),
            _ => Err(anyhow!("Unknown voicing: {}", s.trim())),
        }
    }
}
