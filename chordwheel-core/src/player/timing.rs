//! Tempo and time signature arithmetic for chord slots

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

pub const MIN_TEMPO: f64 = 1.0;
pub const MAX_TEMPO: f64 = 400.0;
pub const DEFAULT_TEMPO: f64 = 120.0;

const VALID_BEAT_UNITS: [u8; 6] = [1, 2, 4, 8, 16, 32];

/// Measure layout: `beats_per_measure` beats of length `1 / beat_unit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    beats_per_measure: u8,
    beat_unit: u8,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature {
        beats_per_measure: 4,
        beat_unit: 4,
    };

    /// Numerator must be non-zero and the denominator a power of two up to 32
    pub fn new(beats_per_measure: u8, beat_unit: u8) -> Result<Self> {
        if beats_per_measure == 0 {
            return Err(anyhow!("Time signature needs at least one beat per measure"));
        }
        if !VALID_BEAT_UNITS.contains(&beat_unit) {
            return Err(anyhow!(
                "Invalid beat unit {} (expected one of 1, 2, 4, 8, 16, 32)",
                beat_unit
            ));
        }
        Ok(TimeSignature {
            beats_per_measure,
            beat_unit,
        })
    }

    pub fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }

    pub fn beat_unit(&self) -> u8 {
        self.beat_unit
    }

    /// Length of one measure in quarter notes
    pub fn quarters_per_measure(&self) -> f64 {
        (4.0 / self.beat_unit as f64) * self.beats_per_measure as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats_per_measure, self.beat_unit)
    }
}

impl FromStr for TimeSignature {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (num, den) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| anyhow!("Expected a time signature like 3/4, got '{}'", s.trim()))?;

        let num: u8 = num
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid beats per measure: '{}'", num.trim()))?;
        let den: u8 = den
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid beat unit: '{}'", den.trim()))?;

        TimeSignature::new(num, den)
    }
}

pub fn clamp_tempo(bpm: f64) -> f64 {
    if bpm.is_nan() {
        return DEFAULT_TEMPO;
    }
    bpm.clamp(MIN_TEMPO, MAX_TEMPO)
}

/// Samples in one chord slot, which always spans a full measure
///
/// `(60 / bpm) * (4 / beat_unit) * beats_per_measure * sample_rate`, rounded,
/// never less than one sample.
pub fn samples_per_chord(bpm: f64, time_signature: TimeSignature, sample_rate: f64) -> u64 {
    let seconds = (60.0 / clamp_tempo(bpm)) * time_signature.quarters_per_measure();
    let samples = (seconds * sample_rate).round();

    if samples.is_finite() && samples >= 1.0 {
        samples as u64
    } else {
        1
    }
}
