// chordwheel-core/src/emotion/mod.rs
mod profiles;

use crate::theory::{Chord, Tonality};
use std::fmt;

/// A named chord colour from the emotion wheel
///
/// Declaration order is significant: positional selection (`from_index`,
/// `EmotionWheel::emotions_by_tonality`) depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    HappyMaj6,
    HappyMaj69,
    HappyMaj9,
    HappyLydianMaj9,
    HappyMin6,
    HappyMin69,
    HappyDorian9,
    HappyMinMaj9,
    SadMaj7b6,
    SadMaj7add9,
    SadMaj9sus4,
    SadMaj7b9,
    SadMin7,
    SadMin9,
    SadMin11,
    SadMinAdd9,
    WarmMaj7,
    WarmMaj9,
    Warm69,
    WarmMaj13,
    WarmMin7,
    WarmMin9,
    WarmMin69,
    WarmMin11,
    Tense7sus4,
    Tense7b9,
    Tense7Sharp9,
    Tense7alt,
    TenseMin7b5,
    TenseMin7b9,
    TenseMin7Sharp11,
    TenseDim7,
    CalmSus2,
    Calm69No3,
    CalmSus4Add9,
    CalmQuartal,
    CalmMinAdd9,
    CalmMin69No5,
    CalmMin11No7,
    CalmSpread5ths9ths,
    DarkMaj7Sharp11,
    DarkMaj7b13,
    DarkMaj7b9,
    Dark7b9b13,
    DarkMin7,
    DarkMin6,
    DarkMin7b9,
    DarkMinMaj7b6,
}

/// Static description of one emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionProfile {
    pub name: &'static str,
    pub tonality: Tonality,
    /// Semitones above the root, in playing order
    pub intervals: &'static [i16],
    pub description: &'static str,
}

impl Emotion {
    pub const COUNT: usize = 48;

    pub fn all() -> [Emotion; 48] {
        profiles::ALL
    }

    pub fn from_index(index: usize) -> Option<Emotion> {
        profiles::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn profile(self) -> &'static EmotionProfile {
        &profiles::PROFILES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn tonality(self) -> Tonality {
        self.profile().tonality
    }

    /// Find an emotion by display name, ignoring case and surrounding space
    pub fn parse(name: &str) -> Option<Emotion> {
        let wanted = name.trim().to_lowercase();
        profiles::ALL
            .iter()
            .copied()
            .find(|e| e.name().to_lowercase() == wanted)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maps emotions onto interval sets and applies them to roots
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionWheel;

impl EmotionWheel {
    pub fn new() -> Self {
        EmotionWheel
    }

    pub fn all_emotions(&self) -> Vec<Emotion> {
        Emotion::all().to_vec()
    }

    /// The 24 emotions of one tonality, in declaration order
    pub fn emotions_by_tonality(&self, tonality: Tonality) -> Vec<Emotion> {
        Emotion::all()
            .into_iter()
            .filter(|e| e.tonality() == tonality)
            .collect()
    }

    /// Positional lookup into a tonality pool, as used by selection widgets
    pub fn emotion_at(&self, tonality: Tonality, index: usize) -> Option<Emotion> {
        self.emotions_by_tonality(tonality).get(index).copied()
    }

    pub fn emotion_profile(&self, emotion: Emotion) -> &'static EmotionProfile {
        emotion.profile()
    }

    /// Profile for a raw table index; out of range gives `None`
    pub fn profile_by_index(&self, index: usize) -> Option<&'static EmotionProfile> {
        Emotion::from_index(index).map(Emotion::profile)
    }

    pub fn emotion_name(&self, emotion: Emotion) -> &'static str {
        emotion.name()
    }

    pub fn emotion_tonality(&self, emotion: Emotion) -> Tonality {
        emotion.tonality()
    }

    pub fn intervals_for_emotion(&self, emotion: Emotion) -> &'static [i16] {
        emotion.profile().intervals
    }

    /// `root + interval` for every interval, in table order
    ///
    /// No sorting or de-duplication happens here; voicing is the caller's job.
    pub fn apply_emotion(&self, root: i16, emotion: Emotion) -> Chord {
        emotion
            .profile()
            .intervals
            .iter()
            .map(|&interval| root.saturating_add(interval))
            .collect()
    }
}
