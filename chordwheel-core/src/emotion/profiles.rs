use super::{Emotion, EmotionProfile};
use crate::theory::Tonality;

const fn profile(
    name: &'static str,
    tonality: Tonality,
    intervals: &'static [i16],
    description: &'static str,
) -> EmotionProfile {
    EmotionProfile {
        name,
        tonality,
        intervals,
        description,
    }
}

/// Curated emotion table, indexed by `Emotion as usize`.
///
/// Interval lists are played as written: they may descend or repeat a pitch
/// class, and the altered dominant ends below its top note.
pub(super) const PROFILES: [EmotionProfile; 48] = [
    // Happy
    profile("Happy (Maj6)", Tonality::Major, &[0, 4, 7, 9], "Bright and joyful"),
    profile("Happy (Maj6/9)", Tonality::Major, &[0, 4, 7, 9, 14], "Sophisticated happiness"),
    profile("Happy (Maj9)", Tonality::Major, &[0, 4, 7, 11, 14], "Elevated joy"),
    profile("Happy (Lydian Maj9)", Tonality::Major, &[0, 4, 7, 11, 14, 18], "Ethereal bliss"),
    profile("Happy (Min6)", Tonality::Minor, &[0, 3, 7, 9], "Bittersweet joy"),
    profile("Happy (Min6/9)", Tonality::Minor, &[0, 3, 7, 9, 14], "Complex happiness"),
    profile("Happy (Dorian9)", Tonality::Minor, &[0, 3, 7, 10, 14, 21], "Modal brightness"),
    profile("Happy (Min(maj9))", Tonality::Minor, &[0, 3, 7, 11, 14], "Introspective joy"),
    // Sad
    profile("Sad (Maj7b6)", Tonality::Major, &[0, 4, 7, 11, 20], "Wistful longing"),
    profile("Sad (Maj7add9)", Tonality::Major, &[0, 4, 7, 11, 14], "Reflective melancholy"),
    profile("Sad (Maj9sus4)", Tonality::Major, &[0, 5, 7, 11, 14], "Suspended sorrow"),
    profile("Sad (Maj7b9)", Tonality::Major, &[0, 4, 7, 11, 13], "Tense sadness"),
    profile("Sad (Min7)", Tonality::Minor, &[0, 3, 7, 10], "Classic sadness and melancholy"),
    profile("Sad (Min9)", Tonality::Minor, &[0, 3, 7, 10, 14], "Deep introspective sorrow"),
    profile("Sad (Min11)", Tonality::Minor, &[0, 3, 7, 10, 17], "Contemplative and heavy"),
    profile("Sad (Min(add9))", Tonality::Minor, &[0, 3, 7, 14], "Gentle sadness with hope"),
    // Warm
    profile("Warm (Maj7)", Tonality::Major, &[0, 4, 7, 11], "Comfortable and inviting"),
    profile("Warm (Maj9)", Tonality::Major, &[0, 4, 7, 11, 14], "Rich and enveloping"),
    profile("Warm (6/9)", Tonality::Major, &[0, 4, 9, 14], "Cozy and nostalgic"),
    profile("Warm (Maj13)", Tonality::Major, &[0, 4, 7, 11, 14, 21], "Luxurious warmth"),
    profile("Warm (Min7)", Tonality::Minor, &[0, 3, 7, 10], "Gentle and comforting"),
    profile("Warm (Min9)", Tonality::Minor, &[0, 3, 7, 10, 14], "Soothing depth"),
    profile("Warm (Min6/9)", Tonality::Minor, &[0, 3, 7, 9, 14], "Tender and intimate"),
    profile("Warm (Min11)", Tonality::Minor, &[0, 3, 7, 10, 17], "Embracing warmth"),
    // Tense
    profile("Tense (7sus4)", Tonality::Major, &[0, 5, 7, 10], "Unresolved tension"),
    profile("Tense (7♭9)", Tonality::Major, &[0, 4, 7, 10, 13], "Anxious dissonance"),
    profile("Tense (7#9)", Tonality::Major, &[0, 4, 7, 10, 15], "Edgy and restless"),
    profile("Tense (7alt)", Tonality::Major, &[0, 4, 7, 10, 13, 15, 8], "Maximum tension"),
    profile("Tense (Min7♭5)", Tonality::Minor, &[0, 3, 6, 10], "Half-diminished unease"),
    profile("Tense (Min7♭9)", Tonality::Minor, &[0, 3, 7, 10, 13], "Dark and brooding"),
    profile("Tense (Min7#11)", Tonality::Minor, &[0, 3, 7, 10, 18], "Mysterious tension"),
    profile("Tense (Dim7)", Tonality::Minor, &[0, 3, 6, 9], "Ominous and unstable"),
    // Calm
    profile("Calm (Sus2)", Tonality::Major, &[0, 2, 7], "Open and peaceful"),
    profile("Calm (6/9(no3))", Tonality::Major, &[0, 7, 9, 14], "Airy and spacious"),
    profile("Calm (Sus4add9)", Tonality::Major, &[0, 5, 7, 14], "Floating tranquility"),
    profile("Calm (Quartal)", Tonality::Major, &[0, 7, 14, 17], "Modern serenity"),
    profile("Calm (Min(add9))", Tonality::Minor, &[0, 3, 7, 14], "Gentle stillness"),
    profile("Calm (Min6/9(no5))", Tonality::Minor, &[0, 3, 9, 14], "Delicate calm"),
    profile("Calm (Min11(no7))", Tonality::Minor, &[0, 3, 7, 17], "Suspended peace"),
    profile("Calm (Spread 5ths/9ths)", Tonality::Minor, &[0, 7, 14, 21], "Expansive tranquility"),
    // Dark
    profile("Dark (Maj7♯11)", Tonality::Major, &[0, 4, 7, 11, 18], "Mysterious beauty"),
    profile("Dark (Maj7♭13)", Tonality::Major, &[0, 4, 7, 11, 20], "Shadowy elegance"),
    profile("Dark (Maj7♭9)", Tonality::Major, &[0, 4, 7, 11, 13], "Haunting dissonance"),
    profile("Dark (7♭9♭13)", Tonality::Major, &[0, 4, 7, 10, 13, 20], "Sinister and complex"),
    profile("Dark (Min7)", Tonality::Minor, &[0, 3, 7, 10], "Somber and brooding"),
    profile("Dark (Min6)", Tonality::Minor, &[0, 3, 7, 9], "Noir atmosphere"),
    profile("Dark (Min7♭9)", Tonality::Minor, &[0, 3, 7, 10, 13], "Foreboding tension"),
    profile("Dark (Min(maj7♭6))", Tonality::Minor, &[0, 3, 7, 11, 8], "Eerie and unsettling"),
];

pub(super) const ALL: [Emotion; 48] = [
    Emotion::HappyMaj6,
    Emotion::HappyMaj69,
    Emotion::HappyMaj9,
    Emotion::HappyLydianMaj9,
    Emotion::HappyMin6,
    Emotion::HappyMin69,
    Emotion::HappyDorian9,
    Emotion::HappyMinMaj9,
    Emotion::SadMaj7b6,
    Emotion::SadMaj7add9,
    Emotion::SadMaj9sus4,
    Emotion::SadMaj7b9,
    Emotion::SadMin7,
    Emotion::SadMin9,
    Emotion::SadMin11,
    Emotion::SadMinAdd9,
    Emotion::WarmMaj7,
    Emotion::WarmMaj9,
    Emotion::Warm69,
    Emotion::WarmMaj13,
    Emotion::WarmMin7,
    Emotion::WarmMin9,
    Emotion::WarmMin69,
    Emotion::WarmMin11,
    Emotion::Tense7sus4,
    Emotion::Tense7b9,
    Emotion::Tense7Sharp9,
    Emotion::Tense7alt,
    Emotion::TenseMin7b5,
    Emotion::TenseMin7b9,
    Emotion::TenseMin7Sharp11,
    Emotion::TenseDim7,
    Emotion::CalmSus2,
    Emotion::Calm69No3,
    Emotion::CalmSus4Add9,
    Emotion::CalmQuartal,
    Emotion::CalmMinAdd9,
    Emotion::CalmMin69No5,
    Emotion::CalmMin11No7,
    Emotion::CalmSpread5ths9ths,
    Emotion::DarkMaj7Sharp11,
    Emotion::DarkMaj7b13,
    Emotion::DarkMaj7b9,
    Emotion::Dark7b9b13,
    Emotion::DarkMin7,
    Emotion::DarkMin6,
    Emotion::DarkMin7b9,
    Emotion::DarkMinMaj7b6,
];
