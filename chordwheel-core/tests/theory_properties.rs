#[cfg(test)]
mod tests {
    use chordwheel_core::theory::pitch_class;
    use chordwheel_core::{
        ChordType, Emotion, EmotionWheel, Key, KeyManager, Tonality, Voicing, pitch_class_set,
    };
    use std::collections::HashSet;

    #[test]
    fn test_scale_notes_transpose_with_key() {
        let c_scale = KeyManager::with_key(Key::C).scale_notes();
        for key in Key::all() {
            let scale = KeyManager::with_key(key).scale_notes();
            assert_eq!(scale.len(), 7);
            for (i, &note) in scale.iter().enumerate() {
                assert!(note < 12);
                assert_eq!(note, (c_scale[i] + key.pitch_class()) % 12);
            }
        }
    }

    #[test]
    fn test_generate_chord_matches_interval_table() {
        for key in Key::all() {
            let km = KeyManager::with_key(key);
            for degree in 1..=7u8 {
                let root = km.note_from_degree(degree) as i16;
                for t in ChordType::all() {
                    let chord = km.generate_chord(degree, t);
                    assert_eq!(chord.len(), t.intervals().len());
                    for (note, interval) in chord.iter().zip(t.intervals()) {
                        assert_eq!(*note, root + interval);
                        assert_eq!(pitch_class(*note), pitch_class(root + interval));
                    }
                }
            }
        }
    }

    #[test]
    fn test_diatonic_chords_stay_in_key() {
        for key in Key::all() {
            let km = KeyManager::with_key(key);
            for degree in 1..=7u8 {
                for chord in [km.generate_triad(degree), km.generate_seventh(degree)] {
                    assert!(chord.windows(2).all(|w| w[0] < w[1]), "not ascending: {:?}", chord);
                    assert!(chord.iter().all(|&n| km.is_note_in_key(n)));
                    assert_eq!(pitch_class(chord[0]), km.note_from_degree(degree));
                }

                // The diatonic triad has the quality the analysis table reports
                let triad = km.generate_triad(degree);
                let quality = km.analyze_triad(degree);
                let expected = km.generate_chord(degree, quality);
                assert_eq!(pitch_class_set(&triad), pitch_class_set(&expected));

                let seventh = km.generate_seventh(degree);
                let quality = km.analyze_seventh(degree);
                let expected = km.generate_chord(degree, quality);
                assert_eq!(pitch_class_set(&seventh), pitch_class_set(&expected));
            }
        }
    }

    #[test]
    fn test_voicings_preserve_pitch_classes() {
        let km = KeyManager::with_key(Key::E);
        for degree in 1..=7u8 {
            for t in ChordType::all() {
                let chord = km.generate_chord(degree, t);
                for v in Voicing::all() {
                    let voiced = km.apply_voicing(&chord, v);
                    assert_eq!(pitch_class_set(&voiced), pitch_class_set(&chord));
                    for note in &voiced {
                        assert!(
                            chord.iter().any(|c| (note - c) % 12 == 0),
                            "{} introduced {} into {:?}",
                            v,
                            note,
                            chord
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_invalid_lookups_are_stable() {
        let km = KeyManager::new();
        for _ in 0..3 {
            assert!(km.generate_triad(0).is_empty());
            assert!(km.generate_seventh(8).is_empty());
            assert!(km.generate_chord(255, ChordType::Minor9).is_empty());
            assert!(km.common_progression("nonexistent", false, Voicing::Close).is_empty());
            assert_eq!(km.analyze_triad(9), ChordType::Major);
            assert_eq!(km.generate_chord_named(1, "??"), km.generate_chord(1, ChordType::Major));
        }
    }

    #[test]
    fn test_every_preset_realises() {
        for key in Key::all() {
            let km = KeyManager::with_key(key);
            for name in km.available_progressions() {
                for v in Voicing::all() {
                    let prog = km.common_progression(name, true, v);
                    assert!(!prog.is_empty());
                    assert!(prog.iter().all(|c| c.len() == 4));
                }
            }
        }
    }

    #[test]
    fn test_emotion_pools_partition_table() {
        let wheel = EmotionWheel::new();
        let major: HashSet<Emotion> = wheel.emotions_by_tonality(Tonality::Major).into_iter().collect();
        let minor: HashSet<Emotion> = wheel.emotions_by_tonality(Tonality::Minor).into_iter().collect();
        let all: HashSet<Emotion> = wheel.all_emotions().into_iter().collect();

        assert_eq!(major.len(), 24);
        assert_eq!(minor.len(), 24);
        assert!(major.is_disjoint(&minor));
        assert_eq!(&major | &minor, all);
    }

    #[test]
    fn test_emotion_recolours_diatonic_root() {
        let km = KeyManager::with_key(Key::A);
        let wheel = EmotionWheel::new();

        // vi in A major is F#, a minor chord: pick from the minor pool
        let root = km.note_from_degree(6) as i16;
        let tonality = km.analyze_triad(6).tonality();
        assert_eq!(tonality, Tonality::Minor);

        let emotion = wheel.emotions_by_tonality(tonality)[4];
        assert_eq!(emotion, Emotion::SadMin7);
        assert_eq!(wheel.apply_emotion(root, emotion), vec![6, 9, 13, 16]);
        assert_eq!(wheel.apply_emotion(60, Emotion::SadMin7), vec![60, 63, 67, 70]);
    }
}
