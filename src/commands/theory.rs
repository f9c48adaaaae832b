//! Theory REPL commands: keys, scales, diatonic chords, presets and emotions

use crate::commands::{
    CommandContext, CommandResult, note_names, parse_degree, split_options,
};
use chordwheel_core::theory::{PRESETS, find_preset};
use chordwheel_core::{ChordType, Emotion, EmotionWheel, Key, ScaleDegree, Tonality};
use colored::*;

/// Handle `key [name]` command
pub fn cmd_key(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current key: {} major",
            ctx.keys.key_name().cyan()
        ));
    }

    match args.parse::<Key>() {
        Ok(key) => {
            ctx.keys.set_current_key(key);
            ctx.session.key = key;
            CommandResult::Message(
                format!("🎼 Key set to {} major", key).bright_green().to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `scale` command
pub fn cmd_scale(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let names = ctx.keys.scale_note_names().join(" ");
    let classes = ctx
        .keys
        .scale_notes()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    CommandResult::Message(format!(
        "{} major: {}  {}",
        ctx.keys.key_name(),
        names.cyan(),
        format!("({})", classes).dimmed()
    ))
}

/// Handle `chords [sevenths|triads]` command - the seven diatonic chords
pub fn cmd_chords(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (rest, options) = split_options(args);
    if !rest.is_empty() {
        return CommandResult::Error("Usage: chords [sevenths|triads] [voicing]".to_string());
    }
    let sevenths = options.sevenths.unwrap_or(ctx.session.sevenths);
    let voicing = options.voicing.unwrap_or(ctx.session.voicing);

    let mut output = format!("{}\n", format!("Diatonic chords in {} major:", ctx.keys.key_name()).bold());
    for degree in ScaleDegree::all() {
        let n = degree.number();
        let (quality, chord) = if sevenths {
            (ctx.keys.analyze_seventh(n), ctx.keys.generate_seventh(n))
        } else {
            (ctx.keys.analyze_triad(n), ctx.keys.generate_triad(n))
        };
        let chord = ctx.keys.apply_voicing(&chord, voicing);
        output.push_str(&format!(
            "  {:<6} {:<7} {}\n",
            degree.roman(quality),
            ctx.keys.chord_name(n, quality).cyan(),
            note_names(&chord)
        ));
    }

    CommandResult::Message(output.trim_end().to_string())
}

/// Handle `chord <degree> [type] [voicing]` command
pub fn cmd_chord(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (rest, options) = split_options(args);
    let mut tokens = rest.split_whitespace();

    let Some(degree) = tokens.next().and_then(parse_degree) else {
        return CommandResult::Error(
            "Usage: chord <degree 1-7 or I-VII> [type] [voicing]".to_string(),
        );
    };

    let sevenths = options.sevenths.unwrap_or(ctx.session.sevenths);
    let quality = match tokens.next() {
        Some(name) => match ChordType::parse(name) {
            Some(t) => t,
            None => {
                let known: Vec<&str> = ChordType::all().iter().map(|t| t.name()).collect();
                return CommandResult::Error(format!(
                    "Unknown chord type '{}'. Known types: {}",
                    name,
                    known.join(", ")
                ));
            }
        },
        None if sevenths => ctx.keys.analyze_seventh(degree),
        None => ctx.keys.analyze_triad(degree),
    };

    let chord = ctx.keys.generate_chord(degree, quality);
    let chord = ctx.keys.apply_voicing(&chord, options.voicing.unwrap_or(ctx.session.voicing));
    let realized = ctx.realizer.realize(&chord);

    CommandResult::Message(format!(
        "{}: {}  {}",
        ctx.keys.chord_name(degree, quality).cyan(),
        note_names(&chord),
        format!("{:?}", realized).dimmed()
    ))
}

/// Handle `progressions` command - list presets
pub fn cmd_progressions(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut output = format!("{}\n", "🎼 Preset progressions:".bold());
    for name in ctx.keys.available_progressions() {
        let Some(preset) = find_preset(name) else {
            continue;
        };
        let degrees: Vec<String> = preset.degrees.iter().map(|d| d.to_string()).collect();
        output.push_str(&format!(
            "  {:<12} {}\n",
            name.cyan(),
            format!("({})", degrees.join(" ")).dimmed()
        ));
    }
    output.push_str(&format!(
        "\n{} {}",
        "Use".dimmed(),
        "play <name> [sevenths] [voicing]".green()
    ));
    CommandResult::Message(output)
}

/// Handle `progression <name> [sevenths] [voicing]` command
pub fn cmd_progression(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (name, options) = split_options(args);
    let Some(preset) = find_preset(&name) else {
        return CommandResult::Error(format!(
            "Unknown progression '{}'. Available: {}",
            name,
            PRESETS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
        ));
    };

    let sevenths = options.sevenths.unwrap_or(ctx.session.sevenths);
    let voicing = options.voicing.unwrap_or(ctx.session.voicing);
    let chords = ctx.keys.common_progression(preset.name, sevenths, voicing);

    let mut output = format!(
        "{}\n",
        format!("{} in {} major ({} voicing):", preset.name, ctx.keys.key_name(), voicing).bold()
    );
    for (&degree, chord) in preset.degrees.iter().zip(&chords) {
        let quality = if sevenths {
            ctx.keys.analyze_seventh(degree)
        } else {
            ctx.keys.analyze_triad(degree)
        };
        output.push_str(&format!(
            "  {:<6} {:<7} {}\n",
            ctx.keys.roman_numeral(degree, sevenths).unwrap_or_default(),
            ctx.keys.chord_name(degree, quality).cyan(),
            note_names(chord)
        ));
    }

    CommandResult::Message(output.trim_end().to_string())
}

/// Handle `emotions [major|minor]` command
pub fn cmd_emotions(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let pools: Vec<Tonality> = if args.is_empty() {
        vec![Tonality::Major, Tonality::Minor]
    } else {
        match Tonality::parse(args) {
            Some(t) => vec![t],
            None => return CommandResult::Error("Usage: emotions [major|minor]".to_string()),
        }
    };

    let mut output = String::new();
    for tonality in pools {
        output.push_str(&format!("{}\n", format!("{} emotions:", tonality).bold()));
        for (position, emotion) in ctx.wheel.emotions_by_tonality(tonality).into_iter().enumerate() {
            let profile = ctx.wheel.emotion_profile(emotion);
            output.push_str(&format!(
                "  {:>2}. {:<22} {}\n",
                position,
                profile.name.cyan(),
                profile.description.dimmed()
            ));
        }
    }
    output.push_str(&format!(
        "{} {}",
        "Use".dimmed(),
        "emotion <major|minor> <index> [root]".green()
    ));
    CommandResult::Message(output)
}

/// Handle `emotion <name|index> [root]` command
///
/// An index is either a position in a tonality pool (`minor 4`) or a bare
/// table index (0-47). The root defaults to the current tonic.
pub fn cmd_emotion(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let Some((emotion, root)) = parse_emotion_args(args) else {
        return CommandResult::Error(
            "Usage: emotion <name|index> [root]. Use 'emotions' to list them".to_string(),
        );
    };

    let root = root.unwrap_or_else(|| ctx.keys.current_key());
    let profile = ctx.wheel.emotion_profile(emotion);
    let chord = ctx.wheel.apply_emotion(root.pitch_class() as i16, emotion);
    let realized = ctx.realizer.realize(&chord);

    CommandResult::Message(format!(
        "{} on {} ({}): {}  {}\n  {}",
        profile.name.cyan().bold(),
        root,
        profile.tonality,
        note_names(&chord),
        format!("{:?}", realized).dimmed(),
        profile.description
    ))
}

/// Emotion by name or table index, optionally followed by a root note
fn parse_emotion_args(args: &str) -> Option<(Emotion, Option<Key>)> {
    let wheel = EmotionWheel::new();
    let lookup = |s: &str| {
        let s = s.trim().trim_matches('"');
        if let Some(emotion) = Emotion::parse(s) {
            return Some(emotion);
        }
        match s.split_once(char::is_whitespace) {
            Some((pool, index)) => {
                let tonality = Tonality::parse(pool)?;
                wheel.emotion_at(tonality, index.trim().parse().ok()?)
            }
            None => s.parse::<usize>().ok().and_then(Emotion::from_index),
        }
    };

    if let Some(emotion) = lookup(args) {
        return Some((emotion, None));
    }

    let (head, last) = args.trim().rsplit_once(char::is_whitespace)?;
    let root = last.parse::<Key>().ok()?;
    lookup(head).map(|e| (e, Some(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Session;
    use chordwheel_core::Realizer;

    fn ctx() -> CommandContext {
        colored::control::set_override(false);
        CommandContext::new(Session::default(), Realizer::default())
    }

    fn message(result: CommandResult) -> String {
        match result {
            CommandResult::Message(m) => m,
            other => panic!("expected a message, got {:?}", other),
        }
    }

    #[test]
    fn test_key_sets_manager_and_session() {
        let mut ctx = ctx();
        message(cmd_key("Eb", &mut ctx));
        assert_eq!(ctx.keys.current_key(), Key::DSharp);
        assert_eq!(ctx.session.key, Key::DSharp);
        assert!(matches!(cmd_key("H", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.keys.current_key(), Key::DSharp);
    }

    #[test]
    fn test_scale_in_g() {
        let mut ctx = ctx();
        cmd_key("G", &mut ctx);
        let m = message(cmd_scale("", &mut ctx));
        assert!(m.contains("G A B C D E F#"));
    }

    #[test]
    fn test_chords_lists_seven_degrees() {
        let mut ctx = ctx();
        let m = message(cmd_chords("", &mut ctx));
        assert_eq!(m.lines().count(), 8);
        assert!(m.contains("Bdim") || m.contains("B°"));

        let m = message(cmd_chords("sevenths", &mut ctx));
        assert!(m.contains("G7"));
        assert!(m.contains("viiø7"));
    }

    #[test]
    fn test_chord_with_type_and_default_quality() {
        let mut ctx = ctx();
        let m = message(cmd_chord("2", &mut ctx));
        assert!(m.starts_with("Dm: D F A"));

        let m = message(cmd_chord("V dominant7", &mut ctx));
        assert!(m.starts_with("G7: G B D F"));

        assert!(matches!(cmd_chord("9", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_chord("1 power", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_progression_lookup() {
        let mut ctx = ctx();
        let m = message(cmd_progression("ii-V-I", &mut ctx));
        assert!(m.contains("Dm"));
        assert!(m.contains("G"));
        assert!(matches!(
            cmd_progression("II-V-I", &mut ctx),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn test_emotions_by_pool() {
        let mut ctx = ctx();
        let m = message(cmd_emotions("minor", &mut ctx));
        assert!(m.contains("Sad (Min7)"));
        assert!(!m.contains("Happy (Maj6) "));
        assert!(matches!(cmd_emotions("lydian", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_emotion_arguments() {
        assert_eq!(parse_emotion_args("Sad (Min7)"), Some((Emotion::SadMin7, None)));
        assert_eq!(
            parse_emotion_args("\"sad (min7)\" A"),
            Some((Emotion::SadMin7, Some(Key::A)))
        );
        assert_eq!(parse_emotion_args("0"), Some((Emotion::HappyMaj6, None)));
        assert_eq!(parse_emotion_args("12 D"), Some((Emotion::SadMin7, Some(Key::D))));
        assert_eq!(parse_emotion_args("minor 4"), Some((Emotion::SadMin7, None)));
        assert_eq!(
            parse_emotion_args("major 0 F#"),
            Some((Emotion::HappyMaj6, Some(Key::FSharp)))
        );
        assert_eq!(parse_emotion_args("minor 24"), None);
        assert_eq!(parse_emotion_args("48"), None);
        assert_eq!(parse_emotion_args("Elated"), None);
    }

    #[test]
    fn test_emotion_on_root() {
        let mut ctx = ctx();
        let m = message(cmd_emotion("Sad (Min7) A", &mut ctx));
        assert!(m.contains("A C E G"));
    }
}
