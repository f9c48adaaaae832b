//! Playback REPL commands: play, audition, stop and transport settings

use crate::commands::{
    CommandContext, CommandResult, note_numbers, parse_degree, split_options,
};
use chordwheel_core::player::timing::{MAX_TEMPO, MIN_TEMPO};
use chordwheel_core::theory::{find_preset, parse_degree_list};
use chordwheel_core::{ChordType, Progression, ScaleDegree, TimeSignature};
use colored::*;

/// Handle `play <preset|degrees> [sevenths] [voicing]` command
pub fn cmd_play(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (target, options) = split_options(args);
    if target.is_empty() {
        return CommandResult::Error(
            "Usage: play <preset name or degree list> [sevenths] [voicing]".to_string(),
        );
    }

    let sevenths = options.sevenths.unwrap_or(ctx.session.sevenths);
    let voicing = options.voicing.unwrap_or(ctx.session.voicing);

    let (label, degrees, chords) = if let Some(preset) = find_preset(&target) {
        let chords = ctx.keys.common_progression(preset.name, sevenths, voicing);
        (preset.name.to_string(), preset.degrees.to_vec(), chords)
    } else if let Some(degrees) = parse_degree_list(&target) {
        let chords = ctx
            .keys
            .generate_progression(&degrees, sevenths)
            .iter()
            .map(|chord| ctx.keys.apply_voicing(chord, voicing))
            .collect();
        (target.clone(), degrees, chords)
    } else {
        return CommandResult::Error(format!(
            "'{}' is neither a preset nor a degree list. Try 'progressions'",
            target
        ));
    };

    let progression: Progression = ctx.realizer.realize_progression(&chords);
    let names = chord_names(ctx, &degrees, sevenths);

    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(e) => return e,
    };
    if let Err(e) = engine.play(progression) {
        return CommandResult::Error(e.to_string());
    }

    CommandResult::Message(
        format!(
            "▶ Playing {} in {}: {}  ({:.0} BPM {}, loop {})",
            label,
            ctx.keys.key_name(),
            names.join(" "),
            ctx.session.tempo,
            ctx.session.time_signature,
            if ctx.session.looping { "on" } else { "off" }
        )
        .bright_green()
        .to_string(),
    )
}

/// Handle `audition <degree> [type] [voicing]` command - hold one chord
pub fn cmd_audition(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (rest, options) = split_options(args);
    let mut tokens = rest.split_whitespace();
    let Some(degree) = tokens.next().and_then(parse_degree) else {
        return CommandResult::Error("Usage: audition <degree> [type] [voicing]".to_string());
    };

    let sevenths = options.sevenths.unwrap_or(ctx.session.sevenths);
    let quality = match tokens.next() {
        Some(name) => match ChordType::parse(name) {
            Some(t) => t,
            None => return CommandResult::Error(format!("Unknown chord type '{}'", name)),
        },
        None => diatonic_quality(ctx, degree, sevenths),
    };

    let chord = ctx.keys.generate_chord(degree, quality);
    let chord = ctx.keys.apply_voicing(&chord, options.voicing.unwrap_or(ctx.session.voicing));
    let notes = ctx.realizer.realize(&chord);
    let shown = note_numbers(&notes);
    let name = ctx.keys.chord_name(degree, quality);

    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(e) => return e,
    };
    match engine.audition(notes) {
        Ok(()) => CommandResult::Message(format!("🎹 {} {}", name.cyan(), shown.dimmed())),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `stop` command
pub fn cmd_stop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(e) => return e,
    };
    match engine.stop() {
        Ok(()) => CommandResult::Message("⏹ Stopped".to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `tempo [bpm]` command
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {:.1} BPM", ctx.session.tempo));
    }

    match args.parse::<f64>() {
        Ok(bpm) if (MIN_TEMPO..=MAX_TEMPO).contains(&bpm) => {
            ctx.session.tempo = bpm;
            push(ctx, format!("🎵 Tempo set to {:.1} BPM", bpm))
        }
        _ => CommandResult::Error(format!(
            "Invalid tempo. Use a value between {}-{} BPM",
            MIN_TEMPO, MAX_TEMPO
        )),
    }
}

/// Handle `timesig [n/d]` command
pub fn cmd_timesig(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current time signature: {}",
            ctx.session.time_signature
        ));
    }

    match args.parse::<TimeSignature>() {
        Ok(ts) => {
            ctx.session.time_signature = ts;
            push(ctx, format!("🎵 Time signature set to {}", ts))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `loop [on|off]` command; no argument toggles
pub fn cmd_loop(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let looping = match args.to_lowercase().as_str() {
        "" => !ctx.session.looping,
        "on" | "true" | "yes" | "1" => true,
        "off" | "false" | "no" | "0" => false,
        _ => return CommandResult::Error("Usage: loop [on|off]".to_string()),
    };

    ctx.session.looping = looping;
    push(
        ctx,
        format!("🔁 Looping {}", if looping { "on" } else { "off" }),
    )
}

/// Forward session transport settings to the engine, if one is running
fn push(ctx: &CommandContext, message: String) -> CommandResult {
    match ctx.sync_engine() {
        Ok(()) => CommandResult::Message(message.bright_green().to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn diatonic_quality(ctx: &CommandContext, degree: u8, sevenths: bool) -> ChordType {
    if sevenths {
        ctx.keys.analyze_seventh(degree)
    } else {
        ctx.keys.analyze_triad(degree)
    }
}

/// Chord symbols for a degree list; out-of-range degrees are rests
fn chord_names(ctx: &CommandContext, degrees: &[u8], sevenths: bool) -> Vec<String> {
    degrees
        .iter()
        .map(|&d| match ScaleDegree::from_number(d) {
            Some(_) => ctx.keys.chord_name(d, diatonic_quality(ctx, d, sevenths)),
            None => "-".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RenderCore, SynthSettings, engine};
    use crate::commands::Session;
    use chordwheel_core::Realizer;

    fn ctx_with_engine() -> (CommandContext, RenderCore) {
        colored::control::set_override(false);
        let (handle, core) = engine(1000.0, SynthSettings::default(), None);
        let ctx = CommandContext::new(Session::default(), Realizer::default())
            .with_engine(handle, "test".to_string());
        (ctx, core)
    }

    #[test]
    fn test_play_preset_reaches_engine() {
        let (mut ctx, mut core) = ctx_with_engine();
        match cmd_play("ii-V-I sevenths", &mut ctx) {
            CommandResult::Message(m) => assert!(m.contains("Dm7 G7 CM7")),
            other => panic!("unexpected {:?}", other),
        }

        core.process(8);
        let engine = ctx.engine.as_ref().unwrap();
        assert!(engine.is_playing());
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.held_note_count(), 4);
    }

    #[test]
    fn test_play_degree_list_with_rest() {
        let (mut ctx, mut core) = ctx_with_engine();
        match cmd_play("1 9 5", &mut ctx) {
            CommandResult::Message(m) => assert!(m.contains("C - G")),
            other => panic!("unexpected {:?}", other),
        }
        core.process(8);
        assert_eq!(ctx.engine.as_ref().unwrap().held_note_count(), 3);
    }

    #[test]
    fn test_play_rejects_unknown_target() {
        let (mut ctx, _core) = ctx_with_engine();
        assert!(matches!(cmd_play("", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_play("blues", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_playback_without_engine() {
        let mut ctx = CommandContext::new(Session::default(), Realizer::default());
        assert!(matches!(cmd_play("ii-V-I", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_stop("", &mut ctx), CommandResult::Error(_)));

        // Transport settings still land in the session
        assert!(matches!(cmd_tempo("90", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.session.tempo, 90.0);
    }

    #[test]
    fn test_tempo_bounds() {
        let (mut ctx, _core) = ctx_with_engine();
        assert!(matches!(cmd_tempo("0", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_tempo("401", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_tempo("fast", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_tempo("400", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.session.tempo, 400.0);
    }

    #[test]
    fn test_timesig_and_loop() {
        let (mut ctx, _core) = ctx_with_engine();
        assert!(matches!(cmd_timesig("3/4", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.session.time_signature.beats_per_measure(), 3);
        assert!(matches!(cmd_timesig("3/5", &mut ctx), CommandResult::Error(_)));

        cmd_loop("", &mut ctx);
        assert!(ctx.session.looping);
        cmd_loop("off", &mut ctx);
        assert!(!ctx.session.looping);
        assert!(matches!(cmd_loop("maybe", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_audition_holds_chord() {
        let (mut ctx, mut core) = ctx_with_engine();
        assert!(matches!(cmd_audition("4", &mut ctx), CommandResult::Message(_)));
        core.process(8);
        assert_eq!(ctx.engine.as_ref().unwrap().held_note_count(), 3);

        assert!(matches!(cmd_stop("", &mut ctx), CommandResult::Message(_)));
        core.process(8);
        assert_eq!(ctx.engine.as_ref().unwrap().held_note_count(), 0);
    }
}
