//! General REPL commands (help, status, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `status` command - session settings and transport state
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let session = &ctx.session;
    let on_off = |b: bool| if b { "on".green() } else { "off".dimmed() };

    let mut output = format!("{}\n", "🎵 Session:".bold());
    output.push_str(&format!("  Key: {} major\n", ctx.keys.key_name().cyan()));
    output.push_str(&format!("  Tempo: {:.1} BPM\n", session.tempo));
    output.push_str(&format!("  Time signature: {}\n", session.time_signature));
    output.push_str(&format!("  Loop: {}\n", on_off(session.looping)));
    output.push_str(&format!("  Sevenths: {}\n", on_off(session.sevenths)));
    output.push_str(&format!("  Voicing: {}\n", session.voicing));
    output.push_str(&format!("  Audio: {}\n", ctx.backend));

    match &ctx.engine {
        Some(engine) if engine.is_playing() => {
            let chord = engine
                .current_index()
                .map(|i| format!("chord {}", i + 1))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "  Transport: {} ({}, {} notes held)\n",
                "playing".green().bold(),
                chord,
                engine.held_note_count()
            ));
        }
        Some(_) => output.push_str(&format!("  Transport: {}\n", "stopped".yellow())),
        None => output.push_str(&format!("  Transport: {}\n", "unavailable".red())),
    }

    match ctx.midi.as_ref().and_then(|m| m.connected_port()) {
        Some(port) => output.push_str(&format!("  MIDI: {}", port.cyan())),
        None => output.push_str("  MIDI: not connected"),
    }

    CommandResult::Message(output)
}

/// Print help information
fn print_help() {
    println!("{}", "🎵 ChordWheel Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Theory:".green());
    println!("  {}              - Show or set the key (e.g. key Eb)", "key [name]".cyan());
    println!("  {}                   - Notes of the major scale", "scale".cyan());
    println!("  {}         - Diatonic chords of the key", "chords [sevenths]".cyan());
    println!(
        "  {} - One chord by degree, optional type and voicing",
        "chord <degree> [type] [voicing]".cyan()
    );
    println!("  {}            - List preset progressions", "progressions".cyan());
    println!(
        "  {} - Show a preset progression",
        "progression <name> [sevenths] [voicing]".cyan()
    );
    println!("  {}   - List emotions", "emotions [major|minor]".cyan());
    println!(
        "  {}  - Emotion profile applied to a root",
        "emotion <name|pool index> [root]".cyan()
    );
    println!();
    println!("{}", "Playback:".green());
    println!(
        "  {} - Play a preset or degree list",
        "play <preset|degrees> [sevenths] [voicing]".cyan()
    );
    println!("  {}   - Sound one chord", "audition <degree> [type]".cyan());
    println!("  {}                    - Stop playback", "stop".cyan());
    println!("  {}             - Show or set tempo (1-400)", "tempo [bpm]".cyan());
    println!("  {}           - Show or set time signature", "timesig [n/d]".cyan());
    println!("  {}           - Toggle or set looping", "loop [on|off]".cyan());
    println!();
    println!("{}", "MIDI:".green());
    println!("  {}            - List MIDI output ports", "midi devices".cyan());
    println!("  {}     - Connect to a MIDI port", "midi connect <port>".cyan());
    println!("  {}         - Disconnect MIDI", "midi disconnect".cyan());
    println!("  {}   - Show or set channel (1-16)", "midi channel [n]".cyan());
    println!("  {}             - Show MIDI status", "midi status".cyan());
    println!("  {}              - All notes off", "midi panic".cyan());
    println!();
    println!("{}", "Voicings:".green());
    println!("  close open drop2 drop3 first second spread");
    println!();
    println!("{}", "Examples:".green());
    println!("  chordwheel> {}", "key D".cyan());
    println!("  chordwheel> {}", "play ii-V-I sevenths drop2".cyan());
    println!("  chordwheel> {}", "play 1 6 4 5".cyan());
    println!("  chordwheel> {}", "emotion \"Sad (Min7)\" A".cyan());
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}                  - Show session and transport", "status".bright_green());
    println!("  {}                    - Show this help", "help".bright_green());
    println!("  {}                    - Exit the REPL", "quit".bright_red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Session;
    use chordwheel_core::Realizer;

    #[test]
    fn test_status_without_engine() {
        colored::control::set_override(false);
        let mut ctx = CommandContext::new(Session::default(), Realizer::default());
        match cmd_status("", &mut ctx) {
            CommandResult::Message(m) => {
                assert!(m.contains("Key: C major"));
                assert!(m.contains("Tempo: 120.0 BPM"));
                assert!(m.contains("4/4"));
                assert!(m.contains("unavailable"));
                assert!(m.contains("MIDI: not connected"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
