//! MIDI REPL commands

use crate::audio::MidiOutputHandle;
use crate::commands::{CommandContext, CommandResult};
use colored::*;

fn handle(ctx: &CommandContext) -> Result<&MidiOutputHandle, CommandResult> {
    ctx.midi
        .as_ref()
        .ok_or_else(|| CommandResult::Error("MIDI output not initialized".to_string()))
}

/// Handle `midi devices` command - list available MIDI output ports
pub fn cmd_midi_devices(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    match MidiOutputHandle::list_ports() {
        Ok(ports) if ports.is_empty() => CommandResult::Message(
            "No MIDI output ports found. Make sure a MIDI device or virtual port is connected."
                .yellow()
                .to_string(),
        ),
        Ok(ports) => {
            let mut output = format!("{}\n", "🎹 Available MIDI Output Ports:".bold());
            for (i, port) in ports.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, port.cyan()));
            }
            output.push_str(&format!(
                "\n{} {}",
                "Use".dimmed(),
                "midi connect <port name>".green()
            ));
            CommandResult::Message(output)
        }
        Err(e) => CommandResult::Error(format!("Failed to list MIDI ports: {}", e)),
    }
}

/// Handle `midi connect <port>` command - partial, case-insensitive port match
pub fn cmd_midi_connect(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error(
            "Usage: midi connect <port name>\nUse 'midi devices' to see available ports"
                .to_string(),
        );
    }

    let midi = match handle(ctx) {
        Ok(midi) => midi,
        Err(e) => return e,
    };
    match midi.connect(args) {
        Ok(name) => CommandResult::Message(format!("🎹 Connected to MIDI port: {}", name.green())),
        Err(e) => CommandResult::Error(format!("Failed to connect to '{}': {}", args, e)),
    }
}

/// Handle `midi disconnect` command
pub fn cmd_midi_disconnect(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let midi = match handle(ctx) {
        Ok(midi) => midi,
        Err(e) => return e,
    };
    if !midi.is_connected() {
        return CommandResult::Message("MIDI is not connected".yellow().to_string());
    }
    match midi.disconnect() {
        Ok(()) => CommandResult::Message("🎹 Disconnected from MIDI".to_string()),
        Err(e) => CommandResult::Error(format!("Failed to disconnect: {}", e)),
    }
}

/// Handle `midi channel [1-16]` command
pub fn cmd_midi_channel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let midi = match handle(ctx) {
        Ok(midi) => midi,
        Err(e) => return e,
    };

    if args.is_empty() {
        return CommandResult::Message(format!("🎹 MIDI channel: {}", midi.channel() + 1));
    }

    match args.parse::<u8>() {
        Ok(ch @ 1..=16) => {
            midi.set_channel(ch - 1);
            CommandResult::Message(format!("🎹 MIDI channel set to {}", ch).green().to_string())
        }
        _ => CommandResult::Error("Channel must be 1-16".to_string()),
    }
}

/// Handle `midi status` command - show MIDI connection status
pub fn cmd_midi_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let midi = match handle(ctx) {
        Ok(midi) => midi,
        Err(e) => return e,
    };

    let mut output = format!("{}\n", "🎹 MIDI Status:".bold());
    match midi.connected_port() {
        Some(name) => {
            output.push_str(&format!("  Status: {}\n", "Connected".green().bold()));
            output.push_str(&format!("  Port: {}\n", name.cyan()));
        }
        None => output.push_str(&format!("  Status: {}\n", "Not connected".yellow())),
    }
    output.push_str(&format!("  Channel: {}", midi.channel() + 1));

    CommandResult::Message(output)
}

/// Handle `midi panic` command - all notes off on every channel
pub fn cmd_midi_panic(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let midi = match handle(ctx) {
        Ok(midi) => midi,
        Err(e) => return e,
    };
    match midi.panic() {
        Ok(()) => CommandResult::Message("🎹 All notes off sent".to_string()),
        Err(e) => CommandResult::Error(format!("Failed to send panic: {}", e)),
    }
}
