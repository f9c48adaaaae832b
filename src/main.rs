use anyhow::Result;
use chordwheel::audio::{AudioBackend, MidiOutputHandle};
use chordwheel::{CommandContext, Config, Repl};
use env_logger::Env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::info!("Starting ChordWheel");

    let config = Config::load();
    let session = config.session();
    let synth = config.synth_settings();

    // MIDI is optional; playback still works through the synthesizer
    let midi = match MidiOutputHandle::new(config.midi_channel()) {
        Ok(midi) => Some(midi),
        Err(e) => {
            log::warn!(target: "midi", "MIDI output unavailable: {}", e);
            None
        }
    };
    if let (Some(midi), Some(port)) = (&midi, config.midi_port()) {
        match midi.connect(port) {
            Ok(name) => log::info!(target: "midi", "connected to {}", name),
            Err(e) => log::warn!(target: "midi", "could not connect to '{}': {}", port, e),
        }
    }

    let (backend, engine) = AudioBackend::open(
        synth,
        midi.as_ref().map(|m| m.sink()),
        config.fallback_sample_rate(),
    );
    log::info!("audio backend: {}", backend.describe());

    let mut ctx = CommandContext::new(session, config.realizer())
        .with_engine(engine, backend.describe());
    if let Some(midi) = midi {
        ctx = ctx.with_midi(midi);
    }
    ctx.sync_engine()?;

    let mut repl = Repl::new(ctx)?;
    repl.run()?;

    // Keep the stream alive until the loop exits
    drop(backend);
    Ok(())
}
