//! Control-to-audio handoff
//!
//! The control thread never touches the player directly. It queues
//! [`ControlMessage`]s on a bounded channel which the audio callback drains at
//! the start of each block. Progressions that the player lets go of travel back
//! on a second channel so they are freed off the audio thread.

use anyhow::{Result, anyhow};
use chordwheel_core::player::Tee;
use chordwheel_core::{Chord, Progression, ProgressionPlayer, TimeSignature};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::midi::MidiSink;
use super::synth::{SynthSettings, VoiceBank};

/// Largest block rendered in one pass; callers split longer buffers
pub const MAX_BLOCK: usize = 1024;

const CONTROL_CAPACITY: usize = 64;
const GARBAGE_CAPACITY: usize = 64;
const NO_INDEX: usize = usize::MAX;

#[derive(Debug)]
pub enum ControlMessage {
    Play(Progression),
    Stop,
    /// Stop the progression and hold the first chord until the next stop or play
    Audition(Progression),
    SetTempo(f64),
    SetTimeSignature(TimeSignature),
    SetLooping(bool),
    SetSynth(SynthSettings),
}

/// Playback state published by the audio thread once per block
#[derive(Debug)]
pub struct EngineStatus {
    playing: AtomicBool,
    current: AtomicUsize,
    held: AtomicUsize,
}

impl EngineStatus {
    fn new() -> Self {
        EngineStatus {
            playing: AtomicBool::new(false),
            current: AtomicUsize::new(NO_INDEX),
            held: AtomicUsize::new(0),
        }
    }
}

/// Audio-thread half: owns the player and the synthesizer
pub struct RenderCore {
    player: ProgressionPlayer,
    voices: VoiceBank,
    midi: Option<MidiSink>,
    scratch: Vec<f32>,
    control_rx: Receiver<ControlMessage>,
    garbage_tx: Sender<Progression>,
    status: Arc<EngineStatus>,
}

impl RenderCore {
    /// Render up to [`MAX_BLOCK`] mono frames
    pub fn process(&mut self, frames: usize) -> &[f32] {
        let frames = frames.min(MAX_BLOCK);
        self.drain_control();

        for i in 0..frames {
            let mut sink = Tee(&mut self.voices, &mut self.midi);
            self.player.render(1, &mut sink);
            self.scratch[i] = self.voices.next_sample();
        }

        if let Some(finished) = self.player.take_retired() {
            discard(&self.garbage_tx, finished);
        }
        self.publish_status();

        &self.scratch[..frames]
    }

    fn drain_control(&mut self) {
        while let Ok(msg) = self.control_rx.try_recv() {
            let mut sink = Tee(&mut self.voices, &mut self.midi);
            match msg {
                ControlMessage::Play(progression) => {
                    if let Some(old) = self.player.play(progression, 0, &mut sink) {
                        discard(&self.garbage_tx, old);
                    }
                }
                ControlMessage::Stop => self.player.stop(0, &mut sink),
                ControlMessage::Audition(chords) => {
                    self.player.stop(0, &mut sink);
                    if let Some(chord) = chords.first() {
                        self.player.play_chord(chord, 0, &mut sink);
                    }
                    discard(&self.garbage_tx, chords);
                }
                ControlMessage::SetTempo(bpm) => self.player.set_tempo(bpm),
                ControlMessage::SetTimeSignature(ts) => self.player.set_time_signature(ts),
                ControlMessage::SetLooping(looping) => self.player.set_looping(looping),
                ControlMessage::SetSynth(settings) => self.voices.set_settings(settings),
            }
        }
    }

    fn publish_status(&self) {
        self.status
            .playing
            .store(self.player.is_playing(), Ordering::Relaxed);
        self.status.current.store(
            self.player.current_index().unwrap_or(NO_INDEX),
            Ordering::Relaxed,
        );
        self.status
            .held
            .store(self.player.held_notes().len(), Ordering::Relaxed);
    }
}

/// Hand a progression back to the control thread for freeing
fn discard(garbage_tx: &Sender<Progression>, progression: Progression) {
    // Dropped here only if the control side has stopped collecting
    let _ = garbage_tx.try_send(progression);
}

/// Control-thread half
pub struct EngineHandle {
    control_tx: Sender<ControlMessage>,
    garbage_rx: Receiver<Progression>,
    status: Arc<EngineStatus>,
    sample_rate: f64,
}

impl EngineHandle {
    pub fn play(&self, progression: Progression) -> Result<()> {
        self.send(ControlMessage::Play(progression))
    }

    pub fn stop(&self) -> Result<()> {
        self.send(ControlMessage::Stop)
    }

    pub fn audition(&self, chord: Chord) -> Result<()> {
        self.send(ControlMessage::Audition(vec![chord]))
    }

    pub fn set_tempo(&self, bpm: f64) -> Result<()> {
        self.send(ControlMessage::SetTempo(bpm))
    }

    pub fn set_time_signature(&self, time_signature: TimeSignature) -> Result<()> {
        self.send(ControlMessage::SetTimeSignature(time_signature))
    }

    pub fn set_looping(&self, looping: bool) -> Result<()> {
        self.send(ControlMessage::SetLooping(looping))
    }

    pub fn set_synth(&self, settings: SynthSettings) -> Result<()> {
        self.send(ControlMessage::SetSynth(settings))
    }

    pub fn is_playing(&self) -> bool {
        self.status.playing.load(Ordering::Relaxed)
    }

    /// Slot of the sounding chord as of the last rendered block
    pub fn current_index(&self) -> Option<usize> {
        match self.status.current.load(Ordering::Relaxed) {
            NO_INDEX => None,
            i => Some(i),
        }
    }

    pub fn held_note_count(&self) -> usize {
        self.status.held.load(Ordering::Relaxed)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Free progressions handed back by the audio thread; returns how many
    pub fn collect_garbage(&self) -> usize {
        self.garbage_rx.try_iter().count()
    }

    fn send(&self, msg: ControlMessage) -> Result<()> {
        self.collect_garbage();
        self.control_tx.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => anyhow!("Audio engine is not keeping up, command dropped"),
            TrySendError::Disconnected(_) => anyhow!("Audio engine has stopped"),
        })
    }
}

/// Create both halves of an engine running at `sample_rate`
pub fn engine(
    sample_rate: f64,
    synth: SynthSettings,
    midi: Option<MidiSink>,
) -> (EngineHandle, RenderCore) {
    let (control_tx, control_rx) = bounded(CONTROL_CAPACITY);
    let (garbage_tx, garbage_rx) = bounded(GARBAGE_CAPACITY);
    let status = Arc::new(EngineStatus::new());

    let core = RenderCore {
        player: ProgressionPlayer::new(sample_rate),
        voices: VoiceBank::new(synth, sample_rate as f32),
        midi,
        scratch: vec![0.0; MAX_BLOCK],
        control_rx,
        garbage_tx,
        status: status.clone(),
    };

    let handle = EngineHandle {
        control_tx,
        garbage_rx,
        status,
        sample_rate,
    };

    (handle, core)
}
