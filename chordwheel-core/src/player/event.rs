//! Note events emitted by the progression player
//!
//! The player never owns an output. It reports note-on/note-off pairs to an
//! [`EventSink`], which may be a synthesizer voice bank, a MIDI forwarder, or
//! a plain `Vec` in tests.

/// Highest valid MIDI note number
pub const MAX_NOTE: i16 = 127;

/// A note switching on or off at a sample offset inside the rendered block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Frame offset from the start of the block
    pub offset: usize,
    pub note: u8,
    pub on: bool,
}

impl NoteEvent {
    pub fn on(offset: usize, note: u8) -> Self {
        Self { offset, note, on: true }
    }

    pub fn off(offset: usize, note: u8) -> Self {
        Self { offset, note, on: false }
    }
}

/// Receiver of note events
///
/// Implementations are called on the audio thread and must not block.
pub trait EventSink {
    fn note_on(&mut self, offset: usize, note: u8);
    fn note_off(&mut self, offset: usize, note: u8);
}

impl EventSink for Vec<NoteEvent> {
    fn note_on(&mut self, offset: usize, note: u8) {
        self.push(NoteEvent::on(offset, note));
    }

    fn note_off(&mut self, offset: usize, note: u8) {
        self.push(NoteEvent::off(offset, note));
    }
}

/// An absent sink swallows events
impl<S: EventSink> EventSink for Option<S> {
    fn note_on(&mut self, offset: usize, note: u8) {
        if let Some(sink) = self {
            sink.note_on(offset, note);
        }
    }

    fn note_off(&mut self, offset: usize, note: u8) {
        if let Some(sink) = self {
            sink.note_off(offset, note);
        }
    }
}

/// Forward every event to two sinks (e.g. the internal synth and a MIDI port)
pub struct Tee<'a, A: EventSink, B: EventSink>(pub &'a mut A, pub &'a mut B);

impl<A: EventSink, B: EventSink> EventSink for Tee<'_, A, B> {
    fn note_on(&mut self, offset: usize, note: u8) {
        self.0.note_on(offset, note);
        self.1.note_on(offset, note);
    }

    fn note_off(&mut self, offset: usize, note: u8) {
        self.0.note_off(offset, note);
        self.1.note_off(offset, note);
    }
}

/// Convert a note value to MIDI, dropping anything outside 0..=127
pub fn to_midi(note: i16) -> Option<u8> {
    (0..=MAX_NOTE).contains(&note).then_some(note as u8)
}
