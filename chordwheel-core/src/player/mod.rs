//! Sample-accurate progression playback
//!
//! [`ProgressionPlayer`] lives on the audio thread. Control changes reach it
//! between blocks; inside [`ProgressionPlayer::render`] it walks the block one
//! sample at a time so chord boundaries land on the exact frame.

pub mod event;
pub mod timing;

pub use event::{EventSink, MAX_NOTE, NoteEvent, Tee, to_midi};
pub use timing::{DEFAULT_TEMPO, MAX_TEMPO, MIN_TEMPO, TimeSignature, clamp_tempo, samples_per_chord};

use crate::theory::Chord;
use log::debug;

/// Chords in playing order, each a list of MIDI note numbers
pub type Progression = Vec<Chord>;

const MAX_HELD_NOTES: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
}

pub struct ProgressionPlayer {
    progression: Progression,
    /// Finished progression waiting to be collected off the audio thread
    retired: Option<Progression>,
    state: PlayerState,
    /// Slot of the chord currently sounding
    current: Option<usize>,
    /// Slot to start at the next boundary
    next: usize,
    samples_until_next_chord: u64,
    held: Vec<u8>,
    tempo: f64,
    time_signature: TimeSignature,
    looping: bool,
    sample_rate: f64,
}

impl ProgressionPlayer {
    pub fn new(sample_rate: f64) -> Self {
        ProgressionPlayer {
            progression: Vec::new(),
            retired: None,
            state: PlayerState::Stopped,
            current: None,
            next: 0,
            samples_until_next_chord: 0,
            held: Vec::with_capacity(MAX_HELD_NOTES),
            tempo: DEFAULT_TEMPO,
            time_signature: TimeSignature::COMMON,
            looping: false,
            sample_rate,
        }
    }

    // ------------------------------------------------------------------
    // Settings (picked up at the next chord boundary)
    // ------------------------------------------------------------------

    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = clamp_tempo(bpm);
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Length of the next chord slot under the current settings
    pub fn samples_per_chord(&self) -> u64 {
        samples_per_chord(self.tempo, self.time_signature, self.sample_rate)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Index of the sounding chord slot, `None` when stopped or not yet started
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn held_notes(&self) -> &[u8] {
        &self.held
    }

    pub fn progression_len(&self) -> usize {
        self.progression.len()
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Replace the active progression and start it from the first chord
    ///
    /// Held notes are released at `offset` before anything else happens. The
    /// first chord sounds on the next rendered sample. Returns the displaced
    /// progression so the caller can free it away from the audio thread.
    pub fn play<S: EventSink>(
        &mut self,
        progression: Progression,
        offset: usize,
        sink: &mut S,
    ) -> Option<Progression> {
        self.stop_current_chord(offset, sink);

        let displaced = self.take_displaced();
        self.progression = progression;
        self.current = None;
        self.next = 0;
        self.samples_until_next_chord = 0;

        self.state = if self.progression.is_empty() {
            PlayerState::Stopped
        } else {
            PlayerState::Playing
        };

        displaced
    }

    /// Release held notes and clear the progression
    pub fn stop<S: EventSink>(&mut self, offset: usize, sink: &mut S) {
        self.stop_current_chord(offset, sink);
        self.finish();
    }

    /// Progression cleared by a stop or by running off the end
    pub fn take_retired(&mut self) -> Option<Progression> {
        self.retired.take()
    }

    fn take_displaced(&mut self) -> Option<Progression> {
        if !self.progression.is_empty() {
            Some(std::mem::take(&mut self.progression))
        } else {
            self.retired.take()
        }
    }

    fn finish(&mut self) {
        if !self.progression.is_empty() {
            self.retired = Some(std::mem::take(&mut self.progression));
        }
        self.state = PlayerState::Stopped;
        self.current = None;
        self.next = 0;
        self.samples_until_next_chord = 0;
    }

    // ------------------------------------------------------------------
    // Note handling
    // ------------------------------------------------------------------

    /// Sound one chord, releasing whatever was held first
    ///
    /// Notes outside 0..=127 are skipped.
    pub fn play_chord<S: EventSink>(&mut self, notes: &[i16], offset: usize, sink: &mut S) {
        self.stop_current_chord(offset, sink);

        for &note in notes {
            let Some(note) = to_midi(note) else {
                continue;
            };
            if self.held.len() == MAX_HELD_NOTES {
                break;
            }
            sink.note_on(offset, note);
            self.held.push(note);
        }
    }

    /// Release every held note. Does nothing when nothing is held.
    pub fn stop_current_chord<S: EventSink>(&mut self, offset: usize, sink: &mut S) {
        for &note in &self.held {
            sink.note_off(offset, note);
        }
        self.held.clear();
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Advance playback by `frames` samples, emitting events into `sink`
    pub fn render<S: EventSink>(&mut self, frames: usize, sink: &mut S) {
        if self.state != PlayerState::Playing {
            return;
        }

        for offset in 0..frames {
            if self.samples_until_next_chord == 0 {
                self.advance(offset, sink);
                if self.state != PlayerState::Playing {
                    break;
                }
            }
            self.samples_until_next_chord -= 1;
        }
    }

    /// Convenience wrapper collecting a block's events into a new `Vec`
    pub fn render_block(&mut self, frames: usize) -> Vec<NoteEvent> {
        let mut events: Vec<NoteEvent> = Vec::new();
        self.render(frames, &mut events);
        events
    }

    fn advance<S: EventSink>(&mut self, offset: usize, sink: &mut S) {
        self.stop_current_chord(offset, sink);

        if self.next >= self.progression.len() {
            if self.looping && !self.progression.is_empty() {
                self.next = 0;
            } else {
                self.finish();
                return;
            }
        }

        let index = self.next;
        // Split borrow: the chord is read while held notes are written
        let chord = std::mem::take(&mut self.progression[index]);
        self.play_chord(&chord, offset, sink);
        self.progression[index] = chord;

        self.current = Some(index);
        self.next = index + 1;
        self.samples_until_next_chord = self.samples_per_chord();
    }
}

impl Default for ProgressionPlayer {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ons(events: &[NoteEvent]) -> Vec<(usize, u8)> {
        events.iter().filter(|e| e.on).map(|e| (e.offset, e.note)).collect()
    }

    #[test]
    fn test_play_chord_drops_out_of_range_notes() {
        let mut player = ProgressionPlayer::new(1000.0);
        let mut events: Vec<NoteEvent> = Vec::new();
        player.play_chord(&[-3, 60, 64, 130], 0, &mut events);
        assert_eq!(ons(&events), vec![(0, 60), (0, 64)]);
        assert_eq!(player.held_notes(), &[60, 64]);
    }

    #[test]
    fn test_play_chord_releases_previous_chord_first() {
        let mut player = ProgressionPlayer::new(1000.0);
        let mut events: Vec<NoteEvent> = Vec::new();
        player.play_chord(&[60, 64], 0, &mut events);
        events.clear();
        player.play_chord(&[62], 5, &mut events);
        assert_eq!(
            events,
            vec![NoteEvent::off(5, 60), NoteEvent::off(5, 64), NoteEvent::on(5, 62)]
        );
    }

    #[test]
    fn test_stop_current_chord_is_idempotent() {
        let mut player = ProgressionPlayer::new(1000.0);
        let mut events: Vec<NoteEvent> = Vec::new();
        player.play_chord(&[60], 0, &mut events);
        player.stop_current_chord(1, &mut events);
        player.stop_current_chord(2, &mut events);
        assert_eq!(events, vec![NoteEvent::on(0, 60), NoteEvent::off(1, 60)]);
        assert!(player.held_notes().is_empty());
    }

    #[test]
    fn test_first_chord_starts_on_first_sample() {
        let mut player = ProgressionPlayer::new(1000.0);
        let mut events: Vec<NoteEvent> = Vec::new();
        player.play(vec![vec![60, 64, 67]], 0, &mut events);
        assert!(events.is_empty());

        let events = player.render_block(16);
        assert_eq!(ons(&events), vec![(0, 60), (0, 64), (0, 67)]);
        assert_eq!(player.current_index(), Some(0));
    }

    #[test]
    fn test_boundary_lands_mid_block() {
        // 240 bpm, 1/4 -> quarter second -> 250 samples at 1 kHz
        let mut player = ProgressionPlayer::new(1000.0);
        player.set_tempo(240.0);
        player.set_time_signature(TimeSignature::new(1, 4).unwrap());
        player.play(vec![vec![60], vec![62]], 0, &mut Vec::<NoteEvent>::new());

        let first = player.render_block(100);
        let second = player.render_block(100);
        let third = player.render_block(100);
        assert_eq!(ons(&first), vec![(0, 60)]);
        assert!(second.is_empty());
        assert_eq!(third, vec![NoteEvent::off(50, 60), NoteEvent::on(50, 62)]);
    }

    #[test]
    fn test_empty_chord_occupies_its_slot() {
        let mut player = ProgressionPlayer::new(1000.0);
        player.set_tempo(240.0);
        player.set_time_signature(TimeSignature::new(1, 4).unwrap());
        player.play(vec![vec![60], vec![], vec![64]], 0, &mut Vec::<NoteEvent>::new());

        let events = player.render_block(600);
        assert_eq!(
            events,
            vec![
                NoteEvent::on(0, 60),
                NoteEvent::off(250, 60),
                NoteEvent::on(500, 64),
            ]
        );
        assert_eq!(player.current_index(), Some(2));
    }

    #[test]
    fn test_tempo_change_waits_for_boundary() {
        let mut player = ProgressionPlayer::new(1000.0);
        player.set_tempo(240.0);
        player.set_time_signature(TimeSignature::new(1, 4).unwrap());
        player.play(vec![vec![60], vec![62], vec![64]], 0, &mut Vec::<NoteEvent>::new());

        player.render_block(10);
        // Halve the tempo while chord 1 sounds; it still ends at 250
        player.set_tempo(120.0);
        let events = player.render_block(990);
        assert_eq!(
            ons(&events),
            vec![(240, 62), (740, 64)],
            "second slot should be 500 samples long"
        );
    }

    #[test]
    fn test_stop_releases_notes_and_clears() {
        let mut player = ProgressionPlayer::new(1000.0);
        player.play(vec![vec![60, 64]], 0, &mut Vec::<NoteEvent>::new());
        player.render_block(4);

        let mut events: Vec<NoteEvent> = Vec::new();
        player.stop(3, &mut events);
        assert_eq!(events, vec![NoteEvent::off(3, 60), NoteEvent::off(3, 64)]);
        assert!(!player.is_playing());
        assert_eq!(player.current_index(), None);
        assert_eq!(player.progression_len(), 0);
        assert_eq!(player.take_retired(), Some(vec![vec![60, 64]]));
        assert!(player.render_block(1000).is_empty());
    }

    #[test]
    fn test_play_returns_displaced_progression() {
        let mut player = ProgressionPlayer::new(1000.0);
        let mut events: Vec<NoteEvent> = Vec::new();
        assert_eq!(player.play(vec![vec![60]], 0, &mut events), None);
        player.render(1, &mut events);

        events.clear();
        let old = player.play(vec![vec![67]], 0, &mut events);
        assert_eq!(old, Some(vec![vec![60]]));
        // Old chord released before the new one starts
        assert_eq!(events, vec![NoteEvent::off(0, 60)]);
        assert_eq!(ons(&player.render_block(1)), vec![(0, 67)]);
    }

    #[test]
    fn test_play_empty_progression_stops() {
        let mut player = ProgressionPlayer::new(1000.0);
        player.play(vec![vec![60]], 0, &mut Vec::<NoteEvent>::new());
        player.render_block(1);
        let mut events: Vec<NoteEvent> = Vec::new();
        player.play(Vec::new(), 0, &mut events);
        assert_eq!(events, vec![NoteEvent::off(0, 60)]);
        assert_eq!(player.state(), PlayerState::Stopped);
    }
}
