pub mod engine;
pub mod midi;
pub mod output;
pub mod synth;

pub use engine::{EngineHandle, RenderCore, engine};
pub use midi::{MidiOutputHandle, MidiSink};
pub use output::{AudioBackend, AudioOutput, HeadlessDriver};
pub use synth::{SynthSettings, VoiceBank, Waveform};
