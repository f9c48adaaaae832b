//! Live MIDI output through midir
//!
//! The connection lives on its own thread. Control code talks to it through
//! [`MidiOutputHandle`]; the audio thread forwards note events through a
//! [`MidiSink`], which never blocks and drops events if the queue is full.

use anyhow::{Result, anyhow};
use chordwheel_core::EventSink;
use crossbeam_channel::{Receiver, Sender, bounded};
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CLIENT_NAME: &str = "ChordWheel";
const QUEUE_CAPACITY: usize = 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
/// Marks a note that is not sounding in [`MidiSink`]
const NOT_SOUNDING: u8 = 0xFF;
pub const DEFAULT_VELOCITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiCommand {
    Connect { port_name: String },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    AllNotesOff { channel: u8 },
    Disconnect,
    Shutdown,
}

impl MidiCommand {
    /// Raw bytes for channel messages, `None` for connection control
    pub fn to_bytes(&self) -> Option<[u8; 3]> {
        match *self {
            MidiCommand::NoteOn {
                channel,
                note,
                velocity,
            } => Some([0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]),
            MidiCommand::NoteOff { channel, note } => Some([0x80 | (channel & 0x0F), note & 0x7F, 0]),
            // CC 123: all notes off
            MidiCommand::AllNotesOff { channel } => Some([0xB0 | (channel & 0x0F), 123, 0]),
            _ => None,
        }
    }
}

/// First port whose name contains `partial`, ignoring case
fn find_port(midi_out: &MidiOutput, partial: &str) -> Result<(MidiOutputPort, String)> {
    let wanted = partial.to_lowercase();
    midi_out
        .ports()
        .into_iter()
        .find_map(|port| {
            let name = midi_out.port_name(&port).ok()?;
            name.to_lowercase().contains(&wanted).then_some((port, name))
        })
        .ok_or_else(|| anyhow!("MIDI port '{}' not found", partial))
}

/// Outcome of a `Connect` command: the opened port's full name, or why it failed
type ConnectReply = std::result::Result<String, String>;

struct MidiWorker {
    connection: Option<MidiOutputConnection>,
    command_rx: Receiver<MidiCommand>,
    reply_tx: Sender<ConnectReply>,
}

impl MidiWorker {
    fn connect(&mut self, port_name: &str) -> Result<String> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let (port, name) = find_port(&midi_out, port_name)?;
        let connection = midi_out
            .connect(&port, "chordwheel-out")
            .map_err(|e| anyhow!("Failed to open '{}': {}", name, e))?;

        log::info!(target: "midi", "connected to {}", name);
        self.connection = Some(connection);
        Ok(name)
    }

    fn run(&mut self) {
        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                MidiCommand::Connect { port_name } => {
                    let reply = self.connect(&port_name).map_err(|e| {
                        log::error!(target: "midi", "connect failed: {}", e);
                        e.to_string()
                    });
                    let _ = self.reply_tx.send(reply);
                }
                MidiCommand::Disconnect => {
                    if let Some(conn) = self.connection.take() {
                        conn.close();
                        log::info!(target: "midi", "disconnected");
                    }
                }
                MidiCommand::Shutdown => {
                    if let Some(conn) = &mut self.connection {
                        for channel in 0..16u8 {
                            if let Some(bytes) = (MidiCommand::AllNotesOff { channel }).to_bytes() {
                                let _ = conn.send(&bytes);
                            }
                        }
                    }
                    break;
                }
                message => {
                    if let (Some(conn), Some(bytes)) = (&mut self.connection, message.to_bytes()) {
                        if let Err(e) = conn.send(&bytes) {
                            log::warn!(target: "midi", "send failed: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Control-side handle to the MIDI output thread
pub struct MidiOutputHandle {
    command_tx: Sender<MidiCommand>,
    reply_rx: Receiver<ConnectReply>,
    thread: Option<JoinHandle<()>>,
    port_name: RwLock<Option<String>>,
    channel: Arc<AtomicU8>,
}

impl MidiOutputHandle {
    /// Start the output thread, not yet connected. `channel` is zero-based.
    pub fn new(channel: u8) -> Result<Self> {
        let (command_tx, command_rx) = bounded(QUEUE_CAPACITY);
        let (reply_tx, reply_rx) = bounded(1);

        let thread = thread::Builder::new()
            .name("midi-out".to_string())
            .spawn(move || {
                let mut worker = MidiWorker {
                    connection: None,
                    command_rx,
                    reply_tx,
                };
                worker.run();
            })?;

        Ok(Self {
            command_tx,
            reply_rx,
            thread: Some(thread),
            port_name: RwLock::new(None),
            channel: Arc::new(AtomicU8::new(channel & 0x0F)),
        })
    }

    /// Output port names. Client creation can fail transiently, so it is retried.
    pub fn list_ports() -> Result<Vec<String>> {
        let mut last_err = None;
        for attempt in 0..3 {
            if attempt > 0 {
                thread::sleep(std::time::Duration::from_millis(100));
            }
            match MidiOutput::new(CLIENT_NAME) {
                Ok(midi_out) => {
                    return Ok(midi_out
                        .ports()
                        .iter()
                        .filter_map(|p| midi_out.port_name(p).ok())
                        .collect());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(anyhow!(
            "MIDI initialization failed after 3 attempts: {:?}",
            last_err
        ))
    }

    /// Connect to the first port whose name contains `partial`; returns its full name
    ///
    /// Returns only once the output thread has opened the port. A failed
    /// attempt leaves any previous connection in place.
    pub fn connect(&self, partial: &str) -> Result<String> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let (_, name) = find_port(&midi_out, partial)?;

        // Replies left over from an attempt that timed out
        while self.reply_rx.try_recv().is_ok() {}

        self.send(MidiCommand::Connect { port_name: name })?;
        let name = match self.reply_rx.recv_timeout(CONNECT_TIMEOUT) {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => return Err(anyhow!(e)),
            Err(_) => return Err(anyhow!("MIDI thread did not answer the connect request")),
        };

        if let Ok(mut stored) = self.port_name.write() {
            *stored = Some(name.clone());
        }
        Ok(name)
    }

    pub fn disconnect(&self) -> Result<()> {
        self.panic()?;
        self.send(MidiCommand::Disconnect)?;
        if let Ok(mut stored) = self.port_name.write() {
            *stored = None;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected_port().is_some()
    }

    pub fn connected_port(&self) -> Option<String> {
        self.port_name.read().ok().and_then(|p| p.clone())
    }

    /// Zero-based channel used for forwarded notes
    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Relaxed)
    }

    pub fn set_channel(&self, channel: u8) {
        self.channel.store(channel & 0x0F, Ordering::Relaxed);
    }

    /// All notes off on every channel
    pub fn panic(&self) -> Result<()> {
        for channel in 0..16u8 {
            self.send(MidiCommand::AllNotesOff { channel })?;
        }
        Ok(())
    }

    /// Event sink for the audio thread
    pub fn sink(&self) -> MidiSink {
        MidiSink::new(self.command_tx.clone(), self.channel.clone(), DEFAULT_VELOCITY)
    }

    fn send(&self, cmd: MidiCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| anyhow!("MIDI thread is not running: {}", e))
    }
}

impl Drop for MidiOutputHandle {
    fn drop(&mut self) {
        let _ = self.command_tx.send(MidiCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Non-blocking note forwarder used on the audio thread
///
/// Each note-off goes to the channel its note-on used, so a channel change
/// while a chord sounds cannot leave notes hanging on the old channel.
#[derive(Clone)]
pub struct MidiSink {
    command_tx: Sender<MidiCommand>,
    channel: Arc<AtomicU8>,
    velocity: u8,
    /// Channel each sounding note was started on, or `NOT_SOUNDING`
    sounding: [u8; 128],
}

impl MidiSink {
    fn new(command_tx: Sender<MidiCommand>, channel: Arc<AtomicU8>, velocity: u8) -> Self {
        MidiSink {
            command_tx,
            channel,
            velocity,
            sounding: [NOT_SOUNDING; 128],
        }
    }

    fn forward(&self, cmd: MidiCommand) {
        // A full queue or a stopped thread drops the event
        let _ = self.command_tx.try_send(cmd);
    }
}

impl EventSink for MidiSink {
    fn note_on(&mut self, _offset: usize, note: u8) {
        let note = note & 0x7F;
        let channel = self.channel.load(Ordering::Relaxed);
        self.sounding[note as usize] = channel;
        self.forward(MidiCommand::NoteOn {
            channel,
            note,
            velocity: self.velocity,
        });
    }

    fn note_off(&mut self, _offset: usize, note: u8) {
        let note = note & 0x7F;
        let channel = match std::mem::replace(&mut self.sounding[note as usize], NOT_SOUNDING) {
            NOT_SOUNDING => self.channel.load(Ordering::Relaxed),
            started_on => started_on,
        };
        self.forward(MidiCommand::NoteOff { channel, note });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_bytes() {
        let on = MidiCommand::NoteOn {
            channel: 2,
            note: 60,
            velocity: 100,
        };
        assert_eq!(on.to_bytes(), Some([0x92, 60, 100]));
        assert_eq!(
            MidiCommand::NoteOff { channel: 0, note: 64 }.to_bytes(),
            Some([0x80, 64, 0])
        );
        assert_eq!(
            MidiCommand::AllNotesOff { channel: 15 }.to_bytes(),
            Some([0xBF, 123, 0])
        );
        assert_eq!(MidiCommand::Disconnect.to_bytes(), None);
    }

    #[test]
    fn test_note_off_follows_note_on_channel() {
        let (tx, rx) = bounded(8);
        let channel = Arc::new(AtomicU8::new(0));
        let mut sink = MidiSink::new(tx, channel.clone(), 90);

        sink.note_on(0, 60);
        channel.store(9, Ordering::Relaxed);
        sink.note_on(0, 64);
        sink.note_off(0, 60);
        sink.note_off(0, 64);
        // Not sounding: released on the current channel
        sink.note_off(0, 67);

        let sent: Vec<MidiCommand> = rx.try_iter().collect();
        assert_eq!(
            sent,
            vec![
                MidiCommand::NoteOn { channel: 0, note: 60, velocity: 90 },
                MidiCommand::NoteOn { channel: 9, note: 64, velocity: 90 },
                MidiCommand::NoteOff { channel: 0, note: 60 },
                MidiCommand::NoteOff { channel: 9, note: 64 },
                MidiCommand::NoteOff { channel: 9, note: 67 },
            ]
        );
    }

    #[test]
    fn test_channel_change_mid_chord_releases_every_note() {
        use crate::audio::{SynthSettings, engine};

        let (tx, rx) = bounded(QUEUE_CAPACITY);
        let channel = Arc::new(AtomicU8::new(0));
        let sink = MidiSink::new(tx, channel.clone(), DEFAULT_VELOCITY);
        let (handle, mut core) = engine(1000.0, SynthSettings::default(), Some(sink));

        handle.play(vec![vec![60, 64, 67]]).unwrap();
        core.process(8);
        channel.store(4, Ordering::Relaxed);
        handle.stop().unwrap();
        core.process(8);

        let sent: Vec<MidiCommand> = rx.try_iter().collect();
        let ons: Vec<(u8, u8)> = sent
            .iter()
            .filter_map(|c| match *c {
                MidiCommand::NoteOn { channel, note, .. } => Some((channel, note)),
                _ => None,
            })
            .collect();
        let offs: Vec<(u8, u8)> = sent
            .iter()
            .filter_map(|c| match *c {
                MidiCommand::NoteOff { channel, note } => Some((channel, note)),
                _ => None,
            })
            .collect();
        assert_eq!(ons, vec![(0, 60), (0, 64), (0, 67)]);
        assert_eq!(offs, ons);
    }

    #[test]
    fn test_worker_reports_failed_connect() {
        let (command_tx, command_rx) = bounded(4);
        let (reply_tx, reply_rx) = bounded(1);
        let worker = thread::spawn(move || {
            let mut worker = MidiWorker {
                connection: None,
                command_rx,
                reply_tx,
            };
            worker.run();
            worker.connection.is_some()
        });

        command_tx
            .send(MidiCommand::Connect {
                port_name: "chordwheel-missing-port-7f3a".to_string(),
            })
            .unwrap();
        let reply = reply_rx.recv_timeout(CONNECT_TIMEOUT).unwrap();
        assert!(reply.is_err());

        command_tx.send(MidiCommand::Shutdown).unwrap();
        assert!(!worker.join().unwrap(), "no connection after a failed open");
    }

    #[test]
    fn test_failed_connect_leaves_handle_disconnected() {
        let handle = MidiOutputHandle::new(0).unwrap();
        assert!(handle.connect("chordwheel-missing-port-7f3a").is_err());
        assert!(!handle.is_connected());
        assert_eq!(handle.connected_port(), None);
    }

    #[test]
    fn test_sink_never_blocks_when_full() {
        let (tx, rx) = bounded(1);
        let mut sink = MidiSink::new(tx, Arc::new(AtomicU8::new(0)), DEFAULT_VELOCITY);
        for note in 0..10 {
            sink.note_on(0, note);
        }
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_handle_channel() {
        let handle = MidiOutputHandle::new(3).unwrap();
        assert_eq!(handle.channel(), 3);
        handle.set_channel(17);
        assert_eq!(handle.channel(), 1);
        assert!(!handle.is_connected());
    }

    #[test]
    fn test_list_ports() {
        // Depends on the machine; only checks that listing does not panic
        match MidiOutputHandle::list_ports() {
            Ok(ports) => println!("{} MIDI output port(s)", ports.len()),
            Err(e) => println!("MIDI unavailable: {}", e),
        }
    }
}
