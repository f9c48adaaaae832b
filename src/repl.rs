//! Interactive REPL for ChordWheel
//!
//! Line editing runs on its own thread and feeds a channel, so the main loop
//! can also wake on a timer and reclaim progressions the audio thread let go of.

use crate::commands::{CommandContext, CommandRegistry, CommandResult, create_registry};
use anyhow::{Result, anyhow};
use colored::*;
use crossbeam_channel::{Receiver, Sender, tick, unbounded};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::thread;
use std::time::Duration;

/// How often the loop frees progressions returned by the audio thread
const GARBAGE_INTERVAL: Duration = Duration::from_millis(250);

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// What the loop should do after one line
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    ctx: CommandContext,
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
}

impl Repl {
    pub fn new(ctx: CommandContext) -> Result<Self> {
        let editor = DefaultEditor::new()?;
        let (tx_input, rx_input) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            registry: create_registry(),
            ctx,
            tx_input,
            rx_input,
        })
    }

    /// Execute one input line and print its outcome
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => {
                self.shutdown();
                println!("{} 🎵", "Goodbye!".bright_cyan());
                return Flow::Exit;
            }
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::NotACommand => {
                println!(
                    "{} Unknown command '{}'. Type '{}' for a list.",
                    "Error:".bright_red().bold(),
                    line,
                    "help".bright_green()
                );
            }
        }
        Flow::Continue
    }

    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "ChordWheel".bright_cyan().bold()
        );
        println!(
            "Try: {}, {}, {}",
            "key D".cyan(),
            "play ii-V-I sevenths".cyan(),
            "emotion minor 4".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::Builder::new()
            .name("repl-input".to_string())
            .spawn(move || loop {
                let prompt = format!("{} ", "chordwheel>".bright_magenta().bold());
                match editor.readline(&prompt) {
                    Ok(line) => {
                        let line = line.trim().to_string();
                        if !line.is_empty() {
                            let _ = editor.add_history_entry(&line);
                        }
                        if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = tx_input.send(ReplEvent::Input(Err(err)));
                        break;
                    }
                }
            })?;

        let ticker = tick(GARBAGE_INTERVAL);

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if self.handle_line(&line) == Flow::Exit {
                            break;
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted | ReadlineError::Eof))) => {
                        self.shutdown();
                        println!("{} 🎵", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break,
                },

                recv(ticker) -> _ => {
                    if let Some(engine) = &self.ctx.engine {
                        let freed = engine.collect_garbage();
                        if freed > 0 {
                            log::trace!("freed {} progressions", freed);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Silence everything before leaving
    fn shutdown(&mut self) {
        if let Some(engine) = &self.ctx.engine {
            if let Err(e) = engine.stop() {
                log::warn!("could not stop playback: {}", e);
            }
        }
        if let Some(midi) = &self.ctx.midi {
            if midi.is_connected() {
                if let Err(e) = midi.panic() {
                    log::warn!(target: "midi", "panic failed: {}", e);
                }
            }
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Session;
    use chordwheel_core::{Key, Realizer};

    fn repl() -> Option<Repl> {
        let ctx = CommandContext::new(Session::default(), Realizer::default());
        match Repl::new(ctx) {
            Ok(repl) => Some(repl),
            Err(e) => {
                println!("Skipping: no terminal for line editor ({})", e);
                None
            }
        }
    }

    #[test]
    fn test_handle_line_flow() {
        let Some(mut repl) = repl() else { return };
        assert_eq!(repl.handle_line(""), Flow::Continue);
        assert_eq!(repl.handle_line("key A"), Flow::Continue);
        assert_eq!(repl.context().session.key, Key::A);
        assert_eq!(repl.handle_line("nonsense"), Flow::Continue);
        assert_eq!(repl.handle_line("play ii-V-I"), Flow::Continue);
        assert_eq!(repl.handle_line("quit"), Flow::Exit);
    }
}
