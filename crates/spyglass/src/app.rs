//! Dashboard application: wires the table, playback, chat, and assistant.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use gemini_api::{Config as GeminiConfig, GeminiClient};
use spyglass_chart::{Frame, FrameSequence};
use spyglass_config::Config;
use spyglass_core::Table;
use spyglass_data::csv::format_timestamp;
use spyglass_data::{CsvLoader, TableSource};

use crate::assistant::Assistant;
use crate::chat::{ChatRole, ChatSession};
use crate::playback::{Playback, Tick};

/// Events feeding the main loop.
enum AppEvent {
    /// A line typed by the user.
    Command(String),
    /// stdin closed.
    Eof,
}

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Play,
    Stop,
    Step,
    Seek(usize),
    Status,
    Export(String),
    Ask(String),
    Preset(usize),
    Questions,
    History,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "play" => Command::Play,
            "stop" | "pause" => Command::Stop,
            "step" => Command::Step,
            "seek" => match rest.parse::<usize>() {
                Ok(index) => Command::Seek(index),
                Err(_) => Command::Unknown(line.to_string()),
            },
            "status" => Command::Status,
            "export" => Command::Export(if rest.is_empty() {
                "frames.json".to_string()
            } else {
                rest.to_string()
            }),
            "ask" if !rest.is_empty() => Command::Ask(rest.to_string()),
            "q" => match rest.parse::<usize>() {
                Ok(n) => Command::Preset(n),
                Err(_) => Command::Unknown(line.to_string()),
            },
            "questions" => Command::Questions,
            "history" => Command::History,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// The dashboard application state.
pub struct App {
    config: Config,
    table: Table,
    playback: Playback,
    chat: ChatSession,
    assistant: Assistant,
    /// Tokio runtime for the blocking remote calls.
    runtime: tokio::runtime::Runtime,
}

impl App {
    /// Build the app: credential, dataset, assistant, playback.
    ///
    /// A missing credential or a malformed dataset is fatal here; the
    /// session never reaches the interactive loop.
    pub fn new(config: Config) -> Result<Self> {
        let mut gemini_config = GeminiConfig::from_env()
            .context("GEMINI_API_KEY not set in the environment")?
            .with_model(config.assistant.model.clone())
            .with_min_request_interval(Duration::from_millis(
                config.assistant.min_request_interval_ms,
            ));
        if let Some(url) = &config.assistant.base_url {
            gemini_config = gemini_config.with_base_url(url.clone());
        }
        let client = GeminiClient::new(gemini_config)?;

        let loader = CsvLoader::new(&config.general.data_path);
        let table = loader
            .load()
            .with_context(|| format!("loading {}", config.general.data_path.display()))?;
        log::info!(
            "Loaded {} bars from {}",
            table.len(),
            config.general.data_path.display()
        );

        let assistant = Assistant::new(client, &config.general.symbol, &table)?;
        let playback = Playback::new(table.len());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        Ok(Self {
            config,
            table,
            playback,
            chat: ChatSession::new(),
            assistant,
            runtime,
        })
    }

    /// Run the interactive loop until quit or stdin EOF.
    ///
    /// While playing, the loop waits on the command channel with the
    /// frame interval as timeout and turns each timeout into a tick;
    /// commands arriving mid-animation are handled at the next boundary.
    pub fn run(&mut self) -> Result<()> {
        let (sender, receiver) = mpsc::channel();
        spawn_stdin_reader(sender);

        self.print_welcome();

        loop {
            let event = self.next_event(&receiver);
            match event {
                Some(AppEvent::Command(line)) => {
                    if !self.handle_command(Command::parse(&line)) {
                        break;
                    }
                }
                Some(AppEvent::Eof) | None => break,
            }
        }

        Ok(())
    }

    fn next_event(&mut self, receiver: &Receiver<AppEvent>) -> Option<AppEvent> {
        if !self.playback.is_playing() {
            return receiver.recv().ok();
        }

        let frame_duration = Duration::from_millis(self.config.playback.frame_duration_ms);
        loop {
            match receiver.recv_timeout(frame_duration) {
                Ok(event) => return Some(event),
                Err(RecvTimeoutError::Timeout) => {
                    self.on_tick();
                    if !self.playback.is_playing() {
                        return receiver.recv().ok();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn on_tick(&mut self) {
        match self.playback.tick() {
            Tick::Advanced(index) => self.print_frame_line(index),
            Tick::Finished(index) => {
                self.print_frame_line(index);
                println!("animation complete");
            }
            Tick::Ignored => {}
        }
    }

    /// Returns false when the loop should exit.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Play => {
                if self.playback.start() {
                    println!("playing from frame {}", self.playback.cursor());
                }
            }
            Command::Stop => {
                if self.playback.stop() {
                    println!("paused at frame {}", self.playback.cursor());
                }
            }
            Command::Step => {
                if let Some(index) = self.playback.step() {
                    self.print_frame_line(index);
                }
            }
            Command::Seek(index) => {
                if self.playback.seek(index) {
                    self.print_frame_line(self.playback.cursor());
                } else {
                    println!("stop playback before seeking");
                }
            }
            Command::Status => self.print_frame_line(self.playback.cursor()),
            Command::Export(path) => match self.export_frames(&path) {
                Ok(count) => println!("wrote {count} frames to {path}"),
                Err(e) => println!("export failed: {e}"),
            },
            Command::Ask(question) => self.ask(&question),
            Command::Preset(n) => {
                let question = n
                    .checked_sub(1)
                    .and_then(|i| self.config.assistant.example_questions.get(i))
                    .cloned();
                match question {
                    Some(question) => self.ask(&question),
                    None => println!("no such question; see `questions`"),
                }
            }
            Command::Questions => self.print_questions(),
            Command::History => self.print_history(),
            Command::Help => print_help(),
            Command::Quit => return false,
            Command::Empty => {}
            Command::Unknown(line) => println!("unrecognized command: {line} (try `help`)"),
        }
        true
    }

    fn ask(&mut self, question: &str) {
        self.chat.push_user(question);
        println!("Analyzing...");

        let answer = self.runtime.block_on(self.assistant.answer(question));
        println!("\n{answer}\n");
        self.chat.push_assistant(answer);
    }

    /// Write the full frame sequence as JSON for an external renderer.
    fn export_frames(&self, path: &str) -> Result<usize> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);

        let frames: Vec<Frame> = FrameSequence::new(&self.table).collect();
        serde_json::to_writer(&mut writer, &frames)?;
        writer.flush()?;

        Ok(frames.len())
    }

    fn print_frame_line(&self, index: usize) {
        let frame = Frame::at(&self.table, index);
        let date = frame
            .candles
            .x
            .last()
            .map(|ts| format_timestamp(*ts))
            .unwrap_or_default();
        let close = frame.candles.close.last().copied().unwrap_or(0.0);

        println!(
            "frame {:>4}/{}  {}  close {:.2}  bands [{}{}]  markers L:{} S:{} N:{}",
            frame.index,
            self.playback.end(),
            date,
            close,
            if frame.support.is_some() { 'S' } else { '-' },
            if frame.resistance.is_some() { 'R' } else { '-' },
            frame.markers.long.len(),
            frame.markers.short.len(),
            frame.markers.neutral.len(),
        );
    }

    fn print_questions(&self) {
        println!("Example questions:");
        for (i, question) in self.config.assistant.example_questions.iter().enumerate() {
            println!("  q {}  {}", i + 1, question);
        }
    }

    fn print_history(&self) {
        if self.chat.is_empty() {
            println!("no questions asked yet");
            return;
        }
        for message in self.chat.messages() {
            match message.role {
                ChatRole::User => println!("You: {}", message.content),
                ChatRole::Assistant => println!("Bot: {}\n", message.content),
            }
        }
    }

    fn print_welcome(&self) {
        println!(
            "{} dashboard - {} bars loaded",
            self.config.general.symbol,
            self.table.len()
        );
        println!("chart: play / stop / step / seek <i> / status / export [path]");
        println!("assistant: ask <question> / q <n> / questions / history");
        println!("type `help` for details, `quit` to exit\n");
    }
}

fn print_help() {
    println!("chart view:");
    println!("  play           start the animation (resumes if paused)");
    println!("  stop           pause at the current frame");
    println!("  step           advance one frame while stopped");
    println!("  seek <i>       scrub to frame i");
    println!("  status         print the current frame");
    println!("  export [path]  write all frames as JSON (default frames.json)");
    println!("assistant view:");
    println!("  ask <text>     ask a question about the dataset");
    println!("  q <n>          ask example question n");
    println!("  questions      list the example questions");
    println!("  history        print this session's transcript");
    println!("  quit           exit");
}

fn spawn_stdin_reader(sender: Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(AppEvent::Command(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = sender.send(AppEvent::Eof);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(Command::parse("play"), Command::Play);
        assert_eq!(Command::parse(" stop "), Command::Stop);
        assert_eq!(Command::parse("pause"), Command::Stop);
        assert_eq!(Command::parse("seek 25"), Command::Seek(25));
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn test_parse_ask_keeps_question_text() {
        assert_eq!(
            Command::parse("ask What was the highest price?"),
            Command::Ask("What was the highest price?".to_string())
        );
        // A bare `ask` is not a question
        assert!(matches!(Command::parse("ask"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_preset_and_export() {
        assert_eq!(Command::parse("q 3"), Command::Preset(3));
        assert!(matches!(Command::parse("q three"), Command::Unknown(_)));
        assert_eq!(
            Command::parse("export out/frames.json"),
            Command::Export("out/frames.json".to_string())
        );
        assert_eq!(
            Command::parse("export"),
            Command::Export("frames.json".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_seek() {
        assert!(matches!(Command::parse("seek abc"), Command::Unknown(_)));
    }
}
