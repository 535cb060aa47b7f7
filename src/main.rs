pub mod app_dirs;
pub mod clock;
pub mod icon;
pub mod input;
pub mod menu;
pub mod recent;
pub mod render;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer;

use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::clock::SystemClock;
use crate::icon::DisplayMode;
use crate::menu::{Command, MenuModel};
use crate::render::{encode_png, IconFrame};
use crate::runtime::{ChannelCommandSource, Controller, FixedTicker, TrayHost, TICK_INTERVAL};
use crate::store::FileTimerStore;

/// menu-bar count-up timer with a color-banded progress disc
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// path of the persisted timer document (defaults to the app data dir)
    #[clap(short = 'd', long)]
    data_file: Option<PathBuf>,

    /// milliseconds between icon refreshes while running
    #[clap(long, default_value_t = TICK_INTERVAL.as_millis() as u64)]
    tick_ms: u64,

    /// write every rendered icon frame as a PNG to this path
    #[clap(long)]
    icon_dump: Option<PathBuf>,
}

/// Stand-in for the external tray widget: logs menu updates and optionally
/// dumps the icon to disk for inspection.
struct ConsoleHost {
    icon_dump: Option<PathBuf>,
}

impl TrayHost for ConsoleHost {
    fn set_icon(&mut self, frame: IconFrame) {
        if let Some(path) = &self.icon_dump {
            match encode_png(&frame).and_then(|png| std::fs::write(path, png)) {
                Ok(()) => tracing::debug!(path = %path.display(), "icon frame dumped"),
                Err(e) => tracing::warn!(error = %e, "failed to dump icon frame"),
            }
        }
        if let Some((text, _)) = &frame.text {
            tracing::debug!(overlay = %text, "icon updated");
        }
    }

    fn set_menu(&mut self, menu: MenuModel) {
        tracing::info!(
            toggle = menu.toggle_label,
            target = menu.target_minutes,
            buffer = %menu.buffer_preview,
            mode = %menu.display_mode,
            "menu updated"
        );
    }
}

/// Map a control line to a command. The stdin surface mirrors the tray
/// menu's action identifiers one to one. Trailing tokens are rejected,
/// except for `export`, whose argument is the rest of the line so paths
/// with spaces work.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map(|(head, rest)| (head, rest.trim()))
        .unwrap_or((line, ""));

    match head {
        "start" | "resume" | "pause" | "reset" | "quit" | "backspace" | "clear" | "apply"
            if !rest.is_empty() =>
        {
            None
        }
        "start" | "resume" => Some(Command::StartOrResume),
        "pause" => Some(Command::Pause),
        "reset" => Some(Command::Reset),
        "quit" => Some(Command::Quit),
        "backspace" => Some(Command::Backspace),
        "clear" => Some(Command::ClearBuffer),
        "apply" => Some(Command::ApplyBuffer),
        "target" => single_token(rest)?.parse().ok().map(Command::SetTarget),
        "digit" => {
            let mut chars = single_token(rest)?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Command::Digit(c)),
                _ => None,
            }
        }
        "mode" => parse_mode(single_token(rest)?).map(Command::SetDisplayMode),
        "export" if !rest.is_empty() => Some(Command::ExportCsv(PathBuf::from(rest))),
        _ => None,
    }
}

/// Exactly one whitespace-delimited argument.
fn single_token(rest: &str) -> Option<&str> {
    let mut parts = rest.split_whitespace();
    let token = parts.next()?;
    parts.next().is_none().then_some(token)
}

fn parse_mode(name: &str) -> Option<DisplayMode> {
    match name {
        "none" => Some(DisplayMode::None),
        "elapsed" => Some(DisplayMode::MinutesElapsed),
        "from" => Some(DisplayMode::MinutesFromTarget),
        "to" => Some(DisplayMode::MinutesToTarget),
        "past" => Some(DisplayMode::MinutesPastTarget),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = match &cli.data_file {
        Some(path) => FileTimerStore::with_path(path),
        None => FileTimerStore::new(),
    };
    tracing::info!(path = %store.path().display(), "using timer document");

    let (tx, source) = ChannelCommandSource::channel();

    // Control context: one line per action, EOF shuts the timer down.
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(line.trim()) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        eprintln!("unrecognized command: {}", line.trim());
                    }
                }
            }
        }
        // Dropping the sender disconnects the runner, which quits cleanly.
    });

    let host = ConsoleHost {
        icon_dump: cli.icon_dump.clone(),
    };
    let mut controller = Controller::new(SystemClock::new(), store, host);
    controller.run(source, FixedTicker::new(Duration::from_millis(cli.tick_ms.max(1))));

    Ok(())
}
