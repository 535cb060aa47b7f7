use std::fs::File;
use std::io::BufWriter;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::clock::Clock;
use crate::icon::DisplayMode;
use crate::input::TargetInput;
use crate::menu::{menu_model, Command, MenuModel};
use crate::recent::RecentTargets;
use crate::render::{IconFrame, IconRenderer};
use crate::session::SessionLog;
use crate::store::{PersistedDocument, TimerStore};
use crate::timer::{RunMode, TimerState};

/// Tick cadence while the timer runs.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Source of user commands (the control context). The runner blocks on it
/// for up to one tick interval at a time.
pub trait CommandSource: Send + 'static {
    fn recv_timeout(&self, timeout: Duration) -> Result<Command, RecvTimeoutError>;
}

/// Channel-backed command source; the sender side lives on whatever thread
/// delivers host callbacks.
pub struct ChannelCommandSource {
    rx: Receiver<Command>,
}

impl ChannelCommandSource {
    pub fn channel() -> (Sender<Command>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl CommandSource for ChannelCommandSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<Command, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Boundary to the host tray widget: it renders whatever icon and menu the
/// controller hands it.
pub trait TrayHost {
    fn set_icon(&mut self, frame: IconFrame);
    fn set_menu(&mut self, menu: MenuModel);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

/// Owns all mutable timer state and applies every transition on a single
/// loop, so renders and elapsed queries never observe a half-applied
/// update. Control threads only ever send `Command`s.
pub struct Controller<C: Clock, S: TimerStore, H: TrayHost> {
    clock: C,
    store: S,
    host: H,
    renderer: IconRenderer,
    timer: TimerState,
    log: SessionLog,
    recents: RecentTargets,
    input: TargetInput,
    display_mode: DisplayMode,
}

impl<C: Clock, S: TimerStore, H: TrayHost> Controller<C, S, H> {
    /// Load the persisted document (best-effort) and build the initial
    /// state from it.
    pub fn new(clock: C, store: S, host: H) -> Self {
        let doc = store.load();
        Self {
            clock,
            store,
            host,
            renderer: IconRenderer::new(),
            timer: TimerState::new(doc.target_minutes),
            log: SessionLog::from_records(doc.sessions),
            recents: RecentTargets::from_saved(&doc.recent_targets_minutes),
            input: TargetInput::new(),
            display_mode: doc.text_display_mode,
        }
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn recents(&self) -> &RecentTargets {
        &self.recents
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn elapsed_now(&self) -> Duration {
        self.timer.elapsed(self.clock.monotonic())
    }

    /// Block on commands, ticking once per interval, until quit or until
    /// the control surface goes away.
    pub fn run<E: CommandSource, T: Ticker>(&mut self, source: E, ticker: T) {
        self.refresh();
        loop {
            match source.recv_timeout(ticker.interval()) {
                Ok(command) => {
                    if self.handle(command) == Step::Exit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => self.on_tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    // Control surface is gone; shut down as if quit.
                    self.handle(Command::Quit);
                    break;
                }
            }
        }
    }

    /// Apply a single command. Public so hosts and tests can drive the
    /// controller without the blocking loop.
    pub fn apply(&mut self, command: Command) {
        self.handle(command);
    }

    fn handle(&mut self, command: Command) -> Step {
        match command {
            Command::StartOrResume => {
                self.timer.start(self.clock.monotonic(), self.clock.wall());
            }
            Command::Pause => {
                self.timer.pause(self.clock.monotonic());
            }
            Command::Reset => {
                self.finalize_open_session();
                self.persist();
            }
            Command::SetTarget(minutes) => {
                self.set_target(minutes);
            }
            Command::Digit(d) => {
                self.input.append(d);
            }
            Command::Backspace => {
                self.input.backspace();
            }
            Command::ClearBuffer => {
                self.input.clear();
            }
            Command::ApplyBuffer => {
                if let Some(minutes) = self.input.apply() {
                    self.set_target(minutes);
                }
            }
            Command::SetDisplayMode(mode) => {
                self.display_mode = mode;
                self.persist();
            }
            Command::ExportCsv(path) => {
                self.export_csv(&path);
            }
            Command::Quit => {
                self.finalize_open_session();
                // The exit path must flush synchronously; a failed write is
                // still only logged, there is nowhere left to catch up.
                self.persist();
                return Step::Exit;
            }
        }
        self.refresh();
        Step::Continue
    }

    fn on_tick(&mut self) {
        if self.timer.run_mode() == RunMode::Running {
            self.refresh_icon();
        }
    }

    fn set_target(&mut self, minutes: u32) {
        let applied = self.timer.set_target(minutes);
        self.recents.push(applied);
        self.persist();
    }

    fn finalize_open_session(&mut self) {
        if let Some(finished) = self
            .timer
            .reset(self.clock.monotonic(), self.clock.wall())
        {
            let record = self.log.finalize(finished);
            tracing::info!(
                id = record.id,
                elapsed = %record.elapsed_duration,
                target = record.target_minutes,
                "session recorded"
            );
        }
    }

    fn export_csv(&self, path: &std::path::Path) {
        let result = File::create(path)
            .map_err(csv::Error::from)
            .and_then(|file| self.log.export_csv(BufWriter::new(file)));
        match result {
            Ok(()) => tracing::info!(path = %path.display(), "exported session log"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "CSV export failed"),
        }
    }

    fn document(&self) -> PersistedDocument {
        PersistedDocument {
            sessions: self.log.records().to_vec(),
            recent_targets_minutes: self.recents.as_slice().to_vec(),
            target_minutes: self.timer.target_minutes(),
            text_display_mode: self.display_mode,
        }
    }

    /// Best-effort write; state keeps running in memory on failure and the
    /// next successful save catches up.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.document()) {
            tracing::warn!(error = %e, "failed to persist timer document");
        }
    }

    fn refresh_icon(&mut self) {
        let frame = self.renderer.render(
            self.timer.elapsed(self.clock.monotonic()),
            self.timer.target(),
            self.timer.is_running(),
            self.display_mode,
        );
        self.host.set_icon(frame);
    }

    fn refresh(&mut self) {
        self.refresh_icon();
        self.host.set_menu(menu_model(
            self.timer.run_mode(),
            self.timer.target_minutes(),
            &self.recents,
            &self.input,
            self.display_mode,
        ));
    }
}
