use std::path::PathBuf;

use crate::icon::DisplayMode;
use crate::input::TargetInput;
use crate::recent::RecentTargets;
use crate::timer::RunMode;

/// Durations always offered by the target submenu, in minutes.
pub const PRESET_MINUTES: [u32; 9] = [5, 10, 15, 20, 25, 30, 45, 60, 90];

/// Discrete action identifiers delivered by the host when the user clicks
/// a menu item. Dispatching data instead of per-item callbacks keeps the
/// menu description separate from action execution.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    StartOrResume,
    Pause,
    Reset,
    SetTarget(u32),
    Digit(char),
    Backspace,
    ClearBuffer,
    ApplyBuffer,
    SetDisplayMode(DisplayMode),
    ExportCsv(PathBuf),
    Quit,
}

/// Description of the current menu surface, consumed by the host tray
/// widget. Pure data; the host maps clicks back to `Command`s.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuModel {
    /// Label of the start/resume/pause item for the current run mode.
    pub toggle_label: &'static str,
    pub reset_enabled: bool,
    pub target_minutes: u32,
    pub recent_targets: Vec<u32>,
    pub preset_targets: &'static [u32],
    /// Digit buffer under composition, empty when nothing is typed.
    pub buffer_preview: String,
    pub display_mode: DisplayMode,
    pub display_modes: &'static [DisplayMode],
}

pub fn menu_model(
    run_mode: RunMode,
    target_minutes: u32,
    recents: &RecentTargets,
    input: &TargetInput,
    display_mode: DisplayMode,
) -> MenuModel {
    let toggle_label = match run_mode {
        RunMode::Idle => "Start",
        RunMode::Paused => "Resume",
        RunMode::Running => "Pause",
    };
    MenuModel {
        toggle_label,
        reset_enabled: run_mode != RunMode::Idle,
        target_minutes,
        recent_targets: recents.as_slice().to_vec(),
        preset_targets: &PRESET_MINUTES,
        buffer_preview: input.preview().to_string(),
        display_mode,
        display_modes: &DisplayMode::ALL,
    }
}
