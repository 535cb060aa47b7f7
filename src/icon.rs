use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ICON_SIZE: u32 = 64;
pub const BAND_COUNT: usize = 6;

/// What the overlay text shows, relative to elapsed time and target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[strum(serialize = "No text")]
    None,
    #[default]
    #[strum(serialize = "Minutes elapsed")]
    MinutesElapsed,
    #[strum(serialize = "Minutes from target")]
    MinutesFromTarget,
    #[strum(serialize = "Minutes to target")]
    MinutesToTarget,
    #[strum(serialize = "Minutes past target")]
    MinutesPastTarget,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::None,
        DisplayMode::MinutesElapsed,
        DisplayMode::MinutesFromTarget,
        DisplayMode::MinutesToTarget,
        DisplayMode::MinutesPastTarget,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn half_alpha(self) -> Self {
        Self {
            a: self.a / 2,
            ..self
        }
    }
}

pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
/// Placeholder for unfilled bands while paused/idle.
pub const NEUTRAL_GRAY: Rgba = Rgba::new(128, 128, 128, 255);
pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

/// Band colors bottom to top: dark purple, mauve, fuschia, red, orange,
/// yellow. Matches the original app icon artwork.
pub const PALETTE: [Rgba; BAND_COUNT] = [
    Rgba::new(0x5E, 0x46, 0xD2, 0xFF),
    Rgba::new(0x81, 0x30, 0xC2, 0xFF),
    Rgba::new(0xA5, 0x26, 0x8C, 0xFF),
    Rgba::new(0xF2, 0x26, 0x59, 0xFF),
    Rgba::new(0xFF, 0x66, 0x3F, 0xFF),
    Rgba::new(0xF2, 0xCC, 0x3F, 0xFF),
];

/// Overlay color signalling "past the target".
pub const PAST_TARGET: Rgba = PALETTE[3];

/// Number of whole `target/6` segments covered by `elapsed`.
fn completed_bands(elapsed: Duration, target: Duration) -> u64 {
    let segment_secs = (target.as_secs() / BAND_COUNT as u64).max(1);
    elapsed.as_secs() / segment_secs
}

/// Colors for the six disc bands, bottom to top.
///
/// Phase A (before the target is reached) fills bands with the palette as
/// elapsed time covers each sixth of the target; unfilled bands are
/// transparent while running and neutral gray otherwise. Phase B sweeps
/// the disc to one solid palette color per extra sixth, cycling through
/// the palette indefinitely. When not running every band is dimmed to
/// half alpha.
pub fn render_bands(elapsed: Duration, target: Duration, running: bool) -> [Rgba; BAND_COUNT] {
    let completed = completed_bands(elapsed, target);

    let mut bands = [TRANSPARENT; BAND_COUNT];
    if completed < BAND_COUNT as u64 {
        // Phase A: bottom-to-top rainbow fill.
        let placeholder = if running { TRANSPARENT } else { NEUTRAL_GRAY };
        for (i, band) in bands.iter_mut().enumerate() {
            *band = if i as u64 <= completed {
                PALETTE[i]
            } else {
                placeholder
            };
        }
    } else {
        // Phase B: sweep to the current loop's color, keeping the previous
        // loop's result above the sweep line.
        let post_steps = completed - BAND_COUNT as u64;
        let loop_index = post_steps / BAND_COUNT as u64;
        let position_in_loop = post_steps % BAND_COUNT as u64;
        let current = PALETTE[(loop_index % BAND_COUNT as u64) as usize];

        for (i, band) in bands.iter_mut().enumerate() {
            *band = if i as u64 <= position_in_loop {
                current
            } else if loop_index == 0 {
                PALETTE[i]
            } else {
                PALETTE[((loop_index - 1) % BAND_COUNT as u64) as usize]
            };
        }
    }

    if !running {
        for band in &mut bands {
            *band = band.half_alpha();
        }
    }
    bands
}

/// Overlay text and color for the given display mode, or `None` when the
/// mode shows nothing at this point in the session.
///
/// The original assigned fully transparent overlay colors in a few
/// branches; each mode here gets a single always-visible color instead,
/// with `MinutesFromTarget` switching color at the target boundary.
pub fn overlay(elapsed: Duration, target: Duration, mode: DisplayMode) -> Option<(String, Rgba)> {
    let elapsed_minutes = elapsed.as_secs() / 60;
    // Countdown rounds up so the display reads e.g. "30" the moment a
    // 30 minute target starts.
    let minutes_to_target = target.saturating_sub(elapsed).as_secs().div_ceil(60);
    let minutes_past_target = elapsed.saturating_sub(target).as_secs() / 60;

    match mode {
        DisplayMode::None => None,
        DisplayMode::MinutesElapsed => Some((elapsed_minutes.to_string(), WHITE)),
        DisplayMode::MinutesToTarget => {
            if elapsed >= target {
                None
            } else {
                Some((minutes_to_target.to_string(), WHITE))
            }
        }
        DisplayMode::MinutesPastTarget => {
            if elapsed <= target {
                None
            } else {
                Some((minutes_past_target.to_string(), PAST_TARGET))
            }
        }
        DisplayMode::MinutesFromTarget => {
            if elapsed >= target {
                Some((minutes_past_target.to_string(), PAST_TARGET))
            } else {
                Some((minutes_to_target.to_string(), WHITE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn phase_a_fills_bottom_to_top() {
        // Target 30 -> 5 minute segments.
        let bands = render_bands(mins(0), mins(30), true);
        assert_eq!(bands[0], PALETTE[0]);
        assert_eq!(bands[1..], [TRANSPARENT; 5]);

        let bands = render_bands(mins(11), mins(30), true);
        assert_eq!(bands[0], PALETTE[0]);
        assert_eq!(bands[1], PALETTE[1]);
        assert_eq!(bands[2], PALETTE[2]);
        assert_eq!(bands[3], TRANSPARENT);
    }

    #[test]
    fn phase_a_placeholder_is_gray_when_not_running() {
        let bands = render_bands(mins(5), mins(30), false);
        assert_eq!(bands[2], NEUTRAL_GRAY.half_alpha());
        // Filled bands dimmed but still colored.
        assert_eq!(bands[0], PALETTE[0].half_alpha());
    }

    #[test]
    fn phase_b_starts_at_target_exactly() {
        let target = mins(30);
        // One second shy of target: still Phase A, all six bands rainbow.
        let bands = render_bands(target - Duration::from_secs(1), target, true);
        assert_eq!(bands[5], PALETTE[5]);
        assert_eq!(bands[0], PALETTE[0]);

        // At target: completed_bands == 6, loop 0 position 0.
        let bands = render_bands(target, target, true);
        assert_eq!(bands[0], PALETTE[0]);
        assert_eq!(bands[1], PALETTE[1]);
        assert_eq!(bands[5], PALETTE[5]);
    }

    #[test]
    fn phase_b_loop_zero_sweeps_over_the_rainbow() {
        // Target 12 -> 2 minute segments; elapsed 14 -> post step 1.
        let bands = render_bands(mins(14), mins(12), true);
        assert_eq!(bands[0], PALETTE[0]);
        assert_eq!(bands[1], PALETTE[0]);
        assert_eq!(bands[2], PALETTE[2]);
        assert_eq!(bands[3], PALETTE[3]);
        assert_eq!(bands[4], PALETTE[4]);
        assert_eq!(bands[5], PALETTE[5]);
    }

    #[test]
    fn phase_b_later_loops_sweep_over_previous_solid() {
        // Target 6 -> 1 minute segments. Elapsed 13 -> completed 13,
        // post 7, loop 1 position 1: sweeping palette[1] over solid
        // palette[0].
        let bands = render_bands(mins(13), mins(6), true);
        assert_eq!(bands[0], PALETTE[1]);
        assert_eq!(bands[1], PALETTE[1]);
        assert_eq!(bands[2], PALETTE[0]);
        assert_eq!(bands[5], PALETTE[0]);
    }

    #[test]
    fn phase_b_palette_wraps_after_six_loops() {
        // Target 6, elapsed 6 + 36 minutes -> completed 42, post 36,
        // loop 6 position 0 -> current color wraps to palette[0],
        // previous loop was palette[5].
        let bands = render_bands(mins(42), mins(6), true);
        assert_eq!(bands[0], PALETTE[0]);
        assert_eq!(bands[1], PALETTE[5]);
    }

    #[test]
    fn bands_are_dimmed_when_paused_in_phase_b() {
        let bands = render_bands(mins(14), mins(12), false);
        assert_eq!(bands[0], PALETTE[0].half_alpha());
        assert_eq!(bands[5], PALETTE[5].half_alpha());
    }

    #[test]
    fn overlay_none_shows_nothing() {
        assert_eq!(overlay(mins(5), mins(30), DisplayMode::None), None);
    }

    #[test]
    fn overlay_minutes_elapsed() {
        let (text, color) = overlay(mins(7), mins(30), DisplayMode::MinutesElapsed).unwrap();
        assert_eq!(text, "7");
        assert_eq!(color, WHITE);
    }

    #[test]
    fn overlay_minutes_to_target_counts_down_and_blanks() {
        let (text, _) = overlay(mins(0), mins(30), DisplayMode::MinutesToTarget).unwrap();
        assert_eq!(text, "30");
        let (text, _) =
            overlay(mins(10) + Duration::from_secs(1), mins(30), DisplayMode::MinutesToTarget)
                .unwrap();
        assert_eq!(text, "20");
        assert_eq!(overlay(mins(30), mins(30), DisplayMode::MinutesToTarget), None);
        assert_eq!(overlay(mins(31), mins(30), DisplayMode::MinutesToTarget), None);
    }

    #[test]
    fn overlay_minutes_past_target_blank_until_exceeded() {
        assert_eq!(overlay(mins(29), mins(30), DisplayMode::MinutesPastTarget), None);
        assert_eq!(overlay(mins(30), mins(30), DisplayMode::MinutesPastTarget), None);
        let (text, color) = overlay(mins(34), mins(30), DisplayMode::MinutesPastTarget).unwrap();
        assert_eq!(text, "4");
        assert_eq!(color, PAST_TARGET);
    }

    #[test]
    fn overlay_minutes_from_target_switches_color_at_boundary() {
        let (text, color) = overlay(mins(25), mins(30), DisplayMode::MinutesFromTarget).unwrap();
        assert_eq!(text, "5");
        assert_eq!(color, WHITE);

        let (text, color) = overlay(mins(30), mins(30), DisplayMode::MinutesFromTarget).unwrap();
        assert_eq!(text, "0");
        assert_eq!(color, PAST_TARGET);

        let (text, color) = overlay(mins(33), mins(30), DisplayMode::MinutesFromTarget).unwrap();
        assert_eq!(text, "3");
        assert_eq!(color, PAST_TARGET);
    }

    #[test]
    fn display_mode_serde_uses_snake_case() {
        let json = serde_json::to_string(&DisplayMode::MinutesToTarget).unwrap();
        assert_eq!(json, "\"minutes_to_target\"");
        let mode: DisplayMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(mode, DisplayMode::None);
    }
}
