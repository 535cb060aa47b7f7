use crate::timer::clamp_target_minutes;

/// Maximum entries kept in the most-recently-used list.
pub const RECENT_CAP: usize = 5;

/// MRU list of distinct recent target values, front = most recent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentTargets {
    minutes: Vec<u32>,
}

impl RecentTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted values, dropping out-of-range entries and
    /// duplicates so a corrupt document cannot grow the list.
    pub fn from_saved(values: &[u32]) -> Self {
        let mut list = Self::new();
        for &value in values.iter().rev() {
            if (1..=99).contains(&value) {
                list.push(value);
            }
        }
        list
    }

    /// Move `minutes` to the front, removing a prior occurrence first.
    pub fn push(&mut self, minutes: u32) {
        let minutes = clamp_target_minutes(minutes);
        self.minutes.retain(|&m| m != minutes);
        self.minutes.insert(0, minutes);
        self.minutes.truncate(RECENT_CAP);
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.minutes
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}
