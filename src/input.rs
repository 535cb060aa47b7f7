use crate::timer::clamp_target_minutes;

const MAX_DIGITS: usize = 2;

/// Digit buffer for composing a 1-99 minute target from discrete keypress
/// events. Transient UI-adjacent state, not part of the timer itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetInput {
    buffer: String,
}

impl TargetInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit. Rejected when the buffer is full or when the digit
    /// would be a leading zero. Returns whether the digit was accepted.
    pub fn append(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.buffer.len() >= MAX_DIGITS {
            return false;
        }
        if self.buffer.is_empty() && digit == '0' {
            return false;
        }
        self.buffer.push(digit);
        true
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn preview(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Parse and clamp the buffered value, clearing the buffer whether or
    /// not the caller goes on to apply it. Empty buffer is a no-op.
    pub fn apply(&mut self) -> Option<u32> {
        let text = std::mem::take(&mut self.buffer);
        let minutes = text.parse::<u32>().ok()?;
        Some(clamp_target_minutes(minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_is_rejected() {
        let mut input = TargetInput::new();
        assert!(!input.append('0'));
        assert!(input.is_empty());
    }

    #[test]
    fn zero_is_allowed_after_a_digit() {
        let mut input = TargetInput::new();
        assert!(input.append('3'));
        assert!(input.append('0'));
        assert_eq!(input.preview(), "30");
    }

    #[test]
    fn third_digit_is_rejected() {
        let mut input = TargetInput::new();
        input.append('1');
        input.append('2');
        assert!(!input.append('3'));
        assert_eq!(input.preview(), "12");
    }

    #[test]
    fn non_digits_are_rejected() {
        let mut input = TargetInput::new();
        assert!(!input.append('x'));
        assert!(input.is_empty());
    }

    #[test]
    fn backspace_removes_last_digit() {
        let mut input = TargetInput::new();
        input.append('4');
        input.append('5');
        input.backspace();
        assert_eq!(input.preview(), "4");
        input.backspace();
        input.backspace();
        assert!(input.is_empty());
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut input = TargetInput::new();
        input.append('7');
        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn apply_parses_and_clears() {
        let mut input = TargetInput::new();
        input.append('3');
        input.append('0');
        assert_eq!(input.apply(), Some(30));
        assert!(input.is_empty());
    }

    #[test]
    fn apply_on_empty_buffer_is_a_no_op() {
        let mut input = TargetInput::new();
        assert_eq!(input.apply(), None);
    }
}
