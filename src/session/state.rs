use std::sync::Arc;

use crate::keyboard::layout::InputMap;
use crate::session::mistakes::Mistakes;

/// One snapshot of a typing run. Transitions consume the snapshot and
/// return the next one; the target text is shared between snapshots.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    target: Arc<[char]>,
    input: Vec<char>,
    mistakes: Mistakes,
    raw_input_count: usize,
    cursor: usize,
    input_map: Arc<InputMap>,
}

impl SessionState {
    pub fn new(text: &str) -> Self {
        Self::from_chars(text.chars().collect())
    }

    pub fn from_chars(target: Vec<char>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_input_map(mut self, input_map: Arc<InputMap>) -> Self {
        self.input_map = input_map;
        self
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn mistakes(&self) -> &Mistakes {
        &self.mistakes
    }

    pub fn raw_input_count(&self) -> usize {
        self.raw_input_count
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.input.len() == self.target.len()
    }

    pub fn append_rune(mut self, ch: char) -> Self {
        debug_assert!(!self.is_complete(), "append_rune on a completed session");
        if self.is_complete() {
            return self;
        }

        let ch = self.input_map.remap(ch);
        let idx = self.input.len();
        self.input.push(ch);
        self.raw_input_count += 1;
        if self.target[idx] != ch {
            self.mistakes.record(idx);
        }
        self.cursor = self.input.len();
        self
    }

    /// Space jumps to the start of the next word, flagging every skipped
    /// character as a mistake.
    pub fn append_space(mut self) -> Self {
        debug_assert!(!self.is_complete(), "append_space on a completed session");
        if self.is_complete() || self.input.is_empty() || self.target[self.cursor - 1] == ' ' {
            return self;
        }

        let stop = self.target[self.cursor..]
            .iter()
            .position(|&c| c == ' ')
            .map_or(self.target.len() - 1, |offset| self.cursor + offset);

        for idx in self.cursor..=stop {
            if self.target[idx] != ' ' {
                self.mistakes.record(idx);
            }
        }
        let skipped = stop - self.cursor + 1;
        self.input.extend(std::iter::repeat_n(' ', skipped));
        self.raw_input_count += 1;
        self.cursor = self.input.len();
        self
    }

    pub fn backspace(mut self) -> Self {
        if self.input.pop().is_some() {
            self.mistakes.clear_at(self.input.len());
        }
        self.cursor = self.input.len();
        self
    }

    /// Erases back to just after the last word boundary before the cursor.
    pub fn delete_word(mut self) -> Self {
        let scan_end = self.cursor.saturating_sub(1);
        let boundary = self.target[..scan_end]
            .iter()
            .rposition(|&c| c == ' ')
            .unwrap_or(0);
        let keep = if boundary == 0 { 0 } else { boundary + 1 };

        self.input.truncate(keep);
        self.mistakes.retain_below(self.input.len());
        self.cursor = self.input.len();
        self
    }
}
