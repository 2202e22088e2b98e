use crate::session::result::TestResult;
use crate::session::state::SessionState;

const CHARS_PER_WORD: usize = 5;

fn words_per_minute(word_count: usize, active_mistakes: usize, minutes: f64) -> f64 {
    if minutes <= 0.0 {
        return 0.0;
    }
    ((word_count as f64 - active_mistakes as f64) / minutes).max(0.0)
}

/// Speed in five-character words, less one word per uncorrected mistake.
pub fn normalized_wpm(state: &SessionState, minutes: f64) -> f64 {
    let words = state.input().len() / CHARS_PER_WORD;
    words_per_minute(words, state.mistakes().active_count(), minutes)
}

/// Speed in space-separated tokens of what was actually typed.
pub fn raw_wpm(state: &SessionState, minutes: f64) -> f64 {
    let tokens = state.input().iter().filter(|&&c| c == ' ').count() + 1;
    words_per_minute(tokens, state.mistakes().active_count(), minutes)
}

pub fn cpm(state: &SessionState, minutes: f64) -> f64 {
    if minutes <= 0.0 {
        return 0.0;
    }
    (state.raw_input_count() as f64 / minutes).floor()
}

/// Share of keystrokes that did not commit a mistake, 100 before the first
/// keystroke. A space that skips a word commits one mistake per skipped
/// character, so this can go negative.
pub fn accuracy(state: &SessionState) -> f64 {
    let keystrokes = state.raw_input_count();
    if keystrokes == 0 {
        return 100.0;
    }
    let raw = state.mistakes().raw_count() as f64;
    100.0 - raw * 100.0 / keystrokes as f64
}

pub fn average_wpm(history: &[TestResult]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(|r| r.wpm as f64).sum::<f64>() / history.len() as f64
}

/// Percentage change against the average of prior results for the same
/// test identifier.
pub fn delta_wpm(wpm: f64, history: &[TestResult]) -> f64 {
    let avg = average_wpm(history);
    (wpm - avg) / avg.max(1.0) * 100.0
}

/// Per-second speed samples for the results chart.
#[derive(Clone, Debug, Default)]
pub struct WpmSeries {
    samples: Vec<f64>,
}

impl WpmSeries {
    pub fn sample(&mut self, state: &SessionState, minutes: f64) {
        if minutes <= 0.0 {
            return;
        }
        self.samples.push(normalized_wpm(state, minutes));
    }

    pub fn finish(mut self, wpm: f64) -> Vec<f64> {
        self.samples.push(wpm);
        self.samples
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}
