use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::metrics::{self, WpmSeries};
use crate::session::state::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Timer,
    WordCount,
    SentenceCount,
}

impl TestKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Timer => "Timer run",
            Self::WordCount => "Word count run",
            Self::SentenceCount => "Sentence count run",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Timer => "s",
            Self::WordCount => "words",
            Self::SentenceCount => "sentences",
        }
    }

    /// Selectable settings, longest first: seconds for timer runs, entry
    /// counts otherwise.
    pub fn choices(self) -> &'static [u64] {
        match self {
            Self::Timer => &[120, 60, 30, 15],
            Self::WordCount => &[100, 50, 25, 10],
            Self::SentenceCount => &[30, 15, 5, 1],
        }
    }

    /// How many corpus entries to sample for a run with `setting`. Timer
    /// runs draw a fixed pool large enough to outlast the clock.
    pub fn sample_count(self, setting: u64) -> usize {
        match self {
            Self::Timer => TIMER_SAMPLE_COUNT,
            Self::WordCount | Self::SentenceCount => setting as usize,
        }
    }
}

pub const TIMER_SAMPLE_COUNT: usize = 300;
pub const DEFAULT_CHOICE: usize = 2;

/// Groups results that are comparable with each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultIdentifier {
    pub kind: TestKind,
    pub setting: u64,
    pub corpus: String,
}

impl ResultIdentifier {
    pub fn new(kind: TestKind, setting: u64, corpus: impl Into<String>) -> Self {
        Self {
            kind,
            setting,
            corpus: corpus.into(),
        }
    }
}

impl fmt::Display for ResultIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.setting, self.kind.unit(), self.corpus)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub identifier: ResultIdentifier,
    pub wpm: u32,
    pub raw_wpm: u32,
    pub cpm: u32,
    pub accuracy: f64,
    pub delta_wpm: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub wpm_each_second: Vec<f64>,
}

impl TestResult {
    /// Scores a finished session. `history` holds earlier results for the
    /// same identifier, oldest first.
    pub fn from_session(
        identifier: ResultIdentifier,
        state: &SessionState,
        elapsed: Duration,
        series: WpmSeries,
        history: &[TestResult],
    ) -> Self {
        let minutes = elapsed.as_secs_f64() / 60.0;
        let wpm = metrics::normalized_wpm(state, minutes);

        Self {
            identifier,
            wpm: wpm as u32,
            raw_wpm: metrics::raw_wpm(state, minutes) as u32,
            cpm: metrics::cpm(state, minutes) as u32,
            accuracy: metrics::accuracy(state),
            delta_wpm: metrics::delta_wpm(wpm, history),
            elapsed_secs: elapsed.as_secs_f64(),
            timestamp: Utc::now(),
            wpm_each_second: series.finish(wpm),
        }
    }

    #[cfg(test)]
    pub(crate) fn empty(identifier: ResultIdentifier) -> Self {
        Self {
            identifier,
            wpm: 0,
            raw_wpm: 0,
            cpm: 0,
            accuracy: 100.0,
            delta_wpm: 0.0,
            elapsed_secs: 0.0,
            timestamp: Utc::now(),
            wpm_each_second: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_scores_completed_run() {
        let state = "hello world"
            .chars()
            .fold(SessionState::new("hello world"), |s, c| {
                if c == ' ' { s.append_space() } else { s.append_rune(c) }
            });
        let id = ResultIdentifier::new(TestKind::WordCount, 2, "Common words");
        let result = TestResult::from_session(
            id.clone(),
            &state,
            Duration::from_secs(6),
            WpmSeries::default(),
            &[],
        );

        // 11 chars => 2 words in 0.1 minutes
        assert_eq!(result.wpm, 20);
        assert_eq!(result.raw_wpm, 20);
        assert_eq!(result.cpm, 110);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.identifier, id);
        assert_eq!(result.wpm_each_second, vec![20.0]);
    }

    #[test]
    fn test_identifier_display() {
        let id = ResultIdentifier::new(TestKind::Timer, 30, "Common words");
        assert_eq!(id.to_string(), "30 s Common words");
    }

    #[test]
    fn test_result_roundtrips_through_json() {
        let result = TestResult::empty(ResultIdentifier::new(TestKind::SentenceCount, 5, "x"));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"sentence_count\""));
        let back: TestResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.identifier, result.identifier);
    }
}
