use std::sync::Arc;
use std::time::Duration;

use crate::keyboard::layout::InputMap;
use crate::session::clock::Clock;
use crate::session::input::KeyAction;
use crate::session::metrics::WpmSeries;
use crate::session::result::{ResultIdentifier, TestKind, TestResult};
use crate::session::state::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Finished,
}

/// A test in progress: the session snapshot plus its clock and per-second
/// speed samples.
#[derive(Clone, Debug)]
pub struct TestRun {
    pub identifier: ResultIdentifier,
    pub state: SessionState,
    pub clock: Clock,
    pub series: WpmSeries,
}

impl TestRun {
    pub fn new(identifier: ResultIdentifier, target: Vec<char>, input_map: Arc<InputMap>) -> Self {
        let clock = match identifier.kind {
            TestKind::Timer => Clock::countdown(Duration::from_secs(identifier.setting)),
            TestKind::WordCount | TestKind::SentenceCount => Clock::stopwatch(),
        };
        Self {
            identifier,
            state: SessionState::from_chars(target).with_input_map(input_map),
            clock,
            series: WpmSeries::default(),
        }
    }

    pub fn status(&self) -> RunStatus {
        if self.state.is_complete() || self.clock.timed_out() {
            RunStatus::Finished
        } else {
            RunStatus::Running
        }
    }

    /// Applies an editing action. The clock starts on the first rune.
    pub fn apply(&mut self, action: KeyAction) -> RunStatus {
        if self.status() == RunStatus::Finished {
            return RunStatus::Finished;
        }
        if matches!(action, KeyAction::Rune(_)) && !self.clock.is_running() {
            self.clock.start();
        }
        let state = std::mem::take(&mut self.state);
        self.state = action.apply(state);
        self.status()
    }

    pub fn tick(&mut self, dt: Duration) -> RunStatus {
        let crossed = self.clock.tick(dt);
        let minutes = self.clock.elapsed_minutes();
        for _ in 0..crossed {
            self.series.sample(&self.state, minutes);
        }
        self.status()
    }

    pub fn into_result(mut self, history: &[TestResult]) -> TestResult {
        self.clock.stop();
        TestResult::from_session(
            self.identifier,
            &self.state,
            self.clock.elapsed(),
            self.series,
            history,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: TestKind, setting: u64, text: &str) -> TestRun {
        TestRun::new(
            ResultIdentifier::new(kind, setting, "Common words"),
            text.chars().collect(),
            Arc::new(InputMap::identity()),
        )
    }

    #[test]
    fn test_clock_waits_for_first_rune() {
        let mut run = run(TestKind::WordCount, 2, "ab cd");
        run.tick(Duration::from_secs(2));
        assert_eq!(run.clock.elapsed(), Duration::ZERO);

        run.apply(KeyAction::Space);
        assert!(!run.clock.is_running());

        run.apply(KeyAction::Rune('a'));
        assert!(run.clock.is_running());
    }

    #[test]
    fn test_word_run_finishes_on_completion() {
        let mut run = run(TestKind::WordCount, 2, "ab cd");
        for action in [
            KeyAction::Rune('a'),
            KeyAction::Rune('b'),
            KeyAction::Space,
            KeyAction::Rune('c'),
        ] {
            assert_eq!(run.apply(action), RunStatus::Running);
        }
        run.tick(Duration::from_secs(3));
        assert_eq!(run.apply(KeyAction::Rune('d')), RunStatus::Finished);
        // Extra keys after completion are swallowed.
        assert_eq!(run.apply(KeyAction::Rune('x')), RunStatus::Finished);
        assert_eq!(run.state.cursor(), 5);

        let result = run.into_result(&[]);
        assert_eq!(result.elapsed_secs, 3.0);
        assert_eq!(result.wpm_each_second.len(), 4);
    }

    #[test]
    fn test_timer_run_finishes_on_timeout() {
        let mut run = run(TestKind::Timer, 15, "ab cd ef gh");
        run.apply(KeyAction::Rune('a'));
        let mut status = RunStatus::Running;
        for _ in 0..200 {
            status = run.tick(Duration::from_millis(100));
            if status == RunStatus::Finished {
                break;
            }
        }
        assert_eq!(status, RunStatus::Finished);
        assert_eq!(run.clock.elapsed(), Duration::from_secs(15));
        assert_eq!(run.series.samples().len(), 15);
    }
}
