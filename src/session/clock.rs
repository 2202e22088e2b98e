use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockMode {
    Countdown(Duration),
    Stopwatch,
}

/// Run clock driven by ticks rather than wall time, so runs replay
/// deterministically in tests.
#[derive(Clone, Debug)]
pub struct Clock {
    mode: ClockMode,
    elapsed: Duration,
    running: bool,
}

impl Clock {
    pub fn countdown(total: Duration) -> Self {
        Self {
            mode: ClockMode::Countdown(total),
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub fn stopwatch() -> Self {
        Self {
            mode: ClockMode::Stopwatch,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }

    pub fn remaining(&self) -> Option<Duration> {
        match self.mode {
            ClockMode::Countdown(total) => Some(total.saturating_sub(self.elapsed)),
            ClockMode::Stopwatch => None,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Advances a running clock and returns how many whole-second marks
    /// were crossed. Countdowns stop at zero.
    pub fn tick(&mut self, dt: Duration) -> u64 {
        if !self.running {
            return 0;
        }
        let before = self.elapsed.as_secs();
        self.elapsed += dt;
        if let ClockMode::Countdown(total) = self.mode {
            if self.elapsed >= total {
                self.elapsed = total;
                self.running = false;
            }
        }
        self.elapsed.as_secs() - before
    }

    /// `m:ss` for the clock widget; countdowns show time left.
    pub fn view(&self) -> String {
        let shown = self.remaining().unwrap_or(self.elapsed);
        let secs = shown.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}
