use std::time::{Duration, Instant};

/// Steps and wall-clock time of the current run.
#[derive(Clone, Copy, Debug)]
pub struct RunStats {
    steps: u32,
    started: Instant,
}

impl RunStats {
    pub fn start() -> Self {
        Self {
            steps: 0,
            started: Instant::now(),
        }
    }

    pub fn bump_step(&mut self) {
        self.steps += 1;
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// `mm:ss`, minutes uncapped.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
