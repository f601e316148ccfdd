//! Loop rate measurement.

use std::time::{Duration, Instant};

/// Logs ticks per second, and how many frames had to be retried in that time.
pub struct TickCounter {
    name: String,
    ticks: u32,
    retries: u32,
    start: Instant,
}

impl TickCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            ticks: 0,
            retries: 0,
            start: Instant::now(),
        }
    }

    /// Records a frame that could not be read and will be retried.
    pub fn retry(&mut self) {
        self.retries += 1;
    }

    /// Advances the tick counter by 1 and logs the rate if one second has passed.
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.start.elapsed() > Duration::from_secs(1) {
            if self.retries == 0 {
                log::debug!("{}: {} TPS", self.name, self.ticks);
            } else {
                log::debug!(
                    "{}: {} TPS ({} retried frames)",
                    self.name,
                    self.ticks,
                    self.retries
                );
            }

            self.ticks = 0;
            self.retries = 0;
            self.start = Instant::now();
        }
    }
}
