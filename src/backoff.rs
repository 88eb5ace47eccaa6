use std::time::Duration;

const BACKOFF_FACTOR: f64 = 1.5;

/// Geometric retry delays: `initial, initial × 1.5, initial × 1.5², …`.
///
/// Uncapped; a delay too large for [`Duration`] saturates at
/// [`Duration::MAX`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Backoff {
    next: Duration,
}

impl Backoff {
    pub fn new(initial: Duration) -> Self {
        Self { next: initial }
    }

    /// Delay the next call to [`Backoff::advance`] will yield.
    pub fn current(&self) -> Duration {
        self.next
    }

    /// Returns the current delay and grows the next one by 1.5.
    pub fn advance(&mut self) -> Duration {
        let delay = self.next;
        self.next = grow(delay);
        delay
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.advance())
    }
}

fn grow(delay: Duration) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * BACKOFF_FACTOR).unwrap_or(Duration::MAX)
}
