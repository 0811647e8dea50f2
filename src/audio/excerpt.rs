use std::time::{Duration, Instant};

use rand::Rng;

/// Random excerpt start, uniform in `[0, max(0, total - length)]`.
///
/// Files no longer than the excerpt always start at zero.
pub fn excerpt_start<R: Rng + ?Sized>(total: Duration, length: Duration, rng: &mut R) -> Duration {
    let max_start = total.saturating_sub(length);
    if max_start.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(rng.gen_range(0.0..=max_start.as_secs_f64())).min(max_start)
}

/// Deadline after which the current excerpt is stopped.
///
/// Re-arming replaces the previous deadline, so a stop scheduled for an
/// earlier excerpt can never cut a newer one short.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcerptTimer {
    deadline: Option<Instant>,
}

impl ExcerptTimer {
    pub fn arm(&mut self, now: Instant, length: Duration) {
        self.deadline = Some(now + length);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the deadline has passed; disarms itself so it fires once.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
