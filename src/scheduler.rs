use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Interval {
    id: TimerId,
    period_ms: f64,
    next_due_ms: f64,
}

/// Recurring timers driven by an external monotonic millisecond clock.
///
/// Time only moves when `advance_to` is called, which keeps every timer
/// deterministic under test.
#[derive(Debug, Default)]
pub struct Timers {
    now_ms: f64,
    next_id: u64,
    intervals: Vec<Interval>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn active(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.intervals.iter().any(|i| i.id == id)
    }

    /// First fires one full period from now.
    pub fn set_interval(&mut self, period_ms: f64) -> Result<TimerId> {
        if !(period_ms > 0.0) || !period_ms.is_finite() {
            return Err(Error::InvalidTimer(period_ms));
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        tracing::debug!(?id, period_ms, "timer set");
        Ok(id)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        let removed = self.intervals.len() != before;
        if removed {
            tracing::debug!(?id, "timer cancelled");
        }
        removed
    }

    /// Move the clock to `now_ms` and return the timers that came due, in
    /// the order they were created. A timer that fell several periods
    /// behind fires once and skips the missed beats.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<TimerId> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        let now = self.now_ms;

        let mut fired = Vec::new();
        for interval in &mut self.intervals {
            if interval.next_due_ms > now {
                continue;
            }
            fired.push(interval.id);
            let behind = ((now - interval.next_due_ms) / interval.period_ms).floor();
            interval.next_due_ms += (behind + 1.0) * interval.period_ms;
        }
        fired
    }
}
