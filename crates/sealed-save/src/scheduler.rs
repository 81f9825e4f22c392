//! Debounced autosave scheduling.
//!
//! The scheduler is a plain value driven by the host loop. Every
//! `mark_dirty` pushes the deadline out to `now + debounce`, so a burst of
//! mutations produces one flush timed from the last of them. `tick` is a
//! pure transition: it either reports that a flush is due (and clears the
//! dirty flag before the caller writes) or does nothing.
//!
//! A failed write is not retried. The next mutation schedules the next
//! attempt.

use std::time::{Duration, Instant};

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do.
    Idle,
    /// The quiet period has elapsed; write now.
    Flush,
}

/// Debounce state machine.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debounce: Duration,
    dirty: bool,
    deadline: Option<Instant>,
}

impl AutosaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            dirty: false,
            deadline: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the pending flush becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record a mutation at `now`, restarting the quiet period.
    ///
    /// A debounce too large to represent as an `Instant` leaves no deadline:
    /// the state stays dirty until [`take_pending`](Self::take_pending) or
    /// [`clear`](Self::clear).
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        self.deadline = now.checked_add(self.debounce);
    }

    /// Advance to `now`.
    pub fn tick(&mut self, now: Instant) -> Tick {
        match self.deadline {
            Some(deadline) if self.dirty && now >= deadline => {
                self.clear();
                Tick::Flush
            }
            _ => Tick::Idle,
        }
    }

    /// Take any pending flush regardless of the deadline.
    ///
    /// For shutdown paths. Returns whether there was anything to flush.
    pub fn take_pending(&mut self) -> bool {
        let pending = self.dirty;
        self.clear();
        pending
    }

    /// Drop any pending flush.
    pub fn clear(&mut self) {
        self.dirty = false;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Tick every `step` from `start` to `end` inclusive, recording flush times
    /// as offsets from `origin`.
    fn run(
        sched: &mut AutosaveScheduler,
        origin: Instant,
        start: u64,
        end: u64,
        step: u64,
    ) -> Vec<u64> {
        let mut flushes = Vec::new();
        let mut t = start;
        while t <= end {
            if sched.tick(origin + ms(t)) == Tick::Flush {
                flushes.push(t);
            }
            t += step;
        }
        flushes
    }

    #[test]
    fn test_idle_when_clean() {
        let mut sched = AutosaveScheduler::new(ms(1000));
        let t0 = Instant::now();
        assert_eq!(sched.tick(t0), Tick::Idle);
        assert_eq!(sched.tick(t0 + ms(10_000)), Tick::Idle);
        assert!(sched.deadline().is_none());
    }

    #[test]
    fn test_burst_coalesces_into_one_flush() {
        let mut sched = AutosaveScheduler::new(ms(1000));
        let t0 = Instant::now();

        let mut flushes = Vec::new();
        for (mark, until) in [(0, 300), (300, 600), (600, 3000)] {
            sched.mark_dirty(t0 + ms(mark));
            flushes.extend(run(&mut sched, t0, mark + 100, until, 100));
        }

        assert_eq!(flushes, vec![1600]);
    }

    #[test]
    fn test_flush_exactly_at_deadline() {
        let mut sched = AutosaveScheduler::new(ms(500));
        let t0 = Instant::now();
        sched.mark_dirty(t0);

        assert_eq!(sched.deadline(), Some(t0 + ms(500)));
        assert_eq!(sched.tick(t0 + ms(499)), Tick::Idle);
        assert_eq!(sched.tick(t0 + ms(500)), Tick::Flush);
    }

    #[test]
    fn test_flush_clears_dirty_and_does_not_repeat() {
        let mut sched = AutosaveScheduler::new(ms(100));
        let t0 = Instant::now();
        sched.mark_dirty(t0);

        assert_eq!(sched.tick(t0 + ms(100)), Tick::Flush);
        assert!(!sched.is_dirty());
        assert!(sched.deadline().is_none());
        assert_eq!(sched.tick(t0 + ms(200)), Tick::Idle);
    }

    #[test]
    fn test_mark_after_flush_schedules_again() {
        let mut sched = AutosaveScheduler::new(ms(100));
        let t0 = Instant::now();

        sched.mark_dirty(t0);
        assert_eq!(sched.tick(t0 + ms(100)), Tick::Flush);

        sched.mark_dirty(t0 + ms(150));
        assert_eq!(sched.tick(t0 + ms(200)), Tick::Idle);
        assert_eq!(sched.tick(t0 + ms(250)), Tick::Flush);
    }

    #[test]
    fn test_take_pending() {
        let mut sched = AutosaveScheduler::new(ms(1000));
        assert!(!sched.take_pending());

        sched.mark_dirty(Instant::now());
        assert!(sched.take_pending());
        assert!(!sched.is_dirty());
        assert!(!sched.take_pending());
    }

    #[test]
    fn test_unrepresentable_deadline_waits_for_take_pending() {
        let mut sched = AutosaveScheduler::new(Duration::MAX);
        let t0 = Instant::now();

        sched.mark_dirty(t0);
        sched.mark_dirty(t0 + ms(10));
        assert!(sched.is_dirty());
        assert!(sched.deadline().is_none());
        assert_eq!(sched.tick(t0 + Duration::from_secs(86_400)), Tick::Idle);

        assert!(sched.take_pending());
        assert!(!sched.is_dirty());
    }

    #[test]
    fn test_clear_drops_pending_flush() {
        let mut sched = AutosaveScheduler::new(ms(10));
        let t0 = Instant::now();
        sched.mark_dirty(t0);
        sched.clear();
        assert_eq!(sched.tick(t0 + ms(1000)), Tick::Idle);
    }

    proptest! {
        #[test]
        fn prop_one_flush_after_last_mark(
            debounce in 50u64..2000,
            gaps in prop::collection::vec(0.0f64..1.0, 1..20),
        ) {
            let mut sched = AutosaveScheduler::new(ms(debounce));
            let t0 = Instant::now();

            // Each gap is strictly shorter than the debounce interval.
            let mut marks = vec![0u64];
            for g in &gaps {
                let gap = ((debounce - 1) as f64 * g) as u64;
                marks.push(marks.last().unwrap() + gap);
            }

            let mut flushes = Vec::new();
            for (i, &mark) in marks.iter().enumerate() {
                sched.mark_dirty(t0 + ms(mark));
                let next = marks.get(i + 1).copied().unwrap_or(mark + 3 * debounce);
                for t in mark..next {
                    if sched.tick(t0 + ms(t)) == Tick::Flush {
                        flushes.push(t);
                    }
                }
            }

            let last = *marks.last().unwrap();
            prop_assert_eq!(flushes, vec![last + debounce]);
        }
    }
}
