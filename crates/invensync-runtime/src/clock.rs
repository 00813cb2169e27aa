//! Virtual-time registry of repeating timers.
//!
//! Time only moves when the owner calls [`ClockRegistry::pop_due`] or
//! [`ClockRegistry::advance_to`], so tests can step it exactly. Due ticks are
//! handed out one at a time, ordered by due time and then by registration
//! order; a timer is rescheduled only after its tick has been popped, so two
//! ticks of the same handle can never be in flight together.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("timer period must be > 0 ms")]
    ZeroPeriod,
}

/// Opaque handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// One firing of a timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickEvent<T> {
    pub handle: TimerHandle,
    /// Virtual time of this firing, in milliseconds.
    pub due_ms: u64,
    pub payload: T,
}

#[derive(Debug)]
struct Timer<T> {
    period_ms: u64,
    next_due_ms: u64,
    payload: T,
}

#[derive(Debug)]
pub struct ClockRegistry<T> {
    now_ms: u64,
    next_handle: u64,
    timers: BTreeMap<TimerHandle, Timer<T>>,
}

impl<T> Default for ClockRegistry<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_handle: 1,
            timers: BTreeMap::new(),
        }
    }
}

impl<T: Clone> ClockRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Register a timer that first fires one period from now.
    pub fn schedule(&mut self, period_ms: u64, payload: T) -> Result<TimerHandle, ClockError> {
        if period_ms == 0 {
            return Err(ClockError::ZeroPeriod);
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.insert(
            handle,
            Timer {
                period_ms,
                next_due_ms: self.now_ms.saturating_add(period_ms),
                payload,
            },
        );
        debug!(handle = handle.0, period_ms, "timer scheduled");
        Ok(handle)
    }

    /// Cancel a timer. Returns `false` if it was not active.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.timers.remove(&handle).is_some();
        if removed {
            debug!(handle = handle.0, "timer cancelled");
        }
        removed
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Number of timers still registered.
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest tick due at or before `until_ms`, moving the clock to
    /// its due time and rescheduling the timer one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TickEvent<T>> {
        let (&handle, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.next_due_ms <= until_ms)
            .min_by_key(|(h, t)| (t.next_due_ms, **h))?;
        let timer = self.timers.get_mut(&handle)?;
        let due_ms = timer.next_due_ms;
        timer.next_due_ms = due_ms.saturating_add(timer.period_ms);
        self.now_ms = self.now_ms.max(due_ms);
        Some(TickEvent {
            handle,
            due_ms,
            payload: timer.payload.clone(),
        })
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Cancel every timer, returning how many were active.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        if n > 0 {
            debug!(cancelled = n, "all timers cancelled");
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T: Clone>(clock: &mut ClockRegistry<T>, ms: u64) -> Vec<TickEvent<T>> {
        let until = clock.now_ms() + ms;
        let fired = std::iter::from_fn(|| clock.pop_due(until)).collect();
        clock.advance_to(until);
        fired
    }

    #[test]
    fn fires_at_each_period() {
        let mut clock = ClockRegistry::new();
        let h = clock.schedule(200, "move").unwrap();
        let fired = drain(&mut clock, 1_000);
        assert_eq!(fired.len(), 5);
        assert!(fired.iter().all(|e| e.handle == h && e.payload == "move"));
        let due: Vec<u64> = fired.iter().map(|e| e.due_ms).collect();
        assert_eq!(due, vec![200, 400, 600, 800, 1_000]);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn interleaves_periods_by_due_time_then_registration() {
        let mut clock = ClockRegistry::new();
        clock.schedule(3_000, 'i').unwrap();
        clock.schedule(4_000, 's').unwrap();
        clock.schedule(2_000, 'x').unwrap();
        let order: Vec<(u64, char)> = drain(&mut clock, 12_000)
            .into_iter()
            .map(|e| (e.due_ms, e.payload))
            .collect();
        assert_eq!(
            order,
            vec![
                (2_000, 'x'),
                (3_000, 'i'),
                (4_000, 's'),
                (4_000, 'x'),
                (6_000, 'i'),
                (6_000, 'x'),
                (8_000, 's'),
                (8_000, 'x'),
                (9_000, 'i'),
                (10_000, 'x'),
                (12_000, 'i'),
                (12_000, 's'),
                (12_000, 'x'),
            ]
        );
    }

    #[test]
    fn partial_advances_accumulate() {
        let mut clock = ClockRegistry::new();
        clock.schedule(3_000, ()).unwrap();
        assert!(drain(&mut clock, 2_999).is_empty());
        assert_eq!(drain(&mut clock, 1).len(), 1);
        assert!(drain(&mut clock, 2_999).is_empty());
        assert_eq!(drain(&mut clock, 1).len(), 1);
    }

    #[test]
    fn cancelled_timer_never_fires_again() {
        let mut clock = ClockRegistry::new();
        let a = clock.schedule(100, 'a').unwrap();
        let b = clock.schedule(100, 'b').unwrap();

        let first = clock.pop_due(1_000).unwrap();
        assert_eq!(first.handle, a);
        // cancel mid-advance: the rest of the window must not see `a`
        assert!(clock.cancel(a));
        let rest: Vec<TimerHandle> = std::iter::from_fn(|| clock.pop_due(1_000))
            .map(|e| e.handle)
            .collect();
        assert!(rest.iter().all(|h| *h == b));
        assert_eq!(rest.len(), 10);
        assert!(!clock.cancel(a));
        assert!(!clock.is_active(a));
        assert_eq!(clock.active(), 1);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut clock: ClockRegistry<()> = ClockRegistry::new();
        assert_eq!(clock.schedule(0, ()), Err(ClockError::ZeroPeriod));
        assert_eq!(clock.active(), 0);
    }

    #[test]
    fn schedule_is_relative_to_now() {
        let mut clock = ClockRegistry::new();
        clock.advance_to(500);
        clock.schedule(200, ()).unwrap();
        assert_eq!(clock.pop_due(10_000).unwrap().due_ms, 700);
    }

    #[test]
    fn cancel_all_leaves_nothing_behind() {
        let mut clock = ClockRegistry::new();
        for p in [200, 3_000, 4_000] {
            clock.schedule(p, ()).unwrap();
        }
        assert_eq!(clock.cancel_all(), 3);
        assert_eq!(clock.active(), 0);
        assert!(drain(&mut clock, 60_000).is_empty());
    }
}
