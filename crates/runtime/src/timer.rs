use crate::clock::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Interval {
    id: TimerId,
    deadline: Millis,
    period: Millis,
}

/// Deterministic repeating-timer queue over a virtual clock.
///
/// Ordering contract:
/// - Due timers fire earliest deadline first.
/// - Equal deadlines fire in creation order (`TimerId` order).
/// - Clearing a timer never perturbs the order of the remaining ones.
///
/// Vec-backed: a tour holds one or two timers at a time.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    intervals: Vec<Interval>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer that first fires at `now + period` and then every
    /// `period` after that. A zero period is bumped to 1ms so `pop_due` always
    /// makes progress.
    pub fn set_interval(&mut self, now: Millis, period: Millis) -> TimerId {
        let period = period.max(Millis(1));
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.intervals.push(Interval {
            id,
            deadline: now + period,
            period,
        });
        id
    }

    /// Cancels `id`. Returns `true` if the timer was active; clearing an
    /// unknown or already-cleared timer is a no-op.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        self.intervals.len() != before
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.intervals.iter().map(|i| i.deadline).min()
    }

    /// Pops the next timer due at or before `now` and reschedules it one
    /// period after the deadline it fired for.
    ///
    /// Callers drain by looping until `None`; anything they clear between
    /// calls will not fire again.
    pub fn pop_due(&mut self, now: Millis) -> Option<TimerId> {
        let due = self
            .intervals
            .iter_mut()
            .filter(|i| i.deadline <= now)
            .min_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)))?;
        due.deadline = due.deadline + due.period;
        Some(due.id)
    }
}
