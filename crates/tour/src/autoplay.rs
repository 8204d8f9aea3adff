use runtime::{Millis, TimerId, TimerQueue};

/// Time between automatic chapter advances.
pub const AUTOPLAY_PERIOD: Millis = Millis(3000);

/// Autoplay timer lifecycle over a virtual clock.
///
/// Holds at most one repeating timer. `start` while running replaces the old
/// timer instead of scheduling a second one, and `stop` is always safe.
#[derive(Debug, Default)]
pub struct Autoplay {
    timers: TimerQueue,
    active: Option<TimerId>,
    now: Millis,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, period: Millis) -> TimerId {
        self.stop();
        let id = self.timers.set_interval(self.now, period);
        self.active = Some(id);
        id
    }

    /// Returns `true` if a running timer was cancelled.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(id) => self.timers.clear(id),
            None => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.active.and(self.timers.next_deadline())
    }

    /// Moves the clock to `now` (never backwards) and pops one due tick.
    ///
    /// Returns `true` when the caller should run an autoplay step. Call again
    /// after each step; a step that stops autoplay ends the drain.
    pub fn pop_tick(&mut self, now: Millis) -> bool {
        self.now = self.now.max(now);
        match self.timers.pop_due(self.now) {
            Some(id) if Some(id) == self.active => true,
            Some(stale) => {
                self.timers.clear(stale);
                false
            }
            None => false,
        }
    }
}
