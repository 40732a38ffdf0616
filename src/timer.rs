//! Host-clock driven timers
//!
//! Stands in for the browser's `setInterval`/`setTimeout`/`clearInterval`.
//! The host reports the current time and the session pops due timers one at a
//! time, so a callback that cancels or creates timers affects everything that
//! fires after it.

/// Handle for cancelling a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Repeat {
    Once,
    Every(f64),
}

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due_ms: f64,
    repeat: Repeat,
    event: E,
}

/// Smallest allowed interval period, keeps a bad period from looping forever
pub const MIN_PERIOD_MS: f64 = 1.0;

/// Pending timers carrying an event payload of type `E`
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: f64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Copy> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<E: Copy> Scheduler<E> {
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    /// Time of the last fired timer or clock update
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn push(&mut self, delay_ms: f64, repeat: Repeat, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            repeat,
            event,
        });
        id
    }

    /// Fire `event` every `period_ms`, first after one period
    pub fn set_interval(&mut self, period_ms: f64, event: E) -> TimerId {
        let period = period_ms.max(MIN_PERIOD_MS);
        self.push(period, Repeat::Every(period), event)
    }

    /// Fire `event` once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: f64, event: E) -> TimerId {
        self.push(delay_ms.max(0.0), Repeat::Once, event)
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel everything
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Ties fire in creation order. The clock moves to the timer's due time so
    /// timers created by its handler are scheduled relative to it.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerId, E)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.0.cmp(&b.id.0)))
            .map(|(i, _)| i)?;

        let (id, event, due_ms, repeat) = {
            let t = &self.timers[idx];
            (t.id, t.event, t.due_ms, t.repeat)
        };
        let fired = (id, event);
        self.now_ms = self.now_ms.max(due_ms);
        match repeat {
            Repeat::Every(period) => self.timers[idx].due_ms += period,
            Repeat::Once => {
                self.timers.remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock forward after all due timers were handled
    pub fn settle(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}
