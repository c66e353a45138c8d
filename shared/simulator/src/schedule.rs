//! Recurring invocation points for agents.
//!
//! A [`Cadence`] fires every fixed number of simulation ticks and is used for
//! the slow decision loop. A [`Deadline`] is a one-shot point in time that the
//! owner re-arms after it fires, which is how random refresh intervals and the
//! settle delay are expressed. Neither blocks: the owner checks on each tick
//! and returns if nothing is due.

/// Absorbs rounding in `tick * PHYSICS_TICK_LENGTH` so that a 5s threshold is
/// met at exactly 300 ticks.
pub const TIME_EPSILON: f64 = 1e-9;

pub fn elapsed_at_least(since: f64, now: f64, duration: f64) -> bool {
    now - since + TIME_EPSILON >= duration
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    period_ticks: u32,
    next_tick: u32,
}

impl Cadence {
    pub fn new(period_ticks: u32, first_tick: u32) -> Self {
        Self {
            period_ticks: period_ticks.max(1),
            next_tick: first_tick,
        }
    }

    pub fn from_seconds(period: f64, tick_length: f64, first_tick: u32) -> Self {
        Self::new((period / tick_length).round() as u32, first_tick)
    }

    pub fn period_ticks(&self) -> u32 {
        self.period_ticks
    }

    pub fn next_tick(&self) -> u32 {
        self.next_tick
    }

    /// Returns true at most once per period and schedules the next run.
    pub fn ready(&mut self, tick: u32) -> bool {
        if tick < self.next_tick {
            return false;
        }
        self.next_tick = tick + self.period_ticks;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Deadline {
    at: Option<f64>,
}

impl Deadline {
    /// A deadline that is already due.
    pub fn now() -> Self {
        Self { at: Some(f64::NEG_INFINITY) }
    }

    pub fn at(time: f64) -> Self {
        Self { at: Some(time) }
    }

    pub fn is_due(&self, now: f64) -> bool {
        match self.at {
            Some(at) => now + TIME_EPSILON >= at,
            None => false,
        }
    }

    pub fn rearm(&mut self, time: f64) {
        self.at = Some(time);
    }
}
