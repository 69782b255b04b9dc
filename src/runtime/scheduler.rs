//! Fixed-rate frame scheduler
//!
//! Holds at most one recurring timer. `restart` replaces the timer with a
//! new generation rather than adjusting it, so a firing delivered for an
//! old timer is recognised as stale and dropped.
//!
//! Ticks are produced whether or not the game is suspended; the frame
//! handler decides what a tick may touch.

use std::time::{Duration, Instant};

/// Handle of the armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub generation: u64,
    pub period: Duration,
    pub next_fire: Instant,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    period: Duration,
    max_catch_up: u32,
    timer: Option<Timer>,
    next_generation: u64,
}

impl FrameScheduler {
    pub fn new(period: Duration, max_catch_up: u32) -> Self {
        Self {
            period: period.max(Duration::from_micros(1)),
            max_catch_up: max_catch_up.max(1),
            timer: None,
            next_generation: 1,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<&Timer> {
        self.timer.as_ref()
    }

    /// When the host should next call [`FrameScheduler::poll`]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.next_fire)
    }

    /// Arm the recurring timer. Already armed: nothing changes.
    pub fn start(&mut self, now: Instant) {
        if self.timer.is_some() {
            return;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.timer = Some(Timer {
            generation,
            period: self.period,
            next_fire: now + self.period,
        });
        log::debug!("Frame timer armed (generation {})", generation);
    }

    /// Disarm the timer. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            log::debug!("Frame timer disarmed (generation {})", timer.generation);
        }
    }

    /// Replace the timer so its phase starts from `now`
    pub fn restart(&mut self, now: Instant) {
        self.stop();
        self.start(now);
    }

    /// Whether a host firing tagged with `generation` belongs to the live timer
    pub fn accepts(&self, generation: u64) -> bool {
        self.timer.is_some_and(|t| t.generation == generation)
    }

    /// Number of ticks due at `now`, advancing the timer past them.
    ///
    /// At most `max_catch_up` ticks are returned; a larger backlog is
    /// dropped and the phase realigned to `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(timer) = self.timer.as_mut() else {
            log::warn!("Frame timer polled while stopped");
            return 0;
        };

        let mut due = 0;
        while timer.next_fire <= now && due < self.max_catch_up {
            timer.next_fire += timer.period;
            due += 1;
        }

        if timer.next_fire <= now {
            log::debug!("Frame timer fell behind, dropping backlog");
            timer.next_fire = now + timer.period;
        }

        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(10);

    /// Poll every millisecond across `window`, summing ticks
    fn ticks_over(scheduler: &mut FrameScheduler, start: Instant, window: Duration) -> u32 {
        let steps = window.as_millis() as u32;
        (1..=steps)
            .map(|ms| scheduler.poll(start + Duration::from_millis(ms as u64)))
            .sum()
    }

    #[test]
    fn test_not_running_until_started() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + Duration::from_secs(1)), 0);

        scheduler.start(t0);
        assert!(scheduler.is_running());
        assert_eq!(scheduler.next_deadline(), Some(t0 + PERIOD));
    }

    #[test]
    fn test_fixed_rate() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        scheduler.start(t0);
        assert_eq!(ticks_over(&mut scheduler, t0, Duration::from_millis(100)), 10);
    }

    #[test]
    fn test_double_restart_single_timer() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.restart(t0);
        scheduler.restart(t0);

        assert_eq!(ticks_over(&mut scheduler, t0, Duration::from_millis(100)), 10);
    }

    #[test]
    fn test_restart_invalidates_old_generation() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        scheduler.start(t0);
        let old = scheduler.timer().map(|t| t.generation).unwrap();
        assert!(scheduler.accepts(old));

        scheduler.restart(t0 + Duration::from_millis(3));
        assert!(!scheduler.accepts(old));
        let new = scheduler.timer().map(|t| t.generation).unwrap();
        assert!(scheduler.accepts(new));
        assert_eq!(scheduler.next_deadline(), Some(t0 + Duration::from_millis(13)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        scheduler.stop();
        scheduler.start(t0);
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_start_twice_keeps_phase() {
        let mut scheduler = FrameScheduler::new(PERIOD, 8);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.start(t0 + Duration::from_millis(5));
        assert_eq!(scheduler.next_deadline(), Some(t0 + PERIOD));
    }

    #[test]
    fn test_backlog_capped() {
        let mut scheduler = FrameScheduler::new(PERIOD, 4);
        let t0 = Instant::now();
        scheduler.start(t0);

        let late = t0 + Duration::from_secs(1);
        assert_eq!(scheduler.poll(late), 4);
        assert_eq!(scheduler.next_deadline(), Some(late + PERIOD));
        assert_eq!(scheduler.poll(late), 0);
    }
}
