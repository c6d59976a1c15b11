//! Per-step countdown timers.
//!
//! Timers count down in whole seconds and are driven by explicit ticks from
//! whoever owns the clock (the CLI's interval loop, or a browser). A reload
//! resumes from the stored `remaining_secs` as-is; no attempt is made to
//! account for wall-clock time that passed while nobody was ticking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTimer {
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub running: bool,
    /// When the current (or most recent) run was started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    NotStarted,
    Running,
    Paused,
    Expired,
}

impl StepTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            started_at: None,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.remaining_secs == 0 {
            TimerStatus::Expired
        } else if self.running {
            TimerStatus::Running
        } else if self.started_at.is_none() && self.remaining_secs == self.duration_secs {
            TimerStatus::NotStarted
        } else {
            TimerStatus::Paused
        }
    }

    /// Start or resume the countdown. Returns false if nothing changed.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        match self.status() {
            TimerStatus::NotStarted | TimerStatus::Paused => {
                self.running = true;
                self.started_at = Some(now);
                true
            }
            TimerStatus::Running | TimerStatus::Expired => false,
        }
    }

    /// Returns false if the timer wasn't running.
    pub fn pause(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.duration_secs);
    }

    /// Count down by `elapsed_secs`. Returns true if the timer ran out on
    /// this tick.
    pub fn tick(&mut self, elapsed_secs: u32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(elapsed_secs);
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_lifecycle() {
        let now = Utc::now();
        let mut timer = StepTimer::new(90);
        assert_eq!(timer.status(), TimerStatus::NotStarted);

        assert!(timer.start(now));
        assert_eq!(timer.status(), TimerStatus::Running);
        assert!(!timer.start(now), "starting a running timer is a no-op");

        assert!(!timer.tick(30));
        assert_eq!(timer.remaining_secs, 60);

        assert!(timer.pause());
        assert_eq!(timer.status(), TimerStatus::Paused);
        assert!(!timer.tick(30), "paused timers don't count down");
        assert_eq!(timer.remaining_secs, 60);

        assert!(timer.start(now));
        assert!(timer.tick(75));
        assert_eq!(timer.remaining_secs, 0);
        assert_eq!(timer.status(), TimerStatus::Expired);
        assert!(!timer.running);
        assert!(!timer.start(now));
    }

    #[test]
    fn test_paused_at_full_duration_after_start_is_paused() {
        let mut timer = StepTimer::new(10);
        timer.start(Utc::now());
        timer.pause();
        assert_eq!(timer.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_reset_restores_duration() {
        let mut timer = StepTimer::new(10);
        timer.start(Utc::now());
        timer.tick(10);
        timer.reset();
        assert_eq!(timer, StepTimer::new(10));
    }
}
