use crate::error::{ScoringError, ScoringResult};
use crate::goal::ClockStamp;
use crate::half::Half;
use log::debug;
use serde::Serialize;

pub const DEFAULT_HALF_DURATION_MINUTES: u32 = 20;
pub const MAX_HALF_DURATION_MINUTES: u32 = 60;

pub fn validate_half_duration(minutes: u32) -> ScoringResult<u32> {
    if (1..=MAX_HALF_DURATION_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ScoringError::InvalidDuration(minutes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClockState {
    Paused,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    HalfEnded(Half),
}

/// Countdown clock for one half at a time. The owner calls `tick` once per
/// real second; the clock itself never schedules anything.
#[derive(Debug, Clone)]
pub struct MatchClock {
    state: ClockState,
    half: Half,
    half_duration_minutes: u32,
    remaining_secs: u32,
    pending_duration: Option<u32>,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_DURATION_MINUTES)
    }
}

impl MatchClock {
    /// Out-of-range durations (e.g. from an old stored document) are clamped.
    pub fn new(half_duration_minutes: u32) -> Self {
        let minutes = half_duration_minutes.clamp(1, MAX_HALF_DURATION_MINUTES);

        MatchClock {
            state: ClockState::Paused,
            half: Half::FirstHalf,
            half_duration_minutes: minutes,
            remaining_secs: minutes * 60,
            pending_duration: None,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn half_duration_minutes(&self) -> u32 {
        self.half_duration_minutes
    }

    /// Duration that will be in force after the next reset, used for persistence.
    pub fn configured_duration_minutes(&self) -> u32 {
        self.pending_duration.unwrap_or(self.half_duration_minutes)
    }

    fn duration_secs(&self) -> u32 {
        self.half_duration_minutes * 60
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs().saturating_sub(self.remaining_secs)
    }

    pub fn start(&mut self) -> bool {
        if self.state == ClockState::Running || self.remaining_secs == 0 {
            return false;
        }

        self.state = ClockState::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state == ClockState::Paused {
            return false;
        }

        self.state = ClockState::Paused;
        true
    }

    pub fn reset(&mut self) {
        self.state = ClockState::Paused;

        if let Some(minutes) = self.pending_duration.take() {
            self.half_duration_minutes = minutes;
        }

        self.remaining_secs = self.duration_secs();
    }

    /// Changing half never carries remaining time over.
    pub fn switch_half(&mut self, half: Half) {
        self.half = half;
        self.reset();
    }

    pub fn set_half_duration(&mut self, minutes: u32) -> ScoringResult<()> {
        let minutes = validate_half_duration(minutes)?;

        match self.state {
            ClockState::Paused => {
                self.pending_duration = None;
                self.half_duration_minutes = minutes;
                self.remaining_secs = self.duration_secs();
            }
            ClockState::Running => {
                debug!("clock running, half duration {} deferred", minutes);
                self.pending_duration = Some(minutes);
            }
        }

        Ok(())
    }

    /// Reaching zero pauses the clock; a pending duration still waits for the
    /// next reset or half switch.
    pub fn tick(&mut self) -> Option<ClockEvent> {
        if self.state != ClockState::Running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.state = ClockState::Paused;
            return Some(ClockEvent::HalfEnded(self.half));
        }

        None
    }

    /// Stamp for an event recorded now. Minutes run on across halves, and a
    /// goal on the buzzer is credited to the last second of its half.
    pub fn stamp(&self) -> ClockStamp {
        let duration = self.duration_secs();
        let elapsed = self.elapsed_secs().min(duration.saturating_sub(1));

        let offset = match self.half {
            Half::FirstHalf => 0,
            Half::SecondHalf => self.half_duration_minutes,
        };

        ClockStamp {
            minute: elapsed / 60 + offset,
            second: elapsed % 60,
            half: self.half,
        }
    }

    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Restores a clock from persisted state, always paused at the start of a half.
    pub fn restore(half_duration_minutes: u32, half: Half) -> Self {
        let mut clock = MatchClock::new(half_duration_minutes);
        clock.switch_half(half);
        clock
    }
}
