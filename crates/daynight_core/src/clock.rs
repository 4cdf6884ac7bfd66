//! Wrapped time-of-day clock and the Day/Night state machine.
//!
//! The clock holds hours in `[0, 24)`, a day counter and the current
//! [`Phase`]. It knows nothing about lights or skies: [`Clock::advance`] and
//! [`Clock::set_time`] only report which [`PhaseEvent`]s happened, and the
//! owner decides how to react.

use serde::{Deserialize, Serialize};

use crate::error::{DayNightError, DayNightResult};
use crate::events::PhaseEvent;

/// Length of one in-game day in hours.
pub const HOURS_PER_DAY: f32 = 24.0;

/// Allowed range of the day start, in hours.
pub const START_DAY_RANGE: (f32, f32) = (5.0, 7.0);

/// Allowed range of the day end, in hours.
pub const END_DAY_RANGE: (f32, f32) = (16.0, 22.0);

/// Rates below this count as a frozen clock.
pub const RATE_EPSILON: f32 = 1.0e-8;

/// Hours of daylight between sunrise and sunset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: f32,
    pub end: f32,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start: 6.0,
            end: 18.0,
        }
    }
}

impl DayWindow {
    /// Build a window, rejecting bounds outside their allowed ranges.
    pub fn new(start: f32, end: f32) -> DayNightResult<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> DayNightResult<()> {
        let start_ok = (START_DAY_RANGE.0..=START_DAY_RANGE.1).contains(&self.start);
        let end_ok = (END_DAY_RANGE.0..=END_DAY_RANGE.1).contains(&self.end);
        if start_ok && end_ok && self.start < self.end {
            Ok(())
        } else {
            Err(DayNightError::InvalidDayWindow {
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Halfway between sunrise and sunset.
    pub fn midday(&self) -> f32 {
        self.start + (self.end - self.start) / 2.0
    }

    /// Halfway across the night arc. May exceed 24 when the night is
    /// centred after midnight.
    pub fn solar_midnight(&self) -> f32 {
        self.end + (HOURS_PER_DAY - (self.end - self.start)) / 2.0
    }

    /// Strictly inside the daylight hours.
    pub fn is_daytime(&self, time: f32) -> bool {
        time > self.start && time < self.end
    }
}

/// Binary Day/Night state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Day,
    Night,
}

impl Phase {
    pub fn at(time: f32, window: &DayWindow) -> Self {
        if window.is_daytime(time) {
            Phase::Day
        } else {
            Phase::Night
        }
    }

    pub fn is_day(self) -> bool {
        self == Phase::Day
    }
}

/// Preset cycle lengths in real minutes, plus a custom length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleSpeed {
    TwoMinutes,
    ThreeMinutes,
    FourMinutes,
    #[default]
    FiveMinutes,
    TenMinutes,
    Custom,
}

impl CycleSpeed {
    pub const ALL: [CycleSpeed; 6] = [
        CycleSpeed::TwoMinutes,
        CycleSpeed::ThreeMinutes,
        CycleSpeed::FourMinutes,
        CycleSpeed::FiveMinutes,
        CycleSpeed::TenMinutes,
        CycleSpeed::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CycleSpeed::TwoMinutes => "2 Minutes",
            CycleSpeed::ThreeMinutes => "3 Minutes",
            CycleSpeed::FourMinutes => "4 Minutes",
            CycleSpeed::FiveMinutes => "5 Minutes",
            CycleSpeed::TenMinutes => "10 Minutes",
            CycleSpeed::Custom => "Custom",
        }
    }
}

/// In-game hours advanced per real second.
///
/// `custom_minutes` is only read for [`CycleSpeed::Custom`]; a zero custom
/// length yields a frozen clock.
pub fn pick_rate(speed: CycleSpeed, custom_minutes: f32) -> f32 {
    match speed {
        CycleSpeed::TwoMinutes => 0.2,
        CycleSpeed::ThreeMinutes => 0.13,
        CycleSpeed::FourMinutes => 0.1,
        CycleSpeed::FiveMinutes => 0.08,
        CycleSpeed::TenMinutes => 0.04,
        CycleSpeed::Custom if custom_minutes.abs() < RATE_EPSILON => 0.0,
        CycleSpeed::Custom => 0.4 / custom_minutes,
    }
}

/// Time of day, day counter and phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    time: f32,
    day: u32,
    phase: Phase,
}

impl Clock {
    /// Create a clock whose phase is derived from `time`.
    pub fn new(time: f32, day: u32, window: &DayWindow) -> Self {
        Self {
            time,
            day,
            phase: Phase::at(time, window),
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_day(&self) -> bool {
        self.phase.is_day()
    }

    /// Force the phase, as done when day/night parameters are applied.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Re-derive the phase from the current time.
    pub fn resync_phase(&mut self, window: &DayWindow) -> Phase {
        self.phase = Phase::at(self.time, window);
        self.phase
    }

    /// Advance by `rate * delta` hours and run one transition check.
    ///
    /// A boundary counts as crossed when the new time lies within one step
    /// of it. At most one event fires per call. Passing 24 resets the time
    /// to exactly zero; the overshoot is dropped.
    pub fn advance(&mut self, rate: f32, delta: f32, window: &DayWindow) -> Option<PhaseEvent> {
        let step = rate * delta.max(0.0);
        self.time += step;

        if self.phase == Phase::Day && (self.time - window.end).abs() <= step {
            self.phase = Phase::Night;
            Some(PhaseEvent::EnteredNight)
        } else if self.phase == Phase::Night && (self.time - window.start).abs() <= step {
            self.phase = Phase::Day;
            Some(PhaseEvent::EnteredDay)
        } else if self.time > HOURS_PER_DAY {
            self.day = self.day.saturating_add(1);
            self.time = 0.0;
            Some(PhaseEvent::NewDay)
        } else {
            None
        }
    }

    /// Jump to `new_time` and return the events the jump implies, in order.
    ///
    /// A target earlier than the current time is a rollover into the next
    /// day. The phase is re-derived from the new time afterwards.
    pub fn set_time(&mut self, new_time: f32, window: &DayWindow) -> DayNightResult<Vec<PhaseEvent>> {
        if !(0.0..=HOURS_PER_DAY).contains(&new_time) {
            return Err(DayNightError::InvalidTime(new_time));
        }

        let mut events = Vec::new();
        if new_time < self.time {
            self.day = self.day.saturating_add(1);
            if self.time < window.start || new_time < window.start {
                events.push(PhaseEvent::EnteredDay);
                events.push(PhaseEvent::EnteredNight);
            } else if self.phase == Phase::Day {
                events.push(PhaseEvent::EnteredNight);
            }
        } else if new_time > window.end && self.time < window.end {
            if self.phase == Phase::Night {
                // Jumped over the whole daylight window
                events.push(PhaseEvent::EnteredDay);
            }
            events.push(PhaseEvent::EnteredNight);
        } else if new_time > window.start && self.phase == Phase::Night && new_time < window.end {
            events.push(PhaseEvent::EnteredDay);
        }

        self.time = new_time;
        self.resync_phase(window);
        Ok(events)
    }

    /// Overwrite the day counter.
    pub fn set_day(&mut self, new_day: i64) -> DayNightResult<()> {
        if new_day < 0 {
            return Err(DayNightError::InvalidDay(new_day));
        }
        self.day = u32::try_from(new_day).unwrap_or(u32::MAX);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DayWindow {
        DayWindow::default()
    }

    #[test]
    fn test_window_bounds() {
        assert!(DayWindow::new(6.0, 18.0).is_ok());
        assert!(DayWindow::new(5.0, 22.0).is_ok());
        assert!(DayWindow::new(4.9, 18.0).is_err());
        assert!(DayWindow::new(6.0, 22.5).is_err());
        assert!(DayWindow::new(7.5, 16.0).is_err());
    }

    #[test]
    fn test_midday_and_solar_midnight() {
        let w = window();
        assert_eq!(w.midday(), 12.0);
        assert_eq!(w.solar_midnight(), 24.0);

        let late = DayWindow::new(7.0, 18.0).unwrap();
        assert_eq!(late.solar_midnight(), 24.5);

        let early = DayWindow::new(5.0, 18.0).unwrap();
        assert_eq!(early.solar_midnight(), 23.5);
    }

    #[test]
    fn test_phase_boundaries_are_night() {
        let w = window();
        assert_eq!(Phase::at(6.0, &w), Phase::Night);
        assert_eq!(Phase::at(6.01, &w), Phase::Day);
        assert_eq!(Phase::at(18.0, &w), Phase::Night);
        assert_eq!(Phase::at(0.0, &w), Phase::Night);
    }

    #[test]
    fn test_pick_rate_presets_slow_down() {
        let presets = [
            CycleSpeed::TwoMinutes,
            CycleSpeed::ThreeMinutes,
            CycleSpeed::FourMinutes,
            CycleSpeed::FiveMinutes,
            CycleSpeed::TenMinutes,
        ];
        let rates: Vec<f32> = presets.iter().map(|&s| pick_rate(s, 0.4)).collect();
        assert_eq!(rates, vec![0.2, 0.13, 0.1, 0.08, 0.04]);
        assert!(rates.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_pick_rate_custom() {
        assert_eq!(pick_rate(CycleSpeed::Custom, 0.4), 1.0);
        assert_eq!(pick_rate(CycleSpeed::Custom, 2.0), 0.2);
        assert_eq!(pick_rate(CycleSpeed::Custom, 0.0), 0.0);
    }

    #[test]
    fn test_advance_moves_forward() {
        let mut clock = Clock::new(8.0, 0, &window());
        assert_eq!(clock.advance(0.1, 1.0, &window()), None);
        assert!((clock.time() - 8.1).abs() < 1e-5);
    }

    #[test]
    fn test_advance_ignores_negative_delta() {
        let mut clock = Clock::new(8.0, 0, &window());
        clock.advance(0.1, -5.0, &window());
        assert_eq!(clock.time(), 8.0);
    }

    #[test]
    fn test_day_to_night_fires_once() {
        let w = window();
        let mut clock = Clock::new(17.99, 0, &w);
        assert!(clock.is_day());

        assert_eq!(clock.advance(0.02, 1.0, &w), Some(PhaseEvent::EnteredNight));
        assert!(!clock.is_day());
        assert_eq!(clock.advance(0.02, 1.0, &w), None);
        assert_eq!(clock.advance(0.02, 1.0, &w), None);
    }

    #[test]
    fn test_night_to_day_fires_once() {
        let w = window();
        let mut clock = Clock::new(5.95, 0, &w);
        assert!(!clock.is_day());

        assert_eq!(clock.advance(0.1, 1.0, &w), Some(PhaseEvent::EnteredDay));
        assert!(clock.is_day());
        assert_eq!(clock.advance(0.1, 1.0, &w), None);
    }

    #[test]
    fn test_midnight_resets_to_zero() {
        let w = window();
        let mut clock = Clock::new(23.9, 4, &w);
        assert_eq!(clock.advance(0.2, 1.0, &w), Some(PhaseEvent::NewDay));
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.day(), 5);
        assert!(!clock.is_day());
    }

    #[test]
    fn test_zero_rate_freezes() {
        let w = window();
        let mut clock = Clock::new(12.0, 0, &w);
        for _ in 0..10 {
            assert_eq!(clock.advance(0.0, 0.03, &w), None);
        }
        assert_eq!(clock.time(), 12.0);
    }

    #[test]
    fn test_full_cycle_event_sequence() {
        let w = window();
        let mut clock = Clock::new(12.0, 0, &w);
        let mut events = Vec::new();
        for _ in 0..2000 {
            if let Some(event) = clock.advance(0.08, 1.0, &w) {
                events.push(event);
            }
        }
        // 160 hours simulated: the pattern repeats night, new day, day
        assert_eq!(events[0], PhaseEvent::EnteredNight);
        assert_eq!(events[1], PhaseEvent::NewDay);
        assert_eq!(events[2], PhaseEvent::EnteredDay);
        assert_eq!(events[3], PhaseEvent::EnteredNight);
        let days = events.iter().filter(|e| **e == PhaseEvent::NewDay).count() as u32;
        assert_eq!(clock.day(), days);
    }

    #[test]
    fn test_set_time_rejects_out_of_range() {
        let w = window();
        let mut clock = Clock::new(10.0, 3, &w);
        let before = clock;

        assert_eq!(clock.set_time(-0.1, &w), Err(DayNightError::InvalidTime(-0.1)));
        assert_eq!(clock.set_time(24.5, &w), Err(DayNightError::InvalidTime(24.5)));
        assert_eq!(clock, before);
    }

    #[test]
    fn test_set_time_accepts_bounds() {
        let w = window();
        let mut clock = Clock::new(10.0, 0, &w);
        assert!(clock.set_time(24.0, &w).is_ok());
        assert!(clock.set_time(0.0, &w).is_ok());
    }

    #[test]
    fn test_set_time_rollover_before_sunrise() {
        let w = window();
        let mut clock = Clock::new(10.0, 0, &w);
        let events = clock.set_time(5.0, &w).unwrap();

        assert_eq!(events, vec![PhaseEvent::EnteredDay, PhaseEvent::EnteredNight]);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.phase(), Phase::Night);
    }

    #[test]
    fn test_set_time_rollover_from_day() {
        let w = window();
        let mut clock = Clock::new(15.0, 0, &w);
        let events = clock.set_time(9.0, &w).unwrap();

        assert_eq!(events, vec![PhaseEvent::EnteredNight]);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.phase(), Phase::Day);
    }

    #[test]
    fn test_set_time_forward_into_night() {
        let w = window();
        let mut clock = Clock::new(12.0, 0, &w);
        let events = clock.set_time(20.0, &w).unwrap();

        assert_eq!(events, vec![PhaseEvent::EnteredNight]);
        assert_eq!(clock.day(), 0);
        assert!(!clock.is_day());
    }

    #[test]
    fn test_set_time_forward_into_day() {
        let w = window();
        let mut clock = Clock::new(2.0, 0, &w);
        let events = clock.set_time(9.0, &w).unwrap();

        assert_eq!(events, vec![PhaseEvent::EnteredDay]);
        assert!(clock.is_day());
    }

    #[test]
    fn test_set_time_forward_over_whole_day() {
        let w = window();
        let mut clock = Clock::new(2.0, 0, &w);
        let events = clock.set_time(21.0, &w).unwrap();

        assert_eq!(events, vec![PhaseEvent::EnteredDay, PhaseEvent::EnteredNight]);
        assert!(!clock.is_day());
    }

    #[test]
    fn test_set_time_forward_within_phase() {
        let w = window();
        let mut clock = Clock::new(8.0, 0, &w);
        assert!(clock.set_time(11.0, &w).unwrap().is_empty());

        let mut night = Clock::new(19.0, 0, &w);
        assert!(night.set_time(23.0, &w).unwrap().is_empty());
    }

    #[test]
    fn test_set_day() {
        let w = window();
        let mut clock = Clock::new(12.0, 2, &w);
        assert!(clock.set_day(7).is_ok());
        assert_eq!(clock.day(), 7);

        assert_eq!(clock.set_day(-1), Err(DayNightError::InvalidDay(-1)));
        assert_eq!(clock.day(), 7);
    }
}
