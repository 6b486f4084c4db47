// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Sampling cadence.
//!
//! A sampling cycle begins with the first published sample after a start or
//! an interval change. From then on each tick is scheduled against the ideal
//! time `cycle_start + interval * (sample_count + 1)` rather than relative to
//! the previous tick, so lateness in one callback does not push every later
//! sample back. When the ideal time has already passed the next tick is due
//! immediately.

use kernel::ErrorCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingState {
    pub interval_ms: u32,
    pub minimum_interval_ms: u32,
    pub started: bool,
    /// The next published sample begins a new cycle.
    pub first_sample: bool,
    /// `None` if the clock failed when the cycle began.
    pub cycle_start_ms: Option<u64>,
    pub sample_count: u64,
}

impl SamplingState {
    pub fn new(minimum_interval_ms: u32) -> SamplingState {
        SamplingState {
            interval_ms: minimum_interval_ms,
            minimum_interval_ms,
            started: false,
            first_sample: true,
            cycle_start_ms: None,
            sample_count: 0,
        }
    }

    /// Forget the current cycle; the next sample begins a new one.
    pub fn restart(&mut self) {
        self.first_sample = true;
        self.cycle_start_ms = None;
        self.sample_count = 0;
    }

    pub fn begin_cycle(&mut self, now: Result<u64, ErrorCode>) {
        self.cycle_start_ms = now.ok();
        self.sample_count = 0;
    }

    /// Delay until the tick after this one.
    ///
    /// `began_cycle` says whether this tick published the first sample of a
    /// cycle; only later ticks count towards the schedule.
    pub fn next_delay(&mut self, began_cycle: bool, now: Result<u64, ErrorCode>) -> u32 {
        if self.interval_ms < self.minimum_interval_ms {
            return self.minimum_interval_ms;
        }
        let cycle_start = match self.cycle_start_ms {
            Some(start) => start,
            None => return self.interval_ms,
        };
        if !began_cycle {
            self.sample_count += 1;
        }
        match now {
            Ok(now) => drift_compensated_delay(cycle_start, self.interval_ms, self.sample_count, now),
            Err(_) => self.interval_ms,
        }
    }
}

/// Milliseconds from `now` until sample `sample_count + 1` of a cycle that
/// began at `cycle_start`, or zero if that time has passed.
pub fn drift_compensated_delay(cycle_start: u64, interval_ms: u32, sample_count: u64, now: u64) -> u32 {
    let ideal = cycle_start.saturating_add(u64::from(interval_ms).saturating_mul(sample_count + 1));
    if now > ideal {
        0
    } else {
        u32::try_from(ideal - now).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn late_ticks_catch_up_immediately() {
        assert_eq!(drift_compensated_delay(1000, 100, 3, 1550), 0);
        assert_eq!(drift_compensated_delay(1000, 100, 3, 1400), 0);
        assert_eq!(drift_compensated_delay(1000, 100, 3, 1370), 30);
    }

    #[test]
    fn cycle_start_schedules_one_interval_ahead() {
        let mut sampling = SamplingState::new(90);
        sampling.interval_ms = 100;
        sampling.begin_cycle(Ok(1000));
        assert_eq!(sampling.next_delay(true, Ok(1000)), 100);
        assert_eq!(sampling.sample_count, 0);

        // Woke up 7 ms late: the next tick is pulled in.
        assert_eq!(sampling.next_delay(false, Ok(1107)), 93);
        assert_eq!(sampling.sample_count, 1);
    }

    #[test]
    fn clock_failure_falls_back_to_fixed_interval() {
        let mut sampling = SamplingState::new(90);
        sampling.interval_ms = 250;
        sampling.begin_cycle(Err(ErrorCode::NOSUPPORT));
        assert_eq!(sampling.next_delay(true, Ok(5)), 250);

        sampling.begin_cycle(Ok(0));
        assert_eq!(sampling.next_delay(false, Err(ErrorCode::NOSUPPORT)), 250);
        assert_eq!(sampling.sample_count, 1);
    }

    #[test]
    fn short_intervals_run_at_the_minimum() {
        let mut sampling = SamplingState::new(90);
        sampling.interval_ms = 10;
        sampling.begin_cycle(Ok(0));
        assert_eq!(sampling.next_delay(false, Ok(10)), 90);
    }

    #[test]
    fn restart_resets_the_cycle() {
        let mut sampling = SamplingState::new(90);
        sampling.first_sample = false;
        sampling.begin_cycle(Ok(10));
        sampling.sample_count = 7;

        sampling.restart();
        assert!(sampling.first_sample);
        assert_eq!(sampling.sample_count, 0);
        assert_eq!(sampling.cycle_start_ms, None);
    }
}
