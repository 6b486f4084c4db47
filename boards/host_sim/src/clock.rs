// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use kernel::hil::time::Clock;
use kernel::ErrorCode;

/// Host clock: monotonic time since the board started, wall-clock time from
/// the system.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Result<u64, ErrorCode> {
        u64::try_from(self.start.elapsed().as_millis()).map_err(|_| ErrorCode::INVAL)
    }

    fn utc_us(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_micros() as u64)
    }
}
