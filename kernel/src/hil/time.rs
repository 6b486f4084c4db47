// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Hardware agnostic interfaces for one-shot timers and clocks.

use crate::ErrorCode;

/// A one-shot timer that calls back into a sensor driver.
///
/// The board decides what the callback is; for sensor capsules it is the
/// driver's `timer_expired` entry point. At most one expiry is pending at a
/// time: arming an armed timer replaces the pending expiry.
pub trait Timer: Send + Sync {
    /// Schedule one expiry `delay_ms` milliseconds from now. A delay of zero
    /// expires as soon as possible.
    fn arm(&self, delay_ms: u32);

    /// Cancel any pending expiry.
    ///
    /// With `wait_for_callback` set, this does not return while an expiry
    /// callback is running. Callers must not hold a lock the callback takes.
    fn disarm(&self, wait_for_callback: bool);

    /// Undo any change the timer made to the system timer resolution in
    /// order to honour short delays.
    fn restore_resolution(&self) -> Result<(), ErrorCode> {
        Ok(())
    }
}

/// Source of time for sample scheduling and timestamps.
pub trait Clock: Send + Sync {
    /// Monotonic time in milliseconds since an arbitrary origin.
    fn now_ms(&self) -> Result<u64, ErrorCode>;

    /// Wall-clock time in microseconds since the Unix epoch, used to stamp
    /// published samples.
    fn utc_us(&self) -> u64;
}
