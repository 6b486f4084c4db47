// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

/// Device life cycle.
///
/// ```text
/// Uninitialized -> HardwareReady -> Idle <-> Active
///                                    |  ^
///                                    v  |
///                                 PoweredOff
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    HardwareReady,
    Idle,
    Active,
    PoweredOff,
}

impl Lifecycle {
    /// Whether the device has been powered on and configured.
    pub fn is_powered(self) -> bool {
        matches!(self, Lifecycle::Idle | Lifecycle::Active)
    }

    pub fn can_power_on(self) -> bool {
        matches!(
            self,
            Lifecycle::HardwareReady | Lifecycle::Idle | Lifecycle::PoweredOff
        )
    }
}
