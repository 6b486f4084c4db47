// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Configuration of an ISL29018 instance.
//!
//! Configuration is a typed `const` value rather than Cargo features, so that
//! every combination is type-checked. A board takes [`Isl29018Config::DEFAULT`]
//! and overrides the fields it cares about with struct update syntax.

use super::acquisition::AcquisitionMode;

/// Full scale range, COMMAND2 bits 0-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Range {
    Lux1000 = 0,
    Lux4000 = 1,
    Lux16000 = 2,
    Lux64000 = 3,
}

impl Range {
    pub fn full_scale_lux(self) -> f32 {
        match self {
            Range::Lux1000 => 1000.0,
            Range::Lux4000 => 4000.0,
            Range::Lux16000 => 16000.0,
            Range::Lux64000 => 64000.0,
        }
    }
}

/// ADC resolution, COMMAND2 bits 2-3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Resolution {
    Adc16Bit = 0,
    Adc12Bit = 1,
    Adc8Bit = 2,
    Adc4Bit = 3,
}

impl Resolution {
    pub fn bits(self) -> u32 {
        match self {
            Resolution::Adc16Bit => 16,
            Resolution::Adc12Bit => 12,
            Resolution::Adc8Bit => 8,
            Resolution::Adc4Bit => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Isl29018Config {
    pub range: Range,
    pub resolution: Resolution,

    /// Shortest sampling interval the device supports, in milliseconds. Also
    /// the initial data interval and the delay before the first sample of a
    /// cycle.
    pub minimum_interval_ms: u32,

    /// Initial relative change threshold (1.0 = 100%).
    pub initial_threshold_pct: f32,

    /// Initial absolute change threshold in lux.
    pub initial_threshold_abs: f32,

    pub acquisition: AcquisitionMode,
}

impl Isl29018Config {
    pub const DEFAULT: Isl29018Config = Isl29018Config {
        range: Range::Lux4000,
        resolution: Resolution::Adc16Bit,
        minimum_interval_ms: 90,
        initial_threshold_pct: 1.0,
        initial_threshold_abs: 0.0,
        acquisition: AcquisitionMode::Polling,
    };

    /// Lux represented by one ADC count.
    pub fn lux_per_count(&self) -> f32 {
        self.range.full_scale_lux() / (1u32 << self.resolution.bits()) as f32
    }
}

impl Default for Isl29018Config {
    fn default() -> Self {
        Isl29018Config::DEFAULT
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_resolution_matches_full_scale() {
        assert_eq!(Isl29018Config::DEFAULT.lux_per_count(), 4000.0 / 65536.0);

        let coarse = Isl29018Config {
            range: Range::Lux64000,
            resolution: Resolution::Adc4Bit,
            ..Isl29018Config::DEFAULT
        };
        assert_eq!(coarse.lux_per_count(), 4000.0);
    }
}
