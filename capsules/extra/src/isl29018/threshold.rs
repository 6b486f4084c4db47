// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Change thresholds deciding which samples are worth publishing.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdConfig {
    /// Minimum change relative to the previous published sample
    /// (1.0 = 100%).
    pub percent: f32,
    /// Minimum absolute change in lux.
    pub absolute_lux: f32,
}

impl ThresholdConfig {
    /// Whether `value` can be used as either threshold.
    pub fn is_valid(value: f32) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Decide whether `candidate` should be published after `previous`.
    ///
    /// The first sample of a cycle is always published. Otherwise the change
    /// must clear both thresholds. With a `previous` of zero the relative
    /// threshold is zero, so only the absolute threshold applies.
    pub fn should_publish(&self, previous: f32, candidate: f32, is_first: bool) -> bool {
        if is_first {
            return true;
        }
        let change = (candidate - previous).abs();
        change >= previous * self.percent && change >= self.absolute_lux
    }
}

#[cfg(test)]
mod test {
    use super::ThresholdConfig;

    #[test]
    fn both_thresholds_must_be_cleared() {
        let thresholds = ThresholdConfig {
            percent: 0.1,
            absolute_lux: 5.0,
        };
        assert!(!thresholds.should_publish(100.0, 108.0, false));
        assert!(thresholds.should_publish(100.0, 112.0, false));
        assert!(thresholds.should_publish(100.0, 88.0, false));
        // 10% of 20 is 2, but the absolute threshold is 5
        assert!(!thresholds.should_publish(20.0, 24.0, false));
    }

    #[test]
    fn first_sample_always_publishes() {
        let thresholds = ThresholdConfig {
            percent: 1.0,
            absolute_lux: 1000.0,
        };
        assert!(thresholds.should_publish(0.0, 0.0, true));
        assert!(!thresholds.should_publish(0.0, 0.0, false));
    }

    #[test]
    fn zero_baseline_only_checks_absolute() {
        let thresholds = ThresholdConfig {
            percent: 1.0,
            absolute_lux: 0.0,
        };
        assert!(thresholds.should_publish(0.0, 0.001, false));
        assert!(thresholds.should_publish(0.0, 0.0, false));
    }

    #[test]
    fn negative_and_non_finite_values_are_invalid() {
        assert!(ThresholdConfig::is_valid(0.0));
        assert!(ThresholdConfig::is_valid(250.0));
        assert!(!ThresholdConfig::is_valid(-0.5));
        assert!(!ThresholdConfig::is_valid(f32::NAN));
        assert!(!ThresholdConfig::is_valid(f32::INFINITY));
    }
}
