//! Alarm configuration
//!
//! All values are fixed at build time. The firmware uses [`AlarmConfig::DEFAULT`],
//! tests build their own variants where a different shape helps.

use crate::alarm::PulsePeriod;

/// Distance boundaries, alarm timings and measurement cadence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    /// Upper bound of the close tier (cm)
    pub close_cm: f32,
    /// Upper bound of the mid tier (cm)
    pub mid_cm: f32,
    /// Upper bound of the far tier (cm)
    pub far_cm: f32,
    /// Upper bound of the max tier (cm), beyond it the alarm re-arms
    pub max_cm: f32,
    /// Length of the continuous close range alarm (ms)
    pub continuous_ms: u32,
    /// Toggle period in the mid tier
    pub mid_period: PulsePeriod,
    /// Toggle period in the far tier
    pub far_period: PulsePeriod,
    /// Toggle period in the max tier
    pub max_period: PulsePeriod,
    /// Wait before the next measurement after a close reading (ms)
    pub close_cadence_ms: u32,
    /// Wait before the next measurement after a mid reading (ms)
    pub mid_cadence_ms: u32,
    /// Wait before the next measurement after a far reading (ms)
    pub far_cadence_ms: u32,
    /// Wait before the next measurement after anything further away (ms)
    pub idle_cadence_ms: u32,
    /// Longest wait for a single echo edge, in tick counter ticks
    pub echo_tick_budget: u16,
}

impl AlarmConfig {
    pub const DEFAULT: Self = Self {
        close_cm: 3.0,
        mid_cm: 5.0,
        far_cm: 8.0,
        max_cm: 11.0,
        continuous_ms: 2_500,
        // 2 MHz buzzer timer: ~1ms, ~2.5ms and ~3.75ms
        mid_period: PulsePeriod::from_ticks(2_000),
        far_period: PulsePeriod::from_ticks(5_000),
        max_period: PulsePeriod::from_ticks(7_500),
        close_cadence_ms: 50,
        mid_cadence_ms: 150,
        far_cadence_ms: 300,
        idle_cadence_ms: 500,
        echo_tick_budget: 60_000,
    };

    /// Checks that the tiers are ordered and closer tiers pulse faster
    pub const fn is_valid(&self) -> bool {
        0.0 < self.close_cm
            && self.close_cm < self.mid_cm
            && self.mid_cm < self.far_cm
            && self.far_cm < self.max_cm
            && self.mid_period.ticks() < self.far_period.ticks()
            && self.far_period.ticks() < self.max_period.ticks()
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const _: () = assert!(AlarmConfig::DEFAULT.is_valid());

    #[test]
    fn default_is_valid() {
        assert!(AlarmConfig::DEFAULT.is_valid());
        assert_eq!(AlarmConfig::default(), AlarmConfig::DEFAULT);
    }

    #[test]
    fn overlapping_boundaries_are_rejected() {
        let config = AlarmConfig {
            far_cm: 4.0,
            ..AlarmConfig::DEFAULT
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn slower_pulse_for_closer_tier_is_rejected() {
        let config = AlarmConfig {
            mid_period: PulsePeriod::from_ticks(9_000),
            ..AlarmConfig::DEFAULT
        };
        assert!(!config.is_valid());
    }
}
