//! Distance tiers
//!
//! Splits `[0, inf)` into five contiguous tiers. A distance exactly on a
//! boundary belongs to the closer tier.

use crate::alarm::PulsePeriod;
use crate::config::AlarmConfig;

/// Classification of a distance sample, ordered from closest to furthest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceTier {
    /// `[0, close]`: continuous alarm, then lock
    Close,
    /// `(close, mid]`: fast pulsing
    Mid,
    /// `(mid, far]`: medium pulsing
    Far,
    /// `(far, max]`: slow pulsing
    Max,
    /// `> max`: silent, re-arms the alarm
    OutOfRange,
}

impl DistanceTier {
    /// Classifies a distance in centimeters.
    ///
    /// NaN compares false against every boundary and ends up out of range.
    pub fn classify(distance_cm: f32, config: &AlarmConfig) -> Self {
        if distance_cm <= config.close_cm {
            Self::Close
        } else if distance_cm <= config.mid_cm {
            Self::Mid
        } else if distance_cm <= config.far_cm {
            Self::Far
        } else if distance_cm <= config.max_cm {
            Self::Max
        } else {
            Self::OutOfRange
        }
    }

    /// Toggle period of the pulsed alarm, `None` for tiers that never pulse
    pub fn pulse_period(self, config: &AlarmConfig) -> Option<PulsePeriod> {
        match self {
            Self::Mid => Some(config.mid_period),
            Self::Far => Some(config.far_period),
            Self::Max => Some(config.max_period),
            Self::Close | Self::OutOfRange => None,
        }
    }
}
