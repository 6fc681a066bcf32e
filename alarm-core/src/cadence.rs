//! Measurement cadence
//!
//! Closer obstacles are sampled more often.

use crate::config::AlarmConfig;
use crate::tier::DistanceTier;

/// Delay before the next measurement cycle (ms)
pub fn next_delay_ms(tier: DistanceTier, config: &AlarmConfig) -> u32 {
    match tier {
        DistanceTier::Close => config.close_cadence_ms,
        DistanceTier::Mid => config.mid_cadence_ms,
        DistanceTier::Far => config.far_cadence_ms,
        DistanceTier::Max | DistanceTier::OutOfRange => config.idle_cadence_ms,
    }
}
