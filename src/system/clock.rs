//! Echo timing counter
//!
//! The echo pulse is timed with the low 16 bits of the embassy uptime
//! counter. On the RP2350 the time driver ticks at 1 MHz, which is what the
//! distance estimate in `alarm_core` is calibrated for.

use alarm_core::TickCounter;
use embassy_time::Instant;

const _: () = assert!(embassy_time::TICK_HZ == 1_000_000);

/// 1 us free running counter, wraps every 65.536 ms
pub struct UptimeTicks;

impl TickCounter for UptimeTicks {
    fn ticks(&mut self) -> u16 {
        Instant::now().as_ticks() as u16
    }
}
