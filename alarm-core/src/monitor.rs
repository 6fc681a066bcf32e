//! Measurement cycle
//!
//! Everything that happens to a timed echo before the next measurement:
//! distance estimate, alarm update, display and cadence. Display failures are
//! reported in the [`CycleReport`] and never end the cycle early.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::alarm::{AlarmStateMachine, AlarmUpdate};
use crate::cadence::next_delay_ms;
use crate::display::{show_distance, DisplaySink, ShowError};
use crate::distance::to_distance_cm;

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport<E> {
    /// Estimated distance (cm)
    pub distance_cm: f32,
    /// What the alarm state machine did with it
    pub update: AlarmUpdate,
    /// Whether the distance line reached the display
    pub display: Result<(), ShowError<E>>,
    /// Wait before the next measurement (ms)
    pub delay_ms: u32,
}

/// Runs one cycle on an echo of `ticks`.
///
/// Only a buzzer line failure is returned as an error; the cadence is still
/// valid when the display fails.
pub async fn run_cycle<P, D, S>(
    alarm: &mut AlarmStateMachine<'_>,
    ticks: u16,
    buzzer: &mut P,
    delay: &mut D,
    display: &mut S,
) -> Result<CycleReport<S::Error>, P::Error>
where
    P: OutputPin,
    D: DelayNs,
    S: DisplaySink,
{
    let distance_cm = to_distance_cm(ticks);
    let update = alarm.update(distance_cm, buzzer, delay).await?;
    let display = show_distance(display, distance_cm);
    let delay_ms = next_delay_ms(update.tier, alarm.config());

    Ok(CycleReport {
        distance_cm,
        update,
        display,
        delay_ms,
    })
}
