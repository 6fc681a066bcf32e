//! Alarm driver task
//!
//! Background toggler for the pulsed alarm. Runs on the high priority
//! interrupt executor, so it keeps its rhythm while the proximity monitor
//! busy-waits on the echo line.
//!
//! # Timing
//! - Each firing waits one reload period, then toggles if still pulsed
//! - The reload is re-read from the shared alarm word before every wait,
//!   so a tier change takes effect after at most one old period
//! - While not pulsed the task idles at a fixed 1ms rate

use alarm_core::AlarmDriver;
use defmt::info;
use embassy_time::{Duration, Timer};

use crate::system::buzzer::{self, BuzzerLine};

/// Firing period while the alarm is not pulsed
const IDLE_PERIOD: Duration = Duration::from_millis(1);

/// Toggles the buzzer at the published pulse period
#[embassy_executor::task]
pub async fn alarm_driver() {
    info!("Alarm driver started");
    let driver = AlarmDriver::new(&buzzer::ALARM);
    let mut line = BuzzerLine;

    loop {
        let reload = driver
            .reload_period()
            .map_or(IDLE_PERIOD, |period| Duration::from_micros(period.as_micros()));
        Timer::after(reload).await;

        match driver.fire(&mut line) {
            Ok(_) => {}
            Err(e) => match e {},
        }
    }
}
