//! Proximity monitor
//!
//! The measurement loop of the alarm. Every cycle it
//! 1. triggers the HC-SR04 and times the echo
//! 2. converts the pulse width to centimeters
//! 3. feeds the alarm state machine, which updates the alarm driver's mode
//!    or, on entering close range, holds the buzzer on for 2.5s
//! 4. shows the distance on the display, if it came up at start
//! 5. waits a tier dependent cadence before measuring again
//!
//! # Sensor Operation
//! - Blocking trigger and echo polling, timed with the 1 MHz uptime counter
//! - Each edge wait gives up after 60000 ticks (60ms); a timed out reading
//!   lands far out of range and silences the alarm
//!
//! # Tiers
//! | Tier       | Distance    | Alarm                         | Cadence |
//! |------------|-------------|-------------------------------|---------|
//! | Close      | 0 - 3cm     | continuous 2.5s, then lock    | 50ms    |
//! | Mid        | 3 - 5cm     | pulsed ~1ms                   | 150ms   |
//! | Far        | 5 - 8cm     | pulsed ~2.5ms                 | 300ms   |
//! | Max        | 8 - 11cm    | pulsed ~3.75ms                | 500ms   |
//! | OutOfRange | above 11cm  | off, lock released            | 500ms   |
//!
//! While locked every tier is silent.

use alarm_core::{
    run_cycle, AlarmConfig, AlarmStateMachine, DistanceTier, EchoReading, EchoSampler, ShowError,
};
use defmt::{info, warn, Debug2Format};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Timer};

use crate::system::buzzer::{self, BuzzerLine};
use crate::system::clock::UptimeTicks;
use crate::system::display::OledSink;
use crate::system::resources::{DisplayResources, EchoSensorResources};

/// Distance boundaries, alarm timings and cadence
pub const CONFIG: AlarmConfig = AlarmConfig::DEFAULT;

const _: () = assert!(CONFIG.is_valid());

/// Measurement loop driving the alarm state machine
#[embassy_executor::task]
pub async fn proximity_monitor(sensor: EchoSensorResources, display: DisplayResources) {
    info!("Proximity monitor started");

    let trigger = Output::new(sensor.trigger_pin, Level::Low);
    let echo = Input::new(sensor.echo_pin, Pull::None);
    let mut sampler = EchoSampler::new(trigger, echo, Delay, UptimeTicks, CONFIG.echo_tick_budget);

    // the alarm works without the display, so a missing one is not fatal
    let mut display = match OledSink::new(display) {
        Ok(sink) => Some(sink),
        Err(e) => {
            warn!("Display init failed, running without it: {}", Debug2Format(&e));
            None
        }
    };
    let mut alarm = AlarmStateMachine::new(CONFIG, &buzzer::ALARM);
    let mut line = BuzzerLine;
    let mut delay = Delay;
    let mut last_tier: Option<DistanceTier> = None;

    loop {
        // Measure; any failure counts as a full timeout, which keeps the alarm silent
        let ticks = match sampler.measure() {
            Ok(EchoReading::Pulse { ticks }) => ticks,
            Ok(EchoReading::TimedOut { ticks }) => {
                warn!("Echo timed out after {} ticks", ticks);
                ticks
            }
            Err(_) => {
                warn!("Echo sensor pin fault");
                u16::MAX
            }
        };

        let report =
            match run_cycle(&mut alarm, ticks, &mut line, &mut delay, &mut display).await {
                Ok(report) => report,
                Err(e) => match e {},
            };
        let update = report.update;

        if last_tier != Some(update.tier) {
            info!(
                "Distance {} cm: tier {}, alarm {}",
                report.distance_cm, update.tier, update.mode
            );
            last_tier = Some(update.tier);
        }
        if update.close_episode {
            info!("Close range alarm held for {} ms, locked", CONFIG.continuous_ms);
        }

        match report.display {
            Ok(()) => {}
            Err(ShowError::Format) => warn!("Distance line does not fit"),
            Err(ShowError::Sink(e)) => warn!("Display update failed: {}", Debug2Format(&e)),
        }

        // Wait for the next measurement, closer obstacles are sampled more often
        Timer::after_millis(u64::from(report.delay_ms)).await;
    }
}
