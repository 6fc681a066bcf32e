//! Buzzer line and shared alarm state
//!
//! The physical buzzer output is shared by two tasks:
//! - the proximity monitor forces it off, or holds it on during a close
//!   range episode
//! - the alarm driver toggles it while the alarm is pulsed
//!
//! Both reach the pin through [`BuzzerLine`], which takes a critical section
//! for every access. Who may touch the line when is decided by [`ALARM`]:
//! the monitor only drives the line after publishing a mode the driver
//! leaves alone.

use core::cell::RefCell;
use core::convert::Infallible;

use alarm_core::SharedAlarm;
use embassy_rp::gpio::{Level, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::system::resources::BuzzerResources;

/// Alarm mode published by the proximity monitor, read by the alarm driver
pub static ALARM: SharedAlarm = SharedAlarm::new();

/// The buzzer output, `None` until [`init`] ran
static BUZZER: Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>> =
    Mutex::new(RefCell::new(None));

/// Configures the buzzer pin, silent.
///
/// This should only be called once during system initialization in main.rs,
/// before any tasks are spawned.
pub fn init(r: BuzzerResources) {
    let pin = Output::new(r.buzzer_pin, Level::Low);
    BUZZER.lock(|buzzer| *buzzer.borrow_mut() = Some(pin));
}

/// Runs `f` on the buzzer pin inside a critical section
fn with_pin<R>(f: impl FnOnce(&mut Output<'static>) -> R) -> Option<R> {
    BUZZER.lock(|buzzer| buzzer.borrow_mut().as_mut().map(f))
}

/// Handle to the global buzzer line.
///
/// Accesses before [`init`] are ignored.
#[derive(Clone, Copy)]
pub struct BuzzerLine;

impl ErrorType for BuzzerLine {
    type Error = Infallible;
}

impl OutputPin for BuzzerLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        with_pin(|pin| pin.set_low());
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        with_pin(|pin| pin.set_high());
        Ok(())
    }
}

impl StatefulOutputPin for BuzzerLine {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(with_pin(|pin| pin.is_set_high()).unwrap_or(false))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(with_pin(|pin| pin.is_set_low()).unwrap_or(true))
    }

    // single critical section instead of read-modify-write over two
    fn toggle(&mut self) -> Result<(), Self::Error> {
        with_pin(|pin| pin.toggle());
        Ok(())
    }
}
