//! Alarm driver
//!
//! Tick logic of the background toggler. Knows nothing about distances or
//! the lock, it only follows the published [`AlarmSnapshot`].

use embedded_hal::digital::StatefulOutputPin;

use crate::alarm::{AlarmMode, AlarmSnapshot, PulsePeriod, SharedAlarm};

/// Reader side of the shared alarm word
pub struct AlarmDriver<'a> {
    shared: &'a SharedAlarm,
}

impl<'a> AlarmDriver<'a> {
    pub fn new(shared: &'a SharedAlarm) -> Self {
        Self { shared }
    }

    /// Reload value for the next timer period, `None` while not pulsing
    pub fn reload_period(&self) -> Option<PulsePeriod> {
        self.shared.load().reload_period()
    }

    /// One timer firing: toggles the buzzer if pulsing.
    ///
    /// Returns whether the line was toggled.
    pub fn fire<P: StatefulOutputPin>(&self, buzzer: &mut P) -> Result<bool, P::Error> {
        Self::on_tick(self.shared.load(), buzzer)
    }

    /// Toggles the buzzer iff the snapshot is pulsed outside a close episode.
    pub fn on_tick<P: StatefulOutputPin>(
        snapshot: AlarmSnapshot,
        buzzer: &mut P,
    ) -> Result<bool, P::Error> {
        match snapshot.mode {
            AlarmMode::Pulsed(_) if !snapshot.close_episode_active => {
                buzzer.toggle()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
