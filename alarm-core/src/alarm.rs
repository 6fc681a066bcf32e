//! Alarm state machine
//!
//! Maps every distance sample onto the alarm behavior, with a lock that keeps
//! the continuous close range alarm from re-triggering while the obstacle
//! stays near.
//!
//! # Transition order per sample
//! 1. Beyond the max boundary: clear lock and trigger (re-arm)
//! 2. Close tier, not triggered, not locked: continuous alarm for a fixed
//!    time, then lock
//! 3. Mid/far/max tier, not locked: pulsed alarm at the tier's period
//! 4. Anything else: alarm off, buzzer forced low right away
//!
//! # Sharing with the alarm driver
//! The state machine is the only writer of [`SharedAlarm`]. It always
//! publishes a mode away from `Pulsed` before it drives the buzzer line
//! itself, so the driver never toggles a line the state machine is holding.

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::AlarmConfig;
use crate::tier::DistanceTier;

/// Toggle period of the pulsed alarm, in ticks of the buzzer timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsePeriod(u16);

impl PulsePeriod {
    /// Buzzer timer tick rate
    pub const TICK_HZ: u32 = 2_000_000;

    pub const fn from_ticks(ticks: u16) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u16 {
        self.0
    }

    pub const fn as_micros(self) -> u64 {
        self.0 as u64 * 1_000_000 / Self::TICK_HZ as u64
    }
}

/// What the buzzer should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    /// Silent
    #[default]
    Off,
    /// Toggled by the alarm driver every period
    Pulsed(PulsePeriod),
    /// Held on by the state machine itself, the driver keeps off the line
    Continuous,
}

/// The part of the alarm state the driver gets to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSnapshot {
    pub mode: AlarmMode,
    pub close_episode_active: bool,
}

// Word layout: bits 0-1 mode tag, bit 2 close episode, bits 16-31 period
const TAG_MASK: u32 = 0b11;
const TAG_OFF: u32 = 0;
const TAG_PULSED: u32 = 1;
const TAG_CONTINUOUS: u32 = 2;
const EPISODE_BIT: u32 = 1 << 2;
const PERIOD_SHIFT: u32 = 16;

impl AlarmSnapshot {
    pub const IDLE: Self = Self {
        mode: AlarmMode::Off,
        close_episode_active: false,
    };

    /// Reload value for the driver's next firing, `None` while not pulsing
    pub fn reload_period(self) -> Option<PulsePeriod> {
        match self.mode {
            AlarmMode::Pulsed(period) => Some(period),
            AlarmMode::Off | AlarmMode::Continuous => None,
        }
    }

    fn to_word(self) -> u32 {
        let (tag, period) = match self.mode {
            AlarmMode::Off => (TAG_OFF, 0),
            AlarmMode::Pulsed(period) => (TAG_PULSED, period.ticks()),
            AlarmMode::Continuous => (TAG_CONTINUOUS, 0),
        };
        let episode = if self.close_episode_active {
            EPISODE_BIT
        } else {
            0
        };
        tag | episode | (u32::from(period) << PERIOD_SHIFT)
    }

    fn from_word(word: u32) -> Self {
        let mode = match word & TAG_MASK {
            TAG_PULSED => AlarmMode::Pulsed(PulsePeriod((word >> PERIOD_SHIFT) as u16)),
            TAG_CONTINUOUS => AlarmMode::Continuous,
            _ => AlarmMode::Off,
        };
        Self {
            mode,
            close_episode_active: word & EPISODE_BIT != 0,
        }
    }
}

/// Alarm snapshot packed into one atomic word.
///
/// Always replaced as a whole, so a reader never sees a half written update.
pub struct SharedAlarm {
    word: AtomicU32,
}

impl SharedAlarm {
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(TAG_OFF),
        }
    }

    pub fn load(&self) -> AlarmSnapshot {
        AlarmSnapshot::from_word(self.word.load(Ordering::Acquire))
    }

    pub fn store(&self, snapshot: AlarmSnapshot) {
        self.word.store(snapshot.to_word(), Ordering::Release);
    }
}

impl Default for SharedAlarm {
    fn default() -> Self {
        Self::new()
    }
}

/// Foreground alarm state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmState {
    /// No close range alarm until the obstacle clears the max boundary
    pub locked: bool,
    /// The close range alarm has fired since the last re-arm
    pub triggered: bool,
    /// The continuous close range alarm is running right now
    pub close_episode_active: bool,
    pub mode: AlarmMode,
}

/// Outcome of one state machine cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmUpdate {
    /// Tier of the sample
    pub tier: DistanceTier,
    /// Mode after the cycle
    pub mode: AlarmMode,
    /// A continuous close range alarm ran during this cycle
    pub close_episode: bool,
}

/// Tiered alarm state machine, fed one distance sample per cycle
pub struct AlarmStateMachine<'a> {
    config: AlarmConfig,
    state: AlarmState,
    shared: &'a SharedAlarm,
}

impl<'a> AlarmStateMachine<'a> {
    /// Creates an unlocked, silent state machine publishing to `shared`.
    pub fn new(config: AlarmConfig, shared: &'a SharedAlarm) -> Self {
        shared.store(AlarmSnapshot::IDLE);
        Self {
            config,
            state: AlarmState::default(),
            shared,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    /// Feeds one distance sample.
    ///
    /// Entering the close tier holds the buzzer on and returns only after the
    /// configured continuous duration has passed.
    pub async fn update<P, D>(
        &mut self,
        distance_cm: f32,
        buzzer: &mut P,
        delay: &mut D,
    ) -> Result<AlarmUpdate, P::Error>
    where
        P: OutputPin,
        D: DelayNs,
    {
        let tier = DistanceTier::classify(distance_cm, &self.config);

        // re-arm before looking at tiers, in the same cycle
        if tier == DistanceTier::OutOfRange {
            self.state.locked = false;
            self.state.triggered = false;
        }

        let close_episode =
            tier == DistanceTier::Close && !self.state.triggered && !self.state.locked;

        if close_episode {
            self.run_close_episode(buzzer, delay).await?;
        } else if let (false, Some(period)) =
            (self.state.locked, tier.pulse_period(&self.config))
        {
            self.publish(AlarmMode::Pulsed(period));
        } else {
            self.publish(AlarmMode::Off);
            buzzer.set_low()?;
        }

        Ok(AlarmUpdate {
            tier,
            mode: self.state.mode,
            close_episode,
        })
    }

    /// Continuous alarm for the configured duration, leaves the alarm locked
    /// and silent.
    async fn run_close_episode<P, D>(
        &mut self,
        buzzer: &mut P,
        delay: &mut D,
    ) -> Result<(), P::Error>
    where
        P: OutputPin,
        D: DelayNs,
    {
        self.state.triggered = true;
        self.state.locked = true;
        self.state.close_episode_active = true;
        self.publish(AlarmMode::Continuous);

        let held = buzzer.set_high();
        if held.is_ok() {
            delay.delay_ms(self.config.continuous_ms).await;
        }

        self.state.close_episode_active = false;
        self.publish(AlarmMode::Off);
        held.and(buzzer.set_low())
    }

    fn publish(&mut self, mode: AlarmMode) {
        self.state.mode = mode;
        self.shared.store(AlarmSnapshot {
            mode,
            close_episode_active: self.state.close_episode_active,
        });
    }
}
