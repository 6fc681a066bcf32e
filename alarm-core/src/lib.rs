//! Proximity alarm core
//!
//! Hardware independent part of the ultrasonic proximity alarm: the echo
//! timing protocol, the distance estimate, the tiered alarm state machine and
//! the tick logic of the background alarm driver.
//!
//! All hardware is reached through `embedded-hal` traits, so the firmware
//! plugs in real pins and timers while the tests plug in mocks.
//!
//! # Per cycle flow
//! ```text
//! EchoSampler::measure -> to_distance_cm -> AlarmStateMachine::update
//!     -> show_distance -> next_delay_ms
//! ```
//! [`monitor::run_cycle`] runs everything after the measurement.
//! The alarm driver runs beside this loop and only ever reads the
//! [`alarm::SharedAlarm`] word written by the state machine.

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod cadence;
pub mod config;
pub mod display;
pub mod distance;
pub mod driver;
pub mod echo;
pub mod monitor;
pub mod tier;

pub use alarm::{
    AlarmMode, AlarmSnapshot, AlarmState, AlarmStateMachine, AlarmUpdate, PulsePeriod,
    SharedAlarm,
};
pub use cadence::next_delay_ms;
pub use config::AlarmConfig;
pub use display::{format_distance_line, show_distance, DisplaySink, DistanceLine, ShowError};
pub use distance::{to_distance_cm, TICK_RESOLUTION_FACTOR};
pub use driver::AlarmDriver;
pub use echo::{elapsed_ticks, EchoReading, EchoSampler, SamplerError, TickCounter};
pub use monitor::{run_cycle, CycleReport};
pub use tier::DistanceTier;
