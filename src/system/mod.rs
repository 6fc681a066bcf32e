//! Board level building blocks of the alarm
pub mod buzzer;
pub mod clock;
pub mod display;
pub mod resources;
