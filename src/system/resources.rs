//! Hardware Resource Management
//!
//! Assigns the board's pins and peripherals to the parts of the alarm that
//! own them. Each group is moved into exactly one owner at start-up.
//!
//! # Resource Groups
//! - Echo Sensor: HC-SR04 trigger and echo pins
//! - Buzzer: the single alarm output line
//! - Display: SSD1306 OLED on I2C0
//!
//! # Shared Resources
//! The buzzer line is driven from both the measurement loop and the alarm
//! driver; after assignment it lives in a global behind a critical section,
//! see [`crate::system::buzzer`].

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// HC-SR04 ultrasonic distance sensor pins
    echo_sensor: EchoSensorResources {
       trigger_pin: PIN_15,
       echo_pin: PIN_14,
    },
    /// Piezo buzzer output
    buzzer: BuzzerResources {
       buzzer_pin: PIN_16,
    },
    /// SSD1306 128x32 OLED display
    display: DisplayResources {
        i2c: I2C0,
        scl_pin: PIN_13,
        sda_pin: PIN_12,
    },
}
