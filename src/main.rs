//! Proximity alarm firmware entry point
//!
//! Initializes the board and spawns the two runtime tasks:
//! - the alarm driver on a high priority interrupt executor, standing in for
//!   a hardware timer interrupt that toggles the buzzer
//! - the proximity monitor on the thread executor, the measurement loop

#![no_std]
#![no_main]

use crate::task::{alarm_driver::alarm_driver, proximity_monitor::proximity_monitor};
use defmt::info;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use system::buzzer;
use system::resources::{AssignedResources, BuzzerResources, DisplayResources, EchoSensorResources};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Board level building blocks
mod system;
/// Task implementations
mod task;

/// Executor of the alarm driver, preempts the measurement loop
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    info!("Booting proximity-alarm v{}", env!("CARGO_PKG_VERSION"));

    // Split the resources into separate groups, one per owner
    let r = split_resources!(p);

    // The buzzer must be silent and in place before either task can touch it
    buzzer::init(r.buzzer);

    // Alarm driver first, so pulsing works from the very first measurement
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(alarm_driver()).unwrap();

    spawner
        .spawn(proximity_monitor(r.echo_sensor, r.display))
        .unwrap();
}
