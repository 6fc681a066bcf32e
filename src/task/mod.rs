pub mod alarm_driver;
pub mod proximity_monitor;
