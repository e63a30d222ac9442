//! Hardware initialisation and the status LEDs.

pub mod hw_init;
pub mod status_led;
