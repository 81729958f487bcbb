//! BLE gamepad remote and robot receiver.
//!
//! The hardware-independent core (debouncing, the command codec, both link
//! state machines, the interpreter) builds and tests on the host:
//!
//! `cargo test`
//!
//! The `embedded` feature adds the SoftDevice transports and the OLED
//! driver used by the two firmware images (`gamepad` and `robot`).

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod ble;
pub mod command;
pub mod config;
pub mod error;
pub mod tasks;
pub mod ui;

pub use error::Error;
