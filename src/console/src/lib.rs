//! PC console subsystem
//!
//! A device-independent console for a bare-metal x86 kernel: output goes to
//! the serial port, the parallel port and the text display; input comes from
//! the serial port and the keyboard through a polled circular buffer.
//!
//! # Architecture
//!
//! The crate is structured into the following modules:
//! - `keyboard`: scancode decoding and the keyboard controller
//! - `serial`, `parallel`, `display`: output (and serial input) devices
//! - `ring`: the console input buffer
//! - `logger`: `log` record formatting
//! - `console`: the [`Console`] that ties them together
//! - `arch`: the real-hardware platform and the kernel-wide console
//!
//! # Safety
//!
//! This is a `#![no_std]` crate. All unsafe code lives in `arch` and is
//! documented with the invariants it relies on.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod arch;
pub mod config;
pub mod console;
pub mod display;
pub mod keyboard;
pub mod logger;
pub mod parallel;
pub mod ring;
pub mod serial;
pub mod wait;

#[cfg(test)]
mod testutil;

pub use config::ConsoleConfig;
pub use console::Console;
pub use pc_console_common::{ConfigError, DecodedEvent, Modifiers, VirtualKey};
