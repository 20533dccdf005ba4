//! Types shared between the console and the code that consumes its input.

#![no_std]

pub mod error;
pub mod keys;

pub use error::ConfigError;
pub use keys::{DecodedEvent, Modifiers, VirtualKey};
